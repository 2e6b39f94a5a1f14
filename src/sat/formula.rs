//! Clauses, formulas and assignments

use super::{Literal, Var};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A clause: the constant true, or a disjunction of literals.
///
/// An empty disjunction is the constant false.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Clause {
    True,
    Or(Vec<Literal>),
}

impl Clause {
    /// Disjunction of the positive literals of `vars`.
    pub fn any_of<I: IntoIterator<Item = Var>>(vars: I) -> Self {
        Clause::Or(vars.into_iter().map(Var::positive).collect())
    }

    /// The clause satisfied exactly by assignments that differ from `assignment`
    /// on at least one of its variables.
    pub fn blocking(assignment: &Assignment) -> Self {
        Clause::Or(
            assignment
                .iter()
                .map(|(var, value)| if value { var.negative() } else { var.positive() })
                .collect(),
        )
    }

    pub fn literals(&self) -> &[Literal] {
        match self {
            Clause::True => &[],
            Clause::Or(literals) => literals,
        }
    }

    /// Whether this clause can never be satisfied.
    pub fn is_contradiction(&self) -> bool {
        matches!(self, Clause::Or(literals) if literals.is_empty())
    }

    /// Unassigned variables count as false.
    pub fn evaluate(&self, assignment: &Assignment) -> bool {
        match self {
            Clause::True => true,
            Clause::Or(literals) => literals
                .iter()
                .any(|lit| lit.holds(assignment.is_true(lit.var()))),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::True => f.write_str("true"),
            Clause::Or(literals) if literals.is_empty() => f.write_str("false"),
            Clause::Or(literals) if literals.len() == 1 => write!(f, "{}", literals[0]),
            Clause::Or(literals) => write!(f, "({})", literals.iter().join(" | ")),
        }
    }
}

/// A conjunction of clauses.
///
/// Formulas only grow: conjoining consumes the formula and returns the
/// strengthened one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    clauses: Vec<Clause>,
}

impl Formula {
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    /// This formula with `clause` added as a further conjunct.
    pub fn conjoin(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Every variable occurring in some clause.
    pub fn variables(&self) -> BTreeSet<Var> {
        self.clauses
            .iter()
            .flat_map(|clause| clause.literals().iter().map(|lit| lit.var()))
            .collect()
    }

    /// Whether some conjunct is the constant false.
    pub fn has_contradiction(&self) -> bool {
        self.clauses.iter().any(Clause::is_contradiction)
    }

    pub fn evaluate(&self, assignment: &Assignment) -> bool {
        self.clauses.iter().all(|clause| clause.evaluate(assignment))
    }

    /// Text with constant-true conjuncts dropped.
    pub fn simplified(&self) -> String {
        let kept: Vec<&Clause> = self
            .clauses
            .iter()
            .filter(|clause| !matches!(clause, Clause::True))
            .unique()
            .collect();
        if kept.is_empty() {
            "true".to_string()
        } else {
            kept.iter().join(" & ")
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return f.write_str("true");
        }
        write!(f, "{}", self.clauses.iter().join(" & "))
    }
}

/// A mapping from variables to truth values, as returned by an oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assignment {
    values: BTreeMap<Var, bool>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, var: Var, value: bool) {
        self.values.insert(var, value);
    }

    pub fn value(&self, var: Var) -> Option<bool> {
        self.values.get(&var).copied()
    }

    /// Unassigned variables are false.
    pub fn is_true(&self, var: Var) -> bool {
        self.value(var).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Var, bool)> + '_ {
        self.values.iter().map(|(&var, &value)| (var, value))
    }

    pub fn true_vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.iter().filter(|&(_, value)| value).map(|(var, _)| var)
    }

    pub fn variables(&self) -> impl Iterator<Item = Var> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Var, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Var, bool)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.iter()
                .map(|(var, value)| format!("{} := {}", var, if value { "T" } else { "F" }))
                .join(", ")
        )
    }
}
