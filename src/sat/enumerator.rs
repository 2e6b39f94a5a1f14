//! All-solutions enumeration by blocking clauses

use super::{Assignment, Clause, Formula, SatOracle};
use crate::error::OracleFailure;
use std::time::{Duration, Instant};

/// Every distinct model of a formula, in the order the oracle found them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionSet {
    assignments: Vec<Assignment>,
}

impl SolutionSet {
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn into_vec(self) -> Vec<Assignment> {
        self.assignments
    }
}

impl FromIterator<Assignment> for SolutionSet {
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        Self {
            assignments: iter.into_iter().collect(),
        }
    }
}

/// State of an enumeration between oracle calls.
///
/// `formula` is the original formula conjoined with one blocking clause per
/// entry of `solutions`.
#[derive(Debug, Clone)]
pub struct EnumerationState {
    formula: Formula,
    solutions: Vec<Assignment>,
}

/// Outcome of one enumeration step.
#[derive(Debug)]
pub enum Step {
    /// A new model was found and blocked.
    Found(EnumerationState),
    /// The oracle reported UNSAT; every model has been collected.
    Exhausted(SolutionSet),
}

impl EnumerationState {
    pub fn new(formula: Formula) -> Self {
        Self {
            formula,
            solutions: Vec::new(),
        }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn solutions(&self) -> &[Assignment] {
        &self.solutions
    }

    /// Ask the oracle once and fold its answer into the next state.
    pub fn step<O: SatOracle + ?Sized>(self, oracle: &mut O) -> Result<Step, OracleFailure> {
        let Self {
            formula,
            mut solutions,
        } = self;

        match oracle.solve(&formula)? {
            Some(model) => {
                tracing::info!(solution = solutions.len() + 1, model = %model, "SAT solution");
                let blocking = Clause::blocking(&model);
                solutions.push(model);
                Ok(Step::Found(Self {
                    formula: formula.conjoin(blocking),
                    solutions,
                }))
            }
            None => {
                tracing::info!(found = solutions.len(), "UNSAT, no more solutions");
                Ok(Step::Exhausted(SolutionSet {
                    assignments: solutions,
                }))
            }
        }
    }
}

/// Drives an oracle until the formula has no further models.
pub struct SolutionEnumerator<O: SatOracle> {
    oracle: O,
    last_run: Option<EnumerationStatistics>,
}

impl<O: SatOracle> SolutionEnumerator<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            last_run: None,
        }
    }

    /// Collect every distinct model of `formula`.
    ///
    /// An oracle failure aborts the enumeration; models found before the
    /// failure are discarded with it.
    pub fn enumerate(&mut self, formula: Formula) -> Result<SolutionSet, OracleFailure> {
        let start_time = Instant::now();
        let calls_before = self.oracle.calls();
        let initial_clauses = formula.len();

        let mut state = EnumerationState::new(formula);
        let solutions = loop {
            match state.step(&mut self.oracle)? {
                Step::Found(next) => state = next,
                Step::Exhausted(solutions) => break solutions,
            }
        };

        self.last_run = Some(EnumerationStatistics {
            solutions: solutions.len(),
            oracle_calls: self.oracle.calls() - calls_before,
            initial_clauses,
            blocking_clauses: solutions.len(),
            elapsed: start_time.elapsed(),
        });

        Ok(solutions)
    }

    /// Statistics of the most recent successful enumeration.
    pub fn last_run(&self) -> Option<&EnumerationStatistics> {
        self.last_run.as_ref()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_oracle(self) -> O {
        self.oracle
    }
}

/// Statistics of one enumeration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationStatistics {
    pub solutions: usize,
    pub oracle_calls: usize,
    pub initial_clauses: usize,
    pub blocking_clauses: usize,
    pub elapsed: Duration,
}

impl std::fmt::Display for EnumerationStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Enumeration Statistics:")?;
        writeln!(f, "  Solutions: {}", self.solutions)?;
        writeln!(f, "  Oracle calls: {}", self.oracle_calls)?;
        writeln!(
            f,
            "  Clauses: {} + {} blocking",
            self.initial_clauses, self.blocking_clauses
        )?;
        writeln!(f, "  Time: {:.3}s", self.elapsed.as_secs_f64())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{CadicalOracle, ExhaustiveOracle, Var};
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    /// Every satisfying assignment over the formula's variables, by truth table.
    fn brute_force(formula: &Formula) -> BTreeSet<Assignment> {
        let vars: Vec<Var> = formula.variables().into_iter().collect();
        if vars.is_empty() {
            return if formula.evaluate(&Assignment::new()) {
                BTreeSet::from([Assignment::new()])
            } else {
                BTreeSet::new()
            };
        }
        vars.iter()
            .map(|_| [false, true])
            .multi_cartesian_product()
            .map(|values| vars.iter().copied().zip(values).collect::<Assignment>())
            .filter(|candidate| formula.evaluate(candidate))
            .collect()
    }

    /// Seeded random formulas in the shape the builder produces, plus the
    /// occasional negative literal.
    fn sample_formulas() -> Vec<Formula> {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        let mut formulas = Vec::new();
        for _ in 0..25 {
            let num_vars = rng.gen_range(1..=12);
            let num_clauses = rng.gen_range(1..=6);

            let mut clauses = Vec::with_capacity(num_clauses);
            for _ in 0..num_clauses {
                if rng.gen_range(0..5) == 0 {
                    clauses.push(Clause::True);
                    continue;
                }
                let width = rng.gen_range(1..=3);
                let literals = (0..width)
                    .map(|_| {
                        let var = Var(rng.gen_range(0..num_vars));
                        if rng.gen_bool(1.0 / 6.0) {
                            var.negative()
                        } else {
                            var.positive()
                        }
                    })
                    .collect();
                clauses.push(Clause::Or(literals));
            }
            formulas.push(Formula::new(clauses));
        }
        formulas
    }

    fn assert_complete_and_distinct<O: SatOracle>(oracle: O) {
        let mut enumerator = SolutionEnumerator::new(oracle);
        for formula in sample_formulas() {
            let expected = brute_force(&formula);
            let solutions = enumerator.enumerate(formula.clone()).unwrap();

            let found: BTreeSet<Assignment> = solutions.iter().cloned().collect();
            assert_eq!(found.len(), solutions.len(), "duplicate model for {}", formula);
            assert_eq!(found, expected, "model sets differ for {}", formula);
            assert!(solutions.iter().all(|model| formula.evaluate(model)));
        }
    }

    #[test]
    fn test_cadical_enumeration_matches_brute_force() {
        assert_complete_and_distinct(CadicalOracle::new());
    }

    #[test]
    fn test_exhaustive_enumeration_matches_brute_force() {
        assert_complete_and_distinct(ExhaustiveOracle::new(12));
    }

    #[test]
    fn test_single_disjunction_has_three_models() {
        let mut enumerator = SolutionEnumerator::new(CadicalOracle::new());
        let solutions = enumerator
            .enumerate(Formula::new(vec![Clause::any_of([Var(0), Var(1)])]))
            .unwrap();
        assert_eq!(solutions.len(), 3);

        let stats = enumerator.last_run().unwrap();
        assert_eq!(stats.solutions, 3);
        assert_eq!(stats.oracle_calls, 4);
        assert_eq!(stats.blocking_clauses, 3);
    }

    #[test]
    fn test_trivial_formula_has_exactly_one_empty_model() {
        let mut enumerator = SolutionEnumerator::new(CadicalOracle::new());
        let solutions = enumerator
            .enumerate(Formula::new(vec![Clause::True, Clause::True, Clause::True]))
            .unwrap();
        assert_eq!(solutions.len(), 1);
        assert!(solutions.assignments()[0].is_empty());
    }

    #[test]
    fn test_unsatisfiable_formula_yields_empty_set() {
        let mut enumerator = SolutionEnumerator::new(CadicalOracle::new());
        let formula = Formula::new(vec![
            Clause::any_of([Var(0)]),
            Clause::Or(vec![Var(0).negative()]),
        ]);
        assert!(enumerator.enumerate(formula).unwrap().is_empty());
    }

    #[test]
    fn test_state_grows_by_one_blocking_clause_per_step() {
        let mut oracle = ExhaustiveOracle::default();
        let formula = Formula::new(vec![Clause::any_of([Var(0), Var(1)])]);

        let mut state = EnumerationState::new(formula);
        let mut expected_len = 1;
        loop {
            assert_eq!(state.formula().len(), expected_len);
            match state.step(&mut oracle).unwrap() {
                Step::Found(next) => {
                    expected_len += 1;
                    assert_eq!(next.solutions().len(), expected_len - 1);
                    state = next;
                }
                Step::Exhausted(solutions) => {
                    assert_eq!(solutions.len(), 3);
                    break;
                }
            }
        }
    }

    #[test]
    fn test_oracle_failure_is_surfaced() {
        let mut enumerator = SolutionEnumerator::new(ExhaustiveOracle::new(1));
        let formula = Formula::new(vec![Clause::any_of([Var(0), Var(1)])]);
        assert!(matches!(
            enumerator.enumerate(formula),
            Err(OracleFailure::Backend(_))
        ));
        assert!(enumerator.last_run().is_none());
    }
}
