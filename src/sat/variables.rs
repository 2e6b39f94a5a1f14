//! Boolean variables and literals over obstacle ids

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Not;

/// The Boolean variable of one obstacle. Its id is the obstacle id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Var(pub usize);

impl Var {
    pub fn id(self) -> usize {
        self.0
    }

    /// DIMACS variable number; obstacle 0 is variable 1.
    pub fn to_dimacs(self) -> i32 {
        (self.0 + 1) as i32
    }

    pub fn positive(self) -> Literal {
        Literal {
            var: self,
            negated: false,
        }
    }

    pub fn negative(self) -> Literal {
        Literal {
            var: self,
            negated: true,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "o{}", self.0)
    }
}

/// A variable or its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    var: Var,
    negated: bool,
}

impl Literal {
    pub fn var(self) -> Var {
        self.var
    }

    pub fn is_negated(self) -> bool {
        self.negated
    }

    /// Signed DIMACS literal.
    pub fn to_dimacs(self) -> i32 {
        let var = self.var.to_dimacs();
        if self.negated {
            -var
        } else {
            var
        }
    }

    /// Truth of the literal when its variable takes `value`.
    pub fn holds(self, value: bool) -> bool {
        value != self.negated
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal {
            var: self.var,
            negated: !self.negated,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!{}", self.var)
        } else {
            write!(f, "{}", self.var)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimacs_mapping() {
        assert_eq!(Var(0).to_dimacs(), 1);
        assert_eq!(Var(4).positive().to_dimacs(), 5);
        assert_eq!(Var(4).negative().to_dimacs(), -5);
    }

    #[test]
    fn test_literal_truth() {
        let lit = Var(2).positive();
        assert!(lit.holds(true));
        assert!(!lit.holds(false));
        assert!((!lit).holds(false));
        assert_eq!(!!lit, lit);
    }

    #[test]
    fn test_display() {
        assert_eq!(Var(3).to_string(), "o3");
        assert_eq!(Var(3).negative().to_string(), "!o3");
    }
}
