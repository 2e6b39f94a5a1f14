//! Exhaustive truth-table oracle for small formulas

use super::solver::{SatOracle, SolverOptions};
use super::{Assignment, Formula};
use crate::error::OracleFailure;

/// Tries every assignment of the formula's variables in counting order.
///
/// Answers are exact but cost `2^v` evaluations, so formulas with more than
/// `max_variables` variables are refused with an oracle failure.
#[derive(Debug)]
pub struct ExhaustiveOracle {
    max_variables: usize,
    calls: usize,
}

impl ExhaustiveOracle {
    pub fn new(max_variables: usize) -> Self {
        Self {
            max_variables,
            calls: 0,
        }
    }

    pub fn configure(&mut self, options: &SolverOptions) {
        self.max_variables = options.max_exhaustive_variables;
    }

    pub fn max_variables(&self) -> usize {
        self.max_variables
    }
}

impl Default for ExhaustiveOracle {
    fn default() -> Self {
        Self::new(SolverOptions::default().max_exhaustive_variables)
    }
}

impl SatOracle for ExhaustiveOracle {
    fn solve(&mut self, formula: &Formula) -> Result<Option<Assignment>, OracleFailure> {
        self.calls += 1;

        if formula.has_contradiction() {
            return Ok(None);
        }

        let vars: Vec<_> = formula.variables().into_iter().collect();
        if vars.len() > self.max_variables || vars.len() >= u64::BITS as usize {
            return Err(OracleFailure::Backend(format!(
                "formula has {} variables, exhaustive limit is {}",
                vars.len(),
                self.max_variables
            )));
        }

        for bits in 0..(1u64 << vars.len()) {
            let candidate: Assignment = vars
                .iter()
                .enumerate()
                .map(|(i, &var)| (var, bits & (1 << i) != 0))
                .collect();
            if formula.evaluate(&candidate) {
                return Ok(Some(candidate));
            }
        }

        Ok(None)
    }

    fn calls(&self) -> usize {
        self.calls
    }

    fn name(&self) -> &'static str {
        "exhaustive"
    }
}
