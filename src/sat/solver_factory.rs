//! Factory for creating oracle instances based on configuration

use super::exhaustive_solver::ExhaustiveOracle;
use super::solver::{CadicalOracle, SatOracle, SolverOptions};
use super::{Assignment, Formula};
use crate::config::SolverBackend;
use crate::error::OracleFailure;

/// Unified oracle that can use different backends
#[derive(Debug)]
pub enum UnifiedOracle {
    Cadical(CadicalOracle),
    Exhaustive(ExhaustiveOracle),
}

impl UnifiedOracle {
    /// Create a configured oracle for `backend`
    pub fn new(backend: SolverBackend, options: &SolverOptions) -> Self {
        match backend {
            SolverBackend::Cadical => {
                let mut oracle = CadicalOracle::new();
                oracle.configure(options);
                UnifiedOracle::Cadical(oracle)
            }
            SolverBackend::Exhaustive => {
                let mut oracle = ExhaustiveOracle::default();
                oracle.configure(options);
                UnifiedOracle::Exhaustive(oracle)
            }
        }
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedOracle::Cadical(_) => SolverBackend::Cadical,
            UnifiedOracle::Exhaustive(_) => SolverBackend::Exhaustive,
        }
    }
}

impl Default for UnifiedOracle {
    fn default() -> Self {
        UnifiedOracle::Cadical(CadicalOracle::new())
    }
}

impl SatOracle for UnifiedOracle {
    fn solve(&mut self, formula: &Formula) -> Result<Option<Assignment>, OracleFailure> {
        match self {
            UnifiedOracle::Cadical(oracle) => oracle.solve(formula),
            UnifiedOracle::Exhaustive(oracle) => oracle.solve(formula),
        }
    }

    fn calls(&self) -> usize {
        match self {
            UnifiedOracle::Cadical(oracle) => oracle.calls(),
            UnifiedOracle::Exhaustive(oracle) => oracle.calls(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            UnifiedOracle::Cadical(oracle) => oracle.name(),
            UnifiedOracle::Exhaustive(oracle) => oracle.name(),
        }
    }
}
