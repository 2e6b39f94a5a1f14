//! Satisfiability oracle seam and its CaDiCaL backend

use super::{Assignment, Clause, Formula};
use crate::error::OracleFailure;
use cadical::{Solver, Timeout};
use std::time::{Duration, Instant};

/// Decides a formula and, when satisfiable, returns one model.
///
/// The returned assignment covers exactly the variables occurring in the
/// formula. Oracles are stateless between calls: every call sees the whole
/// formula it is given and nothing else.
pub trait SatOracle {
    fn solve(&mut self, formula: &Formula) -> Result<Option<Assignment>, OracleFailure>;

    /// Number of `solve` calls answered so far.
    fn calls(&self) -> usize;

    fn name(&self) -> &'static str;
}

/// Configuration options for the SAT backends
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Per-call time limit; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Largest variable count the exhaustive backend accepts.
    pub max_exhaustive_variables: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            max_exhaustive_variables: 20,
        }
    }
}

/// Oracle backed by a fresh CaDiCaL instance per call.
#[derive(Debug, Default)]
pub struct CadicalOracle {
    timeout: Option<Duration>,
    calls: usize,
    solve_time: Duration,
}

impl CadicalOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(&mut self, options: &SolverOptions) {
        self.timeout = options.timeout;
    }

    /// Time spent inside CaDiCaL across all calls.
    pub fn solve_time(&self) -> Duration {
        self.solve_time
    }
}

impl SatOracle for CadicalOracle {
    fn solve(&mut self, formula: &Formula) -> Result<Option<Assignment>, OracleFailure> {
        self.calls += 1;

        // CaDiCaL would only report the empty clause as UNSAT anyway
        if formula.has_contradiction() {
            return Ok(None);
        }

        let mut solver: Solver = Solver::new();
        if let Some(timeout) = self.timeout {
            solver.set_callbacks(Some(Timeout::new(timeout.as_secs_f32())));
        }

        for clause in formula.clauses() {
            if let Clause::Or(literals) = clause {
                solver.add_clause(literals.iter().map(|lit| lit.to_dimacs()));
            }
        }

        let start_time = Instant::now();
        let result = solver.solve();
        self.solve_time += start_time.elapsed();

        match result {
            Some(true) => {
                let assignment = formula
                    .variables()
                    .into_iter()
                    .map(|var| (var, solver.value(var.to_dimacs()).unwrap_or(false)))
                    .collect();
                Ok(Some(assignment))
            }
            Some(false) => Ok(None),
            None => Err(match self.timeout {
                Some(timeout) => OracleFailure::Timeout {
                    seconds: timeout.as_secs(),
                },
                None => OracleFailure::Backend("CaDiCaL returned no result".to_string()),
            }),
        }
    }

    fn calls(&self) -> usize {
        self.calls
    }

    fn name(&self) -> &'static str {
        "cadical"
    }
}
