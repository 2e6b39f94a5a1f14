//! Minimum-Weight Obstacle Removal SAT Solver
//!
//! Given rectangular weighted obstacles on an `n x n` grid, find for each
//! canonical monotone path the cheapest set of obstacles whose removal
//! clears it, by enumerating every model of a per-path SAT formula.

pub mod config;
pub mod error;
pub mod map;
pub mod removal;
pub mod sat;
pub mod utils;

pub use config::Settings;
pub use error::{RemovalError, Result};
pub use removal::{PathReport, RemovalProblem};

/// Main entry point: load the configured map and solve every configured path
pub fn solve_map(settings: &Settings) -> Result<Vec<PathReport>> {
    let problem = RemovalProblem::new(settings)?;
    Ok(problem.solve())
}
