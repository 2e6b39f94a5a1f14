//! Minimum-weight obstacle removal: solving, costing and validating paths

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{PathReport, PathSolve, RemovalProblem};
pub use solution::{cost, select_min_cost, CostedSolution, PathOutcome, PathSummary};
pub use validator::{ClearanceReport, ClearanceValidator};
