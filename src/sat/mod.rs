//! SAT encoding, oracle backends and model enumeration

pub mod encoder;
pub mod enumerator;
pub mod exhaustive_solver;
pub mod formula;
pub mod solver;
pub mod solver_factory;
pub mod variables;

pub use encoder::{EncodingStatistics, FormulaBuilder};
pub use enumerator::{EnumerationState, EnumerationStatistics, SolutionEnumerator, SolutionSet, Step};
pub use exhaustive_solver::ExhaustiveOracle;
pub use formula::{Assignment, Clause, Formula};
pub use solver::{CadicalOracle, SatOracle, SolverOptions};
pub use solver_factory::UnifiedOracle;
pub use variables::{Literal, Var};
