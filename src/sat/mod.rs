//! SAT encoding, serialization and solving components

pub mod variables;
pub mod constraints;
pub mod dimacs;
pub mod solver;
pub mod cadical_solver;
pub mod external;
pub mod solver_factory;
pub mod decoder;

pub use variables::{CellDigit, VariableEncoder};
pub use constraints::{Clause, PairStrategy, Theory, TheoryGenerator, TheoryStatistics};
pub use solver::{Model, SatSolver, SolveOutcome};
pub use cadical_solver::CadicalSolver;
pub use external::ExternalSolver;
pub use solver_factory::UnifiedSatSolver;
pub use decoder::ModelDecoder;
