//! Solving, counting and validating Sudoku puzzles

pub mod enumerator;
pub mod problem;
pub mod solution;
pub mod validator;

pub use enumerator::{EnumerationReport, EnumerationState, SolutionEnumerator};
pub use problem::{SolveResult, SudokuProblem};
pub use solution::{Solution, SolutionSummary};
pub use validator::{RuleViolation, SolutionValidator, ValidationResult};
