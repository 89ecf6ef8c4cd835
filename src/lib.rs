//! Sudoku SAT Solver
//!
//! This library encodes Sudoku puzzles of any square size as CNF theories,
//! hands them to a SAT solver and decodes the models back into boards. It
//! can find one solution or count all of them.

pub mod config;
pub mod error;
pub mod sat;
pub mod solve;
pub mod sudoku;
pub mod utils;

pub use config::Settings;
pub use error::{BoardError, Error, Result};
pub use solve::{EnumerationReport, Solution, SolveResult, SudokuProblem};
pub use sudoku::Board;

/// Main entry point: parse a board string and find one solution
pub fn solve_puzzle(puzzle: &str, settings: Settings) -> Result<SolveResult> {
    let board = Board::parse(puzzle)?;
    SudokuProblem::new(board, settings).solve()
}

/// Parse a board string and count all of its solutions
pub fn count_solutions(puzzle: &str, settings: Settings) -> Result<EnumerationReport> {
    let board = Board::parse(puzzle)?;
    SudokuProblem::new(board, settings).count_solutions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverBackend;

    fn cadical_settings() -> Settings {
        let mut settings = Settings::default();
        settings.solver.backend = SolverBackend::Cadical;
        settings
    }

    #[test]
    fn test_malformed_board_never_reaches_the_solver() {
        // the default backend is an external program that may not exist here
        let result = solve_puzzle("12345", Settings::default());
        assert!(matches!(
            result,
            Err(Error::MalformedBoard(BoardError::NotSquare { length: 5 }))
        ));

        let result = count_solutions("12?4341221434321", Settings::default());
        assert!(matches!(
            result,
            Err(Error::MalformedBoard(BoardError::InvalidCharacter { character: '?', position: 2 }))
        ));
    }

    #[test]
    fn test_entry_points() {
        let hard = "4.....8.5.3..........7......2.....6.....8.4......1.......6.3.7.5..2.....1.4......";
        let result = solve_puzzle(hard, cadical_settings()).unwrap();
        assert!(result.solution().unwrap().board.is_complete());

        assert_eq!(count_solutions("1...............", cadical_settings()).unwrap().count, 72);
    }
}
