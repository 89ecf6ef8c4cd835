//! Error types for board parsing, encoding and solving

use std::time::Duration;
use thiserror::Error;

/// Errors detected while constructing a [`Board`](crate::sudoku::Board)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("the board string is empty")]
    Empty,
    #[error("the board has length {length} and does not seem to be square")]
    NotSquare { length: usize },
    #[error("a {size}x{size} board cannot be divided into square boxes")]
    BoxNotSquare { size: usize },
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("digit {digit} at position {position} is out of range for a {size}x{size} board")]
    DigitOutOfRange {
        digit: usize,
        position: usize,
        size: usize,
    },
}

/// Errors surfaced by the encoding and solving pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Input error: the puzzle never reaches the solver
    #[error("malformed board: {0}")]
    MalformedBoard(#[from] BoardError),

    /// The solver produced output that could not be interpreted
    #[error("could not parse solver output: {0}")]
    SolverOutput(String),

    /// The solver could not be started or exited abnormally
    #[error("solver process failed: {0}")]
    SolverProcess(String),

    /// The solver did not answer within the configured bound
    #[error("solver timed out after {0:?}")]
    TimedOut(Duration),

    /// A model did not assign exactly one digit to a cell
    #[error("inconsistent model: cell ({row}, {col}) has candidate digits {digits:?}")]
    InconsistentModel {
        row: usize,
        col: usize,
        digits: Vec<usize>,
    },

    /// A decoded board broke a Sudoku rule or changed a given
    #[error("decoded solution is invalid: {0}")]
    InvalidSolution(String),

    /// Enumeration stopped before the solution space was exhausted
    #[error("enumeration stopped after {found} solution(s) without exhausting the search")]
    EnumerationIncomplete {
        found: usize,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_converts() {
        let err: Error = BoardError::NotSquare { length: 80 }.into();
        assert!(matches!(err, Error::MalformedBoard(BoardError::NotSquare { length: 80 })));
        assert!(err.to_string().contains("length 80"));
    }

    #[test]
    fn test_incomplete_enumeration_keeps_cause() {
        let err = Error::EnumerationIncomplete {
            found: 3,
            source: Box::new(Error::TimedOut(Duration::from_secs(2))),
        };
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("timed out"));
    }
}
