//! Decoding of SAT models back into Sudoku boards

use super::solver::Model;
use super::variables::VariableEncoder;
use super::constraints::Clause;
use crate::error::{Error, Result};
use crate::sudoku::Board;

/// Maps satisfying assignments back to completed boards
#[derive(Debug, Clone, Copy)]
pub struct ModelDecoder {
    encoder: VariableEncoder,
}

impl ModelDecoder {
    pub fn new(size: usize) -> Self {
        Self {
            encoder: VariableEncoder::new(size),
        }
    }

    /// The completed board described by `model`
    ///
    /// Every cell must have exactly one true digit variable; anything else
    /// means the encoding or the solver is broken and is reported as
    /// [`Error::InconsistentModel`].
    pub fn decode(&self, model: &Model) -> Result<Board> {
        let size = self.encoder.size();
        let mut cells = Vec::with_capacity(size * size);

        for row in 0..size {
            for col in 0..size {
                let digits: Vec<usize> = (1..=size)
                    .filter(|&digit| model.is_true(self.encoder.encode(row, col, digit)))
                    .collect();

                match digits.as_slice() {
                    [digit] => cells.push(*digit),
                    _ => return Err(Error::InconsistentModel { row, col, digits }),
                }
            }
        }

        Board::from_cells(size, cells).map_err(Error::from)
    }

    /// The model selecting exactly the digits of `board`, the inverse of
    /// [`decode`](Self::decode) for completed boards
    pub fn encode_board(&self, board: &Board) -> Model {
        let size = self.encoder.size();
        let assignment = board
            .all_coordinates()
            .flat_map(|(row, col)| {
                (1..=size).map(move |digit| {
                    (self.encoder.encode(row, col, digit), board.value(row, col) == digit)
                })
            })
            .collect();
        Model::from_assignment(assignment)
    }

    /// Clause excluding exactly this completed board
    ///
    /// The disjunction of the negated "selected digit" literal of every cell;
    /// only the N² decision literals take part.
    pub fn blocking_clause(&self, solution: &Board) -> Clause {
        Clause::new(
            solution
                .all_coordinates()
                .map(|(row, col)| -self.encoder.encode(row, col, solution.value(row, col)))
                .collect(),
        )
    }
}
