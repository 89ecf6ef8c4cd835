//! Board representation and querying for Sudoku puzzles

use crate::error::BoardError;
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker for a cell without a given digit
pub const EMPTY: usize = 0;

/// A square Sudoku board of side `size`, possibly with some pre-filled values
///
/// Cells are stored row-major; `0` marks an empty cell, any other value is a
/// digit in `1..=size`. The board is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Board {
    size: usize,
    box_size: usize,
    cells: Vec<usize>,
}

impl Board {
    /// Parse a board from its flattened row-major representation
    ///
    /// `0` and `.` mark empty cells. Boards larger than 9x9 write the digits
    /// above 9 as letters, `A` being 10.
    pub fn parse(input: &str) -> Result<Self, BoardError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(BoardError::Empty);
        }

        let length = input.chars().count();
        let size = exact_sqrt(length).ok_or(BoardError::NotSquare { length })?;

        let mut cells = Vec::with_capacity(length);
        for (position, character) in input.chars().enumerate() {
            let digit = match character {
                '.' => EMPTY,
                c => c
                    .to_digit(36)
                    .map(|d| d as usize)
                    .ok_or(BoardError::InvalidCharacter { character, position })?,
            };
            cells.push(digit);
        }

        Self::from_cells(size, cells)
    }

    /// Create a board from row-major cell values
    pub fn from_cells(size: usize, cells: Vec<usize>) -> Result<Self, BoardError> {
        if size == 0 || cells.is_empty() {
            return Err(BoardError::Empty);
        }
        if cells.len() != size * size {
            return Err(BoardError::NotSquare { length: cells.len() });
        }
        let box_size = exact_sqrt(size).ok_or(BoardError::BoxNotSquare { size })?;

        if let Some((position, &digit)) = cells.iter().enumerate().find(|(_, d)| **d > size) {
            return Err(BoardError::DigitOutOfRange { digit, position, size });
        }

        Ok(Self { size, box_size, cells })
    }

    /// Create a board with every cell empty
    pub fn empty(size: usize) -> Result<Self, BoardError> {
        Self::from_cells(size, vec![EMPTY; size * size])
    }

    /// Side length of the board, e.g. 9 for a 9x9 board
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length of a box, e.g. 3 for a 9x9 board
    pub fn box_size(&self) -> usize {
        self.box_size
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// The digit at (row, col), or [`EMPTY`] if nothing is placed there
    pub fn value(&self, row: usize, col: usize) -> usize {
        self.cells[self.index(row, col)]
    }

    pub fn is_given(&self, row: usize, col: usize) -> bool {
        self.value(row, col) != EMPTY
    }

    /// All coordinates of the board in row-major order
    pub fn all_coordinates(&self) -> impl Iterator<Item = (usize, usize)> {
        iproduct!(0..self.size, 0..self.size)
    }

    /// Coordinates of the cells in box `index`, boxes numbered row-major
    pub fn box_coordinates(&self, index: usize) -> impl Iterator<Item = (usize, usize)> {
        let top = (index / self.box_size) * self.box_size;
        let left = (index % self.box_size) * self.box_size;
        iproduct!(top..top + self.box_size, left..left + self.box_size)
    }

    /// Every given cell as `(row, col, digit)`
    pub fn givens(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.all_coordinates()
            .filter(|&(r, c)| self.is_given(r, c))
            .map(|(r, c)| (r, c, self.value(r, c)))
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&d| d == EMPTY).count()
    }

    /// Whether every cell holds a digit
    pub fn is_complete(&self) -> bool {
        self.empty_count() == 0
    }

    /// The digits of one row
    pub fn row(&self, row: usize) -> &[usize] {
        let start = self.index(row, 0);
        &self.cells[start..start + self.size]
    }

    /// Row-major digit string, `0` for empty cells
    pub fn to_digit_string(&self) -> String {
        self.cells.iter().map(|&d| digit_char(d)).collect()
    }
}

/// Character used to print a digit
pub fn digit_char(digit: usize) -> char {
    std::char::from_digit(digit as u32, 36)
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?')
}

fn exact_sqrt(n: usize) -> Option<usize> {
    let root = (n as f64).sqrt().round() as usize;
    (root * root == n).then_some(root)
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Board {
    type Error = BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.to_digit_string()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_digit_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str =
        "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";

    #[test]
    fn test_parse_standard_board() {
        let board = Board::parse(PUZZLE).unwrap();
        assert_eq!(board.size(), 9);
        assert_eq!(board.box_size(), 3);
        assert_eq!(board.value(0, 2), 3);
        assert_eq!(board.value(0, 0), EMPTY);
        assert!(board.is_given(1, 0));
        assert_eq!(board.givens().count(), 32);
        assert_eq!(board.empty_count(), 49);
    }

    #[test]
    fn test_dots_and_zeros_are_equivalent() {
        let dotted = Board::parse(PUZZLE).unwrap();
        let zeroed = Board::parse(&PUZZLE.replace('.', "0")).unwrap();
        assert_eq!(dotted, zeroed);
        assert_eq!(zeroed.to_digit_string(), PUZZLE.replace('.', "0"));
    }

    #[test]
    fn test_non_square_length_fails() {
        let err = Board::parse(&"0".repeat(80)).unwrap_err();
        assert_eq!(err, BoardError::NotSquare { length: 80 });
    }

    #[test]
    fn test_side_without_square_boxes_fails() {
        // 2x2 board: side 2 is not a perfect square
        let err = Board::parse("0000").unwrap_err();
        assert_eq!(err, BoardError::BoxNotSquare { size: 2 });
    }

    #[test]
    fn test_invalid_character_fails() {
        let mut input = "0".repeat(16);
        input.replace_range(5..6, "x");
        assert!(matches!(
            Board::parse(&input),
            Err(BoardError::DigitOutOfRange { .. })
        ));

        input.replace_range(5..6, "#");
        assert_eq!(
            Board::parse(&input).unwrap_err(),
            BoardError::InvalidCharacter { character: '#', position: 5 }
        );
    }

    #[test]
    fn test_digit_out_of_range_fails() {
        let err = Board::parse("5000000000000000").unwrap_err();
        assert_eq!(err, BoardError::DigitOutOfRange { digit: 5, position: 0, size: 4 });
    }

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(Board::parse("   ").unwrap_err(), BoardError::Empty);
    }

    #[test]
    fn test_large_board_uses_letters() {
        let mut input = "0".repeat(256);
        input.replace_range(0..1, "G");
        let board = Board::parse(&input).unwrap();
        assert_eq!(board.size(), 16);
        assert_eq!(board.box_size(), 4);
        assert_eq!(board.value(0, 0), 16);
        assert!(board.to_digit_string().starts_with('G'));
    }

    #[test]
    fn test_box_coordinates() {
        let board = Board::empty(9).unwrap();
        let cells: Vec<_> = board.box_coordinates(5).collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], (3, 6));
        assert_eq!(cells[8], (5, 8));
    }

    #[test]
    fn test_serde_uses_digit_string() {
        let board = Board::parse("1234341221434321").unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, "\"1234341221434321\"");
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }
}
