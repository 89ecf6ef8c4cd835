//! Sudoku board representation and I/O

pub mod board;
pub mod io;

pub use board::{Board, EMPTY};
pub use io::{create_example_puzzles, load_board_from_file, parse_board_from_string, save_board_to_file};
