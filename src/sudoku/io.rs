//! File I/O operations for Sudoku boards

use super::Board;
use anyhow::{Context, Result};
use std::path::Path;

/// Puzzles written by [`create_example_puzzles`], as (file stem, board string)
pub const EXAMPLE_PUZZLES: &[(&str, &str)] = &[
    (
        "easy",
        "003020600900305001001806400008102900700000008006708200002609500800203009005010300",
    ),
    (
        "hard",
        "4.....8.5.3..........7......2.....6.....8.4......1.......6.3.7.5..2.....1.4......",
    ),
    ("empty_4x4", "0000000000000000"),
];

/// Load a board from a text file
///
/// Lines starting with `#` are comments. All remaining characters except
/// whitespace are concatenated, so both single-line and matrix layouts work.
pub fn load_board_from_file<P: AsRef<Path>>(path: P) -> Result<Board> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read board file: {}", path.as_ref().display()))?;

    parse_board_from_string(&content)
        .with_context(|| format!("Failed to parse board from file: {}", path.as_ref().display()))
}

/// Parse a board from possibly multi-line text
pub fn parse_board_from_string(content: &str) -> Result<Board> {
    let flattened: String = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.chars().filter(|c| !c.is_whitespace()))
        .collect();

    if flattened.is_empty() {
        anyhow::bail!("Board file is empty or contains only comments");
    }

    Ok(Board::parse(&flattened)?)
}

/// Save a board to a text file as a single digit string
pub fn save_board_to_file<P: AsRef<Path>>(board: &Board, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, board_to_string(board))
        .with_context(|| format!("Failed to write board to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Single-line representation terminated by a newline
pub fn board_to_string(board: &Board) -> String {
    let mut result = board.to_digit_string();
    result.push('\n');
    result
}

/// Create example puzzle files
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    for (name, puzzle) in EXAMPLE_PUZZLES {
        let path = dir.join(format!("{name}.txt"));
        std::fs::write(&path, format!("{puzzle}\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}
