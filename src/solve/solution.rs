//! Solution representation for Sudoku problems

use crate::sudoku::Board;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A completed board together with the puzzle it solves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The puzzle as given
    pub puzzle: Board,
    /// The completed board
    pub board: Board,
    /// 1-based position in enumeration order
    pub index: usize,
    /// Time taken to find this solution
    #[serde(skip)]
    pub solve_time: Duration,
}

/// Compact, serializable overview of a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub index: usize,
    pub size: usize,
    pub givens: usize,
    pub solution: String,
    pub solve_time_ms: u64,
}

impl Solution {
    pub fn new(puzzle: Board, board: Board, index: usize, solve_time: Duration) -> Self {
        Self {
            puzzle,
            board,
            index,
            solve_time,
        }
    }

    /// Number of cells that were filled in by the solver
    pub fn filled_cells(&self) -> usize {
        self.puzzle.empty_count()
    }

    /// Whether two solutions complete the same board
    pub fn is_equivalent_to(&self, other: &Solution) -> bool {
        self.board == other.board
    }

    pub fn summary(&self) -> SolutionSummary {
        let size = self.puzzle.size();
        SolutionSummary {
            index: self.index,
            size,
            givens: size * size - self.puzzle.empty_count(),
            solution: self.board.to_digit_string(),
            solve_time_ms: self.solve_time.as_millis() as u64,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
