//! Solution validation for Sudoku boards

use crate::sudoku::{Board, EMPTY};
use std::fmt;

/// Checks candidate solutions against the Sudoku rules and the puzzle givens
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionValidator;

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<RuleViolation>,
    pub error_message: Option<String>,
}

/// A single broken rule found during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    SizeMismatch { expected: usize, actual: usize },
    EmptyCell { row: usize, col: usize },
    GivenChanged { row: usize, col: usize, expected: usize, actual: usize },
    DuplicateInRow { row: usize, digit: usize },
    DuplicateInColumn { col: usize, digit: usize },
    DuplicateInBox { index: usize, digit: usize },
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleViolation::SizeMismatch { expected, actual } => {
                write!(f, "board size {actual} does not match puzzle size {expected}")
            }
            RuleViolation::EmptyCell { row, col } => write!(f, "cell ({row}, {col}) is empty"),
            RuleViolation::GivenChanged { row, col, expected, actual } => write!(
                f,
                "given {expected} at ({row}, {col}) was changed to {actual}"
            ),
            RuleViolation::DuplicateInRow { row, digit } => {
                write!(f, "digit {digit} appears more than once in row {row}")
            }
            RuleViolation::DuplicateInColumn { col, digit } => {
                write!(f, "digit {digit} appears more than once in column {col}")
            }
            RuleViolation::DuplicateInBox { index, digit } => {
                write!(f, "digit {digit} appears more than once in box {index}")
            }
        }
    }
}

impl SolutionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate that `candidate` is a completed board solving `puzzle`
    pub fn validate(&self, puzzle: &Board, candidate: &Board) -> ValidationResult {
        if puzzle.size() != candidate.size() {
            return ValidationResult::from_violations(vec![RuleViolation::SizeMismatch {
                expected: puzzle.size(),
                actual: candidate.size(),
            }]);
        }

        let mut violations = Self::check_rules(candidate);

        for (row, col, expected) in puzzle.givens() {
            let actual = candidate.value(row, col);
            if actual != expected {
                violations.push(RuleViolation::GivenChanged { row, col, expected, actual });
            }
        }

        ValidationResult::from_violations(violations)
    }

    /// Check only the Sudoku rules: every cell filled, every unit a permutation
    pub fn check_rules(board: &Board) -> Vec<RuleViolation> {
        let size = board.size();
        let mut violations: Vec<RuleViolation> = board
            .all_coordinates()
            .filter(|&(row, col)| board.value(row, col) == EMPTY)
            .map(|(row, col)| RuleViolation::EmptyCell { row, col })
            .collect();

        for row in 0..size {
            violations.extend(
                duplicates(size, (0..size).map(|col| board.value(row, col)))
                    .map(|digit| RuleViolation::DuplicateInRow { row, digit }),
            );
        }
        for col in 0..size {
            violations.extend(
                duplicates(size, (0..size).map(|row| board.value(row, col)))
                    .map(|digit| RuleViolation::DuplicateInColumn { col, digit }),
            );
        }
        for index in 0..size {
            violations.extend(
                duplicates(size, board.box_coordinates(index).map(|(r, c)| board.value(r, c)))
                    .map(|digit| RuleViolation::DuplicateInBox { index, digit }),
            );
        }

        violations
    }
}

/// Digits occurring more than once among `values`, ascending; empty cells are ignored
fn duplicates(size: usize, values: impl Iterator<Item = usize>) -> impl Iterator<Item = usize> {
    let mut seen = vec![0usize; size + 1];
    for value in values.filter(|&v| v != EMPTY) {
        seen[value] += 1;
    }
    (1..=size).filter(move |&digit| seen[digit] > 1)
}

impl ValidationResult {
    fn from_violations(violations: Vec<RuleViolation>) -> Self {
        let error_message = if violations.is_empty() {
            None
        } else {
            Some(
                violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        };

        Self {
            is_valid: violations.is_empty(),
            violations,
            error_message,
        }
    }
}
