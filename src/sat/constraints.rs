//! Constraint generation for the Sudoku SAT encoding

use super::VariableEncoder;
use crate::sudoku::Board;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// At-most-one-of-two: neither both `a` nor both `b`
    pub fn not_both(a: i32, b: i32) -> Self {
        Self::binary(-a, -b)
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// Whether the clause has a true literal under `value`
    pub fn is_satisfied_by(&self, value: impl Fn(i32) -> bool) -> bool {
        self.literals
            .iter()
            .any(|&lit| value(lit.abs()) == (lit > 0))
    }
}

/// How the box stage enumerates its cell pairs
///
/// Row and column stages always pair each cell with the cells at a strictly
/// greater index, so no stage emits both `(a, b)` and `(b, a)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PairStrategy {
    /// Every pair of distinct cells in a box, including pairs that share a
    /// row or column with each other
    Strict,
    /// Only box pairs that share neither row nor column; the others are
    /// already emitted by the row and column stages
    #[default]
    Minimal,
}

/// A CNF theory over the variables of one board
///
/// Clause order is the order of insertion, which keeps serialization stable.
#[derive(Debug, Clone)]
pub struct Theory {
    encoder: VariableEncoder,
    clauses: Vec<Clause>,
    index: HashSet<Clause>,
}

impl Theory {
    pub fn new(encoder: VariableEncoder) -> Self {
        Self {
            encoder,
            clauses: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// Append a clause unconditionally
    pub fn push(&mut self, clause: Clause) {
        self.index.insert(clause.clone());
        self.clauses.push(clause);
    }

    /// Append a clause unless an identical one is present; returns whether it was added
    pub fn insert(&mut self, clause: Clause) -> bool {
        if self.index.contains(&clause) {
            return false;
        }
        self.push(clause);
        true
    }

    pub fn contains(&self, clause: &Clause) -> bool {
        self.index.contains(clause)
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn encoder(&self) -> VariableEncoder {
        self.encoder
    }

    /// Declared variable count, N³ for every theory of an N×N board
    pub fn variable_count(&self) -> usize {
        self.encoder.variable_count()
    }

    /// Whether every clause holds under `value`
    pub fn is_satisfied_by(&self, value: impl Fn(i32) -> bool) -> bool {
        self.clauses.iter().all(|clause| clause.is_satisfied_by(&value))
    }
}

impl Extend<Clause> for Theory {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        iter.into_iter().for_each(|clause| self.push(clause));
    }
}

/// Generates the clause set for a Sudoku board
#[derive(Debug, Clone, Default)]
pub struct TheoryGenerator {
    strategy: PairStrategy,
}

impl TheoryGenerator {
    pub fn new(strategy: PairStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> PairStrategy {
        self.strategy
    }

    /// Generate all constraints for `board`
    pub fn generate(&self, board: &Board) -> Theory {
        let (theory, _) = self.generate_with_statistics(board);
        theory
    }

    /// Generate all constraints for `board`, counting clauses per family
    pub fn generate_with_statistics(&self, board: &Board) -> (Theory, TheoryStatistics) {
        let encoder = VariableEncoder::new(board.size());
        let mut theory = Theory::new(encoder);

        // 1. Existence, or the given digit
        let existence = self.generate_existence_constraints(board, &encoder);
        let givens = board.givens().count();
        let stats_existence = existence.len() - givens;
        theory.extend(existence);

        // 2. At most one digit per cell
        let cell = self.generate_cell_constraints(board, &encoder);
        let stats_cell = cell.len();
        theory.extend(cell);

        // 3. Each digit at most once per row, column and box
        let rows = self.generate_row_constraints(board, &encoder);
        let stats_rows = rows.len();
        theory.extend(rows);

        let columns = self.generate_column_constraints(board, &encoder);
        let stats_columns = columns.len();
        theory.extend(columns);

        let boxes = self.generate_box_constraints(board, &encoder);
        let stats_boxes = boxes.len();
        theory.extend(boxes);

        let statistics = TheoryStatistics {
            size: board.size(),
            variables: theory.variable_count(),
            givens,
            existence: stats_existence,
            cell_uniqueness: stats_cell,
            row_uniqueness: stats_rows,
            column_uniqueness: stats_columns,
            box_uniqueness: stats_boxes,
            total: theory.len(),
        };

        debug!(
            size = board.size(),
            strategy = ?self.strategy,
            clauses = statistics.total,
            variables = statistics.variables,
            "generated theory"
        );

        (theory, statistics)
    }

    /// Unit clause for a given cell, otherwise "at least one digit"
    fn generate_existence_constraints(&self, board: &Board, encoder: &VariableEncoder) -> Vec<Clause> {
        board
            .all_coordinates()
            .map(|(row, col)| {
                if board.is_given(row, col) {
                    Clause::unit(encoder.encode(row, col, board.value(row, col)))
                } else {
                    Clause::new(encoder.cell_variables(row, col).collect())
                }
            })
            .collect()
    }

    fn generate_cell_constraints(&self, board: &Board, encoder: &VariableEncoder) -> Vec<Clause> {
        let mut clauses = Vec::new();

        for (row, col) in board.all_coordinates() {
            for (k, k2) in (1..=board.size()).tuple_combinations() {
                clauses.push(Clause::not_both(
                    encoder.encode(row, col, k),
                    encoder.encode(row, col, k2),
                ));
            }
        }

        clauses
    }

    fn generate_row_constraints(&self, board: &Board, encoder: &VariableEncoder) -> Vec<Clause> {
        let size = board.size();
        let mut clauses = Vec::new();

        for row in 0..size {
            for digit in 1..=size {
                for (col, col2) in (0..size).tuple_combinations() {
                    clauses.push(Clause::not_both(
                        encoder.encode(row, col, digit),
                        encoder.encode(row, col2, digit),
                    ));
                }
            }
        }

        clauses
    }

    fn generate_column_constraints(&self, board: &Board, encoder: &VariableEncoder) -> Vec<Clause> {
        let size = board.size();
        let mut clauses = Vec::new();

        for col in 0..size {
            for digit in 1..=size {
                for (row, row2) in (0..size).tuple_combinations() {
                    clauses.push(Clause::not_both(
                        encoder.encode(row, col, digit),
                        encoder.encode(row2, col, digit),
                    ));
                }
            }
        }

        clauses
    }

    fn generate_box_constraints(&self, board: &Board, encoder: &VariableEncoder) -> Vec<Clause> {
        let size = board.size();
        let mut clauses = Vec::new();

        for index in 0..size {
            let cells: Vec<_> = board.box_coordinates(index).collect();
            for digit in 1..=size {
                for (&(r, c), &(r2, c2)) in cells.iter().tuple_combinations() {
                    if self.strategy == PairStrategy::Minimal && (r == r2 || c == c2) {
                        continue;
                    }
                    clauses.push(Clause::not_both(
                        encoder.encode(r, c, digit),
                        encoder.encode(r2, c2, digit),
                    ));
                }
            }
        }

        clauses
    }
}

/// Clause counts of a generated theory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TheoryStatistics {
    pub size: usize,
    pub variables: usize,
    pub givens: usize,
    pub existence: usize,
    pub cell_uniqueness: usize,
    pub row_uniqueness: usize,
    pub column_uniqueness: usize,
    pub box_uniqueness: usize,
    pub total: usize,
}

impl fmt::Display for TheoryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Board: {0}x{0}", self.size)?;
        writeln!(f, "  Variables: {}", self.variables)?;
        writeln!(f, "  Given cells: {}", self.givens)?;
        writeln!(f, "  Existence clauses: {}", self.existence)?;
        writeln!(f, "  Cell uniqueness clauses: {}", self.cell_uniqueness)?;
        writeln!(f, "  Row uniqueness clauses: {}", self.row_uniqueness)?;
        writeln!(f, "  Column uniqueness clauses: {}", self.column_uniqueness)?;
        writeln!(f, "  Box uniqueness clauses: {}", self.box_uniqueness)?;
        writeln!(f, "  Total clauses: {}", self.total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_board(size: usize) -> Board {
        Board::empty(size).unwrap()
    }

    #[test]
    fn test_clause_counts_strict_4x4() {
        let generator = TheoryGenerator::new(PairStrategy::Strict);
        let (theory, stats) = generator.generate_with_statistics(&empty_board(4));

        assert_eq!(stats.existence, 16);
        assert_eq!(stats.givens, 0);
        assert_eq!(stats.cell_uniqueness, 16 * 6);
        assert_eq!(stats.row_uniqueness, 4 * 4 * 6);
        assert_eq!(stats.column_uniqueness, 4 * 4 * 6);
        assert_eq!(stats.box_uniqueness, 4 * 4 * 6);
        assert_eq!(theory.len(), 400);
        assert_eq!(stats.total, 400);
        assert_eq!(theory.variable_count(), 64);
    }

    #[test]
    fn test_clause_counts_minimal_9x9() {
        let generator = TheoryGenerator::new(PairStrategy::Minimal);
        let (_, stats) = generator.generate_with_statistics(&empty_board(9));

        assert_eq!(stats.existence, 81);
        assert_eq!(stats.cell_uniqueness, 81 * 36);
        assert_eq!(stats.row_uniqueness, 81 * 36);
        assert_eq!(stats.column_uniqueness, 81 * 36);
        // 36 pairs per box, minus 9 sharing a row and 9 sharing a column
        assert_eq!(stats.box_uniqueness, 81 * 18);
        assert_eq!(stats.total, 81 + 3 * 2916 + 1458);
    }

    #[test]
    fn test_minimal_theory_has_no_duplicate_clauses() {
        let theory = TheoryGenerator::new(PairStrategy::Minimal).generate(&empty_board(9));
        let unique: HashSet<_> = theory.clauses().iter().collect();
        assert_eq!(unique.len(), theory.len());
    }

    #[test]
    fn test_strict_box_pairs_overlap_rows() {
        let theory = TheoryGenerator::new(PairStrategy::Strict).generate(&empty_board(4));
        let unique: HashSet<_> = theory.clauses().iter().collect();
        // each 2x2 box has 2 row pairs and 2 column pairs repeated per digit
        assert_eq!(theory.len() - unique.len(), 4 * 4 * 4);
    }

    #[test]
    fn test_no_pair_is_emitted_in_both_orders() {
        for strategy in [PairStrategy::Strict, PairStrategy::Minimal] {
            let theory = TheoryGenerator::new(strategy).generate(&empty_board(4));
            for clause in theory.clauses().iter().filter(|c| c.literals.len() == 2) {
                let (a, b) = (clause.literals[0], clause.literals[1]);
                assert!(a < 0 && b < 0);
                assert!(-a < -b, "pair {:?} is not strictly ordered", clause);
            }
        }
    }

    #[test]
    fn test_givens_become_unit_clauses() {
        let board = Board::parse("1000000000000004").unwrap();
        let (theory, stats) = TheoryGenerator::default().generate_with_statistics(&board);
        let encoder = theory.encoder();

        assert_eq!(stats.givens, 2);
        assert_eq!(stats.existence, 14);
        assert!(theory.contains(&Clause::unit(encoder.encode(0, 0, 1))));
        assert!(theory.contains(&Clause::unit(encoder.encode(3, 3, 4))));
        assert!(!theory.contains(&Clause::new(encoder.cell_variables(0, 0).collect())));
        assert!(theory.contains(&Clause::new(encoder.cell_variables(0, 1).collect())));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let board = Board::parse("1000000000000004").unwrap();
        let generator = TheoryGenerator::default();
        assert_eq!(
            generator.generate(&board).clauses(),
            generator.generate(&board).clauses()
        );
    }

    #[test]
    fn test_theory_insert_rejects_duplicates() {
        let mut theory = Theory::new(VariableEncoder::new(4));
        assert!(theory.insert(Clause::binary(1, -2)));
        assert!(!theory.insert(Clause::binary(1, -2)));
        assert!(theory.insert(Clause::binary(-2, 1)));
        assert_eq!(theory.len(), 2);
    }

    #[test]
    fn test_solved_board_satisfies_theory() {
        let board = Board::parse("1234341221434321").unwrap();
        let theory = TheoryGenerator::new(PairStrategy::Strict).generate(&board);
        let encoder = theory.encoder();

        let holds = |var: i32| {
            let cd = encoder.decode(var).unwrap();
            board.value(cd.row, cd.col) == cd.digit
        };
        assert!(theory.is_satisfied_by(holds));
    }

    #[test]
    fn test_single_cell_statistics() {
        let generator = TheoryGenerator::default();

        // the existence clause of an empty 1×1 cell is unit but is not a given
        let (theory, stats) = generator.generate_with_statistics(&Board::parse("0").unwrap());
        assert_eq!(stats.givens, 0);
        assert_eq!(stats.existence, 1);
        assert_eq!(theory.len(), 1);

        let (_, stats) = generator.generate_with_statistics(&Board::parse("1").unwrap());
        assert_eq!(stats.givens, 1);
        assert_eq!(stats.existence, 0);
    }

    #[test]
    fn test_clause_helpers() {
        assert!(Clause::unit(3).is_unit());
        assert!(Clause::new(vec![]).is_empty());
        assert_eq!(Clause::not_both(4, 7).literals, vec![-4, -7]);
        assert!(Clause::binary(1, -2).is_satisfied_by(|v| v == 1));
        assert!(!Clause::binary(1, -2).is_satisfied_by(|v| v == 2));
    }
}
