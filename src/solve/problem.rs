//! Sudoku problem definition: solving and counting a single puzzle

use super::enumerator::{EnumerationReport, SolutionEnumerator};
use super::{Solution, SolutionValidator};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::sat::{
    ModelDecoder, SatSolver, SolveOutcome, Theory, TheoryGenerator, TheoryStatistics,
    UnifiedSatSolver,
};
use crate::sudoku::{load_board_from_file, Board};
use anyhow::Context;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

/// A puzzle together with the settings used to solve it
pub struct SudokuProblem {
    puzzle: Board,
    settings: Settings,
    generator: TheoryGenerator,
    validator: SolutionValidator,
}

/// Outcome of looking for a single solution
#[derive(Debug, Clone)]
pub enum SolveResult {
    Solved(Solution),
    /// The puzzle has no solution
    Unsatisfiable,
    /// The solver gave up; nothing is known about the puzzle
    TimedOut(Duration),
}

impl SudokuProblem {
    pub fn new(puzzle: Board, settings: Settings) -> Self {
        let generator = TheoryGenerator::new(settings.encoding.pair_strategy);
        Self {
            puzzle,
            settings,
            generator,
            validator: SolutionValidator::new(),
        }
    }

    /// Load the puzzle from a board file
    pub fn from_file<P: AsRef<Path>>(path: P, settings: Settings) -> anyhow::Result<Self> {
        let puzzle = load_board_from_file(&path).context("Failed to load puzzle")?;
        Ok(Self::new(puzzle, settings))
    }

    pub fn puzzle(&self) -> &Board {
        &self.puzzle
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The CNF theory of the puzzle
    pub fn theory(&self) -> Theory {
        self.generator.generate(&self.puzzle)
    }

    pub fn encoding_statistics(&self) -> TheoryStatistics {
        self.generator.generate_with_statistics(&self.puzzle).1
    }

    /// Find one solution with the configured backend
    pub fn solve(&self) -> Result<SolveResult> {
        let mut solver = UnifiedSatSolver::from_config(&self.settings.solver);
        self.solve_with(&mut solver)
    }

    /// Find one solution with an explicit solver
    pub fn solve_with<S: SatSolver + ?Sized>(&self, solver: &mut S) -> Result<SolveResult> {
        let start_time = Instant::now();
        let theory = self.theory();

        let outcome = solver.solve(&theory)?;
        let solve_time = start_time.elapsed();
        info!(backend = solver.name(), solve_time_ms = solve_time.as_millis() as u64, "{outcome}");

        match outcome {
            SolveOutcome::Sat(model) => {
                let board = ModelDecoder::new(self.puzzle.size()).decode(&model)?;
                self.check(&board)?;
                Ok(SolveResult::Solved(Solution::new(
                    self.puzzle.clone(),
                    board,
                    1,
                    solve_time,
                )))
            }
            SolveOutcome::Unsat => Ok(SolveResult::Unsatisfiable),
            SolveOutcome::TimedOut(limit) => Ok(SolveResult::TimedOut(limit)),
        }
    }

    /// Count all solutions with the configured backend
    pub fn count_solutions(&self) -> Result<EnumerationReport> {
        let mut solver = UnifiedSatSolver::from_config(&self.settings.solver);
        self.count_solutions_with(&mut solver)
    }

    /// Count all solutions with an explicit solver
    ///
    /// Every solution is validated on the way; the count is returned only
    /// once the enumeration is exhausted.
    pub fn count_solutions_with<S: SatSolver + ?Sized>(
        &self,
        solver: &mut S,
    ) -> Result<EnumerationReport> {
        let mut enumerator = SolutionEnumerator::new(solver, self.theory());
        let report = enumerator.run(|board| self.check(board))?;
        info!(count = report.count, elapsed_ms = report.elapsed.as_millis() as u64, "counted solutions");
        Ok(report)
    }

    fn check(&self, board: &Board) -> Result<()> {
        let result = self.validator.validate(&self.puzzle, board);
        if result.is_valid {
            Ok(())
        } else {
            Err(Error::InvalidSolution(
                result.error_message.unwrap_or_default(),
            ))
        }
    }
}

impl SolveResult {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveResult::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}
