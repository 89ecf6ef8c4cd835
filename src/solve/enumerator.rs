//! Counting solutions by repeatedly blocking the last one found

use crate::error::{Error, Result};
use crate::sat::{ModelDecoder, PairStrategy, SatSolver, SolveOutcome, Theory, TheoryGenerator};
use crate::sudoku::Board;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Where the enumeration currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumerationState {
    /// The next solve has not happened yet
    Searching,
    /// A new solution was decoded and counted but is not blocked yet
    Found(Board),
    /// No further solutions exist; terminal
    Exhausted,
}

/// Final figures of an enumeration that reached [`EnumerationState::Exhausted`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumerationReport {
    pub count: usize,
    pub solver_calls: usize,
    pub final_clauses: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Enumerates the completions of a board one solver call at a time
///
/// Each found solution is excluded from later solves by appending its
/// blocking clause to the theory. A solver failure or timeout at any point
/// yields [`Error::EnumerationIncomplete`]; the count is only final once the
/// state is [`Exhausted`](EnumerationState::Exhausted).
pub struct SolutionEnumerator<'a, S: SatSolver + ?Sized> {
    solver: &'a mut S,
    theory: Theory,
    decoder: ModelDecoder,
    state: EnumerationState,
    count: usize,
    solver_calls: usize,
    started: Instant,
}

impl<'a, S: SatSolver + ?Sized> SolutionEnumerator<'a, S> {
    /// Start enumerating the models of an already generated theory
    pub fn new(solver: &'a mut S, theory: Theory) -> Self {
        let decoder = ModelDecoder::new(theory.encoder().size());
        Self {
            solver,
            theory,
            decoder,
            state: EnumerationState::Searching,
            count: 0,
            solver_calls: 0,
            started: Instant::now(),
        }
    }

    /// Generate the theory of `board` and start enumerating its completions
    pub fn for_board(solver: &'a mut S, board: &Board, strategy: PairStrategy) -> Self {
        Self::new(solver, TheoryGenerator::new(strategy).generate(board))
    }

    pub fn state(&self) -> &EnumerationState {
        &self.state
    }

    /// Solutions found so far
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == EnumerationState::Exhausted
    }

    /// The current theory, including every blocking clause added so far
    pub fn theory(&self) -> &Theory {
        &self.theory
    }

    /// Perform one state transition
    pub fn step(&mut self) -> Result<&EnumerationState> {
        match std::mem::replace(&mut self.state, EnumerationState::Searching) {
            EnumerationState::Searching => self.search()?,
            EnumerationState::Found(board) => self.block(&board),
            EnumerationState::Exhausted => self.state = EnumerationState::Exhausted,
        }
        Ok(&self.state)
    }

    /// Advance to the next solution, or `None` once the search space is exhausted
    pub fn next_solution(&mut self) -> Result<Option<Board>> {
        loop {
            match self.step()? {
                EnumerationState::Found(board) => return Ok(Some(board.clone())),
                EnumerationState::Exhausted => return Ok(None),
                EnumerationState::Searching => {}
            }
        }
    }

    /// Run to exhaustion, handing every solution to `visit`
    pub fn run<F>(&mut self, mut visit: F) -> Result<EnumerationReport>
    where
        F: FnMut(&Board) -> Result<()>,
    {
        while let Some(board) = self.next_solution()? {
            visit(&board)?;
        }
        self.report().ok_or_else(|| Error::EnumerationIncomplete {
            found: self.count,
            source: Box::new(Error::SolverProcess("enumeration ended early".to_string())),
        })
    }

    /// Run to exhaustion and report the number of solutions
    pub fn count_all(&mut self) -> Result<EnumerationReport> {
        self.run(|_| Ok(()))
    }

    /// The final report, available only after exhaustion
    pub fn report(&self) -> Option<EnumerationReport> {
        self.is_exhausted().then(|| EnumerationReport {
            count: self.count,
            solver_calls: self.solver_calls,
            final_clauses: self.theory.len(),
            elapsed: self.started.elapsed(),
        })
    }

    fn search(&mut self) -> Result<()> {
        self.solver_calls += 1;
        let outcome = self
            .solver
            .solve(&self.theory)
            .map_err(|source| self.incomplete(source))?;

        match outcome {
            SolveOutcome::Unsat => {
                info!(count = self.count, solver_calls = self.solver_calls, "enumeration exhausted");
                self.state = EnumerationState::Exhausted;
            }
            SolveOutcome::TimedOut(limit) => {
                return Err(self.incomplete(Error::TimedOut(limit)));
            }
            SolveOutcome::Sat(model) => {
                let board = self.decoder.decode(&model)?;
                if self.theory.contains(&self.decoder.blocking_clause(&board)) {
                    // blocking had no effect; stop instead of looping
                    warn!(count = self.count, "solver returned an already blocked solution");
                    self.state = EnumerationState::Exhausted;
                } else {
                    self.count += 1;
                    debug!(count = self.count, solution = %board, "found solution");
                    self.state = EnumerationState::Found(board);
                }
            }
        }
        Ok(())
    }

    fn block(&mut self, board: &Board) {
        if self.theory.insert(self.decoder.blocking_clause(board)) {
            self.state = EnumerationState::Searching;
        } else {
            warn!(count = self.count, "blocking clause already present");
            self.state = EnumerationState::Exhausted;
        }
    }

    fn incomplete(&self, source: Error) -> Error {
        warn!(found = self.count, "enumeration interrupted: {source}");
        Error::EnumerationIncomplete {
            found: self.count,
            source: Box::new(source),
        }
    }
}
