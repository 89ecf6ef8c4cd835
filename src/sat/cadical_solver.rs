//! In-process SAT backend using CaDiCaL

use super::constraints::Theory;
use super::solver::{Model, SatSolver, SolveOutcome};
use crate::error::{Error, Result};
use cadical::{Solver, Timeout};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// SAT solver wrapper for CaDiCaL
///
/// A fresh CaDiCaL instance is built for every call, so the theory passed in
/// is the only input the verdict depends on.
#[derive(Debug, Clone, Default)]
pub struct CadicalSolver {
    timeout: Option<Duration>,
}

impl CadicalSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Create a solver that gives up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout: Some(timeout) }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Extract variable assignment from the solver
    fn extract_assignment(solver: &Solver<Timeout>, variable_count: usize) -> HashMap<i32, bool> {
        let mut assignment = HashMap::new();

        for var in 1..=variable_count as i32 {
            if let Some(value) = solver.value(var) {
                assignment.insert(var, value);
            }
        }

        assignment
    }
}

impl SatSolver for CadicalSolver {
    fn name(&self) -> &'static str {
        "cadical"
    }

    fn solve(&mut self, theory: &Theory) -> Result<SolveOutcome> {
        let mut solver: Solver<Timeout> = Solver::new();
        if let Some(timeout) = self.timeout {
            solver.set_callbacks(Some(Timeout::new(timeout.as_secs_f32())));
        }

        for clause in theory.clauses() {
            if clause.is_empty() {
                // the empty clause is false under every assignment
                return Ok(SolveOutcome::Unsat);
            }
            solver.add_clause(clause.literals.iter().copied());
        }

        debug!(clauses = theory.len(), variables = theory.variable_count(), "running cadical");
        let start_time = Instant::now();
        let result = solver.solve();
        let solve_time = start_time.elapsed();

        let outcome = match result {
            Some(true) => SolveOutcome::Sat(Model::from_assignment(Self::extract_assignment(
                &solver,
                theory.variable_count(),
            ))),
            Some(false) => SolveOutcome::Unsat,
            None => match self.timeout {
                Some(timeout) => SolveOutcome::TimedOut(timeout),
                None => {
                    return Err(Error::SolverProcess(
                        "cadical stopped without a verdict".to_string(),
                    ))
                }
            },
        };

        info!(
            backend = self.name(),
            solve_time_ms = solve_time.as_millis() as u64,
            "{outcome}"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{Clause, VariableEncoder};

    fn theory_of(size: usize, clauses: Vec<Clause>) -> Theory {
        let mut theory = Theory::new(VariableEncoder::new(size));
        theory.extend(clauses);
        theory
    }

    #[test]
    fn test_simple_satisfiable() {
        let mut solver = CadicalSolver::new();

        // x1 ∨ x2, ¬x1 ∨ x2
        let theory = theory_of(2, vec![Clause::new(vec![1, 2]), Clause::new(vec![-1, 2])]);

        let SolveOutcome::Sat(model) = solver.solve(&theory).unwrap() else {
            panic!("expected SAT");
        };
        // x2 should be true to satisfy both clauses
        assert_eq!(model.value(2), Some(true));
    }

    #[test]
    fn test_unsatisfiable() {
        let mut solver = CadicalSolver::new();
        let theory = theory_of(1, vec![Clause::unit(1), Clause::unit(-1)]);
        assert_eq!(solver.solve(&theory).unwrap(), SolveOutcome::Unsat);
    }

    #[test]
    fn test_empty_clause_is_unsat() {
        let mut solver = CadicalSolver::new();
        let theory = theory_of(1, vec![Clause::unit(1), Clause::new(vec![])]);
        assert_eq!(solver.solve(&theory).unwrap(), SolveOutcome::Unsat);
    }

    #[test]
    fn test_calls_are_independent() {
        let mut solver = CadicalSolver::with_timeout(Duration::from_secs(10));
        let unsat = theory_of(1, vec![Clause::unit(1), Clause::unit(-1)]);
        let sat = theory_of(1, vec![Clause::unit(1)]);

        assert_eq!(solver.solve(&unsat).unwrap(), SolveOutcome::Unsat);
        assert!(solver.solve(&sat).unwrap().is_sat());
    }
}
