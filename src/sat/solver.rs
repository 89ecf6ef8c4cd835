//! Solver capability shared by all SAT backends

use super::constraints::Theory;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// A satisfying assignment returned by a solver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    pub assignment: HashMap<i32, bool>,
}

impl Model {
    pub fn from_assignment(assignment: HashMap<i32, bool>) -> Self {
        Self { assignment }
    }

    /// Build a model from signed literals; a positive literal sets its variable true
    pub fn from_literals(literals: impl IntoIterator<Item = i32>) -> Result<Self> {
        let mut assignment = HashMap::new();
        for literal in literals {
            let var = literal.abs();
            let value = literal > 0;
            if let Some(previous) = assignment.insert(var, value) {
                if previous != value {
                    return Err(Error::SolverOutput(format!(
                        "variable {var} is assigned both true and false"
                    )));
                }
            }
        }
        Ok(Self { assignment })
    }

    pub fn value(&self, var: i32) -> Option<bool> {
        self.assignment.get(&var).copied()
    }

    /// Whether `var` is assigned true; unassigned variables count as false
    pub fn is_true(&self, var: i32) -> bool {
        self.value(var).unwrap_or(false)
    }

    /// Variables assigned true, ascending
    pub fn true_variables(&self) -> Vec<i32> {
        let mut vars: Vec<_> = self
            .assignment
            .iter()
            .filter(|(_, value)| **value)
            .map(|(&var, _)| var)
            .collect();
        vars.sort_unstable();
        vars
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }
}

/// Verdict of a single solver call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Sat(Model),
    Unsat,
    /// The solver exceeded its time bound and was stopped
    TimedOut(Duration),
}

impl SolveOutcome {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolveOutcome::Sat(_))
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveOutcome::Sat(model) => write!(f, "SAT ({} variables assigned)", model.len()),
            SolveOutcome::Unsat => write!(f, "UNSAT"),
            SolveOutcome::TimedOut(limit) => write!(f, "timed out after {:.3}s", limit.as_secs_f64()),
        }
    }
}

/// Anything that can decide a CNF theory
///
/// Each call solves the theory as given, from scratch; implementations keep
/// no clauses between calls.
pub trait SatSolver {
    /// Short backend name used in logs
    fn name(&self) -> &'static str;

    fn solve(&mut self, theory: &Theory) -> Result<SolveOutcome>;
}

impl<S: SatSolver + ?Sized> SatSolver for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&mut self, theory: &Theory) -> Result<SolveOutcome> {
        (**self).solve(theory)
    }
}
