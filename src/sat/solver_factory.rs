//! Factory for creating SAT solver instances based on configuration

use super::cadical_solver::CadicalSolver;
use super::constraints::Theory;
use super::external::ExternalSolver;
use super::solver::{SatSolver, SolveOutcome};
use crate::config::{SolverBackend, SolverConfig};
use crate::error::Result;

/// Unified SAT solver interface that can use different backends
#[derive(Debug, Clone)]
pub enum UnifiedSatSolver {
    External(ExternalSolver),
    Cadical(CadicalSolver),
}

impl UnifiedSatSolver {
    /// Create a new solver instance based on the configured backend
    pub fn from_config(config: &SolverConfig) -> Self {
        match config.backend {
            SolverBackend::External => {
                let mut solver = ExternalSolver::new(config.command.clone(), config.timeout())
                    .with_args(config.args.iter().cloned());
                if let Some(path) = &config.keep_cnf {
                    solver = solver.keep_cnf(path);
                }
                if let Some(dir) = &config.scratch_dir {
                    solver = solver.with_scratch_dir(dir);
                }
                UnifiedSatSolver::External(solver)
            }
            SolverBackend::Cadical => {
                UnifiedSatSolver::Cadical(CadicalSolver::with_timeout(config.timeout()))
            }
        }
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedSatSolver::External(_) => SolverBackend::External,
            UnifiedSatSolver::Cadical(_) => SolverBackend::Cadical,
        }
    }
}

impl SatSolver for UnifiedSatSolver {
    fn name(&self) -> &'static str {
        match self {
            UnifiedSatSolver::External(solver) => solver.name(),
            UnifiedSatSolver::Cadical(solver) => solver.name(),
        }
    }

    fn solve(&mut self, theory: &Theory) -> Result<SolveOutcome> {
        match self {
            UnifiedSatSolver::External(solver) => solver.solve(theory),
            UnifiedSatSolver::Cadical(solver) => solver.solve(theory),
        }
    }
}

impl Default for UnifiedSatSolver {
    fn default() -> Self {
        UnifiedSatSolver::from_config(&SolverConfig::default())
    }
}
