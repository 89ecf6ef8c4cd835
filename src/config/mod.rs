//! Configuration management for the Sudoku SAT solver

pub mod settings;

pub use settings::{
    CliOverrides, EncodingConfig, OutputConfig, OutputFormat, Settings, SolverBackend, SolverConfig,
};
