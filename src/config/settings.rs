//! Configuration settings for the Sudoku SAT solver

use crate::sat::external::CNF_PLACEHOLDER;
use crate::sat::PairStrategy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub solver: SolverConfig,
    pub encoding: EncodingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    pub timeout_seconds: u64,
    /// Executable of the external solver
    pub command: String,
    /// Argument template; `{cnf}` and `{result}` are replaced by paths
    pub args: Vec<String>,
    /// Keep the last CNF file at this path instead of a temporary file
    pub keep_cnf: Option<PathBuf>,
    /// Directory for temporary solver files, the system temp directory if unset
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    External,
    Cadical,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    pub pair_strategy: PairStrategy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Digit string plus the board in matrix form
    #[default]
    Text,
    /// Matrix form only
    Board,
    Json,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::External,
            timeout_seconds: 60,
            command: "minisat".to_string(),
            args: vec!["{cnf}".to_string(), "{result}".to_string()],
            keep_cnf: None,
            scratch_dir: None,
        }
    }
}

impl SolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.timeout_seconds == 0 {
            anyhow::bail!("Solver timeout must be positive");
        }

        if self.solver.backend == SolverBackend::External {
            if self.solver.command.trim().is_empty() {
                anyhow::bail!("External solver command must not be empty");
            }
            if !self.solver.args.iter().any(|arg| arg.contains(CNF_PLACEHOLDER)) {
                anyhow::bail!("External solver arguments must reference {}", CNF_PLACEHOLDER);
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(backend) = cli_overrides.backend {
            self.solver.backend = backend;
        }
        if let Some(timeout_seconds) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = timeout_seconds;
        }
        if let Some(ref command) = cli_overrides.command {
            self.solver.command = command.clone();
        }
        if let Some(ref keep_cnf) = cli_overrides.keep_cnf {
            self.solver.keep_cnf = Some(keep_cnf.clone());
        }
        if let Some(pair_strategy) = cli_overrides.pair_strategy {
            self.encoding.pair_strategy = pair_strategy;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub backend: Option<SolverBackend>,
    pub timeout_seconds: Option<u64>,
    pub command: Option<String>,
    pub keep_cnf: Option<PathBuf>,
    pub pair_strategy: Option<PairStrategy>,
    pub format: Option<OutputFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.solver.backend, SolverBackend::External);
        assert_eq!(settings.solver.timeout(), Duration::from_secs(60));
        assert_eq!(settings.encoding.pair_strategy, PairStrategy::Minimal);
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.solver.backend = SolverBackend::Cadical;
        settings.encoding.pair_strategy = PairStrategy::Strict;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.solver.backend, SolverBackend::Cadical);
        assert_eq!(loaded.encoding.pair_strategy, PairStrategy::Strict);
        assert_eq!(loaded.solver.args, settings.solver.args);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("solver:\n  command: glucose\n").unwrap();
        assert_eq!(settings.solver.command, "glucose");
        assert_eq!(settings.solver.timeout_seconds, 60);
        assert_eq!(settings.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings::default();
        settings.solver.timeout_seconds = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.solver.args = vec!["{result}".to_string()];
        assert!(settings.validate().is_err());

        // the in-process backend ignores the command
        settings.solver.backend = SolverBackend::Cadical;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            backend: Some(SolverBackend::Cadical),
            timeout_seconds: Some(5),
            format: Some(OutputFormat::Json),
            ..Default::default()
        });
        assert_eq!(settings.solver.backend, SolverBackend::Cadical);
        assert_eq!(settings.solver.timeout_seconds, 5);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert_eq!(settings.solver.command, "minisat");
    }
}
