//! Configuration settings for the obstacle removal solver

use crate::map::PathType;
use crate::sat::SolverOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub solver: SolverConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub paths: Vec<PathType>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Per oracle call; 0 disables the limit.
    pub timeout_seconds: u64,
    /// Solve the requested paths concurrently.
    pub parallel_paths: bool,
    pub max_exhaustive_variables: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    Cadical,
    Exhaustive,
}

impl FromStr for SolverBackend {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "cadical" => Ok(SolverBackend::Cadical),
            "exhaustive" => Ok(SolverBackend::Exhaustive),
            other => Err(format!("unknown backend '{}', expected cadical or exhaustive", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub map_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub result_directory: PathBuf,
    /// Render the map and every result after solving.
    pub graph: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `obstacle_removal_sat=debug`.
    pub level: String,
    /// Truncated at startup; `None` logs to stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            solver: SolverConfig {
                backend: SolverBackend::Cadical,
                timeout_seconds: 0,
                parallel_paths: false,
                max_exhaustive_variables: SolverOptions::default().max_exhaustive_variables,
            },
            input: InputConfig {
                map_file: PathBuf::from("mapData/example.csv"),
            },
            output: OutputConfig {
                format: OutputFormat::Csv,
                result_directory: PathBuf::from("resultData"),
                graph: false,
            },
            paths: PathType::ALL.to_vec(),
            logging: LoggingConfig {
                level: "info".to_string(),
                log_file: Some(PathBuf::from("info.log")),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

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
        if self.paths.is_empty() {
            anyhow::bail!("At least one path type must be requested");
        }

        if self.solver.max_exhaustive_variables == 0 || self.solver.max_exhaustive_variables > 32 {
            anyhow::bail!(
                "max_exhaustive_variables must be between 1 and 32, got {}",
                self.solver.max_exhaustive_variables
            );
        }

        if !self.input.map_file.exists() {
            anyhow::bail!("Obstacle map file does not exist: {}", self.input.map_file.display());
        }

        Ok(())
    }

    /// Oracle options derived from the solver section
    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            timeout: (self.solver.timeout_seconds > 0)
                .then(|| Duration::from_secs(self.solver.timeout_seconds)),
            max_exhaustive_variables: self.solver.max_exhaustive_variables,
        }
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref map_file) = cli_overrides.map_file {
            self.input.map_file = map_file.clone();
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.result_directory = output_dir.clone();
        }
        if let Some(backend) = cli_overrides.backend {
            self.solver.backend = backend;
        }
        if let Some(timeout_seconds) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = timeout_seconds;
        }
        if cli_overrides.graph {
            self.output.graph = true;
        }
        if cli_overrides.parallel {
            self.solver.parallel_paths = true;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub map_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub backend: Option<SolverBackend>,
    pub timeout_seconds: Option<u64>,
    pub graph: bool,
    pub parallel: bool,
}
