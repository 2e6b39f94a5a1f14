//! Configuration management for the obstacle removal solver

pub mod settings;

pub use settings::{
    CliOverrides, InputConfig, LoggingConfig, OutputConfig, OutputFormat, Settings, SolverBackend,
    SolverConfig,
};
