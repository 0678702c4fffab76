//! Library half of the `lfsrlab` binary: configuration, the experiment
//! pipeline, report writers and the subcommand implementations.

pub mod commands;
pub mod config;
pub mod error;
pub mod experiment;
pub mod report;

pub use config::{ExperimentConfig, Overrides, RegisterSpec};
pub use error::CliError;
pub use experiment::{CaseSummary, Evaluation, MetricSummary};
