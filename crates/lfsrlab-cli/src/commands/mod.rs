pub mod analyze;
pub mod multi;
pub mod run;

use std::path::Path;

use lfsrlab_core::LfsrConfig;

use crate::config::{ExperimentConfig, Overrides};
use crate::error::CliError;

fn load_with_overrides(
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<ExperimentConfig, CliError> {
    let mut config = ExperimentConfig::load_or_default(config_path)?;
    overrides.apply(&mut config);
    Ok(config)
}

/// Load the configuration file (if any), apply flag overrides and validate
/// the full experiment.
pub fn resolve_config(
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<ExperimentConfig, CliError> {
    let config = load_with_overrides(config_path, overrides)?;
    config.validate()?;
    Ok(config)
}

/// Like [`resolve_config`], but only the battery parameters and `alpha` are
/// checked; `analyze` never builds registers.
pub fn resolve_analysis_config(
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<ExperimentConfig, CliError> {
    let config = load_with_overrides(config_path, overrides)?;
    config.validate_analysis()?;
    Ok(config)
}

/// Register configurations using the fixed initial states.
pub fn fixed_registers(config: &ExperimentConfig) -> Result<Vec<LfsrConfig>, CliError> {
    config
        .registers
        .iter()
        .enumerate()
        .map(|(i, reg)| reg.to_config(i + 1))
        .collect()
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(dir).map_err(|e| CliError::io(dir, e))
}
