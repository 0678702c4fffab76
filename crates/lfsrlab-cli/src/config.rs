//! Experiment configuration.
//!
//! Defaults reproduce the reference experiment: three degree-19 registers,
//! 100 000 bits each, the battery's default parameters and a 20 000-bit
//! prefix for Berlekamp-Massey. A JSON file passed with `--config` may
//! override any subset of fields; command-line flags override both.

use std::path::Path;

use lfsrlab_core::LfsrConfig;
use lfsrlab_tests::{BatteryConfig, MAX_PATTERN_BITS};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Taps and fixed initial state of one register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSpec {
    pub taps: Vec<usize>,
    pub state: Vec<u8>,
}

impl RegisterSpec {
    fn new(taps: &[usize], state: &[u8]) -> Self {
        Self {
            taps: taps.to_vec(),
            state: state.to_vec(),
        }
    }

    /// Register degree, the highest tap.
    pub fn degree(&self) -> usize {
        self.taps.iter().copied().max().unwrap_or(0)
    }

    /// Validated configuration using the fixed initial state.
    pub fn to_config(&self, index: usize) -> Result<LfsrConfig, CliError> {
        self.with_state(index, &self.state)
    }

    /// Validated configuration with a replacement initial state.
    pub fn with_state(&self, index: usize, state: &[u8]) -> Result<LfsrConfig, CliError> {
        LfsrConfig::from_taps(&self.taps, state)
            .map_err(|source| CliError::Register { index, source })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Bits drawn from each register.
    pub bits: usize,
    /// Repetitions for `multi`.
    pub reps: usize,
    /// Seed for the random initial states of `multi`.
    pub seed: u64,
    /// Significance level: a p-value passes when `p >= alpha`.
    pub alpha: f64,
    /// Bits fed to Berlekamp-Massey; 0 means the whole sequence.
    pub bm_prefix: usize,
    /// Registers L1, L2, L3.
    pub registers: Vec<RegisterSpec>,
    pub battery: BatteryConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            bits: 100_000,
            reps: 5,
            seed: 12345,
            alpha: 0.01,
            bm_prefix: 20_000,
            registers: vec![
                RegisterSpec::new(
                    &[19, 5, 1],
                    &[1, 0, 0, 0, 1, 0, 1, 1, 0, 1, 1, 1, 0, 1, 1, 0, 1, 0, 1],
                ),
                RegisterSpec::new(
                    &[19, 6, 2],
                    &[1, 1, 0, 1, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1],
                ),
                RegisterSpec::new(
                    &[19, 9, 1],
                    &[1, 0, 1, 1, 1, 0, 0, 0, 1, 1, 0, 1, 0, 1, 0, 1, 1, 1, 0],
                ),
            ],
            battery: BatteryConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load from a JSON file; absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        let config: Self = serde_json::from_str(&text).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Defaults, or the file at `path` when given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Check the fields used when testing a single sequence: the battery
    /// parameters and `alpha`.
    pub fn validate_analysis(&self) -> Result<(), CliError> {
        let battery = &self.battery;
        if battery.block_size == 0 {
            return Err(CliError::Config(
                "battery.block_size must be positive".to_string(),
            ));
        }
        if !(1..MAX_PATTERN_BITS).contains(&battery.apen_m) {
            return Err(CliError::Config(format!(
                "battery.apen_m must lie in 1..={}, got {}",
                MAX_PATTERN_BITS - 1,
                battery.apen_m
            )));
        }
        if !(2..=MAX_PATTERN_BITS).contains(&battery.serial_m) {
            return Err(CliError::Config(format!(
                "battery.serial_m must lie in 2..={MAX_PATTERN_BITS}, got {}",
                battery.serial_m
            )));
        }
        if !(6..=16).contains(&battery.maurer_l) {
            return Err(CliError::Config(format!(
                "battery.maurer_l must lie in 6..=16, got {}",
                battery.maurer_l
            )));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(CliError::Config(format!(
                "alpha must lie in (0, 1), got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// Check every field the experiment relies on.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.registers.len() != 3 {
            return Err(CliError::Config(format!(
                "expected 3 registers, found {}",
                self.registers.len()
            )));
        }
        for (i, reg) in self.registers.iter().enumerate() {
            reg.to_config(i + 1)?;
        }
        if self.bits == 0 {
            return Err(CliError::Config("bits must be positive".to_string()));
        }
        if self.reps == 0 {
            return Err(CliError::Config("reps must be positive".to_string()));
        }
        self.validate_analysis()
    }
}

/// Command-line values that take precedence over the loaded configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub bits: Option<usize>,
    pub reps: Option<usize>,
    pub seed: Option<u64>,
    pub alpha: Option<f64>,
    pub bm_prefix: Option<usize>,
}

impl Overrides {
    pub fn apply(&self, config: &mut ExperimentConfig) {
        if let Some(bits) = self.bits {
            config.bits = bits;
        }
        if let Some(reps) = self.reps {
            config.reps = reps;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(prefix) = self.bm_prefix {
            config.bm_prefix = prefix;
        }
    }
}
