//! Experiment pipeline: registers → combiners → solver + battery → aggregates.

use lfsrlab_core::{Lfsr, LfsrConfig, geffe, linear_complexity, majority, shrinking};
use lfsrlab_tests::{BatteryConfig, TestResult, run_battery};
use rand::Rng;
use serde::Serialize;

use crate::config::ExperimentConfig;
use crate::error::CliError;

/// Case names, in evaluation order.
pub const CASE_NAMES: [&str; 6] = [
    "L1",
    "L2",
    "L3",
    "shrink_L1_L2",
    "geffe_L1_L2_L3",
    "maj_L1_L2_L3",
];

/// Solver and battery output for one sequence.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub name: String,
    pub len: usize,
    pub linear_complexity: usize,
    pub results: Vec<TestResult>,
}

impl Evaluation {
    /// `(key, value)` pairs: length, linear complexity, then every p-value.
    pub fn metrics(&self) -> Vec<(String, f64)> {
        let mut metrics = vec![
            ("len".to_string(), self.len as f64),
            ("lin_complexity".to_string(), self.linear_complexity as f64),
        ];
        metrics.extend(
            self.results
                .iter()
                .map(|r| (r.id.clone(), r.p_value.value())),
        );
        metrics
    }
}

/// Linear complexity of the first `prefix` bits (all bits when `prefix` is 0)
/// and the full battery on the whole sequence.
pub fn evaluate(name: &str, bits: &[u8], prefix: usize, battery: &BatteryConfig) -> Evaluation {
    let bm_len = if prefix == 0 {
        bits.len()
    } else {
        prefix.min(bits.len())
    };
    log::info!("{name}: Berlekamp-Massey on {bm_len} of {} bits", bits.len());
    let lc = linear_complexity(&bits[..bm_len]);
    log::info!("{name}: running test battery");
    let results = run_battery(bits, battery);
    Evaluation {
        name: name.to_string(),
        len: bits.len(),
        linear_complexity: lc,
        results,
    }
}

/// The six experiment cases from three register outputs.
pub fn build_cases(a: &[u8], b: &[u8], c: &[u8]) -> Vec<(&'static str, Vec<u8>)> {
    let sequences = [
        a.to_vec(),
        b.to_vec(),
        c.to_vec(),
        shrinking(a, b),
        geffe(a, b, c),
        majority(&[a, b, c]),
    ];
    CASE_NAMES.into_iter().zip(sequences).collect()
}

/// Clock each register for `n` bits.
pub fn generate(configs: &[LfsrConfig], n: usize) -> Vec<Vec<u8>> {
    configs
        .iter()
        .map(|config| Lfsr::new(config.clone()).run(n))
        .collect()
}

/// Uniform random register state, redrawn until it is not all zero.
pub fn random_state<R: Rng + ?Sized>(rng: &mut R, degree: usize) -> Vec<u8> {
    loop {
        let state: Vec<u8> = (0..degree).map(|_| rng.random_range(0..=1u8)).collect();
        if state.iter().any(|&b| b == 1) {
            return state;
        }
    }
}

/// Evaluate all six cases for one set of register configurations.
pub fn run_trial(
    configs: &[LfsrConfig],
    config: &ExperimentConfig,
) -> Result<Vec<Evaluation>, CliError> {
    let [a, b, c]: [Vec<u8>; 3] = generate(configs, config.bits)
        .try_into()
        .map_err(|v: Vec<Vec<u8>>| {
            CliError::Config(format!("expected 3 registers, found {}", v.len()))
        })?;
    Ok(build_cases(&a, &b, &c)
        .into_iter()
        .map(|(name, bits)| evaluate(name, &bits, config.bm_prefix, &config.battery))
        .collect())
}

// ---------------------------------------------------------------------------
// Aggregation across repetitions
// ---------------------------------------------------------------------------

/// Mean, sample standard deviation and (for p-values) pass rate of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub key: String,
    pub mean: f64,
    pub std: f64,
    pub pass_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseSummary {
    pub name: String,
    pub metrics: Vec<MetricSummary>,
}

/// Sample mean and standard deviation (`ddof = 1`; 0 for fewer than two values).
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

/// Summarize repeated evaluations of one case.
///
/// Length and linear complexity get mean/std only; every p-value also gets
/// the fraction of repetitions with `p >= alpha`.
pub fn aggregate(name: &str, evaluations: &[Evaluation], alpha: f64) -> CaseSummary {
    let keys: Vec<String> = evaluations
        .first()
        .map(|e| e.metrics().into_iter().map(|(k, _)| k).collect())
        .unwrap_or_default();
    let all: Vec<Vec<(String, f64)>> = evaluations.iter().map(Evaluation::metrics).collect();

    let metrics = keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let values: Vec<f64> = all.iter().map(|m| m[i].1).collect();
            let (mean, std) = mean_std(&values);
            let pass_rate = if i < 2 {
                None
            } else {
                let passed = values.iter().filter(|&&p| p >= alpha).count();
                Some(passed as f64 / values.len() as f64)
            };
            MetricSummary {
                key: key.clone(),
                mean,
                std,
                pass_rate,
            }
        })
        .collect();

    CaseSummary {
        name: name.to_string(),
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small_config() -> ExperimentConfig {
        ExperimentConfig {
            bits: 4000,
            bm_prefix: 1000,
            ..Default::default()
        }
    }

    fn fixed_configs(config: &ExperimentConfig) -> Vec<LfsrConfig> {
        config
            .registers
            .iter()
            .enumerate()
            .map(|(i, r)| r.to_config(i + 1).unwrap())
            .collect()
    }

    #[test]
    fn test_mean_std() {
        assert_eq!(mean_std(&[]), (0.0, 0.0));
        assert_eq!(mean_std(&[3.0]), (3.0, 0.0));
        let (mean, std) = mean_std(&[1.0, 2.0, 3.0, 4.0]);
        assert!((mean - 2.5).abs() < 1e-12);
        assert!((std - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn test_random_state_is_nonzero_and_seeded() {
        let mut a = StdRng::seed_from_u64(12345);
        let mut b = StdRng::seed_from_u64(12345);
        for _ in 0..50 {
            let s = random_state(&mut a, 3);
            assert_eq!(s.len(), 3);
            assert!(s.contains(&1));
            assert_eq!(s, random_state(&mut b, 3));
        }
    }

    #[test]
    fn test_build_cases_names_and_lengths() {
        let config = small_config();
        let seqs = generate(&fixed_configs(&config), 500);
        let cases = build_cases(&seqs[0], &seqs[1], &seqs[2]);
        let names: Vec<&str> = cases.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, CASE_NAMES.to_vec());
        assert_eq!(cases[0].1.len(), 500);
        assert_eq!(cases[4].1.len(), 500);
        assert_eq!(cases[5].1.len(), 500);
        assert!(cases[3].1.len() < 500);
    }

    #[test]
    fn test_run_trial_evaluates_every_case() {
        let config = small_config();
        let evals = run_trial(&fixed_configs(&config), &config).unwrap();
        assert_eq!(evals.len(), 6);
        for e in &evals[..3] {
            assert!(e.linear_complexity <= 19, "{}: {}", e.name, e.linear_complexity);
            assert_eq!(e.results.len(), 9);
        }
        assert!(evals[4].linear_complexity > 19);
    }

    #[test]
    fn test_evaluate_prefix_zero_uses_whole_sequence() {
        let bits: Vec<u8> = (0..64).map(|i| u8::from(i == 63)).collect();
        let whole = evaluate("x", &bits, 0, &BatteryConfig::default());
        let prefix = evaluate("x", &bits, 32, &BatteryConfig::default());
        assert_eq!(whole.linear_complexity, 64);
        assert_eq!(prefix.linear_complexity, 0);
    }

    #[test]
    fn test_aggregate_pass_rates() {
        let config = small_config();
        let evals = run_trial(&fixed_configs(&config), &config).unwrap();
        let twice = vec![evals[0].clone(), evals[0].clone()];
        let summary = aggregate("L1", &twice, 0.01);
        assert_eq!(summary.metrics.len(), 11);
        assert_eq!(summary.metrics[0].key, "len");
        assert_eq!(summary.metrics[0].mean, 4000.0);
        assert_eq!(summary.metrics[0].std, 0.0);
        assert_eq!(summary.metrics[0].pass_rate, None);
        for m in &summary.metrics[2..] {
            let rate = m.pass_rate.unwrap();
            assert!(rate == 0.0 || rate == 1.0, "{}: {rate}", m.key);
        }
    }
}
