//! NIST SP 800-22 inspired randomness test battery for bit sequences.
//!
//! Seven tests, each a pure function of a bit slice (`0`/`1` per element) and
//! a few small parameters. Every test returns a [`TestResult`] whose
//! [`PValue`] is either a computed p-value in `[0, 1]` or
//! [`PValue::Inapplicable`] when the test's statistical precondition does not
//! hold for the given length or parameters.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::function::erf::erfc;
use statrs::function::gamma::gamma_ur;
use std::f64::consts::{LN_2, SQRT_2};

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of a single test statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PValue {
    /// Computed p-value in `[0, 1]`.
    Applicable(f64),
    /// Precondition unmet; no p-value exists for this input.
    Inapplicable,
}

impl PValue {
    /// Numeric value; `Inapplicable` reads as `0.0`.
    pub fn value(self) -> f64 {
        match self {
            PValue::Applicable(p) => p,
            PValue::Inapplicable => 0.0,
        }
    }

    pub fn applicable(self) -> Option<f64> {
        match self {
            PValue::Applicable(p) => Some(p),
            PValue::Inapplicable => None,
        }
    }

    pub fn is_applicable(self) -> bool {
        matches!(self, PValue::Applicable(_))
    }
}

/// Result of a single randomness test.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Stable machine-readable identifier, e.g. `blockfreq_128`.
    pub id: String,
    pub name: String,
    pub p_value: PValue,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or inapplicable
    pub fn grade_from_p(p: PValue) -> char {
        match p.applicable() {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold.
    ///
    /// Compares [`PValue::value`], so an inapplicable test passes only for a
    /// non-positive threshold.
    pub fn pass_from_p(p: PValue, threshold: f64) -> bool {
        p.value() >= threshold
    }

    pub fn passed(&self, threshold: f64) -> bool {
        Self::pass_from_p(self.p_value, threshold)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn applicable(id: String, name: &str, p: f64, statistic: f64, details: String) -> TestResult {
    let p_value = PValue::Applicable(p.clamp(0.0, 1.0));
    TestResult {
        id,
        name: name.to_string(),
        p_value,
        statistic,
        details,
        grade: TestResult::grade_from_p(p_value),
    }
}

/// Return an `Inapplicable` result when the precondition is unmet.
fn inapplicable(id: String, name: &str, details: String) -> TestResult {
    log::debug!("{name}: not applicable ({details})");
    TestResult {
        id,
        name: name.to_string(),
        p_value: PValue::Inapplicable,
        statistic: 0.0,
        details,
        grade: 'F',
    }
}

/// Regularized upper incomplete gamma `Q(a, x)`.
///
/// `Q(a, 0) = 1`; non-positive `x` (rounding noise in a difference of
/// statistics) is treated as 0.
fn igamc(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        1.0
    } else if x.is_infinite() {
        0.0
    } else {
        gamma_ur(a, x)
    }
}

/// Longest pattern length the approximate entropy and serial tests tabulate.
///
/// Their count tables hold `2^m` entries.
pub const MAX_PATTERN_BITS: usize = 20;

/// Counts of every `m`-bit pattern over `n` overlapping windows, wrapping
/// around the end of the sequence.
fn circular_counts(bits: &[u8], m: usize) -> Vec<u64> {
    let n = bits.len();
    let mut counts = vec![0u64; 1usize << m];
    for i in 0..n {
        let mut val = 0usize;
        for j in 0..m {
            val = (val << 1) | bits[(i + j) % n] as usize;
        }
        counts[val] += 1;
    }
    counts
}

fn to_pm1(bit: u8) -> i64 {
    if bit == 1 { 1 } else { -1 }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. FREQUENCY TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Monobit frequency -- proportion of 1s vs 0s should be ~50%.
pub fn monobit(bits: &[u8]) -> TestResult {
    let name = "Monobit Frequency";
    let id = "monobit".to_string();
    let n = bits.len();
    if n == 0 {
        return inapplicable(id, name, "empty sequence".to_string());
    }
    let s: i64 = bits.iter().map(|&b| to_pm1(b)).sum();
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    let p = erfc(s_obs / SQRT_2);
    applicable(id, name, p, s_obs, format!("S={s}, n={n}"))
}

/// Block frequency -- ones-proportion within `block_size`-bit blocks.
///
/// The trailing partial block is discarded. Inapplicable when no full block
/// fits.
pub fn block_frequency(bits: &[u8], block_size: usize) -> TestResult {
    let name = "Block Frequency";
    let id = format!("blockfreq_{block_size}");
    let n = bits.len();
    if block_size == 0 {
        return inapplicable(id, name, "block size must be positive".to_string());
    }
    let num_blocks = n / block_size;
    if num_blocks == 0 {
        return inapplicable(
            id,
            name,
            format!("need at least {block_size} bits, got {n}"),
        );
    }
    let mut chi2 = 0.0;
    for block in bits.chunks_exact(block_size) {
        let ones = block.iter().filter(|&&b| b == 1).count();
        let proportion = ones as f64 / block_size as f64;
        chi2 += (proportion - 0.5) * (proportion - 0.5);
    }
    chi2 *= 4.0 * block_size as f64;
    let p = (-chi2 / 2.0).exp();
    applicable(
        id,
        name,
        p,
        chi2,
        format!("blocks={num_blocks}, M={block_size}"),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. RUNS TEST
// ═══════════════════════════════════════════════════════════════════════════════

/// Runs test -- number of uninterrupted runs of 0s or 1s.
///
/// Inapplicable when the monobit pre-test fails (`|π - 1/2| >= 2/√n`) or the
/// sequence is constant.
pub fn runs(bits: &[u8]) -> TestResult {
    let name = "Runs Test";
    let id = "runs".to_string();
    let n = bits.len();
    if n == 0 {
        return inapplicable(id, name, "empty sequence".to_string());
    }
    let ones = bits.iter().filter(|&&b| b == 1).count();
    let prop = ones as f64 / n as f64;
    if (prop - 0.5).abs() >= 2.0 / (n as f64).sqrt() {
        return inapplicable(id, name, format!("Pre-test failed: proportion={prop:.4}"));
    }
    let spread = prop * (1.0 - prop);
    if spread == 0.0 {
        return inapplicable(id, name, "Zero variance".to_string());
    }
    let runs = 1 + bits.windows(2).filter(|w| w[0] != w[1]).count();
    let expected = 2.0 * n as f64 * spread;
    let p = erfc((runs as f64 - expected).abs() / (2.0 * (2.0 * n as f64).sqrt() * spread));
    applicable(
        id,
        name,
        p,
        runs as f64,
        format!("runs={runs}, proportion={prop:.4}"),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// 3. CUMULATIVE SUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Order in which [`cumulative_sums`] walks the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Cumulative sums (CUSUM) -- maximal excursion of the ±1 random walk.
pub fn cumulative_sums(bits: &[u8], direction: Direction) -> TestResult {
    let (name, id) = match direction {
        Direction::Forward => ("Cumulative Sums (forward)", "cusum_fwd"),
        Direction::Reverse => ("Cumulative Sums (reverse)", "cusum_rev"),
    };
    let id = id.to_string();
    let n = bits.len();
    if n == 0 {
        return inapplicable(id, name, "empty sequence".to_string());
    }

    let mut s: i64 = 0;
    let mut max_abs: u64 = 0;
    let mut step = |bit: u8| {
        s += to_pm1(bit);
        max_abs = max_abs.max(s.unsigned_abs());
    };
    match direction {
        Direction::Forward => bits.iter().for_each(|&b| step(b)),
        Direction::Reverse => bits.iter().rev().for_each(|&b| step(b)),
    }
    // The first step already moves the walk to ±1, so z >= 1.
    let z = max_abs as f64;

    let nf = n as f64;
    let sqrt_n = nf.sqrt();
    let norm = Normal::standard();
    let phi = |x: f64| norm.cdf(x * z / sqrt_n);
    let k_end = ((nf / z - 1.0) / 4.0).floor() as i64;

    let k_start = ((-nf / z + 1.0) / 4.0).floor() as i64;
    let sum1: f64 = (k_start..=k_end)
        .map(|k| {
            let kf = k as f64;
            phi(4.0 * kf + 1.0) - phi(4.0 * kf - 1.0)
        })
        .sum();

    let k_start = ((-nf / z - 3.0) / 4.0).floor() as i64;
    let sum2: f64 = (k_start..=k_end)
        .map(|k| {
            let kf = k as f64;
            phi(4.0 * kf + 3.0) - phi(4.0 * kf + 1.0)
        })
        .sum();

    let p = 1.0 - sum1 + sum2;
    applicable(id, name, p, z, format!("max|S|={max_abs}, n={n}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// 4. ENTROPY AND SERIAL TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// `φ(k) = Σ (c/n)·ln(c/n)` over circular `k`-bit pattern counts.
fn phi(bits: &[u8], k: usize) -> f64 {
    let n = bits.len() as f64;
    circular_counts(bits, k)
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            p * p.ln()
        })
        .sum()
}

/// Approximate entropy -- compare `m`- and `m+1`-bit pattern frequencies.
///
/// The sequence is treated as circular when forming overlapping blocks.
pub fn approximate_entropy(bits: &[u8], m: usize) -> TestResult {
    let name = "Approximate Entropy";
    let id = format!("approx_entropy_m{m}");
    let n = bits.len();
    if n == 0 {
        return inapplicable(id, name, "empty sequence".to_string());
    }
    if m >= MAX_PATTERN_BITS {
        return inapplicable(
            id,
            name,
            format!("m={m} needs blocks longer than {MAX_PATTERN_BITS} bits"),
        );
    }
    let apen = phi(bits, m) - phi(bits, m + 1);
    let chi2 = 2.0 * n as f64 * (LN_2 - apen);
    let p = igamc(2f64.powi(m as i32 - 1), chi2 / 2.0);
    applicable(id, name, p, chi2, format!("ApEn={apen:.6}, m={m}"))
}

/// `ψ²_m` of the serial test; `ψ²_0 = 0`.
fn psi_sq(bits: &[u8], m: usize) -> f64 {
    if m == 0 {
        return 0.0;
    }
    let n = bits.len() as f64;
    let sum_sq: f64 = circular_counts(bits, m)
        .iter()
        .map(|&c| (c as f64) * (c as f64))
        .sum();
    sum_sq * (1u64 << m) as f64 / n - n
}

/// Serial test -- uniformity of overlapping `m`-bit patterns.
///
/// Returns `(p1, p2)` from the first and second differences of `ψ²`. Both
/// are inapplicable for `m < 2`; `p2` alone is inapplicable for `m = 2`.
pub fn serial(bits: &[u8], m: usize) -> (TestResult, TestResult) {
    let name1 = "Serial Test (∇ψ²)";
    let name2 = "Serial Test (∇²ψ²)";
    let id1 = format!("serial_m{m}_p1");
    let id2 = format!("serial_m{m}_p2");
    let n = bits.len();
    if m < 2 {
        let why = format!("block length must be at least 2, got {m}");
        return (
            inapplicable(id1, name1, why.clone()),
            inapplicable(id2, name2, why),
        );
    }
    if m > MAX_PATTERN_BITS {
        let why = format!("block length {m} exceeds {MAX_PATTERN_BITS} bits");
        return (
            inapplicable(id1, name1, why.clone()),
            inapplicable(id2, name2, why),
        );
    }
    if n == 0 {
        return (
            inapplicable(id1, name1, "empty sequence".to_string()),
            inapplicable(id2, name2, "empty sequence".to_string()),
        );
    }

    let psi_m = psi_sq(bits, m);
    let psi_m1 = psi_sq(bits, m - 1);
    let psi_m2 = psi_sq(bits, m - 2);
    let delta1 = psi_m - psi_m1;
    let delta2 = psi_m - 2.0 * psi_m1 + psi_m2;

    let p1 = igamc(2f64.powi(m as i32 - 2), delta1 / 2.0);
    let first = applicable(id1, name1, p1, delta1, format!("m={m}, n={n}"));
    let second = if m >= 3 {
        let p2 = igamc(2f64.powi(m as i32 - 3), delta2 / 2.0);
        applicable(id2, name2, p2, delta2, format!("m={m}, n={n}"))
    } else {
        inapplicable(id2, name2, "second difference needs m >= 3".to_string())
    };
    (first, second)
}

// ═══════════════════════════════════════════════════════════════════════════════
// 5. MAURER'S UNIVERSAL TEST
// ═══════════════════════════════════════════════════════════════════════════════

/// Expected value and variance of `f_n` for L = 6..=16.
const MAURER_REFERENCE: [(f64, f64); 11] = [
    (5.2177052, 2.954),
    (6.1962507, 3.125),
    (7.1836656, 3.238),
    (8.1764248, 3.311),
    (9.1723243, 3.356),
    (10.170032, 3.384),
    (11.168765, 3.401),
    (12.168070, 3.410),
    (13.167693, 3.416),
    (14.167488, 3.419),
    (15.167379, 3.421),
];

fn maurer_reference(l: usize) -> Option<(f64, f64)> {
    l.checked_sub(6)
        .and_then(|i| MAURER_REFERENCE.get(i))
        .copied()
}

/// Maurer's universal statistical test with `l`-bit templates.
///
/// The first `Q = 10·2^L` blocks seed the last-seen table; the following
/// `K = ⌊n/L⌋ - Q` blocks are tested. Inapplicable for `L` outside `6..=16`
/// or when `K <= 0`.
pub fn maurer_universal(bits: &[u8], l: usize) -> TestResult {
    let name = "Maurer's Universal";
    let id = format!("maurer_L{l}");
    let Some((expected, variance)) = maurer_reference(l) else {
        return inapplicable(id, name, format!("L={l} outside 6..=16"));
    };
    let q = 10 * (1usize << l);
    let n_bits = bits.len();
    let total_blocks = n_bits / l;
    if total_blocks <= q {
        return inapplicable(
            id,
            name,
            format!("need more than {} bits, got {n_bits}", q * l),
        );
    }
    let k = total_blocks - q;

    let block_at = |i: usize| -> usize {
        bits[i * l..(i + 1) * l]
            .iter()
            .fold(0usize, |acc, &b| (acc << 1) | b as usize)
    };

    let mut table = vec![0usize; 1usize << l];

    // Initialization phase
    for i in 0..q {
        table[block_at(i)] = i + 1;
    }

    // Test phase
    let mut total = 0.0f64;
    for i in q..q + k {
        let block = block_at(i);
        let distance = (i + 1 - table[block]) as f64;
        total += distance.log2();
        table[block] = i + 1;
    }

    let lf = l as f64;
    let kf = k as f64;
    let fn_val = total / kf;
    let c = 0.7 - 0.8 / lf + (4.0 + 32.0 / lf) * kf.powf(-3.0 / lf) / 15.0;
    let sigma = c * (variance / kf).sqrt();
    let p = erfc((fn_val - expected).abs() / (SQRT_2 * sigma));
    applicable(
        id,
        name,
        p,
        fn_val,
        format!("fn={fn_val:.4}, expected={expected:.4}, L={l}, K={k}"),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Parameters of the full battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Block frequency block size `M`.
    pub block_size: usize,
    /// Approximate entropy block length.
    pub apen_m: usize,
    /// Maurer template length `L`.
    pub maurer_l: usize,
    /// Serial test block length.
    pub serial_m: usize,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            block_size: 128,
            apen_m: 2,
            maurer_l: 6,
            serial_m: 3,
        }
    }
}

impl BatteryConfig {
    /// Result identifiers in the order [`run_battery`] returns them.
    pub fn test_ids(&self) -> Vec<String> {
        vec![
            "monobit".to_string(),
            format!("blockfreq_{}", self.block_size),
            "runs".to_string(),
            "cusum_fwd".to_string(),
            "cusum_rev".to_string(),
            format!("approx_entropy_m{}", self.apen_m),
            format!("maurer_L{}", self.maurer_l),
            format!("serial_m{}_p1", self.serial_m),
            format!("serial_m{}_p2", self.serial_m),
        ]
    }
}

/// Run the complete battery on a bit sequence.
///
/// Results come back in the order of [`BatteryConfig::test_ids`]: monobit,
/// block frequency, runs, cusum forward, cusum reverse, approximate entropy,
/// Maurer, serial p1, serial p2.
pub fn run_battery(bits: &[u8], config: &BatteryConfig) -> Vec<TestResult> {
    let (serial1, serial2) = serial(bits, config.serial_m);
    vec![
        // Frequency (2)
        monobit(bits),
        block_frequency(bits, config.block_size),
        // Runs (1)
        runs(bits),
        // Cumulative sums (2)
        cumulative_sums(bits, Direction::Forward),
        cumulative_sums(bits, Direction::Reverse),
        // Entropy (1)
        approximate_entropy(bits, config.apen_m),
        // Pattern (1)
        maurer_universal(bits, config.maurer_l),
        // Serial (2)
        serial1,
        serial2,
    ]
}

/// Calculate overall quality score (0-100) from test results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}
