//! Binary Fibonacci linear-feedback shift register.
//!
//! The register holds `d` bits. Position 1 is the head (the most recently
//! inserted bit) and position `d` is the tail (the next bit to be emitted).
//! Each step emits the tail, computes the feedback as the XOR of the bits at
//! the tap positions, shifts everything one place toward the tail and inserts
//! the feedback at the head.
//!
//! ```
//! use lfsrlab_core::Lfsr;
//!
//! // x^4 + x + 1, primitive: period 15.
//! let mut lfsr = Lfsr::from_taps(&[4, 1], &[1, 0, 0, 0]).unwrap();
//! let first = lfsr.run(15);
//! let second = lfsr.run(15);
//! assert_eq!(first, second);
//! ```

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::LfsrError;

/// Validated LFSR parameters: degree, tap set and initial state.
///
/// Invariants: `degree >= 1`, the tap set is non-empty with every tap in
/// `1..=degree` and `max(taps) == degree`, the state has exactly `degree`
/// bits, each 0 or 1, and not all zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLfsrConfig")]
pub struct LfsrConfig {
    degree: usize,
    taps: Vec<usize>,
    state: Vec<u8>,
}

#[derive(Deserialize)]
struct RawLfsrConfig {
    #[serde(default)]
    degree: Option<usize>,
    taps: Vec<usize>,
    state: Vec<u8>,
}

impl TryFrom<RawLfsrConfig> for LfsrConfig {
    type Error = LfsrError;

    fn try_from(raw: RawLfsrConfig) -> Result<Self, Self::Error> {
        match raw.degree {
            Some(degree) => LfsrConfig::new(degree, &raw.taps, &raw.state),
            None => LfsrConfig::from_taps(&raw.taps, &raw.state),
        }
    }
}

impl LfsrConfig {
    /// Validate and build a configuration.
    ///
    /// Duplicate taps are collapsed; taps are stored in ascending order.
    pub fn new(degree: usize, taps: &[usize], state: &[u8]) -> Result<Self, LfsrError> {
        if degree == 0 {
            return Err(LfsrError::ZeroDegree);
        }
        let taps: BTreeSet<usize> = taps.iter().copied().collect();
        if taps.is_empty() {
            return Err(LfsrError::EmptyTaps);
        }
        if let Some(&tap) = taps.iter().find(|&&t| t == 0 || t > degree) {
            return Err(LfsrError::TapOutOfRange { tap, degree });
        }
        let max_tap = taps.iter().next_back().copied().unwrap_or(0);
        if max_tap != degree {
            return Err(LfsrError::DegreeMismatch { max_tap, degree });
        }
        if state.len() != degree {
            return Err(LfsrError::StateLengthMismatch {
                expected: degree,
                actual: state.len(),
            });
        }
        if let Some((index, &value)) = state.iter().enumerate().find(|&(_, &b)| b > 1) {
            return Err(LfsrError::NonBinaryState { index, value });
        }
        if state.iter().all(|&b| b == 0) {
            return Err(LfsrError::ZeroState);
        }
        Ok(Self {
            degree,
            taps: taps.into_iter().collect(),
            state: state.to_vec(),
        })
    }

    /// Build a configuration whose degree is the highest tap.
    pub fn from_taps(taps: &[usize], state: &[u8]) -> Result<Self, LfsrError> {
        let degree = taps.iter().copied().max().ok_or(LfsrError::EmptyTaps)?;
        Self::new(degree, taps, state)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Tap positions, ascending.
    pub fn taps(&self) -> &[usize] {
        &self.taps
    }

    /// Initial register contents, head first.
    pub fn state(&self) -> &[u8] {
        &self.state
    }

    /// Coefficients of the connection polynomial `1 + Σ x^t` over the taps,
    /// indexed by degree.
    ///
    /// Tap `t` reads the bit inserted `t` steps ago, so the output satisfies
    /// `s[k] = XOR_{t in taps} s[k - t]`.
    pub fn connection_coefficients(&self) -> Vec<u8> {
        let mut coefficients = vec![0u8; self.degree + 1];
        coefficients[0] = 1;
        for &t in &self.taps {
            coefficients[t] = 1;
        }
        coefficients
    }
}

/// A running LFSR. Owns its register; clone it to fork the stream.
#[derive(Debug, Clone)]
pub struct Lfsr {
    config: LfsrConfig,
    register: VecDeque<u8>,
}

impl Lfsr {
    pub fn new(config: LfsrConfig) -> Self {
        log::debug!(
            "LFSR degree={} taps={:?}",
            config.degree(),
            config.taps()
        );
        let register = config.state.iter().copied().collect();
        Self { config, register }
    }

    /// Validate `taps`/`state` and build the register in one step.
    pub fn from_taps(taps: &[usize], state: &[u8]) -> Result<Self, LfsrError> {
        Ok(Self::new(LfsrConfig::from_taps(taps, state)?))
    }

    pub fn config(&self) -> &LfsrConfig {
        &self.config
    }

    pub fn degree(&self) -> usize {
        self.config.degree
    }

    pub fn taps(&self) -> &[usize] {
        &self.config.taps
    }

    /// Current register contents, head first.
    pub fn state(&self) -> Vec<u8> {
        self.register.iter().copied().collect()
    }

    /// Rewind to the configured initial state.
    pub fn reset(&mut self) {
        self.register = self.config.state.iter().copied().collect();
    }

    /// Emit the tail bit and clock the register once.
    pub fn next_bit(&mut self) -> u8 {
        let out = self.register[self.config.degree - 1];
        let feedback = self
            .config
            .taps
            .iter()
            .fold(0u8, |acc, &t| acc ^ self.register[t - 1]);
        self.register.pop_back();
        self.register.push_front(feedback);
        out
    }

    /// Emit `k` bits. The register stays advanced, so consecutive calls
    /// continue the same stream.
    pub fn run(&mut self, k: usize) -> Vec<u8> {
        (0..k).map(|_| self.next_bit()).collect()
    }

    /// Number of steps until the register returns to its current state,
    /// or `None` if that takes more than `limit` steps.
    pub fn period(&self, limit: usize) -> Option<usize> {
        let mut probe = self.clone();
        for step in 1..=limit {
            probe.next_bit();
            if probe.register == self.register {
                return Some(step);
            }
        }
        None
    }
}

impl Iterator for Lfsr {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        Some(self.next_bit())
    }
}
