//! Configuration errors raised when building an LFSR.

use thiserror::Error;

/// Rejected [`LfsrConfig`](crate::LfsrConfig) invariants.
///
/// These only occur at construction time. Once an [`Lfsr`](crate::Lfsr)
/// exists, every operation on it is infallible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LfsrError {
    #[error("LFSR degree must be at least 1")]
    ZeroDegree,

    #[error("tap set must not be empty")]
    EmptyTaps,

    #[error("tap {tap} is outside the register positions 1..={degree}")]
    TapOutOfRange { tap: usize, degree: usize },

    #[error("highest tap {max_tap} must equal the degree {degree}")]
    DegreeMismatch { max_tap: usize, degree: usize },

    #[error("initial state has {actual} bits, expected {expected}")]
    StateLengthMismatch { expected: usize, actual: usize },

    #[error("initial state bit {index} is {value}, expected 0 or 1")]
    NonBinaryState { index: usize, value: u8 },

    /// All-zero registers are a fixed point of the feedback function.
    #[error("initial state must not be all zeros")]
    ZeroState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            LfsrError::ZeroState.to_string(),
            "initial state must not be all zeros"
        );
        assert_eq!(
            LfsrError::TapOutOfRange { tap: 9, degree: 4 }.to_string(),
            "tap 9 is outside the register positions 1..=4"
        );
        assert_eq!(
            LfsrError::DegreeMismatch {
                max_tap: 3,
                degree: 4
            }
            .to_string(),
            "highest tap 3 must equal the degree 4"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(LfsrError::EmptyTaps, LfsrError::EmptyTaps);
        assert_ne!(LfsrError::EmptyTaps, LfsrError::ZeroDegree);
    }
}
