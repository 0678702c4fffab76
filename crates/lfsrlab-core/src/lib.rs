//! # lfsrlab-core
//!
//! Building blocks for studying LFSR-based keystream generators over GF(2).
//!
//! - [`Lfsr`]: a Fibonacci shift register driven by a validated [`LfsrConfig`].
//! - [`combiners`]: shrinking, Geffe and majority generators.
//! - [`berlekamp_massey`]: linear complexity and a minimal connection polynomial.
//!
//! ## Quick Start
//!
//! ```
//! use lfsrlab_core::{Lfsr, berlekamp_massey, combiners};
//!
//! let a = Lfsr::from_taps(&[5, 2], &[1, 0, 0, 0, 0]).unwrap().run(200);
//! let b = Lfsr::from_taps(&[7, 1], &[1, 0, 0, 0, 0, 0, 0]).unwrap().run(200);
//!
//! let (l, poly) = berlekamp_massey(&a);
//! assert_eq!(l, 5);
//! assert!(poly.generates(&a));
//!
//! let shrunk = combiners::shrinking(&a, &b);
//! assert!(shrunk.len() < 200);
//! ```
//!
//! Bit sequences are plain `[u8]` slices holding 0 or 1.

pub mod berlekamp_massey;
pub mod bits;
pub mod combiners;
pub mod error;
pub mod lfsr;

pub use berlekamp_massey::{ConnectionPolynomial, berlekamp_massey, linear_complexity};
pub use combiners::{geffe, majority, shrinking};
pub use error::LfsrError;
pub use lfsr::{Lfsr, LfsrConfig};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
