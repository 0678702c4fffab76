//! Berlekamp-Massey over GF(2).
//!
//! Finds the shortest LFSR that generates a bit sequence: its length `L` is
//! the linear complexity and the connection polynomial
//! `C(x) = 1 + c_1 x + ... + c_L x^L` satisfies
//! `s[k] = c_1 s[k-1] ^ ... ^ c_L s[k-L]` for every `k >= L`.

use serde::{Deserialize, Serialize};

/// Connection polynomial over GF(2), coefficients indexed by degree.
///
/// `coefficients[0]` is always 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPolynomial {
    coefficients: Vec<u8>,
}

impl ConnectionPolynomial {
    pub fn coefficients(&self) -> &[u8] {
        &self.coefficients
    }

    /// Declared length of the recurrence (`coefficients.len() - 1`).
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Degrees `i >= 1` with a non-zero coefficient, i.e. the LFSR taps.
    pub fn taps(&self) -> Vec<usize> {
        self.coefficients
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(_, &c)| c == 1)
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether the recurrence reproduces every bit of `bits` from index
    /// `degree()` on.
    pub fn generates(&self, bits: &[u8]) -> bool {
        let l = self.degree();
        (l..bits.len()).all(|k| {
            let predicted = (1..=l).fold(0u8, |acc, i| acc ^ (self.coefficients[i] & bits[k - i]));
            predicted == bits[k]
        })
    }
}

/// Linear complexity and a minimal connection polynomial of `bits`.
///
/// The polynomial is returned with exactly `L + 1` coefficients. An empty
/// sequence has complexity 0 and polynomial `1`.
pub fn berlekamp_massey(bits: &[u8]) -> (usize, ConnectionPolynomial) {
    let n = bits.len();
    // deg C <= L <= n, so n + 1 coefficients always suffice.
    let mut c = vec![0u8; n + 1];
    let mut b = vec![0u8; n + 1];
    c[0] = 1;
    b[0] = 1;
    let mut l: usize = 0;
    let mut m: isize = -1;

    for ni in 0..n {
        let mut d: u8 = bits[ni];
        for i in 1..=l {
            d ^= c[i] & bits[ni - i];
        }
        if d == 0 {
            continue;
        }
        let shift = (ni as isize - m) as usize;
        if 2 * l <= ni {
            let t = c.clone();
            for (ci, &bi) in c[shift..].iter_mut().zip(b.iter()) {
                *ci ^= bi;
            }
            l = ni + 1 - l;
            m = ni as isize;
            b = t;
        } else {
            for (ci, &bi) in c[shift..].iter_mut().zip(b.iter()) {
                *ci ^= bi;
            }
        }
    }

    debug_assert!(c[l + 1..].iter().all(|&x| x == 0));
    c.truncate(l + 1);
    log::debug!("Berlekamp-Massey: n={n}, L={l}");
    (l, ConnectionPolynomial { coefficients: c })
}

/// Linear complexity only.
pub fn linear_complexity(bits: &[u8]) -> usize {
    berlekamp_massey(bits).0
}
