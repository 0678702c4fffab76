//! Nonlinear combiners and clock-control generators.
//!
//! Every combiner is a pure function over bit sequences and truncates to the
//! shortest input.

/// Shrinking generator: keep `data[i]` wherever `control[i] == 1`.
///
/// The output has as many bits as `control[..n]` has ones, where
/// `n = min(control.len(), data.len())`. An all-zero control yields an empty
/// sequence.
pub fn shrinking(control: &[u8], data: &[u8]) -> Vec<u8> {
    control
        .iter()
        .zip(data)
        .filter(|&(&c, _)| c == 1)
        .map(|(_, &d)| d)
        .collect()
}

/// Geffe generator: `a[i]` where `select[i] == 1`, otherwise `b[i]`.
pub fn geffe(select: &[u8], a: &[u8], b: &[u8]) -> Vec<u8> {
    select
        .iter()
        .zip(a.iter().zip(b))
        .map(|(&s, (&x, &y))| if s == 1 { x } else { y })
        .collect()
}

/// Majority vote over `m` sequences.
///
/// Bit `i` is 1 when at least `(m + 1) / 2` inputs carry a 1 there (integer
/// division). For even `m` that threshold is exactly `m / 2`, so a tie votes 1.
/// With no inputs the output is empty.
pub fn majority(seqs: &[&[u8]]) -> Vec<u8> {
    let Some(n) = seqs.iter().map(|s| s.len()).min() else {
        return Vec::new();
    };
    let threshold = majority_threshold(seqs.len());
    (0..n)
        .map(|i| {
            let ones = seqs.iter().filter(|s| s[i] == 1).count();
            u8::from(ones >= threshold)
        })
        .collect()
}

/// Minimum number of ones that makes [`majority`] output 1 for `m` inputs.
pub fn majority_threshold(m: usize) -> usize {
    m.div_ceil(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::count_ones;

    #[test]
    fn test_shrinking_scenario() {
        assert_eq!(shrinking(&[1, 0, 1, 1, 0], &[1, 1, 0, 1, 1]), vec![1, 0, 1]);
    }

    #[test]
    fn test_shrinking_length_is_truncated_ones() {
        let control = [1, 1, 0, 1, 1, 1, 0, 1];
        let data = [0, 1, 1, 0, 1];
        let out = shrinking(&control, &data);
        assert_eq!(out.len(), count_ones(&control[..data.len()]));
        assert_eq!(out, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_shrinking_all_zero_control() {
        assert!(shrinking(&[0, 0, 0], &[1, 1, 1]).is_empty());
        assert!(shrinking(&[], &[1, 1, 1]).is_empty());
    }

    #[test]
    fn test_geffe_scenario() {
        assert_eq!(geffe(&[1, 0], &[1, 0], &[0, 1]), vec![1, 1]);
    }

    #[test]
    fn test_geffe_truncates() {
        let out = geffe(&[1, 0, 1, 0], &[1, 1, 1], &[0, 0, 0, 0, 0]);
        assert_eq!(out, vec![1, 0, 1]);
    }

    #[test]
    fn test_majority_three() {
        let a: [u8; 5] = [1, 1, 0, 0, 1];
        let b: [u8; 5] = [1, 0, 1, 0, 1];
        let c: [u8; 6] = [0, 1, 1, 0, 1, 1];
        assert_eq!(majority(&[&a, &b, &c]), vec![1, 1, 1, 0, 1]);
    }

    #[test]
    fn test_majority_threshold_values() {
        assert_eq!(majority_threshold(1), 1);
        assert_eq!(majority_threshold(2), 1);
        assert_eq!(majority_threshold(3), 2);
        assert_eq!(majority_threshold(4), 2);
        assert_eq!(majority_threshold(5), 3);
    }

    #[test]
    fn test_majority_even_tie_at_threshold() {
        // m = 4, exactly (4 + 1) / 2 = 2 ones: meets the threshold.
        let a: [u8; 3] = [1, 1, 0];
        let b: [u8; 3] = [1, 0, 1];
        let c: [u8; 3] = [0, 1, 0];
        let d: [u8; 3] = [0, 0, 1];
        assert_eq!(majority(&[&a, &b, &c, &d]), vec![1, 1, 1]);
        // One below the threshold votes 0.
        let z = [0u8; 3];
        assert_eq!(majority(&[&z, &z, &z, &d]), vec![0, 0, 0]);
    }

    #[test]
    fn test_majority_single_input_is_identity() {
        let a: [u8; 4] = [1, 0, 1, 1];
        assert_eq!(majority(&[&a]), a.to_vec());
    }

    #[test]
    fn test_majority_no_inputs() {
        assert!(majority(&[]).is_empty());
    }
}
