use std::path::Path;

use lfsrlab_core::bits::{parse_bits, to_bits};
use lfsrlab_tests::BatteryConfig;

use crate::error::CliError;
use crate::experiment::{self, Evaluation};
use crate::report;

/// Options for `lfsrlab analyze`.
pub struct AnalyzeCommandConfig<'a> {
    pub input: &'a Path,
    /// Treat the file as text of `0`/`1` characters instead of raw bytes.
    pub ascii: bool,
    pub bm_prefix: usize,
    pub alpha: f64,
    pub battery: &'a BatteryConfig,
    /// Markdown report destination.
    pub output_path: Option<&'a Path>,
}

/// Read a sequence from disk, one bit per byte in the returned vector.
pub fn load_bits(path: &Path, ascii: bool) -> Result<Vec<u8>, CliError> {
    let data = std::fs::read(path).map_err(|e| CliError::io(path, e))?;
    let bits = if ascii {
        let text = String::from_utf8(data).map_err(|_| {
            CliError::Input(format!("{} is not valid UTF-8", path.display()))
        })?;
        parse_bits(&text).ok_or_else(|| {
            CliError::Input(format!(
                "{} contains characters other than 0 and 1",
                path.display()
            ))
        })?
    } else {
        to_bits(&data)
    };
    if bits.is_empty() {
        return Err(CliError::Input(format!("{} is empty", path.display())));
    }
    Ok(bits)
}

pub fn run(opts: &AnalyzeCommandConfig<'_>) -> Result<Evaluation, CliError> {
    let bits = load_bits(opts.input, opts.ascii)?;
    let name = opts
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    println!("Analyzing {} ({} bits)...", name, bits.len());

    let evaluation = experiment::evaluate(&name, &bits, opts.bm_prefix, opts.battery);
    let evaluations = std::slice::from_ref(&evaluation);

    report::print_summary_table(evaluations, opts.alpha);
    println!();
    for t in &evaluation.results {
        let p = t
            .p_value
            .applicable()
            .map_or_else(|| "n/a".to_string(), |p| format!("{p:.6}"));
        let mark = if t.passed(opts.alpha) { "✓" } else { "✗" };
        println!("  {mark} {:<28} p={p:<10} {}", t.name, t.details);
    }

    if let Some(path) = opts.output_path {
        report::write_file(path, &report::markdown_report(evaluations, opts.alpha))?;
        println!("\nReport saved to {}", path.display());
    }
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bits_binary_is_msb_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seq.bin");
        std::fs::write(&path, [0b1000_0001u8, 0xFF]).unwrap();
        let bits = load_bits(&path, false).unwrap();
        assert_eq!(bits.len(), 16);
        assert_eq!(&bits[..8], &[1, 0, 0, 0, 0, 0, 0, 1]);
        assert!(bits[8..].iter().all(|&b| b == 1));
    }

    #[test]
    fn test_load_bits_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seq.txt");
        std::fs::write(&path, "1011 0101\n01\n").unwrap();
        assert_eq!(
            load_bits(&path, true).unwrap(),
            vec![1, 0, 1, 1, 0, 1, 0, 1, 0, 1]
        );
    }

    #[test]
    fn test_load_bits_rejects_bad_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seq.txt");
        std::fs::write(&path, "10201").unwrap();
        assert!(matches!(load_bits(&path, true), Err(CliError::Input(_))));
    }

    #[test]
    fn test_load_bits_empty_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();
        assert!(matches!(load_bits(&path, false), Err(CliError::Input(_))));
        let missing = dir.path().join("missing.bin");
        assert!(matches!(load_bits(&missing, false), Err(CliError::Io { .. })));
    }
}
