//! CSV and Markdown renderings of evaluations.
//!
//! CSV cells hold the numeric p-value; an inapplicable test is written as 0,
//! matching what a `p >= alpha` check sees. The JSON output keeps the tag.

use std::path::Path;

use crate::error::CliError;
use crate::experiment::{CaseSummary, Evaluation};

/// One row per case: name, length, linear complexity, then every p-value.
pub fn summary_csv(evaluations: &[Evaluation]) -> String {
    let mut out = String::new();
    let Some(first) = evaluations.first() else {
        return out;
    };
    let header: Vec<String> = std::iter::once("name".to_string())
        .chain(first.metrics().into_iter().map(|(k, _)| k))
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for e in evaluations {
        let row: Vec<String> = std::iter::once(e.name.clone())
            .chain(e.metrics().into_iter().map(|(_, v)| v.to_string()))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// One row per case with `_mean`, `_std` and, for p-values, `_pass_rate`.
pub fn summary_multi_csv(summaries: &[CaseSummary]) -> String {
    let mut out = String::new();
    let Some(first) = summaries.first() else {
        return out;
    };
    let mut header = vec!["name".to_string()];
    for m in &first.metrics {
        header.push(format!("{}_mean", m.key));
        header.push(format!("{}_std", m.key));
        if m.pass_rate.is_some() {
            header.push(format!("{}_pass_rate", m.key));
        }
    }
    out.push_str(&header.join(","));
    out.push('\n');
    for s in summaries {
        let mut row = vec![s.name.clone()];
        for m in &s.metrics {
            row.push(m.mean.to_string());
            row.push(m.std.to_string());
            if let Some(rate) = m.pass_rate {
                row.push(rate.to_string());
            }
        }
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Human-readable report with one table per evaluation.
pub fn markdown_report(evaluations: &[Evaluation], alpha: f64) -> String {
    let mut report = String::new();
    report.push_str("# lfsrlab — Randomness Test Report\n\n");
    report.push_str(&format!("Significance level: α = {alpha}\n\n"));

    for e in evaluations {
        let score = lfsrlab_tests::calculate_quality_score(&e.results);
        let passed = e.results.iter().filter(|r| r.passed(alpha)).count();
        report.push_str(&format!("## {}\n\n", e.name));
        report.push_str(&format!(
            "- Length: {} bits\n- Linear complexity: {}\n- Score: {:.1}/100\n- Passed: {}/{}\n\n",
            e.len,
            e.linear_complexity,
            score,
            passed,
            e.results.len()
        ));

        report.push_str("| Test | P | Grade | p-value | Statistic | Details |\n");
        report.push_str("|------|---|-------|---------|-----------|--------|\n");
        for t in &e.results {
            let ok = if t.passed(alpha) { "✓" } else { "✗" };
            let pval = t
                .p_value
                .applicable()
                .map(|p| format!("{p:.6}"))
                .unwrap_or_else(|| "n/a".to_string());
            report.push_str(&format!(
                "| {} | {} | {} | {} | {:.4} | {} |\n",
                t.name, ok, t.grade, pval, t.statistic, t.details
            ));
        }
        report.push_str("\n---\n\n");
    }

    report
}

/// Console table: one line per evaluation.
pub fn print_summary_table(evaluations: &[Evaluation], alpha: f64) {
    println!("\n{}", "=".repeat(64));
    println!(
        "{:<18} {:>8} {:>8} {:>7} {:>6} {:>8}",
        "Case", "Bits", "LC", "Score", "Grade", "Pass"
    );
    println!("{}", "-".repeat(64));
    for e in evaluations {
        let score = lfsrlab_tests::calculate_quality_score(&e.results);
        let grade = if score >= 80.0 {
            'A'
        } else if score >= 60.0 {
            'B'
        } else if score >= 40.0 {
            'C'
        } else if score >= 20.0 {
            'D'
        } else {
            'F'
        };
        let passed = e.results.iter().filter(|r| r.passed(alpha)).count();
        println!(
            "  {:<16} {:>8} {:>8} {:>7.1} {:>6} {:>5}/{}",
            e.name,
            e.len,
            e.linear_complexity,
            score,
            grade,
            passed,
            e.results.len()
        );
    }
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CliError::io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| CliError::io(path, e))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Serialize `value` as pretty JSON to `path`.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_file(path, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{MetricSummary, evaluate};
    use lfsrlab_tests::BatteryConfig;

    fn sample() -> Evaluation {
        let bits: Vec<u8> = (0..300).map(|i| ((i * 7 + i / 3) % 2) as u8).collect();
        evaluate("case", &bits, 0, &BatteryConfig::default())
    }

    #[test]
    fn test_summary_csv_columns() {
        let csv = summary_csv(&[sample()]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,len,lin_complexity,monobit,blockfreq_128,runs,cusum_fwd,cusum_rev,\
             approx_entropy_m2,maurer_L6,serial_m3_p1,serial_m3_p2"
        );
        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(row.len(), 12);
        assert_eq!(row[0], "case");
        assert_eq!(row[1], "300");
        // Maurer needs far more than 300 bits: written as 0.
        assert_eq!(row[9], "0");
    }

    #[test]
    fn test_summary_csv_empty() {
        assert!(summary_csv(&[]).is_empty());
    }

    #[test]
    fn test_summary_multi_csv_header() {
        let summary = CaseSummary {
            name: "L1".to_string(),
            metrics: vec![
                MetricSummary {
                    key: "len".to_string(),
                    mean: 10.0,
                    std: 0.0,
                    pass_rate: None,
                },
                MetricSummary {
                    key: "monobit".to_string(),
                    mean: 0.5,
                    std: 0.25,
                    pass_rate: Some(1.0),
                },
            ],
        };
        let csv = summary_multi_csv(&[summary]);
        assert_eq!(
            csv,
            "name,len_mean,len_std,monobit_mean,monobit_std,monobit_pass_rate\nL1,10,0,0.5,0.25,1\n"
        );
    }

    #[test]
    fn test_markdown_report_marks_inapplicable() {
        let report = markdown_report(&[sample()], 0.01);
        assert!(report.contains("## case"));
        assert!(report.contains("Maurer's Universal"));
        assert!(report.contains("n/a"));
    }
}
