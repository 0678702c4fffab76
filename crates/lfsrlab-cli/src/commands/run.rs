use std::path::{Path, PathBuf};

use crate::config::ExperimentConfig;
use crate::error::CliError;
use crate::experiment::{self, Evaluation};
use crate::report;

/// Options for `lfsrlab run`.
pub struct RunCommandConfig<'a> {
    pub output_dir: &'a Path,
    pub json: bool,
}

/// Single trial from the fixed initial states.
///
/// Writes `summary.csv` (and `summary.json` with `--json`) into the output
/// directory and returns the evaluations in case order.
pub fn run(
    config: &ExperimentConfig,
    opts: &RunCommandConfig<'_>,
) -> Result<Vec<Evaluation>, CliError> {
    let registers = super::fixed_registers(config)?;
    println!(
        "Generating {} bits from {} registers...",
        config.bits,
        registers.len()
    );

    let evaluations = experiment::run_trial(&registers, config)?;

    super::ensure_dir(opts.output_dir)?;
    let csv_path = opts.output_dir.join("summary.csv");
    report::write_file(&csv_path, &report::summary_csv(&evaluations))?;
    let mut written: Vec<PathBuf> = vec![csv_path];
    if opts.json {
        let json_path = opts.output_dir.join("summary.json");
        report::write_json(&json_path, &evaluations)?;
        written.push(json_path);
    }

    report::print_summary_table(&evaluations, config.alpha);
    println!();
    for path in &written {
        println!("Saved {}", path.display());
    }
    Ok(evaluations)
}
