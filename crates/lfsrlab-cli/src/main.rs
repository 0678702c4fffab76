//! CLI for lfsrlab — linear complexity and randomness of LFSR combiners.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lfsrlab_cli::commands;
use lfsrlab_cli::{CliError, Overrides};

#[derive(Parser)]
#[command(name = "lfsrlab")]
#[command(about = "lfsrlab — linear complexity and NIST-style tests for LFSR keystreams")]
#[command(version = lfsrlab_core::VERSION)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One trial from the fixed initial states: L1, L2, L3 and the three
    /// combiners. Writes summary.csv.
    Run {
        /// Directory for summary files
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// JSON configuration file (registers, lengths, battery parameters)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bits drawn from each register
        #[arg(long)]
        bits: Option<usize>,

        /// Bits fed to Berlekamp-Massey (0 = whole sequence)
        #[arg(long)]
        bm_prefix: Option<usize>,

        /// Significance level for pass/fail
        #[arg(long)]
        alpha: Option<f64>,

        /// Also write summary.json with every test result
        #[arg(long)]
        json: bool,
    },

    /// Repeated trials with random initial states. Writes summary_multi.csv.
    Multi {
        /// Directory for summary files
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of repetitions
        #[arg(long)]
        reps: Option<usize>,

        /// Seed for the random initial states
        #[arg(long)]
        seed: Option<u64>,

        /// Bits drawn from each register
        #[arg(long)]
        bits: Option<usize>,

        /// Bits fed to Berlekamp-Massey (0 = whole sequence)
        #[arg(long)]
        bm_prefix: Option<usize>,

        /// Significance level for pass rates
        #[arg(long)]
        alpha: Option<f64>,
    },

    /// Run the solver and the test battery on a file.
    Analyze {
        /// Input file (raw bytes, unpacked MSB first)
        file: PathBuf,

        /// Read the file as text of '0'/'1' characters
        #[arg(long)]
        ascii: bool,

        /// JSON configuration file; only `battery` and `alpha` are used
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bits fed to Berlekamp-Massey (0 = whole sequence)
        #[arg(long)]
        bm_prefix: Option<usize>,

        /// Significance level for pass/fail
        #[arg(long)]
        alpha: Option<f64>,

        /// Write a Markdown report to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn dispatch(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Run {
            output_dir,
            config,
            bits,
            bm_prefix,
            alpha,
            json,
        } => {
            let config = commands::resolve_config(
                config.as_deref(),
                Overrides {
                    bits,
                    bm_prefix,
                    alpha,
                    ..Default::default()
                },
            )?;
            commands::run::run(
                &config,
                &commands::run::RunCommandConfig {
                    output_dir: &output_dir,
                    json,
                },
            )?;
        }
        Commands::Multi {
            output_dir,
            config,
            reps,
            seed,
            bits,
            bm_prefix,
            alpha,
        } => {
            let config = commands::resolve_config(
                config.as_deref(),
                Overrides {
                    bits,
                    reps,
                    seed,
                    alpha,
                    bm_prefix,
                },
            )?;
            commands::multi::run(&config, &output_dir)?;
        }
        Commands::Analyze {
            file,
            ascii,
            config,
            bm_prefix,
            alpha,
            output,
        } => {
            let config = commands::resolve_analysis_config(
                config.as_deref(),
                Overrides {
                    bm_prefix,
                    alpha,
                    ..Default::default()
                },
            )?;
            commands::analyze::run(&commands::analyze::AnalyzeCommandConfig {
                input: &file,
                ascii,
                bm_prefix: config.bm_prefix,
                alpha: config.alpha,
                battery: &config.battery,
                output_path: output.as_deref(),
            })?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = dispatch(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
