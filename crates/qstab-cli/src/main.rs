//! qstab Command-Line Interface
//!
//! Replays canned stabilizer circuits against `qstab-core` for smoke
//! testing and demos.
//!
//! ```text
//! qstab teleport --shots 1000 --seed 7
//! qstab repetition --distance 5 --rounds 10 --error-rate 0.01 --format json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{repetition, teleport, version};

/// qstab - symbolic stabilizer-circuit simulation
#[derive(Parser, Debug)]
#[command(name = "qstab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Teleport half of a Bell pair and check it arrived intact
    Teleport {
        /// Number of shots
        #[arg(short, long, default_value = "1000")]
        shots: u32,

        #[command(flatten)]
        sim: SimArgs,
    },

    /// Run parity-check rounds of a bit-flip repetition code
    Repetition {
        /// Number of data qubits
        #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u32).range(2..))]
        distance: u32,

        /// Number of check rounds
        #[arg(short, long, default_value = "10")]
        rounds: u32,

        /// Per-qubit error probability per round (overrides the config file)
        #[arg(short, long, env = "QSTAB_ERROR_RATE")]
        error_rate: Option<f64>,

        #[command(flatten)]
        sim: SimArgs,
    },

    /// Show version information
    Version,
}

/// Options shared by every simulation command.
#[derive(Args, Debug, Clone)]
pub struct SimArgs {
    /// Seed for measurement outcomes and errors (overrides the config file)
    #[arg(long, env = "QSTAB_SEED")]
    pub seed: Option<u64>,

    /// YAML simulation config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// How a command prints its report.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary
    Table,
    /// Machine-readable JSON on stdout
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Teleport { shots, sim } => teleport::execute(shots, &sim),

        Commands::Repetition {
            distance,
            rounds,
            error_rate,
            sim,
        } => repetition::execute(distance as usize, rounds, error_rate, &sim),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_teleport_defaults() {
        let cli = Cli::try_parse_from(["qstab", "teleport"]).unwrap();
        match cli.command {
            Commands::Teleport { shots, sim } => {
                assert_eq!(shots, 1000);
                assert!(sim.config.is_none());
                assert_eq!(sim.format, OutputFormat::Table);
            }
            other => panic!("Expected Teleport command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_teleport_with_options() {
        let cli = Cli::try_parse_from([
            "qstab", "teleport", "-s", "64", "--seed", "9", "-f", "json", "-c", "sim.yaml",
        ])
        .unwrap();
        match cli.command {
            Commands::Teleport { shots, sim } => {
                assert_eq!(shots, 64);
                assert_eq!(sim.seed, Some(9));
                assert_eq!(sim.format, OutputFormat::Json);
                assert_eq!(sim.config, Some(PathBuf::from("sim.yaml")));
            }
            other => panic!("Expected Teleport command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_repetition() {
        let cli = Cli::try_parse_from([
            "qstab",
            "repetition",
            "--distance",
            "7",
            "--rounds",
            "3",
            "--error-rate",
            "0.05",
        ])
        .unwrap();
        match cli.command {
            Commands::Repetition {
                distance,
                rounds,
                error_rate,
                ..
            } => {
                assert_eq!(distance, 7);
                assert_eq!(rounds, 3);
                assert_eq!(error_rate, Some(0.05));
            }
            other => panic!("Expected Repetition command, got {other:?}"),
        }
    }

    #[test]
    fn test_repetition_distance_must_allow_a_check() {
        assert!(Cli::try_parse_from(["qstab", "repetition", "--distance", "1"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["qstab", "version", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["qstab", "teleport", "--format", "xml"]).is_err());
    }
}
