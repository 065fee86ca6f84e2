//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use qstab_core::SimulationConfig;

use crate::{OutputFormat, SimArgs};

/// Load a simulation config from a YAML file.
pub fn load_config(path: &Path) -> Result<SimulationConfig> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    serde_yaml_ng::from_str(&source)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Resolve the effective config: flags over file over defaults.
pub fn resolve_config(sim: &SimArgs, error_rate: Option<f64>) -> Result<SimulationConfig> {
    let base = match &sim.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };

    let config = base
        .with_seed_override(sim.seed)
        .with_error_probability_override(error_rate);
    config.validate().context("Invalid simulation config")?;
    Ok(config)
}

/// A generator for error sampling, seeded like the circuit when a seed is set.
pub fn error_rng(config: &SimulationConfig) -> StdRng {
    match config.seed {
        // Offset so errors and measurement outcomes draw different streams.
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    }
}

/// A progress bar over `len` steps, hidden when printing JSON.
pub fn progress_bar(len: u64, format: OutputFormat) -> Result<ProgressBar> {
    if format == OutputFormat::Json {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

/// Print `report` as pretty JSON.
pub fn print_json<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}

/// Print a check line: green tick if `ok`, red cross otherwise.
pub fn print_check(ok: bool, message: &str) {
    let mark = if ok {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    };
    println!("{mark} {message}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn sim_args(config: Option<PathBuf>, seed: Option<u64>) -> SimArgs {
        SimArgs {
            seed,
            config,
            format: OutputFormat::Table,
        }
    }

    #[test]
    fn test_load_config_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed: 42\nnoise:\n  error_probability: 0.125").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.noise.error_probability, 0.125);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/qstab.yaml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_config_bad_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed: [not, a, number]").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed: 1\nnoise:\n  error_probability: 0.5").unwrap();

        let args = sim_args(Some(file.path().to_path_buf()), Some(2));
        let config = resolve_config(&args, Some(0.25)).unwrap();
        assert_eq!(config.seed, Some(2));
        assert_eq!(config.noise.error_probability, 0.25);

        let config = resolve_config(&sim_args(Some(file.path().to_path_buf()), None), None).unwrap();
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.noise.error_probability, 0.5);
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_config(&sim_args(None, None), None).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_out_of_range_error_rate_rejected() {
        assert!(resolve_config(&sim_args(None, None), Some(1.5)).is_err());
    }
}
