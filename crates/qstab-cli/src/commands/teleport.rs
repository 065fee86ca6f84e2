//! Teleport command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use console::style;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use qstab_core::{CircuitState, ErrorModel, MeasurementOracle, QubitHandle, SimulationConfig};

use super::common::{error_rng, print_check, print_json, progress_bar, resolve_config};
use crate::{OutputFormat, SimArgs};

/// Outcome of one teleportation shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shot {
    /// Bell-measurement outcome driving the X correction.
    pub x_correction: bool,
    /// Bell-measurement outcome driving the Z correction.
    pub z_correction: bool,
    /// Both check qubits came back off.
    pub success: bool,
}

/// Summary of a teleport run.
#[derive(Debug, Serialize)]
pub struct TeleportReport {
    /// Shots run.
    pub shots: u32,
    /// Shots where both check qubits came back off.
    pub successes: u32,
    /// Per-qubit error probability used.
    pub error_rate: f64,
    /// Seed, if the run was reproducible.
    pub seed: Option<u64>,
    /// Shot counts keyed by the correction bits, X then Z (`"01"` = Z only).
    pub corrections: BTreeMap<String, u32>,
}

/// Prepare a Bell pair from two fresh qubits using H and CZ.
fn bell_pair<O: MeasurementOracle>(circuit: &mut CircuitState<O>) -> Result<(QubitHandle, QubitHandle)> {
    let a = circuit.add_off_qubit();
    let b = circuit.add_off_qubit();
    circuit.h(a)?;
    circuit.h(b)?;
    circuit.cz(a, b)?;
    circuit.h(b)?;
    Ok((a, b))
}

/// Teleport `m`'s half of the pair (e, m) onto `b` and undo the pair.
///
/// Errors drawn from `noise` hit all four qubits right after preparation.
/// Every qubit is dropped again before returning, so the circuit can be
/// reused for the next shot.
pub fn run_shot<O, R>(circuit: &mut CircuitState<O>, noise: &ErrorModel, rng: &mut R) -> Result<Shot>
where
    O: MeasurementOracle,
    R: Rng + ?Sized,
{
    let (a, b) = bell_pair(circuit)?;
    let (e, m) = bell_pair(circuit)?;
    noise.inject(circuit, &[a, b, e, m], rng)?;

    // Bell measurement of m and a.
    circuit.h(a)?;
    circuit.cz(m, a)?;
    circuit.h(a)?;
    circuit.h(m)?;
    let x_correction = circuit.drop_qubit(a)?;
    if x_correction {
        circuit.x(b)?;
    }
    let z_correction = circuit.drop_qubit(m)?;
    if z_correction {
        circuit.z(b)?;
    }

    // b and e are now the pair m and e were: unprepare and check.
    circuit.h(b)?;
    circuit.cz(e, b)?;
    circuit.h(b)?;
    circuit.h(e)?;
    let b_on = circuit.drop_qubit(b)?;
    let e_on = circuit.drop_qubit(e)?;

    Ok(Shot {
        x_correction,
        z_correction,
        success: !b_on && !e_on,
    })
}

/// Run `shots` teleportations under `config`.
pub fn simulate(shots: u32, config: &SimulationConfig, format: OutputFormat) -> Result<TeleportReport> {
    let mut circuit = CircuitState::from_config(config)?;
    let noise = config.noise.error_model()?;
    let mut rng = error_rng(config);

    let mut successes = 0;
    let mut corrections = BTreeMap::new();
    let bar = progress_bar(u64::from(shots), format)?;
    for shot in 0..shots {
        let outcome = run_shot(&mut circuit, &noise, &mut rng)
            .with_context(|| format!("Shot {shot} failed"))?;
        if outcome.success {
            successes += 1;
        }
        let key = format!(
            "{}{}",
            u8::from(outcome.x_correction),
            u8::from(outcome.z_correction)
        );
        *corrections.entry(key).or_insert(0) += 1;
        bar.inc(1);
    }
    bar.finish_and_clear();

    info!(shots, successes, "teleportation finished");
    Ok(TeleportReport {
        shots,
        successes,
        error_rate: noise.probability(),
        seed: config.seed,
        corrections,
    })
}

/// Execute the teleport command.
pub fn execute(shots: u32, sim: &SimArgs) -> Result<()> {
    let config = resolve_config(sim, None)?;

    if sim.format == OutputFormat::Table {
        println!(
            "{} Teleporting {} shots (error rate {})",
            style("→").cyan().bold(),
            style(shots).green(),
            style(config.noise.error_probability).yellow()
        );
    }

    let report = simulate(shots, &config, sim.format)?;

    match sim.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            print_check(
                report.successes == report.shots,
                &format!("{}/{} shots arrived intact", report.successes, report.shots),
            );
            println!("\n  Corrections (X Z):");
            for (bits, count) in &report.corrections {
                let share = f64::from(*count) / f64::from(report.shots.max(1)) * 100.0;
                println!("    {}: {:>6} ({:>5.2}%)", style(bits).cyan(), count, share);
            }
        }
    }

    Ok(())
}
