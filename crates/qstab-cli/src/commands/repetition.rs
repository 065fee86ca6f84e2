//! Repetition command implementation.
//!
//! A distance-`d` bit-flip repetition code: `d` data qubits start off, and
//! each round injects errors and then measures the `d - 1` neighbouring
//! Z⊗Z parities. A flipped parity marks an error boundary. A final Z readout
//! of every data qubit is decoded by majority vote.

use anyhow::{Context, Result};
use console::style;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use qstab_core::{Axis, CircuitState, ErrorModel, MeasurementOracle, QubitHandle, SimulationConfig};

use super::common::{error_rng, print_check, print_json, progress_bar, resolve_config};
use crate::{OutputFormat, SimArgs};

/// One round of parity checks.
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    /// Zero-based round index.
    pub round: u32,
    /// Qubits hit by an error this round.
    pub injected: usize,
    /// Parity outcomes, `true` where a check fired.
    pub syndrome: Vec<bool>,
    /// Number of fired checks.
    pub weight: usize,
    /// Checks whose outcome changed since the previous round.
    pub detections: usize,
}

/// Summary of a repetition-code run.
#[derive(Debug, Serialize)]
pub struct RepetitionReport {
    /// Number of data qubits.
    pub distance: usize,
    /// Per-qubit error probability used each round.
    pub error_rate: f64,
    /// Seed, if the run was reproducible.
    pub seed: Option<u64>,
    /// Per-round syndromes.
    pub rounds: Vec<RoundReport>,
    /// Final Z readout of the data qubits.
    pub readout: Vec<bool>,
    /// Majority vote over the readout disagrees with the encoded zero.
    pub logical_flip: bool,
}

impl RepetitionReport {
    /// True if no check ever fired.
    pub fn is_quiet(&self) -> bool {
        self.rounds.iter().all(|r| r.weight == 0)
    }
}

/// The data qubits of a repetition code and its check layout.
pub struct RepetitionCode {
    data: Vec<QubitHandle>,
}

impl RepetitionCode {
    /// Allocate `distance` data qubits in the code's zero state.
    pub fn new<O: MeasurementOracle>(circuit: &mut CircuitState<O>, distance: usize) -> Self {
        let data = (0..distance).map(|_| circuit.add_off_qubit()).collect();
        Self { data }
    }

    /// The data qubits.
    pub fn data(&self) -> &[QubitHandle] {
        &self.data
    }

    /// Measure every neighbouring Z⊗Z parity.
    pub fn measure_syndrome<O: MeasurementOracle>(&self, circuit: &mut CircuitState<O>) -> Result<Vec<bool>> {
        self.data
            .windows(2)
            .map(|pair| {
                circuit
                    .measure_stabilizer(pair, Axis::Z)
                    .with_context(|| format!("Parity check {}-{} failed", pair[0], pair[1]))
            })
            .collect()
    }

    /// Measure every data qubit along Z.
    pub fn read_out<O: MeasurementOracle>(&self, circuit: &mut CircuitState<O>) -> Result<Vec<bool>> {
        self.data
            .iter()
            .map(|&q| {
                circuit
                    .measure(q, false)
                    .with_context(|| format!("Readout of {q} failed"))
            })
            .collect()
    }
}

/// Run `rounds` rounds of a distance-`distance` code.
pub fn run_rounds<O, R>(
    circuit: &mut CircuitState<O>,
    distance: usize,
    rounds: u32,
    noise: &ErrorModel,
    rng: &mut R,
    mut on_round: impl FnMut(&RoundReport),
) -> Result<(Vec<RoundReport>, Vec<bool>)>
where
    O: MeasurementOracle,
    R: Rng + ?Sized,
{
    let code = RepetitionCode::new(circuit, distance);
    let mut previous = vec![false; distance.saturating_sub(1)];
    let mut reports = Vec::with_capacity(rounds as usize);

    for round in 0..rounds {
        let injected = noise.inject(circuit, code.data(), rng)?;
        let syndrome = code.measure_syndrome(circuit)?;
        let weight = syndrome.iter().filter(|&&fired| fired).count();
        let detections = syndrome
            .iter()
            .zip(&previous)
            .filter(|(now, before)| now != before)
            .count();
        debug!(round, injected = injected.len(), weight, detections, "round complete");

        previous.clone_from(&syndrome);
        let report = RoundReport {
            round,
            injected: injected.len(),
            syndrome,
            weight,
            detections,
        };
        on_round(&report);
        reports.push(report);
    }

    let readout = code.read_out(circuit)?;
    Ok((reports, readout))
}

/// Run the repetition code under `config`.
pub fn simulate(
    distance: usize,
    rounds: u32,
    config: &SimulationConfig,
    format: OutputFormat,
) -> Result<RepetitionReport> {
    let mut circuit = CircuitState::from_config(config)?;
    let noise = config.noise.error_model()?;
    let mut rng = error_rng(config);

    let bar = progress_bar(u64::from(rounds), format)?;
    let (reports, readout) = run_rounds(&mut circuit, distance, rounds, &noise, &mut rng, |r| {
        bar.set_message(format!("weight {}", r.weight));
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    let flipped = readout.iter().filter(|&&on| on).count();
    let logical_flip = 2 * flipped > distance;
    info!(distance, rounds, flipped, logical_flip, "repetition code finished");

    Ok(RepetitionReport {
        distance,
        error_rate: noise.probability(),
        seed: config.seed,
        rounds: reports,
        readout,
        logical_flip,
    })
}

fn render_bits(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Execute the repetition command.
pub fn execute(distance: usize, rounds: u32, error_rate: Option<f64>, sim: &SimArgs) -> Result<()> {
    let config = resolve_config(sim, error_rate)?;

    if sim.format == OutputFormat::Table {
        println!(
            "{} Repetition code d={} for {} rounds (error rate {})",
            style("→").cyan().bold(),
            style(distance).green(),
            style(rounds).green(),
            style(config.noise.error_probability).yellow()
        );
    }

    let report = simulate(distance, rounds, &config, sim.format)?;

    match sim.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            let width = distance.max(8);
            println!(
                "\n  {:>5}  {:>8}  {:<width$}  {:>6}  {:>10}",
                "round", "injected", "syndrome", "weight", "detections"
            );
            for r in &report.rounds {
                println!(
                    "  {:>5}  {:>8}  {:<width$}  {:>6}  {:>10}",
                    r.round,
                    r.injected,
                    style(render_bits(&r.syndrome)).cyan(),
                    r.weight,
                    r.detections,
                );
            }
            println!("\n  Readout: {}", style(render_bits(&report.readout)).cyan());
            print_check(!report.logical_flip, "Majority vote recovers logical zero");
            if report.error_rate == 0.0 {
                print_check(report.is_quiet(), "All syndromes trivial");
            }
        }
    }

    Ok(())
}
