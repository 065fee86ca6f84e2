//! Independent bit-flip / phase-flip error injection.
//!
//! Each visited qubit is hit with probability `p`. A hit qubit then gets,
//! independently with probability ½ each, an X (bit flip) and a Z (phase
//! flip). So a hit is a uniformly random Pauli from {I, X, Z, XZ}.
//!
//! Errors are applied as ordinary gates on the [`CircuitState`]; there is no
//! separate error frame.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::circuit::{CircuitState, QubitHandle};
use crate::error::{StabError, StabResult};
use crate::observable::Axis;
use crate::oracle::MeasurementOracle;

/// A Pauli error applied to one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InjectedError {
    /// The qubit that was hit.
    pub qubit: QubitHandle,
    /// Whether an X was applied.
    pub bit_flip: bool,
    /// Whether a Z was applied.
    pub phase_flip: bool,
}

/// Per-qubit error rate.
///
/// Deserialization goes through [`ErrorModel::new`], so an out-of-range
/// probability is rejected there too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawErrorModel")]
pub struct ErrorModel {
    probability: f64,
}

#[derive(Deserialize)]
struct RawErrorModel {
    probability: f64,
}

impl TryFrom<RawErrorModel> for ErrorModel {
    type Error = StabError;

    fn try_from(raw: RawErrorModel) -> StabResult<Self> {
        Self::new(raw.probability)
    }
}

impl ErrorModel {
    /// An error model hitting each qubit with probability `probability`.
    pub fn new(probability: f64) -> StabResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(StabError::InvalidProbability(probability));
        }
        Ok(Self { probability })
    }

    /// A model that never injects anything.
    pub fn noiseless() -> Self {
        Self { probability: 0.0 }
    }

    /// The per-qubit hit probability.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Sample and apply errors to `qubits`.
    ///
    /// All handles are checked before any error is applied. Hits that drew
    /// neither flip are not reported.
    pub fn inject<O, R>(
        &self,
        circuit: &mut CircuitState<O>,
        qubits: &[QubitHandle],
        rng: &mut R,
    ) -> StabResult<Vec<InjectedError>>
    where
        O: MeasurementOracle,
        R: Rng + ?Sized,
    {
        if let Some(&missing) = qubits.iter().find(|&&q| !circuit.contains(q)) {
            return Err(StabError::UnknownHandle {
                handle: missing,
                operation: Some("inject"),
            });
        }

        let mut injected = Vec::new();
        if self.probability == 0.0 {
            return Ok(injected);
        }
        for &qubit in qubits {
            if !rng.gen_bool(self.probability) {
                continue;
            }
            let bit_flip = rng.gen_bool(0.5);
            let phase_flip = rng.gen_bool(0.5);
            if bit_flip {
                flip(circuit, qubit, Axis::X)?;
            }
            if phase_flip {
                flip(circuit, qubit, Axis::Z)?;
            }
            if bit_flip || phase_flip {
                injected.push(InjectedError {
                    qubit,
                    bit_flip,
                    phase_flip,
                });
            }
        }
        debug!(
            visited = qubits.len(),
            injected = injected.len(),
            p = self.probability,
            "injected errors"
        );
        Ok(injected)
    }
}

impl Default for ErrorModel {
    fn default() -> Self {
        Self::noiseless()
    }
}

/// Apply a deliberate flip: X for [`Axis::X`], Z for [`Axis::Z`].
pub fn flip<O: MeasurementOracle>(
    circuit: &mut CircuitState<O>,
    qubit: QubitHandle,
    axis: Axis,
) -> StabResult<()> {
    match axis {
        Axis::X => circuit.x(qubit),
        Axis::Z => circuit.z(qubit),
    }
}
