//! Per-qubit stabilizer frames.
//!
//! A qubit is tracked by two observable products: what its X-axis
//! measurement would equal and what its Z-axis measurement would equal,
//! each written in terms of the circuit's free variables. The Y axis is
//! implied, `Y = X · Z · sign_y`, so only its sign is stored.
//!
//! Gates act in the Heisenberg picture: after a Clifford `U`, measuring
//! Pauli `P` is the same as having measured `U† P U` before, so each gate
//! rewrites the stored products by the conjugation table of `U`.
//!
//! | Gate | X ↦ | Z ↦ | sign_y |
//! |------|-----|-----|--------|
//! | `x`  | X   | −Z  | kept |
//! | `z`  | −X  | Z   | kept |
//! | `y`  | −X  | −Z  | kept |
//! | `h`  | Z   | X   | flipped |
//! | `sqrt_x` | X | Y | flipped |
//! | `sqrt_y` | Z | −X | flipped |
//! | `sqrt_z` | −Y | Z | flipped |

use std::fmt;

use crate::error::{StabError, StabResult};
use crate::measurement::MeasurementResult;
use crate::observable::{Axis, ObservableProduct, Sign, VarId};
use crate::oracle::MeasurementOracle;

/// The stabilizer frame of one qubit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QubitState {
    obs_x: ObservableProduct,
    obs_z: ObservableProduct,
    sign_y: Sign,
}

/// Outcome of [`QubitState::measure_z`]: the post-measurement frame and the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZCollapse {
    /// The qubit's frame after the measurement.
    pub state: QubitState,
    /// What was measured and how to eliminate with it.
    pub result: MeasurementResult,
}

impl QubitState {
    /// Create a frame from its axis observables.
    ///
    /// Fails if neither observable has a free variable: X and Z anticommute,
    /// so they cannot both have definite values.
    pub fn new(obs_x: ObservableProduct, obs_z: ObservableProduct, sign_y: Sign) -> StabResult<Self> {
        if obs_x.is_constant() && obs_z.is_constant() {
            return Err(StabError::TrivialQubit {
                x: obs_x.to_string(),
                z: obs_z.to_string(),
            });
        }
        Ok(Self {
            obs_x,
            obs_z,
            sign_y,
        })
    }

    /// A qubit in |0⟩: Z reads +1, X is the free variable `x_id`.
    pub fn off(x_id: VarId) -> Self {
        Self {
            obs_x: ObservableProduct::var(x_id),
            obs_z: ObservableProduct::one(),
            sign_y: Sign::Plus,
        }
    }

    /// A qubit about which nothing is known: both axes are free variables.
    pub fn unknown(x_id: VarId, z_id: VarId) -> Self {
        Self {
            obs_x: ObservableProduct::var(x_id),
            obs_z: ObservableProduct::var(z_id),
            sign_y: Sign::Plus,
        }
    }

    /// The X-axis observable.
    pub fn obs_x(&self) -> &ObservableProduct {
        &self.obs_x
    }

    /// The Z-axis observable.
    pub fn obs_z(&self) -> &ObservableProduct {
        &self.obs_z
    }

    /// The implied Y-axis observable, `X · Z · sign_y`.
    pub fn obs_y(&self) -> ObservableProduct {
        self.obs_x.times(&self.obs_z) * self.sign_y
    }

    /// Sign relating Y to `X · Z`.
    pub fn sign_y(&self) -> Sign {
        self.sign_y
    }

    /// The observable tracked along `axis`.
    pub fn obs(&self, axis: Axis) -> &ObservableProduct {
        match axis {
            Axis::X => &self.obs_x,
            Axis::Z => &self.obs_z,
        }
    }

    pub(crate) fn obs_mut(&mut self, axis: Axis) -> &mut ObservableProduct {
        match axis {
            Axis::X => &mut self.obs_x,
            Axis::Z => &mut self.obs_z,
        }
    }

    /// True if a Z measurement has a predetermined outcome.
    pub fn is_z_determined(&self) -> bool {
        self.obs_z.is_constant()
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Pauli X.
    pub fn x(&mut self) -> &mut Self {
        self.obs_z.negate();
        self
    }

    /// Pauli Y.
    pub fn y(&mut self) -> &mut Self {
        self.obs_x.negate();
        self.obs_z.negate();
        self
    }

    /// Pauli Z.
    pub fn z(&mut self) -> &mut Self {
        self.obs_x.negate();
        self
    }

    /// Hadamard.
    pub fn h(&mut self) -> &mut Self {
        std::mem::swap(&mut self.obs_x, &mut self.obs_z);
        self.sign_y = -self.sign_y;
        self
    }

    /// 90° right-handed rotation around X.
    pub fn sqrt_x(&mut self) -> &mut Self {
        // Z ← Y
        self.obs_z.times_assign(&self.obs_x);
        self.obs_z *= self.sign_y;
        self.sign_y = -self.sign_y;
        self
    }

    /// 90° right-handed rotation around Y.
    pub fn sqrt_y(&mut self) -> &mut Self {
        std::mem::swap(&mut self.obs_x, &mut self.obs_z);
        self.obs_z.negate();
        self.sign_y = -self.sign_y;
        self
    }

    /// 90° right-handed rotation around Z (the S gate).
    pub fn sqrt_z(&mut self) -> &mut Self {
        // X ← −Y
        self.obs_x.times_assign(&self.obs_z);
        self.obs_x *= -self.sign_y;
        self.sign_y = -self.sign_y;
        self
    }

    /// Inverse of [`QubitState::sqrt_x`].
    pub fn sqrt_x_dag(&mut self) -> &mut Self {
        self.sqrt_x().sqrt_x().sqrt_x()
    }

    /// Inverse of [`QubitState::sqrt_y`].
    pub fn sqrt_y_dag(&mut self) -> &mut Self {
        self.sqrt_y().sqrt_y().sqrt_y()
    }

    /// Inverse of [`QubitState::sqrt_z`].
    pub fn sqrt_z_dag(&mut self) -> &mut Self {
        self.sqrt_z().sqrt_z().sqrt_z()
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Controlled-Z between `self` and `other`.
    ///
    /// Only X observables change, and each update reads the partner's Z,
    /// which no update writes, so the two updates never see each other.
    pub fn cz(&mut self, other: &mut QubitState) {
        self.obs_x.times_assign(&other.obs_z);
        other.obs_x.times_assign(&self.obs_z);
    }

    /// Controlled-NOT with `self` as control.
    pub fn cnot(&mut self, target: &mut QubitState) {
        self.obs_x.times_assign(&target.obs_x);
        target.obs_z.times_assign(&self.obs_z);
    }

    /// X-controlled NOT: symmetric, Z of each picks up X of the other.
    pub fn xnot(&mut self, other: &mut QubitState) {
        self.obs_z.times_assign(&other.obs_x);
        other.obs_z.times_assign(&self.obs_x);
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Substitute a measurement's eliminated variable out of both axes.
    ///
    /// Returns whether anything changed.
    pub fn rewrite_with(&mut self, result: &MeasurementResult) -> bool {
        let x = result.rewrite_in_place(&mut self.obs_x);
        let z = result.rewrite_in_place(&mut self.obs_z);
        x || z
    }

    /// Measure along Z.
    ///
    /// A predetermined Z returns this frame unchanged without touching the
    /// oracle or `fresh_id`. Otherwise the outcome is drawn from `oracle`,
    /// Z becomes that constant, and X becomes the new free variable
    /// `fresh_id()`.
    pub fn measure_z<O>(
        &self,
        fresh_id: impl FnOnce() -> VarId,
        oracle: &mut O,
    ) -> StabResult<ZCollapse>
    where
        O: MeasurementOracle + ?Sized,
    {
        if self.obs_z.is_constant() {
            let result = MeasurementResult::new(self.obs_z.clone(), self.obs_z.sign())?;
            return Ok(ZCollapse {
                state: self.clone(),
                result,
            });
        }

        let result = MeasurementResult::new(self.obs_z.clone(), oracle.sample())?;
        let state = QubitState {
            obs_x: ObservableProduct::var(fresh_id()),
            obs_z: ObservableProduct::constant(result.result()),
            sign_y: Sign::Plus,
        };
        Ok(ZCollapse { state, result })
    }
}

impl fmt::Display for QubitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Q(X={}, Z={}, Y={}X*Z)",
            self.obs_x,
            self.obs_z,
            if self.sign_y.is_minus() { "-" } else { "" }
        )
    }
}
