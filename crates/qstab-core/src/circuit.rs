//! The state of every qubit in a stabilizer circuit.
//!
//! [`CircuitState`] owns the live qubits, keyed by [`QubitHandle`], and the
//! counters that mint handles and variable ids. Gates look up the qubit
//! frames they touch and rewrite them in place; measurements collapse a
//! frame and then broadcast the resulting variable elimination to every
//! live qubit, which is what keeps correlations consistent after a collapse.
//!
//! Variable namespaces:
//!
//! - `q<h>`: X variable of an off qubit allocated as handle `h`
//! - `x<h>`, `z<h>`: axis variables of an unknown qubit allocated as handle `h`
//! - `m<n>`: variables minted by measurements (fresh X after collapse, kickback)
//!
//! Handles are never reused, so none of these ever collide.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::SimulationConfig;
use crate::error::{StabError, StabResult};
use crate::measurement::MeasurementResult;
use crate::observable::{Axis, ObservableProduct, VarId};
use crate::oracle::{MeasurementOracle, RngOracle};
use crate::qubit::QubitState;

/// Opaque handle for a qubit allocated in a [`CircuitState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitHandle(pub u64);

impl fmt::Display for QubitHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Names one stored axis observable of one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservableRef {
    /// The qubit.
    pub qubit: QubitHandle,
    /// Which of its axes.
    pub axis: Axis,
}

impl ObservableRef {
    /// Reference `qubit`'s observable along `axis`.
    pub fn new(qubit: QubitHandle, axis: Axis) -> Self {
        Self { qubit, axis }
    }

    /// Reference `qubit`'s X observable.
    pub fn x(qubit: QubitHandle) -> Self {
        Self::new(qubit, Axis::X)
    }

    /// Reference `qubit`'s Z observable.
    pub fn z(qubit: QubitHandle) -> Self {
        Self::new(qubit, Axis::Z)
    }
}

/// All qubits of a stabilizer circuit, with operations that mutate them.
///
/// Cloning copies every frame and both counters, so a clone evolves
/// independently (undo/redo snapshots). The oracle is cloned along with it;
/// a cloned seeded oracle replays the same outcomes.
#[derive(Debug, Clone)]
pub struct CircuitState<O = RngOracle> {
    qubits: FxHashMap<QubitHandle, QubitState>,
    next_handle: u64,
    next_var: u64,
    oracle: O,
}

impl CircuitState<RngOracle> {
    /// An empty circuit whose random outcomes come from OS entropy.
    pub fn new() -> Self {
        Self::with_oracle(RngOracle::from_entropy())
    }

    /// An empty circuit with reproducible random outcomes.
    pub fn seeded(seed: u64) -> Self {
        Self::with_oracle(RngOracle::seeded(seed))
    }

    /// An empty circuit set up according to `config`.
    pub fn from_config(config: &SimulationConfig) -> StabResult<Self> {
        config.validate()?;
        Ok(match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        })
    }
}

impl Default for CircuitState<RngOracle> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: MeasurementOracle> CircuitState<O> {
    /// An empty circuit drawing random outcomes from `oracle`.
    pub fn with_oracle(oracle: O) -> Self {
        Self {
            qubits: FxHashMap::default(),
            next_handle: 0,
            next_var: 0,
            oracle,
        }
    }

    /// The outcome source.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Mutable access to the outcome source.
    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Add a qubit in the off (|0⟩) state.
    pub fn add_off_qubit(&mut self) -> QubitHandle {
        let handle = self.mint_handle();
        let state = QubitState::off(VarId::numbered('q', handle.0));
        self.qubits.insert(handle, state);
        trace!(qubit = %handle, "allocated off qubit");
        handle
    }

    /// Add a qubit in an unknown state: both axes are fresh variables.
    pub fn add_unknown_qubit(&mut self) -> QubitHandle {
        let handle = self.mint_handle();
        let n = handle.0;
        let state = QubitState::unknown(VarId::numbered('x', n), VarId::numbered('z', n));
        self.qubits.insert(handle, state);
        trace!(qubit = %handle, "allocated unknown qubit");
        handle
    }

    /// Measure a qubit, then remove it from the circuit.
    ///
    /// Measuring first eliminates the qubit's variables from everything it
    /// was entangled with, so no live observable refers to a dropped qubit.
    /// Returns the measurement outcome.
    pub fn drop_qubit(&mut self, handle: QubitHandle) -> StabResult<bool> {
        let on = self.measure_with(handle, false, "drop_qubit")?;
        self.qubits.remove(&handle);
        trace!(qubit = %handle, on, "dropped qubit");
        Ok(on)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Number of live qubits.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// True if the circuit has no live qubits.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// True if `handle` names a live qubit.
    pub fn contains(&self, handle: QubitHandle) -> bool {
        self.qubits.contains_key(&handle)
    }

    /// Live handles in allocation order.
    pub fn handles(&self) -> Vec<QubitHandle> {
        let mut handles: Vec<QubitHandle> = self.qubits.keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    /// The frame of a live qubit.
    pub fn qubit(&self, handle: QubitHandle) -> Option<&QubitState> {
        self.qubits.get(&handle)
    }

    /// The stored observable named by `obs`.
    pub fn observable(&self, obs: ObservableRef) -> StabResult<&ObservableProduct> {
        self.qubits
            .get(&obs.qubit)
            .map(|q| q.obs(obs.axis))
            .ok_or(StabError::UnknownHandle {
                handle: obs.qubit,
                operation: None,
            })
    }

    /// True if measuring `handle` along Z has a predetermined outcome.
    pub fn is_deterministic(&self, handle: QubitHandle) -> StabResult<bool> {
        self.qubits
            .get(&handle)
            .map(QubitState::is_z_determined)
            .ok_or(StabError::UnknownHandle {
                handle,
                operation: Some("is_deterministic"),
            })
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Pauli X.
    pub fn x(&mut self, handle: QubitHandle) -> StabResult<()> {
        self.apply(handle, "x", |q| {
            q.x();
        })
    }

    /// Pauli Y.
    pub fn y(&mut self, handle: QubitHandle) -> StabResult<()> {
        self.apply(handle, "y", |q| {
            q.y();
        })
    }

    /// Pauli Z.
    pub fn z(&mut self, handle: QubitHandle) -> StabResult<()> {
        self.apply(handle, "z", |q| {
            q.z();
        })
    }

    /// Hadamard.
    pub fn h(&mut self, handle: QubitHandle) -> StabResult<()> {
        self.apply(handle, "h", |q| {
            q.h();
        })
    }

    /// Phase gate, √Z.
    pub fn s(&mut self, handle: QubitHandle) -> StabResult<()> {
        self.apply(handle, "s", |q| {
            q.sqrt_z();
        })
    }

    /// Inverse phase gate.
    pub fn s_dag(&mut self, handle: QubitHandle) -> StabResult<()> {
        self.apply(handle, "s_dag", |q| {
            q.sqrt_z_dag();
        })
    }

    /// √X.
    pub fn sqrt_x(&mut self, handle: QubitHandle) -> StabResult<()> {
        self.apply(handle, "sqrt_x", |q| {
            q.sqrt_x();
        })
    }

    /// √Y.
    pub fn sqrt_y(&mut self, handle: QubitHandle) -> StabResult<()> {
        self.apply(handle, "sqrt_y", |q| {
            q.sqrt_y();
        })
    }

    /// Controlled-Z.
    pub fn cz(&mut self, a: QubitHandle, b: QubitHandle) -> StabResult<()> {
        self.apply_pair(a, b, "cz", QubitState::cz)
    }

    /// Controlled-NOT.
    pub fn cnot(&mut self, control: QubitHandle, target: QubitHandle) -> StabResult<()> {
        self.apply_pair(control, target, "cnot", QubitState::cnot)
    }

    /// X-controlled NOT.
    pub fn xnot(&mut self, a: QubitHandle, b: QubitHandle) -> StabResult<()> {
        self.apply_pair(a, b, "xnot", QubitState::xnot)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure a qubit along Z. Returns true for the on (−1) outcome.
    ///
    /// With `reset`, an on outcome is followed by an X so the qubit ends off.
    pub fn measure(&mut self, handle: QubitHandle, reset: bool) -> StabResult<bool> {
        self.measure_with(handle, reset, "measure")
    }

    /// Measure a qubit along `axis`. Returns true for the −1 outcome.
    ///
    /// With `reset`, the qubit is left in the +1 eigenstate of `axis`.
    pub fn measure_along(&mut self, handle: QubitHandle, axis: Axis, reset: bool) -> StabResult<bool> {
        self.require(handle, "measure_along")?;
        if axis == Axis::X {
            self.h(handle)?;
        }
        let on = self.measure(handle, reset)?;
        if axis == Axis::X {
            self.h(handle)?;
        }
        Ok(on)
    }

    /// Force a qubit into an eigenstate of `axis`: −1 if `on`, +1 otherwise.
    pub fn reset(&mut self, handle: QubitHandle, axis: Axis, on: bool) -> StabResult<()> {
        self.measure_with(handle, true, "reset")?;
        if on {
            self.x(handle)?;
        }
        if axis == Axis::X {
            self.h(handle)?;
        }
        Ok(())
    }

    /// Measure the product of the `targets` observables.
    ///
    /// `collaterals` are the anticommuting partners of the measured operator
    /// on each target qubit. Measuring a multi-qubit parity by CNOT-ing into
    /// an ancilla kicks a fresh variable back into those partners; that
    /// variable is added to each of them before the elimination is
    /// broadcast. A product with no free variables is predetermined: its
    /// sign is returned and nothing is touched.
    pub fn measure_observable(
        &mut self,
        targets: &[ObservableRef],
        collaterals: &[ObservableRef],
    ) -> StabResult<bool> {
        let mut product = ObservableProduct::one();
        for target in targets {
            product.times_assign(self.observable(*target).map_err(|_| StabError::UnknownHandle {
                handle: target.qubit,
                operation: Some("measure_observable"),
            })?);
        }
        self.require_refs(collaterals, "measure_observable")?;
        self.collapse_product(product, collaterals, targets.len())
    }

    /// Like [`CircuitState::measure_observable`] for an already-built product.
    pub fn measure_product(
        &mut self,
        product: &ObservableProduct,
        collaterals: &[ObservableRef],
    ) -> StabResult<bool> {
        self.require_refs(collaterals, "measure_product")?;
        self.collapse_product(product.clone(), collaterals, 0)
    }

    /// Measure the `axis` parity of a group of qubits (a stabilizer check).
    ///
    /// The partners kicked by the measurement are the same qubits' opposite
    /// axis observables.
    pub fn measure_stabilizer(&mut self, qubits: &[QubitHandle], axis: Axis) -> StabResult<bool> {
        let targets: Vec<ObservableRef> = qubits.iter().map(|&q| ObservableRef::new(q, axis)).collect();
        let collaterals: Vec<ObservableRef> = qubits
            .iter()
            .map(|&q| ObservableRef::new(q, axis.opposite()))
            .collect();
        self.measure_observable(&targets, &collaterals)
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn mint_handle(&mut self) -> QubitHandle {
        let handle = QubitHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn require(&self, handle: QubitHandle, operation: &'static str) -> StabResult<()> {
        if self.qubits.contains_key(&handle) {
            Ok(())
        } else {
            Err(StabError::UnknownHandle {
                handle,
                operation: Some(operation),
            })
        }
    }

    fn require_refs(&self, refs: &[ObservableRef], operation: &'static str) -> StabResult<()> {
        refs.iter().try_for_each(|r| self.require(r.qubit, operation))
    }

    fn apply(
        &mut self,
        handle: QubitHandle,
        operation: &'static str,
        gate: impl FnOnce(&mut QubitState),
    ) -> StabResult<()> {
        let qubit = self.qubits.get_mut(&handle).ok_or(StabError::UnknownHandle {
            handle,
            operation: Some(operation),
        })?;
        gate(qubit);
        Ok(())
    }

    fn apply_pair(
        &mut self,
        a: QubitHandle,
        b: QubitHandle,
        operation: &'static str,
        gate: impl FnOnce(&mut QubitState, &mut QubitState),
    ) -> StabResult<()> {
        self.require(a, operation)?;
        self.require(b, operation)?;
        if a == b {
            return Err(StabError::DuplicateHandle {
                handle: a,
                operation: Some(operation),
            });
        }

        // Lift one frame out so both can be borrowed mutably.
        let Some(mut first) = self.qubits.remove(&a) else {
            return Err(StabError::UnknownHandle {
                handle: a,
                operation: Some(operation),
            });
        };
        let outcome = match self.qubits.get_mut(&b) {
            Some(second) => {
                gate(&mut first, second);
                Ok(())
            }
            None => Err(StabError::UnknownHandle {
                handle: b,
                operation: Some(operation),
            }),
        };
        self.qubits.insert(a, first);
        outcome
    }

    fn measure_with(&mut self, handle: QubitHandle, reset: bool, operation: &'static str) -> StabResult<bool> {
        let qubit = self.qubits.get(&handle).ok_or(StabError::UnknownHandle {
            handle,
            operation: Some(operation),
        })?;
        let next_var = &mut self.next_var;
        let collapse = qubit.measure_z(|| mint_var(next_var), &mut self.oracle)?;
        let result = collapse.result;
        self.qubits.insert(handle, collapse.state);

        let rewritten = if result.eliminated_id().is_some() {
            self.broadcast(&result)
        } else {
            0
        };
        let on = result.is_on();
        debug!(
            qubit = %handle,
            on,
            eliminated = ?result.eliminated_id().map(VarId::as_str),
            rewritten,
            "measured qubit"
        );

        if reset && on {
            self.apply(handle, operation, |q| {
                q.x();
            })?;
        }
        Ok(on)
    }

    /// Measure `product`, whose collateral handles have been validated.
    fn collapse_product(
        &mut self,
        product: ObservableProduct,
        collaterals: &[ObservableRef],
        targets: usize,
    ) -> StabResult<bool> {
        if product.is_constant() {
            return Ok(product.sign().is_minus());
        }

        let result = MeasurementResult::new(product, self.oracle.sample())?;
        let kickback = mint_var(&mut self.next_var);
        for collateral in collaterals {
            if let Some(qubit) = self.qubits.get_mut(&collateral.qubit) {
                qubit.obs_mut(collateral.axis).insert(kickback.clone());
            }
        }
        let rewritten = self.broadcast(&result);
        debug!(
            targets,
            collaterals = collaterals.len(),
            %kickback,
            on = result.is_on(),
            rewritten,
            "measured observable product"
        );
        Ok(result.is_on())
    }

    /// Apply a measurement's elimination to every live qubit.
    fn broadcast(&mut self, result: &MeasurementResult) -> usize {
        let rewritten = self
            .qubits
            .values_mut()
            .map(|q| q.rewrite_with(result))
            .filter(|&changed| changed)
            .count();
        trace!(rewritten, live = self.qubits.len(), "broadcast elimination");
        rewritten
    }
}

fn mint_var(counter: &mut u64) -> VarId {
    let id = VarId::numbered('m', *counter);
    *counter += 1;
    id
}
