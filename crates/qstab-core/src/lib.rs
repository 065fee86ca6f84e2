//! `qstab-core`: symbolic stabilizer-circuit simulation.
//!
//! Tracks, for a growing and shrinking set of qubits, which product of free
//! ±1 variables each qubit's X and Z measurement would return. Clifford
//! gates rewrite those products; measurements sample a value, solve for one
//! variable and substitute it everywhere. Cost is polynomial in qubit count.
//!
//! # Core Components
//!
//! - [`ObservableProduct`]: signed product of named variables (GF(2) algebra)
//! - [`MeasurementResult`]: a measured product, its outcome, and the
//!   elimination rule it implies
//! - [`QubitState`]: one qubit's X/Z observables and the gate conjugation rules
//! - [`CircuitState`]: the live qubits, gate dispatch by handle, single- and
//!   multi-qubit measurement with elimination broadcast
//! - [`MeasurementOracle`]: injectable source of random outcomes
//!
//! # Example: Teleportation
//!
//! ```rust
//! use qstab_core::CircuitState;
//!
//! let mut c = CircuitState::seeded(5);
//!
//! // Bell pair a-b.
//! let a = c.add_off_qubit();
//! let b = c.add_off_qubit();
//! c.h(a).unwrap();
//! c.cnot(a, b).unwrap();
//!
//! // Message m, entangled with a reference e.
//! let e = c.add_off_qubit();
//! let m = c.add_off_qubit();
//! c.h(e).unwrap();
//! c.cnot(e, m).unwrap();
//!
//! // Bell measurement of m, a; corrections on b.
//! c.cnot(m, a).unwrap();
//! c.h(m).unwrap();
//! if c.measure(a, false).unwrap() {
//!     c.x(b).unwrap();
//! }
//! if c.measure(m, false).unwrap() {
//!     c.z(b).unwrap();
//! }
//!
//! // b now holds m's half of the pair with e: undo it.
//! c.cnot(e, b).unwrap();
//! c.h(e).unwrap();
//! assert!(!c.measure(b, false).unwrap());
//! assert!(!c.measure(e, false).unwrap());
//! ```

pub mod circuit;
pub mod config;
pub mod error;
pub mod measurement;
pub mod noise;
pub mod observable;
pub mod oracle;
pub mod qubit;

pub use circuit::{CircuitState, ObservableRef, QubitHandle};
pub use config::{NoiseConfig, SimulationConfig};
pub use error::{StabError, StabResult};
pub use measurement::MeasurementResult;
pub use noise::{ErrorModel, InjectedError};
pub use observable::{Axis, ObservableProduct, Sign, VarId};
pub use oracle::{ConstantOracle, MeasurementOracle, RngOracle, ScriptedOracle};
pub use qubit::{QubitState, ZCollapse};
