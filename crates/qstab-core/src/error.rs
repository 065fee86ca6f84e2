//! Error types for the core crate.

use thiserror::Error;

use crate::circuit::QubitHandle;
use crate::observable::Sign;

/// Errors produced by the stabilizer simulator.
///
/// Every variant is a contract violation by the caller (or an inconsistency
/// in the tracked algebra). None of them are transient, so nothing here is
/// worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum StabError {
    /// A raw integer sign was neither +1 nor -1.
    #[error("sign must be +1 or -1, got {0}")]
    InvalidSign(i32),

    /// Both axis observables of a qubit were classical constants.
    #[error("qubit observables X={x} and Z={z} cannot both be free of variables")]
    TrivialQubit {
        /// Rendered X-axis observable.
        x: String,
        /// Rendered Z-axis observable.
        z: String,
    },

    /// A measurement forced a value that disagrees with a determined observable.
    #[error("contradiction: {observable} is fixed but measurement reported {result}")]
    Contradiction {
        /// Rendered observable that was measured.
        observable: String,
        /// The outcome that was forced onto it.
        result: Sign,
    },

    /// Qubit handle not present in the circuit.
    #[error("unknown qubit handle {handle}{}", format_operation_context(.operation))]
    UnknownHandle {
        /// The handle that was not found.
        handle: QubitHandle,
        /// Optional operation name for context.
        operation: Option<&'static str>,
    },

    /// A two-qubit operation named the same qubit twice.
    #[error("qubit handle {handle} given twice{}", format_operation_context(.operation))]
    DuplicateHandle {
        /// The repeated handle.
        handle: QubitHandle,
        /// Optional operation name for context.
        operation: Option<&'static str>,
    },

    /// A probability was outside `[0, 1]` (or not a number).
    #[error("probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),
}

#[allow(clippy::ref_option)]
fn format_operation_context(operation: &Option<&'static str>) -> String {
    match operation {
        Some(name) => format!(" (operation: {name})"),
        None => String::new(),
    }
}

/// Result type for simulator operations.
pub type StabResult<T> = Result<T, StabError>;
