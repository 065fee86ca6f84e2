//! Measurement results and the variable elimination they license.
//!
//! Measuring an observable product `P` with outcome `r` establishes the
//! relation `P = r`. If `P` still contains free variables, that relation is
//! solved for the smallest one, `v`:
//!
//!   v = r · (P without v)
//!
//! and every other tracked product containing `v` can be rewritten by
//! multiplying in `P · r` (the *elimination unit*), which cancels `v` and
//! substitutes the rest. This is one pivot step of Gaussian elimination
//! over GF(2).

use std::fmt;

use crate::error::{StabError, StabResult};
use crate::observable::{ObservableProduct, Sign, VarId};

/// What was measured, what came out, and how to eliminate a variable with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementResult {
    measured: ObservableProduct,
    result: Sign,
    eliminated_id: Option<VarId>,
    elimination_unit: ObservableProduct,
}

impl MeasurementResult {
    /// Record that `measured` was observed to equal `result`.
    ///
    /// Fails with [`StabError::Contradiction`] if `measured` has no free
    /// variables and its sign disagrees with `result`.
    pub fn new(measured: ObservableProduct, result: Sign) -> StabResult<Self> {
        let Some(eliminated_id) = measured.first_id().cloned() else {
            if measured.sign() != result {
                return Err(StabError::Contradiction {
                    observable: measured.to_string(),
                    result,
                });
            }
            return Ok(Self {
                measured,
                result,
                eliminated_id: None,
                elimination_unit: ObservableProduct::one(),
            });
        };
        let elimination_unit = measured.times_sign(result);
        Ok(Self {
            measured,
            result,
            eliminated_id: Some(eliminated_id),
            elimination_unit,
        })
    }

    /// Like [`MeasurementResult::new`] but with an unchecked integer outcome.
    pub fn try_new(measured: ObservableProduct, result: i32) -> StabResult<Self> {
        Self::new(measured, Sign::try_from(result)?)
    }

    /// The observable that was measured.
    pub fn measured(&self) -> &ObservableProduct {
        &self.measured
    }

    /// The measurement outcome.
    pub fn result(&self) -> Sign {
        self.result
    }

    /// True when the outcome was -1 (the "on" branch).
    pub fn is_on(&self) -> bool {
        self.result.is_minus()
    }

    /// The variable removed from the system, if the outcome was random.
    pub fn eliminated_id(&self) -> Option<&VarId> {
        self.eliminated_id.as_ref()
    }

    /// The product multiplied into anything that contains the eliminated id.
    pub fn elimination_unit(&self) -> &ObservableProduct {
        &self.elimination_unit
    }

    /// Substitute the eliminated variable out of `obs`.
    ///
    /// Products that do not mention the eliminated variable come back equal
    /// to the input.
    #[must_use]
    pub fn rewrite(&self, obs: &ObservableProduct) -> ObservableProduct {
        match &self.eliminated_id {
            Some(id) if obs.contains(id) => obs.times(&self.elimination_unit),
            _ => obs.clone(),
        }
    }

    /// In-place form of [`MeasurementResult::rewrite`]. Returns whether `obs` changed.
    pub fn rewrite_in_place(&self, obs: &mut ObservableProduct) -> bool {
        match &self.eliminated_id {
            Some(id) if obs.contains(id) => {
                obs.times_assign(&self.elimination_unit);
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.eliminated_id {
            None => write!(f, "{} == {}", self.measured, self.result),
            Some(id) => {
                let rhs = self
                    .elimination_unit
                    .times(&ObservableProduct::var(id.clone()));
                write!(
                    f,
                    "{} == {} causing {id} ==> {rhs}",
                    self.measured, self.result
                )
            }
        }
    }
}
