//! Sources of random measurement outcomes.
//!
//! A circuit asks its oracle for a uniformly random ±1 whenever it measures
//! an observable whose value is not already determined. Swapping the oracle
//! is how tests force specific branches:
//!
//! ```rust
//! use qstab_core::{CircuitState, Sign};
//!
//! // Every random measurement comes out -1.
//! let mut circuit = CircuitState::with_oracle(|| Sign::Minus);
//! let q = circuit.add_off_qubit();
//! circuit.h(q).unwrap();
//! assert!(circuit.measure(q, false).unwrap());
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::observable::Sign;

/// Supplies outcomes for measurements that are not predetermined.
pub trait MeasurementOracle {
    /// Draw one outcome.
    fn sample(&mut self) -> Sign;
}

impl<F> MeasurementOracle for F
where
    F: FnMut() -> Sign,
{
    fn sample(&mut self) -> Sign {
        self()
    }
}

/// Fair coin flips from a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngOracle<R = StdRng> {
    rng: R,
}

impl RngOracle<StdRng> {
    /// A generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngOracle<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RngOracle<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> MeasurementOracle for RngOracle<R> {
    fn sample(&mut self) -> Sign {
        Sign::from_minus(self.rng.r#gen::<bool>())
    }
}

/// Always answers the same outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantOracle(pub Sign);

impl MeasurementOracle for ConstantOracle {
    fn sample(&mut self) -> Sign {
        self.0
    }
}

/// Replays a fixed list of outcomes, then keeps answering `fallback`.
#[derive(Debug, Clone)]
pub struct ScriptedOracle {
    script: std::collections::VecDeque<Sign>,
    fallback: Sign,
    draws: usize,
}

impl ScriptedOracle {
    /// Answer `script` in order; afterwards answer `Sign::Plus`.
    pub fn new(script: impl IntoIterator<Item = Sign>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: Sign::Plus,
            draws: 0,
        }
    }

    /// Change the outcome used once the script runs out.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Sign) -> Self {
        self.fallback = fallback;
        self
    }

    /// How many outcomes have been drawn so far.
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Scripted outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl MeasurementOracle for ScriptedOracle {
    fn sample(&mut self) -> Sign {
        self.draws += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }
}
