//! Products of named ±1-valued observables.
//!
//! An [`ObservableProduct`] stands for the operator
//!
//!   sign · O₁ · O₂ · … · Oₖ
//!
//! where every `Oᵢ` is an independent observable with eigenvalues ±1, bound
//! to a named variable ([`VarId`]). Because `Oᵢ² = 1`, multiplying two
//! products takes the symmetric difference of their variable sets and the
//! product of their signs: arithmetic over GF(2) with a sign bit.
//!
//! # Example
//!
//! ```rust
//! use qstab_core::observable::{ObservableProduct, Sign};
//!
//! let ab = ObservableProduct::new(["a", "b"], Sign::Plus);
//! let bc = ObservableProduct::new(["b", "c"], Sign::Minus);
//!
//! let ac = ab.times(&bc);
//! assert_eq!(ac.to_string(), "-a*c");
//! assert_eq!(ac.times(&ac), ObservableProduct::one());
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::iter::Product;
use std::ops::{Mul, MulAssign, Neg};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{StabError, StabResult};

/// An overall ±1 factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Sign {
    /// +1
    #[default]
    Plus,
    /// -1
    Minus,
}

impl Sign {
    /// `Minus` when `minus` is true, `Plus` otherwise.
    pub fn from_minus(minus: bool) -> Self {
        if minus { Sign::Minus } else { Sign::Plus }
    }

    /// True for `Minus`.
    pub fn is_minus(self) -> bool {
        self == Sign::Minus
    }

    /// The sign as the integer `+1` or `-1`.
    pub fn to_i32(self) -> i32 {
        match self {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }
}

impl Neg for Sign {
    type Output = Sign;

    fn neg(self) -> Sign {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }
}

impl Mul for Sign {
    type Output = Sign;

    fn mul(self, rhs: Sign) -> Sign {
        Sign::from_minus(self.is_minus() ^ rhs.is_minus())
    }
}

impl MulAssign for Sign {
    fn mul_assign(&mut self, rhs: Sign) {
        *self = *self * rhs;
    }
}

impl TryFrom<i32> for Sign {
    type Error = StabError;

    fn try_from(value: i32) -> StabResult<Self> {
        match value {
            1 => Ok(Sign::Plus),
            -1 => Ok(Sign::Minus),
            other => Err(StabError::InvalidSign(other)),
        }
    }
}

impl From<Sign> for i32 {
    fn from(sign: Sign) -> i32 {
        sign.to_i32()
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_i32())
    }
}

/// Name of a free ±1 variable.
///
/// Ordered lexicographically by name; that order decides which variable a
/// measurement eliminates. Cloning is a reference-count bump.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VarId(Arc<str>);

impl VarId {
    /// Create a variable id from a name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// A variable id made of a one-letter namespace and a counter, e.g. `m12`.
    pub fn numbered(prefix: char, n: u64) -> Self {
        Self::new(format!("{prefix}{n}"))
    }

    /// The variable's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VarId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for VarId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<VarId> for String {
    fn from(id: VarId) -> String {
        id.0.to_string()
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A qubit axis that observables are tracked along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// The X (phase) axis.
    X,
    /// The Z (computational) axis.
    Z,
}

impl Axis {
    /// Both tracked axes.
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Z];

    /// The anticommuting partner axis.
    pub fn opposite(self) -> Axis {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// A signed product of named ±1 observables.
///
/// Each id appears at most once: multiplying by an id already present
/// cancels it. Equality compares the id sets as sets, plus the sign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ObservableProduct {
    ids: BTreeSet<VarId>,
    sign: Sign,
}

impl ObservableProduct {
    /// Create a product of the given variables times `sign`.
    ///
    /// Repeated ids cancel pairwise, as they would under multiplication.
    pub fn new<I>(ids: I, sign: Sign) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VarId>,
    {
        let mut product = Self::constant(sign);
        for id in ids {
            product.toggle(id.into());
        }
        product
    }

    /// Like [`ObservableProduct::new`] but with an unchecked integer sign.
    pub fn try_new<I>(ids: I, sign: i32) -> StabResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<VarId>,
    {
        let sign = Sign::try_from(sign)?;
        Ok(Self::new(ids, sign))
    }

    /// The trivial product `+1`.
    pub fn one() -> Self {
        Self::default()
    }

    /// A product with no variables, equal to `sign`.
    pub fn constant(sign: Sign) -> Self {
        Self {
            ids: BTreeSet::new(),
            sign,
        }
    }

    /// The single variable `id`, with sign +1.
    pub fn var(id: impl Into<VarId>) -> Self {
        Self::new([id.into()], Sign::Plus)
    }

    /// The variables in the product, in ascending order.
    pub fn ids(&self) -> &BTreeSet<VarId> {
        &self.ids
    }

    /// The constant factor.
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// True if the product has no free variables (its value is `sign`).
    pub fn is_constant(&self) -> bool {
        self.ids.is_empty()
    }

    /// True if `id` is one of the factors.
    pub fn contains(&self, id: &VarId) -> bool {
        self.ids.contains(id)
    }

    /// The smallest variable in the product, if any.
    pub fn first_id(&self) -> Option<&VarId> {
        self.ids.first()
    }

    /// Multiply another product onto this one, returning the result.
    #[must_use]
    pub fn times(&self, other: &ObservableProduct) -> ObservableProduct {
        ObservableProduct {
            ids: self.ids.symmetric_difference(&other.ids).cloned().collect(),
            sign: self.sign * other.sign,
        }
    }

    /// Multiply by a constant sign, leaving the variables untouched.
    #[must_use]
    pub fn times_sign(&self, sign: Sign) -> ObservableProduct {
        ObservableProduct {
            ids: self.ids.clone(),
            sign: self.sign * sign,
        }
    }

    /// In-place form of [`ObservableProduct::times`].
    pub fn times_assign(&mut self, other: &ObservableProduct) {
        for id in &other.ids {
            if !self.ids.remove(id) {
                self.ids.insert(id.clone());
            }
        }
        self.sign *= other.sign;
    }

    /// Flip the sign in place.
    pub fn negate(&mut self) {
        self.sign = -self.sign;
    }

    /// Multiply the single variable `id` onto the product in place.
    pub fn toggle(&mut self, id: VarId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Add `id` as a factor if it is not already one. Returns whether it was added.
    pub fn insert(&mut self, id: VarId) -> bool {
        self.ids.insert(id)
    }

    /// Multiply a sequence of products together. The empty product is `+1`.
    pub fn product<'a>(items: impl IntoIterator<Item = &'a ObservableProduct>) -> Self {
        items
            .into_iter()
            .fold(Self::one(), |mut acc, item| {
                acc.times_assign(item);
                acc
            })
    }
}

impl<'a> Product<&'a ObservableProduct> for ObservableProduct {
    fn product<I: Iterator<Item = &'a ObservableProduct>>(iter: I) -> Self {
        ObservableProduct::product(iter)
    }
}

impl Mul<&ObservableProduct> for &ObservableProduct {
    type Output = ObservableProduct;

    fn mul(self, rhs: &ObservableProduct) -> ObservableProduct {
        self.times(rhs)
    }
}

impl Mul<Sign> for ObservableProduct {
    type Output = ObservableProduct;

    fn mul(mut self, rhs: Sign) -> ObservableProduct {
        self.sign *= rhs;
        self
    }
}

impl MulAssign<&ObservableProduct> for ObservableProduct {
    fn mul_assign(&mut self, rhs: &ObservableProduct) {
        self.times_assign(rhs);
    }
}

impl MulAssign<Sign> for ObservableProduct {
    fn mul_assign(&mut self, rhs: Sign) {
        self.sign *= rhs;
    }
}

impl Neg for ObservableProduct {
    type Output = ObservableProduct;

    fn neg(mut self) -> ObservableProduct {
        self.negate();
        self
    }
}

impl From<VarId> for ObservableProduct {
    fn from(id: VarId) -> Self {
        Self::var(id)
    }
}

impl From<Sign> for ObservableProduct {
    fn from(sign: Sign) -> Self {
        Self::constant(sign)
    }
}

impl fmt::Display for ObservableProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ids.is_empty() {
            return write!(f, "{}", self.sign);
        }
        if self.sign.is_minus() {
            f.write_str("-")?;
        }
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                f.write_str("*")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}
