//! Integer vectors with implicit zero padding.
//!
//! A `Vector` behaves as if it had infinitely many trailing zero components.
//! The stored form is kept canonical (no trailing zeros), so two vectors that
//! differ only in how many zeros were written compare and hash identically.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::Value;

/// Immutable n-tuple of cell values.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Value>"))]
pub struct Vector(Vec<Value>);

impl Vector {
    /// Creates a vector from its leading components.
    pub fn new(components: impl Into<Vec<Value>>) -> Self {
        let mut components = components.into();
        while components.last() == Some(&0) {
            components.pop();
        }
        Self(components)
    }

    /// The all-zero vector.
    #[inline]
    pub const fn zero() -> Self {
        Self(Vec::new())
    }

    /// Unit vector along `axis`, pointing in the direction of `sign`.
    pub fn unit(axis: usize, sign: Value) -> Self {
        Self::zero().set_coordinate(axis, sign.signum())
    }

    /// Component `i`, zero beyond the stored length.
    #[inline]
    pub fn get(&self, i: usize) -> Value {
        self.0.get(i).copied().unwrap_or(0)
    }

    /// Number of significant components (index of the last nonzero + 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy with component `i` replaced by `value`.
    pub fn set_coordinate(&self, i: usize, value: Value) -> Self {
        let mut components = self.0.clone();
        if components.len() <= i {
            if value == 0 {
                return self.clone();
            }
            components.resize(i + 1, 0);
        }
        components[i] = value;
        Self::new(components)
    }

    /// The vector pointing the opposite way.
    pub fn reverse(&self) -> Self {
        Self(self.0.iter().map(|c| c.wrapping_neg()).collect())
    }

    /// Multiplies every component by `k`.
    pub fn scale(&self, k: Value) -> Self {
        Self::new(self.0.iter().map(|c| c.wrapping_mul(k)).collect::<Vec<_>>())
    }

    /// The first `dim` components, zero padded.
    pub fn components(&self, dim: usize) -> Vec<Value> {
        (0..dim).map(|i| self.get(i)).collect()
    }

    /// Stored (significant) components.
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// True if some component at index `>= dim` is nonzero.
    #[inline]
    pub fn exceeds(&self, dim: usize) -> bool {
        self.0.len() > dim
    }

    fn zip_with(&self, other: &Vector, f: impl Fn(Value, Value) -> Value) -> Vector {
        let n = self.len().max(other.len());
        Vector::new((0..n).map(|i| f(self.get(i), other.get(i))).collect::<Vec<_>>())
    }
}

impl From<Vec<Value>> for Vector {
    fn from(components: Vec<Value>) -> Self {
        Self::new(components)
    }
}

impl<const N: usize> From<[Value; N]> for Vector {
    fn from(components: [Value; N]) -> Self {
        Self::new(components.to_vec())
    }
}

impl Add<&Vector> for &Vector {
    type Output = Vector;

    fn add(self, rhs: &Vector) -> Vector {
        self.zip_with(rhs, Value::wrapping_add)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        &self + &rhs
    }
}

impl Sub<&Vector> for &Vector {
    type Output = Vector;

    fn sub(self, rhs: &Vector) -> Vector {
        self.zip_with(rhs, Value::wrapping_sub)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        &self - &rhs
    }
}

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.reverse()
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.reverse()
    }
}

impl Mul<Value> for &Vector {
    type Output = Vector;

    fn mul(self, k: Value) -> Vector {
        self.scale(k)
    }
}

impl Mul<Value> for Vector {
    type Output = Vector;

    fn mul(self, k: Value) -> Vector {
        self.scale(k)
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector{}", self)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        if self.0.is_empty() {
            write!(f, "0")?;
        }
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}
