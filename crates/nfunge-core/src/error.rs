//! Error types for the core data structures.

use thiserror::Error;

use crate::Vector;

/// Structural errors raised by funge-space.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpaceError {
    /// The vector has a nonzero component beyond the space's dimensionality.
    #[error("vector {vector} does not fit in {dimensions}-dimensional space")]
    Dimension { vector: Vector, dimensions: usize },

    /// A dump region holds more cells than allowed.
    #[error("region of size {size} is too large to dump")]
    TooLarge { size: Vector },
}

/// Errors raised by the stack-of-stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    /// An operation needed a second stack and there is only one.
    #[error("stack-of-stacks has no second stack")]
    NoSecondStack,

    /// A count would pad the stack with more zeros than allowed.
    #[error("stack count {0} is too large")]
    TooLarge(crate::Value),
}

pub type SpaceResult<T> = Result<T, SpaceError>;
