//! Core data structures for nfunge.
//!
//! - [`Vector`]: integer tuples with implicit zero padding
//! - [`Space`]: sparse n-dimensional funge-space with bounds tracking
//! - [`Stack`] / [`StackOfStacks`]: operand storage

pub mod error;
pub mod space;
pub mod stack;
mod text;
pub mod vector;

pub use error::{SpaceError, SpaceResult, StackError};
pub use space::Space;
pub use text::MAX_DUMP_CELLS;
pub use stack::{Stack, StackMode, StackOfStacks};
pub use vector::Vector;

/// Cell and stack value.
pub type Value = i64;

/// The blank cell (space character). Funge-space never stores it.
pub const BLANK: Value = b' ' as Value;
