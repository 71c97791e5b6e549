//! Error types for the VM.
//!
//! Failures come in two tiers. [`OpError`] is raised by an instruction that
//! cannot complete; apart from its `Fatal` variant it never leaves the step
//! that raised it, the IP simply reflects. [`VmError`] is structural and is
//! reported to the host.

use std::io;

use nfunge_core::{SpaceError, StackError, Value};
use thiserror::Error;

use crate::fingerprint::Instancing;

/// Structural failures that stop the interpreter.
#[derive(Debug, Error)]
pub enum VmError {
    #[error(transparent)]
    Space(#[from] SpaceError),

    #[error("fingerprint {name} needs {instancing:?} instancing, which is not supported")]
    UnsupportedInstancing {
        name: &'static str,
        instancing: Instancing,
    },

    #[error("tick limit of {0} reached")]
    TickLimit(u64),

    #[error("host i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// Failure of a single instruction.
#[derive(Debug, Error)]
pub enum OpError {
    #[error("no second stack on the stack-of-stacks")]
    NoSecondStack,

    #[error("reference {0} is out of range")]
    OutOfRange(Value),

    #[error("invalid argument {0}")]
    InvalidArgument(Value),

    #[error("instruction needs {needed} dimensions, ip has {actual}")]
    Dimensions { needed: usize, actual: usize },

    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("input exhausted")]
    InputExhausted,

    #[error("unknown fingerprint {0:#010x}")]
    UnknownFingerprint(u32),

    #[error("fingerprint {0:#010x} is not loaded")]
    NotLoaded(u32),

    #[error("no fingerprint binds '{0}'")]
    Unbound(char),

    #[error("unsupported instruction {0}")]
    Unsupported(Value),

    #[error("{0}")]
    Failed(&'static str),

    /// A region of funge-space the program asked for cannot be served.
    #[error(transparent)]
    Region(SpaceError),

    #[error(transparent)]
    Fatal(VmError),
}

impl OpError {
    /// True if the error must reach the host instead of reflecting the IP.
    pub fn is_fatal(&self) -> bool {
        matches!(self, OpError::Fatal(_))
    }
}

impl From<SpaceError> for OpError {
    fn from(e: SpaceError) -> Self {
        match e {
            SpaceError::TooLarge { .. } => OpError::Region(e),
            SpaceError::Dimension { .. } => OpError::Fatal(VmError::Space(e)),
        }
    }
}

impl From<StackError> for OpError {
    fn from(e: StackError) -> Self {
        match e {
            StackError::NoSecondStack => OpError::NoSecondStack,
            StackError::TooLarge(n) => OpError::InvalidArgument(n),
        }
    }
}

impl From<VmError> for OpError {
    fn from(e: VmError) -> Self {
        OpError::Fatal(e)
    }
}

pub type OpResult = Result<(), OpError>;
pub type VmResult<T> = Result<T, VmError>;
