//! The nfunge interpreter: instruction pointers, the base instruction set,
//! fingerprints and the scheduler that interleaves IPs over a shared
//! funge-space.

pub mod config;
pub mod error;
pub mod exec;
pub mod fingerprint;
pub mod host;
pub mod instruction;
pub mod ip;
pub mod ops;
pub mod scheduler;

pub use config::{UnknownOpcodePolicy, VmConfig};
pub use error::{OpError, OpResult, VmError, VmResult};
pub use exec::{Ctx, Env};
pub use fingerprint::{handprint, Fingerprint, FingerprintRegistry, InstanceStore, Instancing};
pub use host::{Clock, Host};
pub use instruction::{OpEntry, OpFn, OpTable};
pub use ip::{Binding, InstructionPointer, IpFlags, IpId};
pub use scheduler::Scheduler;
