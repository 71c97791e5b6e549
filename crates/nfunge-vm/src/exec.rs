//! Execution context handed to instruction handlers.
//!
//! [`Env`] is everything an IP shares with the others: funge-space, the
//! host, the instruction and fingerprint tables and interpreter-wide
//! fingerprint state. [`Ctx`] pairs it with the stepping IP for the
//! duration of one instruction.

use nfunge_core::{Space, Value, Vector};
use tracing::warn;

use crate::config::{UnknownOpcodePolicy, VmConfig};
use crate::error::{OpError, OpResult};
use crate::fingerprint::{FingerprintRegistry, InstanceStore};
use crate::host::Host;
use crate::instruction::{display_code, OpTable};
use crate::ip::{letter_index, InstructionPointer, IpId};

#[derive(Debug)]
pub struct Env {
    pub space: Space,
    pub host: Host,
    pub ops: OpTable,
    pub fingerprints: FingerprintRegistry,
    /// Instances of `Interpreter` fingerprints.
    pub shared: InstanceStore,
    pub config: VmConfig,
    /// Children created during the current tick, with their parent.
    spawned: Vec<(InstructionPointer, IpId)>,
    next_id: u64,
}

impl Env {
    pub fn new(config: VmConfig, host: Host, ops: OpTable, fingerprints: FingerprintRegistry) -> Self {
        Self {
            space: Space::new(config.dimensions),
            host,
            ops,
            fingerprints,
            shared: InstanceStore::default(),
            config,
            spawned: Vec::new(),
            next_id: 0,
        }
    }

    pub fn next_ip_id(&mut self) -> IpId {
        let id = IpId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn take_spawned(&mut self) -> Vec<(InstructionPointer, IpId)> {
        std::mem::take(&mut self.spawned)
    }
}

pub struct Ctx<'a> {
    pub ip: &'a mut InstructionPointer,
    pub env: &'a mut Env,
    /// The cell value being executed.
    pub code: Value,
}

impl<'a> Ctx<'a> {
    pub fn new(ip: &'a mut InstructionPointer, env: &'a mut Env) -> Self {
        Self { ip, env, code: 0 }
    }

    /// Runs the instruction bound to `code`.
    pub fn dispatch(&mut self, code: Value) -> OpResult {
        let handler = match letter_index(code) {
            Some(i) => match self.ip.binding(i) {
                Some(b) => b.handler,
                None => return Err(OpError::Unbound((b'A' + i as u8) as char)),
            },
            None => match self.env.ops.get(code) {
                Some(entry) => entry.handler,
                None => {
                    return match self.env.config.unknown_opcode {
                        UnknownOpcodePolicy::Warn => {
                            warn!(ip = %self.ip.id, at = %self.ip.position, op = %display_code(code), "unknown instruction");
                            Ok(())
                        }
                        UnknownOpcodePolicy::Reflect => Err(OpError::Unsupported(code)),
                    };
                }
            },
        };
        let outer = std::mem::replace(&mut self.code, code);
        let result = handler(self);
        self.code = outer;
        result
    }

    // =========================================================================
    // Stack shorthands
    // =========================================================================

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.ip.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Value {
        self.ip.pop()
    }

    pub fn push_bool(&mut self, b: bool) {
        self.ip.push(b as Value);
    }

    pub fn push_vector(&mut self, v: &Vector) {
        self.ip.push_vector(v);
    }

    pub fn pop_vector(&mut self) -> Vector {
        self.ip.pop_vector()
    }

    // =========================================================================
    // Motion
    // =========================================================================

    pub fn require_dims(&self, needed: usize) -> OpResult {
        if self.ip.dimensions < needed {
            return Err(OpError::Dimensions {
                needed,
                actual: self.ip.dimensions,
            });
        }
        Ok(())
    }

    /// Sets the delta, or adds to it in hover mode.
    pub fn go(&mut self, delta: Vector) {
        self.ip.delta = if self.ip.flags.hover {
            &self.ip.delta + &delta
        } else {
            delta
        };
    }

    /// Rewrites the current cell to `mirror` when switch mode is on.
    pub fn switch_to(&mut self, mirror: u8) -> OpResult {
        if self.ip.flags.switch {
            self.env.space.set(&self.ip.position, mirror as Value)?;
        }
        Ok(())
    }

    /// Position relative to the storage offset.
    pub fn stored(&self, v: &Vector) -> Vector {
        v + &self.ip.storage_offset
    }

    // =========================================================================
    // IPs and fingerprint state
    // =========================================================================

    /// Queues a child to join the scheduler at the end of the tick.
    pub fn spawn(&mut self, child: InstructionPointer) {
        self.env.spawned.push((child, self.ip.id));
    }

    /// Per-IP state of fingerprint `code`.
    pub fn ip_state<T: 'static>(&mut self, code: u32) -> Result<&mut T, OpError> {
        self.ip
            .instances_mut()
            .get_or_create(code, &self.env.fingerprints)
    }

    /// Interpreter-wide state of fingerprint `code`.
    pub fn shared_state<T: 'static>(&mut self, code: u32) -> Result<&mut T, OpError> {
        self.env.shared.get_or_create(code, &self.env.fingerprints)
    }

    pub fn load_fingerprint(&mut self, code: u32) -> OpResult {
        self.ip
            .load_fingerprint(code, &self.env.fingerprints, &mut self.env.shared)
    }

    pub fn unload_fingerprint(&mut self, code: u32) -> OpResult {
        self.ip.unload_fingerprint(code, &self.env.fingerprints)
    }
}
