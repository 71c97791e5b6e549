//! Fingerprints: loadable bundles of uppercase-letter instructions.
//!
//! A fingerprint is identified by its handprint, the big-endian packing of
//! its name. Loading one pushes a [`Binding`](crate::ip::Binding) onto the
//! override stack of every letter it defines; unloading pops them again.
//!
//! Instance state, when a fingerprint has any, lives according to its
//! [`Instancing`]:
//! - `Global`: no instance state
//! - `Interpreter`: one instance in the scheduler, shared by all IPs
//! - `Ip`: one instance per IP, created on first load or use
//! - `Space`: recognized but not supported; loading it is fatal

use std::any::Any;
use std::fmt;

use hashbrown::HashMap;

use crate::error::OpError;
use crate::instruction::OpFn;

pub mod base;
pub mod boolean;
pub mod hrti;
pub mod mode;
pub mod modu;
pub mod null;
pub mod refc;
pub mod roma;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instancing {
    Global,
    Interpreter,
    Space,
    Ip,
}

pub type StateFn = fn() -> Box<dyn Any>;

#[derive(Clone, Copy)]
pub struct Fingerprint {
    pub name: &'static str,
    pub instancing: Instancing,
    /// Letter and handler pairs.
    pub bindings: &'static [(u8, OpFn)],
    /// Creates instance state for `Interpreter` and `Ip` fingerprints.
    pub new_state: Option<StateFn>,
}

impl Fingerprint {
    pub fn handprint(&self) -> u32 {
        handprint(self.name)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: String = self.bindings.iter().map(|(l, _)| *l as char).collect();
        f.debug_struct("Fingerprint")
            .field("name", &self.name)
            .field("instancing", &self.instancing)
            .field("letters", &letters)
            .finish()
    }
}

/// Packs a fingerprint name into its handprint.
pub const fn handprint(name: &str) -> u32 {
    let bytes = name.as_bytes();
    let mut code: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        code = (code << 8) | bytes[i] as u32;
        i += 1;
    }
    code
}

/// Resolves handprints to fingerprints.
#[derive(Debug, Clone, Default)]
pub struct FingerprintRegistry {
    by_code: HashMap<u32, Fingerprint>,
}

impl FingerprintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fingerprint shipped with the interpreter.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for fp in [
            null::FINGERPRINT,
            roma::FINGERPRINT,
            boolean::FINGERPRINT,
            modu::FINGERPRINT,
            mode::FINGERPRINT,
            base::FINGERPRINT,
            refc::FINGERPRINT,
            hrti::FINGERPRINT,
        ] {
            registry.register(fp);
        }
        registry
    }

    pub fn register(&mut self, fp: Fingerprint) {
        self.by_code.insert(fp.handprint(), fp);
    }

    pub fn get(&self, code: u32) -> Option<&Fingerprint> {
        self.by_code.get(&code)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Fingerprint instance state keyed by handprint.
#[derive(Default)]
pub struct InstanceStore {
    instances: HashMap<u32, Box<dyn Any>>,
}

impl fmt::Debug for InstanceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.instances.keys().map(|k| format!("{:#010x}", k)))
            .finish()
    }
}

impl InstanceStore {
    pub fn contains(&self, code: u32) -> bool {
        self.instances.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Creates the instance for `code` if it does not exist yet.
    pub fn ensure(&mut self, code: u32, registry: &FingerprintRegistry) -> Result<(), OpError> {
        if self.instances.contains_key(&code) {
            return Ok(());
        }
        let new_state = registry
            .get(code)
            .ok_or(OpError::UnknownFingerprint(code))?
            .new_state
            .ok_or(OpError::UnknownFingerprint(code))?;
        self.instances.insert(code, new_state());
        Ok(())
    }

    /// The instance for `code`, created on first use.
    pub fn get_or_create<T: 'static>(
        &mut self,
        code: u32,
        registry: &FingerprintRegistry,
    ) -> Result<&mut T, OpError> {
        self.ensure(code, registry)?;
        self.instances
            .get_mut(&code)
            .and_then(|state| state.downcast_mut::<T>())
            .ok_or(OpError::UnknownFingerprint(code))
    }
}
