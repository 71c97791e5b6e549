//! The base instruction table.
//!
//! Opcodes are bound to handlers through an explicit table built at
//! startup, one entry per instruction character. Uppercase letters are not
//! in the table; they resolve through the IP's fingerprint overrides.

use nfunge_core::Value;

use crate::error::OpResult;
use crate::exec::Ctx;
use crate::ops;

/// Instruction handler.
pub type OpFn = fn(&mut Ctx<'_>) -> OpResult;

/// Table size: instructions are 7-bit ASCII.
const TABLE_SIZE: usize = 128;

#[derive(Clone, Copy)]
pub struct OpEntry {
    pub code: u8,
    pub name: &'static str,
    /// Number of cells the instruction pops in the common case (vectors
    /// count as one).
    pub arity: u8,
    pub handler: OpFn,
}

impl std::fmt::Debug for OpEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OpEntry({:?} {} /{})", self.code as char, self.name, self.arity)
    }
}

#[derive(Clone)]
pub struct OpTable {
    entries: Vec<Option<OpEntry>>,
}

impl std::fmt::Debug for OpTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OpTable({} entries)", self.len())
    }
}

impl Default for OpTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OpTable {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            entries: vec![None; TABLE_SIZE],
        }
    }

    /// The Funge-98 instruction set.
    pub fn standard() -> Self {
        let mut table = Self::new();
        ops::register_all(&mut table);
        table
    }

    /// Binds `code`, replacing any previous entry.
    pub fn register(&mut self, code: u8, name: &'static str, arity: u8, handler: OpFn) {
        debug_assert!(!code.is_ascii_uppercase(), "uppercase letters belong to fingerprints");
        if let Some(slot) = self.entries.get_mut(code as usize) {
            *slot = Some(OpEntry {
                code,
                name,
                arity,
                handler,
            });
        }
    }

    pub fn get(&self, code: Value) -> Option<&OpEntry> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.entries.get(i))
            .and_then(Option::as_ref)
    }

    /// Number of bound instructions.
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpEntry> {
        self.entries.iter().flatten()
    }
}

/// Readable form of a cell value for diagnostics.
pub fn display_code(code: Value) -> String {
    match u8::try_from(code) {
        Ok(b) if b.is_ascii_graphic() || b == b' ' => format!("'{}'", b as char),
        _ => code.to_string(),
    }
}
