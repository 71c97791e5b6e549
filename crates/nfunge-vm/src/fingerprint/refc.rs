//! REFC: turns vectors into scalar references and back.
//!
//! The table is shared by every IP, so a reference made by one IP can be
//! dereferenced by another.

use std::any::Any;

use nfunge_core::{Value, Vector};

use super::{handprint, Fingerprint, Instancing};
use crate::error::{OpError, OpResult};
use crate::exec::Ctx;

const CODE: u32 = handprint("REFC");

pub const FINGERPRINT: Fingerprint = Fingerprint {
    name: "REFC",
    instancing: Instancing::Interpreter,
    bindings: &[(b'D', op_dereference), (b'R', op_reference)],
    new_state: Some(new_state),
};

/// Vectors indexed by reference.
#[derive(Debug, Default)]
pub struct RefTable {
    vectors: Vec<Vector>,
}

impl RefTable {
    pub fn reference(&mut self, v: Vector) -> Value {
        self.vectors.push(v);
        (self.vectors.len() - 1) as Value
    }

    pub fn dereference(&self, r: Value) -> Option<&Vector> {
        usize::try_from(r).ok().and_then(|i| self.vectors.get(i))
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

fn new_state() -> Box<dyn Any> {
    Box::new(RefTable::default())
}

fn op_reference(ctx: &mut Ctx) -> OpResult {
    let v = ctx.pop_vector();
    let r = ctx.shared_state::<RefTable>(CODE)?.reference(v);
    ctx.push(r);
    Ok(())
}

fn op_dereference(ctx: &mut Ctx) -> OpResult {
    let r = ctx.pop();
    let v = ctx
        .shared_state::<RefTable>(CODE)?
        .dereference(r)
        .cloned()
        .ok_or(OpError::OutOfRange(r))?;
    ctx.push_vector(&v);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_table() {
        let mut table = RefTable::default();
        assert!(table.is_empty());
        let a = table.reference(Vector::from([1, 2]));
        let b = table.reference(Vector::from([3]));
        assert_ne!(a, b);
        assert_eq!(table.dereference(b), Some(&Vector::from([3])));
        assert_eq!(table.dereference(-1), None);
        assert_eq!(table.dereference(9), None);
        assert_eq!(table.len(), 2);
    }
}
