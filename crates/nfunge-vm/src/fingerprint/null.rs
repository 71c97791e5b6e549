//! NULL: binds every letter to an instruction that reflects.

use super::{Fingerprint, Instancing};
use crate::error::{OpError, OpResult};
use crate::exec::Ctx;

pub const FINGERPRINT: Fingerprint = Fingerprint {
    name: "NULL",
    instancing: Instancing::Global,
    bindings: &[
        (b'A', op_reflect),
        (b'B', op_reflect),
        (b'C', op_reflect),
        (b'D', op_reflect),
        (b'E', op_reflect),
        (b'F', op_reflect),
        (b'G', op_reflect),
        (b'H', op_reflect),
        (b'I', op_reflect),
        (b'J', op_reflect),
        (b'K', op_reflect),
        (b'L', op_reflect),
        (b'M', op_reflect),
        (b'N', op_reflect),
        (b'O', op_reflect),
        (b'P', op_reflect),
        (b'Q', op_reflect),
        (b'R', op_reflect),
        (b'S', op_reflect),
        (b'T', op_reflect),
        (b'U', op_reflect),
        (b'V', op_reflect),
        (b'W', op_reflect),
        (b'X', op_reflect),
        (b'Y', op_reflect),
        (b'Z', op_reflect),
    ],
    new_state: None,
};

fn op_reflect(_ctx: &mut Ctx) -> OpResult {
    Err(OpError::Failed("NULL"))
}
