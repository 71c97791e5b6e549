//! MODU: the three common remainder conventions. A zero divisor yields 0.

use nfunge_core::Value;

use super::{Fingerprint, Instancing};
use crate::error::OpResult;
use crate::exec::Ctx;

pub const FINGERPRINT: Fingerprint = Fingerprint {
    name: "MODU",
    instancing: Instancing::Global,
    bindings: &[(b'M', op_floored), (b'R', op_truncated), (b'U', op_unsigned)],
    new_state: None,
};

fn remainder(ctx: &mut Ctx, f: fn(Value, Value) -> Value) -> OpResult {
    let b = ctx.pop();
    let a = ctx.pop();
    ctx.push(if b == 0 { 0 } else { f(a, b) });
    Ok(())
}

/// Sign of the divisor.
pub fn floored(a: Value, b: Value) -> Value {
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

fn op_floored(ctx: &mut Ctx) -> OpResult {
    remainder(ctx, floored)
}

fn op_truncated(ctx: &mut Ctx) -> OpResult {
    remainder(ctx, Value::wrapping_rem)
}

fn op_unsigned(ctx: &mut Ctx) -> OpResult {
    remainder(ctx, |a, b| a.wrapping_rem(b).wrapping_abs())
}
