//! BOOL: bitwise logic.

use nfunge_core::Value;

use super::{Fingerprint, Instancing};
use crate::error::OpResult;
use crate::exec::Ctx;

pub const FINGERPRINT: Fingerprint = Fingerprint {
    name: "BOOL",
    instancing: Instancing::Global,
    bindings: &[(b'A', op_and), (b'N', op_not), (b'O', op_or), (b'X', op_xor)],
    new_state: None,
};

fn binary(ctx: &mut Ctx, f: fn(Value, Value) -> Value) -> OpResult {
    let b = ctx.pop();
    let a = ctx.pop();
    ctx.push(f(a, b));
    Ok(())
}

fn op_and(ctx: &mut Ctx) -> OpResult {
    binary(ctx, |a, b| a & b)
}

fn op_or(ctx: &mut Ctx) -> OpResult {
    binary(ctx, |a, b| a | b)
}

fn op_xor(ctx: &mut Ctx) -> OpResult {
    binary(ctx, |a, b| a ^ b)
}

fn op_not(ctx: &mut Ctx) -> OpResult {
    let v = ctx.pop();
    ctx.push(!v);
    Ok(())
}
