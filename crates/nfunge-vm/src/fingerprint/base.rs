//! BASE: numeric I/O in other radices.

use nfunge_core::Value;

use super::{Fingerprint, Instancing};
use crate::error::{OpError, OpResult};
use crate::exec::Ctx;

pub const FINGERPRINT: Fingerprint = Fingerprint {
    name: "BASE",
    instancing: Instancing::Global,
    bindings: &[
        (b'B', op_binary),
        (b'H', op_hex),
        (b'I', op_input),
        (b'N', op_output),
        (b'O', op_octal),
    ],
    new_state: None,
};

fn radix(base: Value) -> Result<u32, OpError> {
    match u32::try_from(base) {
        Ok(r) if (2..=36).contains(&r) => Ok(r),
        _ => Err(OpError::InvalidArgument(base)),
    }
}

fn write_in(ctx: &mut Ctx, radix: u32) -> OpResult {
    let v = ctx.pop();
    ctx.env.host.write_int(v, radix)?;
    Ok(())
}

fn op_binary(ctx: &mut Ctx) -> OpResult {
    write_in(ctx, 2)
}

fn op_octal(ctx: &mut Ctx) -> OpResult {
    write_in(ctx, 8)
}

fn op_hex(ctx: &mut Ctx) -> OpResult {
    write_in(ctx, 16)
}

/// `( value base -- )`
fn op_output(ctx: &mut Ctx) -> OpResult {
    let base = radix(ctx.pop())?;
    write_in(ctx, base)
}

/// `( base -- value )`
fn op_input(ctx: &mut Ctx) -> OpResult {
    let base = radix(ctx.pop())?;
    ctx.env.host.flush()?;
    let v = ctx.env.host.read_int(base)?.ok_or(OpError::InputExhausted)?;
    ctx.push(v);
    Ok(())
}
