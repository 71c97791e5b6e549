//! Literals, arithmetic and comparison.

use nfunge_core::Value;

use crate::error::OpResult;
use crate::exec::Ctx;
use crate::instruction::OpTable;

pub fn register(table: &mut OpTable) {
    for code in b'0'..=b'9' {
        table.register(code, "digit", 0, op_digit);
    }
    for code in b'a'..=b'f' {
        table.register(code, "hex", 0, op_hex);
    }
    table.register(b'+', "add", 2, op_add);
    table.register(b'-', "sub", 2, op_sub);
    table.register(b'*', "mul", 2, op_mul);
    table.register(b'/', "div", 2, op_div);
    table.register(b'%', "rem", 2, op_rem);
    table.register(b'!', "not", 1, op_not);
    table.register(b'`', "greater", 2, op_greater);
}

fn op_digit(ctx: &mut Ctx) -> OpResult {
    ctx.push(ctx.code - b'0' as Value);
    Ok(())
}

fn op_hex(ctx: &mut Ctx) -> OpResult {
    ctx.push(ctx.code - b'a' as Value + 10);
    Ok(())
}

/// Pops `b` then `a` and pushes `f(a, b)`.
#[inline]
fn binary(ctx: &mut Ctx, f: impl FnOnce(Value, Value) -> Value) -> OpResult {
    let b = ctx.pop();
    let a = ctx.pop();
    ctx.push(f(a, b));
    Ok(())
}

fn op_add(ctx: &mut Ctx) -> OpResult {
    binary(ctx, Value::wrapping_add)
}

fn op_sub(ctx: &mut Ctx) -> OpResult {
    binary(ctx, Value::wrapping_sub)
}

fn op_mul(ctx: &mut Ctx) -> OpResult {
    binary(ctx, Value::wrapping_mul)
}

// x / 0 and x % 0 are 0
fn op_div(ctx: &mut Ctx) -> OpResult {
    binary(ctx, |a, b| if b == 0 { 0 } else { a.wrapping_div(b) })
}

fn op_rem(ctx: &mut Ctx) -> OpResult {
    binary(ctx, |a, b| if b == 0 { 0 } else { a.wrapping_rem(b) })
}

fn op_not(ctx: &mut Ctx) -> OpResult {
    let v = ctx.pop();
    ctx.push_bool(v == 0);
    Ok(())
}

fn op_greater(ctx: &mut Ctx) -> OpResult {
    binary(ctx, |a, b| (a > b) as Value)
}
