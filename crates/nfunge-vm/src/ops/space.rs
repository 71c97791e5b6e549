//! Funge-space access. Coordinates popped from the stack are relative to
//! the storage offset.

use crate::error::OpResult;
use crate::exec::Ctx;
use crate::instruction::OpTable;

pub fn register(table: &mut OpTable) {
    table.register(b'g', "get", 1, op_get);
    table.register(b'p', "put", 2, op_put);
    table.register(b'\'', "fetch", 0, op_fetch);
    table.register(b's', "store", 1, op_store);
    table.register(b'"', "string_mode", 0, op_string_mode);
}

fn op_get(ctx: &mut Ctx) -> OpResult {
    let v = ctx.pop_vector();
    let value = ctx.env.space.get(&ctx.stored(&v))?;
    ctx.push(value);
    Ok(())
}

fn op_put(ctx: &mut Ctx) -> OpResult {
    let v = ctx.pop_vector();
    let value = ctx.pop();
    let at = ctx.stored(&v);
    ctx.env.space.set(&at, value)?;
    Ok(())
}

fn op_fetch(ctx: &mut Ctx) -> OpResult {
    let next = ctx.ip.raw_advance(&ctx.env.space);
    let value = ctx.env.space.get(&next)?;
    ctx.push(value);
    ctx.ip.position = next;
    Ok(())
}

fn op_store(ctx: &mut Ctx) -> OpResult {
    let next = ctx.ip.raw_advance(&ctx.env.space);
    let value = ctx.pop();
    ctx.env.space.set(&next, value)?;
    ctx.ip.position = next;
    Ok(())
}

fn op_string_mode(ctx: &mut Ctx) -> OpResult {
    ctx.ip.flags.string = true;
    Ok(())
}
