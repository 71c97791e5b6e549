//! Stack and stack-of-stacks manipulation.

use nfunge_core::stack::MAX_FILL;
use nfunge_core::StackMode;

use crate::error::{OpError, OpResult};
use crate::exec::Ctx;
use crate::instruction::OpTable;

pub fn register(table: &mut OpTable) {
    table.register(b':', "dup", 1, op_dup);
    table.register(b'\\', "swap", 2, op_swap);
    table.register(b'$', "pop", 1, op_pop);
    table.register(b'n', "clear", 0, op_clear);
    table.register(b'{', "begin_block", 1, op_begin_block);
    table.register(b'}', "end_block", 1, op_end_block);
    table.register(b'u', "stack_under_stack", 1, op_stack_under_stack);
}

fn op_dup(ctx: &mut Ctx) -> OpResult {
    let v = ctx.pop();
    ctx.push(v);
    ctx.push(v);
    Ok(())
}

fn op_swap(ctx: &mut Ctx) -> OpResult {
    let b = ctx.pop();
    let a = ctx.pop();
    ctx.push(b);
    ctx.push(a);
    Ok(())
}

fn op_pop(ctx: &mut Ctx) -> OpResult {
    ctx.pop();
    Ok(())
}

fn op_clear(ctx: &mut Ctx) -> OpResult {
    ctx.ip.stacks.toss_mut().clear();
    Ok(())
}

/// `{`: opens a block of `n` values and saves the storage offset on the
/// SOSS. The new offset is the cell after this one.
fn op_begin_block(ctx: &mut Ctx) -> OpResult {
    let n = ctx.pop();
    ctx.ip.stacks.new_stack(n)?;
    let dim = ctx.ip.dimensions;
    let next = &ctx.ip.position + &ctx.ip.delta;
    let offset = std::mem::replace(&mut ctx.ip.storage_offset, next);
    ctx.ip
        .stacks
        .soss_mut()
        .ok_or(OpError::NoSecondStack)?
        .push_vector(&offset, dim, StackMode::NORMAL);
    ctx.switch_to(b'}')
}

/// `}`: closes the block, restoring the saved storage offset and moving
/// `n` values back down.
fn op_end_block(ctx: &mut Ctx) -> OpResult {
    if ctx.ip.stacks.depth() < 2 {
        return Err(OpError::NoSecondStack);
    }
    let n = ctx.pop();
    // refuse oversized counts before the saved offset is consumed
    let short = n.max(0).unsigned_abs().saturating_sub(ctx.ip.stacks.toss().len() as u64);
    if short > MAX_FILL as u64 {
        return Err(OpError::InvalidArgument(n));
    }
    let dim = ctx.ip.dimensions;
    let offset = ctx
        .ip
        .stacks
        .soss_mut()
        .ok_or(OpError::NoSecondStack)?
        .pop_vector(dim, StackMode::NORMAL);
    ctx.ip.storage_offset = offset;
    ctx.ip.stacks.remove_stack(n)?;
    ctx.switch_to(b'{')
}

fn op_stack_under_stack(ctx: &mut Ctx) -> OpResult {
    if ctx.ip.stacks.depth() < 2 {
        return Err(OpError::NoSecondStack);
    }
    let n = ctx.pop();
    ctx.ip.stacks.transfer_under(n)?;
    Ok(())
}
