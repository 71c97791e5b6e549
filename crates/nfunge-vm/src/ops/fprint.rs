//! `(` and `)`: fingerprint load and unload.

use nfunge_core::Value;

use crate::error::{OpError, OpResult};
use crate::exec::Ctx;
use crate::instruction::OpTable;

pub fn register(table: &mut OpTable) {
    table.register(b'(', "load_semantics", 1, op_load_semantics);
    table.register(b')', "unload_semantics", 1, op_unload_semantics);
}

/// Pops a count and that many cells and folds them into a handprint, the
/// first cell popped being the most significant, so `"AMOR"4` names ROMA.
fn pop_handprint(ctx: &mut Ctx) -> Result<u32, OpError> {
    let count = ctx.pop();
    if count <= 0 {
        return Err(OpError::InvalidArgument(count));
    }
    // past the bottom every pop is 0 and four of them clear the code
    let n = count.min(ctx.ip.stacks.toss().len() as Value + 4);
    let mut code = 0u32;
    for _ in 0..n {
        code = (code << 8).wrapping_add(ctx.pop() as u32);
    }
    Ok(code)
}

/// On success pushes the handprint and 1.
fn op_load_semantics(ctx: &mut Ctx) -> OpResult {
    let code = pop_handprint(ctx)?;
    ctx.load_fingerprint(code)?;
    ctx.switch_to(b')')?;
    ctx.push(code as Value);
    ctx.push(1);
    Ok(())
}

fn op_unload_semantics(ctx: &mut Ctx) -> OpResult {
    let code = pop_handprint(ctx)?;
    ctx.unload_fingerprint(code)?;
    ctx.switch_to(b'(')
}
