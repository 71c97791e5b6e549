//! Motion and control flow.

use nfunge_core::{Value, Vector};
use tracing::debug;

use crate::error::{OpError, OpResult};
use crate::exec::Ctx;
use crate::instruction::OpTable;
use crate::ip::COMMENT;

pub fn register(table: &mut OpTable) {
    table.register(b'>', "east", 0, op_east);
    table.register(b'<', "west", 0, op_west);
    table.register(b'^', "north", 0, op_north);
    table.register(b'v', "south", 0, op_south);
    table.register(b'h', "high", 0, op_high);
    table.register(b'l', "low", 0, op_low);
    table.register(b'?', "away", 0, op_away);
    table.register(b'_', "east_west_if", 1, op_east_west_if);
    table.register(b'|', "north_south_if", 1, op_north_south_if);
    table.register(b'm', "high_low_if", 1, op_high_low_if);
    table.register(b'[', "turn_left", 0, op_turn_left);
    table.register(b']', "turn_right", 0, op_turn_right);
    table.register(b'w', "compare", 2, op_compare);
    table.register(b'r', "reflect", 0, op_reflect);
    table.register(b'x', "absolute_delta", 1, op_absolute_delta);
    table.register(b'#', "trampoline", 0, op_trampoline);
    table.register(b'j', "jump", 1, op_jump);
    table.register(b'k', "iterate", 1, op_iterate);
    table.register(b'@', "stop", 0, op_stop);
    table.register(b'q', "quit", 1, op_quit);
    table.register(b't', "split", 0, op_split);
    table.register(b'z', "nop", 0, op_nop);
    table.register(b' ', "space", 0, op_nop);
    table.register(b';', "jump_over", 0, op_jump_over);
    table.register(b'=', "execute", 1, op_execute);
}

fn op_nop(_ctx: &mut Ctx) -> OpResult {
    Ok(())
}

// =============================================================================
// Cardinal directions
// =============================================================================

fn head(ctx: &mut Ctx, axis: usize, sign: Value) -> OpResult {
    ctx.require_dims(axis + 1)?;
    ctx.go(Vector::unit(axis, sign));
    Ok(())
}

fn op_east(ctx: &mut Ctx) -> OpResult {
    head(ctx, 0, 1)
}

fn op_west(ctx: &mut Ctx) -> OpResult {
    head(ctx, 0, -1)
}

fn op_north(ctx: &mut Ctx) -> OpResult {
    head(ctx, 1, -1)
}

fn op_south(ctx: &mut Ctx) -> OpResult {
    head(ctx, 1, 1)
}

fn op_high(ctx: &mut Ctx) -> OpResult {
    head(ctx, 2, -1)
}

fn op_low(ctx: &mut Ctx) -> OpResult {
    head(ctx, 2, 1)
}

fn op_away(ctx: &mut Ctx) -> OpResult {
    let pick = fastrand::usize(..ctx.ip.dimensions * 2);
    let sign = if pick % 2 == 0 { 1 } else { -1 };
    ctx.go(Vector::unit(pick / 2, sign));
    Ok(())
}

/// Pops a value and heads positive along `axis` if it is zero, negative
/// otherwise.
fn branch(ctx: &mut Ctx, axis: usize) -> OpResult {
    ctx.require_dims(axis + 1)?;
    let v = ctx.pop();
    ctx.go(Vector::unit(axis, if v == 0 { 1 } else { -1 }));
    Ok(())
}

fn op_east_west_if(ctx: &mut Ctx) -> OpResult {
    branch(ctx, 0)
}

fn op_north_south_if(ctx: &mut Ctx) -> OpResult {
    branch(ctx, 1)
}

fn op_high_low_if(ctx: &mut Ctx) -> OpResult {
    branch(ctx, 2)
}

// =============================================================================
// Turning
// =============================================================================

/// Rotates in the x/y plane, leaving higher components alone.
fn turn(delta: &Vector, left: bool) -> Vector {
    let (dx, dy) = (delta.get(0), delta.get(1));
    let (nx, ny) = if left { (dy, dx.wrapping_neg()) } else { (dy.wrapping_neg(), dx) };
    delta.set_coordinate(0, nx).set_coordinate(1, ny)
}

fn op_turn_left(ctx: &mut Ctx) -> OpResult {
    ctx.require_dims(2)?;
    ctx.switch_to(b']')?;
    ctx.ip.delta = turn(&ctx.ip.delta, true);
    Ok(())
}

fn op_turn_right(ctx: &mut Ctx) -> OpResult {
    ctx.require_dims(2)?;
    ctx.switch_to(b'[')?;
    ctx.ip.delta = turn(&ctx.ip.delta, false);
    Ok(())
}

fn op_compare(ctx: &mut Ctx) -> OpResult {
    ctx.require_dims(2)?;
    let b = ctx.pop();
    let a = ctx.pop();
    if a != b {
        ctx.ip.delta = turn(&ctx.ip.delta, a < b);
    }
    Ok(())
}

fn op_reflect(ctx: &mut Ctx) -> OpResult {
    ctx.ip.reflect();
    Ok(())
}

fn op_absolute_delta(ctx: &mut Ctx) -> OpResult {
    ctx.ip.delta = ctx.pop_vector();
    Ok(())
}

// =============================================================================
// Skipping
// =============================================================================

fn op_trampoline(ctx: &mut Ctx) -> OpResult {
    ctx.ip.position = ctx.ip.raw_advance(&ctx.env.space);
    Ok(())
}

/// Moves `n` cells along the delta, wrapping as often as needed. The
/// `j` cell itself is occupied, so the IP is always inside the bounds.
fn op_jump(ctx: &mut Ctx) -> OpResult {
    let n = ctx.pop();
    ctx.ip.position = ctx.env.space.travel(&ctx.ip.position, &ctx.ip.delta, n);
    Ok(())
}

fn op_jump_over(ctx: &mut Ctx) -> OpResult {
    let start = ctx.ip.position.clone();
    loop {
        ctx.ip.position = ctx.ip.raw_advance(&ctx.env.space);
        if ctx.ip.position == start || ctx.env.space.get(&ctx.ip.position)? == COMMENT {
            return Ok(());
        }
    }
}

/// Runs the next instruction `n` times in place, then continues past it.
/// `0k` skips it.
fn op_iterate(ctx: &mut Ctx) -> OpResult {
    let n = ctx.pop();
    let target = ctx.ip.next_position(&ctx.env.space)?;
    if n == 0 {
        ctx.ip.position = target;
        return Ok(());
    }
    if n < 0 {
        return Err(OpError::InvalidArgument(n));
    }
    let code = ctx.env.space.get(&target)?;
    let here = ctx.ip.position.clone();
    for _ in 0..n {
        ctx.dispatch(code)?;
        if !ctx.ip.alive {
            return Ok(());
        }
    }
    if ctx.ip.position == here {
        ctx.ip.position = target;
    }
    Ok(())
}

// =============================================================================
// IP lifecycle
// =============================================================================

fn op_stop(ctx: &mut Ctx) -> OpResult {
    debug!(ip = %ctx.ip.id, at = %ctx.ip.position, "ip stopped");
    ctx.ip.kill();
    Ok(())
}

fn op_quit(ctx: &mut Ctx) -> OpResult {
    let code = ctx.pop();
    debug!(ip = %ctx.ip.id, code, "quit requested");
    ctx.ip.request_quit(code);
    Ok(())
}

fn op_split(ctx: &mut Ctx) -> OpResult {
    let id = ctx.env.next_ip_id();
    let child = ctx.ip.split(id, &ctx.env.space)?;
    debug!(parent = %ctx.ip.id, child = %id, at = %child.position, "split");
    ctx.spawn(child);
    Ok(())
}

fn op_execute(ctx: &mut Ctx) -> OpResult {
    Err(OpError::Unsupported(ctx.code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn() {
        let east = Vector::from([1, 0]);
        assert_eq!(turn(&east, true), Vector::from([0, -1]));
        assert_eq!(turn(&east, false), Vector::from([0, 1]));
        assert_eq!(turn(&turn(&east, true), false), east);
        let skew = Vector::from([2, 1, 5]);
        assert_eq!(turn(&skew, true), Vector::from([1, -2, 5]));
    }
}
