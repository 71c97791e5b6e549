//! `y`: system information.

use chrono::{Datelike, Timelike};
use nfunge_core::{Stack, StackMode, Value, Vector};

use crate::error::OpResult;
use crate::exec::Ctx;
use crate::fingerprint::handprint;
use crate::instruction::OpTable;

/// `t`, `i` and `o` are implemented; `=` is not; I/O is buffered.
const FLAGS: Value = 0b0111;
const CELL_BYTES: Value = std::mem::size_of::<Value>() as Value;
pub const HANDPRINT: u32 = handprint("NFNG");
pub const VERSION: Value = 1;
/// Operating paradigm: `=` is unavailable.
const PARADIGM: Value = 0;
const TEAM: Value = 0;

pub fn register(table: &mut OpTable) {
    table.register(b'y', "sysinfo", 1, op_sysinfo);
}

/// Pops `n`. With `n <= 0` pushes the whole report; otherwise pushes only
/// its `n`th cell, or the `n`th cell of the stack beyond the report.
fn op_sysinfo(ctx: &mut Ctx) -> OpResult {
    let n = ctx.pop();
    let report = report(ctx);
    if n <= 0 {
        for v in report.iter() {
            ctx.push(v);
        }
        return Ok(());
    }
    let index = (n - 1) as usize;
    let value = if index < report.len() {
        report.pick(index)
    } else {
        ctx.ip.stacks.toss().pick(index - report.len())
    };
    ctx.push(value);
    Ok(())
}

/// The full report, first item on top.
fn report(ctx: &Ctx) -> Stack {
    let ip = &*ctx.ip;
    let env = &*ctx.env;
    let dim = ip.dimensions;
    let mode = StackMode::NORMAL;
    let mut out = Stack::new();

    // items are pushed last to first
    out.push(0, mode);
    for (key, value) in env.host.env().iter().rev() {
        out.push_string(&format!("{key}={value}"), mode);
    }
    out.push(0, mode);
    for arg in env.host.args().iter().rev() {
        out.push_string(arg, mode);
    }
    let sizes: Vec<usize> = ip.stacks.sizes().collect();
    for size in sizes.iter().rev() {
        out.push(*size as Value, mode);
    }
    out.push(ip.stacks.depth() as Value, mode);

    let now = env.host.now();
    out.push(
        (now.hour() as Value) * 256 * 256 + (now.minute() as Value) * 256 + now.second() as Value,
        mode,
    );
    out.push(
        (now.year() as Value - 1900) * 256 * 256 + (now.month() as Value) * 256 + now.day() as Value,
        mode,
    );

    let (least, greatest) = env
        .space
        .bounds()
        .unwrap_or_else(|| (Vector::zero(), Vector::zero()));
    out.push_vector(&(&greatest - &least), dim, mode);
    out.push_vector(&least, dim, mode);
    out.push_vector(&ip.storage_offset, dim, mode);
    out.push_vector(&ip.delta, dim, mode);
    out.push_vector(&ip.position, dim, mode);

    out.push(TEAM, mode);
    out.push(ip.id.0 as Value, mode);
    out.push(dim as Value, mode);
    out.push(std::path::MAIN_SEPARATOR as Value, mode);
    out.push(PARADIGM, mode);
    out.push(VERSION, mode);
    out.push(HANDPRINT as Value, mode);
    out.push(CELL_BYTES, mode);
    out.push(FLAGS, mode);
    out
}
