//! Character, number and file I/O.

use std::fs;

use tracing::debug;

use crate::error::{OpError, OpResult};
use crate::exec::Ctx;
use crate::instruction::OpTable;

/// `i` flag: load the file verbatim, without line handling.
const BINARY: i64 = 1;
/// `o` flag: write the region as linear text.
const LINEAR: i64 = 1;

pub fn register(table: &mut OpTable) {
    table.register(b'.', "output_int", 1, op_output_int);
    table.register(b',', "output_char", 1, op_output_char);
    table.register(b'&', "input_int", 0, op_input_int);
    table.register(b'~', "input_char", 0, op_input_char);
    table.register(b'i', "input_file", 3, op_input_file);
    table.register(b'o', "output_file", 4, op_output_file);
}

fn op_output_int(ctx: &mut Ctx) -> OpResult {
    let v = ctx.pop();
    ctx.env.host.write_int(v, 10)?;
    Ok(())
}

fn op_output_char(ctx: &mut Ctx) -> OpResult {
    let v = ctx.pop();
    ctx.env.host.write_char(v)?;
    Ok(())
}

fn op_input_int(ctx: &mut Ctx) -> OpResult {
    ctx.env.host.flush()?;
    if ctx.env.host.at_eof()? {
        return Err(OpError::InputExhausted);
    }
    let v = ctx.env.host.read_int(10)?.ok_or(OpError::InputExhausted)?;
    ctx.push(v);
    Ok(())
}

fn op_input_char(ctx: &mut Ctx) -> OpResult {
    ctx.env.host.flush()?;
    if ctx.env.host.at_eof()? {
        return Err(OpError::InputExhausted);
    }
    let v = ctx.env.host.read_char()?.ok_or(OpError::InputExhausted)?;
    ctx.push(v);
    Ok(())
}

/// `i`: loads a file at an origin relative to the storage offset and
/// pushes the size of the loaded region, then the origin.
fn op_input_file(ctx: &mut Ctx) -> OpResult {
    let path = ctx.ip.pop_string();
    let flags = ctx.pop();
    let origin = ctx.pop_vector();
    let source = fs::read(&path)?;
    let at = ctx.stored(&origin);
    let size = ctx.env.space.load(&at, &source, flags & BINARY != 0)?;
    debug!(ip = %ctx.ip.id, path, at = %at, size = %size, "loaded file");
    ctx.push_vector(&size);
    ctx.push_vector(&origin);
    Ok(())
}

/// `o`: writes the region at an origin relative to the storage offset.
fn op_output_file(ctx: &mut Ctx) -> OpResult {
    let path = ctx.ip.pop_string();
    let flags = ctx.pop();
    let origin = ctx.pop_vector();
    let size = ctx.pop_vector();
    let at = ctx.stored(&origin);
    let text = ctx.env.space.dump(&at, &size, flags & LINEAR != 0)?;
    fs::write(&path, text)?;
    debug!(ip = %ctx.ip.id, path, at = %at, size = %size, "wrote file");
    Ok(())
}
