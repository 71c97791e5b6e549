//! MODE: toggles the IP's mode flags.

use super::{Fingerprint, Instancing};
use crate::error::OpResult;
use crate::exec::Ctx;

pub const FINGERPRINT: Fingerprint = Fingerprint {
    name: "MODE",
    instancing: Instancing::Global,
    bindings: &[
        (b'H', op_hover),
        (b'I', op_invert),
        (b'Q', op_queue),
        (b'S', op_switch),
    ],
    new_state: None,
};

fn op_hover(ctx: &mut Ctx) -> OpResult {
    ctx.ip.flags.hover ^= true;
    Ok(())
}

fn op_invert(ctx: &mut Ctx) -> OpResult {
    ctx.ip.flags.invert ^= true;
    Ok(())
}

fn op_queue(ctx: &mut Ctx) -> OpResult {
    ctx.ip.flags.queue ^= true;
    Ok(())
}

fn op_switch(ctx: &mut Ctx) -> OpResult {
    ctx.ip.flags.switch ^= true;
    Ok(())
}
