//! HRTI: a per-IP high resolution timer.

use std::any::Any;
use std::time::Instant;

use chrono::Timelike;
use nfunge_core::Value;

use super::{handprint, Fingerprint, Instancing};
use crate::error::{OpError, OpResult};
use crate::exec::Ctx;

const CODE: u32 = handprint("HRTI");

pub const FINGERPRINT: Fingerprint = Fingerprint {
    name: "HRTI",
    instancing: Instancing::Ip,
    bindings: &[
        (b'E', op_erase),
        (b'G', op_granularity),
        (b'M', op_mark),
        (b'S', op_second),
        (b'T', op_timer),
    ],
    new_state: Some(new_state),
};

#[derive(Debug, Default)]
pub struct Timer {
    mark: Option<Instant>,
}

impl Timer {
    pub fn mark(&mut self) {
        self.mark = Some(Instant::now());
    }

    pub fn erase(&mut self) {
        self.mark = None;
    }

    /// Microseconds since the mark.
    pub fn elapsed(&self) -> Option<Value> {
        self.mark
            .map(|m| Value::try_from(m.elapsed().as_micros()).unwrap_or(Value::MAX))
    }
}

fn new_state() -> Box<dyn Any> {
    Box::new(Timer::default())
}

/// Smallest measurable step in microseconds.
fn op_granularity(ctx: &mut Ctx) -> OpResult {
    ctx.push(1);
    Ok(())
}

fn op_mark(ctx: &mut Ctx) -> OpResult {
    ctx.ip_state::<Timer>(CODE)?.mark();
    Ok(())
}

fn op_timer(ctx: &mut Ctx) -> OpResult {
    let elapsed = ctx
        .ip_state::<Timer>(CODE)?
        .elapsed()
        .ok_or(OpError::Failed("timer not marked"))?;
    ctx.push(elapsed);
    Ok(())
}

fn op_erase(ctx: &mut Ctx) -> OpResult {
    ctx.ip_state::<Timer>(CODE)?.erase();
    Ok(())
}

/// Microseconds into the current second.
fn op_second(ctx: &mut Ctx) -> OpResult {
    let micros = ctx.env.host.now().nanosecond() / 1000;
    ctx.push(micros as Value);
    Ok(())
}
