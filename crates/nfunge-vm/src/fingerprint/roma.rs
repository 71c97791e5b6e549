//! ROMA: roman numeral literals.

use nfunge_core::Value;

use super::{Fingerprint, Instancing};
use crate::error::OpResult;
use crate::exec::Ctx;

pub const FINGERPRINT: Fingerprint = Fingerprint {
    name: "ROMA",
    instancing: Instancing::Global,
    bindings: &[
        (b'C', op_numeral),
        (b'D', op_numeral),
        (b'I', op_numeral),
        (b'L', op_numeral),
        (b'M', op_numeral),
        (b'V', op_numeral),
        (b'X', op_numeral),
    ],
    new_state: None,
};

fn numeral_value(letter: Value) -> Value {
    match u8::try_from(letter).unwrap_or(0) {
        b'I' => 1,
        b'V' => 5,
        b'X' => 10,
        b'L' => 50,
        b'C' => 100,
        b'D' => 500,
        b'M' => 1000,
        _ => 0,
    }
}

fn op_numeral(ctx: &mut Ctx) -> OpResult {
    ctx.push(numeral_value(ctx.code));
    Ok(())
}
