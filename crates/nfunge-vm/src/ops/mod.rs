//! Base Funge-98 instruction implementations.

pub mod arith;
pub mod flow;
pub mod fprint;
pub mod io;
pub mod space;
pub mod stack;
pub mod sysinfo;

use crate::instruction::OpTable;

/// Register every base instruction.
pub fn register_all(table: &mut OpTable) {
    arith::register(table);
    flow::register(table);
    stack::register(table);
    space::register(table);
    io::register(table);
    sysinfo::register(table);
    fprint::register(table);
}
