//! `nfunge run` - Run a program.

use std::fs;

use anyhow::{Context, Result};
use nfunge_vm::{Host, Scheduler, UnknownOpcodePolicy, VmConfig};
use tracing::debug;

/// Run the program in `path` against stdin/stdout.
///
/// The program's own name comes first in the arguments it sees through
/// `y`. Returns the process exit code: the value given to `q`, or 0.
pub fn run(
    path: &str,
    dims: usize,
    max_ticks: Option<u64>,
    unknown: UnknownOpcodePolicy,
    args: Vec<String>,
) -> Result<i32> {
    let source = fs::read(path).with_context(|| format!("cannot read {}", path))?;

    let mut config = VmConfig::default()
        .with_dimensions(dims)
        .with_unknown_opcode(unknown);
    if let Some(limit) = max_ticks {
        config = config.with_max_ticks(limit);
    }

    let mut program_args = vec![path.to_string()];
    program_args.extend(args);
    let host = Host::stdio().with_args(program_args);

    let mut vm = Scheduler::new(config, host);
    vm.load(&source).with_context(|| format!("cannot load {}", path))?;
    let code = vm.run()?;
    debug!(ticks = vm.tick_count(), code, "finished");
    Ok(exit_code(code))
}

/// Clamps a cell value into a process exit code.
pub fn exit_code(code: i64) -> i32 {
    i32::try_from(code).unwrap_or(if code < 0 { i32::MIN } else { i32::MAX })
}
