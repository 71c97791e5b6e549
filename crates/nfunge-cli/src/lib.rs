//! nfunge command line.
//!
//! Commands:
//! - `nfunge run <file> [-- args...]` - Run a program, exit with its code
//! - `nfunge dump <file>` - Load a program and print funge-space back out

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use nfunge_vm::UnknownOpcodePolicy;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "nfunge")]
#[command(about = "Funge-98 interpreter for any number of dimensions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a program
    Run {
        /// Program source
        file: String,

        /// Dimensions of funge-space
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..))]
        dims: u8,

        /// Stop with an error after this many ticks
        #[arg(long)]
        max_ticks: Option<u64>,

        /// What to do on a cell with no instruction
        #[arg(long, value_enum, default_value_t = Unknown::Warn)]
        unknown: Unknown,

        /// Arguments passed to the program
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Load a program and print the occupied region of funge-space
    Dump {
        /// Program source
        file: String,

        /// Dimensions of funge-space
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..))]
        dims: u8,

        /// Drop trailing blanks and compress runs of filler
        #[arg(long)]
        linear: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Unknown {
    Warn,
    Reflect,
}

impl From<Unknown> for UnknownOpcodePolicy {
    fn from(u: Unknown) -> Self {
        match u {
            Unknown::Warn => UnknownOpcodePolicy::Warn,
            Unknown::Reflect => UnknownOpcodePolicy::Reflect,
        }
    }
}

/// Initialize logging to stderr.
///
/// Use the `RUST_LOG` environment variable to override the default filter
/// of `warn`; `RUST_LOG=nfunge_vm=trace` logs every executed instruction.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
