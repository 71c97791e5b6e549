//! Subcommand implementations.

pub mod dump;
pub mod run;
