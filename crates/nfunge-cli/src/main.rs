use std::process;

use clap::Parser;
use nfunge_cli::{commands, init_logging, Cli, Commands};

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            file,
            dims,
            max_ticks,
            unknown,
            args,
        } => commands::run::run(&file, dims as usize, max_ticks, unknown.into(), args),
        Commands::Dump { file, dims, linear } => {
            commands::dump::run(&file, dims as usize, linear).map(|()| 0)
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}
