//! Shapebuf CLI - shape text and inspect glyph buffers

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Shape(args) => commands::shape::run(args),
        Commands::Deserialize(args) => commands::deserialize::run(args),
        Commands::Guess(args) => commands::guess::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}
