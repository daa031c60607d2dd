mod cli;
mod config;
mod convert;
mod logging;
mod match_cmd;
mod verify_cmd;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::verify_cmd::Disagreement;

/// Exit status for bad input, I/O or configuration.
const EXIT_FAILURE: u8 = 1;
/// Exit status when `verify` finds queries that disagree.
const EXIT_DISAGREEMENT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_status(&e))
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Match(args) => match_cmd::run(args),
        Command::Verify(args) => verify_cmd::run(args),
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    if err.is::<Disagreement>() {
        EXIT_DISAGREEMENT
    } else {
        EXIT_FAILURE
    }
}
