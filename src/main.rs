//! # cv-forge CLI
//!
//! Binary entry point for the `cv-forge` command-line tool.
//!
//! It parses arguments with `clap`, runs the selected command and turns the
//! outcome into a process exit status. Commands report their own status
//! codes; errors that escape a command are printed and mapped through
//! [`cv_forge::error::Error::exit_code`] when they originate in the library.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

use cv_forge::exit_codes;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<cv_forge::error::Error>()
                .map(|err| err.exit_code())
                .unwrap_or(exit_codes::FAILURE);
            ExitCode::from(code)
        }
    }
}
