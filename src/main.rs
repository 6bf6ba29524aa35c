//! `bootnotify` binary entry point.

use std::process::ExitCode;

use boot_notifier::cli_app::{self, Cli};
use clap::Parser as _;
use colored::Colorize as _;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli_app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let line = e.to_string();
            eprintln!("{}", line.as_str().red());
            ExitCode::FAILURE
        }
    }
}
