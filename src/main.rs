//! habit - local-first habit tracker

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = habitstack::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
