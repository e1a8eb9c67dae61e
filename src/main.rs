//! Binary entrypoint for the `devhost` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    devhost::logging::init();
    // Recording is handled in commands::dispatch via DEVHOST_RECORD=<dir>.
    match devhost::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
