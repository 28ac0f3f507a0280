//! prioritize - dependency ranking for items and tags

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = prioritize::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
