//! dmmtool - Command-line tool for rewriting and rendering tile maps

use std::process::ExitCode;

use dmmtool::cli;

fn main() -> ExitCode {
    cli::run()
}
