// These Clippy lints are disabled because this is a CLI binary, not a library:
// - print_stderr: failures are reported on stderr before exiting.
// - exit: the process exit code carries the validation outcome.
#![allow(clippy::print_stderr, clippy::exit)]

use clap::Parser;

use lineage_cli::cli::{self, Cli};

fn main() {
    let args = Cli::parse();
    lineage_cli::logging::init(args.verbose);

    match cli::run(&args) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(2);
        }
    }
}
