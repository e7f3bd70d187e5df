#![forbid(unsafe_code)]

//! Terminal portfolio binary entry point.

use clap::Parser;

mod app;
mod cli;
mod input;
mod logging;
mod terminal;

fn main() {
    let args = cli::Args::parse();

    if let Err(err) = logging::init(args.log_file.as_deref()) {
        eprintln!("failed to set up logging: {err}");
        std::process::exit(1);
    }

    if let Err(err) = app::run(args) {
        eprintln!("runtime error: {err}");
        std::process::exit(1);
    }
}
