//! Quai Insight block ingestion.
//!
//! Runs a single ingestion cycle and exits, or polls until interrupted with `--continuous`.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use clap::Parser;

mod cli;
mod flags;

fn main() {
    if let Err(err) = cli::Cli::parse().run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
