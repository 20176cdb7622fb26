//! # tidyframe entry point
//!
//! ```text
//! main()
//!   ├─> init logging (RUST_LOG, default "info")
//!   ├─> parse CLI arguments (clap)
//!   ├─> `clean <file> ...`  -> run the cleaner (and plotter) once and exit
//!   └─> `gui` or nothing    -> open the desktop form
//! ```
//!
//! Any error ends the process with a non-zero exit code.

#![warn(clippy::all, rust_2018_idioms)]

mod cli;
mod gui;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    tidyframe::logging::init();

    let cli = cli::Cli::parse();
    match cli.command {
        Some(cli::Commands::Clean(args)) => cli::run_clean(&args),
        Some(cli::Commands::Gui { config }) => gui::run(config.as_deref()),
        None => gui::run(None),
    }
}
