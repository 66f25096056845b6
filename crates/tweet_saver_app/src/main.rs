use std::process::ExitCode;

use clap::Parser;

mod cli;
mod platform;

fn main() -> anyhow::Result<ExitCode> {
    platform::run_app(cli::Cli::parse())
}
