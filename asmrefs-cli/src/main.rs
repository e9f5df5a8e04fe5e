mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use crate::app::{Cli, GlobalOptions};

/// Library diagnostics go to stderr; JSON runs stay quiet so stdout remains machine-readable.
fn init_logging(global: &GlobalOptions) {
    if global.json {
        return;
    }

    let level = if global.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("asmrefs", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.global);

    ctrlc::set_handler(|| std::process::exit(130)).context("cannot install Ctrl+C handler")?;

    if cli.resolve.direct {
        return commands::direct::run(&cli.files, &cli.global);
    }
    commands::resolve::run(&cli.files, &cli.resolve, &cli.global)
}
