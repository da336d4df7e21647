#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;
pub mod services;

use crate::handlers::{list, scaffold};
use crate::models::args::Cli;

use anyhow::{Context, Result};
use clap::Parser;
use ssgen_logger::Logger;
use ssgen_scaffold::load_config;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Usage errors exit with 1, help and version with 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        },
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {err:#}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut logger = Logger::builder().name(env!("CARGO_PKG_NAME")).verbosity(cli.verbose);
    if let Some(dir) = &cli.log_dir {
        logger = logger.path(dir).json(cli.log_json);
    }
    let _logger = logger.init().context("Could not initialize logging")?;

    let root = cli.root.unwrap_or_default();
    let mut config =
        load_config(&root, cli.config.as_deref()).context("Could not load configuration")?;
    if let Some(namespace) = cli.namespace {
        config.namespace = namespace;
    }
    if cli.legacy_placeholder {
        config.legacy_placeholder = true;
    }
    tracing::debug!(root = %root.display(), ?config, "Resolved configuration");

    if cli.list {
        return list::list_subsystems(&root, &config);
    }

    let name = cli.name.context("A subsystem name is required")?;
    scaffold::create_subsystem(&root, &name, &config, cli.dry_run)
}
