//! # CLI Argument Definitions
//!
//! The bare form `addsubsys <SUBSYSTEM-NAME>` scaffolds a subsystem in the
//! current directory; every option is an override.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "addsubsys")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scaffold a new msctl subsystem and register it in subsys.inc")]
pub struct Cli {
    /// Name of the subsystem (ASCII letters, digits and '_', not starting with a digit)
    #[arg(value_name = "SUBSYSTEM-NAME", required_unless_present = "list", conflicts_with = "list")]
    pub name: Option<String>,

    /// Project root holding the registry and the generated files [default: current directory]
    #[arg(short = 'C', long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Configuration file [default: <root>/addsubsys.toml, if present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Inner namespace under `msctl` (e.g. 'agent' or 'server')
    #[arg(short, long, value_name = "NS")]
    pub namespace: Option<String>,

    /// Emit the historical `std::make_shared<%%ss-name>` factory body verbatim
    #[arg(long)]
    pub legacy_placeholder: bool,

    /// Check every precondition and print the planned writes without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// List the subsystems registered in the registry file
    #[arg(short, long)]
    pub list: bool,

    /// Also write logs to daily rolling files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Write the log files as JSON lines
    #[arg(long, requires = "log_dir")]
    pub log_json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
