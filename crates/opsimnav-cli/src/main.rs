use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use opsimnav_cli::commands::{
    classes::handle_classes,
    estimate::{handle_estimate, ScenarioArgs},
    extents::{handle_extents, ExtentsArgs},
    report::{handle_report, ReportArgs},
};
use opsimnav_cli::output::OutputFormat;
use opsimnav_lib::OpsimnavConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "OpsimNav hull, KPI and compliance report utilities")]
struct Cli {
    /// Configuration file (JSON). Defaults to the platform config directory.
    #[arg(long, global = true, env = "OPSIMNAV_CONFIG")]
    config: Option<PathBuf>,

    /// Output format for command results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available ship classes.
    Classes,
    /// Print the length, beam and draft of an STL hull mesh.
    Extents(ExtentsArgs),
    /// Estimate reference speed, fuel consumption and CII rating for a scenario.
    Estimate(ScenarioArgs),
    /// Estimate a scenario and write the compliance report PDF.
    Report(ReportArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // `extents` reads only the mesh, so a broken config file does not block it.
    let load_config = || {
        OpsimnavConfig::resolve(cli.config.as_deref()).context("failed to load configuration")
    };

    let rendered = match &cli.command {
        Command::Classes => handle_classes(&load_config()?, cli.format)?,
        Command::Extents(args) => handle_extents(args, cli.format)?,
        Command::Estimate(args) => handle_estimate(args, &load_config()?, cli.format)?,
        Command::Report(args) => handle_report(args, &load_config()?, cli.format)?,
    };

    print!("{rendered}");
    Ok(())
}

/// Log to stderr so stdout carries only command output.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
