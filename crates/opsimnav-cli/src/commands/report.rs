//! Report command handler: estimate, render the PDF and store it.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use opsimnav_lib::{parse_report, OpsimnavConfig, ReportBuilder};

use crate::commands::estimate::ScenarioArgs;
use crate::output::{format_report_text, OutputFormat, ReportOutput};

/// Arguments for the report command.
#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Directory reports are written under, overriding the configuration
    /// and `OPSIMNAV_REPORT_DIR`.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Read the written report back and check it against the scenario and KPIs.
    #[arg(long)]
    pub verify: bool,
}

/// Handle the report subcommand.
pub fn handle_report(
    args: &ReportArgs,
    config: &OpsimnavConfig,
    format: OutputFormat,
) -> Result<String> {
    let (scenario, kpis) = args.scenario.estimate(config)?;

    let artifact = ReportBuilder::new().build(&scenario, &kpis);
    let store = config
        .report_store(args.output_dir.as_deref())
        .context("failed to resolve the report directory")?;
    let path = store.save(&artifact)?;

    let verified = if args.verify {
        let bytes = fs::read(&path)
            .with_context(|| format!("failed to read back report {}", path.display()))?;
        let parsed = parse_report(&bytes)
            .with_context(|| format!("failed to parse report {}", path.display()))?;
        if !parsed.matches(&scenario, &kpis) {
            bail!(
                "report {} does not match the scenario and KPIs it was rendered from",
                path.display()
            );
        }
        info!(id = %artifact.id(), "report round trip verified");
        Some(parsed)
    } else {
        None
    };

    let output = ReportOutput {
        id: artifact.id().to_string(),
        path,
        kpis,
        verified,
    };
    format.render(&output, format_report_text)
}
