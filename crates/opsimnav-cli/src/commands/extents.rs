//! Extents command handler for reading hull dimensions from an STL mesh.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use opsimnav_lib::extract_hull_extents;

use crate::output::{format_extents_text, ExtentsOutput, OutputFormat};

/// Arguments for the extents command.
#[derive(Debug, Clone, Args)]
pub struct ExtentsArgs {
    /// Hull surface mesh (ASCII or binary STL).
    #[arg(long)]
    pub stl: PathBuf,
}

/// Handle the extents subcommand.
pub fn handle_extents(args: &ExtentsArgs, format: OutputFormat) -> Result<String> {
    let extents = extract_hull_extents(&args.stl)
        .with_context(|| format!("failed to extract hull extents from {}", args.stl.display()))?;

    let output = ExtentsOutput {
        stl: args.stl.clone(),
        extents,
    };
    format.render(&output, format_extents_text)
}
