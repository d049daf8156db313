//! Classes command handler for listing the ship class catalog.

use anyhow::{Context, Result};

use opsimnav_lib::OpsimnavConfig;

use crate::output::{format_classes_text, ClassesOutput, OutputFormat};

/// Handle the classes subcommand.
///
/// Lists the configured CSV catalog when one is set, otherwise the built-in classes.
pub fn handle_classes(config: &OpsimnavConfig, format: OutputFormat) -> Result<String> {
    let catalog = config
        .ship_catalog()
        .context("failed to load the ship class catalog")?;

    let output = ClassesOutput {
        source: catalog.source_path().map(|p| p.to_path_buf()),
        count: catalog.len(),
        classes: catalog.classes_sorted().into_iter().cloned().collect(),
    };
    format.render(&output, format_classes_text)
}
