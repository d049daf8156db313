//! Output formatting for command results.
//!
//! Each command builds a serializable result struct; the formatters here turn
//! it into either human-readable text or pretty JSON. Formatters return the
//! rendered string so they can be tested without capturing stdout.

use std::fmt::Write;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

use opsimnav_lib::{HullExtents, KpiResult, ParsedReport, ScenarioInput, ShipClass};

use crate::terminal::ColorPalette;

/// How command results are printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Render `value` as JSON, or with `text` for the text format.
    pub fn render<T, F>(self, value: &T, text: F) -> anyhow::Result<String>
    where
        T: Serialize,
        F: FnOnce(&T, &ColorPalette) -> String,
    {
        match self {
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(value)?;
                json.push('\n');
                Ok(json)
            }
            OutputFormat::Text => Ok(text(value, &ColorPalette::detect())),
        }
    }
}

/// Result of the `classes` command.
#[derive(Debug, Clone, Serialize)]
pub struct ClassesOutput {
    /// CSV catalog the classes came from; absent for the built-in catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    pub count: usize,
    pub classes: Vec<ShipClass>,
}

/// Result of the `extents` command.
#[derive(Debug, Clone, Serialize)]
pub struct ExtentsOutput {
    pub stl: PathBuf,
    #[serde(flatten)]
    pub extents: HullExtents,
}

/// Result of the `estimate` command.
#[derive(Debug, Clone, Serialize)]
pub struct EstimateOutput {
    pub scenario: ScenarioInput,
    pub kpis: KpiResult,
}

/// Result of the `report` command.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    pub id: String,
    pub path: PathBuf,
    pub kpis: KpiResult,
    /// Present when `--verify` re-read the written file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<ParsedReport>,
}

pub fn format_classes_text(output: &ClassesOutput, palette: &ColorPalette) -> String {
    let mut out = String::new();
    if output.classes.is_empty() {
        out.push_str("No ship classes available.\n");
        return out;
    }

    let _ = writeln!(out, "Ship classes ({}):", output.count);
    let _ = writeln!(
        out,
        "{}{:<20} {:>16} {:>18}{}",
        palette.gray, "Name", "Base Speed (kn)", "Design Speed (kn)", palette.reset
    );
    for class in &output.classes {
        let _ = writeln!(
            out,
            "{}{:<20}{} {:>16.2} {:>18.2}",
            palette.white_bold,
            class.name,
            palette.reset,
            class.base_speed_kn,
            class.design_speed_kn
        );
    }
    if let Some(source) = &output.source {
        let _ = writeln!(
            out,
            "{}Source: {}{}",
            palette.gray,
            source.display(),
            palette.reset
        );
    }
    out
}

pub fn format_extents_text(output: &ExtentsOutput, palette: &ColorPalette) -> String {
    let extents = &output.extents;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Hull extents of {}{}{} ({} triangles):",
        palette.white_bold,
        output.stl.display(),
        palette.reset,
        extents.triangle_count
    );
    let _ = writeln!(out, "  Length: {} m", extents.length_m);
    let _ = writeln!(out, "  Beam:   {} m", extents.beam_m);
    let _ = writeln!(out, "  Draft:  {} m", extents.draft_m);
    out
}

pub fn format_estimate_text(output: &EstimateOutput, palette: &ColorPalette) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "KPI estimate for {}{}{} ({} strategy):",
        palette.white_bold,
        output.scenario.ship_class().name,
        palette.reset,
        output.kpis.strategy
    );
    write_kpis(&mut out, &output.kpis, palette);
    out
}

pub fn format_report_text(output: &ReportOutput, palette: &ColorPalette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Report written to {}", output.path.display());
    let _ = writeln!(out, "{}Report id: {}{}", palette.gray, output.id, palette.reset);
    write_kpis(&mut out, &output.kpis, palette);
    if output.verified.is_some() {
        let _ = writeln!(
            out,
            "{}Verified: report content matches the scenario and KPIs{}",
            palette.green, palette.reset
        );
    }
    out
}

fn write_kpis(out: &mut String, kpis: &KpiResult, palette: &ColorPalette) {
    let _ = writeln!(out, "  Predicted Vref:   {:.2} knots", kpis.reference_speed_kn);
    let _ = writeln!(
        out,
        "  Fuel consumption: {:.1} tons/day",
        kpis.fuel_consumption_t_per_day
    );
    if let Some(resistance) = kpis.resistance_kn {
        let _ = writeln!(out, "  Resistance:       {resistance:.2} kN");
    }
    let _ = writeln!(
        out,
        "  CII rating:       {} {} {}",
        palette.rating(kpis.compliance_rating),
        kpis.compliance_rating,
        palette.reset
    );
}
