//! Compliance report rendering, storage and read-back.
//!
//! The report has a fixed layout: a title, one line per scenario input, a
//! blank separator, then one line per KPI. Every line is `Label: value unit`
//! so [`parse_report`] can recover the values from the rendered document.

mod pdf;
pub mod store;

pub use store::ReportStore;

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::estimator::{ComplianceRating, EstimatorStrategy, KpiResult};
use crate::scenario::ScenarioInput;

use pdf::PageLine;

/// Title line of every report.
pub const REPORT_TITLE: &str = "OpsimNAV Compliance Report";

/// Suggested download name of a report.
pub const REPORT_FILE_NAME: &str = "opsimnav_report.pdf";

/// Labelled report rows, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    ShipType,
    WaveHeight,
    WindSpeed,
    EngineLoad,
    TrimAngle,
    HullLength,
    HullBeam,
    HullDraft,
    ShipSpeed,
    WaveAngle,
    Strategy,
    Vref,
    Fuel,
    Resistance,
    Cii,
}

impl Field {
    const ALL: [Field; 15] = [
        Field::ShipType,
        Field::WaveHeight,
        Field::WindSpeed,
        Field::EngineLoad,
        Field::TrimAngle,
        Field::HullLength,
        Field::HullBeam,
        Field::HullDraft,
        Field::ShipSpeed,
        Field::WaveAngle,
        Field::Strategy,
        Field::Vref,
        Field::Fuel,
        Field::Resistance,
        Field::Cii,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::ShipType => "Ship Type",
            Field::WaveHeight => "Wave Height",
            Field::WindSpeed => "Wind Speed",
            Field::EngineLoad => "Engine Load",
            Field::TrimAngle => "Trim Angle",
            Field::HullLength => "Hull Length",
            Field::HullBeam => "Hull Beam",
            Field::HullDraft => "Hull Draft",
            Field::ShipSpeed => "Ship Speed",
            Field::WaveAngle => "Wave Angle",
            Field::Strategy => "Estimation Strategy",
            Field::Vref => "Predicted Vref",
            Field::Fuel => "Estimated Fuel Consumption",
            Field::Resistance => "Estimated Resistance",
            Field::Cii => "CII Rating",
        }
    }

    fn unit(self) -> Option<&'static str> {
        match self {
            Field::WaveHeight | Field::HullLength | Field::HullBeam | Field::HullDraft => Some("m"),
            Field::WindSpeed | Field::ShipSpeed | Field::Vref => Some("knots"),
            Field::EngineLoad => Some("%"),
            Field::TrimAngle | Field::WaveAngle => Some("deg"),
            Field::Fuel => Some("tons/day"),
            Field::Resistance => Some("kN"),
            Field::ShipType | Field::Strategy | Field::Cii => None,
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }

    fn line(self, value: &str) -> String {
        match self.unit() {
            Some(unit) => format!("{}: {} {}", self.label(), value, unit),
            None => format!("{}: {}", self.label(), value),
        }
    }
}

/// A rendered report owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    id: Uuid,
    file_name: String,
    bytes: Vec<u8>,
}

impl ReportArtifact {
    /// Unique identifier used to key the artifact in a [`ReportStore`].
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Renders scenario + KPI pairs into PDF reports.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder;

impl ReportBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Render a report under a fresh random identifier.
    pub fn build(&self, scenario: &ScenarioInput, kpis: &KpiResult) -> ReportArtifact {
        self.build_with_id(Uuid::new_v4(), scenario, kpis)
    }

    /// Render a report under a caller-chosen identifier, e.g. one derived from a request.
    pub fn build_with_id(
        &self,
        id: Uuid,
        scenario: &ScenarioInput,
        kpis: &KpiResult,
    ) -> ReportArtifact {
        let (inputs, outputs) = report_sections(scenario, kpis);

        let mut page = Vec::with_capacity(inputs.len() + outputs.len() + 3);
        page.push(PageLine::Title(REPORT_TITLE.to_string()));
        page.push(PageLine::Blank);
        page.extend(inputs.into_iter().map(PageLine::Text));
        page.push(PageLine::Blank);
        page.extend(outputs.into_iter().map(PageLine::Text));

        ReportArtifact {
            id,
            file_name: REPORT_FILE_NAME.to_string(),
            bytes: pdf::render(&page, REPORT_TITLE),
        }
    }
}

/// Report body as plain text lines: title, inputs, blank separator, outputs.
pub fn report_lines(scenario: &ScenarioInput, kpis: &KpiResult) -> Vec<String> {
    let (inputs, outputs) = report_sections(scenario, kpis);
    let mut lines = Vec::with_capacity(inputs.len() + outputs.len() + 3);
    lines.push(REPORT_TITLE.to_string());
    lines.push(String::new());
    lines.extend(inputs);
    lines.push(String::new());
    lines.extend(outputs);
    lines
}

fn report_sections(scenario: &ScenarioInput, kpis: &KpiResult) -> (Vec<String>, Vec<String>) {
    // Inputs use the shortest representation that parses back to the same value.
    let mut inputs = vec![
        Field::ShipType.line(&scenario.ship_class().name),
        Field::WaveHeight.line(&scenario.wave_height_m().to_string()),
        Field::WindSpeed.line(&scenario.wind_speed_kn().to_string()),
        Field::EngineLoad.line(&scenario.engine_load_pct().to_string()),
        Field::TrimAngle.line(&scenario.trim_deg().to_string()),
    ];
    let optional = [
        (Field::HullLength, scenario.hull_length_m()),
        (Field::HullBeam, scenario.hull_beam_m()),
        (Field::HullDraft, scenario.hull_draft_m()),
        (Field::ShipSpeed, scenario.speed_kn()),
        (Field::WaveAngle, scenario.wave_angle_deg()),
    ];
    inputs.extend(
        optional
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| field.line(&v.to_string()))),
    );

    let mut outputs = vec![
        Field::Strategy.line(&kpis.strategy.to_string()),
        Field::Vref.line(&format!("{:.2}", kpis.reference_speed_kn)),
        Field::Fuel.line(&format!("{:.1}", kpis.fuel_consumption_t_per_day)),
    ];
    if let Some(resistance) = kpis.resistance_kn {
        outputs.push(Field::Resistance.line(&format!("{resistance:.2}")));
    }
    outputs.push(Field::Cii.line(kpis.compliance_rating.as_str()));

    (inputs, outputs)
}

/// Values recovered from a rendered report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedReport {
    pub title: String,
    pub ship_class: String,
    pub wave_height_m: f64,
    pub wind_speed_kn: f64,
    pub engine_load_pct: f64,
    pub trim_deg: f64,
    pub hull_length_m: Option<f64>,
    pub hull_beam_m: Option<f64>,
    pub hull_draft_m: Option<f64>,
    pub speed_kn: Option<f64>,
    pub wave_angle_deg: Option<f64>,
    pub strategy: EstimatorStrategy,
    pub reference_speed_kn: f64,
    pub fuel_consumption_t_per_day: f64,
    pub resistance_kn: Option<f64>,
    pub compliance_rating: ComplianceRating,
}

impl ParsedReport {
    /// Whether the report carries exactly this scenario and these KPIs.
    pub fn matches(&self, scenario: &ScenarioInput, kpis: &KpiResult) -> bool {
        self.ship_class == scenario.ship_class().name
            && self.wave_height_m == scenario.wave_height_m()
            && self.wind_speed_kn == scenario.wind_speed_kn()
            && self.engine_load_pct == scenario.engine_load_pct()
            && self.trim_deg == scenario.trim_deg()
            && self.hull_length_m == scenario.hull_length_m()
            && self.hull_beam_m == scenario.hull_beam_m()
            && self.hull_draft_m == scenario.hull_draft_m()
            && self.speed_kn == scenario.speed_kn()
            && self.wave_angle_deg == scenario.wave_angle_deg()
            && self.strategy == kpis.strategy
            && self.reference_speed_kn == kpis.reference_speed_kn
            && self.fuel_consumption_t_per_day == kpis.fuel_consumption_t_per_day
            && self.resistance_kn == kpis.resistance_kn
            && self.compliance_rating == kpis.compliance_rating
    }
}

/// Read the values back out of a report produced by [`ReportBuilder`].
///
/// # Errors
/// Returns [`Error::ReportParse`] when the bytes are not such a report or a
/// required line is missing or malformed.
pub fn parse_report(bytes: &[u8]) -> Result<ParsedReport> {
    let mut lines = pdf::extract_text(bytes)?.into_iter();

    let title = lines
        .next()
        .ok_or_else(|| parse_error("report is empty".to_string()))?;
    if title != REPORT_TITLE {
        return Err(parse_error(format!("unexpected report title '{title}'")));
    }

    let mut values: HashMap<Field, String> = HashMap::new();
    for line in lines {
        let (label, rest) = line
            .split_once(": ")
            .ok_or_else(|| parse_error(format!("line '{line}' has no label")))?;
        let field = Field::from_label(label)
            .ok_or_else(|| parse_error(format!("unknown report field '{label}'")))?;
        let value = match field.unit() {
            Some(unit) => rest
                .strip_suffix(unit)
                .and_then(|v| v.strip_suffix(' '))
                .ok_or_else(|| parse_error(format!("{label} is missing its unit '{unit}'")))?,
            None => rest,
        };
        values.insert(field, value.to_string());
    }

    let text = |field: Field| {
        values
            .get(&field)
            .cloned()
            .ok_or_else(|| parse_error(format!("missing field '{}'", field.label())))
    };
    let optional_number = |field: Field| -> Result<Option<f64>> {
        values
            .get(&field)
            .map(|raw| {
                raw.parse::<f64>().map_err(|e| {
                    parse_error(format!("invalid number for '{}': {e}", field.label()))
                })
            })
            .transpose()
    };
    let number = |field: Field| -> Result<f64> {
        optional_number(field)?
            .ok_or_else(|| parse_error(format!("missing field '{}'", field.label())))
    };

    Ok(ParsedReport {
        title,
        ship_class: text(Field::ShipType)?,
        wave_height_m: number(Field::WaveHeight)?,
        wind_speed_kn: number(Field::WindSpeed)?,
        engine_load_pct: number(Field::EngineLoad)?,
        trim_deg: number(Field::TrimAngle)?,
        hull_length_m: optional_number(Field::HullLength)?,
        hull_beam_m: optional_number(Field::HullBeam)?,
        hull_draft_m: optional_number(Field::HullDraft)?,
        speed_kn: optional_number(Field::ShipSpeed)?,
        wave_angle_deg: optional_number(Field::WaveAngle)?,
        strategy: text(Field::Strategy)?.parse()?,
        reference_speed_kn: number(Field::Vref)?,
        fuel_consumption_t_per_day: number(Field::Fuel)?,
        resistance_kn: optional_number(Field::Resistance)?,
        compliance_rating: text(Field::Cii)?.parse()?,
    })
}

fn parse_error(message: String) -> Error {
    Error::ReportParse { message }
}
