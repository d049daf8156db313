//! OpsimNav library entry points.
//!
//! This crate exposes helpers to read hull extents from an STL mesh, estimate
//! speed, fuel and compliance KPIs for a sea-state scenario, and render the
//! result as a single-page PDF report. Higher-level consumers (CLI) should
//! only depend on the functions exported here instead of reimplementing
//! behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod error;
pub mod estimator;
pub mod geometry;
pub mod report;
pub mod scenario;
pub mod ship;

pub use config::{default_config_path, OpsimnavConfig};
pub use error::{Error, Result};
pub use estimator::{
    ComplianceRating, Estimator, EstimatorStrategy, FormulaCoefficients, FormulaEstimator,
    KpiEstimator, KpiResult, LinearResistanceModel, ModelEstimator, ModelSettings,
    ResistanceFeatures, ResistanceModel,
};
pub use geometry::{extract_hull_extents, load_stl, parse_stl, HullExtents, Mesh};
pub use report::{
    parse_report, report_lines, ParsedReport, ReportArtifact, ReportBuilder, ReportStore,
    REPORT_FILE_NAME, REPORT_TITLE,
};
pub use scenario::{Bounds, ScenarioInput, ScenarioLimits, ScenarioParams};
pub use ship::{ShipClass, ShipClassCatalog};
