//! KPI estimation strategies.
//!
//! - [`formula`] - closed-form linear speed and fuel model (default)
//! - [`model`] - resistance lookup through a pre-fitted regression model
//! - [`constants`] - default coefficients for both
//!
//! Both strategies implement [`KpiEstimator`] and are wrapped by the
//! [`Estimator`] tagged variant so callers pick one through configuration
//! instead of branching at every call site.
//!
//! # Example
//!
//! ```
//! use opsimnav_lib::{
//!     ComplianceRating, FormulaEstimator, KpiEstimator, ScenarioInput, ScenarioLimits,
//!     ScenarioParams, ShipClassCatalog,
//! };
//!
//! let params = ScenarioParams::new("KCS", 3.0, 15.0, 75.0, 0.0);
//! let scenario =
//!     ScenarioInput::new(&params, &ShipClassCatalog::builtin(), &ScenarioLimits::default())
//!         .unwrap();
//! let kpis = FormulaEstimator::default().estimate(&scenario).unwrap();
//! assert_eq!(kpis.reference_speed_kn, 11.9);
//! assert_eq!(kpis.fuel_consumption_t_per_day, 66.5);
//! assert_eq!(kpis.compliance_rating, ComplianceRating::C);
//! ```

pub mod constants;
pub mod formula;
pub mod model;

pub use formula::{FormulaCoefficients, FormulaEstimator};
pub use model::{
    LinearResistanceModel, ModelEstimator, ModelSettings, ResistanceFeatures, ResistanceModel,
};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::OpsimnavConfig;
use crate::error::{Error, Result};
use crate::scenario::ScenarioInput;

/// Carbon Intensity Indicator letter grade.
///
/// The formula strategy only produces A, B or C; D is reachable through the
/// model-lookup strategy alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComplianceRating {
    A,
    B,
    C,
    D,
}

impl ComplianceRating {
    pub const ALL: [ComplianceRating; 4] = [
        ComplianceRating::A,
        ComplianceRating::B,
        ComplianceRating::C,
        ComplianceRating::D,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComplianceRating::A => "A",
            ComplianceRating::B => "B",
            ComplianceRating::C => "C",
            ComplianceRating::D => "D",
        }
    }
}

impl fmt::Display for ComplianceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplianceRating {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "A" | "a" => Ok(ComplianceRating::A),
            "B" | "b" => Ok(ComplianceRating::B),
            "C" | "c" => Ok(ComplianceRating::C),
            "D" | "d" => Ok(ComplianceRating::D),
            other => Err(Error::ReportParse {
                message: format!("unknown compliance rating '{other}'"),
            }),
        }
    }
}

/// Which estimation strategy produced, or should produce, a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorStrategy {
    /// Closed-form linear formula.
    #[default]
    Formula,
    /// Pre-fitted resistance regression.
    Model,
}

impl fmt::Display for EstimatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            EstimatorStrategy::Formula => "formula",
            EstimatorStrategy::Model => "model",
        };
        f.write_str(value)
    }
}

impl FromStr for EstimatorStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "formula" => Ok(EstimatorStrategy::Formula),
            "model" | "model_lookup" | "surrogate" => Ok(EstimatorStrategy::Model),
            other => Err(Error::Config {
                message: format!("unknown estimator strategy '{other}'"),
            }),
        }
    }
}

/// KPIs derived from one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiResult {
    pub strategy: EstimatorStrategy,
    /// Reference speed, rounded to 2 decimal places.
    pub reference_speed_kn: f64,
    /// Daily fuel consumption, rounded to 1 decimal place.
    pub fuel_consumption_t_per_day: f64,
    /// Graded from the unrounded fuel figure, so a fuel of 48.02 displays as
    /// 48.0 yet still grades C under the formula strategy.
    pub compliance_rating: ComplianceRating,
    /// Hydrodynamic resistance; only the model-lookup strategy reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance_kn: Option<f64>,
}

/// Maps a validated scenario to its KPIs.
///
/// Implementations must be deterministic: the same scenario always yields a
/// bit-identical result.
pub trait KpiEstimator {
    fn strategy(&self) -> EstimatorStrategy;

    fn estimate(&self, scenario: &ScenarioInput) -> Result<KpiResult>;
}

/// Strategy selected by configuration.
#[derive(Debug)]
pub enum Estimator {
    Formula(FormulaEstimator),
    Model(ModelEstimator),
}

impl Estimator {
    /// Build the estimator named by `config.strategy`.
    ///
    /// The model-lookup strategy loads its regression artifact here, so a
    /// missing or unreadable artifact fails before any scenario is estimated.
    pub fn from_config(config: &OpsimnavConfig) -> Result<Self> {
        match config.strategy {
            EstimatorStrategy::Formula => Ok(Estimator::Formula(FormulaEstimator::new(
                config.formula.clone(),
            ))),
            EstimatorStrategy::Model => {
                let path = config.model.artifact.as_deref().ok_or_else(|| Error::Config {
                    message: "the model strategy requires model.artifact to point at a resistance model"
                        .to_string(),
                })?;
                let model = LinearResistanceModel::from_path(path)?;
                Ok(Estimator::Model(ModelEstimator::new(
                    Box::new(model),
                    config.model.clone(),
                )))
            }
        }
    }
}

impl KpiEstimator for Estimator {
    fn strategy(&self) -> EstimatorStrategy {
        match self {
            Estimator::Formula(inner) => inner.strategy(),
            Estimator::Model(inner) => inner.strategy(),
        }
    }

    fn estimate(&self, scenario: &ScenarioInput) -> Result<KpiResult> {
        match self {
            Estimator::Formula(inner) => inner.estimate(scenario),
            Estimator::Model(inner) => inner.estimate(scenario),
        }
    }
}

/// Round half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
