//! Model-lookup strategy.
//!
//! A pre-fitted regression maps hull geometry and sea state to a resistance
//! figure; fuel and compliance are derived from it:
//!
//! ```text
//! resistance = model([length, beam, draft, speed, wave_height, wave_angle, trim])
//! fuel       = 0.00025 * resistance * speed
//! score      = 120 - fuel      -> A (> 90), B (> 75), C (> 60), D
//! ```
//!
//! The regression itself is opaque: anything implementing [`ResistanceModel`]
//! can be plugged in. [`LinearResistanceModel`] is the artifact format this
//! crate can load from disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::scenario::ScenarioInput;

use super::constants::*;
use super::{round_to, ComplianceRating, EstimatorStrategy, KpiEstimator, KpiResult};

/// Number of features the regression consumes.
pub const FEATURE_COUNT: usize = 7;

/// Feature vector in the fixed order the regression was fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResistanceFeatures {
    pub length_m: f64,
    pub beam_m: f64,
    pub draft_m: f64,
    pub speed_kn: f64,
    pub wave_height_m: f64,
    pub wave_angle_deg: f64,
    pub trim_deg: f64,
}

impl ResistanceFeatures {
    /// Assemble the features for `scenario`, defaulting the speed to `fallback_speed_kn`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidScenario`] naming the first missing hull dimension.
    pub fn from_scenario(scenario: &ScenarioInput, fallback_speed_kn: f64) -> Result<Self> {
        let require = |field: &str, value: Option<f64>| {
            value.ok_or_else(|| {
                Error::invalid_scenario(
                    field,
                    "is required by the model strategy; supply it or a hull mesh",
                )
            })
        };

        Ok(Self {
            length_m: require("hull_length_m", scenario.hull_length_m())?,
            beam_m: require("hull_beam_m", scenario.hull_beam_m())?,
            draft_m: require("hull_draft_m", scenario.hull_draft_m())?,
            speed_kn: scenario.speed_kn().unwrap_or(fallback_speed_kn),
            wave_height_m: scenario.wave_height_m(),
            wave_angle_deg: scenario.effective_wave_angle_deg(),
            trim_deg: scenario.trim_deg(),
        })
    }

    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.length_m,
            self.beam_m,
            self.draft_m,
            self.speed_kn,
            self.wave_height_m,
            self.wave_angle_deg,
            self.trim_deg,
        ]
    }
}

/// Opaque regression returning hydrodynamic resistance in kN.
pub trait ResistanceModel: fmt::Debug + Send + Sync {
    fn predict(&self, features: &ResistanceFeatures) -> Result<f64>;
}

/// Linear regression artifact: `intercept + weights . features`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearResistanceModel {
    pub intercept: f64,
    pub weights: [f64; FEATURE_COUNT],
}

impl LinearResistanceModel {
    pub fn new(intercept: f64, weights: [f64; FEATURE_COUNT]) -> Result<Self> {
        let model = Self { intercept, weights };
        model.validate().map_err(|message| Error::ModelEvaluation { message })?;
        Ok(model)
    }

    /// Load a JSON artifact of the form `{"intercept": .., "weights": [7 numbers]}`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let load_err = |message: String| Error::ModelLoad {
            path: path.to_path_buf(),
            message,
        };

        let raw = fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let model: Self = serde_json::from_str(&raw).map_err(|e| load_err(e.to_string()))?;
        model.validate().map_err(load_err)?;

        debug!("loaded linear resistance model from {}", path.display());
        Ok(model)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if !self.intercept.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err("model coefficients must be finite".to_string());
        }
        Ok(())
    }
}

impl ResistanceModel for LinearResistanceModel {
    fn predict(&self, features: &ResistanceFeatures) -> Result<f64> {
        Ok(self
            .weights
            .iter()
            .zip(features.as_array())
            .fold(self.intercept, |acc, (w, x)| acc + w * x))
    }
}

/// Tunables of the model-lookup strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Path to the regression artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    pub fuel_per_resistance_speed: f64,
    pub score_base: f64,
    pub band_a_above: f64,
    pub band_b_above: f64,
    pub band_c_above: f64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            artifact: None,
            fuel_per_resistance_speed: FUEL_PER_RESISTANCE_SPEED,
            score_base: COMPLIANCE_SCORE_BASE,
            band_a_above: SCORE_BAND_A_ABOVE,
            band_b_above: SCORE_BAND_B_ABOVE,
            band_c_above: SCORE_BAND_C_ABOVE,
        }
    }
}

impl ModelSettings {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            (self.fuel_per_resistance_speed, "fuel_per_resistance_speed"),
            (self.score_base, "score_base"),
            (self.band_a_above, "band_a_above"),
            (self.band_b_above, "band_b_above"),
            (self.band_c_above, "band_c_above"),
        ];
        for (value, field) in fields {
            if !value.is_finite() {
                return Err(Error::Config {
                    message: format!("model.{field} must be finite, got {value}"),
                });
            }
        }

        if !(self.band_a_above >= self.band_b_above && self.band_b_above >= self.band_c_above) {
            return Err(Error::Config {
                message: "model score bands must be ordered band_a_above >= band_b_above >= band_c_above"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Compliance score for a daily fuel figure; higher is better.
    pub fn score(&self, fuel_t_per_day: f64) -> f64 {
        self.score_base - fuel_t_per_day
    }

    /// Grade a compliance score. Band thresholds are exclusive.
    pub fn rate(&self, score: f64) -> ComplianceRating {
        if score > self.band_a_above {
            ComplianceRating::A
        } else if score > self.band_b_above {
            ComplianceRating::B
        } else if score > self.band_c_above {
            ComplianceRating::C
        } else {
            ComplianceRating::D
        }
    }
}

/// Estimator backed by a [`ResistanceModel`].
#[derive(Debug)]
pub struct ModelEstimator {
    model: Box<dyn ResistanceModel>,
    settings: ModelSettings,
}

impl ModelEstimator {
    pub fn new(model: Box<dyn ResistanceModel>, settings: ModelSettings) -> Self {
        Self { model, settings }
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }
}

impl KpiEstimator for ModelEstimator {
    fn strategy(&self) -> EstimatorStrategy {
        EstimatorStrategy::Model
    }

    fn estimate(&self, scenario: &ScenarioInput) -> Result<KpiResult> {
        let features =
            ResistanceFeatures::from_scenario(scenario, scenario.ship_class().design_speed_kn)?;
        let resistance = self.model.predict(&features)?;

        if !resistance.is_finite() {
            return Err(Error::ModelEvaluation {
                message: format!("model returned non-finite resistance {resistance}"),
            });
        }

        let fuel = self.settings.fuel_per_resistance_speed * resistance * features.speed_kn;
        let score = self.settings.score(fuel);
        let rating = self.settings.rate(score);

        debug!(
            class = %scenario.ship_class().name,
            resistance_kn = resistance,
            fuel_t_per_day = fuel,
            score,
            rating = %rating,
            "model estimate"
        );

        Ok(KpiResult {
            strategy: EstimatorStrategy::Model,
            reference_speed_kn: round_to(features.speed_kn, SPEED_DECIMALS),
            fuel_consumption_t_per_day: round_to(fuel, FUEL_DECIMALS),
            compliance_rating: rating,
            resistance_kn: Some(round_to(resistance, RESISTANCE_DECIMALS)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bands_are_exclusive() {
        let settings = ModelSettings::default();
        assert_eq!(settings.rate(90.01), ComplianceRating::A);
        assert_eq!(settings.rate(90.0), ComplianceRating::B);
        assert_eq!(settings.rate(75.0), ComplianceRating::C);
        assert_eq!(settings.rate(60.0), ComplianceRating::D);
    }

    #[test]
    fn linear_model_is_dot_product_plus_intercept() {
        let model = LinearResistanceModel::new(1.0, [1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 10.0])
            .expect("finite coefficients");
        let features = ResistanceFeatures {
            length_m: 1.0,
            beam_m: 1.0,
            draft_m: 1.0,
            speed_kn: 5.0,
            wave_height_m: 1.0,
            wave_angle_deg: 90.0,
            trim_deg: 0.5,
        };
        assert_eq!(model.predict(&features).unwrap(), 12.0);
    }

    #[test]
    fn non_finite_weights_are_rejected() {
        assert!(LinearResistanceModel::new(f64::NAN, [0.0; FEATURE_COUNT]).is_err());
    }
}
