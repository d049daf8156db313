//! Closed-form formula strategy.
//!
//! ```text
//! speed = base_speed[class] - 0.2 * wave - 0.1 * wind
//!         + 0.05 * (load - 75) + 0.02 * trim
//! fuel  = 50 + 0.3 * (75 - load) + 1.5 * wave + 0.8 * wind
//! CII   = C if fuel > 48, A if fuel < 42, B otherwise
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::scenario::ScenarioInput;

use super::constants::*;
use super::{round_to, ComplianceRating, EstimatorStrategy, KpiEstimator, KpiResult};

/// Coefficients of the formula strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaCoefficients {
    pub neutral_engine_load_pct: f64,
    pub speed_penalty_per_wave_m: f64,
    pub speed_penalty_per_wind_kn: f64,
    pub speed_gain_per_load_pct: f64,
    pub speed_gain_per_trim_deg: f64,
    pub base_fuel_t_per_day: f64,
    pub fuel_per_load_deficit_pct: f64,
    pub fuel_per_wave_m: f64,
    pub fuel_per_wind_kn: f64,
    pub rating_c_above: f64,
    pub rating_a_below: f64,
}

impl Default for FormulaCoefficients {
    fn default() -> Self {
        Self {
            neutral_engine_load_pct: NEUTRAL_ENGINE_LOAD_PCT,
            speed_penalty_per_wave_m: SPEED_PENALTY_PER_WAVE_M,
            speed_penalty_per_wind_kn: SPEED_PENALTY_PER_WIND_KN,
            speed_gain_per_load_pct: SPEED_GAIN_PER_LOAD_PCT,
            speed_gain_per_trim_deg: SPEED_GAIN_PER_TRIM_DEG,
            base_fuel_t_per_day: BASE_FUEL_T_PER_DAY,
            fuel_per_load_deficit_pct: FUEL_PER_LOAD_DEFICIT_PCT,
            fuel_per_wave_m: FUEL_PER_WAVE_M,
            fuel_per_wind_kn: FUEL_PER_WIND_KN,
            rating_c_above: FORMULA_RATING_C_ABOVE,
            rating_a_below: FORMULA_RATING_A_BELOW,
        }
    }
}

impl FormulaCoefficients {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            (self.neutral_engine_load_pct, "neutral_engine_load_pct"),
            (self.speed_penalty_per_wave_m, "speed_penalty_per_wave_m"),
            (self.speed_penalty_per_wind_kn, "speed_penalty_per_wind_kn"),
            (self.speed_gain_per_load_pct, "speed_gain_per_load_pct"),
            (self.speed_gain_per_trim_deg, "speed_gain_per_trim_deg"),
            (self.base_fuel_t_per_day, "base_fuel_t_per_day"),
            (self.fuel_per_load_deficit_pct, "fuel_per_load_deficit_pct"),
            (self.fuel_per_wave_m, "fuel_per_wave_m"),
            (self.fuel_per_wind_kn, "fuel_per_wind_kn"),
            (self.rating_c_above, "rating_c_above"),
            (self.rating_a_below, "rating_a_below"),
        ];

        for (value, field) in fields {
            if !value.is_finite() {
                return Err(Error::Config {
                    message: format!("formula.{field} must be finite, got {value}"),
                });
            }
        }

        if self.rating_a_below > self.rating_c_above {
            return Err(Error::Config {
                message: format!(
                    "formula.rating_a_below ({}) must not exceed formula.rating_c_above ({})",
                    self.rating_a_below, self.rating_c_above
                ),
            });
        }

        Ok(())
    }

    /// Grade a daily fuel figure. Both thresholds are exclusive.
    pub fn rate(&self, fuel_t_per_day: f64) -> ComplianceRating {
        if fuel_t_per_day > self.rating_c_above {
            ComplianceRating::C
        } else if fuel_t_per_day < self.rating_a_below {
            ComplianceRating::A
        } else {
            ComplianceRating::B
        }
    }
}

/// Estimator applying [`FormulaCoefficients`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulaEstimator {
    coefficients: FormulaCoefficients,
}

impl FormulaEstimator {
    pub fn new(coefficients: FormulaCoefficients) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &FormulaCoefficients {
        &self.coefficients
    }

    /// Unrounded reference speed in knots.
    pub fn reference_speed_kn(&self, scenario: &ScenarioInput) -> f64 {
        let c = &self.coefficients;
        scenario.ship_class().base_speed_kn
            - c.speed_penalty_per_wave_m * scenario.wave_height_m()
            - c.speed_penalty_per_wind_kn * scenario.wind_speed_kn()
            + c.speed_gain_per_load_pct * (scenario.engine_load_pct() - c.neutral_engine_load_pct)
            + c.speed_gain_per_trim_deg * scenario.trim_deg()
    }

    /// Unrounded fuel consumption in tonnes per day.
    pub fn fuel_consumption_t_per_day(&self, scenario: &ScenarioInput) -> f64 {
        let c = &self.coefficients;
        c.base_fuel_t_per_day
            + c.fuel_per_load_deficit_pct * (c.neutral_engine_load_pct - scenario.engine_load_pct())
            + c.fuel_per_wave_m * scenario.wave_height_m()
            + c.fuel_per_wind_kn * scenario.wind_speed_kn()
    }
}

impl KpiEstimator for FormulaEstimator {
    fn strategy(&self) -> EstimatorStrategy {
        EstimatorStrategy::Formula
    }

    fn estimate(&self, scenario: &ScenarioInput) -> Result<KpiResult> {
        let speed = self.reference_speed_kn(scenario);
        let fuel = self.fuel_consumption_t_per_day(scenario);

        if !speed.is_finite() || !fuel.is_finite() {
            return Err(Error::Config {
                message: "formula coefficients produced a non-finite estimate".to_string(),
            });
        }

        // Grade before rounding so the thresholds stay exact.
        let rating = self.coefficients.rate(fuel);

        debug!(
            class = %scenario.ship_class().name,
            speed_kn = speed,
            fuel_t_per_day = fuel,
            rating = %rating,
            "formula estimate"
        );

        Ok(KpiResult {
            strategy: EstimatorStrategy::Formula,
            reference_speed_kn: round_to(speed, SPEED_DECIMALS),
            fuel_consumption_t_per_day: round_to(fuel, FUEL_DECIMALS),
            compliance_rating: rating,
            resistance_kn: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive() {
        let c = FormulaCoefficients::default();
        assert_eq!(c.rate(48.0), ComplianceRating::B);
        assert_eq!(c.rate(48.01), ComplianceRating::C);
        assert_eq!(c.rate(42.0), ComplianceRating::B);
        assert_eq!(c.rate(41.99), ComplianceRating::A);
    }

    #[test]
    fn inverted_thresholds_fail_validation() {
        let c = FormulaCoefficients {
            rating_a_below: 50.0,
            ..FormulaCoefficients::default()
        };
        assert!(c.validate().is_err());
    }
}
