//! Scenario inputs and their validation.
//!
//! A [`ScenarioInput`] can only be obtained through [`ScenarioInput::new`],
//! which checks every field against the declared [`ScenarioLimits`]. Values
//! outside a range are rejected, never clamped.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::HullExtents;
use crate::ship::{ShipClass, ShipClassCatalog};

/// Wave encounter angle assumed when a scenario does not provide one (beam seas).
pub const DEFAULT_WAVE_ANGLE_DEG: f64 = 90.0;

/// Inclusive numeric range a scenario field must fall within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(&self, field: &str, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(Error::invalid_scenario(
                field,
                format!("must be a finite number, got {value}"),
            ));
        }
        if !self.contains(value) {
            return Err(Error::invalid_scenario(
                field,
                format!(
                    "must be between {} and {}, got {}",
                    self.min, self.max, value
                ),
            ));
        }
        Ok(value)
    }
}

/// Declared input ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioLimits {
    pub wave_height_m: Bounds,
    pub wind_speed_kn: Bounds,
    pub engine_load_pct: Bounds,
    pub trim_deg: Bounds,
    pub speed_kn: Bounds,
    pub wave_angle_deg: Bounds,
}

impl Default for ScenarioLimits {
    fn default() -> Self {
        Self {
            wave_height_m: Bounds::new(0.0, 6.0),
            wind_speed_kn: Bounds::new(0.0, 30.0),
            engine_load_pct: Bounds::new(50.0, 100.0),
            trim_deg: Bounds::new(-2.0, 5.0),
            speed_kn: Bounds::new(5.0, 25.0),
            wave_angle_deg: Bounds::new(0.0, 180.0),
        }
    }
}

impl ScenarioLimits {
    /// Validate that every range is finite and non-empty.
    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("wave_height_m", self.wave_height_m),
            ("wind_speed_kn", self.wind_speed_kn),
            ("engine_load_pct", self.engine_load_pct),
            ("trim_deg", self.trim_deg),
            ("speed_kn", self.speed_kn),
            ("wave_angle_deg", self.wave_angle_deg),
        ];

        for (field, bounds) in ranges {
            if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min > bounds.max {
                return Err(Error::Config {
                    message: format!(
                        "limits.{field} must be a finite range with min <= max, got {}..{}",
                        bounds.min, bounds.max
                    ),
                });
            }
        }

        if self.wave_height_m.min < 0.0 || self.wind_speed_kn.min < 0.0 {
            return Err(Error::Config {
                message: "wave height and wind speed limits must not allow negative values"
                    .to_string(),
            });
        }

        Ok(())
    }
}

/// Unvalidated scenario parameters as collected from a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub ship_class: String,
    pub wave_height_m: f64,
    pub wind_speed_kn: f64,
    pub engine_load_pct: f64,
    pub trim_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hull_length_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hull_beam_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hull_draft_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_kn: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_angle_deg: Option<f64>,
}

impl ScenarioParams {
    pub fn new(
        ship_class: impl Into<String>,
        wave_height_m: f64,
        wind_speed_kn: f64,
        engine_load_pct: f64,
        trim_deg: f64,
    ) -> Self {
        Self {
            ship_class: ship_class.into(),
            wave_height_m,
            wind_speed_kn,
            engine_load_pct,
            trim_deg,
            hull_length_m: None,
            hull_beam_m: None,
            hull_draft_m: None,
            speed_kn: None,
            wave_angle_deg: None,
        }
    }

    /// Fill the hull dimensions from mesh extents, replacing any set by hand.
    pub fn with_extents(mut self, extents: &HullExtents) -> Self {
        self.hull_length_m = Some(extents.length_m);
        self.hull_beam_m = Some(extents.beam_m);
        self.hull_draft_m = Some(extents.draft_m);
        self
    }

    pub fn with_hull(mut self, length_m: f64, beam_m: f64, draft_m: f64) -> Self {
        self.hull_length_m = Some(length_m);
        self.hull_beam_m = Some(beam_m);
        self.hull_draft_m = Some(draft_m);
        self
    }

    pub fn with_speed(mut self, speed_kn: f64) -> Self {
        self.speed_kn = Some(speed_kn);
        self
    }

    pub fn with_wave_angle(mut self, wave_angle_deg: f64) -> Self {
        self.wave_angle_deg = Some(wave_angle_deg);
        self
    }
}

/// A validated, immutable estimation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioInput {
    ship_class: ShipClass,
    wave_height_m: f64,
    wind_speed_kn: f64,
    engine_load_pct: f64,
    trim_deg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    hull_length_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hull_beam_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hull_draft_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed_kn: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wave_angle_deg: Option<f64>,
}

impl ScenarioInput {
    /// Validate `params` against `limits`, resolving the ship class from `catalog`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidScenario`] naming the first offending field, or
    /// [`Error::UnknownShipClass`] when the class is not in the catalog.
    pub fn new(
        params: &ScenarioParams,
        catalog: &ShipClassCatalog,
        limits: &ScenarioLimits,
    ) -> Result<Self> {
        let ship_class = catalog.resolve(&params.ship_class)?.clone();

        let wave_height_m = limits
            .wave_height_m
            .check("wave_height_m", params.wave_height_m)?;
        let wind_speed_kn = limits
            .wind_speed_kn
            .check("wind_speed_kn", params.wind_speed_kn)?;
        let engine_load_pct = limits
            .engine_load_pct
            .check("engine_load_pct", params.engine_load_pct)?;
        let trim_deg = limits.trim_deg.check("trim_deg", params.trim_deg)?;

        let hull_length_m = positive("hull_length_m", params.hull_length_m)?;
        let hull_beam_m = positive("hull_beam_m", params.hull_beam_m)?;
        let hull_draft_m = positive("hull_draft_m", params.hull_draft_m)?;

        let speed_kn = params
            .speed_kn
            .map(|v| limits.speed_kn.check("speed_kn", v))
            .transpose()?;
        let wave_angle_deg = params
            .wave_angle_deg
            .map(|v| limits.wave_angle_deg.check("wave_angle_deg", v))
            .transpose()?;

        Ok(Self {
            ship_class,
            wave_height_m,
            wind_speed_kn,
            engine_load_pct,
            trim_deg,
            hull_length_m,
            hull_beam_m,
            hull_draft_m,
            speed_kn,
            wave_angle_deg,
        })
    }

    pub fn ship_class(&self) -> &ShipClass {
        &self.ship_class
    }

    pub fn wave_height_m(&self) -> f64 {
        self.wave_height_m
    }

    pub fn wind_speed_kn(&self) -> f64 {
        self.wind_speed_kn
    }

    pub fn engine_load_pct(&self) -> f64 {
        self.engine_load_pct
    }

    pub fn trim_deg(&self) -> f64 {
        self.trim_deg
    }

    pub fn hull_length_m(&self) -> Option<f64> {
        self.hull_length_m
    }

    pub fn hull_beam_m(&self) -> Option<f64> {
        self.hull_beam_m
    }

    pub fn hull_draft_m(&self) -> Option<f64> {
        self.hull_draft_m
    }

    pub fn speed_kn(&self) -> Option<f64> {
        self.speed_kn
    }

    pub fn wave_angle_deg(&self) -> Option<f64> {
        self.wave_angle_deg
    }

    /// Wave angle, falling back to [`DEFAULT_WAVE_ANGLE_DEG`].
    pub fn effective_wave_angle_deg(&self) -> f64 {
        self.wave_angle_deg.unwrap_or(DEFAULT_WAVE_ANGLE_DEG)
    }
}

fn positive(field: &str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(Error::invalid_scenario(
            field,
            format!("must be a finite positive number, got {v}"),
        )),
        other => Ok(other),
    }
}
