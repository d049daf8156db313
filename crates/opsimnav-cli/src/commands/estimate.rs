//! Estimate command handler and the scenario arguments shared with `report`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use opsimnav_lib::{
    extract_hull_extents, Estimator, EstimatorStrategy, KpiEstimator, KpiResult, OpsimnavConfig,
    ScenarioInput, ScenarioParams,
};

use crate::output::{format_estimate_text, EstimateOutput, OutputFormat};

/// Scenario inputs accepted by `estimate` and `report`.
#[derive(Debug, Clone, Args)]
pub struct ScenarioArgs {
    /// Ship class name from the catalog (see `classes`).
    #[arg(long = "class")]
    pub ship_class: String,

    /// Significant wave height in metres.
    #[arg(long = "wave")]
    pub wave_height_m: f64,

    /// Wind speed in knots.
    #[arg(long = "wind")]
    pub wind_speed_kn: f64,

    /// Engine load in percent of MCR.
    #[arg(long = "load")]
    pub engine_load_pct: f64,

    /// Trim angle in degrees; negative values trim by the head.
    #[arg(long = "trim", allow_negative_numbers = true)]
    pub trim_deg: f64,

    /// Read hull length, beam and draft from an STL mesh.
    #[arg(long, conflicts_with_all = ["length", "beam", "draft"])]
    pub stl: Option<PathBuf>,

    /// Hull length in metres.
    #[arg(long, requires_all = ["beam", "draft"])]
    pub length: Option<f64>,

    /// Hull beam in metres.
    #[arg(long, requires_all = ["length", "draft"])]
    pub beam: Option<f64>,

    /// Hull draft in metres.
    #[arg(long, requires_all = ["length", "beam"])]
    pub draft: Option<f64>,

    /// Ship speed in knots; the model strategy otherwise uses the class design speed.
    #[arg(long = "speed")]
    pub speed_kn: Option<f64>,

    /// Wave encounter angle in degrees (0 head seas, 180 following seas).
    #[arg(long = "wave-angle")]
    pub wave_angle_deg: Option<f64>,

    /// Estimation strategy, overriding the configuration.
    #[arg(long)]
    pub strategy: Option<EstimatorStrategy>,

    /// Resistance model artifact (JSON). Selects the model strategy unless
    /// `--strategy` says otherwise.
    #[arg(long)]
    pub model: Option<PathBuf>,
}

impl ScenarioArgs {
    /// Build unvalidated scenario parameters, reading the STL mesh if one was given.
    pub fn to_params(&self) -> Result<ScenarioParams> {
        let mut params = ScenarioParams::new(
            self.ship_class.clone(),
            self.wave_height_m,
            self.wind_speed_kn,
            self.engine_load_pct,
            self.trim_deg,
        );

        if let Some(stl) = &self.stl {
            let extents = extract_hull_extents(stl)
                .with_context(|| format!("failed to extract hull extents from {}", stl.display()))?;
            params = params.with_extents(&extents);
        } else if let (Some(length), Some(beam), Some(draft)) = (self.length, self.beam, self.draft)
        {
            params = params.with_hull(length, beam, draft);
        }

        if let Some(speed) = self.speed_kn {
            params = params.with_speed(speed);
        }
        if let Some(angle) = self.wave_angle_deg {
            params = params.with_wave_angle(angle);
        }
        Ok(params)
    }

    /// Apply the strategy and model overrides to a copy of `config`.
    pub fn effective_config(&self, config: &OpsimnavConfig) -> OpsimnavConfig {
        let mut config = config.clone();
        if let Some(model) = &self.model {
            config.model.artifact = Some(model.clone());
            config.strategy = EstimatorStrategy::Model;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        config
    }

    /// Validate the scenario and run the configured estimator on it.
    pub fn estimate(&self, config: &OpsimnavConfig) -> Result<(ScenarioInput, KpiResult)> {
        let config = self.effective_config(config);
        let catalog = config
            .ship_catalog()
            .context("failed to load the ship class catalog")?;
        let params = self.to_params()?;

        let scenario = ScenarioInput::new(&params, &catalog, &config.limits)?;
        let estimator =
            Estimator::from_config(&config).context("failed to prepare the estimator")?;
        debug!(strategy = %estimator.strategy(), "estimating {}", scenario.ship_class().name);

        let kpis = estimator.estimate(&scenario)?;
        Ok((scenario, kpis))
    }
}

/// Handle the estimate subcommand.
pub fn handle_estimate(
    args: &ScenarioArgs,
    config: &OpsimnavConfig,
    format: OutputFormat,
) -> Result<String> {
    let (scenario, kpis) = args.estimate(config)?;
    format.render(&EstimateOutput { scenario, kpis }, format_estimate_text)
}
