//! Common test utilities and fixture helpers.

use std::path::PathBuf;

use opsimnav_lib::{ScenarioInput, ScenarioLimits, ScenarioParams, ShipClassCatalog};

/// Path to fixtures directory used by tests (ship classes, hull mesh, model artifact).
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Validate `params` against the built-in catalog and default limits.
#[allow(dead_code)]
pub fn scenario(params: &ScenarioParams) -> ScenarioInput {
    ScenarioInput::new(
        params,
        &ShipClassCatalog::builtin(),
        &ScenarioLimits::default(),
    )
    .expect("scenario should be valid")
}

/// The KCS example scenario: 3 m waves, 15 kn wind, 75% load, level trim.
#[allow(dead_code)]
pub fn kcs_example() -> ScenarioInput {
    scenario(&ScenarioParams::new("KCS", 3.0, 15.0, 75.0, 0.0))
}
