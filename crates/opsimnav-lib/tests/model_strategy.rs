mod common;

use std::fs;

use common::{fixtures_dir, scenario};
use opsimnav_lib::{
    extract_hull_extents, ComplianceRating, Error, Estimator, EstimatorStrategy, KpiEstimator,
    LinearResistanceModel, ModelEstimator, ModelSettings, OpsimnavConfig, ResistanceFeatures,
    ResistanceModel, ScenarioParams,
};

fn fixture_model() -> LinearResistanceModel {
    LinearResistanceModel::from_path(&fixtures_dir().join("resistance_model.json"))
        .expect("fixture model loads")
}

fn kcs_hull_params() -> ScenarioParams {
    let extents = extract_hull_extents(&fixtures_dir().join("kcs_box.stl")).expect("fixture hull");
    ScenarioParams::new("KCS", 1.5, 10.0, 75.0, 0.0).with_extents(&extents)
}

#[test]
fn derives_fuel_and_rating_from_resistance() {
    let estimator = ModelEstimator::new(Box::new(fixture_model()), ModelSettings::default());
    let input = scenario(&kcs_hull_params().with_speed(14.0).with_wave_angle(90.0));

    let kpis = estimator.estimate(&input).expect("estimate");

    // -2000 + 20*230 + 50*32.2 + 200*10.8 + 300*14 + 800*1.5 - 5*90 = 11320 kN
    assert_eq!(kpis.strategy, EstimatorStrategy::Model);
    assert_eq!(kpis.resistance_kn, Some(11320.0));
    assert_eq!(kpis.reference_speed_kn, 14.0);
    // 0.00025 * 11320 * 14 = 39.62 t/day, score 80.38
    assert_eq!(kpis.fuel_consumption_t_per_day, 39.6);
    assert_eq!(kpis.compliance_rating, ComplianceRating::B);
}

#[test]
fn falls_back_to_class_design_speed_and_can_grade_d() {
    let estimator = ModelEstimator::new(Box::new(fixture_model()), ModelSettings::default());
    let input = scenario(&kcs_hull_params());

    let kpis = estimator.estimate(&input).expect("estimate");

    // KCS design speed 24 kn: resistance 14320 kN, fuel 85.92 t/day, score 34.08
    assert_eq!(kpis.reference_speed_kn, 24.0);
    assert_eq!(kpis.resistance_kn, Some(14320.0));
    assert_eq!(kpis.fuel_consumption_t_per_day, 85.9);
    assert_eq!(kpis.compliance_rating, ComplianceRating::D);
}

#[test]
fn missing_hull_dimensions_name_the_field() {
    let estimator = ModelEstimator::new(Box::new(fixture_model()), ModelSettings::default());
    let input = scenario(&ScenarioParams::new("Tanker", 1.0, 5.0, 80.0, 0.0));

    let err = estimator.estimate(&input).expect_err("hull required");
    assert_eq!(err.scenario_field(), Some("hull_length_m"));
}

#[derive(Debug)]
struct ConstantModel(f64);

impl ResistanceModel for ConstantModel {
    fn predict(&self, _features: &ResistanceFeatures) -> opsimnav_lib::Result<f64> {
        Ok(self.0)
    }
}

#[test]
fn any_resistance_model_can_be_plugged_in() {
    let input = scenario(&kcs_hull_params().with_speed(10.0));

    // 0.00025 * 4000 * 10 = 10 t/day, score 110
    let kpis = ModelEstimator::new(Box::new(ConstantModel(4000.0)), ModelSettings::default())
        .estimate(&input)
        .unwrap();
    assert_eq!(kpis.fuel_consumption_t_per_day, 10.0);
    assert_eq!(kpis.compliance_rating, ComplianceRating::A);

    let err = ModelEstimator::new(Box::new(ConstantModel(f64::NAN)), ModelSettings::default())
        .estimate(&input)
        .expect_err("non-finite output");
    assert!(matches!(err, Error::ModelEvaluation { .. }));
}

#[test]
fn estimator_is_selected_by_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::copy(
        fixtures_dir().join("resistance_model.json"),
        dir.path().join("model.json"),
    )
    .unwrap();
    fs::write(
        &config_path,
        r#"{ "strategy": "model", "model": { "artifact": "model.json" } }"#,
    )
    .unwrap();

    let config = OpsimnavConfig::from_path(&config_path).unwrap();
    let estimator = Estimator::from_config(&config).unwrap();
    assert_eq!(estimator.strategy(), EstimatorStrategy::Model);

    let input = scenario(&kcs_hull_params().with_speed(14.0));
    assert_eq!(
        estimator.estimate(&input).unwrap().compliance_rating,
        ComplianceRating::B
    );

    let formula = Estimator::from_config(&OpsimnavConfig::default()).unwrap();
    assert_eq!(formula.strategy(), EstimatorStrategy::Formula);
}

#[test]
fn malformed_artifact_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    fs::write(&path, r#"{ "intercept": 1.0, "weights": [1.0, 2.0] }"#).unwrap();

    let err = LinearResistanceModel::from_path(&path).expect_err("wrong arity");
    match err {
        Error::ModelLoad { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}
