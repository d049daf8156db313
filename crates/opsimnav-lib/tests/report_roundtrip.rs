mod common;

use std::fs;

use common::{fixtures_dir, kcs_example, scenario};
use opsimnav_lib::{
    extract_hull_extents, parse_report, report_lines, ComplianceRating, Error, FormulaEstimator,
    KpiEstimator, LinearResistanceModel, ModelEstimator, ModelSettings, ReportBuilder,
    ReportStore, ScenarioParams, REPORT_FILE_NAME, REPORT_TITLE,
};

#[test]
fn formula_report_reads_back_its_inputs_and_kpis() {
    let input = kcs_example();
    let kpis = FormulaEstimator::default().estimate(&input).unwrap();

    let artifact = ReportBuilder::new().build(&input, &kpis);
    assert!(artifact.bytes().starts_with(b"%PDF-"));
    assert_eq!(artifact.file_name(), REPORT_FILE_NAME);

    let parsed = parse_report(artifact.bytes()).expect("report parses");
    assert_eq!(parsed.title, REPORT_TITLE);
    assert_eq!(parsed.ship_class, "KCS");
    assert_eq!(parsed.reference_speed_kn, 11.9);
    assert_eq!(parsed.fuel_consumption_t_per_day, 66.5);
    assert_eq!(parsed.compliance_rating, ComplianceRating::C);
    assert_eq!(parsed.resistance_kn, None);
    assert!(parsed.matches(&input, &kpis));
}

#[test]
fn model_report_includes_hull_and_resistance() {
    let extents = extract_hull_extents(&fixtures_dir().join("kcs_box.stl")).unwrap();
    let input = scenario(
        &ScenarioParams::new("KCS", 1.5, 10.0, 75.0, 0.0)
            .with_extents(&extents)
            .with_speed(14.0)
            .with_wave_angle(90.0),
    );
    let model =
        LinearResistanceModel::from_path(&fixtures_dir().join("resistance_model.json")).unwrap();
    let kpis = ModelEstimator::new(Box::new(model), ModelSettings::default())
        .estimate(&input)
        .unwrap();

    let artifact = ReportBuilder::new().build(&input, &kpis);
    let parsed = parse_report(artifact.bytes()).unwrap();

    assert_eq!(parsed.hull_beam_m, Some(32.2));
    assert_eq!(parsed.speed_kn, Some(14.0));
    assert_eq!(parsed.resistance_kn, Some(11320.0));
    assert!(parsed.matches(&input, &kpis));
}

#[test]
fn fractional_inputs_survive_the_round_trip() {
    let cases = [
        (1.7, 22.0, 63.4, -1.3),
        (0.35, 7.5, 91.25, 4.75),
        (5.9, 29.9, 50.1, -0.05),
        (2.05, 0.1, 99.99, 1.0 / 3.0),
    ];
    let builder = ReportBuilder::new();
    let formula = FormulaEstimator::default();
    let model =
        LinearResistanceModel::from_path(&fixtures_dir().join("resistance_model.json")).unwrap();
    let model = ModelEstimator::new(Box::new(model), ModelSettings::default());

    for class in ["KCS", "Bulk Carrier", "Tanker"] {
        for (wave, wind, load, trim) in cases {
            let input = scenario(&ScenarioParams::new(class, wave, wind, load, trim));
            let kpis = formula.estimate(&input).unwrap();
            let parsed = parse_report(builder.build(&input, &kpis).bytes()).unwrap();
            assert!(
                parsed.matches(&input, &kpis),
                "{class} {wave}/{wind}/{load}/{trim}: {parsed:?}"
            );

            let input = scenario(
                &ScenarioParams::new(class, wave, wind, load, trim)
                    .with_hull(229.85, 32.25, 10.75)
                    .with_speed(13.7)
                    .with_wave_angle(37.5),
            );
            let kpis = model.estimate(&input).unwrap();
            let parsed = parse_report(builder.build(&input, &kpis).bytes()).unwrap();
            assert!(
                parsed.matches(&input, &kpis),
                "{class} model {wave}/{wind}/{load}/{trim}: {parsed:?}"
            );
        }
    }
}

#[test]
fn text_lines_follow_report_layout() {
    let input = kcs_example();
    let kpis = FormulaEstimator::default().estimate(&input).unwrap();

    let lines = report_lines(&input, &kpis);
    assert_eq!(lines[0], REPORT_TITLE);
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "Ship Type: KCS");
    assert_eq!(lines[3], "Wave Height: 3 m");
    assert!(lines.contains(&"Predicted Vref: 11.90 knots".to_string()));
    assert!(lines.contains(&"Estimated Fuel Consumption: 66.5 tons/day".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some("CII Rating: C"));
}

#[test]
fn store_round_trips_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let store = ReportStore::new(dir.path());
    let input = kcs_example();
    let kpis = FormulaEstimator::default().estimate(&input).unwrap();
    let artifact = ReportBuilder::new().build(&input, &kpis);

    let path = store.save(&artifact).unwrap();
    assert_eq!(path, store.path_for(artifact.id()));
    assert_eq!(fs::read(&path).unwrap(), artifact.bytes());

    let loaded = store.load(artifact.id()).unwrap();
    assert_eq!(loaded, artifact);
}

#[test]
fn identical_requests_never_share_a_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = ReportStore::new(dir.path());
    let input = kcs_example();
    let kpis = FormulaEstimator::default().estimate(&input).unwrap();
    let builder = ReportBuilder::new();

    let first = store.save(&builder.build(&input, &kpis)).unwrap();
    let second = store.save(&builder.build(&input, &kpis)).unwrap();

    assert_ne!(first, second);
    assert!(first.exists() && second.exists());
}

#[test]
fn unwritable_root_is_a_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"file").unwrap();

    let input = kcs_example();
    let kpis = FormulaEstimator::default().estimate(&input).unwrap();
    let err = ReportStore::new(&blocker)
        .save(&ReportBuilder::new().build(&input, &kpis))
        .expect_err("root is a file");
    assert!(matches!(err, Error::ReportWrite { .. }), "{err:?}");
}

#[test]
fn garbage_is_not_a_report() {
    assert!(matches!(
        parse_report(b"definitely not a pdf"),
        Err(Error::ReportParse { .. })
    ));
}
