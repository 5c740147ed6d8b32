use super::*;
use crate::core::errors::QimingError;
use tempfile::TempDir;

fn expect_validation_error<T: std::fmt::Debug>(result: Result<T>) -> QimingError {
    result.expect_err("expected validation failure")
}

#[test]
fn default_configs_validate_successfully() {
    QimingConfig::default().validate().expect("qiming default");
    PipelineConfig::default().validate().expect("pipeline default");
    ResolverConfig::default().validate().expect("resolver default");
    PredueConfig::default().validate().expect("predue default");
    FilteringConfig::default()
        .validate()
        .expect("filtering default");
    CombinationConfig::default()
        .validate()
        .expect("combination default");
    ScoringConfig::default().validate().expect("scoring default");
}

#[test]
fn default_weights_match_documented_split() {
    let weights = DimensionWeights::default();
    assert_eq!(weights.as_array(), [0.25, 0.25, 0.15, 0.15, 0.12, 0.08]);
}

#[test]
fn scoring_weights_must_sum_to_one() {
    let mut config = ScoringConfig::default();
    config.weights.zodiac = 0.2;
    let err = expect_validation_error(config.validate());
    assert!(format!("{err}").contains("scoring.weights"), "{err}");
}

#[test]
fn grade_thresholds_must_descend() {
    let mut config = ScoringConfig::default();
    config.grades.b = 85.0;
    let err = expect_validation_error(config.validate());
    assert!(format!("{err}").contains("descending"), "{err}");
}

#[test]
fn resolver_fallback_ceiling_stays_below_primary_floor() {
    let mut config = ResolverConfig::default();
    config.fallback_ceiling = 0.95;
    let err = expect_validation_error(config.validate());
    assert!(matches!(err, QimingError::Validation { .. }));
}

#[test]
fn predue_materiality_threshold_bounds() {
    let mut config = PredueConfig::default();
    config.materiality_threshold = 0.5;
    let err = expect_validation_error(config.validate());
    assert!(format!("{err}").contains("materiality_threshold"), "{err}");
}

#[test]
fn combination_rejects_three_character_given_names() {
    let mut config = CombinationConfig::default();
    config.given_name_length = 3;
    let err = expect_validation_error(config.validate());
    assert!(format!("{err}").contains("given_name_length"), "{err}");

    config.given_name_length = 2;
    config.max_candidates = 0;
    let err = expect_validation_error(config.validate());
    assert!(format!("{err}").contains("max_candidates"), "{err}");
}

#[test]
fn yaml_round_trip_preserves_settings() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("qiming.yml");

    let mut config = QimingConfig::default();
    config.predue.boundary_model = ZodiacBoundaryModel::GregorianNewYear;
    config.pipeline.top_candidates = 5;
    config.to_yaml_file(&path).expect("write config");

    let loaded = QimingConfig::from_yaml_file(&path).expect("read config");
    assert_eq!(loaded, config);
}

#[test]
fn partial_yaml_fills_defaults() {
    let yaml = "predue:\n  boundary_model: gregorian_new_year\n";
    let config: QimingConfig = serde_yaml::from_str(yaml).expect("parse partial config");
    assert_eq!(
        config.predue.boundary_model,
        ZodiacBoundaryModel::GregorianNewYear
    );
    assert_eq!(config.predue.default_week_offset, 2);
    assert_eq!(config.pipeline.timeout_ms, 15_000);
    assert_eq!(config.filtering.max_given_strokes, 25);
}

#[test]
fn missing_config_file_is_io_error() {
    let err = QimingConfig::from_yaml_file("/nonexistent/qiming.yml").unwrap_err();
    assert!(matches!(err, QimingError::Io { .. }));
}
