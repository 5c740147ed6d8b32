//! End-to-end naming runs through the public engine API.

use qiming_rs::core::pipeline::{PluginId, PluginStatus};
use qiming_rs::core::predue::SynthesisStrategy;
use qiming_rs::{
    BirthInfo, CertaintyLevel, Gender, NamingEngine, NamingRequest, PredueInfo, QimingConfig,
};

fn engine() -> NamingEngine {
    NamingEngine::new(QimingConfig::default()).unwrap()
}

fn exact_birth() -> BirthInfo {
    BirthInfo {
        year: 2025,
        month: 10,
        day: 31,
        hour: Some(10),
        minute: Some(0),
    }
}

#[tokio::test]
async fn exact_birth_report_is_complete() {
    let report = engine()
        .recommend(NamingRequest::new("吴", Gender::Male).with_birth(exact_birth()))
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.certainty_level, CertaintyLevel::FullyDetermined);
    assert_eq!(report.strategy, Some(SynthesisStrategy::SingleContext));
    assert_eq!(report.zodiac_contexts.len(), 1);
    assert!(report.plugins_with_status(PluginStatus::Failed).is_empty());

    let top = report.top().unwrap();
    assert_eq!(top.surname, "吴");
    assert_eq!(top.given_name.chars().count(), 2);
    assert!(top.grids.is_some());
    assert!(!top.rationale.is_empty());

    // Logs cover the run start and every plugin.
    assert!(report.logs.len() >= 9);
}

#[tokio::test]
async fn report_serializes_with_camel_case_contract() {
    let report = engine()
        .recommend(NamingRequest::new("李", Gender::Female).with_birth(exact_birth()))
        .await
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    for key in [
        "requestId",
        "success",
        "certaintyLevel",
        "executionTimeMs",
        "pluginResults",
        "candidates",
        "warnings",
        "errors",
        "logs",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    let scoring = &json["pluginResults"]["comprehensive-scoring"];
    assert_eq!(scoring["status"], "success");
    assert_eq!(scoring["payload"]["kind"], "scoring");
}

#[tokio::test]
async fn birth_information_wins_over_predue() {
    let request = NamingRequest::new("吴", Gender::Male)
        .with_birth(exact_birth())
        .with_predue(PredueInfo {
            year: Some(2026),
            month: Some(2),
            day: Some(17),
            week_offset: None,
        });
    let report = engine().recommend(request).await.unwrap();

    assert_eq!(report.certainty_level, CertaintyLevel::FullyDetermined);
    assert!(report.predue.is_none());
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("predue estimate ignored")));
}

#[tokio::test]
async fn date_only_birth_is_partially_determined() {
    let birth = BirthInfo {
        hour: None,
        minute: None,
        ..exact_birth()
    };
    let report = engine()
        .recommend(NamingRequest::new("杨", Gender::Female).with_birth(birth))
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.certainty_level, CertaintyLevel::PartiallyDetermined);
    for result in report.plugin_results.values().filter(|r| r.layer >= 2) {
        assert!(result.confidence <= 0.85 + 1e-9);
    }
    // 杨 and 阳 sound alike, so 阳 never follows the surname.
    for candidate in &report.candidates {
        assert!(!candidate.given_name.starts_with('阳'));
    }
}

#[tokio::test]
async fn compound_surname_single_character_names() {
    let mut request = NamingRequest::new("欧阳", Gender::Male).with_birth(exact_birth());
    request.preferences.given_name_length = Some(1);
    let report = engine().recommend(request).await.unwrap();

    assert!(report.success);
    for candidate in &report.candidates {
        assert_eq!(candidate.surname, "欧阳");
        assert_eq!(candidate.given_name.chars().count(), 1);
        assert_eq!(candidate.full_name.chars().count(), 3);
    }
}

#[tokio::test]
async fn tiny_budget_still_returns_a_report() {
    let mut config = QimingConfig::default();
    config.pipeline.timeout_ms = 1;
    let engine = NamingEngine::new(config).unwrap();

    let report = engine
        .recommend(NamingRequest::new("吴", Gender::Male).with_birth(exact_birth()))
        .await
        .unwrap();
    assert_eq!(report.plugin_results.len(), 8);
    assert_eq!(
        report.plugin_results[&PluginId::Surname].status,
        PluginStatus::Success
    );
}
