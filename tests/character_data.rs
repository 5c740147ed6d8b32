//! Character data loading and resolution from JSON snapshots.

use std::fs;
use std::sync::Arc;

use approx::assert_relative_eq;
use tempfile::TempDir;

use qiming_rs::core::calendar::Element;
use qiming_rs::core::data::{DataStore, ResolutionStatus, SourceId};
use qiming_rs::{Gender, NamingEngine, NamingRequest, QimingConfig};

const SNAPSHOT: &str = r#"{
  "primary": [
    {"character": "王", "traditionalStrokes": 4, "modernStrokes": 4, "element": "earth",
     "pinyin": "wang", "tone": 2, "radical": "王", "isStandard": true,
     "meaningScore": 80, "polarity": "positive", "genderAffinity": "neutral"},
    {"character": "明", "traditionalStrokes": 8, "modernStrokes": 8, "element": "fire",
     "pinyin": "ming", "tone": 2, "radical": "日", "isStandard": true,
     "meaningScore": 88, "polarity": "positive", "genderAffinity": "neutral"},
    {"character": "安", "traditionalStrokes": 6, "modernStrokes": 6, "element": "earth",
     "pinyin": "an", "tone": 1, "radical": "宀", "isStandard": true,
     "meaningScore": 88, "polarity": "positive", "genderAffinity": "neutral"}
  ],
  "strokes": [
    {"character": "彬", "traditionalStrokes": 11, "modernStrokes": 11, "radical": "彡"}
  ],
  "pinyin": [
    {"character": "彬", "pinyin": "bin", "tone": 1}
  ],
  "namePool": ["明", "安", "彬"]
}"#;

fn write_snapshot(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("characters.json");
    fs::write(&path, SNAPSHOT).unwrap();
    path
}

#[test]
fn fallback_tables_compose_a_record_with_derived_element() {
    let dir = TempDir::new().unwrap();
    let engine = NamingEngine::from_files(None, Some(&write_snapshot(&dir))).unwrap();

    let records = engine.resolve_characters("彬");
    let record = &records[0];
    assert_eq!(record.status, ResolutionStatus::Composite);
    assert!(record.element_derived);
    assert_eq!(record.element, Some(Element::from_stroke_count(11)));
    assert_eq!(
        record.provenance,
        vec![SourceId::StrokeFallback, SourceId::PinyinFallback]
    );
    // Weakest fallback reliability times four and a half of five required fields.
    assert_relative_eq!(record.confidence, 0.7 * 0.9, epsilon = 1e-9);
    assert!(record.is_usable());
}

#[test]
fn unknown_characters_resolve_to_zero_confidence() {
    let dir = TempDir::new().unwrap();
    let engine = NamingEngine::from_files(None, Some(&write_snapshot(&dir))).unwrap();

    let record = &engine.resolve_characters("龘")[0];
    assert_eq!(record.status, ResolutionStatus::Unresolved);
    assert_eq!(record.confidence, 0.0);
    assert!(!record.is_usable());
}

#[tokio::test]
async fn custom_store_drives_the_name_pool() {
    let dir = TempDir::new().unwrap();
    let store = DataStore::from_json_file(write_snapshot(&dir)).unwrap();
    let engine = NamingEngine::with_store(QimingConfig::default(), Arc::new(store)).unwrap();

    let report = engine
        .recommend(NamingRequest::new("王", Gender::Male))
        .await
        .unwrap();
    assert!(report.success, "errors: {:?}", report.errors);
    for candidate in &report.candidates {
        assert!(candidate
            .given_name
            .chars()
            .all(|ch| "明安彬".contains(ch)));
    }
}

#[tokio::test]
async fn surname_missing_from_data_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let engine = NamingEngine::from_files(None, Some(&write_snapshot(&dir))).unwrap();

    let report = engine
        .recommend(NamingRequest::new("吴", Gender::Male))
        .await
        .unwrap();
    assert!(!report.success);
    assert!(report.candidates.is_empty());
    assert!(!report.errors.is_empty());
}
