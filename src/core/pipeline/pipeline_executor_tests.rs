use super::*;
use crate::core::pipeline::plugin::{Dependency, PluginOutput};
use crate::core::pipeline::request::{BirthInfo, Gender, PoetrySource, Preferences};
use crate::core::pipeline::stages::{CharacterFilterPayload, FilterStage, PoolSource};
use crate::core::predue::{PredueInfo, SynthesisStrategy};
use async_trait::async_trait;

fn executor() -> PipelineExecutor {
    PipelineExecutor::new(QimingConfig::default(), Arc::new(DataStore::builtin()))
}

fn birth(year: i32, month: u32, day: u32, hour: Option<u32>) -> BirthInfo {
    BirthInfo {
        year,
        month,
        day,
        hour,
        minute: hour.map(|_| 0),
    }
}

struct PanickingDestiny;

#[async_trait]
impl NamingPlugin for PanickingDestiny {
    fn id(&self) -> PluginId {
        PluginId::Destiny
    }

    async fn execute(&self, _context: &ExecutionContext) -> Result<PluginOutput, PluginError> {
        panic!("destiny tables corrupted");
    }
}

/// Gender analysis that wrongly waits on a plugin of its own layer.
struct SameLayerGender;

#[async_trait]
impl NamingPlugin for SameLayerGender {
    fn id(&self) -> PluginId {
        PluginId::Gender
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::required(PluginId::Surname)]
    }

    async fn execute(&self, _context: &ExecutionContext) -> Result<PluginOutput, PluginError> {
        Err(PluginError::failed("unreachable"))
    }
}

struct FixedPool(&'static str);

impl CandidateSource for FixedPool {
    fn label(&self) -> String {
        format!("fixed pool {}", self.0)
    }

    fn candidates(&self) -> Vec<char> {
        self.0.chars().collect()
    }
}

fn filter_payload(outcome: &PipelineOutcome) -> &CharacterFilterPayload {
    match &outcome.results[&PluginId::CharacterFilter].payload {
        Some(LayerPayload::CharacterFilter(payload)) => payload,
        other => panic!("unexpected payload {other:?}"),
    }
}

#[tokio::test]
async fn exact_birth_runs_every_layer() {
    let request = NamingRequest::new("吴", Gender::Male).with_birth(birth(2025, 10, 31, Some(10)));
    let outcome = executor().execute(request).await;

    assert!(outcome.success, "errors: {:?}", outcome.errors);
    assert_eq!(outcome.certainty_level, CertaintyLevel::FullyDetermined);
    let ids: Vec<PluginId> = outcome.results.keys().copied().collect();
    assert_eq!(ids, PluginId::ALL.to_vec());
    for result in outcome.results.values() {
        assert_eq!(result.status, PluginStatus::Success, "{}", result.plugin_id);
    }

    let top = outcome.top_candidate().unwrap();
    assert!(top.composite > 0.0 && top.composite < 100.0);
    assert!(top.full_name.starts_with('吴'));
    assert!(outcome.candidates().len() <= QimingConfig::default().pipeline.top_candidates);
    assert!(outcome.predue.is_none());
    assert!(!outcome.request_id.is_empty());
}

#[tokio::test]
async fn missing_birth_information_degrades_to_unknown() {
    let outcome = executor()
        .execute(NamingRequest::new("李", Gender::Female))
        .await;

    assert!(outcome.success);
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(outcome.certainty_level, CertaintyLevel::Unknown);
    assert_eq!(outcome.status_of(PluginId::BirthTime), Some(PluginStatus::Skipped));
    assert_eq!(outcome.status_of(PluginId::Destiny), Some(PluginStatus::Skipped));
    assert_eq!(
        outcome.status_of(PluginId::ComprehensiveScoring),
        Some(PluginStatus::Success)
    );

    let destiny = &outcome.results[&PluginId::Destiny];
    assert!(destiny.error.as_deref().unwrap().contains("birth-time"));
    for result in outcome.results.values().filter(|r| r.layer >= 2) {
        assert!(result.confidence <= 0.4 + 1e-9);
    }
}

#[tokio::test]
async fn failed_surname_aborts_the_pipeline() {
    let outcome = executor()
        .execute(NamingRequest::new("Smith", Gender::Male))
        .await;

    assert!(!outcome.success);
    assert!(outcome.final_recommendation.is_none());
    assert_eq!(outcome.status_of(PluginId::Surname), Some(PluginStatus::Failed));
    assert!(!outcome.errors.is_empty());
    for id in [
        PluginId::Destiny,
        PluginId::SelectionStrategy,
        PluginId::CharacterFilter,
        PluginId::NameCombination,
        PluginId::ComprehensiveScoring,
    ] {
        let result = &outcome.results[&id];
        assert_eq!(result.status, PluginStatus::Skipped);
        assert!(result.error.as_deref().unwrap().contains("aborted"));
    }
}

#[tokio::test]
async fn predue_across_lunar_new_year_scores_both_zodiacs() {
    let request = NamingRequest::new("吴", Gender::Female).with_predue(PredueInfo {
        year: Some(2026),
        month: Some(2),
        day: Some(17),
        week_offset: None,
    });
    let outcome = executor().execute(request).await;

    assert!(outcome.success, "errors: {:?}", outcome.errors);
    assert_eq!(outcome.certainty_level, CertaintyLevel::Estimated);
    assert!(outcome.predue.is_some());

    let recommendation = outcome.final_recommendation.as_ref().unwrap();
    assert_eq!(recommendation.strategy, SynthesisStrategy::EvaluateBoth);
    assert_eq!(recommendation.zodiac_contexts.len(), 2);
    assert!(recommendation.summary.contains("evaluated under"));
    for candidate in &recommendation.candidates {
        assert_eq!(candidate.scenario_scores.len(), 2);
    }
    for result in outcome.results.values().filter(|r| r.layer >= 2) {
        assert!(result.confidence <= 0.6 + 1e-9, "{}", result.plugin_id);
    }
}

#[tokio::test]
async fn panicking_plugin_is_contained() {
    let executor = executor().with_plugin(Arc::new(PanickingDestiny)).unwrap();
    let request = NamingRequest::new("吴", Gender::Male).with_birth(birth(2025, 10, 31, Some(10)));
    let outcome = executor.execute(request).await;

    let destiny = &outcome.results[&PluginId::Destiny];
    assert_eq!(destiny.status, PluginStatus::Failed);
    assert!(destiny.error.as_deref().unwrap().contains("panicked"));
    assert!(outcome.success);
    assert_eq!(
        outcome.status_of(PluginId::SelectionStrategy),
        Some(PluginStatus::Success)
    );
    assert_eq!(executor.plugin_ids().len(), 8);
}

#[tokio::test]
async fn excluded_and_required_characters_are_honoured() {
    let request = NamingRequest::new("吴", Gender::Male)
        .with_birth(birth(2025, 10, 31, Some(10)))
        .with_preferences(Preferences {
            excluded_characters: vec!['嘉', '德'],
            required_characters: vec!['安'],
            ..Preferences::default()
        });
    let outcome = executor().execute(request).await;

    assert!(outcome.success, "errors: {:?}", outcome.errors);
    for candidate in outcome.candidates() {
        assert!(!candidate.given_name.contains('嘉'));
        assert!(!candidate.given_name.contains('德'));
        assert!(candidate.given_name.contains('安'), "{}", candidate.full_name);
    }
}

#[tokio::test]
async fn poetry_source_restricts_the_pool() {
    let poetry = PoetrySource {
        title: "山居秋暝".to_string(),
        characters: "明月松间照清泉石上流".chars().collect(),
    };
    let request = NamingRequest::new("李", Gender::Male).with_preferences(Preferences {
        poetry_source: Some(poetry),
        ..Preferences::default()
    });
    let outcome = executor().execute(request).await;

    assert!(outcome.success, "errors: {:?}", outcome.errors);
    let filter = match &outcome.results[&PluginId::CharacterFilter].payload {
        Some(LayerPayload::CharacterFilter(payload)) => payload,
        other => panic!("unexpected payload {other:?}"),
    };
    assert!(matches!(filter.source, PoolSource::Poetry { .. }));

    let allowed: Vec<char> = "明月松间照清泉石上流".chars().collect();
    for candidate in outcome.candidates() {
        assert!(candidate.given_name.chars().all(|ch| allowed.contains(&ch)));
        assert_eq!(candidate.poetry_source.as_deref(), Some("山居秋暝"));
    }
}

#[tokio::test]
async fn unresolvable_candidates_never_reach_the_pools() {
    let executor = executor().with_candidate_source(Arc::new(FixedPool("嘉德龘文安明林")));
    let request = NamingRequest::new("吴", Gender::Male).with_birth(birth(2025, 10, 31, Some(10)));
    let outcome = executor.execute(request).await;

    assert!(outcome.success, "errors: {:?}", outcome.errors);
    assert!(outcome.errors.iter().all(|e| !e.contains('龘')));

    let filter = filter_payload(&outcome);
    assert_eq!(filter.source, PoolSource::DataStore);
    assert_eq!(filter.unresolved, vec!['龘']);
    let resolution = filter
        .stages
        .iter()
        .find(|s| s.stage == FilterStage::Resolution)
        .unwrap();
    assert_eq!(resolution.removed, vec!['龘']);
    assert_eq!(resolution.before, 7);
    assert_eq!(resolution.after, 6);
    for pool in &filter.pools {
        assert!(pool.iter().all(|r| r.character != '龘'));
    }
    for candidate in outcome.candidates() {
        assert!(!candidate.given_name.contains('龘'));
    }
}

#[tokio::test]
async fn unusable_poetry_falls_back_to_the_data_store() {
    let request = NamingRequest::new("李", Gender::Female).with_preferences(Preferences {
        poetry_source: Some(PoetrySource {
            title: "无字".to_string(),
            characters: "龘靐齉".chars().collect(),
        }),
        ..Preferences::default()
    });
    let outcome = executor().execute(request).await;

    assert!(outcome.success, "errors: {:?}", outcome.errors);
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.contains("poetry: 无字") && w.contains("falling back to data store")));
    assert_eq!(filter_payload(&outcome).source, PoolSource::DataStore);
    for candidate in outcome.candidates() {
        assert!(candidate.poetry_source.is_none());
    }
}

#[tokio::test]
async fn emptied_pool_is_a_warning_not_an_error() {
    let executor = executor().with_candidate_source(Arc::new(FixedPool("龘靐齉")));
    let outcome = executor
        .execute(NamingRequest::new("吴", Gender::Male))
        .await;

    assert!(!outcome.success);
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(
        outcome.status_of(PluginId::CharacterFilter),
        Some(PluginStatus::Skipped)
    );
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.contains("character-filter") && w.contains("no usable candidate")));
    assert_eq!(
        outcome.status_of(PluginId::NameCombination),
        Some(PluginStatus::Skipped)
    );
}

#[test]
fn same_layer_dependency_is_rejected() {
    let err = executor().with_plugin(Arc::new(SameLayerGender)).err().unwrap();
    assert!(matches!(
        err,
        QimingError::Pipeline { ref plugin, .. } if plugin == "gender"
    ));
    assert!(err.to_string().contains("layer 1"));
}
