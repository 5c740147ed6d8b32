//! Main naming engine implementation.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::api::results::NamingReport;
use crate::core::config::QimingConfig;
use crate::core::data::{CharacterRecord, CharacterResolver, DataStore};
use crate::core::errors::{QimingError, Result};
use crate::core::pipeline::{CandidateSource, NamingRequest, PipelineExecutor};
use crate::core::predue::{PredueAnalysis, PredueInfo};

/// Extra time granted beyond the cooperative budget before the run is abandoned.
const HARD_TIMEOUT_GRACE: Duration = Duration::from_millis(2_000);

/// Main qiming naming engine
#[derive(Clone)]
pub struct NamingEngine {
    executor: PipelineExecutor,
}

impl NamingEngine {
    /// Create an engine over the built-in character data.
    pub fn new(config: QimingConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(DataStore::builtin()))
    }

    /// Create an engine over a caller-supplied data store.
    pub fn with_store(config: QimingConfig, store: Arc<DataStore>) -> Result<Self> {
        info!("Initializing qiming naming engine");
        config.validate()?;

        let (primary, strokes, pinyin) = store.table_sizes();
        info!(
            "Character data loaded: {} primary, {} stroke, {} pinyin rows",
            primary, strokes, pinyin
        );

        Ok(Self {
            executor: PipelineExecutor::new(config, store),
        })
    }

    /// Load configuration (YAML) and character data (JSON) from disk. Either
    /// may be omitted to use the defaults.
    pub fn from_files(config: Option<&Path>, data: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => QimingConfig::from_yaml_file(path)?,
            None => QimingConfig::default(),
        };
        let store = match data {
            Some(path) => DataStore::from_json_file(path)?,
            None => DataStore::builtin(),
        };
        Self::with_store(config, Arc::new(store))
    }

    /// Replace the default name-character pool.
    pub fn with_candidate_source(mut self, source: Arc<dyn CandidateSource>) -> Self {
        self.executor = self.executor.with_candidate_source(source);
        self
    }

    /// Run the full pipeline for `request`.
    ///
    /// Plugin failures, including an unusable birth moment, are reported
    /// inside the returned [`NamingReport`]; an `Err` means the run overran
    /// its budget.
    pub async fn recommend(&self, request: NamingRequest) -> Result<NamingReport> {
        let budget_ms = self.config().pipeline.timeout_ms;
        let hard_limit = Duration::from_millis(budget_ms) + HARD_TIMEOUT_GRACE;

        match tokio::time::timeout(hard_limit, self.executor.execute(request)).await {
            Ok(outcome) => {
                let report = NamingReport::from(outcome);
                info!(
                    "Naming completed: {} candidates in {:.2}ms",
                    report.candidates.len(),
                    report.execution_time_ms
                );
                Ok(report)
            }
            Err(_) => {
                warn!("Naming run abandoned after {:?}", hard_limit);
                Err(QimingError::Timeout { budget_ms })
            }
        }
    }

    /// Zodiac-boundary analysis for an estimated due date, without naming.
    pub fn analyze_predue(&self, info: &PredueInfo) -> PredueAnalysis {
        self.executor.services().predue.analyze(info)
    }

    /// Boundary analysis over an explicit date range.
    pub fn analyze_predue_range(&self, start: NaiveDate, end: NaiveDate) -> Result<PredueAnalysis> {
        if end < start {
            return Err(QimingError::validation_field(
                format!("range end {end} is before start {start}"),
                "range",
            ));
        }
        Ok(self.executor.services().predue.analyze_range(start, end))
    }

    /// Resolve characters against the engine's data store.
    pub fn resolve_characters(&self, characters: &str) -> Vec<Arc<CharacterRecord>> {
        let resolver = CharacterResolver::new(
            Arc::clone(&self.executor.services().store),
            self.config().resolver.clone(),
        );
        resolver.resolve_all(characters.chars().filter(|ch| !ch.is_whitespace()))
    }

    pub fn config(&self) -> &QimingConfig {
        self.executor.config()
    }

    pub fn executor(&self) -> &PipelineExecutor {
        &self.executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::{BirthInfo, CertaintyLevel, Gender};

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = QimingConfig::default();
        config.pipeline.top_candidates = 0;
        assert!(NamingEngine::new(config).is_err());
    }

    #[tokio::test]
    async fn impossible_birth_date_degrades_the_report() {
        let engine = NamingEngine::new(QimingConfig::default()).unwrap();
        let request = NamingRequest::new("吴", Gender::Male).with_birth(BirthInfo {
            year: 2025,
            month: 2,
            day: 30,
            hour: None,
            minute: None,
        });
        let report = engine.recommend(request).await.unwrap();
        assert_eq!(report.certainty_level, CertaintyLevel::Unknown);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("birth-time") && e.contains("2025-02-30")));
        assert!(report.success);
        assert!(!report.candidates.is_empty());
    }

    #[tokio::test]
    async fn recommend_returns_ranked_candidates() {
        let engine = NamingEngine::new(QimingConfig::default()).unwrap();
        let report = engine
            .recommend(NamingRequest::new("李", Gender::Female))
            .await
            .unwrap();
        assert!(report.success);
        let composites: Vec<f64> = report.candidates.iter().map(|c| c.composite).collect();
        assert!(composites.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(report.plugin_results.len(), 8);
    }

    #[test]
    fn resolve_skips_whitespace() {
        let engine = NamingEngine::new(QimingConfig::default()).unwrap();
        let records = engine.resolve_characters("林 明");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.is_usable()));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let engine = NamingEngine::new(QimingConfig::default()).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(engine.analyze_predue_range(start, end).is_err());
    }
}
