//! Result types produced by a pipeline run.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::context::ExecutionLog;
use super::plugin::{PluginId, PluginResult, PluginStatus};
use super::request::CertaintyLevel;
use crate::core::predue::{PredueAnalysis, SynthesisStrategy, ZodiacContext};
use crate::core::scoring::NameCandidate;

/// Ranked names with the zodiac scenarios they were scored under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalRecommendation {
    /// Best first
    pub candidates: Vec<NameCandidate>,
    pub zodiac_contexts: Vec<ZodiacContext>,
    pub strategy: SynthesisStrategy,
    /// One-line human-readable summary
    pub summary: String,
}

/// Complete outcome of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutcome {
    /// Unique identifier for this run
    pub request_id: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// True when at least one name candidate was produced
    pub success: bool,
    pub certainty_level: CertaintyLevel,
    /// Wall-clock time of the whole run in milliseconds
    pub execution_time_ms: f64,
    /// Per-plugin results in execution order
    pub results: IndexMap<PluginId, PluginResult>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub logs: Vec<ExecutionLog>,
    pub final_recommendation: Option<FinalRecommendation>,
    /// Boundary analysis for predue requests
    pub predue: Option<PredueAnalysis>,
}

impl PipelineOutcome {
    /// Ranked candidates, empty when none were produced.
    pub fn candidates(&self) -> &[NameCandidate] {
        self.final_recommendation
            .as_ref()
            .map_or(&[], |r| r.candidates.as_slice())
    }

    pub fn top_candidate(&self) -> Option<&NameCandidate> {
        self.candidates().first()
    }

    pub fn status_of(&self, id: PluginId) -> Option<PluginStatus> {
        self.results.get(&id).map(|r| r.status)
    }

    /// Sum of per-plugin durations in milliseconds.
    pub fn plugin_time_ms(&self) -> f64 {
        self.results.values().map(|r| r.duration_ms).sum()
    }
}
