//! Public output contract of a naming run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::pipeline::{
    CertaintyLevel, ExecutionLog, PipelineOutcome, PluginId, PluginResult, PluginStatus,
};
use crate::core::predue::{PredueAnalysis, SynthesisStrategy, ZodiacContext};
use crate::core::scoring::NameCandidate;

/// Report returned to API and CLI callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingReport {
    pub request_id: String,
    /// True when at least one candidate was produced
    pub success: bool,
    pub certainty_level: CertaintyLevel,
    pub execution_time_ms: f64,
    /// Per-plugin results in execution order
    pub plugin_results: IndexMap<PluginId, PluginResult>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Ranked best first
    pub candidates: Vec<NameCandidate>,
    pub zodiac_contexts: Vec<ZodiacContext>,
    pub strategy: Option<SynthesisStrategy>,
    pub summary: Option<String>,
    pub predue: Option<PredueAnalysis>,
    pub logs: Vec<ExecutionLog>,
}

impl NamingReport {
    pub fn top(&self) -> Option<&NameCandidate> {
        self.candidates.first()
    }

    /// Ids of plugins that ended with `status`.
    pub fn plugins_with_status(&self, status: PluginStatus) -> Vec<PluginId> {
        self.plugin_results
            .values()
            .filter(|r| r.status == status)
            .map(|r| r.plugin_id)
            .collect()
    }

    pub fn to_json_pretty(&self) -> crate::core::errors::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

impl From<PipelineOutcome> for NamingReport {
    fn from(outcome: PipelineOutcome) -> Self {
        let (candidates, zodiac_contexts, strategy, summary) = match outcome.final_recommendation {
            Some(recommendation) => (
                recommendation.candidates,
                recommendation.zodiac_contexts,
                Some(recommendation.strategy),
                Some(recommendation.summary),
            ),
            None => (Vec::new(), Vec::new(), None, None),
        };

        Self {
            request_id: outcome.request_id,
            success: outcome.success,
            certainty_level: outcome.certainty_level,
            execution_time_ms: outcome.execution_time_ms,
            plugin_results: outcome.results,
            errors: outcome.errors,
            warnings: outcome.warnings,
            candidates,
            zodiac_contexts,
            strategy,
            summary,
            predue: outcome.predue,
            logs: outcome.logs,
        }
    }
}
