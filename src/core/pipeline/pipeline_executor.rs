//! Naming pipeline executor: runs the layer plugins in dependency order.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
use futures::FutureExt;
use serde_json::json;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::context::{ExecutionContext, LogLevel};
use super::pipeline_results::{FinalRecommendation, PipelineOutcome};
use super::plugin::{
    DependencyKind, LayerPayload, NamingPlugin, PluginError, PluginId, PluginResult, PluginStatus,
};
use super::request::{CertaintyLevel, NamingRequest};
use super::services::{CandidateSource, PipelineServices};
use super::stages::{
    BirthTimePlugin, CharacterFilterPlugin, ComprehensiveScoringPlugin, DestinyPlugin,
    GenderPlugin, NameCombinationPlugin, ScoringPayload, SelectionStrategyPlugin, SurnamePlugin,
};
use crate::core::config::QimingConfig;
use crate::core::data::DataStore;
use crate::core::errors::{self, QimingError};

const LAYERS: std::ops::RangeInclusive<u8> = 1..=6;

/// Orchestrates the six naming layers for one request at a time.
///
/// Plugins of the same layer are independent and driven concurrently; the
/// layers themselves run strictly in order. Each request gets its own
/// [`ExecutionContext`]; the data tables and engines in [`PipelineServices`]
/// are shared and immutable.
#[derive(Clone)]
pub struct PipelineExecutor {
    config: Arc<QimingConfig>,
    services: PipelineServices,
    plugins: Vec<Arc<dyn NamingPlugin>>,
}

impl PipelineExecutor {
    /// Create an executor with the standard plugins.
    pub fn new(config: QimingConfig, store: Arc<DataStore>) -> Self {
        let services = PipelineServices::from_config(&config, store);
        Self {
            config: Arc::new(config),
            services,
            plugins: Self::default_plugins(),
        }
    }

    /// The six layers' standard plugins.
    pub fn default_plugins() -> Vec<Arc<dyn NamingPlugin>> {
        vec![
            Arc::new(SurnamePlugin),
            Arc::new(GenderPlugin),
            Arc::new(BirthTimePlugin),
            Arc::new(DestinyPlugin),
            Arc::new(SelectionStrategyPlugin),
            Arc::new(CharacterFilterPlugin),
            Arc::new(NameCombinationPlugin),
            Arc::new(ComprehensiveScoringPlugin),
        ]
    }

    /// Override the default candidate pool (useful for tests or custom corpora).
    pub fn with_candidate_source(mut self, source: Arc<dyn CandidateSource>) -> Self {
        self.services.candidate_source = source;
        self
    }

    /// Register a plugin, replacing any plugin with the same id.
    ///
    /// Every declared dependency must belong to an earlier layer, otherwise
    /// the plugin could never observe its result.
    pub fn with_plugin(mut self, plugin: Arc<dyn NamingPlugin>) -> errors::Result<Self> {
        let id = plugin.id();
        if let Some(dependency) = plugin
            .dependencies()
            .into_iter()
            .find(|dependency| dependency.id.layer() >= id.layer())
        {
            return Err(QimingError::pipeline(
                id.as_str(),
                format!(
                    "dependency '{}' runs in layer {}, which is not before layer {}",
                    dependency.id,
                    dependency.id.layer(),
                    id.layer()
                ),
            ));
        }

        match self.plugins.iter().position(|p| p.id() == id) {
            Some(index) => self.plugins[index] = plugin,
            None => self.plugins.push(plugin),
        }
        Ok(self)
    }

    pub fn config(&self) -> &QimingConfig {
        &self.config
    }

    pub fn services(&self) -> &PipelineServices {
        &self.services
    }

    /// Registered plugin ids in execution order.
    pub fn plugin_ids(&self) -> Vec<PluginId> {
        let mut ids: Vec<PluginId> = self.plugins.iter().map(|p| p.id()).collect();
        ids.sort_by_key(|id| id.layer());
        ids
    }

    /// Run every layer for `request`.
    ///
    /// Never fails: plugin errors are recorded in the outcome, and a failed
    /// required plugin stops the remaining layers while keeping partial results.
    pub async fn execute(&self, request: NamingRequest) -> PipelineOutcome {
        let start_time = Instant::now();
        let started_at = Utc::now();
        let request_id = Uuid::new_v4().to_string();
        let budget = Duration::from_millis(self.config.pipeline.timeout_ms);

        info!(
            "Starting naming pipeline {} for '{}' ({})",
            request_id, request.family_name, request.gender
        );

        let mut context = ExecutionContext::new(
            request_id.clone(),
            request,
            Arc::clone(&self.config),
            self.services.clone(),
            budget,
        );
        let started = json!({
            "familyName": context.request().family_name,
            "gender": context.request().gender,
            "budgetMs": self.config.pipeline.timeout_ms,
        });
        context.log(LogLevel::Info, None, "pipeline started", Some(started));

        self.run_predue_analysis(&mut context);

        let mut aborted: Option<String> = None;
        let mut over_budget_reported = false;

        for layer in LAYERS {
            let plugins: Vec<&Arc<dyn NamingPlugin>> = self
                .plugins
                .iter()
                .filter(|p| p.id().layer() == layer)
                .collect();
            if plugins.is_empty() {
                continue;
            }

            if let Some(reason) = &aborted {
                for plugin in plugins {
                    context.record(PluginResult::skipped(plugin.id(), reason.clone(), 0.0));
                }
                continue;
            }

            if !over_budget_reported && context.deadline_passed() {
                over_budget_reported = true;
                context.warn(
                    None,
                    format!("Time budget exceeded before layer {layer}; continuing with partial results"),
                );
            }

            debug!("Running layer {} with {} plugins", layer, plugins.len());
            let results = join_all(
                plugins
                    .iter()
                    .map(|plugin| Self::run_plugin(&***plugin, &context)),
            )
            .await;

            for (plugin, result) in plugins.iter().zip(results) {
                if let Some(reason) = Self::apply(&mut context, plugin.is_required(), result) {
                    aborted = Some(reason);
                }
            }
        }

        self.finish(context, start_time, started_at)
    }

    /// Boundary analysis runs once, ahead of layer 1, when only a predue
    /// estimate is known.
    fn run_predue_analysis(&self, context: &mut ExecutionContext) {
        let request = context.request();
        if request.birth_info.is_some() {
            return;
        }
        let Some(info) = request.predue_info.clone() else {
            return;
        };

        let analysis = self.services.predue.analyze(&info);
        info!(
            outcome = ?analysis.outcome,
            confidence = analysis.confidence,
            "Predue boundary analysis complete"
        );
        context.log(
            LogLevel::Info,
            None,
            "predue boundary analysis",
            serde_json::to_value(&analysis).ok(),
        );
        context.set_predue(analysis);
    }

    /// Reason to skip `plugin`, if a required dependency did not succeed.
    fn gate(plugin: &dyn NamingPlugin, context: &ExecutionContext) -> Option<String> {
        plugin
            .dependencies()
            .into_iter()
            .filter(|dep| dep.kind == DependencyKind::Required)
            .find_map(|dep| match context.result(dep.id) {
                None => Some(format!("required dependency {} did not run", dep.id)),
                Some(result) if !result.is_success() => Some(format!(
                    "required dependency {} {}: {}",
                    dep.id,
                    status_word(result.status),
                    result.error.as_deref().unwrap_or("no reason given")
                )),
                Some(_) => None,
            })
    }

    /// Run one plugin, converting errors and panics into a recorded result.
    async fn run_plugin(plugin: &dyn NamingPlugin, context: &ExecutionContext) -> PluginResult {
        let id = plugin.id();
        if let Some(reason) = Self::gate(plugin, context) {
            return PluginResult::skipped(id, reason, 0.0);
        }

        let start = Instant::now();
        let outcome = AssertUnwindSafe(plugin.execute(context))
            .catch_unwind()
            .await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(Ok(output)) => PluginResult::success(id, output, elapsed_ms),
            Ok(Err(PluginError::Skipped(reason))) => PluginResult::skipped(id, reason, elapsed_ms),
            Ok(Err(PluginError::Failed(reason))) => PluginResult::failed(id, reason, elapsed_ms),
            Err(panic) => PluginResult::failed(
                id,
                format!("plugin panicked: {}", panic_message(panic.as_ref())),
                elapsed_ms,
            ),
        }
    }

    /// Record a result, updating certainty, logs and warnings. Returns an
    /// abort reason when a required plugin failed.
    fn apply(
        context: &mut ExecutionContext,
        required: bool,
        mut result: PluginResult,
    ) -> Option<String> {
        let id = result.plugin_id;

        if id == PluginId::BirthTime {
            let level = match &result.payload {
                Some(LayerPayload::BirthTime(payload)) if result.is_success() => payload.certainty,
                _ => CertaintyLevel::Unknown,
            };
            if context.lower_certainty(level) {
                context.log(
                    LogLevel::Info,
                    Some(id),
                    format!("certainty lowered to {level}"),
                    None,
                );
            }
        }

        if result.layer >= 2 {
            let ceiling = context.certainty().confidence_ceiling();
            if result.confidence > ceiling {
                debug!(plugin = %id, from = result.confidence, to = ceiling, "confidence clamped");
                result.confidence = ceiling;
            }
        }

        for warning in result.warnings.clone() {
            context.warn(Some(id), warning);
        }

        let mut abort = None;
        match result.status {
            PluginStatus::Success => {
                info!("Plugin {} completed in {:.2}ms", id, result.duration_ms);
                context.log(
                    LogLevel::Info,
                    Some(id),
                    "completed",
                    Some(json!({
                        "confidence": result.confidence,
                        "durationMs": result.duration_ms,
                    })),
                );
            }
            PluginStatus::Skipped => {
                let reason = result.error.clone().unwrap_or_default();
                info!("Plugin {} skipped: {}", id, reason);
                context.warn(Some(id), format!("{id} skipped: {reason}"));
            }
            PluginStatus::Failed => {
                let reason = result.error.clone().unwrap_or_default();
                if required {
                    error!("Required plugin {} failed: {}", id, reason);
                    abort = Some(format!("aborted: required plugin {id} failed"));
                } else {
                    warn!("Plugin {} failed: {}", id, reason);
                }
                context.error(Some(id), format!("{id} failed: {reason}"));
            }
        }

        context.record(result);
        abort
    }

    fn finish(
        &self,
        context: ExecutionContext,
        start_time: Instant,
        started_at: chrono::DateTime<Utc>,
    ) -> PipelineOutcome {
        let request_id = context.request_id().to_string();
        let final_recommendation = match context.payload(PluginId::ComprehensiveScoring) {
            Some(LayerPayload::Scoring(payload)) => Some(recommendation(payload)),
            _ => None,
        };
        let parts = context.into_parts();

        let success = final_recommendation
            .as_ref()
            .is_some_and(|r| !r.candidates.is_empty());
        let execution_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        info!(
            "Naming pipeline {} completed in {:.2}ms (success: {}, certainty: {})",
            request_id, execution_time_ms, success, parts.certainty
        );

        PipelineOutcome {
            request_id,
            started_at,
            success,
            certainty_level: parts.certainty,
            execution_time_ms,
            results: parts.results,
            errors: parts.errors,
            warnings: parts.warnings,
            logs: parts.logs,
            final_recommendation,
            predue: parts.predue,
        }
    }
}

fn recommendation(payload: &ScoringPayload) -> FinalRecommendation {
    let mut summary = match payload.candidates.first() {
        Some(top) => format!(
            "{} candidates; best {} scored {:.1} ({})",
            payload.candidates.len(),
            top.full_name,
            top.composite,
            top.grade
        ),
        None => "no candidates".to_string(),
    };
    if payload.zodiac_contexts.len() > 1 {
        let scenarios: Vec<String> = payload
            .zodiac_contexts
            .iter()
            .map(|c| format!("{} {:.0}%", c.zodiac, c.probability * 100.0))
            .collect();
        summary.push_str(&format!("; evaluated under {}", scenarios.join(" and ")));
    }

    FinalRecommendation {
        candidates: payload.candidates.clone(),
        zodiac_contexts: payload.zodiac_contexts.clone(),
        strategy: payload.strategy,
        summary,
    }
}

fn status_word(status: PluginStatus) -> &'static str {
    match status {
        PluginStatus::Success => "succeeded",
        PluginStatus::Skipped => "was skipped",
        PluginStatus::Failed => "failed",
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "pipeline_executor_tests.rs"]
mod tests;
