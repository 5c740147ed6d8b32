//! Per-request execution state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::plugin::{LayerPayload, PluginError, PluginId, PluginResult};
use super::request::{CertaintyLevel, NamingRequest};
use super::services::PipelineServices;
use super::stages::{
    BirthTimePayload, CharacterFilterPayload, DestinyPayload, GenderPayload,
    NameCombinationPayload, SelectionStrategyPayload, SurnamePayload,
};
use crate::core::config::QimingConfig;
use crate::core::data::CharacterResolver;
use crate::core::predue::{PredueAnalysis, ZodiacContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// One structured narration entry of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLog {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub plugin_id: Option<PluginId>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

/// State owned by a single naming request.
///
/// Plugins only read from the context; the executor is the sole writer of
/// results, certainty, logs and warnings.
pub struct ExecutionContext {
    request_id: String,
    request: NamingRequest,
    config: Arc<QimingConfig>,
    services: PipelineServices,
    resolver: CharacterResolver,
    predue: Option<PredueAnalysis>,
    results: IndexMap<PluginId, PluginResult>,
    certainty: CertaintyLevel,
    deadline: Instant,
    logs: Vec<ExecutionLog>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

/// Everything a finished run hands back to the executor.
pub(crate) struct ContextParts {
    pub results: IndexMap<PluginId, PluginResult>,
    pub certainty: CertaintyLevel,
    pub predue: Option<PredueAnalysis>,
    pub logs: Vec<ExecutionLog>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ExecutionContext {
    pub fn new(
        request_id: impl Into<String>,
        request: NamingRequest,
        config: Arc<QimingConfig>,
        services: PipelineServices,
        budget: Duration,
    ) -> Self {
        let resolver = CharacterResolver::new(Arc::clone(&services.store), config.resolver.clone());
        Self {
            request_id: request_id.into(),
            request,
            config,
            services,
            resolver,
            predue: None,
            results: IndexMap::new(),
            certainty: CertaintyLevel::FullyDetermined,
            deadline: Instant::now() + budget,
            logs: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn request(&self) -> &NamingRequest {
        &self.request
    }

    pub fn config(&self) -> &QimingConfig {
        &self.config
    }

    pub fn services(&self) -> &PipelineServices {
        &self.services
    }

    /// Resolver memoizing character lookups for this run.
    pub fn resolver(&self) -> &CharacterResolver {
        &self.resolver
    }

    /// Boundary analysis run ahead of layer 1 for predue requests.
    pub fn predue(&self) -> Option<&PredueAnalysis> {
        self.predue.as_ref()
    }

    pub fn certainty(&self) -> CertaintyLevel {
        self.certainty
    }

    pub fn results(&self) -> &IndexMap<PluginId, PluginResult> {
        &self.results
    }

    pub fn result(&self, id: PluginId) -> Option<&PluginResult> {
        self.results.get(&id)
    }

    /// Payload of a successful result.
    pub fn payload(&self, id: PluginId) -> Option<&LayerPayload> {
        self.results
            .get(&id)
            .filter(|result| result.is_success())
            .and_then(|result| result.payload.as_ref())
    }

    pub fn surname(&self) -> Option<&SurnamePayload> {
        match self.payload(PluginId::Surname) {
            Some(LayerPayload::Surname(payload)) => Some(payload),
            _ => None,
        }
    }

    pub fn gender(&self) -> Option<&GenderPayload> {
        match self.payload(PluginId::Gender) {
            Some(LayerPayload::Gender(payload)) => Some(payload),
            _ => None,
        }
    }

    pub fn birth_time(&self) -> Option<&BirthTimePayload> {
        match self.payload(PluginId::BirthTime) {
            Some(LayerPayload::BirthTime(payload)) => Some(payload),
            _ => None,
        }
    }

    pub fn destiny(&self) -> Option<&DestinyPayload> {
        match self.payload(PluginId::Destiny) {
            Some(LayerPayload::Destiny(payload)) => Some(payload),
            _ => None,
        }
    }

    pub fn strategy(&self) -> Option<&SelectionStrategyPayload> {
        match self.payload(PluginId::SelectionStrategy) {
            Some(LayerPayload::SelectionStrategy(payload)) => Some(payload),
            _ => None,
        }
    }

    pub fn character_filter(&self) -> Option<&CharacterFilterPayload> {
        match self.payload(PluginId::CharacterFilter) {
            Some(LayerPayload::CharacterFilter(payload)) => Some(payload),
            _ => None,
        }
    }

    pub fn combination(&self) -> Option<&NameCombinationPayload> {
        match self.payload(PluginId::NameCombination) {
            Some(LayerPayload::NameCombination(payload)) => Some(payload),
            _ => None,
        }
    }

    /// Zodiac contexts from the birth-time layer; empty means no constraint.
    pub fn zodiac_contexts(&self) -> &[ZodiacContext] {
        self.birth_time()
            .map(|payload| payload.zodiac_contexts.as_slice())
            .unwrap_or(&[])
    }

    /// Given-name length for this request.
    pub fn given_name_length(&self) -> usize {
        self.request
            .given_name_length(self.config.combination.given_name_length)
    }

    pub fn time_remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn deadline_passed(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Cooperative deadline check for long-running loops.
    pub fn check_deadline(&self) -> Result<(), PluginError> {
        if self.deadline_passed() {
            Err(PluginError::failed("pipeline time budget exhausted"))
        } else {
            Ok(())
        }
    }

    pub(crate) fn set_predue(&mut self, analysis: PredueAnalysis) {
        self.predue = Some(analysis);
    }

    /// Lower the certainty level; it never rises again.
    pub(crate) fn lower_certainty(&mut self, level: CertaintyLevel) -> bool {
        if level < self.certainty {
            self.certainty = level;
            true
        } else {
            false
        }
    }

    pub(crate) fn record(&mut self, result: PluginResult) {
        self.results.insert(result.plugin_id, result);
    }

    pub(crate) fn log(
        &mut self,
        level: LogLevel,
        plugin_id: Option<PluginId>,
        message: impl Into<String>,
        payload: Option<serde_json::Value>,
    ) {
        self.logs.push(ExecutionLog {
            timestamp: Utc::now(),
            level,
            plugin_id,
            message: message.into(),
            payload,
        });
    }

    pub(crate) fn warn(&mut self, plugin_id: Option<PluginId>, message: impl Into<String>) {
        let message = message.into();
        self.log(LogLevel::Warn, plugin_id, message.clone(), None);
        self.warnings.push(message);
    }

    pub(crate) fn error(&mut self, plugin_id: Option<PluginId>, message: impl Into<String>) {
        let message = message.into();
        self.log(LogLevel::Error, plugin_id, message.clone(), None);
        self.errors.push(message);
    }

    pub(crate) fn into_parts(self) -> ContextParts {
        ContextParts {
            results: self.results,
            certainty: self.certainty,
            predue: self.predue,
            logs: self.logs,
            warnings: self.warnings,
            errors: self.errors,
        }
    }
}
