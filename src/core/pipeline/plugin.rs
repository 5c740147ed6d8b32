//! Plugin contract shared by every pipeline layer.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::context::ExecutionContext;
use super::stages::{
    BirthTimePayload, CharacterFilterPayload, DestinyPayload, GenderPayload,
    NameCombinationPayload, ScoringPayload, SelectionStrategyPayload, SurnamePayload,
};

/// Identifier of a pipeline plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginId {
    Surname,
    Gender,
    BirthTime,
    Destiny,
    SelectionStrategy,
    CharacterFilter,
    NameCombination,
    ComprehensiveScoring,
}

impl PluginId {
    pub const ALL: [PluginId; 8] = [
        PluginId::Surname,
        PluginId::Gender,
        PluginId::BirthTime,
        PluginId::Destiny,
        PluginId::SelectionStrategy,
        PluginId::CharacterFilter,
        PluginId::NameCombination,
        PluginId::ComprehensiveScoring,
    ];

    /// Layer (1-6) the plugin belongs to.
    pub const fn layer(self) -> u8 {
        match self {
            PluginId::Surname | PluginId::Gender | PluginId::BirthTime => 1,
            PluginId::Destiny => 2,
            PluginId::SelectionStrategy => 3,
            PluginId::CharacterFilter => 4,
            PluginId::NameCombination => 5,
            PluginId::ComprehensiveScoring => 6,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PluginId::Surname => "surname",
            PluginId::Gender => "gender",
            PluginId::BirthTime => "birth-time",
            PluginId::Destiny => "destiny",
            PluginId::SelectionStrategy => "selection-strategy",
            PluginId::CharacterFilter => "character-filter",
            PluginId::NameCombination => "name-combination",
            PluginId::ComprehensiveScoring => "comprehensive-scoring",
        }
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a dependency must have succeeded for the dependent to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Dependent is skipped unless this result succeeded
    Required,
    /// Dependent runs in degraded mode without it
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub id: PluginId,
    pub kind: DependencyKind,
}

impl Dependency {
    pub const fn required(id: PluginId) -> Self {
        Self {
            id,
            kind: DependencyKind::Required,
        }
    }

    pub const fn optional(id: PluginId) -> Self {
        Self {
            id,
            kind: DependencyKind::Optional,
        }
    }
}

/// Why a plugin produced no payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PluginError {
    /// Plugin hit an error
    #[error("failed: {0}")]
    Failed(String),

    /// Plugin had nothing to do; consumers treat the dimension as unconstrained
    #[error("skipped: {0}")]
    Skipped(String),
}

impl PluginError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }
}

/// Typed payload of each layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case")]
pub enum LayerPayload {
    Surname(SurnamePayload),
    Gender(GenderPayload),
    BirthTime(BirthTimePayload),
    Destiny(DestinyPayload),
    SelectionStrategy(SelectionStrategyPayload),
    CharacterFilter(CharacterFilterPayload),
    NameCombination(NameCombinationPayload),
    Scoring(ScoringPayload),
}

/// Successful plugin output before the executor stamps timing and status.
#[derive(Debug, Clone)]
pub struct PluginOutput {
    pub payload: LayerPayload,
    pub confidence: f64,
    pub warnings: Vec<String>,
}

impl PluginOutput {
    pub fn new(payload: LayerPayload, confidence: f64) -> Self {
        Self {
            payload,
            confidence,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginStatus {
    Success,
    Skipped,
    Failed,
}

/// Recorded outcome of one plugin invocation. Never mutated after recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginResult {
    pub plugin_id: PluginId,
    pub layer: u8,
    pub status: PluginStatus,
    pub success: bool,
    pub payload: Option<LayerPayload>,
    pub confidence: f64,
    pub duration_ms: f64,
    /// Failure or skip reason
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

impl PluginResult {
    pub fn success(id: PluginId, output: PluginOutput, duration_ms: f64) -> Self {
        Self {
            plugin_id: id,
            layer: id.layer(),
            status: PluginStatus::Success,
            success: true,
            payload: Some(output.payload),
            confidence: output.confidence.clamp(0.0, 1.0),
            duration_ms,
            error: None,
            warnings: output.warnings,
        }
    }

    pub fn skipped(id: PluginId, reason: impl Into<String>, duration_ms: f64) -> Self {
        Self::without_payload(id, PluginStatus::Skipped, reason.into(), duration_ms)
    }

    pub fn failed(id: PluginId, reason: impl Into<String>, duration_ms: f64) -> Self {
        Self::without_payload(id, PluginStatus::Failed, reason.into(), duration_ms)
    }

    fn without_payload(id: PluginId, status: PluginStatus, reason: String, duration_ms: f64) -> Self {
        Self {
            plugin_id: id,
            layer: id.layer(),
            status,
            success: false,
            payload: None,
            confidence: 0.0,
            duration_ms,
            error: Some(reason),
            warnings: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PluginStatus::Success
    }
}

/// One analysis unit of the naming pipeline.
///
/// Plugins read the request, shared services and earlier results from the
/// context and return their own payload; the executor records it under the
/// plugin's id. They must not mutate anything else.
#[async_trait]
pub trait NamingPlugin: Send + Sync {
    fn id(&self) -> PluginId;

    /// Earlier plugins whose results this plugin reads.
    fn dependencies(&self) -> Vec<Dependency> {
        Vec::new()
    }

    /// A failure of a required plugin aborts the pipeline.
    fn is_required(&self) -> bool {
        false
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<PluginOutput, PluginError>;
}
