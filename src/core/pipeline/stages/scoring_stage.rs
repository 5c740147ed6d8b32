//! Layer 6: full six-dimension scoring of the combined names.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::pipeline::context::ExecutionContext;
use crate::core::pipeline::plugin::{
    Dependency, LayerPayload, NamingPlugin, PluginError, PluginId, PluginOutput,
};
use crate::core::predue::{SynthesisStrategy, ZodiacContext};
use crate::core::scoring::{NameCandidate, ScoringInput};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringPayload {
    /// Ranked best first
    pub candidates: Vec<NameCandidate>,
    pub zodiac_contexts: Vec<ZodiacContext>,
    pub strategy: SynthesisStrategy,
}

pub struct ComprehensiveScoringPlugin;

impl ComprehensiveScoringPlugin {
    fn strategy(context: &ExecutionContext) -> SynthesisStrategy {
        if let Some(predue) = context.predue() {
            if context.request().birth_info.is_none() {
                return predue.strategy;
            }
        }
        match context.zodiac_contexts().len() {
            0 => SynthesisStrategy::Conservative,
            1 => SynthesisStrategy::SingleContext,
            _ => SynthesisStrategy::EvaluateBoth,
        }
    }
}

#[async_trait]
impl NamingPlugin for ComprehensiveScoringPlugin {
    fn id(&self) -> PluginId {
        PluginId::ComprehensiveScoring
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::required(PluginId::Surname),
            Dependency::required(PluginId::Gender),
            Dependency::required(PluginId::NameCombination),
            Dependency::optional(PluginId::BirthTime),
            Dependency::optional(PluginId::SelectionStrategy),
        ]
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<PluginOutput, PluginError> {
        let surname = context
            .surname()
            .ok_or_else(|| PluginError::skipped("surname unavailable"))?;
        let combination = context
            .combination()
            .ok_or_else(|| PluginError::skipped("no combined names"))?;

        let weights = context
            .strategy()
            .filter(|s| s.constrained)
            .map(|s| s.weights.as_slice());
        let contexts = context.zodiac_contexts();
        let poetry_title = context
            .character_filter()
            .and_then(|f| f.source.poetry_title());
        let gender = context.request().gender;

        let inputs: Vec<ScoringInput<'_>> = combination
            .drafts
            .iter()
            .map(|draft| ScoringInput {
                surname: &surname.records,
                given: draft.given.clone(),
                gender,
                element_weights: weights,
                zodiac_contexts: contexts,
                poetry_title,
            })
            .collect();

        let mut candidates = context.services().scoring.score_all(&inputs);
        candidates.truncate(context.config().pipeline.top_candidates);
        if candidates.is_empty() {
            return Err(PluginError::failed("scoring produced no candidates"));
        }

        let mut warnings = Vec::new();
        if weights.is_none() {
            warnings.push("Element balance scored without destiny constraint".to_string());
        }
        if contexts.is_empty() {
            warnings.push("Zodiac fit scored neutral: zodiac unknown".to_string());
        }

        let confidence =
            candidates.iter().map(|c| c.confidence).sum::<f64>() / candidates.len() as f64;
        if let Some(top) = candidates.first() {
            info!(
                top = %top.full_name,
                composite = top.composite,
                grade = %top.grade,
                "names scored"
            );
        }

        let payload = ScoringPayload {
            candidates,
            zodiac_contexts: contexts.to_vec(),
            strategy: Self::strategy(context),
        };
        Ok(PluginOutput::new(LayerPayload::Scoring(payload), confidence).with_warnings(warnings))
    }
}
