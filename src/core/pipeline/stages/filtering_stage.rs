//! Layer 4: narrow the candidate pool through ordered filter stages.
//!
//! Stages run in a fixed order: element match, zodiac suitability, meaning
//! polarity, stroke numerology and phonetic tone. Tonal checks assume that
//! negative characters were already removed by the semantic stages. A stage
//! that would empty a pool is relaxed: its input survives and a warning is
//! reported.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::config::FilteringConfig;
use crate::core::data::{CharacterRecord, Polarity};
use crate::core::numerology::{fortune, person_grid, Fortune};
use crate::core::pipeline::context::ExecutionContext;
use crate::core::pipeline::plugin::{
    Dependency, LayerPayload, NamingPlugin, PluginError, PluginId, PluginOutput,
};
use crate::core::pipeline::request::Gender;
use crate::core::pipeline::services::{CandidateSource, PoetrySet};
use crate::core::predue::ZodiacContext;
use crate::core::scoring::ElementWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterStage {
    Resolution,
    ElementMatch,
    ZodiacSuitability,
    MeaningPolarity,
    StrokeNumerology,
    PhoneticTone,
}

impl FilterStage {
    /// Per-position stages in execution order.
    pub const ORDERED: [FilterStage; 5] = [
        FilterStage::ElementMatch,
        FilterStage::ZodiacSuitability,
        FilterStage::MeaningPolarity,
        FilterStage::StrokeNumerology,
        FilterStage::PhoneticTone,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FilterStage::Resolution => "resolution",
            FilterStage::ElementMatch => "element-match",
            FilterStage::ZodiacSuitability => "zodiac-suitability",
            FilterStage::MeaningPolarity => "meaning-polarity",
            FilterStage::StrokeNumerology => "stroke-numerology",
            FilterStage::PhoneticTone => "phonetic-tone",
        }
    }
}

/// What one stage did to one pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReport {
    pub stage: FilterStage,
    /// Given-name position, `None` for pool-wide stages
    pub position: Option<usize>,
    pub before: usize,
    pub after: usize,
    pub removed: Vec<char>,
    pub relaxed: bool,
}

/// Where the candidate characters came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PoolSource {
    DataStore,
    Poetry { title: String },
}

impl PoolSource {
    pub fn poetry_title(&self) -> Option<&str> {
        match self {
            PoolSource::Poetry { title } => Some(title),
            PoolSource::DataStore => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterFilterPayload {
    /// Surviving characters per given-name position, best first
    pub pools: Vec<Vec<Arc<CharacterRecord>>>,
    pub stages: Vec<StageReport>,
    pub source: PoolSource,
    /// Characters no data source knew
    pub unresolved: Vec<char>,
    /// Required characters, placed in every pool without filtering
    pub required: Vec<Arc<CharacterRecord>>,
}

/// Inputs every filter stage judges against.
pub struct FilterRules<'a> {
    pub config: &'a FilteringConfig,
    pub weights: Option<&'a [ElementWeights]>,
    pub contexts: &'a [ZodiacContext],
    pub gender: Gender,
    pub surname: &'a [Arc<CharacterRecord>],
}

impl FilterRules<'_> {
    /// Whether `record` survives `stage` at `position`.
    pub fn keeps(&self, stage: FilterStage, position: usize, record: &CharacterRecord) -> bool {
        match stage {
            FilterStage::Resolution => record.is_usable(),
            FilterStage::ElementMatch => {
                match (self.weights.and_then(|w| w.get(position)), record.element) {
                    (Some(weights), Some(element)) => {
                        weights.get(element) >= self.config.min_element_weight
                    }
                    (Some(_), None) => false,
                    (None, _) => true,
                }
            }
            FilterStage::ZodiacSuitability => {
                self.zodiac_dislike(record) < self.config.zodiac_dislike_threshold
            }
            FilterStage::MeaningPolarity => {
                record.polarity != Polarity::Negative
                    && record.gender_affinity != self.gender.opposite_affinity()
                    && record
                        .meaning_score
                        .map_or(true, |score| score >= self.config.min_meaning_score)
            }
            FilterStage::StrokeNumerology => {
                let strokes = record.strokes();
                if strokes > self.config.max_given_strokes {
                    return false;
                }
                let surname_last = self.surname.last().map_or(0, |r| r.strokes());
                position != 0
                    || surname_last == 0
                    || fortune(person_grid(surname_last, strokes)) != Fortune::Poor
            }
            FilterStage::PhoneticTone => {
                if self.surname.iter().any(|s| s.sounds_like(record)) {
                    return false;
                }
                let surname_tone = self.surname.last().and_then(|r| r.tone);
                !(position == 0 && surname_tone == Some(3) && record.tone == Some(3))
            }
        }
    }

    /// Share of zodiac probability under which the character's radical is shunned.
    fn zodiac_dislike(&self, record: &CharacterRecord) -> f64 {
        let Some(radical) = record.radical.as_deref() else {
            return 0.0;
        };
        let mass: f64 = self.contexts.iter().map(|c| c.probability).sum();
        if mass <= 0.0 {
            return 0.0;
        }
        let disliked: f64 = self
            .contexts
            .iter()
            .filter(|c| c.zodiac.radical_affinity().disliked.contains(&radical))
            .map(|c| c.probability)
            .sum();
        disliked / mass
    }

    /// Run every per-position stage over `pool`.
    pub fn filter_position(
        &self,
        pool: Vec<Arc<CharacterRecord>>,
        position: usize,
        warnings: &mut Vec<String>,
    ) -> (Vec<Arc<CharacterRecord>>, Vec<StageReport>) {
        let mut pool = pool;
        let mut reports = Vec::with_capacity(FilterStage::ORDERED.len());

        for stage in FilterStage::ORDERED {
            let before = pool.len();
            let (kept, removed): (Vec<_>, Vec<_>) = pool
                .iter()
                .cloned()
                .partition(|record| self.keeps(stage, position, record));

            let relaxed = kept.is_empty() && before > 0;
            if relaxed {
                let message = format!(
                    "{} would empty the position {} pool; keeping its {} candidates",
                    stage.as_str(),
                    position + 1,
                    before
                );
                warn!("{}", message);
                warnings.push(message);
            } else {
                pool = kept;
            }

            reports.push(StageReport {
                stage,
                position: Some(position),
                before,
                after: pool.len(),
                removed: if relaxed {
                    Vec::new()
                } else {
                    removed.iter().map(|r| r.character).collect()
                },
                relaxed,
            });
        }

        (pool, reports)
    }

    /// Order a surviving pool best first.
    pub fn rank_pool(&self, pool: &mut [Arc<CharacterRecord>], position: usize) {
        let weight = |record: &CharacterRecord| {
            match (self.weights.and_then(|w| w.get(position)), record.element) {
                (Some(weights), Some(element)) => weights.get(element),
                _ => 1.0,
            }
        };
        pool.sort_by(|a, b| {
            weight(b)
                .total_cmp(&weight(a))
                .then_with(|| {
                    b.meaning_score
                        .unwrap_or(0.0)
                        .total_cmp(&a.meaning_score.unwrap_or(0.0))
                })
                .then_with(|| b.confidence.total_cmp(&a.confidence))
                .then_with(|| a.character.cmp(&b.character))
        });
    }
}

pub struct CharacterFilterPlugin;

impl CharacterFilterPlugin {
    /// Resolve a source's candidates, splitting off excluded and unknown characters.
    fn resolve_source(
        context: &ExecutionContext,
        source: &dyn CandidateSource,
        excluded: &[char],
    ) -> (Vec<Arc<CharacterRecord>>, Vec<char>, usize) {
        let candidates: Vec<char> = source
            .candidates()
            .into_iter()
            .filter(|ch| !excluded.contains(ch))
            .collect();
        let total = candidates.len();
        let records = context.resolver().resolve_all(candidates);
        let unresolved = records
            .iter()
            .filter(|r| r.is_unresolved())
            .map(|r| r.character)
            .collect();
        let usable = records.into_iter().filter(|r| r.is_usable()).collect();
        (usable, unresolved, total)
    }
}

#[async_trait]
impl NamingPlugin for CharacterFilterPlugin {
    fn id(&self) -> PluginId {
        PluginId::CharacterFilter
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::required(PluginId::Surname),
            Dependency::required(PluginId::Gender),
            Dependency::optional(PluginId::BirthTime),
            Dependency::optional(PluginId::SelectionStrategy),
        ]
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<PluginOutput, PluginError> {
        let surname = context
            .surname()
            .ok_or_else(|| PluginError::skipped("surname unavailable"))?;
        let preferences = &context.request().preferences;
        let excluded = &preferences.excluded_characters;
        let mut warnings = Vec::new();

        let default_source = Arc::clone(&context.services().candidate_source);
        let poetry: Option<Arc<dyn CandidateSource>> = preferences
            .poetry_source
            .as_ref()
            .map(|p| Arc::new(PoetrySet::from(p)) as Arc<dyn CandidateSource>);

        let mut source = poetry.unwrap_or_else(|| Arc::clone(&default_source));
        let (mut resolved, mut unresolved, mut total) =
            Self::resolve_source(context, source.as_ref(), excluded);
        if resolved.is_empty() && source.poetry_title().is_some() {
            warnings.push(format!(
                "No usable characters in {}; falling back to {}",
                source.label(),
                default_source.label()
            ));
            source = default_source;
            (resolved, unresolved, total) = Self::resolve_source(context, source.as_ref(), excluded);
        }
        if !unresolved.is_empty() {
            debug!(count = unresolved.len(), "candidate characters unresolved");
        }

        let mut stages = vec![StageReport {
            stage: FilterStage::Resolution,
            position: None,
            before: total,
            after: resolved.len(),
            removed: unresolved.clone(),
            relaxed: false,
        }];

        let mut required = Vec::new();
        for ch in preferences
            .required_characters
            .iter()
            .filter(|ch| !excluded.contains(ch))
        {
            let record = context.resolver().resolve(*ch);
            if record.is_usable() {
                required.push(record);
            } else {
                warnings.push(format!(
                    "Required character '{ch}' lacks stroke or element data and was dropped"
                ));
            }
        }

        let positions = context.given_name_length();
        let weights = context.strategy().map(|s| s.weights.as_slice());
        let rules = FilterRules {
            config: &context.config().filtering,
            weights,
            contexts: context.zodiac_contexts(),
            gender: context.request().gender,
            surname: &surname.records,
        };

        let mut pools = Vec::with_capacity(positions);
        for position in 0..positions {
            let (mut pool, reports) = rules.filter_position(resolved.clone(), position, &mut warnings);
            stages.extend(reports);
            rules.rank_pool(&mut pool, position);
            pool.retain(|r| !required.iter().any(|q| q.character == r.character));
            pool.truncate(context.config().filtering.max_pool_size);
            for record in required.iter().rev() {
                pool.insert(0, Arc::clone(record));
            }
            pools.push(pool);
        }

        if pools.iter().any(Vec::is_empty) {
            warn!(source = %source.label(), "candidate pool empty after resolution");
            return Err(PluginError::skipped(format!(
                "no usable candidate characters from {}",
                source.label()
            )));
        }

        let relaxed = stages.iter().filter(|s| s.relaxed).count();
        let pooled: Vec<&Arc<CharacterRecord>> = pools.iter().flatten().collect();
        let mean_confidence =
            pooled.iter().map(|r| r.confidence).sum::<f64>() / pooled.len() as f64;
        let confidence = mean_confidence * 0.9_f64.powi(relaxed as i32);

        let payload = CharacterFilterPayload {
            pools,
            stages,
            source: match source.poetry_title() {
                Some(title) => PoolSource::Poetry {
                    title: title.to_string(),
                },
                None => PoolSource::DataStore,
            },
            unresolved,
            required,
        };
        Ok(
            PluginOutput::new(LayerPayload::CharacterFilter(payload), confidence)
                .with_warnings(warnings),
        )
    }
}
