//! Layer 5: cross-product of the position pools with a cheap pre-ranking.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::data::CharacterRecord;
use crate::core::numerology::link_score;
use crate::core::phonetics::tone_pattern_score;
use crate::core::pipeline::context::ExecutionContext;
use crate::core::pipeline::plugin::{
    Dependency, LayerPayload, NamingPlugin, PluginError, PluginId, PluginOutput,
};
use crate::core::scoring::ElementWeights;

/// Pairs examined between deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 64;

/// A given name awaiting full scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameDraft {
    pub given_name: String,
    pub given: Vec<Arc<CharacterRecord>>,
    /// Tone pattern, element harmony and strategy weight in [0, 1]
    pub pre_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameCombinationPayload {
    /// Best first
    pub drafts: Vec<NameDraft>,
    /// Distinct names generated before truncation
    pub total_combinations: usize,
    pub truncated: bool,
    pub given_name_length: usize,
}

/// Pre-score: 40% tone pattern, 40% element harmony, 20% strategy weight.
pub fn pre_score(
    surname: &[Arc<CharacterRecord>],
    given: &[Arc<CharacterRecord>],
    weights: Option<&[ElementWeights]>,
) -> f64 {
    let tones: Option<Vec<u8>> = surname.iter().chain(given).map(|r| r.tone).collect();
    let tone = tones.map_or(0.5, |tones| tone_pattern_score(&tones));

    let chain: Vec<_> = surname
        .last()
        .into_iter()
        .chain(given)
        .filter_map(|r| r.element)
        .collect();
    let harmony = if chain.len() >= 2 {
        chain.windows(2).map(|w| link_score(w[0], w[1])).sum::<f64>()
            / (100.0 * (chain.len() - 1) as f64)
    } else {
        0.5
    };

    let weight = match weights {
        Some(weights) if !given.is_empty() => {
            given
                .iter()
                .enumerate()
                .map(|(position, record)| {
                    let w = match (weights.get(position), record.element) {
                        (Some(weights), Some(element)) => weights.get(element),
                        _ => 1.0,
                    };
                    (w - 0.5).clamp(0.0, 1.0)
                })
                .sum::<f64>()
                / given.len() as f64
        }
        _ => 0.5,
    };

    0.4 * tone + 0.4 * harmony + 0.2 * weight
}

/// Result of combining the pools.
#[derive(Debug, Default)]
pub struct Combined {
    pub drafts: Vec<NameDraft>,
    /// Names repeating one character, used only when nothing else survives
    pub repeats: Vec<NameDraft>,
    pub stopped_early: bool,
}

/// Generate distinct drafts from the pools. `should_stop` is polled
/// periodically; when it fires, drafts built so far are kept.
pub fn combine(
    pools: &[Vec<Arc<CharacterRecord>>],
    surname: &[Arc<CharacterRecord>],
    weights: Option<&[ElementWeights]>,
    should_stop: impl Fn() -> bool,
) -> Combined {
    let mut combined = Combined::default();
    let mut seen: HashSet<String> = HashSet::new();

    let mut consider = |given: Vec<Arc<CharacterRecord>>, combined: &mut Combined| {
        let given_name: String = given.iter().map(|r| r.character).collect();
        if !seen.insert(given_name.clone()) {
            return;
        }
        let repeated = given
            .windows(2)
            .any(|pair| pair[0].character == pair[1].character);
        let draft = NameDraft {
            pre_score: pre_score(surname, &given, weights),
            given_name,
            given,
        };
        if repeated {
            combined.repeats.push(draft);
        } else {
            combined.drafts.push(draft);
        }
    };

    match pools {
        [first] => {
            for record in first {
                consider(vec![Arc::clone(record)], &mut combined);
            }
        }
        [first, second] => {
            let mut examined = 0usize;
            'outer: for a in first {
                for b in second {
                    examined += 1;
                    if examined % DEADLINE_CHECK_INTERVAL == 0 && should_stop() {
                        combined.stopped_early = true;
                        break 'outer;
                    }
                    consider(vec![Arc::clone(a), Arc::clone(b)], &mut combined);
                }
            }
        }
        _ => {}
    }

    combined
}

fn rank_drafts(drafts: &mut [NameDraft]) {
    drafts.sort_by(|a, b| {
        b.pre_score
            .total_cmp(&a.pre_score)
            .then_with(|| a.given_name.cmp(&b.given_name))
    });
}

pub struct NameCombinationPlugin;

#[async_trait]
impl NamingPlugin for NameCombinationPlugin {
    fn id(&self) -> PluginId {
        PluginId::NameCombination
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::required(PluginId::Surname),
            Dependency::required(PluginId::CharacterFilter),
            Dependency::optional(PluginId::SelectionStrategy),
        ]
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<PluginOutput, PluginError> {
        let surname = context
            .surname()
            .ok_or_else(|| PluginError::skipped("surname unavailable"))?;
        let filter = context
            .character_filter()
            .ok_or_else(|| PluginError::skipped("character pools unavailable"))?;
        let weights = context
            .strategy()
            .filter(|s| s.constrained)
            .map(|s| s.weights.as_slice());
        let mut warnings = Vec::new();

        let combined = combine(&filter.pools, &surname.records, weights, || {
            context.check_deadline().is_err()
        });
        if combined.stopped_early {
            let message = format!(
                "Combination stopped at the time budget after {} names",
                combined.drafts.len() + combined.repeats.len()
            );
            warn!("{}", message);
            warnings.push(message);
        }

        let mut drafts = combined.drafts;
        if drafts.is_empty() && !combined.repeats.is_empty() {
            warnings.push("Only names repeating a character were possible".to_string());
            drafts = combined.repeats;
        }

        let length = filter.pools.len();
        let required: Vec<char> = filter.required.iter().map(|r| r.character).collect();
        if !required.is_empty() && required.len() <= length {
            drafts.retain(|d| required.iter().all(|ch| d.given_name.contains(*ch)));
        } else if required.len() > length {
            warnings.push(format!(
                "{} required characters cannot fit a {}-character given name",
                required.len(),
                length
            ));
        }

        if drafts.is_empty() {
            return Err(PluginError::failed("no name combinations survived"));
        }

        let total_combinations = drafts.len();
        rank_drafts(&mut drafts);
        let max = context.config().combination.max_candidates;
        let truncated = combined.stopped_early || drafts.len() > max;
        drafts.truncate(max);
        debug!(total_combinations, kept = drafts.len(), "names combined");

        let confidence = context
            .result(PluginId::CharacterFilter)
            .map_or(0.5, |r| r.confidence);
        let payload = NameCombinationPayload {
            drafts,
            total_combinations,
            truncated,
            given_name_length: length,
        };
        Ok(
            PluginOutput::new(LayerPayload::NameCombination(payload), confidence)
                .with_warnings(warnings),
        )
    }
}
