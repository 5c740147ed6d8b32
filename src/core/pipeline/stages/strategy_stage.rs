//! Layer 3: turn favoured and avoided elements into per-position weights.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::calendar::Element;
use crate::core::pipeline::context::ExecutionContext;
use crate::core::pipeline::plugin::{
    Dependency, LayerPayload, NamingPlugin, PluginError, PluginId, PluginOutput,
};
use crate::core::scoring::ElementWeights;

/// Weights for favoured elements, most useful first.
const FAVORED_WEIGHTS: [f64; 3] = [1.5, 1.3, 1.15];
/// Weights for avoided elements, most harmful first.
const AVOIDED_WEIGHTS: [f64; 3] = [0.5, 0.7, 0.85];
/// The second given character carries less destiny influence than the first.
const SECOND_POSITION_DAMPING: f64 = 0.7;
const USER_PREFERENCE_BOOST: f64 = 1.2;

/// Per-position element weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStrategyPayload {
    /// One entry per given-name position
    pub weights: Vec<ElementWeights>,
    pub favored: Vec<Element>,
    pub avoided: Vec<Element>,
    /// Whether any weight departs from neutral
    pub constrained: bool,
    pub user_preferred: Vec<Element>,
}

/// Build weights for `positions` given-name characters.
pub fn build_weights(
    favored: &[Element],
    avoided: &[Element],
    user_preferred: &[Element],
    positions: usize,
) -> Vec<ElementWeights> {
    let mut base = ElementWeights::default();
    for (element, weight) in favored.iter().zip(FAVORED_WEIGHTS) {
        base.set(*element, weight);
    }
    for (element, weight) in avoided.iter().zip(AVOIDED_WEIGHTS) {
        base.set(*element, weight);
    }
    for element in user_preferred {
        base.set(*element, base.get(*element) * USER_PREFERENCE_BOOST);
    }

    (0..positions.max(1))
        .map(|position| {
            if position == 0 {
                base
            } else {
                base.damped(SECOND_POSITION_DAMPING)
            }
        })
        .collect()
}

pub struct SelectionStrategyPlugin;

#[async_trait]
impl NamingPlugin for SelectionStrategyPlugin {
    fn id(&self) -> PluginId {
        PluginId::SelectionStrategy
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::optional(PluginId::Destiny)]
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<PluginOutput, PluginError> {
        let user_preferred = context.request().preferences.preferred_elements.clone();
        let positions = context.given_name_length();
        let mut warnings = Vec::new();

        let (favored, avoided, confidence) = match context.destiny() {
            Some(destiny) => {
                let confidence = context
                    .result(PluginId::Destiny)
                    .map_or(0.5, |result| result.confidence);
                (destiny.favorable.clone(), destiny.unfavorable.clone(), confidence)
            }
            None => {
                warnings.push(
                    "No destiny analysis; element selection is unconstrained by birth time"
                        .to_string(),
                );
                (Vec::new(), Vec::new(), if user_preferred.is_empty() { 0.5 } else { 0.6 })
            }
        };

        let weights = build_weights(&favored, &avoided, &user_preferred, positions);
        let payload = SelectionStrategyPayload {
            constrained: weights.iter().any(ElementWeights::is_constrained),
            weights,
            favored,
            avoided,
            user_preferred,
        };
        Ok(
            PluginOutput::new(LayerPayload::SelectionStrategy(payload), confidence)
                .with_warnings(warnings),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_position_outweighs_second() {
        let weights = build_weights(
            &[Element::Metal, Element::Water],
            &[Element::Earth, Element::Fire, Element::Wood],
            &[],
            2,
        );
        assert_eq!(weights.len(), 2);
        assert_relative_eq!(weights[0].get(Element::Metal), 1.5);
        assert_relative_eq!(weights[0].get(Element::Water), 1.3);
        assert_relative_eq!(weights[0].get(Element::Earth), 0.5);
        assert_relative_eq!(weights[1].get(Element::Metal), 1.35);
        assert_relative_eq!(weights[1].get(Element::Earth), 0.65);
        assert!(weights[0].get(Element::Metal) > weights[1].get(Element::Metal));
    }

    #[test]
    fn no_destiny_is_neutral_unless_user_prefers() {
        let neutral = build_weights(&[], &[], &[], 2);
        assert!(neutral.iter().all(|w| !w.is_constrained()));

        let preferred = build_weights(&[], &[], &[Element::Water], 1);
        assert_eq!(preferred.len(), 1);
        assert_relative_eq!(preferred[0].get(Element::Water), 1.2);
        assert!(preferred[0].is_constrained());
    }

    #[test]
    fn user_preference_boosts_destiny_weight() {
        let weights = build_weights(&[Element::Fire], &[], &[Element::Fire], 1);
        assert_relative_eq!(weights[0].get(Element::Fire), 1.8);
    }
}
