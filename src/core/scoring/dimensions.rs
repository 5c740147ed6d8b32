//! Individual scoring dimensions.
//!
//! Every function returns a score on a 0-100 scale together with short notes
//! that feed the candidate rationale. `None` means the dimension had nothing
//! to judge and the caller substitutes the neutral score.

use serde::{Deserialize, Serialize};

use crate::core::calendar::Element;
use crate::core::data::{CharacterRecord, GenderAffinity};
use crate::core::numerology::{link_score, GridAnalysis};
use crate::core::phonetics::{self, Syllable};
use crate::core::pipeline::request::Gender;
use crate::core::predue::ZodiacContext;

/// Element weights for one given-name position, indexed like [`Element::ALL`].
/// 1.0 is neutral, above favours and below avoids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementWeights(pub [f64; 5]);

impl Default for ElementWeights {
    fn default() -> Self {
        Self([1.0; 5])
    }
}

impl ElementWeights {
    pub fn get(&self, element: Element) -> f64 {
        self.0[element.index()]
    }

    pub fn set(&mut self, element: Element, weight: f64) {
        self.0[element.index()] = weight;
    }

    /// Scale every weight's distance from neutral by `factor`.
    pub fn damped(&self, factor: f64) -> Self {
        Self(self.0.map(|w| 1.0 + (w - 1.0) * factor))
    }

    /// Whether any weight differs from neutral.
    pub fn is_constrained(&self) -> bool {
        self.0.iter().any(|w| (w - 1.0).abs() > f64::EPSILON)
    }
}

/// A scored dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessed {
    pub score: f64,
    pub notes: Vec<String>,
}

impl Assessed {
    fn new(score: f64, notes: Vec<String>) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            notes,
        }
    }
}

/// Relative importance of given-name positions.
const POSITION_IMPORTANCE: [f64; 2] = [0.6, 0.4];

/// Five-grid numerology; `None` when any stroke count is unknown.
pub fn grid(surname: &[&CharacterRecord], given: &[&CharacterRecord]) -> Option<(GridAnalysis, Assessed)> {
    let surname_strokes: Option<Vec<u32>> = surname.iter().map(|r| r.traditional_strokes).collect();
    let given_strokes: Option<Vec<u32>> = given.iter().map(|r| r.traditional_strokes).collect();
    let analysis = GridAnalysis::analyze(&surname_strokes?, &given_strokes?)?;

    let person = analysis.grids.person;
    let notes = vec![
        format!(
            "person grid {} ({}), total grid {} ({})",
            person,
            analysis.fortunes[1].label(),
            analysis.grids.total,
            analysis.fortunes[4].label()
        ),
        format!("three talents {}", analysis.three_talents.pattern()),
    ];
    let assessed = Assessed::new(analysis.score, notes);
    Some((analysis, assessed))
}

/// Destiny fit from strategy weights blended with the surname-to-given element chain.
pub fn element_balance(
    surname: &[&CharacterRecord],
    given: &[&CharacterRecord],
    weights: Option<&[ElementWeights]>,
    neutral: f64,
) -> Assessed {
    let mut notes = Vec::new();

    let fit = match weights {
        Some(weights) if weights.iter().any(ElementWeights::is_constrained) => {
            let mut total = 0.0;
            let mut importance = 0.0;
            for (position, record) in given.iter().enumerate() {
                let Some(element) = record.element else {
                    continue;
                };
                let weight = weights
                    .get(position)
                    .map_or(1.0, |w| w.get(element));
                let share = POSITION_IMPORTANCE.get(position).copied().unwrap_or(0.3);
                total += weight_to_score(weight) * share;
                importance += share;
                if weight > 1.0 {
                    notes.push(format!("{} brings favourable {}", record.character, element));
                } else if weight < 1.0 {
                    notes.push(format!("{} carries unfavourable {}", record.character, element));
                }
            }
            if importance > 0.0 {
                total / importance
            } else {
                neutral
            }
        }
        _ => {
            notes.push("no destiny constraint on elements".to_string());
            neutral
        }
    };

    let chain: Vec<Element> = surname
        .last()
        .into_iter()
        .chain(given.iter())
        .filter_map(|r| r.element)
        .collect();
    let harmony = if chain.len() >= 2 {
        let links: Vec<f64> = chain.windows(2).map(|w| link_score(w[0], w[1])).collect();
        let rendered: Vec<String> = chain.iter().map(|e| e.as_char().to_string()).collect();
        notes.push(format!("element chain {}", rendered.join("→")));
        links.iter().sum::<f64>() / links.len() as f64
    } else {
        neutral
    };

    Assessed::new(0.7 * fit + 0.3 * harmony, notes)
}

/// Map a strategy weight to a 0-100 fit: 1.5 → 100, 1.0 → 70, 0.5 → 0.
fn weight_to_score(weight: f64) -> f64 {
    if weight >= 1.0 {
        (70.0 + 30.0 * (weight - 1.0) / 0.5).min(100.0)
    } else {
        (70.0 - 70.0 * (1.0 - weight) / 0.5).max(0.0)
    }
}

/// Tone and sound harmony; `None` when any syllable is unknown.
pub fn phonetic(surname: &[&CharacterRecord], given: &[&CharacterRecord]) -> Option<Assessed> {
    let syllables: Option<Vec<Syllable>> = surname
        .iter()
        .chain(given.iter())
        .map(|r| Some(Syllable::new(r.pinyin.clone()?, r.tone?)))
        .collect();
    let syllables = syllables?;
    let tones: Vec<String> = syllables.iter().map(|s| s.tone.to_string()).collect();
    let verdict = phonetics::assess(&syllables, surname.len());
    let mut notes = vec![format!("tones {}", tones.join("-"))];
    notes.extend(verdict.notes);
    Some(Assessed::new(verdict.score, notes))
}

/// Meaning scores plus a bonus for characters suited to the gender.
pub fn meaning(given: &[&CharacterRecord], gender: Gender, neutral: f64) -> Assessed {
    let mut notes = Vec::new();
    if given.is_empty() {
        return Assessed::new(neutral, notes);
    }

    let base = given
        .iter()
        .map(|r| r.meaning_score.unwrap_or(neutral))
        .sum::<f64>()
        / given.len() as f64;

    let mut bonus = 0.0;
    for record in given {
        match (record.gender_affinity, gender) {
            (GenderAffinity::Masculine, Gender::Male) | (GenderAffinity::Feminine, Gender::Female) => {
                bonus += 5.0;
            }
            (GenderAffinity::Masculine, Gender::Female) | (GenderAffinity::Feminine, Gender::Male) => {
                bonus -= 10.0;
                notes.push(format!("{} leans towards the other gender", record.character));
            }
            _ => {}
        }
    }
    bonus /= given.len() as f64;
    if bonus > 0.0 {
        notes.push(format!("suits a {} name", gender));
    }
    Assessed::new(base + bonus, notes)
}

/// Classical citations, poetry provenance and standardness.
pub fn cultural(given: &[&CharacterRecord], poetry_title: Option<&str>) -> Assessed {
    let mut notes = Vec::new();
    let mut score = 60.0;

    for record in given {
        if let Some(source) = &record.classical_source {
            score += 15.0;
            notes.push(format!("{} appears in {}", record.character, source));
        }
        if !record.is_standard {
            score -= 10.0;
            notes.push(format!("{} is not a standard character", record.character));
        }
    }
    if let Some(title) = poetry_title {
        score += 10.0;
        notes.push(format!("drawn from {title}"));
    }
    Assessed::new(score, notes)
}

/// Zodiac fit of the given characters under one zodiac.
pub fn zodiac_fit_single(given: &[&CharacterRecord], zodiac: crate::core::calendar::Zodiac) -> f64 {
    if given.is_empty() {
        return 70.0;
    }
    let affinity = zodiac.radical_affinity();
    given
        .iter()
        .map(|record| match record.radical.as_deref() {
            Some(radical) if affinity.liked.contains(&radical) => 100.0,
            Some(radical) if affinity.disliked.contains(&radical) => 30.0,
            _ => 70.0,
        })
        .sum::<f64>()
        / given.len() as f64
}

/// Probability-weighted zodiac fit; `None` without zodiac contexts.
pub fn zodiac_fit(given: &[&CharacterRecord], contexts: &[ZodiacContext]) -> Option<(Assessed, Vec<f64>)> {
    if contexts.is_empty() {
        return None;
    }
    let per_context: Vec<f64> = contexts
        .iter()
        .map(|context| zodiac_fit_single(given, context.zodiac))
        .collect();
    let mass: f64 = contexts.iter().map(|c| c.probability).sum();
    let score = if mass > 0.0 {
        contexts
            .iter()
            .zip(&per_context)
            .map(|(context, fit)| context.probability * fit)
            .sum::<f64>()
            / mass
    } else {
        per_context.iter().sum::<f64>() / per_context.len() as f64
    };

    let notes = contexts
        .iter()
        .zip(&per_context)
        .map(|(context, fit)| {
            format!(
                "{} ({:.0}%) fit {:.0}",
                context.zodiac,
                context.probability * 100.0,
                fit
            )
        })
        .collect();
    Some((Assessed::new(score, notes), per_context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::Zodiac;
    use crate::core::config::ResolverConfig;
    use crate::core::data::{CharacterResolver, DataStore};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn records(chars: &str) -> Vec<Arc<CharacterRecord>> {
        let resolver = CharacterResolver::new(Arc::new(DataStore::builtin()), ResolverConfig::default());
        resolver.resolve_all(chars.chars())
    }

    fn refs(records: &[Arc<CharacterRecord>]) -> Vec<&CharacterRecord> {
        records.iter().map(|r| r.as_ref()).collect()
    }

    #[test]
    fn weight_mapping_is_monotonic() {
        assert_relative_eq!(weight_to_score(1.5), 100.0);
        assert_relative_eq!(weight_to_score(1.0), 70.0);
        assert_relative_eq!(weight_to_score(0.5), 0.0);
        assert!(weight_to_score(1.15) > weight_to_score(1.0));
        assert!(weight_to_score(0.7) < weight_to_score(1.0));
    }

    #[test]
    fn unconstrained_weights_use_neutral_fit() {
        let surname = records("吴");
        let given = records("德文");
        let assessed = element_balance(&refs(&surname), &refs(&given), None, 75.0);
        assert!(assessed.notes.iter().any(|n| n.contains("no destiny constraint")));
        assert!(assessed.score > 0.0 && assessed.score <= 100.0);
    }

    #[test]
    fn favoured_elements_raise_balance() {
        let surname = records("吴");
        let given = records("泽海");
        let mut favour_water = ElementWeights::default();
        favour_water.set(Element::Water, 1.5);
        let mut avoid_water = ElementWeights::default();
        avoid_water.set(Element::Water, 0.5);

        let good = element_balance(&refs(&surname), &refs(&given), Some(&[favour_water, favour_water]), 75.0);
        let bad = element_balance(&refs(&surname), &refs(&given), Some(&[avoid_water, avoid_water]), 75.0);
        assert!(good.score > bad.score);
    }

    #[test]
    fn unknown_pinyin_makes_phonetics_unscored() {
        let surname = records("吴");
        let given = records("犇");
        assert!(phonetic(&refs(&surname), &refs(&given)).is_none());
    }

    #[test]
    fn gender_affinity_adjusts_meaning() {
        let given = records("浩");
        let male = meaning(&refs(&given), Gender::Male, 75.0);
        let female = meaning(&refs(&given), Gender::Female, 75.0);
        assert!(male.score > female.score);
    }

    #[test]
    fn classical_citations_raise_cultural_depth() {
        let cited = records("德文");
        let plain = records("森桐");
        assert!(cultural(&refs(&cited), None).score > cultural(&refs(&plain), None).score);
        assert_relative_eq!(cultural(&refs(&plain), Some("静夜思")).score, 70.0);
    }

    #[test]
    fn zodiac_fit_weights_contexts() {
        // 宇 (宀) is liked by both the snake and the horse.
        let given = records("宇");
        let contexts = [
            ZodiacContext {
                zodiac: Zodiac::Snake,
                probability: 0.6,
            },
            ZodiacContext {
                zodiac: Zodiac::Horse,
                probability: 0.4,
            },
        ];
        let (assessed, per_context) = zodiac_fit(&refs(&given), &contexts).unwrap();
        assert_eq!(per_context, vec![100.0, 100.0]);
        assert_relative_eq!(assessed.score, 100.0);

        let rainy = records("雨");
        let (assessed, per_context) = zodiac_fit(&refs(&rainy), &contexts).unwrap();
        assert_eq!(per_context, vec![70.0, 30.0]);
        assert_relative_eq!(assessed.score, 0.6 * 70.0 + 0.4 * 30.0);
        assert!(zodiac_fit(&refs(&rainy), &[]).is_none());
    }
}
