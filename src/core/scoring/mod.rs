//! Six-dimension name scoring.
//!
//! This module provides:
//! - Dimension scoring (grid numerology, element balance, phonetics, meaning,
//!   cultural depth, zodiac fit)
//! - The weighted composite and letter grade
//! - Parallel scoring of candidate batches

pub mod dimensions;

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::calendar::Zodiac;
use crate::core::config::{DimensionWeights, GradeThresholds, ScoringConfig};
use crate::core::data::CharacterRecord;
use crate::core::numerology::GridAnalysis;
use crate::core::pipeline::request::Gender;
use crate::core::predue::ZodiacContext;

pub use dimensions::{Assessed, ElementWeights};

/// Letter grade of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn from_score(score: f64, thresholds: &GradeThresholds) -> Self {
        if score >= thresholds.a_plus {
            Grade::APlus
        } else if score >= thresholds.a {
            Grade::A
        } else if score >= thresholds.b {
            Grade::B
        } else if score >= thresholds.c {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    /// Short verdict used in rationale text.
    pub fn verdict(self) -> &'static str {
        match self {
            Grade::APlus => "excellent",
            Grade::A => "very good",
            Grade::B => "good",
            Grade::C => "acceptable",
            Grade::D => "weak",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores of the six dimensions, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScores {
    pub grid: f64,
    pub element_balance: f64,
    pub phonetic: f64,
    pub meaning: f64,
    pub cultural: f64,
    pub zodiac: f64,
}

impl DimensionScores {
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.grid,
            self.element_balance,
            self.phonetic,
            self.meaning,
            self.cultural,
            self.zodiac,
        ]
    }

    /// Σ(dimension × weight).
    pub fn composite(&self, weights: &DimensionWeights) -> f64 {
        self.as_array()
            .iter()
            .zip(weights.as_array())
            .map(|(score, weight)| score * weight)
            .sum()
    }
}

/// Composite of a candidate under one zodiac scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioScore {
    pub zodiac: Zodiac,
    pub probability: f64,
    pub zodiac_fit: f64,
    pub composite: f64,
    pub grade: Grade,
}

/// A fully scored name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameCandidate {
    pub full_name: String,
    pub surname: String,
    pub given_name: String,
    /// Records of the given-name characters in order
    pub characters: Vec<Arc<CharacterRecord>>,
    pub scores: DimensionScores,
    pub composite: f64,
    pub grade: Grade,
    pub rationale: String,
    pub grids: Option<GridAnalysis>,
    /// One entry per zodiac context when the birth year is ambiguous
    pub scenario_scores: Vec<ScenarioScore>,
    /// Weakest data confidence among the name's characters
    pub confidence: f64,
    /// Title of the poetry source the characters came from
    pub poetry_source: Option<String>,
}

/// Everything the engine needs to score one name.
#[derive(Debug, Clone)]
pub struct ScoringInput<'a> {
    pub surname: &'a [Arc<CharacterRecord>],
    pub given: Vec<Arc<CharacterRecord>>,
    pub gender: Gender,
    /// Per-position element weights; `None` when destiny gave no constraint
    pub element_weights: Option<&'a [ElementWeights]>,
    pub zodiac_contexts: &'a [ZodiacContext],
    pub poetry_title: Option<&'a str>,
}

/// Computes dimension scores, composites and grades.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a single name. Pure: the same input always yields the same result.
    pub fn score(&self, input: &ScoringInput<'_>) -> NameCandidate {
        let neutral = self.config.neutral_score;
        let surname: Vec<&CharacterRecord> = input.surname.iter().map(|r| r.as_ref()).collect();
        let given: Vec<&CharacterRecord> = input.given.iter().map(|r| r.as_ref()).collect();

        let mut rationale: Vec<String> = Vec::new();

        let (grids, grid_score) = match dimensions::grid(&surname, &given) {
            Some((analysis, assessed)) => {
                rationale.extend(assessed.notes);
                (Some(analysis), assessed.score)
            }
            None => {
                rationale.push("stroke counts incomplete; grid numerology neutral".to_string());
                (None, neutral)
            }
        };

        let balance =
            dimensions::element_balance(&surname, &given, input.element_weights, neutral);
        rationale.extend(balance.notes);

        let phonetic = match dimensions::phonetic(&surname, &given) {
            Some(assessed) => {
                rationale.extend(assessed.notes);
                assessed.score
            }
            None => {
                rationale.push("pronunciation incomplete; phonetics neutral".to_string());
                neutral
            }
        };

        let meaning = dimensions::meaning(&given, input.gender, neutral);
        rationale.extend(meaning.notes);

        let cultural = dimensions::cultural(&given, input.poetry_title);
        rationale.extend(cultural.notes);

        let (zodiac, per_context) = match dimensions::zodiac_fit(&given, input.zodiac_contexts) {
            Some((assessed, per_context)) => {
                rationale.extend(assessed.notes);
                (assessed.score, per_context)
            }
            None => (neutral, Vec::new()),
        };

        let scores = DimensionScores {
            grid: grid_score,
            element_balance: balance.score,
            phonetic,
            meaning: meaning.score,
            cultural: cultural.score,
            zodiac,
        };
        let composite = scores.composite(&self.config.weights);
        let grade = Grade::from_score(composite, &self.config.grades);

        let scenario_scores = if input.zodiac_contexts.len() > 1 {
            input
                .zodiac_contexts
                .iter()
                .zip(per_context)
                .map(|(context, fit)| {
                    let scenario = DimensionScores {
                        zodiac: fit,
                        ..scores
                    };
                    let composite = scenario.composite(&self.config.weights);
                    ScenarioScore {
                        zodiac: context.zodiac,
                        probability: context.probability,
                        zodiac_fit: fit,
                        composite,
                        grade: Grade::from_score(composite, &self.config.grades),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        let confidence = surname
            .iter()
            .chain(given.iter())
            .map(|r| r.confidence)
            .fold(1.0_f64, f64::min);

        let surname_text: String = surname.iter().map(|r| r.character).collect();
        let given_text: String = given.iter().map(|r| r.character).collect();
        rationale.insert(0, format!("{} overall ({:.1})", grade.verdict(), composite));

        NameCandidate {
            full_name: format!("{surname_text}{given_text}"),
            surname: surname_text,
            given_name: given_text,
            characters: input.given.clone(),
            scores,
            composite,
            grade,
            rationale: rationale.join("; "),
            grids,
            scenario_scores,
            confidence,
            poetry_source: input.poetry_title.map(str::to_string),
        }
    }

    /// Score a batch in parallel, ranked by composite (ties by name).
    pub fn score_all(&self, inputs: &[ScoringInput<'_>]) -> Vec<NameCandidate> {
        let mut candidates: Vec<NameCandidate> =
            inputs.par_iter().map(|input| self.score(input)).collect();
        rank(&mut candidates);
        candidates
    }
}

/// Sort candidates best first.
pub fn rank(candidates: &mut [NameCandidate]) {
    candidates.sort_by(|a, b| {
        b.composite
            .partial_cmp(&a.composite)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });
}
