//! Scoring configuration types.
//!
//! Dimension weights, grade thresholds and the neutral score used when a
//! dimension has nothing to judge.

use serde::{Deserialize, Serialize};

use super::validation::{validate_score_range, validate_weights_sum};
use crate::core::errors::{QimingError, Result};

/// Scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of each scoring dimension in the composite
    #[serde(default)]
    pub weights: DimensionWeights,

    /// Composite thresholds for letter grades
    #[serde(default)]
    pub grades: GradeThresholds,

    /// Score given to a dimension that has no constraint to apply
    #[serde(default = "ScoringConfig::default_neutral_score")]
    pub neutral_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: DimensionWeights::default(),
            grades: GradeThresholds::default(),
            neutral_score: Self::default_neutral_score(),
        }
    }
}

impl ScoringConfig {
    const fn default_neutral_score() -> f64 {
        75.0
    }

    /// Validate scoring configuration
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.grades.validate()?;
        validate_score_range(self.neutral_score, "scoring.neutral_score")?;
        Ok(())
    }
}

/// Dimension weights; they must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionWeights {
    /// Five-grid / three-talents numerology
    pub grid: f64,
    /// Five-element balance against the destiny analysis
    pub element_balance: f64,
    /// Tone pattern and sound harmony
    pub phonetic: f64,
    /// Character meaning
    pub meaning: f64,
    /// Classical and cultural depth
    pub cultural: f64,
    /// Zodiac suitability
    pub zodiac: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            grid: 0.25,
            element_balance: 0.25,
            phonetic: 0.15,
            meaning: 0.15,
            cultural: 0.12,
            zodiac: 0.08,
        }
    }
}

impl DimensionWeights {
    /// Weights in dimension order.
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

    /// Validate weights configuration
    pub fn validate(&self) -> Result<()> {
        let names = [
            "grid",
            "element_balance",
            "phonetic",
            "meaning",
            "cultural",
            "zodiac",
        ];
        for (name, weight) in names.iter().zip(self.as_array()) {
            if !(0.0..=1.0).contains(&weight) {
                return Err(QimingError::validation_field(
                    format!(
                        "Weight for '{}' must be between 0.0 and 1.0, got {}",
                        name, weight
                    ),
                    format!("scoring.weights.{name}"),
                ));
            }
        }
        validate_weights_sum(&self.as_array(), 1e-6, "scoring.weights")
    }
}

/// Minimum composite score for each letter grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    pub a_plus: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            a_plus: 90.0,
            a: 80.0,
            b: 70.0,
            c: 60.0,
        }
    }
}

impl GradeThresholds {
    /// Thresholds must be on the score scale and strictly descending.
    pub fn validate(&self) -> Result<()> {
        let ordered = [self.a_plus, self.a, self.b, self.c];
        for value in ordered {
            validate_score_range(value, "scoring.grades")?;
        }
        if ordered.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(QimingError::validation_field(
                "grade thresholds must be strictly descending (a_plus > a > b > c)",
                "scoring.grades",
            ));
        }
        Ok(())
    }
}
