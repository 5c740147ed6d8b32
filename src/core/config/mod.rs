//! Configuration types and management for qiming-rs.
//!
//! Every tunable threshold of the naming pipeline lives here, grouped by the
//! component that consumes it. The tree loads from and saves to YAML and is
//! validated before an engine is built from it.

pub mod scoring;
pub mod validation;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{QimingError, Result};

pub use scoring::{DimensionWeights, GradeThresholds, ScoringConfig};
pub use validation::{
    validate_bounded_usize, validate_positive_f64, validate_positive_u64,
    validate_positive_usize, validate_score_range, validate_unit_range, validate_weights_sum,
};

/// Main configuration for the qiming naming engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QimingConfig {
    /// Pipeline execution settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Character data resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Predue boundary analysis settings
    #[serde(default)]
    pub predue: PredueConfig,

    /// Character filtering thresholds
    #[serde(default)]
    pub filtering: FilteringConfig,

    /// Name combination limits
    #[serde(default)]
    pub combination: CombinationConfig,

    /// Scoring weights and grades
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for QimingConfig {
    fn default() -> Self {
        Self::new_with_defaults()
    }
}

impl QimingConfig {
    /// Construct a configuration using the canonical default values shared by
    /// the CLI and the public API.
    pub(crate) fn new_with_defaults() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            resolver: ResolverConfig::default(),
            predue: PredueConfig::default(),
            filtering: FilteringConfig::default(),
            combination: CombinationConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            QimingError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            QimingError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        self.resolver.validate()?;
        self.predue.validate()?;
        self.filtering.validate()?;
        self.combination.validate()?;
        self.scoring.validate()?;
        Ok(())
    }
}

/// Pipeline execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Time budget for a whole request in milliseconds
    #[serde(default = "PipelineConfig::default_timeout_ms")]
    pub timeout_ms: u64,

    /// Number of ranked candidates returned in the final recommendation
    #[serde(default = "PipelineConfig::default_top_candidates")]
    pub top_candidates: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeout_ms: Self::default_timeout_ms(),
            top_candidates: Self::default_top_candidates(),
        }
    }
}

impl PipelineConfig {
    const fn default_timeout_ms() -> u64 {
        15_000
    }

    const fn default_top_candidates() -> usize {
        10
    }

    pub fn validate(&self) -> Result<()> {
        validate_positive_u64(self.timeout_ms, "pipeline.timeout_ms")?;
        validate_positive_usize(self.top_candidates, "pipeline.top_candidates")?;
        Ok(())
    }
}

/// Character data resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Lowest confidence of a complete primary-source record
    #[serde(default = "ResolverConfig::default_primary_floor")]
    pub primary_floor: f64,

    /// Reliability of each fallback source; fallback records never exceed it
    #[serde(default = "ResolverConfig::default_fallback_ceiling")]
    pub fallback_ceiling: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            primary_floor: Self::default_primary_floor(),
            fallback_ceiling: Self::default_fallback_ceiling(),
        }
    }
}

impl ResolverConfig {
    const fn default_primary_floor() -> f64 {
        0.9
    }

    const fn default_fallback_ceiling() -> f64 {
        0.7
    }

    pub fn validate(&self) -> Result<()> {
        validate_unit_range(self.primary_floor, "resolver.primary_floor")?;
        validate_unit_range(self.fallback_ceiling, "resolver.fallback_ceiling")?;
        if self.fallback_ceiling >= self.primary_floor {
            return Err(QimingError::validation_field(
                "fallback_ceiling must stay below primary_floor",
                "resolver.fallback_ceiling",
            ));
        }
        Ok(())
    }
}

/// Which date is taken as the zodiac-year crossover in boundary analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacBoundaryModel {
    /// Computed lunar new year of each year
    #[default]
    LunarNewYear,
    /// 1 January, the civil-year model
    GregorianNewYear,
}

/// Predue boundary analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredueConfig {
    /// Week uncertainty used when a request does not give one
    #[serde(default = "PredueConfig::default_week_offset")]
    pub default_week_offset: u32,

    /// Minority probability above which both zodiac scenarios are reported
    #[serde(default = "PredueConfig::default_materiality_threshold")]
    pub materiality_threshold: f64,

    /// Days around the crossover treated as a boundary candidate at the
    /// default week offset; scales with the requested uncertainty
    #[serde(default = "PredueConfig::default_boundary_window_days")]
    pub boundary_window_days: u32,

    /// Confidence reported when no zodiac can be derived
    #[serde(default = "PredueConfig::default_uncertain_confidence")]
    pub uncertain_confidence: f64,

    /// Crossover date model
    #[serde(default)]
    pub boundary_model: ZodiacBoundaryModel,
}

impl Default for PredueConfig {
    fn default() -> Self {
        Self {
            default_week_offset: Self::default_week_offset(),
            materiality_threshold: Self::default_materiality_threshold(),
            boundary_window_days: Self::default_boundary_window_days(),
            uncertain_confidence: Self::default_uncertain_confidence(),
            boundary_model: ZodiacBoundaryModel::default(),
        }
    }
}

impl PredueConfig {
    const fn default_week_offset() -> u32 {
        2
    }

    const fn default_materiality_threshold() -> f64 {
        0.3
    }

    const fn default_boundary_window_days() -> u32 {
        7
    }

    const fn default_uncertain_confidence() -> f64 {
        0.3
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_week_offset > 8 {
            return Err(QimingError::validation_field(
                "default_week_offset must be at most 8 weeks",
                "predue.default_week_offset",
            ));
        }
        if !(0.0..0.5).contains(&self.materiality_threshold) {
            return Err(QimingError::validation_field(
                "materiality_threshold must be in [0.0, 0.5)",
                "predue.materiality_threshold",
            ));
        }
        validate_unit_range(self.uncertain_confidence, "predue.uncertain_confidence")?;
        Ok(())
    }
}

/// Character filtering thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteringConfig {
    /// Characters whose element weight falls below this are dropped
    #[serde(default = "FilteringConfig::default_min_element_weight")]
    pub min_element_weight: f64,

    /// Minimum meaning score (0-100) of a candidate character
    #[serde(default = "FilteringConfig::default_min_meaning_score")]
    pub min_meaning_score: f64,

    /// Maximum traditional stroke count of a given-name character
    #[serde(default = "FilteringConfig::default_max_given_strokes")]
    pub max_given_strokes: u32,

    /// Survivors kept per position after filtering
    #[serde(default = "FilteringConfig::default_max_pool_size")]
    pub max_pool_size: usize,

    /// Probability mass of disliking zodiac contexts at which a character is dropped
    #[serde(default = "FilteringConfig::default_zodiac_dislike_threshold")]
    pub zodiac_dislike_threshold: f64,
}

impl Default for FilteringConfig {
    fn default() -> Self {
        Self {
            min_element_weight: Self::default_min_element_weight(),
            min_meaning_score: Self::default_min_meaning_score(),
            max_given_strokes: Self::default_max_given_strokes(),
            max_pool_size: Self::default_max_pool_size(),
            zodiac_dislike_threshold: Self::default_zodiac_dislike_threshold(),
        }
    }
}

impl FilteringConfig {
    const fn default_min_element_weight() -> f64 {
        0.75
    }

    const fn default_min_meaning_score() -> f64 {
        60.0
    }

    const fn default_max_given_strokes() -> u32 {
        25
    }

    const fn default_max_pool_size() -> usize {
        24
    }

    const fn default_zodiac_dislike_threshold() -> f64 {
        0.5
    }

    pub fn validate(&self) -> Result<()> {
        validate_positive_f64(self.min_element_weight, "filtering.min_element_weight")?;
        validate_score_range(self.min_meaning_score, "filtering.min_meaning_score")?;
        if self.max_given_strokes == 0 {
            return Err(QimingError::validation_field(
                "max_given_strokes must be greater than 0",
                "filtering.max_given_strokes",
            ));
        }
        validate_positive_usize(self.max_pool_size, "filtering.max_pool_size")?;
        validate_unit_range(
            self.zodiac_dislike_threshold,
            "filtering.zodiac_dislike_threshold",
        )?;
        Ok(())
    }
}

/// Name combination limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationConfig {
    /// Drafts kept for full scoring after pre-scoring
    #[serde(default = "CombinationConfig::default_max_candidates")]
    pub max_candidates: usize,

    /// Given-name length used when the request does not choose one
    #[serde(default = "CombinationConfig::default_given_name_length")]
    pub given_name_length: usize,
}

impl Default for CombinationConfig {
    fn default() -> Self {
        Self {
            max_candidates: Self::default_max_candidates(),
            given_name_length: Self::default_given_name_length(),
        }
    }
}

impl CombinationConfig {
    const fn default_max_candidates() -> usize {
        40
    }

    const fn default_given_name_length() -> usize {
        2
    }

    pub fn validate(&self) -> Result<()> {
        validate_positive_usize(self.max_candidates, "combination.max_candidates")?;
        validate_bounded_usize(
            self.given_name_length,
            1,
            2,
            "combination.given_name_length",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
