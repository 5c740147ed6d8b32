//! Naming request model and certainty levels.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::core::calendar::Element;
use crate::core::data::GenderAffinity;
use crate::core::errors::{QimingError, Result};
use crate::core::predue::PredueInfo;

/// Gender the name is chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Character affinity that suits this gender.
    pub fn affinity(self) -> GenderAffinity {
        match self {
            Gender::Male => GenderAffinity::Masculine,
            Gender::Female => GenderAffinity::Feminine,
        }
    }

    /// Character affinity that reads as the other gender.
    pub fn opposite_affinity(self) -> GenderAffinity {
        match self {
            Gender::Male => GenderAffinity::Feminine,
            Gender::Female => GenderAffinity::Masculine,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = QimingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" | "男" => Ok(Gender::Male),
            "female" | "f" | "女" => Ok(Gender::Female),
            other => Err(QimingError::validation_field(
                format!("unknown gender '{other}', expected male or female"),
                "gender",
            )),
        }
    }
}

/// How precisely the birth moment is known, ordered from least to most certain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertaintyLevel {
    Unknown,
    Estimated,
    PartiallyDetermined,
    FullyDetermined,
}

impl CertaintyLevel {
    /// Highest confidence a destiny-dependent layer may report at this level.
    pub const fn confidence_ceiling(self) -> f64 {
        match self {
            CertaintyLevel::FullyDetermined => 1.0,
            CertaintyLevel::PartiallyDetermined => 0.85,
            CertaintyLevel::Estimated => 0.6,
            CertaintyLevel::Unknown => 0.4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CertaintyLevel::FullyDetermined => "FULLY_DETERMINED",
            CertaintyLevel::PartiallyDetermined => "PARTIALLY_DETERMINED",
            CertaintyLevel::Estimated => "ESTIMATED",
            CertaintyLevel::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for CertaintyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact birth moment in China Standard Time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthInfo {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub hour: Option<u32>,
    #[serde(default)]
    pub minute: Option<u32>,
}

impl BirthInfo {
    /// Calendar date, validated together with the clock fields.
    pub fn date(&self) -> Result<NaiveDate> {
        if let Some(hour) = self.hour {
            if hour > 23 {
                return Err(QimingError::validation_field(
                    format!("birth hour {hour} is outside 0-23"),
                    "birthInfo.hour",
                ));
            }
        }
        if let Some(minute) = self.minute {
            if minute > 59 {
                return Err(QimingError::validation_field(
                    format!("birth minute {minute} is outside 0-59"),
                    "birthInfo.minute",
                ));
            }
        }
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            QimingError::validation_field(
                format!(
                    "birth date {}-{:02}-{:02} does not exist",
                    self.year, self.month, self.day
                ),
                "birthInfo",
            )
        })
    }

    pub fn has_time(&self) -> bool {
        self.hour.is_some()
    }
}

/// An already-cleaned character set taken from a classical text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoetrySource {
    pub title: String,
    pub characters: Vec<char>,
}

/// Optional user constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub excluded_characters: Vec<char>,
    #[serde(default)]
    pub required_characters: Vec<char>,
    #[serde(default)]
    pub preferred_elements: Vec<Element>,
    #[serde(default)]
    pub poetry_source: Option<PoetrySource>,
    /// Number of given-name characters (1 or 2)
    #[serde(default)]
    pub given_name_length: Option<usize>,
}

/// A naming request as received from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingRequest {
    pub family_name: String,
    pub gender: Gender,
    #[serde(default)]
    pub birth_info: Option<BirthInfo>,
    #[serde(default)]
    pub predue_info: Option<PredueInfo>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl NamingRequest {
    pub fn new(family_name: impl Into<String>, gender: Gender) -> Self {
        Self {
            family_name: family_name.into(),
            gender,
            birth_info: None,
            predue_info: None,
            preferences: Preferences::default(),
        }
    }

    pub fn with_birth(mut self, birth: BirthInfo) -> Self {
        self.birth_info = Some(birth);
        self
    }

    pub fn with_predue(mut self, predue: PredueInfo) -> Self {
        self.predue_info = Some(predue);
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Parse a request from its JSON form.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Surname characters after validation: one or two ideographs.
    pub fn surname_chars(&self) -> Result<Vec<char>> {
        let trimmed = self.family_name.trim();
        let graphemes: Vec<&str> = trimmed.graphemes(true).collect();
        if graphemes.is_empty() {
            return Err(QimingError::validation_field(
                "family name is required",
                "familyName",
            ));
        }
        if graphemes.len() > 2 {
            return Err(QimingError::validation_field(
                format!(
                    "family name '{trimmed}' has {} characters, expected 1-2",
                    graphemes.len()
                ),
                "familyName",
            ));
        }

        let mut chars = Vec::with_capacity(graphemes.len());
        for grapheme in graphemes {
            let mut it = grapheme.chars();
            match (it.next(), it.next()) {
                (Some(ch), None) if is_ideograph(ch) => chars.push(ch),
                _ => {
                    return Err(QimingError::validation_field(
                        format!("'{grapheme}' in family name is not a Chinese character"),
                        "familyName",
                    ))
                }
            }
        }
        Ok(chars)
    }

    /// Given-name length, preferring the request over the configured default.
    pub fn given_name_length(&self, default: usize) -> usize {
        self.preferences
            .given_name_length
            .filter(|len| (1..=2).contains(len))
            .unwrap_or(default)
    }
}

/// Whether `ch` is a CJK unified or compatibility ideograph.
pub fn is_ideograph(ch: char) -> bool {
    matches!(
        ch as u32,
        0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0x20000..=0x2A6DF | 0x2A700..=0x2EBEF | 0xF900..=0xFAFF
    )
}
