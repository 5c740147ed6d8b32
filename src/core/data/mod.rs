//! Character data tables and their resolution.
//!
//! A [`DataStore`] holds three independently queryable tables keyed by
//! ideograph: the enriched primary table, the stroke-fallback table and the
//! pinyin-fallback table. It is built once and shared read-only; the
//! [`CharacterResolver`] composes records from it.

pub mod builtin;
pub mod resolver;

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::calendar::Element;
use crate::core::errors::{QimingError, Result};

pub use resolver::{CharacterRecord, CharacterResolver, ResolutionStatus, SourceId};

/// Connotation of a character's meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    #[default]
    Neutral,
    Negative,
}

/// Gender a character is conventionally associated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenderAffinity {
    Masculine,
    Feminine,
    #[default]
    Neutral,
}

/// Row of the primary (enriched) table. Any field may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryEntry {
    pub character: char,
    /// Kangxi stroke count used by numerology
    #[serde(default)]
    pub traditional_strokes: Option<u32>,
    #[serde(default)]
    pub modern_strokes: Option<u32>,
    #[serde(default)]
    pub element: Option<Element>,
    /// Toneless pinyin, lowercase ascii (`ü` written as `v`)
    #[serde(default)]
    pub pinyin: Option<String>,
    /// Tone 1-4, 5 for neutral
    #[serde(default)]
    pub tone: Option<u8>,
    #[serde(default)]
    pub radical: Option<String>,
    #[serde(default)]
    pub is_standard: Option<bool>,
    /// Meaning score on a 0-100 scale
    #[serde(default)]
    pub meaning_score: Option<f64>,
    #[serde(default)]
    pub polarity: Option<Polarity>,
    #[serde(default)]
    pub gender_affinity: Option<GenderAffinity>,
    /// Citation of a classical text using the character
    #[serde(default)]
    pub classical_source: Option<String>,
}

impl PrimaryEntry {
    /// An entry with only the character set.
    pub fn empty(character: char) -> Self {
        Self {
            character,
            traditional_strokes: None,
            modern_strokes: None,
            element: None,
            pinyin: None,
            tone: None,
            radical: None,
            is_standard: None,
            meaning_score: None,
            polarity: None,
            gender_affinity: None,
            classical_source: None,
        }
    }
}

/// Row of the stroke-fallback table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeEntry {
    pub character: char,
    #[serde(default)]
    pub traditional_strokes: Option<u32>,
    #[serde(default)]
    pub modern_strokes: Option<u32>,
    #[serde(default)]
    pub radical: Option<String>,
}

/// Row of the pinyin-fallback table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinyinEntry {
    pub character: char,
    pub pinyin: String,
    #[serde(default)]
    pub tone: Option<u8>,
}

/// On-disk JSON layout of a data snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSnapshot {
    #[serde(default)]
    pub primary: Vec<PrimaryEntry>,
    #[serde(default)]
    pub strokes: Vec<StrokeEntry>,
    #[serde(default)]
    pub pinyin: Vec<PinyinEntry>,
    /// Default candidate characters for given names
    #[serde(default)]
    pub name_pool: Vec<char>,
}

/// Immutable character tables shared by every request.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    primary: HashMap<char, PrimaryEntry>,
    strokes: HashMap<char, StrokeEntry>,
    pinyin: HashMap<char, PinyinEntry>,
    name_pool: Vec<char>,
}

impl DataStore {
    /// Build a store from a snapshot. Later duplicates replace earlier rows.
    pub fn from_snapshot(snapshot: DataSnapshot) -> Self {
        let mut name_pool = Vec::with_capacity(snapshot.name_pool.len());
        for ch in snapshot.name_pool {
            if !name_pool.contains(&ch) {
                name_pool.push(ch);
            }
        }

        Self {
            primary: snapshot
                .primary
                .into_iter()
                .map(|entry| (entry.character, entry))
                .collect(),
            strokes: snapshot
                .strokes
                .into_iter()
                .map(|entry| (entry.character, entry))
                .collect(),
            pinyin: snapshot
                .pinyin
                .into_iter()
                .map(|entry| (entry.character, entry))
                .collect(),
            name_pool,
        }
    }

    /// The snapshot compiled into the crate.
    pub fn builtin() -> Self {
        Self::from_snapshot(builtin::snapshot())
    }

    /// Parse a JSON snapshot.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let snapshot: DataSnapshot = serde_json::from_str(content)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Load a JSON snapshot from disk.
    pub fn from_json_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            QimingError::io(
                format!("Failed to read character data: {}", path.display()),
                e,
            )
        })?;
        let store = Self::from_json_str(&content)?;
        if store.primary.is_empty() && store.strokes.is_empty() && store.pinyin.is_empty() {
            return Err(QimingError::data(format!(
                "Character data file {} contains no entries",
                path.display()
            )));
        }
        Ok(store)
    }

    /// Export the tables as a snapshot, rows sorted by character.
    pub fn to_snapshot(&self) -> DataSnapshot {
        let mut primary: Vec<_> = self.primary.values().cloned().collect();
        primary.sort_by_key(|entry| entry.character);
        let mut strokes: Vec<_> = self.strokes.values().cloned().collect();
        strokes.sort_by_key(|entry| entry.character);
        let mut pinyin: Vec<_> = self.pinyin.values().cloned().collect();
        pinyin.sort_by_key(|entry| entry.character);

        DataSnapshot {
            primary,
            strokes,
            pinyin,
            name_pool: self.name_pool.clone(),
        }
    }

    pub fn primary(&self, ch: char) -> Option<&PrimaryEntry> {
        self.primary.get(&ch)
    }

    pub fn stroke(&self, ch: char) -> Option<&StrokeEntry> {
        self.strokes.get(&ch)
    }

    pub fn pinyin(&self, ch: char) -> Option<&PinyinEntry> {
        self.pinyin.get(&ch)
    }

    /// Default given-name candidate pool, in table order.
    pub fn name_pool(&self) -> &[char] {
        &self.name_pool
    }

    /// Row counts of the primary, stroke and pinyin tables.
    pub fn table_sizes(&self) -> (usize, usize, usize) {
        (self.primary.len(), self.strokes.len(), self.pinyin.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_store_has_all_three_tables() {
        let store = DataStore::builtin();
        let (primary, strokes, pinyin) = store.table_sizes();
        assert!(primary > 80);
        assert!(strokes >= 5);
        assert!(pinyin >= 5);
        assert!(store.name_pool().len() > 40);
        assert!(store.primary('吴').is_some());
    }

    #[test]
    fn name_pool_is_deduplicated() {
        let snapshot = DataSnapshot {
            name_pool: vec!['文', '文', '安'],
            ..DataSnapshot::default()
        };
        let store = DataStore::from_snapshot(snapshot);
        assert_eq!(store.name_pool(), &['文', '安']);
    }

    #[test]
    fn json_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("characters.json");
        let store = DataStore::builtin();
        let json = serde_json::to_string_pretty(&store.to_snapshot()).unwrap();
        std::fs::write(&path, json).unwrap();

        let loaded = DataStore::from_json_file(&path).unwrap();
        assert_eq!(loaded.table_sizes(), store.table_sizes());
        assert_eq!(loaded.primary('德'), store.primary('德'));
        assert_eq!(loaded.name_pool(), store.name_pool());
    }

    #[test]
    fn camel_case_rows_parse_with_missing_fields() {
        let json = r#"{
            "primary": [{"character": "文", "traditionalStrokes": 4, "element": "water"}],
            "pinyin": [{"character": "文", "pinyin": "wen", "tone": 2}]
        }"#;
        let store = DataStore::from_json_str(json).unwrap();
        let entry = store.primary('文').unwrap();
        assert_eq!(entry.traditional_strokes, Some(4));
        assert_eq!(entry.element, Some(Element::Water));
        assert!(entry.pinyin.is_none());
        assert_eq!(store.pinyin('文').map(|p| p.pinyin.as_str()), Some("wen"));
    }

    #[test]
    fn empty_data_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "{}").unwrap();
        let err = DataStore::from_json_file(&path).unwrap_err();
        assert!(matches!(err, QimingError::Data { .. }));
    }
}
