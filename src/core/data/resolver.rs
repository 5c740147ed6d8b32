//! Tiered character data resolution.
//!
//! A character is looked up in the primary table first. A complete primary
//! row is returned with high confidence. Otherwise the stroke and pinyin
//! fallback tables are queried independently and merged, with confidence
//! capped by the weakest contributing source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{DataStore, GenderAffinity, Polarity};
use crate::core::calendar::Element;
use crate::core::config::ResolverConfig;

/// Identifier of a data source contributing to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceId {
    Primary,
    StrokeFallback,
    PinyinFallback,
}

impl SourceId {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceId::Primary => "primary",
            SourceId::StrokeFallback => "stroke-fallback",
            SourceId::PinyinFallback => "pinyin-fallback",
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a record was assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Complete primary-table hit
    Primary,
    /// Merged from a partial primary row and/or fallback tables
    Composite,
    /// No source knew the character
    Unresolved,
}

/// Resolved attributes of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub character: char,
    pub traditional_strokes: Option<u32>,
    pub modern_strokes: Option<u32>,
    pub element: Option<Element>,
    /// Element came from stroke numerology rather than a table
    pub element_derived: bool,
    pub pinyin: Option<String>,
    pub tone: Option<u8>,
    pub radical: Option<String>,
    pub is_standard: bool,
    pub meaning_score: Option<f64>,
    pub polarity: Polarity,
    pub gender_affinity: GenderAffinity,
    pub classical_source: Option<String>,
    pub confidence: f64,
    /// Contributing sources in query order
    pub provenance: Vec<SourceId>,
    pub status: ResolutionStatus,
}

impl CharacterRecord {
    /// Record for a character no source knows.
    pub fn unresolved(character: char) -> Self {
        Self {
            character,
            traditional_strokes: None,
            modern_strokes: None,
            element: None,
            element_derived: false,
            pinyin: None,
            tone: None,
            radical: None,
            is_standard: false,
            meaning_score: None,
            polarity: Polarity::Neutral,
            gender_affinity: GenderAffinity::Neutral,
            classical_source: None,
            confidence: 0.0,
            provenance: Vec::new(),
            status: ResolutionStatus::Unresolved,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        self.status == ResolutionStatus::Unresolved
    }

    /// Whether the record carries enough to take part in naming.
    pub fn is_usable(&self) -> bool {
        self.confidence > 0.0 && self.traditional_strokes.is_some() && self.element.is_some()
    }

    /// Traditional strokes, or 0 when unknown.
    pub fn strokes(&self) -> u32 {
        self.traditional_strokes.unwrap_or(0)
    }

    /// Whether the record's pinyin matches `other`'s, ignoring tone.
    pub fn sounds_like(&self, other: &CharacterRecord) -> bool {
        matches!((&self.pinyin, &other.pinyin), (Some(a), Some(b)) if a == b)
    }
}

/// Fields gathered from the sources before a record is finalised.
#[derive(Default)]
struct Gathered {
    traditional_strokes: Option<u32>,
    modern_strokes: Option<u32>,
    element: Option<Element>,
    pinyin: Option<String>,
    tone: Option<u8>,
    radical: Option<String>,
    is_standard: Option<bool>,
    meaning_score: Option<f64>,
    polarity: Option<Polarity>,
    gender_affinity: Option<GenderAffinity>,
    classical_source: Option<String>,
}

impl Gathered {
    const REQUIRED_FIELDS: f64 = 5.0;
    const OPTIONAL_FIELDS: f64 = 5.0;

    fn required_filled(&self) -> f64 {
        [
            self.traditional_strokes.is_some(),
            self.modern_strokes.is_some(),
            self.element.is_some(),
            self.pinyin.is_some(),
            self.tone.is_some(),
        ]
        .iter()
        .filter(|filled| **filled)
        .count() as f64
    }

    fn is_complete(&self) -> bool {
        self.required_filled() == Self::REQUIRED_FIELDS
    }

    fn optional_completeness(&self) -> f64 {
        let filled = [
            self.radical.is_some(),
            self.is_standard.is_some(),
            self.meaning_score.is_some(),
            self.polarity.is_some(),
            self.gender_affinity.is_some(),
        ]
        .iter()
        .filter(|filled| **filled)
        .count() as f64;
        filled / Self::OPTIONAL_FIELDS
    }

    fn into_record(
        self,
        character: char,
        confidence: f64,
        provenance: Vec<SourceId>,
        status: ResolutionStatus,
        element_derived: bool,
    ) -> CharacterRecord {
        CharacterRecord {
            character,
            traditional_strokes: self.traditional_strokes,
            modern_strokes: self.modern_strokes,
            element: self.element,
            element_derived,
            pinyin: self.pinyin,
            tone: self.tone,
            radical: self.radical,
            is_standard: self.is_standard.unwrap_or(false),
            meaning_score: self.meaning_score,
            polarity: self.polarity.unwrap_or_default(),
            gender_affinity: self.gender_affinity.unwrap_or_default(),
            classical_source: self.classical_source,
            confidence,
            provenance,
            status,
        }
    }
}

/// Resolves characters against a [`DataStore`], memoizing every answer.
pub struct CharacterResolver {
    store: Arc<DataStore>,
    config: ResolverConfig,
    memo: DashMap<char, Arc<CharacterRecord>>,
    source_queries: AtomicUsize,
}

impl CharacterResolver {
    pub fn new(store: Arc<DataStore>, config: ResolverConfig) -> Self {
        Self {
            store,
            config,
            memo: DashMap::new(),
            source_queries: AtomicUsize::new(0),
        }
    }

    /// The underlying tables.
    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Resolve a character. Deterministic for a given store; never fails.
    pub fn resolve(&self, character: char) -> Arc<CharacterRecord> {
        if let Some(cached) = self.memo.get(&character) {
            return Arc::clone(cached.value());
        }

        let record = Arc::new(self.resolve_uncached(character));
        self.memo.insert(character, Arc::clone(&record));
        record
    }

    /// Resolve several characters in order.
    pub fn resolve_all(&self, characters: impl IntoIterator<Item = char>) -> Vec<Arc<CharacterRecord>> {
        characters.into_iter().map(|ch| self.resolve(ch)).collect()
    }

    /// Number of table lookups performed so far.
    pub fn source_queries(&self) -> usize {
        self.source_queries.load(Ordering::Relaxed)
    }

    /// Number of memoized records.
    pub fn cached_records(&self) -> usize {
        self.memo.len()
    }

    fn resolve_uncached(&self, character: char) -> CharacterRecord {
        let mut gathered = Gathered::default();
        let mut provenance = Vec::new();

        self.source_queries.fetch_add(1, Ordering::Relaxed);
        if let Some(entry) = self.store.primary(character) {
            gathered.traditional_strokes = entry.traditional_strokes;
            gathered.modern_strokes = entry.modern_strokes;
            gathered.element = entry.element;
            gathered.pinyin = entry.pinyin.clone();
            gathered.tone = entry.tone;
            gathered.radical = entry.radical.clone();
            gathered.is_standard = entry.is_standard;
            gathered.meaning_score = entry.meaning_score;
            gathered.polarity = entry.polarity;
            gathered.gender_affinity = entry.gender_affinity;
            gathered.classical_source = entry.classical_source.clone();

            if gathered.is_complete() {
                let floor = self.config.primary_floor;
                let confidence = floor + (1.0 - floor) * gathered.optional_completeness();
                trace!(%character, confidence, "primary hit");
                return gathered.into_record(
                    character,
                    confidence,
                    vec![SourceId::Primary],
                    ResolutionStatus::Primary,
                    false,
                );
            }
            if gathered.required_filled() > 0.0 || gathered.optional_completeness() > 0.0 {
                provenance.push(SourceId::Primary);
            }
        }

        self.source_queries.fetch_add(2, Ordering::Relaxed);
        if let Some(entry) = self.store.stroke(character) {
            let mut contributed = false;
            if gathered.traditional_strokes.is_none() && entry.traditional_strokes.is_some() {
                gathered.traditional_strokes = entry.traditional_strokes;
                contributed = true;
            }
            if gathered.modern_strokes.is_none() && entry.modern_strokes.is_some() {
                gathered.modern_strokes = entry.modern_strokes;
                contributed = true;
            }
            if gathered.radical.is_none() && entry.radical.is_some() {
                gathered.radical = entry.radical.clone();
                contributed = true;
            }
            if contributed {
                provenance.push(SourceId::StrokeFallback);
            }
        }

        if let Some(entry) = self.store.pinyin(character) {
            let mut contributed = false;
            if gathered.pinyin.is_none() {
                gathered.pinyin = Some(entry.pinyin.clone());
                contributed = true;
            }
            if gathered.tone.is_none() && entry.tone.is_some() {
                gathered.tone = entry.tone;
                contributed = true;
            }
            if contributed {
                provenance.push(SourceId::PinyinFallback);
            }
        }

        if provenance.is_empty() {
            debug!(%character, "character unresolved in every source");
            return CharacterRecord::unresolved(character);
        }

        let mut element_derived = false;
        let mut required = gathered.required_filled();
        if gathered.element.is_none() {
            if let Some(strokes) = gathered.traditional_strokes {
                gathered.element = Some(Element::from_stroke_count(strokes));
                element_derived = true;
                // A derived element counts for half a field.
                required += 0.5;
            }
        }

        let weakest = provenance
            .iter()
            .map(|source| self.reliability(*source))
            .fold(1.0_f64, f64::min);
        let completeness = required / Gathered::REQUIRED_FIELDS;
        let confidence = (weakest * completeness).clamp(0.0, 1.0);

        debug!(
            %character,
            confidence,
            sources = provenance.len(),
            element_derived,
            "composite record assembled"
        );
        gathered.into_record(
            character,
            confidence,
            provenance,
            ResolutionStatus::Composite,
            element_derived,
        )
    }

    /// Reliability assigned to a contributing source.
    fn reliability(&self, source: SourceId) -> f64 {
        match source {
            // A partial primary row is trusted less than a complete one.
            SourceId::Primary => self.config.primary_floor,
            SourceId::StrokeFallback | SourceId::PinyinFallback => self.config.fallback_ceiling,
        }
    }
}
