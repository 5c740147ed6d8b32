//! Pinyin syllable helpers and tone-pattern rules.

use serde::{Deserialize, Serialize};

/// Initials ordered so two-letter ones match first.
const INITIALS: [&str; 23] = [
    "zh", "ch", "sh", "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "j", "q", "x", "r",
    "z", "c", "s", "y", "w",
];

/// A toneless pinyin syllable with its tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syllable {
    pub pinyin: String,
    pub tone: u8,
}

impl Syllable {
    pub fn new(pinyin: impl Into<String>, tone: u8) -> Self {
        Self {
            pinyin: pinyin.into().to_ascii_lowercase(),
            tone,
        }
    }

    pub fn initial(&self) -> &str {
        split(&self.pinyin).0
    }

    pub fn final_part(&self) -> &str {
        split(&self.pinyin).1
    }

    /// Level (ping) tones are 1 and 2; 3 and 4 are oblique (ze).
    pub fn is_level(&self) -> bool {
        matches!(self.tone, 1 | 2)
    }
}

/// Split a toneless syllable into initial and final.
pub fn split(pinyin: &str) -> (&str, &str) {
    INITIALS
        .iter()
        .find(|initial| pinyin.starts_with(*initial) && pinyin.len() > initial.len())
        .map(|initial| pinyin.split_at(initial.len()))
        .unwrap_or(("", pinyin))
}

/// Phonetic verdict for a full name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneticVerdict {
    /// 0-100, higher sounds better
    pub score: f64,
    pub notes: Vec<String>,
}

/// Score a full name read surname first. `surname_len` marks where the given
/// name starts.
pub fn assess(syllables: &[Syllable], surname_len: usize) -> PhoneticVerdict {
    let mut score: f64 = 100.0;
    let mut notes = Vec::new();

    if syllables.len() >= 2 && syllables.iter().all(|s| s.tone == syllables[0].tone) {
        score -= 20.0;
        notes.push(format!("all syllables share tone {}", syllables[0].tone));
    }

    for pair in syllables.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.tone == 3 && b.tone == 3 {
            score -= 15.0;
            notes.push(format!("consecutive third tones in {}-{}", a.pinyin, b.pinyin));
        }
        if !a.initial().is_empty() && a.initial() == b.initial() {
            score -= 10.0;
            notes.push(format!("shared initial '{}'", a.initial()));
        }
        if a.final_part() == b.final_part() {
            score -= 8.0;
            notes.push(format!("shared final '{}'", a.final_part()));
        }
    }

    let (surname, given) = syllables.split_at(surname_len.min(syllables.len()));
    for syllable in given {
        if surname.iter().any(|s| s.pinyin == syllable.pinyin) {
            score -= 15.0;
            notes.push(format!("'{}' repeats the surname sound", syllable.pinyin));
        }
    }

    PhoneticVerdict {
        score: score.clamp(0.0, 100.0),
        notes,
    }
}

/// Lightweight tone-pattern quality in [0, 1] used for pre-ranking.
pub fn tone_pattern_score(tones: &[u8]) -> f64 {
    if tones.len() < 2 {
        return 0.5;
    }
    let mut score: f64 = 1.0;
    if tones.iter().all(|t| *t == tones[0]) {
        score -= 0.4;
    }
    let third_pairs = tones.windows(2).filter(|w| w[0] == 3 && w[1] == 3).count();
    score -= 0.3 * third_pairs as f64;

    let level = |t: &u8| matches!(t, 1 | 2);
    let alternates = tones.windows(2).all(|w| level(&w[0]) != level(&w[1]));
    if !alternates {
        score -= 0.1;
    }
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_initial_and_final() {
        assert_eq!(split("zhang"), ("zh", "ang"));
        assert_eq!(split("wu"), ("w", "u"));
        assert_eq!(split("an"), ("", "an"));
        assert_eq!(split("en"), ("", "en"));
        assert_eq!(split("shi"), ("sh", "i"));
    }

    #[test]
    fn harmonious_name_keeps_full_score() {
        let name = [
            Syllable::new("wu", 2),
            Syllable::new("jia", 1),
            Syllable::new("ming", 2),
        ];
        let verdict = assess(&name, 1);
        assert_eq!(verdict.score, 100.0);
        assert!(verdict.notes.is_empty());
    }

    #[test]
    fn penalties_accumulate() {
        let name = [
            Syllable::new("li", 3),
            Syllable::new("li", 3),
            Syllable::new("lin", 2),
        ];
        let verdict = assess(&name, 1);
        // third tones, shared initial twice, shared final once, surname homophone
        assert_eq!(verdict.score, 100.0 - 15.0 - 10.0 - 10.0 - 8.0 - 15.0);
        assert_eq!(verdict.notes.len(), 5);
    }

    #[test]
    fn tone_pattern_prefers_alternation() {
        assert!(tone_pattern_score(&[2, 4, 1]) > tone_pattern_score(&[2, 2, 2]));
        assert!(tone_pattern_score(&[3, 3, 1]) < tone_pattern_score(&[3, 1, 4]));
        assert_eq!(tone_pattern_score(&[1]), 0.5);
    }
}
