//! Five-grid (wuge) and three-talents (sancai) stroke numerology.

use serde::{Deserialize, Serialize};

use crate::core::calendar::{Element, ElementRelation};

/// Fortune class of a grid number in the 81-number table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fortune {
    Great,
    Good,
    Mixed,
    Poor,
}

impl Fortune {
    pub const fn score(self) -> f64 {
        match self {
            Fortune::Great => 100.0,
            Fortune::Good => 85.0,
            Fortune::Mixed => 65.0,
            Fortune::Poor => 35.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Fortune::Great => "大吉",
            Fortune::Good => "吉",
            Fortune::Mixed => "半吉",
            Fortune::Poor => "凶",
        }
    }
}

/// Fold a grid number into 1..=81.
pub fn normalize_grid(n: u32) -> u32 {
    if n == 0 {
        return 1;
    }
    (n - 1) % 80 + 1
}

/// Fortune of a grid number per the 81-number table.
pub fn fortune(n: u32) -> Fortune {
    match normalize_grid(n) {
        1 | 3 | 5 | 11 | 13 | 15 | 16 | 21 | 23 | 24 | 31 | 32 | 33 | 41 | 45 | 47 | 48 | 52
        | 63 | 81 => Fortune::Great,
        6 | 7 | 8 | 17 | 18 | 25 | 29 | 35 | 37 | 39 | 57 | 61 | 65 | 67 | 68 => Fortune::Good,
        27 | 30 | 38 | 40 | 49 | 51 | 55 | 58 | 71 | 73 | 75 | 77 | 78 => Fortune::Mixed,
        _ => Fortune::Poor,
    }
}

/// The five grids of a full name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiveGrids {
    pub heaven: u32,
    pub person: u32,
    pub earth: u32,
    pub outer: u32,
    pub total: u32,
}

impl FiveGrids {
    /// Compute grids from traditional stroke counts. Surnames and given names
    /// may each have one or two characters; anything else yields `None`.
    pub fn compute(surname: &[u32], given: &[u32]) -> Option<Self> {
        let total: u32 = surname.iter().sum::<u32>() + given.iter().sum::<u32>();
        let grids = match (surname, given) {
            ([s], [g1]) => Self {
                heaven: s + 1,
                person: s + g1,
                earth: g1 + 1,
                outer: 2,
                total,
            },
            ([s], [g1, g2]) => Self {
                heaven: s + 1,
                person: s + g1,
                earth: g1 + g2,
                outer: g2 + 1,
                total,
            },
            ([s1, s2], [g1]) => Self {
                heaven: s1 + s2,
                person: s2 + g1,
                earth: g1 + 1,
                outer: s1 + 1,
                total,
            },
            ([s1, s2], [g1, g2]) => Self {
                heaven: s1 + s2,
                person: s2 + g1,
                earth: g1 + g2,
                outer: s1 + g2,
                total,
            },
            _ => return None,
        };
        Some(grids)
    }

    /// Grids in heaven, person, earth, outer, total order.
    pub fn as_array(&self) -> [u32; 5] {
        [self.heaven, self.person, self.earth, self.outer, self.total]
    }
}

/// Person grid formed by the last surname character and the first given character.
pub fn person_grid(surname_last: u32, first_given: u32) -> u32 {
    surname_last + first_given
}

/// Elements of the heaven, person and earth grids and how well they chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreeTalents {
    pub heaven: Element,
    pub person: Element,
    pub earth: Element,
    /// Chain harmony on a 0-100 scale
    pub harmony: f64,
}

impl ThreeTalents {
    pub fn from_grids(grids: &FiveGrids) -> Self {
        let heaven = Element::from_stroke_count(grids.heaven);
        let person = Element::from_stroke_count(grids.person);
        let earth = Element::from_stroke_count(grids.earth);
        let harmony = (link_score(heaven, person) + link_score(person, earth)) / 2.0;
        Self {
            heaven,
            person,
            earth,
            harmony,
        }
    }

    /// Elements as a string, e.g. `木火土`.
    pub fn pattern(&self) -> String {
        [self.heaven, self.person, self.earth]
            .iter()
            .map(|e| e.as_char())
            .collect()
    }
}

/// Score of one link in an element chain, read from `from` towards `to`.
pub fn link_score(from: Element, to: Element) -> f64 {
    match from.relation_to(to) {
        ElementRelation::Generates => 100.0,
        ElementRelation::GeneratedBy => 85.0,
        ElementRelation::Same => 80.0,
        ElementRelation::ControlledBy => 55.0,
        ElementRelation::Controls => 45.0,
    }
}

/// Weights of person, earth, total, outer and heaven grid fortunes.
const GRID_WEIGHTS: [(GridKind, f64); 5] = [
    (GridKind::Person, 0.35),
    (GridKind::Earth, 0.25),
    (GridKind::Total, 0.25),
    (GridKind::Outer, 0.10),
    (GridKind::Heaven, 0.05),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridKind {
    Heaven,
    Person,
    Earth,
    Outer,
    Total,
}

/// Complete numerology verdict for a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridAnalysis {
    pub grids: FiveGrids,
    /// Fortunes in heaven, person, earth, outer, total order
    pub fortunes: [Fortune; 5],
    pub three_talents: ThreeTalents,
    /// Blended score on a 0-100 scale
    pub score: f64,
}

impl GridAnalysis {
    pub fn analyze(surname: &[u32], given: &[u32]) -> Option<Self> {
        let grids = FiveGrids::compute(surname, given)?;
        let three_talents = ThreeTalents::from_grids(&grids);
        let fortunes = grids.as_array().map(fortune);

        let weighted: f64 = GRID_WEIGHTS
            .iter()
            .map(|(kind, weight)| {
                let n = match kind {
                    GridKind::Heaven => grids.heaven,
                    GridKind::Person => grids.person,
                    GridKind::Earth => grids.earth,
                    GridKind::Outer => grids.outer,
                    GridKind::Total => grids.total,
                };
                fortune(n).score() * weight
            })
            .sum();

        Some(Self {
            grids,
            fortunes,
            three_talents,
            score: 0.8 * weighted + 0.2 * three_talents.harmony,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn grids_for_single_surname_two_given() {
        // 吴(7) 德(15) 文(4)
        let grids = FiveGrids::compute(&[7], &[15, 4]).unwrap();
        assert_eq!(grids.as_array(), [8, 22, 19, 5, 26]);
    }

    #[test]
    fn grids_for_single_given_character() {
        let grids = FiveGrids::compute(&[7], &[8]).unwrap();
        assert_eq!(grids.as_array(), [8, 15, 9, 2, 15]);
    }

    #[test]
    fn grids_for_compound_surname() {
        // 欧(15) 阳(17) 文(4) 博(12)
        let grids = FiveGrids::compute(&[15, 17], &[4, 12]).unwrap();
        assert_eq!(grids.heaven, 32);
        assert_eq!(grids.person, 21);
        assert_eq!(grids.earth, 16);
        assert_eq!(grids.outer, 27);
        assert_eq!(grids.total, 48);
    }

    #[test]
    fn unsupported_shapes_are_rejected() {
        assert!(FiveGrids::compute(&[], &[4]).is_none());
        assert!(FiveGrids::compute(&[7], &[]).is_none());
        assert!(FiveGrids::compute(&[7], &[1, 2, 3]).is_none());
    }

    #[test]
    fn numbers_above_81_wrap() {
        assert_eq!(normalize_grid(81), 81);
        assert_eq!(normalize_grid(82), 2);
        assert_eq!(fortune(82), fortune(2));
        assert_eq!(fortune(1), Fortune::Great);
        assert_eq!(fortune(2), Fortune::Poor);
        assert_eq!(fortune(38), Fortune::Mixed);
    }

    #[test]
    fn three_talents_chain() {
        let grids = FiveGrids::compute(&[7], &[15, 4]).unwrap();
        let talents = ThreeTalents::from_grids(&grids);
        // 8 metal, 22 wood, 19 water
        assert_eq!(talents.pattern(), "金木水");
        assert_relative_eq!(talents.harmony, (45.0 + 85.0) / 2.0);
    }

    #[test]
    fn analysis_score_is_bounded() {
        for surname in [3u32, 7, 11, 20] {
            for g1 in 1u32..30 {
                for g2 in 1u32..30 {
                    let analysis = GridAnalysis::analyze(&[surname], &[g1, g2]).unwrap();
                    assert!(analysis.score > 0.0 && analysis.score <= 100.0);
                }
            }
        }
    }
}
