//! Five elements, heavenly stems, earthly branches and the zodiac.
//!
//! All rule sets here are closed and small, so they are expressed as enums
//! with exhaustive `match` tables rather than string-keyed lookups.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five elements (wuxing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// 木
    Wood,
    /// 火
    Fire,
    /// 土
    Earth,
    /// 金
    Metal,
    /// 水
    Water,
}

/// How one element relates to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRelation {
    /// Both elements are the same
    Same,
    /// Self generates the other (wood feeds fire)
    Generates,
    /// Self is generated by the other
    GeneratedBy,
    /// Self controls the other (wood parts earth)
    Controls,
    /// Self is controlled by the other
    ControlledBy,
}

impl Element {
    /// All elements in generation order.
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// Position in [`Element::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Element::Wood => 0,
            Element::Fire => 1,
            Element::Earth => 2,
            Element::Metal => 3,
            Element::Water => 4,
        }
    }

    /// The element this one generates.
    pub const fn generates(self) -> Element {
        match self {
            Element::Wood => Element::Fire,
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
            Element::Metal => Element::Water,
            Element::Water => Element::Wood,
        }
    }

    /// The element that generates this one.
    pub const fn generated_by(self) -> Element {
        match self {
            Element::Wood => Element::Water,
            Element::Fire => Element::Wood,
            Element::Earth => Element::Fire,
            Element::Metal => Element::Earth,
            Element::Water => Element::Metal,
        }
    }

    /// The element this one controls.
    pub const fn controls(self) -> Element {
        match self {
            Element::Wood => Element::Earth,
            Element::Earth => Element::Water,
            Element::Water => Element::Fire,
            Element::Fire => Element::Metal,
            Element::Metal => Element::Wood,
        }
    }

    /// The element that controls this one.
    pub const fn controlled_by(self) -> Element {
        match self {
            Element::Wood => Element::Metal,
            Element::Earth => Element::Wood,
            Element::Water => Element::Earth,
            Element::Fire => Element::Water,
            Element::Metal => Element::Fire,
        }
    }

    /// Relation of `self` towards `other`.
    pub fn relation_to(self, other: Element) -> ElementRelation {
        if self == other {
            ElementRelation::Same
        } else if self.generates() == other {
            ElementRelation::Generates
        } else if self.generated_by() == other {
            ElementRelation::GeneratedBy
        } else if self.controls() == other {
            ElementRelation::Controls
        } else {
            ElementRelation::ControlledBy
        }
    }

    /// Numerology element of a stroke count, taken from its last digit:
    /// 1-2 wood, 3-4 fire, 5-6 earth, 7-8 metal, 9-0 water.
    pub const fn from_stroke_count(strokes: u32) -> Element {
        match strokes % 10 {
            1 | 2 => Element::Wood,
            3 | 4 => Element::Fire,
            5 | 6 => Element::Earth,
            7 | 8 => Element::Metal,
            _ => Element::Water,
        }
    }

    /// Ideograph for display.
    pub const fn as_char(self) -> char {
        match self {
            Element::Wood => '木',
            Element::Fire => '火',
            Element::Earth => '土',
            Element::Metal => '金',
            Element::Water => '水',
        }
    }

    /// Lowercase English name.
    pub const fn name(self) -> &'static str {
        match self {
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Metal => "metal",
            Element::Water => "water",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Element {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wood" | "木" => Ok(Element::Wood),
            "fire" | "火" => Ok(Element::Fire),
            "earth" | "土" => Ok(Element::Earth),
            "metal" | "金" => Ok(Element::Metal),
            "water" | "水" => Ok(Element::Water),
            other => Err(format!("unknown element '{other}'")),
        }
    }
}

/// Ten heavenly stems. 甲(0) 乙(1) 丙(2) 丁(3) 戊(4) 己(5) 庚(6) 辛(7) 壬(8) 癸(9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeavenlyStem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl HeavenlyStem {
    const ORDER: [HeavenlyStem; 10] = [
        HeavenlyStem::Jia,
        HeavenlyStem::Yi,
        HeavenlyStem::Bing,
        HeavenlyStem::Ding,
        HeavenlyStem::Wu,
        HeavenlyStem::Ji,
        HeavenlyStem::Geng,
        HeavenlyStem::Xin,
        HeavenlyStem::Ren,
        HeavenlyStem::Gui,
    ];

    /// Stem at `index`, wrapping modulo 10.
    pub fn from_index(index: i64) -> Self {
        Self::ORDER[index.rem_euclid(10) as usize]
    }

    /// Cyclic index 0..10.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Element carried by the stem.
    pub const fn element(self) -> Element {
        match self {
            HeavenlyStem::Jia | HeavenlyStem::Yi => Element::Wood,
            HeavenlyStem::Bing | HeavenlyStem::Ding => Element::Fire,
            HeavenlyStem::Wu | HeavenlyStem::Ji => Element::Earth,
            HeavenlyStem::Geng | HeavenlyStem::Xin => Element::Metal,
            HeavenlyStem::Ren | HeavenlyStem::Gui => Element::Water,
        }
    }

    /// Yang stems sit at even indices.
    pub fn is_yang(self) -> bool {
        self.index() % 2 == 0
    }

    /// Ideograph for display.
    pub const fn as_char(self) -> char {
        match self {
            HeavenlyStem::Jia => '甲',
            HeavenlyStem::Yi => '乙',
            HeavenlyStem::Bing => '丙',
            HeavenlyStem::Ding => '丁',
            HeavenlyStem::Wu => '戊',
            HeavenlyStem::Ji => '己',
            HeavenlyStem::Geng => '庚',
            HeavenlyStem::Xin => '辛',
            HeavenlyStem::Ren => '壬',
            HeavenlyStem::Gui => '癸',
        }
    }
}

/// Seasons as ruled by the month branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Element that rules the season.
    pub const fn element(self) -> Element {
        match self {
            Season::Spring => Element::Wood,
            Season::Summer => Element::Fire,
            Season::Autumn => Element::Metal,
            Season::Winter => Element::Water,
        }
    }
}

/// Twelve earthly branches. 子(0) 丑(1) 寅(2) 卯(3) 辰(4) 巳(5) 午(6) 未(7) 申(8) 酉(9) 戌(10) 亥(11)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EarthlyBranch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl EarthlyBranch {
    const ORDER: [EarthlyBranch; 12] = [
        EarthlyBranch::Zi,
        EarthlyBranch::Chou,
        EarthlyBranch::Yin,
        EarthlyBranch::Mao,
        EarthlyBranch::Chen,
        EarthlyBranch::Si,
        EarthlyBranch::Wu,
        EarthlyBranch::Wei,
        EarthlyBranch::Shen,
        EarthlyBranch::You,
        EarthlyBranch::Xu,
        EarthlyBranch::Hai,
    ];

    /// Branch at `index`, wrapping modulo 12.
    pub fn from_index(index: i64) -> Self {
        Self::ORDER[index.rem_euclid(12) as usize]
    }

    /// Cyclic index 0..12.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Main element of the branch.
    pub const fn element(self) -> Element {
        match self {
            EarthlyBranch::Zi | EarthlyBranch::Hai => Element::Water,
            EarthlyBranch::Yin | EarthlyBranch::Mao => Element::Wood,
            EarthlyBranch::Si | EarthlyBranch::Wu => Element::Fire,
            EarthlyBranch::Shen | EarthlyBranch::You => Element::Metal,
            EarthlyBranch::Chou
            | EarthlyBranch::Chen
            | EarthlyBranch::Wei
            | EarthlyBranch::Xu => Element::Earth,
        }
    }

    /// Season the branch rules when used as a month branch.
    pub const fn season(self) -> Season {
        match self {
            EarthlyBranch::Yin | EarthlyBranch::Mao | EarthlyBranch::Chen => Season::Spring,
            EarthlyBranch::Si | EarthlyBranch::Wu | EarthlyBranch::Wei => Season::Summer,
            EarthlyBranch::Shen | EarthlyBranch::You | EarthlyBranch::Xu => Season::Autumn,
            EarthlyBranch::Hai | EarthlyBranch::Zi | EarthlyBranch::Chou => Season::Winter,
        }
    }

    /// Zodiac animal of the branch.
    pub fn zodiac(self) -> Zodiac {
        Zodiac::from_index(self.index() as i64)
    }

    /// Ideograph for display.
    pub const fn as_char(self) -> char {
        match self {
            EarthlyBranch::Zi => '子',
            EarthlyBranch::Chou => '丑',
            EarthlyBranch::Yin => '寅',
            EarthlyBranch::Mao => '卯',
            EarthlyBranch::Chen => '辰',
            EarthlyBranch::Si => '巳',
            EarthlyBranch::Wu => '午',
            EarthlyBranch::Wei => '未',
            EarthlyBranch::Shen => '申',
            EarthlyBranch::You => '酉',
            EarthlyBranch::Xu => '戌',
            EarthlyBranch::Hai => '亥',
        }
    }
}

/// One stem-branch pair of the sexagenary cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GanZhi {
    /// Heavenly stem
    pub stem: HeavenlyStem,
    /// Earthly branch
    pub branch: EarthlyBranch,
}

impl GanZhi {
    /// Pair at position `index` of the sixty-cycle (0 = 甲子).
    pub fn from_cycle_index(index: i64) -> Self {
        let index = index.rem_euclid(60);
        Self {
            stem: HeavenlyStem::from_index(index),
            branch: EarthlyBranch::from_index(index),
        }
    }

    /// Position in the sixty-cycle.
    pub fn cycle_index(self) -> usize {
        let (s, b) = (self.stem.index(), self.branch.index());
        (0..6)
            .map(|n| s + 10 * n)
            .find(|candidate| candidate % 12 == b)
            .unwrap_or(0)
    }
}

impl fmt::Display for GanZhi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem.as_char(), self.branch.as_char())
    }
}

/// The twelve zodiac animals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zodiac {
    Rat,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Pig,
}

/// Radicals an animal favours and shuns in given-name characters.
#[derive(Debug, Clone, Copy)]
pub struct RadicalAffinity {
    /// Radicals considered auspicious for the animal
    pub liked: &'static [&'static str],
    /// Radicals considered inauspicious for the animal
    pub disliked: &'static [&'static str],
}

impl Zodiac {
    const ORDER: [Zodiac; 12] = [
        Zodiac::Rat,
        Zodiac::Ox,
        Zodiac::Tiger,
        Zodiac::Rabbit,
        Zodiac::Dragon,
        Zodiac::Snake,
        Zodiac::Horse,
        Zodiac::Goat,
        Zodiac::Monkey,
        Zodiac::Rooster,
        Zodiac::Dog,
        Zodiac::Pig,
    ];

    /// Zodiac at `index`, wrapping modulo 12 (0 = rat).
    pub fn from_index(index: i64) -> Self {
        Self::ORDER[index.rem_euclid(12) as usize]
    }

    /// Zodiac governing lunar year `year` (the year whose new year opens it).
    pub fn for_lunar_year(year: i32) -> Self {
        Self::from_index(i64::from(year) - 4)
    }

    /// The earthly branch behind the animal.
    pub fn branch(self) -> EarthlyBranch {
        EarthlyBranch::from_index(self as i64)
    }

    /// Six-harmony partner (子丑, 寅亥, 卯戌, 辰酉, 巳申, 午未).
    pub fn harmony_partner(self) -> Zodiac {
        match self {
            Zodiac::Rat => Zodiac::Ox,
            Zodiac::Ox => Zodiac::Rat,
            Zodiac::Tiger => Zodiac::Pig,
            Zodiac::Pig => Zodiac::Tiger,
            Zodiac::Rabbit => Zodiac::Dog,
            Zodiac::Dog => Zodiac::Rabbit,
            Zodiac::Dragon => Zodiac::Rooster,
            Zodiac::Rooster => Zodiac::Dragon,
            Zodiac::Snake => Zodiac::Monkey,
            Zodiac::Monkey => Zodiac::Snake,
            Zodiac::Horse => Zodiac::Goat,
            Zodiac::Goat => Zodiac::Horse,
        }
    }

    /// Six-clash opponent, six positions away on the branch circle.
    pub fn clash_partner(self) -> Zodiac {
        Self::from_index(self as i64 + 6)
    }

    /// Radical preferences used for zodiac suitability of name characters.
    pub const fn radical_affinity(self) -> RadicalAffinity {
        match self {
            Zodiac::Rat => RadicalAffinity {
                liked: &["宀", "口", "米", "禾", "豆", "王", "亻"],
                disliked: &["马", "午", "火", "日", "山"],
            },
            Zodiac::Ox => RadicalAffinity {
                liked: &["艹", "禾", "米", "田", "车", "宀", "氵"],
                disliked: &["心", "忄", "羊", "未", "马", "王"],
            },
            Zodiac::Tiger => RadicalAffinity {
                liked: &["山", "王", "木", "林", "月", "马", "犭"],
                disliked: &["日", "申", "门", "辶", "小"],
            },
            Zodiac::Rabbit => RadicalAffinity {
                liked: &["艹", "木", "禾", "田", "宀", "月", "口"],
                disliked: &["日", "酉", "金", "钅", "力", "石"],
            },
            Zodiac::Dragon => RadicalAffinity {
                liked: &["日", "月", "星", "氵", "水", "王", "雨", "云"],
                disliked: &["戌", "犬", "犭", "山", "艹"],
            },
            Zodiac::Snake => RadicalAffinity {
                liked: &["口", "宀", "艹", "木", "田", "山", "土", "月"],
                disliked: &["亻", "人", "火", "日", "亥", "虎"],
            },
            Zodiac::Horse => RadicalAffinity {
                liked: &["艹", "禾", "米", "木", "宀", "亻", "彡"],
                disliked: &["氵", "水", "子", "田", "车", "雨"],
            },
            Zodiac::Goat => RadicalAffinity {
                liked: &["艹", "禾", "米", "木", "口", "月", "足"],
                disliked: &["牛", "丑", "大", "王", "心", "忄", "示"],
            },
            Zodiac::Monkey => RadicalAffinity {
                liked: &["木", "山", "王", "宀", "亻", "口", "言"],
                disliked: &["寅", "虎", "火", "日", "禾"],
            },
            Zodiac::Rooster => RadicalAffinity {
                liked: &["米", "禾", "豆", "山", "宀", "木", "彡"],
                disliked: &["卯", "兔", "犭", "氵", "石", "月"],
            },
            Zodiac::Dog => RadicalAffinity {
                liked: &["宀", "亻", "马", "艹", "田", "心", "忄"],
                disliked: &["辰", "龙", "口", "日", "言", "讠"],
            },
            Zodiac::Pig => RadicalAffinity {
                liked: &["米", "禾", "豆", "氵", "水", "宀", "木"],
                disliked: &["巳", "蛇", "刀", "石", "血", "弓"],
            },
        }
    }

    /// Ideograph for display.
    pub const fn as_char(self) -> char {
        match self {
            Zodiac::Rat => '鼠',
            Zodiac::Ox => '牛',
            Zodiac::Tiger => '虎',
            Zodiac::Rabbit => '兔',
            Zodiac::Dragon => '龙',
            Zodiac::Snake => '蛇',
            Zodiac::Horse => '马',
            Zodiac::Goat => '羊',
            Zodiac::Monkey => '猴',
            Zodiac::Rooster => '鸡',
            Zodiac::Dog => '狗',
            Zodiac::Pig => '猪',
        }
    }
}

impl fmt::Display for Zodiac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Zodiac::Rat => "rat",
            Zodiac::Ox => "ox",
            Zodiac::Tiger => "tiger",
            Zodiac::Rabbit => "rabbit",
            Zodiac::Dragon => "dragon",
            Zodiac::Snake => "snake",
            Zodiac::Horse => "horse",
            Zodiac::Goat => "goat",
            Zodiac::Monkey => "monkey",
            Zodiac::Rooster => "rooster",
            Zodiac::Dog => "dog",
            Zodiac::Pig => "pig",
        };
        f.write_str(name)
    }
}
