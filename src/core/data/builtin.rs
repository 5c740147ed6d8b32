//! Character snapshot compiled into the crate.
//!
//! Stroke counts in the traditional column follow the Kangxi convention used
//! by name numerology (氵 counts 4, 艹 counts 6, 王 as 玉 counts 5, 辶 counts 7).

use super::{DataSnapshot, GenderAffinity, PinyinEntry, Polarity, PrimaryEntry, StrokeEntry};
use crate::core::calendar::Element::{self, Earth, Fire, Metal, Water, Wood};
use super::GenderAffinity::{Feminine as F, Masculine as M, Neutral as N};

/// (character, pinyin, tone, traditional strokes, modern strokes, element, radical)
type SurnameRow = (char, &'static str, u8, u32, u32, Element, &'static str);

/// (character, pinyin, tone, traditional strokes, modern strokes, element,
/// radical, meaning score, gender affinity)
type GivenRow = (
    char,
    &'static str,
    u8,
    u32,
    u32,
    Element,
    &'static str,
    f64,
    GenderAffinity,
);

const SURNAMES: &[SurnameRow] = &[
    ('吴', "wu", 2, 7, 7, Wood, "口"),
    ('李', "li", 3, 7, 7, Wood, "木"),
    ('王', "wang", 2, 4, 4, Earth, "王"),
    ('张', "zhang", 1, 11, 7, Fire, "弓"),
    ('刘', "liu", 2, 15, 6, Metal, "刂"),
    ('陈', "chen", 2, 16, 7, Fire, "阝"),
    ('杨', "yang", 2, 13, 7, Wood, "木"),
    ('赵', "zhao", 4, 14, 9, Fire, "走"),
    ('黄', "huang", 2, 12, 11, Earth, "黄"),
    ('周', "zhou", 1, 8, 8, Metal, "口"),
    ('徐', "xu", 2, 10, 10, Metal, "彳"),
    ('孙', "sun", 1, 10, 6, Water, "子"),
    ('马', "ma", 3, 10, 3, Water, "马"),
    ('朱', "zhu", 1, 6, 6, Wood, "木"),
    ('胡', "hu", 2, 11, 9, Earth, "月"),
    ('郭', "guo", 1, 15, 10, Wood, "阝"),
    ('何', "he", 2, 7, 7, Water, "亻"),
    ('高', "gao", 1, 10, 10, Wood, "高"),
    ('罗', "luo", 2, 20, 8, Fire, "罒"),
    ('欧', "ou", 1, 15, 8, Earth, "欠"),
    ('阳', "yang", 2, 17, 6, Earth, "阝"),
    ('司', "si", 1, 5, 5, Metal, "口"),
];

const GIVEN: &[GivenRow] = &[
    // wood
    ('林', "lin", 2, 8, 8, Wood, "木", 85.0, N),
    ('森', "sen", 1, 12, 12, Wood, "木", 75.0, M),
    ('楠', "nan", 2, 13, 13, Wood, "木", 82.0, N),
    ('桐', "tong", 2, 10, 10, Wood, "木", 80.0, N),
    ('杰', "jie", 2, 12, 8, Wood, "木", 88.0, M),
    ('荣', "rong", 2, 14, 9, Wood, "艹", 80.0, N),
    ('芳', "fang", 1, 10, 7, Wood, "艹", 78.0, F),
    ('若', "ruo", 4, 11, 8, Wood, "艹", 80.0, F),
    ('茂', "mao", 4, 11, 8, Wood, "艹", 80.0, M),
    ('嘉', "jia", 1, 14, 14, Wood, "口", 90.0, N),
    ('彦', "yan", 4, 9, 9, Wood, "彡", 86.0, M),
    ('柏', "bai", 3, 9, 9, Wood, "木", 84.0, M),
    ('梓', "zi", 3, 11, 11, Wood, "木", 85.0, N),
    ('萱', "xuan", 1, 15, 12, Wood, "艹", 84.0, F),
    ('雅', "ya", 3, 12, 12, Wood, "隹", 88.0, F),
    ('琳', "lin", 2, 13, 12, Wood, "王", 86.0, F),
    ('佳', "jia", 1, 8, 8, Wood, "亻", 86.0, F),
    // fire
    ('明', "ming", 2, 8, 8, Fire, "日", 88.0, N),
    ('晨', "chen", 2, 11, 11, Fire, "日", 82.0, N),
    ('昊', "hao", 4, 8, 8, Fire, "日", 86.0, M),
    ('晖', "hui", 1, 13, 10, Fire, "日", 84.0, M),
    ('煜', "yu", 4, 13, 13, Fire, "火", 86.0, M),
    ('志', "zhi", 4, 7, 7, Fire, "心", 86.0, M),
    ('德', "de", 2, 15, 15, Fire, "彳", 92.0, M),
    ('哲', "zhe", 2, 10, 10, Fire, "口", 88.0, M),
    ('瑶', "yao", 2, 15, 14, Fire, "王", 88.0, F),
    ('彤', "tong", 2, 7, 7, Fire, "彡", 80.0, F),
    ('昕', "xin", 1, 8, 8, Fire, "日", 84.0, N),
    ('烨', "ye", 4, 16, 10, Fire, "火", 82.0, M),
    ('宁', "ning", 2, 14, 5, Fire, "宀", 84.0, N),
    ('南', "nan", 2, 9, 9, Fire, "十", 78.0, N),
    // earth
    ('安', "an", 1, 6, 6, Earth, "宀", 88.0, N),
    ('宇', "yu", 3, 6, 6, Earth, "宀", 86.0, M),
    ('轩', "xuan", 1, 10, 7, Earth, "车", 84.0, M),
    ('远', "yuan", 3, 17, 7, Earth, "辶", 80.0, M),
    ('岳', "yue", 4, 8, 8, Earth, "山", 82.0, M),
    ('坤', "kun", 1, 8, 8, Earth, "土", 80.0, M),
    ('培', "pei", 2, 11, 11, Earth, "土", 78.0, N),
    ('恩', "en", 1, 10, 10, Earth, "心", 84.0, N),
    ('怡', "yi", 2, 9, 8, Earth, "忄", 84.0, F),
    ('磊', "lei", 3, 15, 15, Earth, "石", 80.0, M),
    ('婉', "wan", 3, 11, 11, Earth, "女", 82.0, F),
    ('佑', "you", 4, 7, 7, Earth, "亻", 84.0, N),
    ('圣', "sheng", 4, 13, 5, Earth, "土", 80.0, M),
    // metal
    ('铭', "ming", 2, 14, 11, Metal, "钅", 86.0, M),
    ('锐', "rui", 4, 15, 12, Metal, "钅", 80.0, M),
    ('钰', "yu", 4, 13, 10, Metal, "钅", 84.0, F),
    ('瑞', "rui", 4, 14, 13, Metal, "王", 88.0, N),
    ('思', "si", 1, 9, 9, Metal, "心", 86.0, N),
    ('诗', "shi", 1, 13, 8, Metal, "讠", 88.0, F),
    ('书', "shu", 1, 10, 4, Metal, "乙", 86.0, N),
    ('静', "jing", 4, 16, 14, Metal, "青", 84.0, F),
    ('秀', "xiu", 4, 7, 7, Metal, "禾", 82.0, F),
    ('舒', "shu", 1, 12, 12, Metal, "舌", 82.0, F),
    ('晟', "sheng", 4, 11, 11, Metal, "日", 84.0, M),
    ('新', "xin", 1, 13, 13, Metal, "斤", 82.0, N),
    ('钧', "jun", 1, 12, 9, Metal, "钅", 82.0, M),
    ('宸', "chen", 2, 10, 10, Metal, "宀", 84.0, M),
    // water
    ('泽', "ze", 2, 17, 8, Water, "氵", 88.0, M),
    ('涵', "han", 2, 12, 11, Water, "氵", 86.0, N),
    ('浩', "hao", 4, 11, 10, Water, "氵", 86.0, M),
    ('清', "qing", 1, 12, 11, Water, "氵", 86.0, N),
    ('润', "run", 4, 16, 10, Water, "氵", 82.0, N),
    ('沐', "mu", 4, 8, 7, Water, "氵", 80.0, N),
    ('雨', "yu", 3, 8, 8, Water, "雨", 78.0, F),
    ('文', "wen", 2, 4, 4, Water, "文", 90.0, N),
    ('博', "bo", 2, 12, 12, Water, "十", 88.0, M),
    ('航', "hang", 2, 10, 10, Water, "舟", 82.0, M),
    ('冰', "bing", 1, 6, 6, Water, "冫", 76.0, F),
    ('海', "hai", 3, 11, 10, Water, "氵", 84.0, M),
    ('淑', "shu", 1, 12, 11, Water, "氵", 84.0, F),
    ('源', "yuan", 2, 14, 13, Water, "氵", 84.0, N),
    ('子', "zi", 3, 3, 3, Water, "子", 80.0, N),
    ('霖', "lin", 2, 16, 16, Water, "雨", 84.0, N),
    ('鸿', "hong", 2, 17, 11, Water, "鸟", 86.0, M),
];

/// (character, pinyin, tone, traditional strokes, modern strokes, element, radical, meaning score)
const NEGATIVE: &[(char, &str, u8, u32, u32, Element, &str, f64)] = &[
    ('死', "si", 3, 6, 6, Water, "歹", 5.0),
    ('病', "bing", 4, 10, 10, Water, "疒", 5.0),
    ('凶', "xiong", 1, 4, 4, Water, "凵", 5.0),
    ('苦', "ku", 3, 11, 8, Wood, "艹", 15.0),
    ('哀', "ai", 1, 9, 9, Earth, "口", 10.0),
];

const CLASSICAL: &[(char, &str)] = &[
    ('嘉', "《诗经·豳风》其新孔嘉"),
    ('德', "《论语·为政》为政以德"),
    ('文', "《论语·八佾》郁郁乎文哉"),
    ('诗', "《论语·季氏》不学诗，无以言"),
    ('安', "《诗经·小雅》既安且宁"),
    ('宁', "《诗经·小雅》既安且宁"),
    ('若', "《楚辞·九歌》华采衣兮若英"),
    ('清', "《诗经·郑风》清扬婉兮"),
    ('婉', "《诗经·郑风》清扬婉兮"),
    ('思', "《诗经·大雅》思齐大任"),
    ('明', "《大学》在明明德"),
    ('泽', "《孟子·离娄》君子之泽"),
    ('博', "《论语·雍也》博学于文"),
    ('子', "《诗经·周南》之子于归"),
];

/// Partial primary rows: present in the enriched table but missing required fields.
fn partial_primary() -> Vec<PrimaryEntry> {
    let mut jun = PrimaryEntry::empty('珺');
    jun.element = Some(Wood);
    jun.radical = Some("王".to_string());
    jun.meaning_score = Some(86.0);
    jun.polarity = Some(Polarity::Positive);
    jun.gender_affinity = Some(F);
    vec![jun]
}

/// (character, traditional strokes, modern strokes, radical)
const STROKE_FALLBACK: &[(char, u32, u32, &str)] = &[
    ('翀', 16, 10, "羽"),
    ('珺', 13, 11, "王"),
    ('玥', 9, 8, "王"),
    ('彧', 10, 10, "彡"),
    ('堃', 11, 11, "土"),
    ('犇', 12, 12, "牛"),
];

const PINYIN_FALLBACK: &[(char, &str, u8)] = &[
    ('翀', "chong", 1),
    ('珺', "jun", 4),
    ('玥', "yue", 4),
    ('彧', "yu", 4),
    ('堃', "kun", 1),
];

fn surname_entry(row: &SurnameRow) -> PrimaryEntry {
    let &(character, pinyin, tone, traditional, modern, element, radical) = row;
    PrimaryEntry {
        character,
        traditional_strokes: Some(traditional),
        modern_strokes: Some(modern),
        element: Some(element),
        pinyin: Some(pinyin.to_string()),
        tone: Some(tone),
        radical: Some(radical.to_string()),
        is_standard: Some(true),
        meaning_score: None,
        polarity: Some(Polarity::Neutral),
        gender_affinity: Some(N),
        classical_source: None,
    }
}

fn given_entry(row: &GivenRow) -> PrimaryEntry {
    let &(character, pinyin, tone, traditional, modern, element, radical, meaning, gender) = row;
    let polarity = if meaning >= 80.0 {
        Polarity::Positive
    } else {
        Polarity::Neutral
    };
    PrimaryEntry {
        character,
        traditional_strokes: Some(traditional),
        modern_strokes: Some(modern),
        element: Some(element),
        pinyin: Some(pinyin.to_string()),
        tone: Some(tone),
        radical: Some(radical.to_string()),
        is_standard: Some(true),
        meaning_score: Some(meaning),
        polarity: Some(polarity),
        gender_affinity: Some(gender),
        classical_source: CLASSICAL
            .iter()
            .find(|(ch, _)| *ch == character)
            .map(|(_, source)| source.to_string()),
    }
}

/// Build the compiled-in snapshot.
pub fn snapshot() -> DataSnapshot {
    let mut primary: Vec<PrimaryEntry> = SURNAMES.iter().map(surname_entry).collect();
    primary.extend(GIVEN.iter().map(given_entry));
    primary.extend(NEGATIVE.iter().map(
        |&(character, pinyin, tone, traditional, modern, element, radical, meaning)| PrimaryEntry {
            character,
            traditional_strokes: Some(traditional),
            modern_strokes: Some(modern),
            element: Some(element),
            pinyin: Some(pinyin.to_string()),
            tone: Some(tone),
            radical: Some(radical.to_string()),
            is_standard: Some(true),
            meaning_score: Some(meaning),
            polarity: Some(Polarity::Negative),
            gender_affinity: Some(N),
            classical_source: None,
        },
    ));
    primary.extend(partial_primary());

    let strokes = STROKE_FALLBACK
        .iter()
        .map(|&(character, traditional, modern, radical)| StrokeEntry {
            character,
            traditional_strokes: Some(traditional),
            modern_strokes: Some(modern),
            radical: Some(radical.to_string()),
        })
        .collect();

    let pinyin = PINYIN_FALLBACK
        .iter()
        .map(|&(character, pinyin, tone)| PinyinEntry {
            character,
            pinyin: pinyin.to_string(),
            tone: Some(tone),
        })
        .collect();

    let mut name_pool: Vec<char> = GIVEN.iter().map(|row| row.0).collect();
    name_pool.extend(NEGATIVE.iter().map(|row| row.0));
    name_pool.extend(STROKE_FALLBACK.iter().map(|row| row.0));

    DataSnapshot {
        primary,
        strokes,
        pinyin,
        name_pool,
    }
}
