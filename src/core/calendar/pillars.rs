//! Four pillars (bazi) of a birth moment.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::astronomy::{julian_day_number, solar_longitude_at_cst, solar_term_date};
use super::elements::{EarthlyBranch, Element, GanZhi, HeavenlyStem};

/// Solar longitude of the Start of Spring, where the pillar year turns.
const START_OF_SPRING: f64 = 315.0;

/// Year, month, day and (optionally) hour pillars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FourPillars {
    pub year: GanZhi,
    pub month: GanZhi,
    pub day: GanZhi,
    /// Absent when the birth hour is unknown
    pub hour: Option<GanZhi>,
}

impl FourPillars {
    /// Compute the pillars for a China Standard Time birth moment.
    pub fn from_birth(date: NaiveDate, hour: Option<u32>, minute: Option<u32>) -> Self {
        let clock_hour = hour.unwrap_or(12);
        let clock_minute = minute.unwrap_or(0);

        let year = year_pillar(date, clock_hour, clock_minute);
        let month = month_pillar(date, clock_hour, clock_minute, year.stem);
        let day = day_pillar(date);
        let hour = hour.map(|h| hour_pillar(day.stem, h));

        Self {
            year,
            month,
            day,
            hour,
        }
    }

    /// The day master: the stem of the day pillar.
    pub fn day_master(&self) -> HeavenlyStem {
        self.day.stem
    }

    /// All pillars in year-month-day-hour order.
    pub fn pillars(&self) -> Vec<GanZhi> {
        let mut pillars = vec![self.year, self.month, self.day];
        pillars.extend(self.hour);
        pillars
    }

    /// Element occurrences across every stem and branch, indexed like
    /// [`Element::ALL`].
    pub fn element_counts(&self) -> [u32; 5] {
        let mut counts = [0u32; 5];
        for pillar in self.pillars() {
            counts[pillar.stem.element().index()] += 1;
            counts[pillar.branch.element().index()] += 1;
        }
        counts
    }

    /// Number of characters the pillars contribute (6 or 8).
    pub fn character_count(&self) -> u32 {
        if self.hour.is_some() {
            8
        } else {
            6
        }
    }

    /// Season-ruling element of the month branch.
    pub fn season_element(&self) -> Element {
        self.month.branch.season().element()
    }
}

fn year_pillar(date: NaiveDate, hour: u32, minute: u32) -> GanZhi {
    let mut year = date.year();
    let before_spring = match solar_term_date(year, START_OF_SPRING) {
        Some(spring) if date < spring => true,
        Some(spring) if date == spring => {
            let longitude = solar_longitude_at_cst(date, hour, minute);
            (270.0..START_OF_SPRING).contains(&longitude)
        }
        _ => false,
    };
    if before_spring {
        year -= 1;
    }
    GanZhi::from_cycle_index(i64::from(year) - 4)
}

/// Month branch from the sun's position: each sectional term adds 30
/// degrees starting at the Start of Spring (寅 month).
fn month_branch(date: NaiveDate, hour: u32, minute: u32) -> EarthlyBranch {
    let longitude = solar_longitude_at_cst(date, hour, minute);
    let steps_from_yin = ((longitude - START_OF_SPRING).rem_euclid(360.0) / 30.0).floor() as i64;
    EarthlyBranch::from_index(2 + steps_from_yin)
}

/// Five-tigers rule: the 寅 month stem follows from the year stem.
fn month_pillar(date: NaiveDate, hour: u32, minute: u32, year_stem: HeavenlyStem) -> GanZhi {
    let branch = month_branch(date, hour, minute);
    let yin_stem = (year_stem.index() as i64 % 5) * 2 + 2;
    let offset = (branch.index() as i64 - 2).rem_euclid(12);
    GanZhi {
        stem: HeavenlyStem::from_index(yin_stem + offset),
        branch,
    }
}

/// Day pillar from the Julian day number (2000-01-01 is 戊午).
fn day_pillar(date: NaiveDate) -> GanZhi {
    GanZhi::from_cycle_index(julian_day_number(date) + 49)
}

/// Five-rats rule: the 子 hour stem follows from the day stem.
fn hour_pillar(day_stem: HeavenlyStem, hour: u32) -> GanZhi {
    let branch = EarthlyBranch::from_index(i64::from((hour + 1) / 2));
    let zi_stem = (day_stem.index() as i64 % 5) * 2;
    GanZhi {
        stem: HeavenlyStem::from_index(zi_stem + branch.index() as i64),
        branch,
    }
}

/// Month branch of a CST calendar date, used for estimated births.
pub fn season_branch_of(date: NaiveDate) -> EarthlyBranch {
    month_branch(date, 12, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_pillar_reference_dates() {
        assert_eq!(day_pillar(ymd(2000, 1, 1)).to_string(), "戊午");
        assert_eq!(day_pillar(ymd(2025, 10, 31)).to_string(), "癸酉");
    }

    #[test]
    fn pillars_for_late_october_2025() {
        let pillars = FourPillars::from_birth(ymd(2025, 10, 31), Some(10), Some(0));
        assert_eq!(pillars.year.to_string(), "乙巳");
        assert_eq!(pillars.month.to_string(), "丙戌");
        assert_eq!(pillars.day.to_string(), "癸酉");
        assert_eq!(pillars.hour.map(|h| h.to_string()), Some("丁巳".to_string()));
        assert_eq!(pillars.day_master(), HeavenlyStem::Gui);
        assert_eq!(pillars.character_count(), 8);
        assert_eq!(pillars.element_counts().iter().sum::<u32>(), 8);
    }

    #[test]
    fn year_pillar_turns_at_start_of_spring() {
        assert_eq!(
            FourPillars::from_birth(ymd(2025, 2, 1), Some(8), None).year.to_string(),
            "甲辰"
        );
        assert_eq!(
            FourPillars::from_birth(ymd(2025, 2, 10), Some(8), None).year.to_string(),
            "乙巳"
        );
    }

    #[test]
    fn missing_hour_yields_three_pillars() {
        let pillars = FourPillars::from_birth(ymd(2025, 6, 15), None, None);
        assert!(pillars.hour.is_none());
        assert_eq!(pillars.pillars().len(), 3);
        assert_eq!(pillars.character_count(), 6);
        assert_eq!(pillars.month.branch, EarthlyBranch::Wu);
    }

    #[test]
    fn late_night_hour_maps_to_zi_branch() {
        let pillars = FourPillars::from_birth(ymd(2025, 6, 15), Some(23), Some(30));
        assert_eq!(pillars.hour.map(|h| h.branch), Some(EarthlyBranch::Zi));
    }
}
