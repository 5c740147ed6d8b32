//! Solar terms, new moons and the lunar new year.
//!
//! Instants are Julian days. Dates are exchanged as `chrono::NaiveDate` but all
//! arithmetic is done on day numbers and milliseconds so no calendar library
//! rules leak into the boundary math.
//!
//! Precision: the solar longitude is good to roughly 0.01 degree and new moons
//! to about a minute, which places both within the right China Standard Time
//! day except when an event falls within minutes of local midnight.

use chrono::{Datelike, NaiveDate};

/// Milliseconds in one day.
pub const DAY_MS: i64 = 86_400_000;

/// Julian day of the Unix epoch (1970-01-01T00:00Z).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Offset between a Julian day number and `num_days_from_ce`.
const JDN_CE_OFFSET: i64 = 1_721_425;

/// China Standard Time offset from UTC, in days.
const CST_OFFSET_DAYS: f64 = 8.0 / 24.0;

const MEAN_TROPICAL_YEAR: f64 = 365.242_2;
const MEAN_SYNODIC_MONTH: f64 = 29.530_588_861;
const NEW_MOON_EPOCH_JDE: f64 = 2_451_550.097_66;

/// Milliseconds since the Unix epoch at UTC midnight of `date`.
pub fn date_to_millis(date: NaiveDate) -> i64 {
    (i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE) * DAY_MS
}

/// UTC calendar date containing the instant `millis`.
pub fn millis_to_date(millis: i64) -> Option<NaiveDate> {
    let days = millis.div_euclid(DAY_MS) + UNIX_EPOCH_DAYS_FROM_CE;
    NaiveDate::from_num_days_from_ce_opt(i32::try_from(days).ok()?)
}

/// Julian day of the instant `millis`.
pub fn millis_to_jd(millis: i64) -> f64 {
    millis as f64 / DAY_MS as f64 + UNIX_EPOCH_JD
}

/// Julian day number (noon-based day count) of a calendar date.
pub fn julian_day_number(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) + JDN_CE_OFFSET
}

/// Calendar date of a Julian day number.
pub fn date_from_jdn(jdn: i64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(i32::try_from(jdn - JDN_CE_OFFSET).ok()?)
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(julian_day_number(next) - julian_day_number(first)).ok()
}

/// Approximate TT - UT in days for modern years.
fn delta_t_days(year: f64) -> f64 {
    let t = year - 2000.0;
    (62.92 + 0.322_17 * t + 0.005_589 * t * t) / 86_400.0
}

fn normalize_degrees(value: f64) -> f64 {
    value.rem_euclid(360.0)
}

/// Apparent geocentric longitude of the sun at Julian ephemeris day `jde`.
pub fn solar_longitude(jde: f64) -> f64 {
    let t = (jde - 2_451_545.0) / 36_525.0;
    let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t).to_radians();
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();
    let omega = (125.04 - 1_934.136 * t).to_radians();
    normalize_degrees(l0 + c - 0.005_69 - 0.004_78 * omega.sin())
}

/// Instant (Julian ephemeris day) when the sun reaches `longitude` during
/// Gregorian `year`.
pub fn solar_term_jde(year: i32, longitude: f64) -> f64 {
    let offset = normalize_degrees(longitude - 280.0) / 360.0 * MEAN_TROPICAL_YEAR;
    let mut jde = 2_451_545.0 + f64::from(year - 2000) * MEAN_TROPICAL_YEAR + offset - 10.0;
    for _ in 0..8 {
        let delta = normalize_degrees(longitude - solar_longitude(jde) + 180.0) - 180.0;
        jde += delta / 360.0 * MEAN_TROPICAL_YEAR;
    }
    jde
}

/// Instant (Julian ephemeris day) of lunation `k`, counted from the new moon
/// of 2000-01-06.
pub fn new_moon_jde(k: i64) -> f64 {
    let k = k as f64;
    let t = k / 1_236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let jde = NEW_MOON_EPOCH_JDE + MEAN_SYNODIC_MONTH * k + 0.000_154_37 * t2
        - 0.000_000_150 * t3
        + 0.000_000_000_73 * t4;
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;
    let m = (2.553_4 + 29.105_356_70 * k - 0.000_001_4 * t2 - 0.000_000_11 * t3).to_radians();
    let mp = (201.564_3 + 385.816_935_28 * k + 0.010_758_2 * t2 + 0.000_012_38 * t3
        - 0.000_000_058 * t4)
        .to_radians();
    let f = (160.710_8 + 390.670_502_84 * k - 0.001_611_8 * t2 - 0.000_002_27 * t3
        + 0.000_000_011 * t4)
        .to_radians();
    let omega = (124.774_6 - 1.563_755_88 * k + 0.002_067_2 * t2 + 0.000_002_15 * t3).to_radians();

    let correction = -0.407_20 * mp.sin() + 0.172_41 * e * m.sin() + 0.016_08 * (2.0 * mp).sin()
        + 0.010_39 * (2.0 * f).sin()
        + 0.007_39 * e * (mp - m).sin()
        - 0.005_14 * e * (mp + m).sin()
        + 0.002_08 * e * e * (2.0 * m).sin()
        - 0.001_11 * (mp - 2.0 * f).sin()
        - 0.000_57 * (mp + 2.0 * f).sin()
        + 0.000_56 * e * (2.0 * mp + m).sin()
        - 0.000_42 * (3.0 * mp).sin()
        + 0.000_42 * e * (m + 2.0 * f).sin()
        + 0.000_38 * e * (m - 2.0 * f).sin()
        - 0.000_24 * e * (2.0 * mp - m).sin()
        - 0.000_17 * omega.sin()
        - 0.000_07 * (mp + 2.0 * m).sin()
        + 0.000_04 * (2.0 * mp - 2.0 * f).sin()
        + 0.000_04 * (3.0 * m).sin()
        + 0.000_03 * (mp + m - 2.0 * f).sin()
        + 0.000_03 * (2.0 * mp + 2.0 * f).sin()
        - 0.000_03 * (mp + m + 2.0 * f).sin()
        + 0.000_03 * (mp - m + 2.0 * f).sin()
        - 0.000_02 * (mp - m - 2.0 * f).sin()
        - 0.000_02 * (3.0 * mp + m).sin()
        + 0.000_02 * (4.0 * mp).sin();

    jde + correction
}

/// China Standard Time day number containing the ephemeris instant `jde`.
fn cst_day(jde: f64, year: i32) -> i64 {
    let jd_ut = jde - delta_t_days(f64::from(year));
    (jd_ut + 0.5 + CST_OFFSET_DAYS).floor() as i64
}

/// Lunation whose new moon opens the lunar month containing the December
/// solstice of `year` (the eleventh month).
fn eleventh_month_lunation(year: i32) -> i64 {
    let solstice = solar_term_jde(year, 270.0);
    let solstice_day = cst_day(solstice, year);
    let mut k = ((solstice - NEW_MOON_EPOCH_JDE) / MEAN_SYNODIC_MONTH).floor() as i64 + 1;
    while cst_day(new_moon_jde(k), year) > solstice_day {
        k -= 1;
    }
    while cst_day(new_moon_jde(k + 1), year) <= solstice_day {
        k += 1;
    }
    k
}

/// Whether the lunar month opened by lunation `k` contains a principal term
/// (a solar longitude that is a multiple of 30 degrees).
fn month_has_principal_term(k: i64, year: i32) -> bool {
    let start = cst_day(new_moon_jde(k), year);
    let end = cst_day(new_moon_jde(k + 1), year);
    let at_midnight = |day: i64| {
        let jd_ut = day as f64 - 0.5 - CST_OFFSET_DAYS;
        solar_longitude(jd_ut + delta_t_days(f64::from(year)))
    };
    (at_midnight(start) / 30.0).floor() != (at_midnight(end) / 30.0).floor()
}

/// Gregorian date of the lunar new year that opens lunar year `year`.
///
/// The new year is the second new moon after the one opening the solstice
/// month, moved one lunation later when the solstice-to-solstice year holds
/// thirteen months and the leap month falls right after the eleventh month.
pub fn lunar_new_year(year: i32) -> Option<NaiveDate> {
    let eleventh = eleventh_month_lunation(year - 1);
    let next_eleventh = eleventh_month_lunation(year);

    let mut offset = 2;
    if next_eleventh - eleventh == 13
        && (!month_has_principal_term(eleventh + 1, year)
            || !month_has_principal_term(eleventh + 2, year))
    {
        offset = 3;
    }

    date_from_jdn(cst_day(new_moon_jde(eleventh + offset), year))
}

/// Lunar year (for zodiac purposes) that contains `date`.
pub fn lunar_year_of(date: NaiveDate) -> i32 {
    match lunar_new_year(date.year()) {
        Some(new_year) if date < new_year => date.year() - 1,
        _ => date.year(),
    }
}

/// China Standard Time date on which the sun reaches `longitude` in `year`.
pub fn solar_term_date(year: i32, longitude: f64) -> Option<NaiveDate> {
    date_from_jdn(cst_day(solar_term_jde(year, longitude), year))
}

/// Solar longitude at a China Standard Time wall-clock instant.
pub fn solar_longitude_at_cst(date: NaiveDate, hour: u32, minute: u32) -> f64 {
    let local_ms = date_to_millis(date) + i64::from(hour) * 3_600_000 + i64::from(minute) * 60_000;
    let utc_ms = local_ms - 8 * 3_600_000;
    let jd_ut = millis_to_jd(utc_ms);
    solar_longitude(jd_ut + delta_t_days(f64::from(date.year())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn lunar_new_year_matches_published_dates() {
        let known = [
            (1985, ymd(1985, 2, 20)),
            (2006, ymd(2006, 1, 29)),
            (2020, ymd(2020, 1, 25)),
            (2021, ymd(2021, 2, 12)),
            (2022, ymd(2022, 2, 1)),
            (2023, ymd(2023, 1, 22)),
            (2024, ymd(2024, 2, 10)),
            (2025, ymd(2025, 1, 29)),
            (2026, ymd(2026, 2, 17)),
            (2033, ymd(2033, 1, 31)),
        ];
        for (year, expected) in known {
            assert_eq!(lunar_new_year(year), Some(expected), "year {year}");
        }
    }

    #[test]
    fn leap_month_after_eleventh_month_shifts_new_year() {
        assert_eq!(lunar_new_year(2034), Some(ymd(2034, 2, 19)));
    }

    #[test]
    fn lunar_year_switches_at_new_year() {
        assert_eq!(lunar_year_of(ymd(2025, 1, 28)), 2024);
        assert_eq!(lunar_year_of(ymd(2025, 1, 29)), 2025);
        assert_eq!(lunar_year_of(ymd(2025, 12, 31)), 2025);
    }

    #[test]
    fn start_of_spring_2025_is_february_third() {
        assert_eq!(solar_term_date(2025, 315.0), Some(ymd(2025, 2, 3)));
    }

    #[test]
    fn millisecond_date_math_round_trips() {
        let date = ymd(2025, 12, 28);
        let ms = date_to_millis(date);
        assert_eq!(millis_to_date(ms), Some(date));
        assert_eq!(millis_to_date(ms + DAY_MS - 1), Some(date));
        assert_eq!(millis_to_date(date_to_millis(ymd(1970, 1, 1))), Some(ymd(1970, 1, 1)));
        assert_eq!(date_to_millis(ymd(1970, 1, 2)), DAY_MS);
    }

    #[test]
    fn julian_day_number_of_j2000() {
        assert_eq!(julian_day_number(ymd(2000, 1, 1)), 2_451_545);
        assert_eq!(date_from_jdn(2_451_545), Some(ymd(2000, 1, 1)));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2025, 13), None);
    }
}
