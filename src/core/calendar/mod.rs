//! Chinese calendar primitives.
//!
//! Stems, branches, the five elements and the zodiac are closed enums with
//! compile-time rule tables. Astronomical helpers compute solar terms and the
//! lunar new year so zodiac boundaries are derived rather than assumed.

pub mod astronomy;
pub mod elements;
pub mod pillars;

pub use astronomy::{
    date_from_jdn, date_to_millis, days_in_month, julian_day_number, lunar_new_year,
    lunar_year_of, millis_to_date, solar_term_date, DAY_MS,
};
pub use elements::{
    EarthlyBranch, Element, ElementRelation, GanZhi, HeavenlyStem, RadicalAffinity, Season,
    Zodiac,
};
pub use pillars::{season_branch_of, FourPillars};
