//! Zodiac-year boundary analysis for estimated (predue) birth dates.
//!
//! An estimated due date with a week uncertainty becomes a millisecond date
//! range. When that range lies near a zodiac-year crossover the analyzer
//! splits probability across the two zodiac years by elapsed time on each
//! side, and reports both scenarios when the minority side is material.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::calendar::{
    date_to_millis, days_in_month, lunar_new_year, lunar_year_of, millis_to_date, Zodiac, DAY_MS,
};
use crate::core::config::{PredueConfig, ZodiacBoundaryModel};

/// Confidence scale applied to the majority probability.
const DETERMINED_CONFIDENCE: f64 = 0.95;

/// Estimated birth information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredueInfo {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    /// Estimated day; the month midpoint is used when absent
    #[serde(default)]
    pub day: Option<u32>,
    /// Uncertainty in weeks either side of the estimate
    #[serde(default)]
    pub week_offset: Option<u32>,
}

/// Terminal outcome of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredueOutcome {
    SingleZodiac,
    CrossZodiac,
    Uncertain,
}

/// How downstream layers should combine zodiac contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynthesisStrategy {
    /// One zodiac context applies
    SingleContext,
    /// Evaluate every candidate under both zodiac contexts and report both
    EvaluateBoth,
    /// No zodiac constraint; stay neutral on zodiac-dependent dimensions
    Conservative,
}

/// Probability of each side of the crossover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilitySplit {
    pub previous: f64,
    pub next: f64,
}

impl ProbabilitySplit {
    pub fn minority(&self) -> f64 {
        self.previous.min(self.next)
    }
}

/// Millisecond range of the estimated birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl DateRange {
    pub fn start_date(&self) -> Option<NaiveDate> {
        millis_to_date(self.start_ms)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        millis_to_date(self.end_ms)
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    fn spans_calendar_years(&self) -> bool {
        match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) => start.year() != end.year(),
            _ => false,
        }
    }

    /// Distance from the range to an instant; zero when inside.
    fn distance_to(&self, instant_ms: i64) -> i64 {
        if instant_ms < self.start_ms {
            self.start_ms - instant_ms
        } else if instant_ms > self.end_ms {
            instant_ms - self.end_ms
        } else {
            0
        }
    }
}

/// Zodiac-year crossing test result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZodiacBoundaryResult {
    pub crosses: bool,
    /// The zodiac before the crossover, or the only zodiac when not crossing
    pub previous_zodiac: Zodiac,
    pub next_zodiac: Option<Zodiac>,
    pub crossover_date: NaiveDate,
    pub probability: ProbabilitySplit,
}

/// Primary and fallback zodiac when both scenarios are material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualRecommendation {
    pub primary: Zodiac,
    pub primary_probability: f64,
    pub fallback: Zodiac,
    pub fallback_probability: f64,
}

/// A zodiac scenario and its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZodiacContext {
    pub zodiac: Zodiac,
    pub probability: f64,
}

/// Full analysis of a predue estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredueAnalysis {
    pub outcome: PredueOutcome,
    pub confidence: f64,
    /// Centre of the estimate
    pub center: Option<NaiveDate>,
    pub range: Option<DateRange>,
    pub boundary: Option<ZodiacBoundaryResult>,
    /// Split before collapsing to the majority zodiac
    pub raw_split: Option<ProbabilitySplit>,
    pub dual: Option<DualRecommendation>,
    pub strategy: SynthesisStrategy,
    pub contexts: Vec<ZodiacContext>,
    pub boundary_model: ZodiacBoundaryModel,
    pub warnings: Vec<String>,
}

impl PredueAnalysis {
    /// The single determined zodiac, if any.
    pub fn zodiac(&self) -> Option<Zodiac> {
        match self.outcome {
            PredueOutcome::SingleZodiac => self.contexts.first().map(|c| c.zodiac),
            _ => None,
        }
    }
}

/// Decides whether an estimated birth window straddles a zodiac year.
#[derive(Debug, Clone)]
pub struct PredueBoundaryAnalyzer {
    config: PredueConfig,
}

impl Default for PredueBoundaryAnalyzer {
    fn default() -> Self {
        Self::new(PredueConfig::default())
    }
}

impl PredueBoundaryAnalyzer {
    pub fn new(config: PredueConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredueConfig {
        &self.config
    }

    /// Analyze a predue estimate.
    pub fn analyze(&self, info: &PredueInfo) -> PredueAnalysis {
        let Some(year) = info.year else {
            return self.uncertain(vec![
                "Predue year is missing; zodiac cannot be derived".to_string()
            ]);
        };

        let weeks = info.week_offset.unwrap_or(self.config.default_week_offset);
        let mut warnings = Vec::new();

        let (center, range) = match info.month {
            Some(month) => {
                let Some(month_days) = days_in_month(year, month) else {
                    return self.uncertain(vec![format!(
                        "Predue month {month} is invalid; zodiac cannot be derived"
                    )]);
                };
                let day = match info.day {
                    Some(day) if (1..=month_days).contains(&day) => day,
                    Some(day) => {
                        warnings.push(format!(
                            "Predue day {day} is outside month {month}; using the month midpoint"
                        ));
                        month_days.div_ceil(2)
                    }
                    None => month_days.div_ceil(2),
                };
                let Some(center) = NaiveDate::from_ymd_opt(year, month, day) else {
                    return self.uncertain(vec![format!(
                        "Predue date {year}-{month}-{day} is invalid"
                    )]);
                };
                let center_ms = date_to_millis(center) + DAY_MS / 2;
                let half_width = i64::from(weeks) * 7 * DAY_MS;
                let range = DateRange {
                    start_ms: center_ms - half_width,
                    end_ms: center_ms + half_width,
                };
                (center, range)
            }
            None => {
                let (Some(first), Some(next_first)) = (
                    NaiveDate::from_ymd_opt(year, 1, 1),
                    year.checked_add(1)
                        .and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1)),
                ) else {
                    return self.uncertain(vec![format!("Predue year {year} is out of range")]);
                };
                warnings.push("Predue month is missing; the whole year is used as the range".to_string());
                let range = DateRange {
                    start_ms: date_to_millis(first),
                    end_ms: date_to_millis(next_first),
                };
                let center = NaiveDate::from_ymd_opt(year, 7, 1).unwrap_or(first);
                (center, range)
            }
        };

        let mut analysis = self.analyze_window(center, range, weeks);
        warnings.append(&mut analysis.warnings);
        analysis.warnings = warnings;
        analysis
    }

    /// Analyze an explicit date range, start inclusive and end exclusive.
    pub fn analyze_range(&self, start: NaiveDate, end: NaiveDate) -> PredueAnalysis {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        let range = DateRange {
            start_ms: date_to_millis(start),
            end_ms: date_to_millis(end),
        };
        let center = millis_to_date(range.start_ms + range.duration_ms() / 2).unwrap_or(start);
        let weeks = (range.duration_ms() / (14 * DAY_MS)).max(0) as u32;
        self.analyze_window(center, range, weeks)
    }

    /// Crossover date opening `year` under the configured model.
    pub fn crossover_for(&self, year: i32) -> Option<NaiveDate> {
        match self.config.boundary_model {
            ZodiacBoundaryModel::LunarNewYear => lunar_new_year(year),
            ZodiacBoundaryModel::GregorianNewYear => NaiveDate::from_ymd_opt(year, 1, 1),
        }
    }

    /// Zodiac year containing `date` under the configured model.
    fn zodiac_year_of(&self, date: NaiveDate) -> i32 {
        match self.config.boundary_model {
            ZodiacBoundaryModel::LunarNewYear => lunar_year_of(date),
            ZodiacBoundaryModel::GregorianNewYear => date.year(),
        }
    }

    /// Crossover nearest to `center`, with the year it opens.
    fn nearest_crossover(&self, center: NaiveDate) -> Option<(i32, NaiveDate)> {
        let center_ms = date_to_millis(center);
        (center.year() - 1..=center.year() + 1)
            .filter_map(|year| self.crossover_for(year).map(|date| (year, date)))
            .min_by_key(|(_, date)| (date_to_millis(*date) - center_ms).abs())
    }

    fn analyze_window(&self, center: NaiveDate, range: DateRange, weeks: u32) -> PredueAnalysis {
        let mut warnings = Vec::new();

        let Some((mut crossover_year, mut crossover)) = self.nearest_crossover(center) else {
            return self.uncertain(vec![format!(
                "No zodiac crossover could be computed near {center}"
            )]);
        };
        warnings.push(self.approximation_warning(crossover));

        // A window spanning 1 January but missing the lunar crossover is split
        // at the civil year boundary.
        if let Some(civil) = self.civil_crossover(&range, crossover) {
            warnings.push(format!(
                "Estimated birth window spans the calendar year boundary ({civil}) but not the \
                 lunar new year ({crossover}); probabilities are split at 1 January"
            ));
            crossover_year = civil.year();
            crossover = civil;
        }

        let crossover_ms = date_to_millis(crossover);
        let scaled_window = i64::from(self.config.boundary_window_days) * DAY_MS
            * i64::from(weeks.max(1))
            / i64::from(self.config.default_week_offset.max(1));
        let is_candidate = range.spans_calendar_years()
            || range.distance_to(crossover_ms) <= scaled_window;

        if !is_candidate {
            let zodiac = Zodiac::for_lunar_year(self.zodiac_year_of(center));
            debug!(%center, %zodiac, "predue window far from any zodiac boundary");
            return self.single(zodiac, center, range, crossover, None, warnings);
        }

        let split = Self::probability_split(&range, crossover_ms);
        let previous = Zodiac::for_lunar_year(crossover_year - 1);
        let next = Zodiac::for_lunar_year(crossover_year);

        if split.minority() > self.config.materiality_threshold {
            let (primary, primary_probability, fallback, fallback_probability) =
                if split.next > split.previous {
                    (next, split.next, previous, split.previous)
                } else {
                    (previous, split.previous, next, split.next)
                };
            info!(
                %previous,
                %next,
                previous_probability = split.previous,
                next_probability = split.next,
                "predue window straddles a zodiac boundary"
            );
            warnings.push(format!(
                "Estimated birth window straddles the {previous}/{next} zodiac boundary \
                 ({:.0}% / {:.0}%); candidates are evaluated under both",
                split.previous * 100.0,
                split.next * 100.0
            ));

            return PredueAnalysis {
                outcome: PredueOutcome::CrossZodiac,
                confidence: DETERMINED_CONFIDENCE * primary_probability,
                center: Some(center),
                range: Some(range),
                boundary: Some(ZodiacBoundaryResult {
                    crosses: true,
                    previous_zodiac: previous,
                    next_zodiac: Some(next),
                    crossover_date: crossover,
                    probability: split,
                }),
                raw_split: Some(split),
                dual: Some(DualRecommendation {
                    primary,
                    primary_probability,
                    fallback,
                    fallback_probability,
                }),
                strategy: SynthesisStrategy::EvaluateBoth,
                contexts: vec![
                    ZodiacContext {
                        zodiac: primary,
                        probability: primary_probability,
                    },
                    ZodiacContext {
                        zodiac: fallback,
                        probability: fallback_probability,
                    },
                ],
                boundary_model: self.config.boundary_model,
                warnings,
            };
        }

        let majority = if split.next > split.previous { next } else { previous };
        if split.minority() > 0.0 {
            warnings.push(format!(
                "Estimated birth window touches the {previous}/{next} zodiac boundary; \
                 the minority side ({:.0}%) is below the materiality threshold",
                split.minority() * 100.0
            ));
        }
        self.single(majority, center, range, crossover, Some(split), warnings)
    }

    /// 1 January inside `range` when the model's own crossover lies outside it.
    fn civil_crossover(&self, range: &DateRange, crossover: NaiveDate) -> Option<NaiveDate> {
        if self.config.boundary_model != ZodiacBoundaryModel::LunarNewYear
            || !range.spans_calendar_years()
            || range.distance_to(date_to_millis(crossover)) == 0
        {
            return None;
        }
        let civil = NaiveDate::from_ymd_opt(range.end_date()?.year(), 1, 1)?;
        let civil_ms = date_to_millis(civil);
        (civil_ms > range.start_ms && civil_ms < range.end_ms).then_some(civil)
    }

    /// Share of the range on each side of the crossover, by elapsed time.
    fn probability_split(range: &DateRange, crossover_ms: i64) -> ProbabilitySplit {
        let next = if range.duration_ms() <= 0 {
            if range.start_ms >= crossover_ms {
                1.0
            } else {
                0.0
            }
        } else {
            ((range.end_ms - crossover_ms) as f64 / range.duration_ms() as f64).clamp(0.0, 1.0)
        };
        ProbabilitySplit {
            previous: 1.0 - next,
            next,
        }
    }

    fn single(
        &self,
        zodiac: Zodiac,
        center: NaiveDate,
        range: DateRange,
        crossover: NaiveDate,
        raw_split: Option<ProbabilitySplit>,
        warnings: Vec<String>,
    ) -> PredueAnalysis {
        let majority = raw_split.map_or(1.0, |split| split.previous.max(split.next));
        PredueAnalysis {
            outcome: PredueOutcome::SingleZodiac,
            confidence: DETERMINED_CONFIDENCE * majority,
            center: Some(center),
            range: Some(range),
            boundary: Some(ZodiacBoundaryResult {
                crosses: false,
                previous_zodiac: zodiac,
                next_zodiac: None,
                crossover_date: crossover,
                probability: ProbabilitySplit {
                    previous: 1.0,
                    next: 0.0,
                },
            }),
            raw_split,
            dual: None,
            strategy: SynthesisStrategy::SingleContext,
            contexts: vec![ZodiacContext {
                zodiac,
                probability: 1.0,
            }],
            boundary_model: self.config.boundary_model,
            warnings,
        }
    }

    fn uncertain(&self, mut warnings: Vec<String>) -> PredueAnalysis {
        warnings.push(
            "Zodiac-dependent analysis falls back to neutral scoring without a zodiac".to_string(),
        );
        PredueAnalysis {
            outcome: PredueOutcome::Uncertain,
            confidence: self.config.uncertain_confidence,
            center: None,
            range: None,
            boundary: None,
            raw_split: None,
            dual: None,
            strategy: SynthesisStrategy::Conservative,
            contexts: Vec::new(),
            boundary_model: self.config.boundary_model,
            warnings,
        }
    }

    fn approximation_warning(&self, crossover: NaiveDate) -> String {
        match self.config.boundary_model {
            ZodiacBoundaryModel::LunarNewYear => format!(
                "Zodiac crossover taken as the computed lunar new year ({crossover}); \
                 some traditions switch the zodiac at Start of Spring instead"
            ),
            ZodiacBoundaryModel::GregorianNewYear => format!(
                "Zodiac crossover approximated by 1 January ({crossover}); the actual lunar \
                 new year falls between 21 January and 20 February"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn gregorian() -> PredueBoundaryAnalyzer {
        PredueBoundaryAnalyzer::new(PredueConfig {
            boundary_model: ZodiacBoundaryModel::GregorianNewYear,
            ..PredueConfig::default()
        })
    }

    fn info(year: i32, month: u32, day: Option<u32>) -> PredueInfo {
        PredueInfo {
            year: Some(year),
            month: Some(month),
            day,
            week_offset: None,
        }
    }

    #[test]
    fn mid_year_estimate_is_single_zodiac() {
        let analysis = PredueBoundaryAnalyzer::default().analyze(&info(2025, 7, None));
        assert_eq!(analysis.outcome, PredueOutcome::SingleZodiac);
        assert_eq!(analysis.zodiac(), Some(Zodiac::Snake));
        let boundary = analysis.boundary.unwrap();
        assert!(!boundary.crosses);
        assert_eq!(boundary.probability.previous, 1.0);
        assert_eq!(boundary.probability.next, 0.0);
        assert!(analysis.raw_split.is_none());
        assert_eq!(analysis.strategy, SynthesisStrategy::SingleContext);
    }

    #[test]
    fn year_end_range_crosses_under_civil_year_model() {
        let analysis = gregorian().analyze_range(ymd(2024, 12, 28), ymd(2025, 1, 5));
        assert_eq!(analysis.outcome, PredueOutcome::CrossZodiac);
        let boundary = analysis.boundary.as_ref().unwrap();
        assert!(boundary.crosses);
        assert_eq!(boundary.previous_zodiac, Zodiac::Dragon);
        assert_eq!(boundary.next_zodiac, Some(Zodiac::Snake));
        assert!(boundary.probability.previous > 0.0);
        assert!(boundary.probability.next > 0.0);
        assert_relative_eq!(boundary.probability.next, 0.5);
        assert_eq!(analysis.strategy, SynthesisStrategy::EvaluateBoth);
    }

    #[test]
    fn year_end_estimate_with_default_weeks_crosses_under_civil_year_model() {
        let analysis = gregorian().analyze(&info(2024, 12, Some(31)));
        assert_eq!(analysis.outcome, PredueOutcome::CrossZodiac);
        let split = analysis.boundary.unwrap().probability;
        assert!(split.previous > 0.3 && split.next > 0.3);
    }

    #[test]
    fn lunar_new_year_window_crosses_under_lunar_model() {
        // Lunar new year 2026 falls on 17 February.
        let analysis = PredueBoundaryAnalyzer::default().analyze(&info(2026, 2, Some(17)));
        assert_eq!(analysis.outcome, PredueOutcome::CrossZodiac);
        let boundary = analysis.boundary.as_ref().unwrap();
        assert_eq!(boundary.crossover_date, ymd(2026, 2, 17));
        assert_eq!(boundary.previous_zodiac, Zodiac::Snake);
        assert_eq!(boundary.next_zodiac, Some(Zodiac::Horse));

        let dual = analysis.dual.unwrap();
        assert_eq!(dual.primary, Zodiac::Horse);
        assert_eq!(dual.fallback, Zodiac::Snake);
        assert!(dual.primary_probability >= dual.fallback_probability);
        assert_eq!(analysis.contexts.len(), 2);
    }

    #[test]
    fn year_end_range_crosses_with_default_config() {
        let analysis =
            PredueBoundaryAnalyzer::default().analyze_range(ymd(2024, 12, 28), ymd(2025, 1, 5));
        assert_eq!(analysis.outcome, PredueOutcome::CrossZodiac);
        let boundary = analysis.boundary.as_ref().unwrap();
        assert_eq!(boundary.crossover_date, ymd(2025, 1, 1));
        assert_eq!(boundary.previous_zodiac, Zodiac::Dragon);
        assert_eq!(boundary.next_zodiac, Some(Zodiac::Snake));
        assert!(boundary.probability.previous > 0.0);
        assert!(boundary.probability.next > 0.0);
        assert!(analysis
            .warnings
            .iter()
            .any(|w| w.contains("calendar year boundary")));
    }

    #[test]
    fn year_end_estimate_with_default_weeks_crosses_with_default_config() {
        let analysis = PredueBoundaryAnalyzer::default().analyze(&info(2024, 12, Some(31)));
        assert_eq!(analysis.outcome, PredueOutcome::CrossZodiac);
        let split = analysis.boundary.unwrap().probability;
        assert!(split.previous > 0.3 && split.next > 0.3);
        assert_eq!(analysis.strategy, SynthesisStrategy::EvaluateBoth);
    }

    #[test]
    fn lunar_crossover_inside_a_year_spanning_range_wins() {
        let analysis =
            PredueBoundaryAnalyzer::default().analyze_range(ymd(2024, 12, 20), ymd(2025, 2, 10));
        let boundary = analysis.boundary.unwrap();
        assert_eq!(boundary.crossover_date, ymd(2025, 1, 29));
    }

    #[test]
    fn unbounded_year_without_month_is_uncertain() {
        let analysis = PredueBoundaryAnalyzer::default().analyze(&PredueInfo {
            year: Some(i32::MAX),
            ..PredueInfo::default()
        });
        assert_eq!(analysis.outcome, PredueOutcome::Uncertain);
        assert!(analysis.warnings.iter().any(|w| w.contains("out of range")));
    }

    #[test]
    fn immaterial_minority_collapses_to_majority_zodiac() {
        // Centre a week after lunar new year 2025 (29 January): 75% on the snake side.
        let analysis = PredueBoundaryAnalyzer::default().analyze(&info(2025, 2, Some(5)));
        assert_eq!(analysis.outcome, PredueOutcome::SingleZodiac);
        assert_eq!(analysis.zodiac(), Some(Zodiac::Snake));
        let raw = analysis.raw_split.unwrap();
        assert!(raw.previous > 0.0 && raw.previous <= 0.3);
        let boundary = analysis.boundary.unwrap();
        assert_eq!(boundary.probability.previous, 1.0);
        assert!(analysis.warnings.iter().any(|w| w.contains("materiality")));
    }

    #[test]
    fn missing_year_is_uncertain() {
        let analysis = PredueBoundaryAnalyzer::default().analyze(&PredueInfo {
            month: Some(3),
            ..PredueInfo::default()
        });
        assert_eq!(analysis.outcome, PredueOutcome::Uncertain);
        assert_relative_eq!(analysis.confidence, 0.3);
        assert_eq!(analysis.strategy, SynthesisStrategy::Conservative);
        assert!(analysis.contexts.is_empty());
        assert!(analysis.zodiac().is_none());
    }

    #[test]
    fn invalid_month_is_uncertain_with_warning() {
        let analysis = PredueBoundaryAnalyzer::default().analyze(&info(2025, 13, None));
        assert_eq!(analysis.outcome, PredueOutcome::Uncertain);
        assert!(analysis.warnings.iter().any(|w| w.contains("month 13")));
    }

    #[test]
    fn missing_month_uses_whole_year() {
        let analysis = PredueBoundaryAnalyzer::default().analyze(&PredueInfo {
            year: Some(2025),
            ..PredueInfo::default()
        });
        assert_eq!(analysis.outcome, PredueOutcome::SingleZodiac);
        assert_eq!(analysis.zodiac(), Some(Zodiac::Snake));
        assert!(analysis.warnings.iter().any(|w| w.contains("whole year")));
    }

    #[test]
    fn every_result_carries_an_approximation_warning() {
        let analyzer = PredueBoundaryAnalyzer::default();
        for estimate in [info(2025, 7, None), info(2026, 2, Some(17))] {
            let analysis = analyzer.analyze(&estimate);
            assert!(analysis.warnings.iter().any(|w| w.contains("crossover")));
        }
    }

    #[test]
    fn wider_uncertainty_shrinks_the_majority() {
        let analyzer = PredueBoundaryAnalyzer::default();
        let narrow = analyzer.analyze(&PredueInfo {
            week_offset: Some(1),
            ..info(2025, 2, Some(5))
        });
        let wide = analyzer.analyze(&PredueInfo {
            week_offset: Some(4),
            ..info(2025, 2, Some(5))
        });
        let narrow_prev = narrow.raw_split.map_or(0.0, |s| s.previous);
        let wide_prev = wide.raw_split.map_or(0.0, |s| s.previous);
        assert!(wide_prev > narrow_prev);
    }

    proptest! {
        #[test]
        fn probability_split_sums_to_one(
            year in 1950i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            weeks in 0u32..=6,
            civil in any::<bool>(),
        ) {
            let analyzer = if civil { gregorian() } else { PredueBoundaryAnalyzer::default() };
            let analysis = analyzer.analyze(&PredueInfo {
                year: Some(year),
                month: Some(month),
                day: Some(day),
                week_offset: Some(weeks),
            });
            let boundary = analysis.boundary.expect("valid dates always analyze");
            let sum = boundary.probability.previous + boundary.probability.next;
            prop_assert!((sum - 1.0).abs() < 1e-9);
            if !boundary.crosses {
                prop_assert_eq!(boundary.probability.previous, 1.0);
                prop_assert_eq!(boundary.probability.next, 0.0);
            }
            if let Some(raw) = analysis.raw_split {
                prop_assert!((raw.previous + raw.next - 1.0).abs() < 1e-9);
            }
            let context_sum: f64 = analysis.contexts.iter().map(|c| c.probability).sum();
            prop_assert!((context_sum - 1.0).abs() < 1e-9);
        }
    }
}
