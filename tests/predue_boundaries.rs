//! Zodiac boundary analysis through the public API.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use proptest::prelude::*;

use qiming_rs::core::config::{PredueConfig, ZodiacBoundaryModel};
use qiming_rs::core::predue::{PredueOutcome, SynthesisStrategy};
use qiming_rs::{PredueBoundaryAnalyzer, PredueInfo};

fn estimate(year: i32, month: u32, day: u32, weeks: u32) -> PredueInfo {
    PredueInfo {
        year: Some(year),
        month: Some(month),
        day: Some(day),
        week_offset: Some(weeks),
    }
}

#[test]
fn crossover_follows_the_configured_model() {
    let lunar = PredueBoundaryAnalyzer::default();
    let civil = PredueBoundaryAnalyzer::new(PredueConfig {
        boundary_model: ZodiacBoundaryModel::GregorianNewYear,
        ..PredueConfig::default()
    });

    assert_eq!(
        lunar.crossover_for(2026),
        NaiveDate::from_ymd_opt(2026, 2, 17)
    );
    assert_eq!(civil.crossover_for(2026), NaiveDate::from_ymd_opt(2026, 1, 1));
}

#[test]
fn dual_recommendation_orders_primary_first() {
    let analysis = PredueBoundaryAnalyzer::default().analyze(&estimate(2026, 2, 17, 2));
    assert_eq!(analysis.outcome, PredueOutcome::CrossZodiac);
    assert_eq!(analysis.strategy, SynthesisStrategy::EvaluateBoth);

    let dual = analysis.dual.unwrap();
    assert!(dual.primary_probability >= dual.fallback_probability);
    assert_relative_eq!(
        dual.primary_probability + dual.fallback_probability,
        1.0,
        epsilon = 1e-9
    );
}

#[test]
fn year_end_window_is_cross_zodiac_under_defaults() {
    let analyzer = PredueBoundaryAnalyzer::default();
    let range = analyzer.analyze_range(
        NaiveDate::from_ymd_opt(2024, 12, 28).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
    );
    let estimate = analyzer.analyze(&PredueInfo {
        year: Some(2024),
        month: Some(12),
        day: Some(31),
        week_offset: None,
    });

    for analysis in [range, estimate] {
        assert_eq!(analysis.outcome, PredueOutcome::CrossZodiac);
        let split = analysis.boundary.unwrap().probability;
        assert!(split.previous > 0.0 && split.next > 0.0);
    }
}

proptest! {
    #[test]
    fn split_always_sums_to_one(
        year in 2000i32..2040,
        month in 1u32..=12,
        day in 1u32..=28,
        weeks in 0u32..=6,
    ) {
        let analysis = PredueBoundaryAnalyzer::default().analyze(&estimate(year, month, day, weeks));
        prop_assert!(analysis.outcome != PredueOutcome::Uncertain);
        prop_assert!((0.0..=1.0).contains(&analysis.confidence));

        let boundary = analysis.boundary.unwrap();
        let total = boundary.probability.previous + boundary.probability.next;
        prop_assert!((total - 1.0).abs() < 1e-9);

        let context_total: f64 = analysis.contexts.iter().map(|c| c.probability).sum();
        prop_assert!((context_total - 1.0).abs() < 1e-9);
    }
}
