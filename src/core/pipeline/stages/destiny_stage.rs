//! Layer 2: day-master strength and useful-element derivation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::calendar::{Element, ElementRelation, FourPillars, HeavenlyStem, Season};
use crate::core::pipeline::context::ExecutionContext;
use crate::core::pipeline::plugin::{
    Dependency, LayerPayload, NamingPlugin, PluginError, PluginId, PluginOutput,
};

/// Support minus drain beyond which the day master counts as strong or weak.
const STRENGTH_MARGIN: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayMasterStrength {
    Strong,
    Weak,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinyMode {
    /// Derived from the four pillars
    Full,
    /// Derived from the estimated season only
    Seasonal,
}

/// Favourable and unfavourable elements for the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyPayload {
    pub mode: DestinyMode,
    pub day_master: Option<HeavenlyStem>,
    pub day_master_element: Option<Element>,
    /// Occurrences indexed like `Element::ALL`
    pub element_counts: [u32; 5],
    pub strength: Option<DayMasterStrength>,
    /// Ordered, most useful first
    pub favorable: Vec<Element>,
    pub unfavorable: Vec<Element>,
    pub missing: Vec<Element>,
    pub season: Option<Season>,
}

/// Seasonal balance rules for estimated births: what to favour, given the
/// ruling season.
pub fn seasonal_preferences(season: Season) -> (Vec<Element>, Vec<Element>) {
    let favorable = match season {
        Season::Spring => vec![Element::Metal, Element::Fire],
        Season::Summer => vec![Element::Water, Element::Metal],
        Season::Autumn => vec![Element::Wood, Element::Fire],
        Season::Winter => vec![Element::Fire, Element::Wood],
    };
    (favorable, vec![season.element()])
}

/// Season contribution to the day master's support.
fn season_support(day_master: Element, season: Element) -> f64 {
    match day_master.relation_to(season) {
        ElementRelation::Same => 2.0,
        ElementRelation::GeneratedBy => 1.0,
        _ => -1.0,
    }
}

/// Classify the day master and derive the useful elements.
pub fn analyze_pillars(pillars: &FourPillars) -> DestinyPayload {
    let counts = pillars.element_counts();
    let day_master = pillars.day_master();
    let dm = day_master.element();
    let count = |e: Element| f64::from(counts[e.index()]);

    // the day stem itself is not counted as support
    let same = count(dm) - 1.0;
    let resource = count(dm.generated_by());
    let season = pillars.season_element();
    let support = same + resource + season_support(dm, season);
    let drain = count(dm.generates()) + count(dm.controls()) + count(dm.controlled_by());
    let balance = support - drain;

    let strength = if balance > STRENGTH_MARGIN {
        DayMasterStrength::Strong
    } else if balance < -STRENGTH_MARGIN {
        DayMasterStrength::Weak
    } else {
        DayMasterStrength::Balanced
    };

    let (favorable, unfavorable) = match strength {
        DayMasterStrength::Strong => (
            vec![dm.generates(), dm.controls(), dm.controlled_by()],
            vec![dm.generated_by(), dm],
        ),
        DayMasterStrength::Weak => (
            vec![dm.generated_by(), dm],
            vec![dm.controlled_by(), dm.controls(), dm.generates()],
        ),
        DayMasterStrength::Balanced => {
            let mut by_presence = Element::ALL;
            by_presence.sort_by_key(|e| (counts[e.index()], e.index()));
            (
                by_presence[..2].to_vec(),
                vec![by_presence[by_presence.len() - 1]],
            )
        }
    };

    let missing = Element::ALL
        .into_iter()
        .filter(|e| counts[e.index()] == 0)
        .collect();

    debug!(
        day_master = %day_master.as_char(),
        support,
        drain,
        ?strength,
        "day master classified"
    );

    DestinyPayload {
        mode: DestinyMode::Full,
        day_master: Some(day_master),
        day_master_element: Some(dm),
        element_counts: counts,
        strength: Some(strength),
        favorable,
        unfavorable,
        missing,
        season: Some(pillars.month.branch.season()),
    }
}

pub struct DestinyPlugin;

#[async_trait]
impl NamingPlugin for DestinyPlugin {
    fn id(&self) -> PluginId {
        PluginId::Destiny
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::required(PluginId::BirthTime)]
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<PluginOutput, PluginError> {
        let birth = context
            .birth_time()
            .ok_or_else(|| PluginError::skipped("birth time unavailable"))?;

        if let Some(pillars) = &birth.pillars {
            let payload = analyze_pillars(pillars);
            let confidence = if pillars.hour.is_some() { 0.9 } else { 0.75 };
            return Ok(PluginOutput::new(LayerPayload::Destiny(payload), confidence));
        }

        let Some(branch) = birth.season_branch else {
            return Err(PluginError::skipped(
                "birth time too uncertain for destiny analysis",
            ));
        };
        let season = branch.season();
        let (favorable, unfavorable) = seasonal_preferences(season);
        let payload = DestinyPayload {
            mode: DestinyMode::Seasonal,
            day_master: None,
            day_master_element: None,
            element_counts: [0; 5],
            strength: None,
            favorable,
            unfavorable,
            missing: Vec::new(),
            season: Some(season),
        };
        let warnings = vec![format!(
            "Destiny derived from the estimated {season:?} season only"
        )];
        Ok(PluginOutput::new(LayerPayload::Destiny(payload), 0.55).with_warnings(warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn water_day_master_in_fire_chart_is_weak() {
        // 乙巳 丙戌 癸酉 丁巳
        let date = NaiveDate::from_ymd_opt(2025, 10, 31).unwrap();
        let pillars = FourPillars::from_birth(date, Some(10), Some(0));
        let destiny = analyze_pillars(&pillars);

        assert_eq!(destiny.day_master, Some(HeavenlyStem::Gui));
        assert_eq!(destiny.element_counts, [1, 4, 1, 1, 1]);
        assert_eq!(destiny.strength, Some(DayMasterStrength::Weak));
        assert_eq!(destiny.favorable, vec![Element::Metal, Element::Water]);
        assert_eq!(
            destiny.unfavorable,
            vec![Element::Earth, Element::Fire, Element::Wood]
        );
        assert!(destiny.missing.is_empty());
        assert_eq!(destiny.season, Some(Season::Autumn));
    }

    #[test]
    fn favorable_and_unfavorable_never_overlap() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for offset in (0..366).step_by(7) {
            let date = start + chrono::Duration::days(offset);
            let destiny = analyze_pillars(&FourPillars::from_birth(date, Some(8), None));
            assert!(!destiny.favorable.is_empty());
            assert!(destiny
                .favorable
                .iter()
                .all(|e| !destiny.unfavorable.contains(e)));
        }
    }

    #[test]
    fn seasonal_table_avoids_ruling_element() {
        for season in [Season::Spring, Season::Summer, Season::Autumn, Season::Winter] {
            let (favorable, unfavorable) = seasonal_preferences(season);
            assert_eq!(unfavorable, vec![season.element()]);
            assert!(!favorable.contains(&season.element()));
        }
        assert_eq!(
            seasonal_preferences(Season::Winter).0,
            vec![Element::Fire, Element::Wood]
        );
    }
}
