//! Layer 1: surname, gender and birth-time analysis.
//!
//! The three plugins have no dependencies on each other and are driven
//! concurrently by the executor.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::calendar::{lunar_year_of, season_branch_of, EarthlyBranch, FourPillars, Zodiac};
use crate::core::data::{CharacterRecord, GenderAffinity};
use crate::core::pipeline::context::ExecutionContext;
use crate::core::pipeline::plugin::{
    LayerPayload, NamingPlugin, PluginError, PluginId, PluginOutput,
};
use crate::core::pipeline::request::{CertaintyLevel, Gender};
use crate::core::predue::{PredueAnalysis, PredueOutcome, ZodiacContext};

/// Resolved surname.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurnamePayload {
    pub surname: String,
    pub characters: Vec<char>,
    pub records: Vec<Arc<CharacterRecord>>,
    pub total_strokes: u32,
    pub last_strokes: u32,
    pub compound: bool,
}

pub struct SurnamePlugin;

#[async_trait]
impl NamingPlugin for SurnamePlugin {
    fn id(&self) -> PluginId {
        PluginId::Surname
    }

    fn is_required(&self) -> bool {
        true
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<PluginOutput, PluginError> {
        let characters = context
            .request()
            .surname_chars()
            .map_err(|err| PluginError::failed(err.to_string()))?;

        let records = context.resolver().resolve_all(characters.iter().copied());
        if let Some(missing) = records.iter().find(|r| r.is_unresolved()) {
            return Err(PluginError::failed(format!(
                "surname character '{}' is not in any character table",
                missing.character
            )));
        }

        let mut warnings = Vec::new();
        for record in records.iter().filter(|r| r.traditional_strokes.is_none()) {
            warnings.push(format!(
                "surname character '{}' has no traditional stroke count; grid numerology will be neutral",
                record.character
            ));
        }

        let confidence = records.iter().map(|r| r.confidence).fold(1.0_f64, f64::min);
        let payload = SurnamePayload {
            surname: characters.iter().collect(),
            total_strokes: records.iter().map(|r| r.strokes()).sum(),
            last_strokes: records.last().map_or(0, |r| r.strokes()),
            compound: characters.len() == 2,
            characters,
            records,
        };
        debug!(surname = %payload.surname, strokes = payload.total_strokes, "surname resolved");

        Ok(PluginOutput::new(LayerPayload::Surname(payload), confidence).with_warnings(warnings))
    }
}

/// Gender and the character affinity it prefers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderPayload {
    pub gender: Gender,
    pub preferred_affinity: GenderAffinity,
    pub avoided_affinity: GenderAffinity,
}

pub struct GenderPlugin;

#[async_trait]
impl NamingPlugin for GenderPlugin {
    fn id(&self) -> PluginId {
        PluginId::Gender
    }

    fn is_required(&self) -> bool {
        true
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<PluginOutput, PluginError> {
        let gender = context.request().gender;
        let payload = GenderPayload {
            gender,
            preferred_affinity: gender.affinity(),
            avoided_affinity: gender.opposite_affinity(),
        };
        Ok(PluginOutput::new(LayerPayload::Gender(payload), 1.0))
    }
}

/// How the birth moment is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BirthMode {
    Exact,
    Estimated,
}

/// Birth-time analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthTimePayload {
    pub mode: BirthMode,
    /// Present for exact birth information
    pub pillars: Option<FourPillars>,
    pub zodiac_contexts: Vec<ZodiacContext>,
    /// Month branch of the (estimated) birth date
    pub season_branch: Option<EarthlyBranch>,
    pub certainty: CertaintyLevel,
    pub predue_outcome: Option<PredueOutcome>,
}

pub struct BirthTimePlugin;

impl BirthTimePlugin {
    fn from_predue(analysis: &PredueAnalysis) -> (BirthTimePayload, f64, Vec<String>) {
        let certainty = if analysis.outcome == PredueOutcome::Uncertain {
            CertaintyLevel::Unknown
        } else {
            CertaintyLevel::Estimated
        };
        let payload = BirthTimePayload {
            mode: BirthMode::Estimated,
            pillars: None,
            zodiac_contexts: analysis.contexts.clone(),
            season_branch: analysis.center.map(season_branch_of),
            certainty,
            predue_outcome: Some(analysis.outcome),
        };
        (payload, analysis.confidence, analysis.warnings.clone())
    }
}

#[async_trait]
impl NamingPlugin for BirthTimePlugin {
    fn id(&self) -> PluginId {
        PluginId::BirthTime
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<PluginOutput, PluginError> {
        let request = context.request();

        if let Some(birth) = &request.birth_info {
            let date = birth
                .date()
                .map_err(|err| PluginError::failed(err.to_string()))?;
            let pillars = FourPillars::from_birth(date, birth.hour, birth.minute);
            let zodiac = Zodiac::for_lunar_year(lunar_year_of(date));
            let (certainty, confidence) = if birth.has_time() {
                (CertaintyLevel::FullyDetermined, 1.0)
            } else {
                (CertaintyLevel::PartiallyDetermined, 0.85)
            };

            let mut warnings = Vec::new();
            if request.predue_info.is_some() {
                warnings.push(
                    "Exact birth information supplied; predue estimate ignored".to_string(),
                );
            }
            if !birth.has_time() {
                warnings.push("Birth hour unknown; hour pillar omitted".to_string());
            }

            debug!(%zodiac, pillars = ?pillars.pillars(), "birth pillars computed");
            let payload = BirthTimePayload {
                mode: BirthMode::Exact,
                season_branch: Some(pillars.month.branch),
                pillars: Some(pillars),
                zodiac_contexts: vec![ZodiacContext {
                    zodiac,
                    probability: 1.0,
                }],
                certainty,
                predue_outcome: None,
            };
            return Ok(
                PluginOutput::new(LayerPayload::BirthTime(payload), confidence)
                    .with_warnings(warnings),
            );
        }

        if let Some(analysis) = context.predue() {
            let (payload, confidence, warnings) = Self::from_predue(analysis);
            return Ok(
                PluginOutput::new(LayerPayload::BirthTime(payload), confidence)
                    .with_warnings(warnings),
            );
        }

        Err(PluginError::skipped(
            "no birth time or predue information supplied",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::QimingConfig;
    use crate::core::data::DataStore;
    use crate::core::pipeline::request::{BirthInfo, NamingRequest};
    use crate::core::pipeline::services::PipelineServices;
    use crate::core::predue::PredueInfo;
    use std::time::Duration;

    fn context(request: NamingRequest) -> ExecutionContext {
        let config = Arc::new(QimingConfig::default());
        let services = PipelineServices::from_config(&config, Arc::new(DataStore::builtin()));
        ExecutionContext::new("test", request, config, services, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn surname_resolves_compound() {
        let ctx = context(NamingRequest::new("欧阳", Gender::Male));
        let output = SurnamePlugin.execute(&ctx).await.unwrap();
        let LayerPayload::Surname(payload) = output.payload else {
            panic!("unexpected payload");
        };
        assert!(payload.compound);
        assert_eq!(payload.characters, vec!['欧', '阳']);
        assert_eq!(payload.total_strokes, 32);
        assert_eq!(payload.last_strokes, 17);
    }

    #[tokio::test]
    async fn invalid_surname_fails() {
        let ctx = context(NamingRequest::new("Smith", Gender::Male));
        let err = SurnamePlugin.execute(&ctx).await.unwrap_err();
        assert!(matches!(err, PluginError::Failed(_)));
    }

    #[tokio::test]
    async fn unknown_surname_character_fails() {
        let ctx = context(NamingRequest::new("龘", Gender::Male));
        assert!(SurnamePlugin.execute(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn exact_birth_is_fully_determined() {
        let request = NamingRequest::new("吴", Gender::Male).with_birth(BirthInfo {
            year: 2025,
            month: 10,
            day: 31,
            hour: Some(10),
            minute: Some(0),
        });
        let ctx = context(request);
        let output = BirthTimePlugin.execute(&ctx).await.unwrap();
        let LayerPayload::BirthTime(payload) = output.payload else {
            panic!("unexpected payload");
        };
        assert_eq!(payload.certainty, CertaintyLevel::FullyDetermined);
        assert_eq!(payload.mode, BirthMode::Exact);
        assert_eq!(payload.zodiac_contexts.len(), 1);
        assert_eq!(payload.zodiac_contexts[0].zodiac, Zodiac::Snake);
        assert_eq!(payload.pillars.unwrap().pillars().len(), 4);
    }

    #[tokio::test]
    async fn missing_hour_is_partially_determined() {
        let request = NamingRequest::new("吴", Gender::Female).with_birth(BirthInfo {
            year: 2025,
            month: 6,
            day: 15,
            hour: None,
            minute: None,
        });
        let output = BirthTimePlugin.execute(&context(request)).await.unwrap();
        let LayerPayload::BirthTime(payload) = output.payload else {
            panic!("unexpected payload");
        };
        assert_eq!(payload.certainty, CertaintyLevel::PartiallyDetermined);
        assert_eq!(payload.pillars.unwrap().pillars().len(), 3);
        assert!(!output.warnings.is_empty());
    }

    #[tokio::test]
    async fn predue_uses_preceding_analysis() {
        let request = NamingRequest::new("吴", Gender::Male).with_predue(PredueInfo {
            year: Some(2025),
            month: Some(6),
            day: None,
            week_offset: None,
        });
        let mut ctx = context(request.clone());
        let analysis = ctx
            .services()
            .predue
            .analyze(request.predue_info.as_ref().unwrap());
        ctx.set_predue(analysis);

        let output = BirthTimePlugin.execute(&ctx).await.unwrap();
        let LayerPayload::BirthTime(payload) = output.payload else {
            panic!("unexpected payload");
        };
        assert_eq!(payload.mode, BirthMode::Estimated);
        assert_eq!(payload.certainty, CertaintyLevel::Estimated);
        assert_eq!(payload.predue_outcome, Some(PredueOutcome::SingleZodiac));
        assert_eq!(payload.season_branch, Some(EarthlyBranch::Wu));
    }

    #[tokio::test]
    async fn no_birth_information_skips() {
        let ctx = context(NamingRequest::new("吴", Gender::Male));
        let err = BirthTimePlugin.execute(&ctx).await.unwrap_err();
        assert!(matches!(err, PluginError::Skipped(_)));
    }

    #[tokio::test]
    async fn invalid_birth_date_fails() {
        let request = NamingRequest::new("吴", Gender::Male).with_birth(BirthInfo {
            year: 2025,
            month: 2,
            day: 30,
            hour: None,
            minute: None,
        });
        let err = BirthTimePlugin.execute(&context(request)).await.unwrap_err();
        assert!(matches!(err, PluginError::Failed(_)));
    }
}
