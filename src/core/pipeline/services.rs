use std::sync::Arc;

use indexmap::IndexSet;

use super::request::{is_ideograph, PoetrySource};
use crate::core::config::QimingConfig;
use crate::core::data::DataStore;
use crate::core::predue::PredueBoundaryAnalyzer;
use crate::core::scoring::ScoringEngine;

/// Service supplying the broad pool of candidate given-name characters.
pub trait CandidateSource: Send + Sync {
    /// Short description used in logs and reports.
    fn label(&self) -> String;

    /// Candidate characters in preference order, without duplicates.
    fn candidates(&self) -> Vec<char>;

    /// Title of the classical text the characters come from, if any.
    fn poetry_title(&self) -> Option<&str> {
        None
    }
}

/// Default pool: the name characters shipped with the data store.
#[derive(Debug, Clone)]
pub struct DataStorePool {
    store: Arc<DataStore>,
}

impl DataStorePool {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }

    pub fn shared(store: Arc<DataStore>) -> Arc<dyn CandidateSource> {
        Arc::new(Self::new(store))
    }
}

impl CandidateSource for DataStorePool {
    fn label(&self) -> String {
        "data store".to_string()
    }

    fn candidates(&self) -> Vec<char> {
        self.store.name_pool().to_vec()
    }
}

/// Characters handed over by an external poetry collaborator. They arrive
/// already cleaned; only non-ideographs and duplicates are dropped here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoetrySet {
    title: String,
    characters: Vec<char>,
}

impl PoetrySet {
    pub fn new(title: impl Into<String>, characters: impl IntoIterator<Item = char>) -> Self {
        let characters: IndexSet<char> = characters.into_iter().filter(|ch| is_ideograph(*ch)).collect();
        Self {
            title: title.into(),
            characters: characters.into_iter().collect(),
        }
    }
}

impl From<&PoetrySource> for PoetrySet {
    fn from(source: &PoetrySource) -> Self {
        Self::new(source.title.clone(), source.characters.iter().copied())
    }
}

impl CandidateSource for PoetrySet {
    fn label(&self) -> String {
        format!("poetry: {}", self.title)
    }

    fn candidates(&self) -> Vec<char> {
        self.characters.clone()
    }

    fn poetry_title(&self) -> Option<&str> {
        Some(&self.title)
    }
}

/// Process-wide immutable services shared by every request.
#[derive(Clone)]
pub struct PipelineServices {
    pub store: Arc<DataStore>,
    pub candidate_source: Arc<dyn CandidateSource>,
    pub predue: Arc<PredueBoundaryAnalyzer>,
    pub scoring: Arc<ScoringEngine>,
}

impl PipelineServices {
    pub fn from_config(config: &QimingConfig, store: Arc<DataStore>) -> Self {
        Self {
            candidate_source: DataStorePool::shared(Arc::clone(&store)),
            store,
            predue: Arc::new(PredueBoundaryAnalyzer::new(config.predue.clone())),
            scoring: Arc::new(ScoringEngine::new(config.scoring.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poetry_set_drops_duplicates_and_punctuation() {
        let set = PoetrySet::new("关雎", "窈窕淑女，君子好逑。淑".chars());
        assert_eq!(set.candidates(), "窈窕淑女君子好逑".chars().collect::<Vec<_>>());
        assert_eq!(set.poetry_title(), Some("关雎"));
        assert_eq!(set.label(), "poetry: 关雎");
    }

    #[test]
    fn data_store_pool_uses_store_pool() {
        let store = Arc::new(DataStore::builtin());
        let pool = DataStorePool::new(Arc::clone(&store));
        assert_eq!(pool.candidates(), store.name_pool().to_vec());
        assert!(pool.poetry_title().is_none());
    }
}
