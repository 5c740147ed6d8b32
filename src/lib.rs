//! # Qiming-RS: Chinese Name Recommendation Engine
//!
//! Recommends Chinese given names for a family name and gender, optionally
//! guided by an exact birth moment or an estimated due date:
//!
//! - **Character Data**: Merged primary, stroke and pinyin tables with per-record confidence
//! - **Calendar**: Four pillars, solar terms and the astronomical lunar new year
//! - **Predue Analysis**: Zodiac-year boundary probabilities for estimated due dates
//! - **Layered Pipeline**: Six dependency-ordered layers from surname analysis to scoring
//! - **Scoring**: Six weighted dimensions with five-grid numerology and phonetics
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        API Layer                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Pipeline        │  Analysis        │  Data & Calendar      │
//! │                  │                  │                       │
//! │ • Executor       │ • Predue         │ • DataStore           │
//! │ • Plugins        │ • Scoring        │ • Resolver            │
//! │ • Context        │ • Numerology     │ • Four pillars        │
//! │ • Config         │ • Phonetics      │ • Lunar new year      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qiming_rs::{Gender, NamingEngine, NamingRequest, QimingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = NamingEngine::new(QimingConfig::default())?;
//!     let report = engine.recommend(NamingRequest::new("吴", Gender::Male)).await?;
//!
//!     if let Some(top) = report.top() {
//!         println!("{} scored {:.1}", top.full_name, top.composite);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Core naming engine modules
pub mod core {
    //! Core naming algorithms and data structures.

    pub mod calendar;
    pub mod config;
    pub mod data;
    pub mod errors;
    pub mod numerology;
    pub mod phonetics;
    pub mod pipeline;
    pub mod predue;
    pub mod scoring;
}

// Public API and engine interface
pub mod api {
    //! High-level API and engine interface.

    pub mod engine;
    pub mod results;
}

// Re-export primary types for convenience
pub use api::engine::NamingEngine;
pub use api::results::NamingReport;
pub use core::config::QimingConfig;
pub use core::errors::{QimingError, Result};
pub use core::pipeline::{BirthInfo, CertaintyLevel, Gender, NamingRequest, Preferences};
pub use core::predue::{PredueAnalysis, PredueBoundaryAnalyzer, PredueInfo};
