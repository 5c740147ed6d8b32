//! Naming Pipeline Module
//!
//! This module provides the layered naming pipeline, which turns a
//! [`NamingRequest`] into ranked name candidates.
//!
//! ## Key Components
//!
//! - **PipelineExecutor**: Runs the plugins layer by layer with dependency gating
//! - **ExecutionContext**: Per-request state shared read-only with plugins
//! - **NamingPlugin**: The contract every layer plugin implements
//! - **Pipeline Results**: Outcome, per-plugin results and the final recommendation
//!
//! ## Pipeline Layers
//!
//! 1. **Basic info**: Surname, gender and birth time, run concurrently
//! 2. **Destiny**: Day-master strength and favourable elements
//! 3. **Selection strategy**: Per-position element weights
//! 4. **Character filter**: Staged candidate pool filtering
//! 5. **Name combination**: Cross-product with pre-ranking
//! 6. **Comprehensive scoring**: Six-dimension scoring and ranking
//!
//! ## Usage
//!
//! ```ignore
//! use qiming_rs::core::pipeline::{Gender, NamingRequest, PipelineExecutor};
//!
//! let executor = PipelineExecutor::new(QimingConfig::default(), Arc::new(DataStore::builtin()));
//! let outcome = executor.execute(NamingRequest::new("吴", Gender::Male)).await;
//! println!("Best name: {:?}", outcome.top_candidate().map(|c| &c.full_name));
//! ```

pub use context::{ExecutionContext, ExecutionLog, LogLevel};
pub use pipeline_executor::PipelineExecutor;
pub use pipeline_results::{FinalRecommendation, PipelineOutcome};
pub use plugin::{
    Dependency, DependencyKind, LayerPayload, NamingPlugin, PluginError, PluginId, PluginOutput,
    PluginResult, PluginStatus,
};
pub use request::{
    is_ideograph, BirthInfo, CertaintyLevel, Gender, NamingRequest, PoetrySource, Preferences,
};
pub use services::{CandidateSource, DataStorePool, PipelineServices, PoetrySet};

mod context;
mod pipeline_executor;
mod pipeline_results;
pub mod plugin;
pub mod request;
mod services;
pub mod stages;
