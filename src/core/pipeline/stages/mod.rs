//! Layer plugin implementations.
//!
//! Each stage module holds one layer of the naming pipeline:
//! - Basic info (surname, gender, birth time)
//! - Destiny (useful elements)
//! - Selection strategy (per-position element weights)
//! - Character filtering
//! - Name combination
//! - Comprehensive scoring

pub mod basic_info_stage;
pub mod combination_stage;
pub mod destiny_stage;
pub mod filtering_stage;
pub mod scoring_stage;
pub mod strategy_stage;

pub use basic_info_stage::*;
pub use combination_stage::*;
pub use destiny_stage::*;
pub use filtering_stage::*;
pub use scoring_stage::*;
pub use strategy_stage::*;
