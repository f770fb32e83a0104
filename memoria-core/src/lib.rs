//! # memoria-core
//!
//! Foundation crate for the tiered memory retrieval and learning engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;
pub mod wilson;

// Re-export the most commonly used types at the crate root.
pub use config::EngineConfig;
pub use errors::{CortexError, CortexResult};
pub use models::{MemoryItem, Tier};
