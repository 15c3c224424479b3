#![forbid(unsafe_code)]

//! Core domain model and business logic for liftplan.
//!
//! This crate provides:
//! - Domain types (generation parameters, generated programs, catalog and routine records)
//! - Program generation (service client with a deterministic template fallback)
//! - Response normalization
//! - Reconciliation of generated programs into the catalog and routine stores
//! - Persistence (JSONL stores, CSV export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod templates;
pub mod fallback;
pub mod prompt;
pub mod normalize;
pub mod http;
pub mod generator;
pub mod grouping;
pub mod store;
pub mod reconcile;
pub mod export;

// Re-export commonly used types
pub use error::{Error, GenerationError, NormalizeError, Result};
pub use types::*;
pub use config::Config;
pub use fallback::fallback;
pub use prompt::build_prompt;
pub use normalize::normalize;
pub use generator::{GenerationOutcome, PendingProgram, ProgramGenerator, TextGenerator};
pub use grouping::ProgramGroupingKey;
pub use store::{
    ExerciseCatalogStore, JsonlCatalogStore, JsonlRoutineStore, MemoryCatalogStore,
    MemoryRoutineStore, ProgramSummary, RoutineStore,
};
pub use reconcile::{reconcile, reconcile_and_save};
