#![forbid(unsafe_code)]

//! Core domain model and progression logic for Liftlog.
//!
//! This crate provides:
//! - Domain types (programs, days, slots, stages, rules)
//! - Built-in program catalog and load-time validation
//! - Rule evaluation (the per-slot state machine)
//! - Full-history replay and series/stats extraction
//! - Boundary adapters (hydration, JSON loaders, CSV export)

pub mod types;
pub mod error;
pub mod schema;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod rules;
pub mod replay;
pub mod series;
pub mod hydrate;
pub mod results;
pub mod csv_export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use rules::{apply_result, round_to_step, seed_weight};
pub use replay::{current_states, replay};
pub use series::{calculate_stats, exercise_series, SeriesStats};
pub use hydrate::{hydrate_program, HydratedDay, HydratedSlot, HydrationOutcome};
pub use results::{load_program, load_result_log, load_start_weights};
pub use csv_export::write_series_csv;
