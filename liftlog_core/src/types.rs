//! Core domain types for the Liftlog progression engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Program definitions (days, slots, stages, rules)
//! - Workout results and the result log
//! - Engine-internal slot state and replay snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Program Definition Types
// ============================================================================

/// Classification label for an exercise slot (display only, never evaluated
/// by progression rules)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    T1,
    T2,
    T3,
}

/// One rung of a slot's rep/set ladder
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageDefinition {
    pub sets: u32,
    pub reps: u32,
}

/// Transition rule applied to a slot's state after a recorded outcome
///
/// This is a closed set: new rule kinds are a deliberate, versioned schema
/// change, not a runtime extension point.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressionRule {
    /// Add the exercise's configured increment; stage unchanged
    AddWeight,
    /// Move to the next stage; weight unchanged
    AdvanceStage,
    /// Reduce weight by a percentage (rounded to the slot's step) and
    /// reset to the first stage
    DeloadPercent { percent: f64 },
    /// Add a fixed amount and reset to the first stage (AMRAP-style
    /// programs where failure still yields a net gain)
    AddWeightResetStage { amount: f64 },
}

/// A user-supplied starting value (e.g. a starting weight) with its
/// floor and rounding granularity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigField {
    pub key: String,
    pub label: String,
    pub min: f64,
    /// Rounding granularity for any formula-derived weight seeded from
    /// this field (the smallest plate jump the equipment allows)
    pub step: f64,
}

/// Exercise metadata, resolved lazily by the hydrator
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
}

/// One exercise's progression tracker within a program day
///
/// Each slot owns its own weight/stage state independent of other slots.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseSlot {
    /// Stable, unique within a definition
    pub id: String,
    pub exercise_id: String,
    pub tier: Tier,
    /// Non-empty, ordered rep/set ladder
    pub stages: Vec<StageDefinition>,
    pub on_success: ProgressionRule,
    pub on_mid_stage_fail: ProgressionRule,
    pub on_final_stage_fail: ProgressionRule,
    /// Key into the start-weights mapping for the seed value
    pub start_weight_key: String,
    /// Scalar applied to the seed value at workout 0 (default 1.0)
    pub start_weight_multiplier: Option<f64>,
}

impl ExerciseSlot {
    /// Multiplier applied to the seed value, defaulting to 1.0
    pub fn multiplier(&self) -> f64 {
        self.start_weight_multiplier.unwrap_or(1.0)
    }
}

/// One day of a program's rotation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramDay {
    pub name: String,
    pub slots: Vec<ExerciseSlot>,
}

/// A complete, immutable program definition
///
/// Authored and stored externally; the engine treats it as read-only input
/// and never mutates it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramDefinition {
    pub id: String,
    pub name: String,
    /// Number of workouts in one full day-rotation
    pub cycle_length: u32,
    /// Total workouts the program plans to track; always >= cycle_length
    pub total_workouts: u32,
    /// Scheduling hint only, never used by the engine's math
    pub workouts_per_week: u32,
    pub days: Vec<ProgramDay>,
    pub config_fields: Vec<ConfigField>,
    /// Increment applied on success, per exercise id
    pub weight_increments: HashMap<String, f64>,
    pub exercises: HashMap<String, Exercise>,
}

impl ProgramDefinition {
    /// Look up the rounding step for a slot via its config field
    pub fn step_for(&self, start_weight_key: &str) -> Option<f64> {
        self.config_fields
            .iter()
            .find(|f| f.key == start_weight_key)
            .map(|f| f.step)
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Outcome of one slot on one workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Fail,
}

/// A recorded result for one slot on one workout
///
/// `amrap_reps` and `recorded_at` are carried through for display; the
/// rule evaluator never reads them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SlotResult {
    pub result: Outcome,
    pub amrap_reps: Option<u32>,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl SlotResult {
    /// A bare outcome with no display extras
    pub fn of(result: Outcome) -> Self {
        Self {
            result,
            amrap_reps: None,
            recorded_at: None,
        }
    }
}

/// The full result history for one program instance, keyed by workout
/// index and slot id
///
/// Absent entries do not advance or mutate state; they are skipped during
/// replay but still occupy their workout-index position for series alignment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultLog {
    entries: HashMap<u32, HashMap<String, SlotResult>>,
}

impl ResultLog {
    pub fn new(entries: HashMap<u32, HashMap<String, SlotResult>>) -> Self {
        Self { entries }
    }

    /// Result for a slot at a workout index, if one was recorded
    pub fn get(&self, workout_index: u32, slot_id: &str) -> Option<&SlotResult> {
        self.entries.get(&workout_index).and_then(|m| m.get(slot_id))
    }

    /// Record a result (used by callers assembling a log in memory)
    pub fn record(&mut self, workout_index: u32, slot_id: impl Into<String>, result: SlotResult) {
        self.entries
            .entry(workout_index)
            .or_default()
            .insert(slot_id.into(), result);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(|m| m.len()).sum()
    }
}

/// User-supplied starting values, keyed by config-field key
pub type StartWeights = HashMap<String, f64>;

// ============================================================================
// Engine State and Snapshot Types
// ============================================================================

/// A slot's live progression state during a replay
///
/// Invariant: `0 <= stage < stages.len()` at all times. A transition that
/// would exceed the last stage is a final-stage failure by dispatch, never
/// an out-of-range index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotState {
    pub weight: f64,
    /// 0-based index into the slot's stages
    pub stage: usize,
}

/// State of one slot at one workout, captured *before* the workout's
/// result is applied
///
/// The pre-update capture is what makes the series show "what weight was
/// attempted" rather than the post-update value.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotSnapshot {
    pub workout_index: u32,
    pub day_name: String,
    pub slot_id: String,
    pub exercise_id: String,
    pub tier: Tier,
    /// 1-based stage number for display
    pub stage_display: usize,
    pub weight: f64,
    pub result: Option<Outcome>,
    pub amrap_reps: Option<u32>,
    pub recorded_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The built-in catalog of program definitions
#[derive(Clone, Debug)]
pub struct Catalog {
    pub programs: HashMap<String, ProgramDefinition>,
}
