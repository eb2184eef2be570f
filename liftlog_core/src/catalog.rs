//! Built-in catalog of program definitions.
//!
//! This module provides the shipped strength programs and the load-time
//! validator that checks a definition's structural preconditions once,
//! before any replay runs.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
///
/// This function returns a reference to the pre-built catalog, avoiding
/// the overhead of rebuilding the program definitions on every operation.
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of shipped programs
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns
/// a cached reference. This function is retained for testing and custom
/// catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn build_default_catalog_internal() -> Catalog {
    let mut programs = HashMap::new();

    programs.insert("gzclp_4day".to_string(), gzclp_4day());
    programs.insert("lp_ab".to_string(), lp_ab());

    Catalog { programs }
}

fn stage(sets: u32, reps: u32) -> StageDefinition {
    StageDefinition { sets, reps }
}

fn exercise(id: &str, name: &str) -> (String, Exercise) {
    (
        id.to_string(),
        Exercise {
            id: id.to_string(),
            name: name.to_string(),
        },
    )
}

fn config_field(key: &str, label: &str, min: f64) -> ConfigField {
    ConfigField {
        key: key.to_string(),
        label: label.to_string(),
        min,
        step: 2.5,
    }
}

/// GZCLP-style T1 slot: 5x3 -> 6x2 -> 10x1, deload 10% after failing 10x1
fn t1_slot(day: &str, exercise_id: &str) -> ExerciseSlot {
    ExerciseSlot {
        id: format!("{}_{}_t1", day, exercise_id),
        exercise_id: exercise_id.to_string(),
        tier: Tier::T1,
        stages: vec![stage(5, 3), stage(6, 2), stage(10, 1)],
        on_success: ProgressionRule::AddWeight,
        on_mid_stage_fail: ProgressionRule::AdvanceStage,
        on_final_stage_fail: ProgressionRule::DeloadPercent { percent: 10.0 },
        start_weight_key: format!("{}_start", exercise_id),
        start_weight_multiplier: None,
    }
}

/// GZCLP-style T2 slot: 3x10 -> 3x8 -> 3x6 at 65% of the lift's start
fn t2_slot(day: &str, exercise_id: &str) -> ExerciseSlot {
    ExerciseSlot {
        id: format!("{}_{}_t2", day, exercise_id),
        exercise_id: exercise_id.to_string(),
        tier: Tier::T2,
        stages: vec![stage(3, 10), stage(3, 8), stage(3, 6)],
        on_success: ProgressionRule::AddWeight,
        on_mid_stage_fail: ProgressionRule::AdvanceStage,
        on_final_stage_fail: ProgressionRule::DeloadPercent { percent: 10.0 },
        start_weight_key: format!("{}_start", exercise_id),
        start_weight_multiplier: Some(0.65),
    }
}

/// GZCLP-style T3 slot: single 3x15 AMRAP stage; even a failed AMRAP
/// block moves up a small fixed amount instead of deloading
fn t3_slot(day: &str, exercise_id: &str) -> ExerciseSlot {
    ExerciseSlot {
        id: format!("{}_{}_t3", day, exercise_id),
        exercise_id: exercise_id.to_string(),
        tier: Tier::T3,
        stages: vec![stage(3, 15)],
        on_success: ProgressionRule::AddWeight,
        on_mid_stage_fail: ProgressionRule::AdvanceStage,
        on_final_stage_fail: ProgressionRule::AddWeightResetStage { amount: 2.5 },
        start_weight_key: format!("{}_start", exercise_id),
        start_weight_multiplier: None,
    }
}

/// Four-day GZCLP rotation: every main lift appears once as T1 and once
/// as T2 across the cycle
fn gzclp_4day() -> ProgramDefinition {
    ProgramDefinition {
        id: "gzclp_4day".to_string(),
        name: "GZCLP (4-day)".to_string(),
        cycle_length: 4,
        total_workouts: 48,
        workouts_per_week: 4,
        days: vec![
            ProgramDay {
                name: "A1".to_string(),
                slots: vec![
                    t1_slot("a1", "squat"),
                    t2_slot("a1", "bench"),
                    t3_slot("a1", "lat_pulldown"),
                ],
            },
            ProgramDay {
                name: "B1".to_string(),
                slots: vec![
                    t1_slot("b1", "ohp"),
                    t2_slot("b1", "deadlift"),
                    t3_slot("b1", "db_row"),
                ],
            },
            ProgramDay {
                name: "A2".to_string(),
                slots: vec![
                    t1_slot("a2", "bench"),
                    t2_slot("a2", "squat"),
                    t3_slot("a2", "lat_pulldown"),
                ],
            },
            ProgramDay {
                name: "B2".to_string(),
                slots: vec![
                    t1_slot("b2", "deadlift"),
                    t2_slot("b2", "ohp"),
                    t3_slot("b2", "db_row"),
                ],
            },
        ],
        config_fields: vec![
            config_field("squat_start", "Squat starting weight", 20.0),
            config_field("bench_start", "Bench press starting weight", 20.0),
            config_field("ohp_start", "Overhead press starting weight", 20.0),
            config_field("deadlift_start", "Deadlift starting weight", 40.0),
            config_field("lat_pulldown_start", "Lat pulldown starting weight", 10.0),
            config_field("db_row_start", "Dumbbell row starting weight", 5.0),
        ],
        weight_increments: [
            ("squat".to_string(), 5.0),
            ("deadlift".to_string(), 5.0),
            ("bench".to_string(), 2.5),
            ("ohp".to_string(), 2.5),
            ("lat_pulldown".to_string(), 2.5),
            ("db_row".to_string(), 2.5),
        ]
        .into_iter()
        .collect(),
        exercises: [
            exercise("squat", "Back Squat"),
            exercise("bench", "Bench Press"),
            exercise("ohp", "Overhead Press"),
            exercise("deadlift", "Deadlift"),
            exercise("lat_pulldown", "Lat Pulldown"),
            exercise("db_row", "Dumbbell Row"),
        ]
        .into_iter()
        .collect(),
    }
}

/// Two-day A/B linear progression: single 3x5 stage per lift, straight
/// add-on-success with a 10% deload on failure
fn lp_ab() -> ProgramDefinition {
    let lp_slot = |day: &str, exercise_id: &str, tier: Tier| ExerciseSlot {
        id: format!("{}_{}", day, exercise_id),
        exercise_id: exercise_id.to_string(),
        tier,
        stages: vec![stage(3, 5)],
        on_success: ProgressionRule::AddWeight,
        on_mid_stage_fail: ProgressionRule::AdvanceStage,
        on_final_stage_fail: ProgressionRule::DeloadPercent { percent: 10.0 },
        start_weight_key: format!("{}_start", exercise_id),
        start_weight_multiplier: None,
    };

    ProgramDefinition {
        id: "lp_ab".to_string(),
        name: "Linear Progression (A/B)".to_string(),
        cycle_length: 2,
        total_workouts: 36,
        workouts_per_week: 3,
        days: vec![
            ProgramDay {
                name: "Day A".to_string(),
                slots: vec![
                    lp_slot("a", "squat", Tier::T1),
                    lp_slot("a", "bench", Tier::T1),
                    lp_slot("a", "db_row", Tier::T2),
                ],
            },
            ProgramDay {
                name: "Day B".to_string(),
                slots: vec![
                    lp_slot("b", "squat", Tier::T1),
                    lp_slot("b", "ohp", Tier::T1),
                    lp_slot("b", "deadlift", Tier::T1),
                ],
            },
        ],
        config_fields: vec![
            config_field("squat_start", "Squat starting weight", 20.0),
            config_field("bench_start", "Bench press starting weight", 20.0),
            config_field("ohp_start", "Overhead press starting weight", 20.0),
            config_field("deadlift_start", "Deadlift starting weight", 40.0),
            config_field("db_row_start", "Dumbbell row starting weight", 5.0),
        ],
        weight_increments: [
            ("squat".to_string(), 5.0),
            ("deadlift".to_string(), 5.0),
            ("bench".to_string(), 2.5),
            ("ohp".to_string(), 2.5),
            ("db_row".to_string(), 2.5),
        ]
        .into_iter()
        .collect(),
        exercises: [
            exercise("squat", "Back Squat"),
            exercise("bench", "Bench Press"),
            exercise("ohp", "Overhead Press"),
            exercise("deadlift", "Deadlift"),
            exercise("db_row", "Dumbbell Row"),
        ]
        .into_iter()
        .collect(),
    }
}

impl ProgramDefinition {
    /// Validate a definition's structural preconditions
    ///
    /// Returns a list of validation errors, or empty Vec if valid. This is
    /// the schema-layer check that runs once at load time; the engine
    /// assumes a validated definition and fails fast if that assumption is
    /// violated.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.id.is_empty() {
            errors.push("Program has empty ID".to_string());
        }
        if self.name.is_empty() {
            errors.push(format!("Program '{}' has empty name", self.id));
        }
        if self.days.is_empty() {
            errors.push(format!("Program '{}' has no days", self.id));
        }
        if self.cycle_length == 0 {
            errors.push(format!("Program '{}' has zero cycle length", self.id));
        }
        if self.total_workouts < self.cycle_length {
            errors.push(format!(
                "Program '{}': total workouts {} < cycle length {}",
                self.id, self.total_workouts, self.cycle_length
            ));
        }

        let field_keys: HashSet<&str> =
            self.config_fields.iter().map(|f| f.key.as_str()).collect();
        for field in &self.config_fields {
            if field.step <= 0.0 {
                errors.push(format!(
                    "Program '{}': config field '{}' has non-positive step",
                    self.id, field.key
                ));
            }
            if field.min < 0.0 {
                errors.push(format!(
                    "Program '{}': config field '{}' has negative min",
                    self.id, field.key
                ));
            }
        }

        let mut seen_slot_ids = HashSet::new();
        for day in &self.days {
            if day.slots.is_empty() {
                errors.push(format!(
                    "Program '{}': day '{}' has no slots",
                    self.id, day.name
                ));
            }

            for slot in &day.slots {
                if !seen_slot_ids.insert(slot.id.as_str()) {
                    errors.push(format!(
                        "Program '{}': duplicate slot id '{}'",
                        self.id, slot.id
                    ));
                }
                if slot.stages.is_empty() {
                    errors.push(format!(
                        "Program '{}': slot '{}' has no stages",
                        self.id, slot.id
                    ));
                }
                if !field_keys.contains(slot.start_weight_key.as_str()) {
                    errors.push(format!(
                        "Program '{}': slot '{}' references missing config field '{}'",
                        self.id, slot.id, slot.start_weight_key
                    ));
                }
                if !self.weight_increments.contains_key(&slot.exercise_id) {
                    errors.push(format!(
                        "Program '{}': slot '{}' has no weight increment for '{}'",
                        self.id, slot.id, slot.exercise_id
                    ));
                }
                if !self.exercises.contains_key(&slot.exercise_id) {
                    errors.push(format!(
                        "Program '{}': slot '{}' references unknown exercise '{}'",
                        self.id, slot.id, slot.exercise_id
                    ));
                }
                if let Some(multiplier) = slot.start_weight_multiplier {
                    if multiplier <= 0.0 {
                        errors.push(format!(
                            "Program '{}': slot '{}' has non-positive start multiplier",
                            self.id, slot.id
                        ));
                    }
                }

                for (name, rule) in [
                    ("on_success", &slot.on_success),
                    ("on_mid_stage_fail", &slot.on_mid_stage_fail),
                    ("on_final_stage_fail", &slot.on_final_stage_fail),
                ] {
                    if let ProgressionRule::DeloadPercent { percent } = rule {
                        if *percent <= 0.0 || *percent >= 100.0 {
                            errors.push(format!(
                                "Program '{}': slot '{}' {} deload percent {} out of (0, 100)",
                                self.id, slot.id, name, percent
                            ));
                        }
                    }
                }

                // advance_stage can only run where a next stage exists;
                // wiring it as the final-stage rule can never be legal
                if slot.on_final_stage_fail == ProgressionRule::AdvanceStage {
                    errors.push(format!(
                        "Program '{}': slot '{}' uses advance_stage as on_final_stage_fail",
                        self.id, slot.id
                    ));
                }
                if slot.on_success == ProgressionRule::AdvanceStage {
                    errors.push(format!(
                        "Program '{}': slot '{}' uses advance_stage as on_success",
                        self.id, slot.id
                    ));
                }
            }
        }

        errors
    }
}

impl Catalog {
    /// Validate every program in the catalog
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, program) in &self.programs {
            if id != &program.id {
                errors.push(format!(
                    "Catalog key '{}' doesn't match program.id '{}'",
                    id, program.id
                ));
            }
            errors.extend(program.validate());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.programs.len(), 2);
        assert!(catalog.programs.contains_key("gzclp_4day"));
        assert!(catalog.programs.contains_key("lp_ab"));
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_cached_catalog_matches_built() {
        let cached = get_default_catalog();
        let built = build_default_catalog();
        assert_eq!(cached.programs.len(), built.programs.len());
    }

    #[test]
    fn test_gzclp_rotation_shape() {
        let catalog = build_default_catalog();
        let gzclp = &catalog.programs["gzclp_4day"];

        assert_eq!(gzclp.days.len(), 4);
        assert_eq!(gzclp.cycle_length, 4);
        assert!(gzclp.total_workouts >= gzclp.cycle_length);

        // Every day carries one slot of each tier
        for day in &gzclp.days {
            assert!(day.slots.iter().any(|s| s.tier == Tier::T1));
            assert!(day.slots.iter().any(|s| s.tier == Tier::T2));
            assert!(day.slots.iter().any(|s| s.tier == Tier::T3));
        }
    }

    #[test]
    fn test_validate_flags_missing_increment() {
        let mut program = gzclp_4day();
        program.weight_increments.remove("squat");

        let errors = program.validate();
        assert!(errors.iter().any(|e| e.contains("no weight increment")));
    }

    #[test]
    fn test_validate_flags_empty_stages() {
        let mut program = lp_ab();
        program.days[0].slots[0].stages.clear();

        let errors = program.validate();
        assert!(errors.iter().any(|e| e.contains("has no stages")));
    }

    #[test]
    fn test_validate_flags_bad_deload_percent() {
        let mut program = lp_ab();
        program.days[0].slots[0].on_final_stage_fail =
            ProgressionRule::DeloadPercent { percent: 100.0 };

        let errors = program.validate();
        assert!(errors.iter().any(|e| e.contains("out of (0, 100)")));
    }

    #[test]
    fn test_validate_flags_duplicate_slot_ids() {
        let mut program = lp_ab();
        let duplicate = program.days[0].slots[0].clone();
        program.days[1].slots.push(duplicate);

        let errors = program.validate();
        assert!(errors.iter().any(|e| e.contains("duplicate slot id")));
    }

    #[test]
    fn test_validate_flags_missing_config_field() {
        let mut program = lp_ab();
        program.config_fields.retain(|f| f.key != "squat_start");

        let errors = program.validate();
        assert!(errors.iter().any(|e| e.contains("missing config field")));
    }
}
