//! Definition hydration: attach display names to bare exercise ids.
//!
//! Hydration failure is a status value, not an error: the progression
//! math only needs ids, so a caller that cannot resolve a name degrades
//! to showing the raw id instead of losing the whole definition.

use crate::{ProgramDefinition, StageDefinition, Tier};

/// A display-ready slot with its exercise name resolved
#[derive(Clone, Debug, PartialEq)]
pub struct HydratedSlot {
    pub slot_id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub tier: Tier,
    pub stages: Vec<StageDefinition>,
}

/// A display-ready day
#[derive(Clone, Debug, PartialEq)]
pub struct HydratedDay {
    pub name: String,
    pub slots: Vec<HydratedSlot>,
}

/// Result of hydrating a definition
#[derive(Clone, Debug, PartialEq)]
pub enum HydrationOutcome {
    Hydrated(Vec<HydratedDay>),
    /// One or more exercise ids had no entry in the definition's
    /// exercise map; `missing` lists them (deduplicated, sorted)
    Failed { missing: Vec<String> },
}

/// Resolve every slot's exercise id into a display name
pub fn hydrate_program(definition: &ProgramDefinition) -> HydrationOutcome {
    let mut missing: Vec<String> = Vec::new();
    let mut days = Vec::new();

    for day in &definition.days {
        let mut slots = Vec::new();
        for slot in &day.slots {
            match definition.exercises.get(&slot.exercise_id) {
                Some(exercise) => slots.push(HydratedSlot {
                    slot_id: slot.id.clone(),
                    exercise_id: slot.exercise_id.clone(),
                    exercise_name: exercise.name.clone(),
                    tier: slot.tier,
                    stages: slot.stages.clone(),
                }),
                None => {
                    if !missing.contains(&slot.exercise_id) {
                        missing.push(slot.exercise_id.clone());
                    }
                }
            }
        }
        days.push(HydratedDay {
            name: day.name.clone(),
            slots,
        });
    }

    if missing.is_empty() {
        HydrationOutcome::Hydrated(days)
    } else {
        missing.sort();
        tracing::warn!(
            program = %definition.id,
            "hydration failed, unresolvable exercises: {:?}",
            missing
        );
        HydrationOutcome::Failed { missing }
    }
}
