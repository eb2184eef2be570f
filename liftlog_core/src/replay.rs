//! Full-history replay of a program's result log.
//!
//! Current state is never persisted: it is always recomputed by replaying
//! the rule set over the stored result log from workout 0. That keeps the
//! displayed history derivable from (rules + raw results) alone, so the
//! rule set can be corrected or versioned without state migrations.

use crate::{
    rules, Error, ProgramDefinition, Result, ResultLog, SlotSnapshot, SlotState, StartWeights,
};
use std::collections::HashMap;

/// Replay the entire result log and return one snapshot per slot per
/// workout, in workout order
///
/// Each snapshot captures the slot's state *before* that workout's result
/// is applied, so a weight series shows what was attempted. Slot state
/// accumulates in an explicit per-slot map threaded through the fold;
/// nothing ambient, nothing persisted.
pub fn replay(
    definition: &ProgramDefinition,
    start_weights: &StartWeights,
    results: &ResultLog,
) -> Result<Vec<SlotSnapshot>> {
    let (snapshots, _) = replay_inner(definition, start_weights, results)?;
    Ok(snapshots)
}

/// Replay the entire result log and return the final state of every slot
/// that appeared
///
/// Callers wanting "current state" re-run the full replay; the engine is
/// pure, so this is idempotent and safe to run on every call.
pub fn current_states(
    definition: &ProgramDefinition,
    start_weights: &StartWeights,
    results: &ResultLog,
) -> Result<HashMap<String, SlotState>> {
    let (_, states) = replay_inner(definition, start_weights, results)?;
    Ok(states)
}

fn replay_inner(
    definition: &ProgramDefinition,
    start_weights: &StartWeights,
    results: &ResultLog,
) -> Result<(Vec<SlotSnapshot>, HashMap<String, SlotState>)> {
    if definition.days.is_empty() {
        return Err(Error::MalformedDefinition(format!(
            "program '{}' has no days",
            definition.id
        )));
    }

    let mut states: HashMap<String, SlotState> = HashMap::new();
    let mut snapshots = Vec::new();

    for workout_index in 0..definition.total_workouts {
        let day = &definition.days[workout_index as usize % definition.days.len()];

        for slot in &day.slots {
            let step = definition.step_for(&slot.start_weight_key).ok_or_else(|| {
                Error::MalformedDefinition(format!(
                    "slot '{}' references config field '{}' which does not exist",
                    slot.id, slot.start_weight_key
                ))
            })?;

            // First appearance seeds the slot from the user's start weights
            let state = match states.get(&slot.id) {
                Some(state) => *state,
                None => {
                    let seeded = SlotState {
                        weight: rules::seed_weight(slot, start_weights, step)?,
                        stage: 0,
                    };
                    states.insert(slot.id.clone(), seeded);
                    seeded
                }
            };

            let recorded = results.get(workout_index, &slot.id);

            snapshots.push(SlotSnapshot {
                workout_index,
                day_name: day.name.clone(),
                slot_id: slot.id.clone(),
                exercise_id: slot.exercise_id.clone(),
                tier: slot.tier,
                stage_display: state.stage + 1,
                weight: state.weight,
                result: recorded.map(|r| r.result),
                amrap_reps: recorded.and_then(|r| r.amrap_reps),
                recorded_at: recorded.and_then(|r| r.recorded_at),
            });

            // Absent result: explicit no-op, the slot holds its state
            if let Some(recorded) = recorded {
                let next = rules::apply_result(
                    slot,
                    state,
                    recorded.result,
                    &definition.weight_increments,
                    step,
                )?;
                states.insert(slot.id.clone(), next);
            }
        }
    }

    tracing::debug!(
        program = %definition.id,
        workouts = definition.total_workouts,
        snapshots = snapshots.len(),
        "replay complete"
    );

    Ok((snapshots, states))
}
