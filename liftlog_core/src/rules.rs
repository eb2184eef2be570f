//! Rule evaluation for slot progression.
//!
//! This module implements the per-slot state machine: given a slot's
//! current state and a single recorded outcome, apply exactly one of the
//! slot's transition rules and produce the next state.
//!
//! Dispatch policy:
//! - `Success` always applies `on_success`
//! - `Fail` below the final stage applies `on_mid_stage_fail`
//! - `Fail` on the final stage applies `on_final_stage_fail`
//!
//! An absent result is handled one level up (the replay skips the slot);
//! this module is only ever called with a recorded outcome.

use crate::{Error, ExerciseSlot, Outcome, ProgressionRule, Result, SlotState, StartWeights};
use std::collections::HashMap;

/// Round a weight to the nearest multiple of `step`, ties away from zero
///
/// Matches the granularity a physical plate system allows. Every rule that
/// computes a new weight from a formula (deload, multiplier-derived seed)
/// goes through this; rules that add a fixed increment do not, since the
/// increment is assumed already on-grid.
pub fn round_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Compute a slot's seed weight from the user's start weights
///
/// Seed = start value for the slot's config-field key, times the slot's
/// multiplier, rounded to `step`. A missing key is a data-integrity
/// problem the load-time validator should have caught.
pub fn seed_weight(slot: &ExerciseSlot, start_weights: &StartWeights, step: f64) -> Result<f64> {
    if step <= 0.0 {
        return Err(Error::MalformedDefinition(format!(
            "slot '{}' has non-positive step {}",
            slot.id, step
        )));
    }

    let base = start_weights.get(&slot.start_weight_key).ok_or_else(|| {
        Error::MalformedDefinition(format!(
            "slot '{}' references start weight '{}' which was not provided",
            slot.id, slot.start_weight_key
        ))
    })?;

    Ok(round_to_step(base * slot.multiplier(), step))
}

/// Apply a single recorded outcome to a slot's state
///
/// Pure: returns the next state without touching the inputs. Evaluation is
/// total over the closed rule set for a validated definition; any malformed
/// rule reference is a fatal error, never silently defaulted.
pub fn apply_result(
    slot: &ExerciseSlot,
    state: SlotState,
    outcome: Outcome,
    increments: &HashMap<String, f64>,
    step: f64,
) -> Result<SlotState> {
    if slot.stages.is_empty() {
        return Err(Error::MalformedDefinition(format!(
            "slot '{}' has no stages",
            slot.id
        )));
    }

    let final_stage = slot.stages.len() - 1;
    if state.stage > final_stage {
        return Err(Error::MalformedDefinition(format!(
            "slot '{}' state stage {} exceeds final stage {}",
            slot.id, state.stage, final_stage
        )));
    }

    let rule = match outcome {
        Outcome::Success => &slot.on_success,
        Outcome::Fail if state.stage < final_stage => &slot.on_mid_stage_fail,
        Outcome::Fail => &slot.on_final_stage_fail,
    };

    apply_rule(slot, state, rule, increments, step)
}

/// Apply one transition rule to a slot's state
fn apply_rule(
    slot: &ExerciseSlot,
    state: SlotState,
    rule: &ProgressionRule,
    increments: &HashMap<String, f64>,
    step: f64,
) -> Result<SlotState> {
    match rule {
        ProgressionRule::AddWeight => {
            let increment = increments.get(&slot.exercise_id).ok_or_else(|| {
                Error::MalformedDefinition(format!(
                    "no weight increment configured for exercise '{}'",
                    slot.exercise_id
                ))
            })?;
            tracing::debug!(
                slot = %slot.id,
                "add_weight: {} + {}",
                state.weight,
                increment
            );
            Ok(SlotState {
                weight: state.weight + increment,
                stage: state.stage,
            })
        }

        ProgressionRule::AdvanceStage => {
            // Dispatch guarantees this is only reached below the final
            // stage; a definition wiring advance_stage where it could run
            // off the ladder is malformed.
            if state.stage + 1 >= slot.stages.len() {
                return Err(Error::MalformedDefinition(format!(
                    "slot '{}' rule advance_stage would exceed final stage",
                    slot.id
                )));
            }
            tracing::debug!(slot = %slot.id, "advance_stage: {} -> {}", state.stage, state.stage + 1);
            Ok(SlotState {
                weight: state.weight,
                stage: state.stage + 1,
            })
        }

        ProgressionRule::DeloadPercent { percent } => {
            let weight = round_to_step(state.weight * (1.0 - percent / 100.0), step);
            tracing::debug!(
                slot = %slot.id,
                "deload_percent({}): {} -> {}, stage reset",
                percent,
                state.weight,
                weight
            );
            Ok(SlotState { weight, stage: 0 })
        }

        ProgressionRule::AddWeightResetStage { amount } => {
            tracing::debug!(
                slot = %slot.id,
                "add_weight_reset_stage: {} + {}, stage reset",
                state.weight,
                amount
            );
            Ok(SlotState {
                weight: state.weight + amount,
                stage: 0,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StageDefinition, Tier};

    fn test_slot(stages: usize) -> ExerciseSlot {
        ExerciseSlot {
            id: "d1_squat".into(),
            exercise_id: "squat".into(),
            tier: Tier::T1,
            stages: (0..stages)
                .map(|i| StageDefinition {
                    sets: 5 - i as u32,
                    reps: 3 + i as u32,
                })
                .collect(),
            on_success: ProgressionRule::AddWeight,
            on_mid_stage_fail: ProgressionRule::AdvanceStage,
            on_final_stage_fail: ProgressionRule::DeloadPercent { percent: 10.0 },
            start_weight_key: "squat_start".into(),
            start_weight_multiplier: None,
        }
    }

    fn increments() -> HashMap<String, f64> {
        let mut m = HashMap::new();
        m.insert("squat".to_string(), 5.0);
        m
    }

    #[test]
    fn test_round_to_step() {
        assert_eq!(round_to_step(63.0, 2.5), 62.5);
        assert_eq!(round_to_step(62.5, 2.5), 62.5); // grid point stays put
        assert_eq!(round_to_step(61.0, 2.5), 60.0);
        assert_eq!(round_to_step(61.3, 2.5), 62.5);
        // Ties round away from zero
        assert_eq!(round_to_step(61.25, 2.5), 62.5);
        assert_eq!(round_to_step(-61.25, 2.5), -62.5);
    }

    #[test]
    fn test_success_adds_increment() {
        let slot = test_slot(3);
        let state = SlotState {
            weight: 100.0,
            stage: 1,
        };

        let next = apply_result(&slot, state, Outcome::Success, &increments(), 2.5).unwrap();
        assert_eq!(next.weight, 105.0);
        assert_eq!(next.stage, 1); // stage untouched
    }

    #[test]
    fn test_mid_stage_fail_advances_stage() {
        let slot = test_slot(3);
        let state = SlotState {
            weight: 100.0,
            stage: 0,
        };

        let next = apply_result(&slot, state, Outcome::Fail, &increments(), 2.5).unwrap();
        assert_eq!(next.stage, 1);
        assert_eq!(next.weight, 100.0); // weight untouched
    }

    #[test]
    fn test_final_stage_fail_deloads_and_resets() {
        let slot = test_slot(3);
        let state = SlotState {
            weight: 70.0,
            stage: 2,
        };

        let next = apply_result(&slot, state, Outcome::Fail, &increments(), 2.5).unwrap();
        assert_eq!(next.weight, 62.5); // 70 * 0.9 = 63, rounded to 62.5
        assert_eq!(next.stage, 0);
    }

    #[test]
    fn test_two_stage_dispatch() {
        // Failing at stage 0 of a 2-stage slot must hit on_mid_stage_fail,
        // failing at stage 1 must hit on_final_stage_fail, never the reverse.
        let slot = test_slot(2);

        let mid = apply_result(
            &slot,
            SlotState {
                weight: 80.0,
                stage: 0,
            },
            Outcome::Fail,
            &increments(),
            2.5,
        )
        .unwrap();
        assert_eq!(mid.stage, 1);
        assert_eq!(mid.weight, 80.0);

        let fin = apply_result(
            &slot,
            SlotState {
                weight: 80.0,
                stage: 1,
            },
            Outcome::Fail,
            &increments(),
            2.5,
        )
        .unwrap();
        assert_eq!(fin.stage, 0);
        assert_eq!(fin.weight, 72.5); // 80 * 0.9 = 72, rounds up to 72.5
    }

    #[test]
    fn test_single_stage_fail_is_final() {
        // A single-stage slot never has a mid-stage failure
        let slot = test_slot(1);
        let state = SlotState {
            weight: 70.0,
            stage: 0,
        };

        let next = apply_result(&slot, state, Outcome::Fail, &increments(), 2.5).unwrap();
        assert_eq!(next.stage, 0);
        assert_eq!(next.weight, 62.5);
    }

    #[test]
    fn test_add_weight_reset_stage() {
        let mut slot = test_slot(3);
        slot.on_final_stage_fail = ProgressionRule::AddWeightResetStage { amount: 2.5 };
        let state = SlotState {
            weight: 40.0,
            stage: 2,
        };

        let next = apply_result(&slot, state, Outcome::Fail, &increments(), 2.5).unwrap();
        assert_eq!(next.weight, 42.5);
        assert_eq!(next.stage, 0);
    }

    #[test]
    fn test_missing_increment_is_malformed() {
        let mut slot = test_slot(3);
        slot.exercise_id = "front_squat".into();
        let state = SlotState {
            weight: 100.0,
            stage: 0,
        };

        let err = apply_result(&slot, state, Outcome::Success, &increments(), 2.5).unwrap_err();
        assert!(matches!(err, Error::MalformedDefinition(_)));
    }

    #[test]
    fn test_advance_past_final_stage_is_malformed() {
        // on_success wired to advance_stage on a single-stage slot can
        // never advance legally
        let mut slot = test_slot(1);
        slot.on_success = ProgressionRule::AdvanceStage;
        let state = SlotState {
            weight: 100.0,
            stage: 0,
        };

        let err = apply_result(&slot, state, Outcome::Success, &increments(), 2.5).unwrap_err();
        assert!(matches!(err, Error::MalformedDefinition(_)));
    }

    #[test]
    fn test_seed_weight_multiplier_and_rounding() {
        let mut slot = test_slot(3);
        slot.start_weight_multiplier = Some(0.85);

        let mut weights = StartWeights::new();
        weights.insert("squat_start".to_string(), 100.0);

        // 100 * 0.85 = 85, already on a 2.5 grid
        assert_eq!(seed_weight(&slot, &weights, 2.5).unwrap(), 85.0);

        weights.insert("squat_start".to_string(), 102.5);
        // 102.5 * 0.85 = 87.125 -> 87.5
        assert_eq!(seed_weight(&slot, &weights, 2.5).unwrap(), 87.5);
    }

    #[test]
    fn test_seed_weight_missing_key() {
        let slot = test_slot(3);
        let weights = StartWeights::new();

        let err = seed_weight(&slot, &weights, 2.5).unwrap_err();
        assert!(matches!(err, Error::MalformedDefinition(_)));
    }
}
