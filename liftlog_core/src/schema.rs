//! Stored-JSON schema for program definitions and result logs.
//!
//! Definitions and results are persisted externally as JSON blobs. The
//! raw forms here mirror that stored shape (string rule kinds, string
//! workout-index keys) and convert into the domain types via `TryFrom`,
//! so a definition authored for a newer rule vocabulary surfaces as
//! `UnknownRuleKind` and a missing rule parameter as
//! `MalformedDefinition` instead of an opaque parse error.

use crate::{
    ConfigField, Error, Exercise, ExerciseSlot, Outcome, ProgramDay, ProgramDefinition,
    ProgressionRule, Result, ResultLog, SlotResult, StageDefinition, Tier,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// A rule as stored: an open kind string plus optional parameters
#[derive(Debug, Deserialize)]
pub struct RawRule {
    pub kind: String,
    pub percent: Option<f64>,
    pub amount: Option<f64>,
}

impl TryFrom<RawRule> for ProgressionRule {
    type Error = Error;

    fn try_from(raw: RawRule) -> Result<Self> {
        match raw.kind.as_str() {
            "add_weight" => Ok(ProgressionRule::AddWeight),
            "advance_stage" => Ok(ProgressionRule::AdvanceStage),
            "deload_percent" => {
                let percent = raw.percent.ok_or_else(|| {
                    Error::MalformedDefinition(
                        "deload_percent rule is missing `percent`".to_string(),
                    )
                })?;
                Ok(ProgressionRule::DeloadPercent { percent })
            }
            "add_weight_reset_stage" => {
                let amount = raw.amount.ok_or_else(|| {
                    Error::MalformedDefinition(
                        "add_weight_reset_stage rule is missing `amount`".to_string(),
                    )
                })?;
                Ok(ProgressionRule::AddWeightResetStage { amount })
            }
            other => Err(Error::UnknownRuleKind(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawSlot {
    pub id: String,
    pub exercise_id: String,
    pub tier: Tier,
    pub stages: Vec<StageDefinition>,
    pub on_success: RawRule,
    pub on_mid_stage_fail: RawRule,
    pub on_final_stage_fail: RawRule,
    pub start_weight_key: String,
    pub start_weight_multiplier: Option<f64>,
}

impl TryFrom<RawSlot> for ExerciseSlot {
    type Error = Error;

    fn try_from(raw: RawSlot) -> Result<Self> {
        Ok(ExerciseSlot {
            id: raw.id,
            exercise_id: raw.exercise_id,
            tier: raw.tier,
            stages: raw.stages,
            on_success: raw.on_success.try_into()?,
            on_mid_stage_fail: raw.on_mid_stage_fail.try_into()?,
            on_final_stage_fail: raw.on_final_stage_fail.try_into()?,
            start_weight_key: raw.start_weight_key,
            start_weight_multiplier: raw.start_weight_multiplier,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RawDay {
    pub name: String,
    pub slots: Vec<RawSlot>,
}

#[derive(Debug, Deserialize)]
pub struct RawDefinition {
    pub id: String,
    pub name: String,
    pub cycle_length: u32,
    pub total_workouts: u32,
    pub workouts_per_week: u32,
    pub days: Vec<RawDay>,
    pub config_fields: Vec<ConfigField>,
    pub weight_increments: HashMap<String, f64>,
    #[serde(default)]
    pub exercises: HashMap<String, Exercise>,
}

impl TryFrom<RawDefinition> for ProgramDefinition {
    type Error = Error;

    fn try_from(raw: RawDefinition) -> Result<Self> {
        let days = raw
            .days
            .into_iter()
            .map(|day| {
                Ok(ProgramDay {
                    name: day.name,
                    slots: day
                        .slots
                        .into_iter()
                        .map(ExerciseSlot::try_from)
                        .collect::<Result<Vec<_>>>()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ProgramDefinition {
            id: raw.id,
            name: raw.name,
            cycle_length: raw.cycle_length,
            total_workouts: raw.total_workouts,
            workouts_per_week: raw.workouts_per_week,
            days,
            config_fields: raw.config_fields,
            weight_increments: raw.weight_increments,
            exercises: raw.exercises,
        })
    }
}

/// Parse a stored program definition from JSON
pub fn parse_definition(json: &str) -> Result<ProgramDefinition> {
    let raw: RawDefinition = serde_json::from_str(json)?;
    raw.try_into()
}

/// A stored per-slot result
#[derive(Debug, Deserialize)]
pub struct RawSlotResult {
    pub result: Outcome,
    pub amrap_reps: Option<u32>,
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Parse a stored result log from JSON
///
/// Stored keys are workout indices as decimal strings of at most 3
/// digits (indices 0-999); anything else is a data-integrity problem.
pub fn parse_result_log(json: &str) -> Result<ResultLog> {
    let raw: HashMap<String, HashMap<String, RawSlotResult>> = serde_json::from_str(json)?;

    let mut entries: HashMap<u32, HashMap<String, SlotResult>> = HashMap::new();
    for (key, slots) in raw {
        if key.is_empty() || key.len() > 3 || !key.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::MalformedDefinition(format!(
                "result log has invalid workout index key '{}'",
                key
            )));
        }
        // Always succeeds after the digit/length check
        let index: u32 = key.parse().map_err(|_| {
            Error::MalformedDefinition(format!("result log has invalid workout index key '{}'", key))
        })?;

        let converted = slots
            .into_iter()
            .map(|(slot_id, r)| {
                (
                    slot_id,
                    SlotResult {
                        result: r.result,
                        amrap_reps: r.amrap_reps,
                        recorded_at: r.recorded_at,
                    },
                )
            })
            .collect();
        entries.insert(index, converted);
    }

    Ok(ResultLog::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITION_JSON: &str = r#"{
        "id": "lp_ab",
        "name": "A/B Linear",
        "cycle_length": 2,
        "total_workouts": 4,
        "workouts_per_week": 3,
        "days": [
            {
                "name": "Day A",
                "slots": [
                    {
                        "id": "a_squat",
                        "exercise_id": "squat",
                        "tier": "t1",
                        "stages": [{"sets": 3, "reps": 5}],
                        "on_success": {"kind": "add_weight"},
                        "on_mid_stage_fail": {"kind": "advance_stage"},
                        "on_final_stage_fail": {"kind": "deload_percent", "percent": 10.0},
                        "start_weight_key": "squat_start"
                    }
                ]
            },
            {"name": "Day B", "slots": []}
        ],
        "config_fields": [
            {"key": "squat_start", "label": "Squat", "min": 20.0, "step": 2.5}
        ],
        "weight_increments": {"squat": 5.0},
        "exercises": {"squat": {"id": "squat", "name": "Back Squat"}}
    }"#;

    #[test]
    fn test_parse_definition() {
        let definition = parse_definition(DEFINITION_JSON).unwrap();
        assert_eq!(definition.id, "lp_ab");
        assert_eq!(definition.days.len(), 2);

        let slot = &definition.days[0].slots[0];
        assert_eq!(slot.on_success, ProgressionRule::AddWeight);
        assert_eq!(
            slot.on_final_stage_fail,
            ProgressionRule::DeloadPercent { percent: 10.0 }
        );
        assert_eq!(slot.multiplier(), 1.0); // omitted multiplier defaults
    }

    #[test]
    fn test_unknown_rule_kind() {
        let json = DEFINITION_JSON.replace("\"add_weight\"", "\"wave_load\"");
        let err = parse_definition(&json).unwrap_err();
        match err {
            Error::UnknownRuleKind(kind) => assert_eq!(kind, "wave_load"),
            other => panic!("expected UnknownRuleKind, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_rule_parameter() {
        let json = DEFINITION_JSON.replace(
            "{\"kind\": \"deload_percent\", \"percent\": 10.0}",
            "{\"kind\": \"deload_percent\"}",
        );
        let err = parse_definition(&json).unwrap_err();
        assert!(matches!(err, Error::MalformedDefinition(_)));
    }

    #[test]
    fn test_parse_result_log() {
        let json = r#"{
            "0": {"a_squat": {"result": "success", "amrap_reps": 8}},
            "12": {"a_squat": {"result": "fail"}}
        }"#;

        let log = parse_result_log(json).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.get(0, "a_squat").unwrap().result, Outcome::Success);
        assert_eq!(log.get(0, "a_squat").unwrap().amrap_reps, Some(8));
        assert_eq!(log.get(12, "a_squat").unwrap().result, Outcome::Fail);
        assert!(log.get(1, "a_squat").is_none());
    }

    #[test]
    fn test_result_log_rejects_bad_keys() {
        for bad in ["{\"1000\": {}}", "{\"-1\": {}}", "{\"abc\": {}}", "{\"\": {}}"] {
            let err = parse_result_log(bad).unwrap_err();
            assert!(
                matches!(err, Error::MalformedDefinition(_)),
                "key in {} should be rejected",
                bad
            );
        }
    }
}
