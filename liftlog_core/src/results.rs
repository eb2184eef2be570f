//! File loaders for result logs, start weights, and stored definitions.
//!
//! A missing file means "nothing recorded yet" and loads as empty; a file
//! that exists but fails to parse is a data-integrity error and is never
//! papered over, since the engine's promise is that displayed numbers are
//! exactly derivable from the stored log.

use crate::{schema, ProgramDefinition, Result, ResultLog, StartWeights};
use std::path::Path;

/// Load a result log from a JSON file
///
/// Returns an empty log if the file doesn't exist (no workouts recorded).
pub fn load_result_log(path: &Path) -> Result<ResultLog> {
    if !path.exists() {
        tracing::debug!("No result log found at {:?}", path);
        return Ok(ResultLog::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let log = schema::parse_result_log(&contents)?;
    tracing::info!("Loaded {} results from {:?}", log.len(), path);
    Ok(log)
}

/// Load start weights from a JSON file
///
/// Returns an empty mapping if the file doesn't exist; a replay over a
/// program with slots will then fail fast on the first missing key.
pub fn load_start_weights(path: &Path) -> Result<StartWeights> {
    if !path.exists() {
        tracing::debug!("No start weights found at {:?}", path);
        return Ok(StartWeights::new());
    }

    let contents = std::fs::read_to_string(path)?;
    let weights: StartWeights = serde_json::from_str(&contents)?;
    tracing::info!("Loaded {} start weights from {:?}", weights.len(), path);
    Ok(weights)
}

/// Load a stored program definition from a JSON file
pub fn load_program(path: &Path) -> Result<ProgramDefinition> {
    let contents = std::fs::read_to_string(path)?;
    let definition = schema::parse_definition(&contents)?;
    tracing::info!("Loaded program '{}' from {:?}", definition.id, path);
    Ok(definition)
}
