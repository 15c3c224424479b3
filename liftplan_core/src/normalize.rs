//! Repair of generation-service responses into the program schema.
//!
//! The service may wrap its JSON in prose and may omit or mistype fields.
//! Only structural failures (no JSON object, no name, no workouts) are
//! rejected; everything else is defaulted.

use crate::error::NormalizeError;
use crate::{GeneratedExercise, GeneratedProgram, GeneratedWorkout, GenerationParams};
use serde_json::{Map, Value};
use std::collections::HashSet;

const DEFAULT_FOCUS: &str = "General";
/// Name given to exercises the service left unnamed
pub const DEFAULT_EXERCISE_NAME: &str = "Unknown Exercise";
const DEFAULT_MUSCLE_GROUP: &str = "General";
const DEFAULT_SETS: u32 = 3;
const DEFAULT_REPS: &str = "10";
const DEFAULT_REST_SECONDS: u32 = 60;

/// Return the first brace-balanced `{...}` substring of `text`
///
/// Braces inside JSON string literals are ignored. Scanning starts at the
/// first `{`; if that object never closes, there is no match.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse and repair a service response into a program
pub fn normalize(
    raw_text: &str,
    params: &GenerationParams,
) -> Result<GeneratedProgram, NormalizeError> {
    let json = extract_json_object(raw_text).ok_or(NormalizeError::NoJsonObject)?;
    let value: Value =
        serde_json::from_str(json).map_err(|e| NormalizeError::InvalidJson(e.to_string()))?;

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .ok_or(NormalizeError::MissingName)?
        .to_string();

    let raw_workouts = value
        .get("workouts")
        .and_then(Value::as_array)
        .ok_or(NormalizeError::MissingWorkouts)?;

    if raw_workouts.is_empty() {
        return Err(NormalizeError::NoWorkouts);
    }

    let empty = Map::new();
    let mut workouts: Vec<GeneratedWorkout> = raw_workouts
        .iter()
        .enumerate()
        .map(|(idx, w)| normalize_workout(idx, w.as_object().unwrap_or(&empty), params))
        .collect();

    let mut seen = HashSet::new();
    if !workouts.iter().all(|w| seen.insert(w.day_number)) {
        tracing::debug!("Duplicate day numbers in response, renumbering by position");
        for (idx, workout) in workouts.iter_mut().enumerate() {
            workout.day_number = idx as u32 + 1;
        }
    }

    let description = value
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(GeneratedProgram {
        name,
        description,
        days_per_week: workouts.len() as u32,
        workouts,
    })
}

fn normalize_workout(
    idx: usize,
    obj: &Map<String, Value>,
    params: &GenerationParams,
) -> GeneratedWorkout {
    let empty = Map::new();
    let exercises = obj
        .get("exercises")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .map(|e| normalize_exercise(e.as_object().unwrap_or(&empty)))
                .collect()
        })
        .unwrap_or_default();

    GeneratedWorkout {
        name: text_field(obj, "name").unwrap_or_else(|| format!("Day {}", idx + 1)),
        day_number: positive_int(obj.get("dayNumber")).unwrap_or(idx as u32 + 1),
        focus: text_field(obj, "focus").unwrap_or_else(|| DEFAULT_FOCUS.to_string()),
        exercises,
        estimated_duration: positive_int(obj.get("estimatedDuration")).unwrap_or(params.duration),
    }
}

fn normalize_exercise(obj: &Map<String, Value>) -> GeneratedExercise {
    let reps = match obj.get("reps") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => DEFAULT_REPS.to_string(),
    };

    GeneratedExercise {
        name: text_field(obj, "name").unwrap_or_else(|| DEFAULT_EXERCISE_NAME.to_string()),
        muscle_group: text_field(obj, "muscleGroup")
            .unwrap_or_else(|| DEFAULT_MUSCLE_GROUP.to_string()),
        sets: positive_int(obj.get("sets")).unwrap_or(DEFAULT_SETS),
        reps,
        rest_seconds: non_negative_int(obj.get("restSeconds")).unwrap_or(DEFAULT_REST_SECONDS),
        notes: text_field(obj, "notes"),
    }
}

/// String fields are kept verbatim; only a missing or non-string value is defaulted
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Integer value of a JSON number or numeric string, truncating fractions
fn as_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

fn positive_int(value: Option<&Value>) -> Option<u32> {
    as_int(value)
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
}

fn non_negative_int(value: Option<&Value>) -> Option<u32> {
    as_int(value)
        .filter(|n| *n >= 0)
        .and_then(|n| u32::try_from(n).ok())
}
