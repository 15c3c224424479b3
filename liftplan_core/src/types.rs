//! Core domain types for liftplan.
//!
//! This module defines the fundamental types used throughout the system:
//! - Generation parameters and their enums
//! - The generated program / workout / exercise schema
//! - Catalog exercises and routine records owned by the stores

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Session lengths (minutes) a program can be generated for
pub const ALLOWED_DURATIONS: [u32; 5] = [30, 45, 60, 75, 90];

/// Inclusive range of supported training days per week
pub const MIN_DAYS_PER_WEEK: u32 = 3;
pub const MAX_DAYS_PER_WEEK: u32 = 6;

// ============================================================================
// Parameter Enums
// ============================================================================

/// How training days are divided across muscle groups
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    PushPullLegs,
    UpperLower,
    FullBody,
    BroSplit,
    Custom,
}

impl SplitType {
    /// Raw wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::PushPullLegs => "push_pull_legs",
            SplitType::UpperLower => "upper_lower",
            SplitType::FullBody => "full_body",
            SplitType::BroSplit => "bro_split",
            SplitType::Custom => "custom",
        }
    }

    /// Short title used in program names
    pub fn label(&self) -> &'static str {
        match self {
            SplitType::PushPullLegs => "Push/Pull/Legs",
            SplitType::UpperLower => "Upper/Lower",
            SplitType::FullBody => "Full Body",
            SplitType::BroSplit => "Body Part Split",
            SplitType::Custom => "Custom",
        }
    }
}

impl FromStr for SplitType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "push_pull_legs" | "ppl" => Ok(SplitType::PushPullLegs),
            "upper_lower" => Ok(SplitType::UpperLower),
            "full_body" => Ok(SplitType::FullBody),
            "bro_split" | "bro" => Ok(SplitType::BroSplit),
            "custom" => Ok(SplitType::Custom),
            other => Err(format!("unknown split type '{}'", other)),
        }
    }
}

/// Training experience of the user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
}

impl Experience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Experience::Beginner => "beginner",
            Experience::Intermediate => "intermediate",
            Experience::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Experience::Beginner => "Beginner",
            Experience::Intermediate => "Intermediate",
            Experience::Advanced => "Advanced",
        }
    }
}

impl FromStr for Experience {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Experience::Beginner),
            "intermediate" => Ok(Experience::Intermediate),
            "advanced" => Ok(Experience::Advanced),
            other => Err(format!("unknown experience level '{}'", other)),
        }
    }
}

/// Primary training goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Strength,
    Hypertrophy,
    Endurance,
    GeneralFitness,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Strength => "strength",
            Goal::Hypertrophy => "hypertrophy",
            Goal::Endurance => "endurance",
            Goal::GeneralFitness => "general_fitness",
        }
    }

    /// Lowercase prose form ("general fitness")
    pub fn describe(&self) -> &'static str {
        match self {
            Goal::Strength => "strength",
            Goal::Hypertrophy => "muscle growth (hypertrophy)",
            Goal::Endurance => "muscular endurance",
            Goal::GeneralFitness => "general fitness",
        }
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "strength" => Ok(Goal::Strength),
            "hypertrophy" => Ok(Goal::Hypertrophy),
            "endurance" => Ok(Goal::Endurance),
            "general_fitness" | "general" => Ok(Goal::GeneralFitness),
            other => Err(format!("unknown goal '{}'", other)),
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Generation Parameters
// ============================================================================

/// User-chosen constraints for one program generation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GenerationParams {
    pub split_type: SplitType,
    /// Lowercase equipment tags ("barbell", "dumbbell", "bodyweight", ...)
    pub equipment: BTreeSet<String>,
    /// Session length in minutes, one of [`ALLOWED_DURATIONS`]
    pub duration: u32,
    pub experience: Experience,
    pub goal: Goal,
    pub days_per_week: u32,
    #[serde(default)]
    pub focus_areas: BTreeSet<String>,
    #[serde(default)]
    pub custom_split: Option<String>,
}

impl GenerationParams {
    /// Build parameters, normalising equipment tags to lowercase
    pub fn new<I, S>(
        split_type: SplitType,
        equipment: I,
        duration: u32,
        experience: Experience,
        goal: Goal,
        days_per_week: u32,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            split_type,
            equipment: normalize_tags(equipment),
            duration,
            experience,
            goal,
            days_per_week,
            focus_areas: BTreeSet::new(),
            custom_split: None,
        }
    }

    pub fn with_focus_areas<I, S>(mut self, focus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.focus_areas = normalize_tags(focus);
        self
    }

    pub fn with_custom_split(mut self, label: impl Into<String>) -> Self {
        self.custom_split = Some(label.into());
        self
    }

    pub fn has_equipment(&self, tag: &str) -> bool {
        self.equipment.contains(tag)
    }

    /// Check the invariants the generators rely on
    pub fn validate(&self) -> Result<()> {
        if self.equipment.is_empty() {
            return Err(Error::InvalidParams(
                "at least one equipment tag is required".into(),
            ));
        }
        if !(MIN_DAYS_PER_WEEK..=MAX_DAYS_PER_WEEK).contains(&self.days_per_week) {
            return Err(Error::InvalidParams(format!(
                "days per week must be between {} and {}, got {}",
                MIN_DAYS_PER_WEEK, MAX_DAYS_PER_WEEK, self.days_per_week
            )));
        }
        if !ALLOWED_DURATIONS.contains(&self.duration) {
            return Err(Error::InvalidParams(format!(
                "duration must be one of {:?} minutes, got {}",
                ALLOWED_DURATIONS, self.duration
            )));
        }
        Ok(())
    }
}

fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

// ============================================================================
// Generated Program Schema
// ============================================================================

/// One prescribed exercise inside a generated workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedExercise {
    pub name: String,
    pub muscle_group: String,
    pub sets: u32,
    pub reps: String,
    pub rest_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One training day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWorkout {
    pub name: String,
    pub day_number: u32,
    pub focus: String,
    pub exercises: Vec<GeneratedExercise>,
    pub estimated_duration: u32,
}

/// A complete multi-day program, not yet persisted
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProgram {
    pub name: String,
    pub description: String,
    pub days_per_week: u32,
    pub workouts: Vec<GeneratedWorkout>,
}

impl GeneratedProgram {
    pub fn exercise_count(&self) -> usize {
        self.workouts.iter().map(|w| w.exercises.len()).sum()
    }
}

/// Which path produced a program
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramSource {
    /// Returned by the external generation service and normalized
    Service,
    /// Built from the static templates
    Fallback,
}

// ============================================================================
// Store Records
// ============================================================================

/// A persisted exercise in the catalog
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogExercise {
    pub id: u64,
    pub name: String,
    pub muscle_group: String,
    pub exercise_type: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Fields for a catalog entry that has not been assigned an id yet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCatalogExercise {
    pub name: String,
    pub muscle_group: String,
    pub exercise_type: String,
    pub instructions: String,
    pub images: Vec<String>,
}

impl NewCatalogExercise {
    pub fn into_catalog(self, id: u64) -> CatalogExercise {
        CatalogExercise {
            id,
            name: self.name,
            muscle_group: self.muscle_group,
            exercise_type: self.exercise_type,
            instructions: self.instructions,
            images: self.images,
        }
    }
}

/// One exercise slot within a routine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutineExercise {
    pub exercise_id: u64,
    pub target_sets: u32,
    pub target_reps: u32,
}

/// A persisted routine, tagged with the program it was generated from
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutineRecord {
    pub id: u64,
    pub name: String,
    pub program_id: String,
    pub exercises: Vec<RoutineExercise>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GenerationParams {
        GenerationParams::new(
            SplitType::FullBody,
            ["Bodyweight", " dumbbell "],
            45,
            Experience::Beginner,
            Goal::GeneralFitness,
            3,
        )
    }

    #[test]
    fn test_equipment_tags_are_normalized() {
        let p = params();
        assert!(p.has_equipment("bodyweight"));
        assert!(p.has_equipment("dumbbell"));
        assert_eq!(p.equipment.len(), 2);
    }

    #[test]
    fn test_valid_params_pass() {
        assert!(params().validate().is_ok());
    }

    #[test]
    fn test_empty_equipment_rejected() {
        let mut p = params();
        p.equipment.clear();
        assert!(matches!(p.validate(), Err(Error::InvalidParams(_))));
    }

    #[test]
    fn test_days_out_of_range_rejected() {
        for days in [0, 2, 7] {
            let mut p = params();
            p.days_per_week = days;
            assert!(p.validate().is_err(), "{} days should be rejected", days);
        }
    }

    #[test]
    fn test_duration_outside_fixed_set_rejected() {
        let mut p = params();
        p.duration = 50;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("ppl".parse::<SplitType>().unwrap(), SplitType::PushPullLegs);
        assert_eq!("upper-lower".parse::<SplitType>().unwrap(), SplitType::UpperLower);
        assert_eq!("Advanced".parse::<Experience>().unwrap(), Experience::Advanced);
        assert_eq!("general_fitness".parse::<Goal>().unwrap(), Goal::GeneralFitness);
        assert!("yoga".parse::<Goal>().is_err());
    }

    #[test]
    fn test_program_wire_format_is_camel_case() {
        let exercise = GeneratedExercise {
            name: "Push-ups".into(),
            muscle_group: "Chest".into(),
            sets: 3,
            reps: "10-12".into(),
            rest_seconds: 60,
            notes: None,
        };
        let json = serde_json::to_value(&exercise).unwrap();
        assert_eq!(json["muscleGroup"], "Chest");
        assert_eq!(json["restSeconds"], 60);
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_exercise_count_sums_workouts() {
        let exercise = GeneratedExercise {
            name: "Squat".into(),
            muscle_group: "Quadriceps".into(),
            sets: 3,
            reps: "5".into(),
            rest_seconds: 120,
            notes: None,
        };
        let workout = |day: u32, exercises: Vec<GeneratedExercise>| GeneratedWorkout {
            name: format!("Day {}", day),
            day_number: day,
            focus: "Legs".into(),
            exercises,
            estimated_duration: 45,
        };
        let program = GeneratedProgram {
            name: "P".into(),
            description: String::new(),
            days_per_week: 2,
            workouts: vec![
                workout(1, vec![exercise.clone(), exercise.clone()]),
                workout(2, vec![]),
            ],
        };
        assert_eq!(program.exercise_count(), 2);
    }
}
