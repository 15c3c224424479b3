//! Built-in exercise catalog used to seed an empty catalog store.

use crate::types::CatalogExercise;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Exercise type tag for entries created from generated programs
pub const GYM_EXERCISE_TYPE: &str = "gym";

/// Cached seed catalog - built once and reused across all operations
static SEED_CATALOG: Lazy<Vec<CatalogExercise>> = Lazy::new(build_seed_catalog);

/// Get a reference to the cached seed catalog
pub fn seed_exercises() -> &'static [CatalogExercise] {
    &SEED_CATALOG
}

fn build_seed_catalog() -> Vec<CatalogExercise> {
    // (name, muscle group, instructions)
    let entries: &[(&str, &str, &str)] = &[
        ("Bench Press", "Chest", "Lower the bar to mid-chest, press to lockout."),
        ("Incline Dumbbell Press", "Chest", "Bench at 30-45 degrees, press dumbbells up and together."),
        ("Push-up", "Chest", "Body in a straight line, chest to floor, press up."),
        ("Overhead Press", "Shoulders", "Press the bar from the front rack to overhead lockout."),
        ("Lateral Raise", "Shoulders", "Raise dumbbells out to the side to shoulder height."),
        ("Tricep Pushdown", "Triceps", "Elbows pinned, extend the cable attachment down."),
        ("Dips", "Triceps", "Lower until shoulders are below elbows, press up."),
        ("Barbell Row", "Back", "Hinge forward, pull the bar to the lower ribs."),
        ("Pull-up", "Back", "Hang from the bar, pull chin over the bar."),
        ("Lat Pulldown", "Back", "Pull the bar to the upper chest, control the return."),
        ("Deadlift", "Back", "Hinge and stand up with the bar close to the legs."),
        ("Face Pull", "Shoulders", "Pull the rope towards the face, elbows high."),
        ("Bicep Curl", "Biceps", "Curl the weight without swinging the torso."),
        ("Squat", "Quadriceps", "Sit down between the hips, keep the chest up, stand."),
        ("Leg Press", "Quadriceps", "Lower the sled until knees reach 90 degrees, press."),
        ("Romanian Deadlift", "Hamstrings", "Soft knees, hinge until hamstrings stretch."),
        ("Lunge", "Quadriceps", "Step forward, lower the back knee, drive back up."),
        ("Leg Curl", "Hamstrings", "Curl the pad towards the glutes under control."),
        ("Calf Raise", "Calves", "Rise onto the toes, pause, lower slowly."),
        ("Plank", "Core", "Hold a straight line from head to heels."),
    ];

    entries
        .iter()
        .enumerate()
        .map(|(idx, (name, muscle_group, instructions))| CatalogExercise {
            id: idx as u64 + 1,
            name: (*name).into(),
            muscle_group: (*muscle_group).into(),
            exercise_type: GYM_EXERCISE_TYPE.into(),
            instructions: (*instructions).into(),
            images: vec![],
        })
        .collect()
}

/// Validate a catalog for consistency
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate(exercises: &[CatalogExercise]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    for exercise in exercises {
        if !ids.insert(exercise.id) {
            errors.push(format!("Duplicate exercise id {}", exercise.id));
        }
        if exercise.name.trim().is_empty() {
            errors.push(format!("Exercise {} has empty name", exercise.id));
        } else if !names.insert(exercise.name.to_lowercase()) {
            errors.push(format!("Duplicate exercise name '{}'", exercise.name));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog_loads() {
        assert_eq!(seed_exercises().len(), 20);
        assert_eq!(seed_exercises()[0].id, 1);
    }

    #[test]
    fn test_seed_catalog_validates() {
        let errors = validate(seed_exercises());
        assert!(errors.is_empty(), "Seed catalog has validation errors: {:?}", errors);
    }

    #[test]
    fn test_validate_reports_duplicates() {
        let mut exercises = seed_exercises().to_vec();
        let mut dup = exercises[0].clone();
        dup.name = "BENCH PRESS".into();
        exercises.push(dup);

        let errors = validate(&exercises);
        assert_eq!(errors.len(), 2);
    }
}
