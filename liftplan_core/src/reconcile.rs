//! Import of a generated program into the catalog and routine stores.
//!
//! Exercises are matched against the catalog in order:
//! 1. case-insensitive exact name
//! 2. first case-insensitive containment in either direction
//! 3. otherwise a new catalog entry is created
//!
//! The loop is strictly sequential so that an exercise created for one
//! workout is reused when the same name appears later in the program.

use crate::catalog::GYM_EXERCISE_TYPE;
use crate::grouping::ProgramGroupingKey;
use crate::normalize::DEFAULT_EXERCISE_NAME;
use crate::store::{ExerciseCatalogStore, RoutineStore};
use crate::{
    CatalogExercise, GeneratedExercise, GeneratedProgram, NewCatalogExercise, Result,
    RoutineExercise, RoutineRecord,
};
use chrono::{DateTime, Utc};

/// Target reps used when the rep text has no leading integer
pub const DEFAULT_TARGET_REPS: u32 = 10;

/// Leading integer of a rep prescription ("8-12" -> 8), or 10
pub fn parse_target_reps(reps: &str) -> u32 {
    let digits: String = reps
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(DEFAULT_TARGET_REPS)
}

/// Find the catalog entry a generated name refers to
///
/// Exact matches win over containment matches; among containment matches the
/// first in catalog order wins.
pub fn find_match<'a>(catalog: &'a [CatalogExercise], name: &str) -> Option<&'a CatalogExercise> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    catalog
        .iter()
        .find(|e| e.name.trim().to_lowercase() == wanted)
        .or_else(|| {
            catalog.iter().find(|e| {
                let existing = e.name.trim().to_lowercase();
                !existing.is_empty() && (existing.contains(&wanted) || wanted.contains(&existing))
            })
        })
}

/// Map a program onto the stores, creating one routine per workout
///
/// Stops at the first store error; routines created before it are left in place.
pub fn reconcile<C, R>(
    program: &GeneratedProgram,
    catalog: &mut C,
    routines: &mut R,
    created_at: DateTime<Utc>,
) -> Result<Vec<RoutineRecord>>
where
    C: ExerciseCatalogStore + ?Sized,
    R: RoutineStore + ?Sized,
{
    let key = ProgramGroupingKey::new(&program.name, created_at);
    let mut known = catalog.lookup_all()?;
    let mut created_exercises = 0usize;
    let mut records = Vec::with_capacity(program.workouts.len());

    for workout in &program.workouts {
        let mut mappings = Vec::with_capacity(workout.exercises.len());

        for exercise in &workout.exercises {
            let name = catalog_name(&exercise.name);
            let exercise_id = match find_match(&known, name) {
                Some(existing) => {
                    tracing::debug!(
                        "Matched '{}' to catalog exercise {} '{}'",
                        exercise.name,
                        existing.id,
                        existing.name
                    );
                    existing.id
                }
                None => {
                    let created = catalog.create(new_catalog_entry(name, exercise))?;
                    tracing::debug!(
                        "Created catalog exercise {} for '{}'",
                        created.id,
                        exercise.name
                    );
                    created_exercises += 1;
                    let id = created.id;
                    known.push(created);
                    id
                }
            };

            mappings.push(RoutineExercise {
                exercise_id,
                target_sets: exercise.sets,
                target_reps: parse_target_reps(&exercise.reps),
            });
        }

        records.push(routines.create(&workout.name, mappings, &key)?);
    }

    tracing::info!(
        "Saved program '{}' as {} routines ({} new catalog exercises)",
        program.name,
        records.len(),
        created_exercises
    );

    Ok(records)
}

/// Name to store in the catalog; blank names get the unnamed-exercise default
fn catalog_name(name: &str) -> &str {
    match name.trim() {
        "" => DEFAULT_EXERCISE_NAME,
        trimmed => trimmed,
    }
}

fn new_catalog_entry(name: &str, exercise: &GeneratedExercise) -> NewCatalogExercise {
    NewCatalogExercise {
        name: name.to_string(),
        muscle_group: exercise.muscle_group.clone(),
        exercise_type: GYM_EXERCISE_TYPE.to_string(),
        instructions: exercise.notes.clone().unwrap_or_default(),
        images: vec![],
    }
}

/// Reconcile using the current time for the grouping key
pub fn reconcile_and_save<C, R>(
    program: &GeneratedProgram,
    catalog: &mut C,
    routines: &mut R,
) -> Result<Vec<RoutineRecord>>
where
    C: ExerciseCatalogStore + ?Sized,
    R: RoutineStore + ?Sized,
{
    reconcile(program, catalog, routines, Utc::now())
}
