//! CSV export of saved programs.

use crate::{CatalogExercise, Result, RoutineRecord};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    routine: &'a str,
    position: usize,
    exercise_id: u64,
    exercise: &'a str,
    muscle_group: &'a str,
    target_sets: u32,
    target_reps: u32,
    program_id: &'a str,
}

/// Write one row per routine exercise; returns the number of rows written
///
/// Exercises missing from `catalog` are written with an empty name.
pub fn write_program_csv(
    routines: &[RoutineRecord],
    catalog: &[CatalogExercise],
    path: &Path,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let by_id: HashMap<u64, &CatalogExercise> = catalog.iter().map(|e| (e.id, e)).collect();
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    let mut rows = 0;

    for routine in routines {
        for (idx, slot) in routine.exercises.iter().enumerate() {
            let entry = by_id.get(&slot.exercise_id);
            writer.serialize(CsvRow {
                routine: &routine.name,
                position: idx + 1,
                exercise_id: slot.exercise_id,
                exercise: entry.map(|e| e.name.as_str()).unwrap_or_default(),
                muscle_group: entry.map(|e| e.muscle_group.as_str()).unwrap_or_default(),
                target_sets: slot.target_sets,
                target_reps: slot.target_reps,
                program_id: &routine.program_id,
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} rows to {:?}", rows, path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_exercises;
    use crate::RoutineExercise;
    use chrono::Utc;

    fn routine(name: &str, exercises: Vec<RoutineExercise>) -> RoutineRecord {
        RoutineRecord {
            id: 1,
            name: name.into(),
            program_id: "ai|Test|1".into(),
            exercises,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_writes_header_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out/program.csv");
        let routines = vec![
            routine(
                "Day 1: Push",
                vec![
                    RoutineExercise { exercise_id: 1, target_sets: 4, target_reps: 8 },
                    RoutineExercise { exercise_id: 999, target_sets: 3, target_reps: 10 },
                ],
            ),
            routine("Day 2: Rest", vec![]),
        ];

        let rows = write_program_csv(&routines, seed_exercises(), &path).unwrap();
        assert_eq!(rows, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "routine,position,exercise_id,exercise,muscle_group,target_sets,target_reps,program_id"
        );
        assert_eq!(lines[1], "Day 1: Push,1,1,Bench Press,Chest,4,8,ai|Test|1");
        assert_eq!(lines[2], "Day 1: Push,2,999,,,3,10,ai|Test|1");
        assert_eq!(lines.len(), 3);
    }
}
