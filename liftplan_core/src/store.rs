//! Exercise catalog and routine stores.
//!
//! The reconciler only sees the [`ExerciseCatalogStore`] and [`RoutineStore`]
//! traits. Two implementations ship here:
//! - JSONL files with fs2 locking, used by the CLI
//! - in-memory vectors, used by tests and embedders

use crate::catalog::seed_exercises;
use crate::grouping::ProgramGroupingKey;
use crate::{
    CatalogExercise, Error, NewCatalogExercise, Result, RoutineExercise, RoutineRecord,
};
use chrono::Utc;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read/append access to the exercise catalog
pub trait ExerciseCatalogStore {
    /// All exercises in insertion order
    fn lookup_all(&self) -> Result<Vec<CatalogExercise>>;

    /// Append an exercise, assigning its id
    fn create(&mut self, exercise: NewCatalogExercise) -> Result<CatalogExercise>;
}

/// Creation access to routines
pub trait RoutineStore {
    fn create(
        &mut self,
        name: &str,
        exercises: Vec<RoutineExercise>,
        program_key: &ProgramGroupingKey,
    ) -> Result<RoutineRecord>;
}

/// Routines that share one grouping key
#[derive(Clone, Debug)]
pub struct ProgramSummary {
    pub program_id: String,
    pub routines: Vec<RoutineRecord>,
}

impl ProgramSummary {
    /// Program name from the key, or the raw id for keys this crate did not write
    pub fn display_name(&self) -> String {
        ProgramGroupingKey::parse(&self.program_id)
            .map(|k| k.program_name().to_string())
            .unwrap_or_else(|| self.program_id.clone())
    }
}

/// Group routines by program id, keeping first-seen order
pub fn group_by_program(routines: Vec<RoutineRecord>) -> Vec<ProgramSummary> {
    let mut programs: Vec<ProgramSummary> = Vec::new();
    for routine in routines {
        match programs
            .iter_mut()
            .find(|p| p.program_id == routine.program_id)
        {
            Some(program) => program.routines.push(routine),
            None => programs.push(ProgramSummary {
                program_id: routine.program_id.clone(),
                routines: vec![routine],
            }),
        }
    }
    programs
}

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().unwrap_or(0) + 1
}

// ============================================================================
// JSONL persistence
// ============================================================================

/// A JSON Lines file guarded by advisory locks
///
/// Locks are taken on a sidecar `<file>.lock` rather than the data file, so a
/// rewrite that renames a new file into place stays serialized with appends.
#[derive(Clone, Debug)]
struct JsonlFile {
    path: PathBuf,
}

impl JsonlFile {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn open_lock(&self) -> Result<File> {
        self.ensure_parent_dir()?;
        Ok(OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())?)
    }

    /// Open the sidecar lock file and hold an exclusive lock on it
    fn lock_exclusive(&self) -> Result<File> {
        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        Ok(lock)
    }

    /// Read every parseable record; corrupt lines are logged and skipped
    fn read_all<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let lock = self.open_lock()?;
        lock.lock_shared()?;

        let contents = File::open(&self.path)
            .map_err(Error::from)
            .and_then(|f| read_contents(&f));

        lock.unlock()?;
        Ok(parse_lines(&contents?, &self.path))
    }

    /// Append one record built from the current contents, under an exclusive lock
    fn append_with<T, F>(&self, build: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&[T]) -> T,
    {
        let lock = self.lock_exclusive()?;

        let result = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(Error::from)
            .and_then(|file| {
                let contents = read_contents(&file)?;
                let existing = parse_lines::<T>(&contents, &self.path);
                let record = build(&existing);
                let mut writer = std::io::BufWriter::new(&file);
                // Terminate a torn last line so the new record starts cleanly
                if !contents.is_empty() && !contents.ends_with('\n') {
                    writer.write_all(b"\n")?;
                }
                let line = serde_json::to_string(&record)?;
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
                writer.flush()?;
                Ok(record)
            });

        lock.unlock()?;
        result
    }

    /// Read, filter and atomically replace the file under one exclusive lock
    fn retain<T, F>(&self, keep: F) -> Result<usize>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut(&T) -> bool,
    {
        let lock = self.lock_exclusive()?;
        let result = self.retain_locked(keep);
        lock.unlock()?;
        result
    }

    fn retain_locked<T, F>(&self, mut keep: F) -> Result<usize>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut(&T) -> bool,
    {
        if !self.path.exists() {
            return Ok(0);
        }
        let contents = read_contents(&File::open(&self.path)?)?;
        let records: Vec<T> = parse_lines(&contents, &self.path);
        let before = records.len();
        let kept: Vec<T> = records.into_iter().filter(|r| keep(r)).collect();
        let removed = before - kept.len();

        if removed > 0 {
            self.write_atomic(&kept)?;
        }
        Ok(removed)
    }

    /// Write the whole file through a temp file and rename; callers hold the lock
    fn write_atomic<T: Serialize>(&self, records: &[T]) -> Result<()> {
        self.ensure_parent_dir()?;

        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            for record in records {
                let line = serde_json::to_string(record)?;
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Create the file with `records` unless another writer got there first
    fn create_with<T: Serialize>(&self, records: &[T]) -> Result<bool> {
        let lock = self.lock_exclusive()?;
        let result = if self.path.exists() {
            Ok(false)
        } else {
            self.write_atomic(records).map(|()| true)
        };
        lock.unlock()?;
        result
    }
}

fn read_contents(file: &File) -> Result<String> {
    let mut contents = String::new();
    BufReader::new(file).read_to_string(&mut contents)?;
    Ok(contents)
}

fn parse_lines<T: DeserializeOwned>(contents: &str, path: &Path) -> Vec<T> {
    let mut records = Vec::new();

    for (line_num, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    "Skipping corrupt record at {:?} line {}: {}",
                    path,
                    line_num + 1,
                    e
                );
            }
        }
    }

    records
}

/// Catalog persisted as one JSON exercise per line
pub struct JsonlCatalogStore {
    file: JsonlFile,
}

impl JsonlCatalogStore {
    /// Open the catalog, seeding it with the built-in exercises if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let file = JsonlFile::new(path);
        if !file.path.exists() && file.create_with(seed_exercises())? {
            tracing::info!(
                "Seeded catalog at {:?} with {} exercises",
                file.path,
                seed_exercises().len()
            );
        }
        Ok(Self { file })
    }
}

impl ExerciseCatalogStore for JsonlCatalogStore {
    fn lookup_all(&self) -> Result<Vec<CatalogExercise>> {
        self.file.read_all()
    }

    fn create(&mut self, exercise: NewCatalogExercise) -> Result<CatalogExercise> {
        if exercise.name.trim().is_empty() {
            return Err(Error::Store("catalog exercise name must not be empty".into()));
        }
        let created = self.file.append_with(|existing: &[CatalogExercise]| {
            exercise.into_catalog(next_id(existing.iter().map(|e| e.id)))
        })?;
        tracing::debug!("Appended catalog exercise {} '{}'", created.id, created.name);
        Ok(created)
    }
}

/// Routines persisted as one JSON routine per line
pub struct JsonlRoutineStore {
    file: JsonlFile,
}

impl JsonlRoutineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonlFile::new(path),
        }
    }

    pub fn list_all(&self) -> Result<Vec<RoutineRecord>> {
        self.file.read_all()
    }

    pub fn list_programs(&self) -> Result<Vec<ProgramSummary>> {
        Ok(group_by_program(self.list_all()?))
    }

    /// Routines belonging to one program, in creation order
    pub fn routines_for(&self, program_id: &str) -> Result<Vec<RoutineRecord>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|r| r.program_id == program_id)
            .collect())
    }

    /// Remove every routine tagged with `program_id`; returns how many were removed
    pub fn delete_program(&mut self, program_id: &str) -> Result<usize> {
        let removed = self
            .file
            .retain(|r: &RoutineRecord| r.program_id != program_id)?;
        if removed > 0 {
            tracing::info!("Deleted {} routines for program {}", removed, program_id);
        }
        Ok(removed)
    }
}

impl RoutineStore for JsonlRoutineStore {
    fn create(
        &mut self,
        name: &str,
        exercises: Vec<RoutineExercise>,
        program_key: &ProgramGroupingKey,
    ) -> Result<RoutineRecord> {
        let created = self.file.append_with(|existing: &[RoutineRecord]| RoutineRecord {
            id: next_id(existing.iter().map(|r| r.id)),
            name: name.to_string(),
            program_id: program_key.to_string(),
            exercises,
            created_at: Utc::now(),
        })?;
        tracing::debug!("Appended routine {} '{}'", created.id, created.name);
        Ok(created)
    }
}

// ============================================================================
// In-memory stores
// ============================================================================

/// Catalog held in a vector
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalogStore {
    pub exercises: Vec<CatalogExercise>,
}

impl MemoryCatalogStore {
    pub fn new(exercises: Vec<CatalogExercise>) -> Self {
        Self { exercises }
    }

    pub fn seeded() -> Self {
        Self::new(seed_exercises().to_vec())
    }
}

impl ExerciseCatalogStore for MemoryCatalogStore {
    fn lookup_all(&self) -> Result<Vec<CatalogExercise>> {
        Ok(self.exercises.clone())
    }

    fn create(&mut self, exercise: NewCatalogExercise) -> Result<CatalogExercise> {
        let created = exercise.into_catalog(next_id(self.exercises.iter().map(|e| e.id)));
        self.exercises.push(created.clone());
        Ok(created)
    }
}

/// Routines held in a vector
#[derive(Clone, Debug, Default)]
pub struct MemoryRoutineStore {
    pub routines: Vec<RoutineRecord>,
}

impl RoutineStore for MemoryRoutineStore {
    fn create(
        &mut self,
        name: &str,
        exercises: Vec<RoutineExercise>,
        program_key: &ProgramGroupingKey,
    ) -> Result<RoutineRecord> {
        let created = RoutineRecord {
            id: next_id(self.routines.iter().map(|r| r.id)),
            name: name.to_string(),
            program_id: program_key.to_string(),
            exercises,
            created_at: Utc::now(),
        };
        self.routines.push(created.clone());
        Ok(created)
    }
}
