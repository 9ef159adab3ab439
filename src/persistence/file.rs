use super::{PersistenceResult, RoutineStore};
use crate::RoutineData;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// On-disk form of a routine. The title travels with the grid so a reloaded
/// file can be exported under the same name.
#[derive(Serialize, Deserialize)]
struct RoutineSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    routine: RoutineData,
}

pub fn save_routine_to_json<P: AsRef<Path>>(
    routine: &RoutineData,
    title: Option<&str>,
    path: P,
) -> PersistenceResult<()> {
    super::validate_routine(routine)?;
    let snapshot = RoutineSnapshot {
        title: title.map(str::to_string),
        routine: routine.clone(),
    };
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    info!(path = %path.as_ref().display(), "routine saved");
    Ok(())
}

/// Returns the routine and the title it was saved with, if any.
pub fn load_routine_from_json<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<(RoutineData, Option<String>)> {
    let file = File::open(path)?;
    let snapshot: RoutineSnapshot = serde_json::from_reader(file)?;
    Ok((snapshot.routine, snapshot.title))
}

/// JSON file used as a [`RoutineStore`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RoutineStore for JsonFileStore {
    fn save_routine(&self, routine: &RoutineData) -> PersistenceResult<()> {
        save_routine_to_json(routine, None, &self.path)
    }

    fn load_routine(&self) -> PersistenceResult<Option<RoutineData>> {
        match load_routine_from_json(&self.path) {
            Ok((routine, _)) => Ok(Some(routine)),
            Err(super::PersistenceError::Io(err)) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}
