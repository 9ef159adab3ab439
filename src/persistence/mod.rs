use crate::RoutineData;
use crate::session::ChangeSink;
use crate::validation::{self, ShapeError};
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid data: {0}")]
    InvalidData(#[from] ShapeError),
    #[error("store connection is unavailable")]
    Poisoned,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Somewhere a committed routine can be kept between runs.
pub trait RoutineStore: Send + Sync {
    fn save_routine(&self, routine: &RoutineData) -> PersistenceResult<()>;
    fn load_routine(&self) -> PersistenceResult<Option<RoutineData>>;
}

pub fn validate_routine(routine: &RoutineData) -> PersistenceResult<()> {
    validation::validate_shape(routine.dates(), routine.classes())?;
    Ok(())
}

/// Change sink that saves every committed routine to a store.
pub struct StoreSink<S> {
    store: S,
}

impl<S: RoutineStore> StoreSink<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: RoutineStore> ChangeSink for StoreSink<S> {
    fn routine_changed(&self, data: &RoutineData) {
        if let Err(err) = self.store.save_routine(data) {
            warn!(error = %err, "failed to persist routine");
        }
    }
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{JsonFileStore, load_routine_from_json, save_routine_to_json};
