use super::{PersistenceError, PersistenceResult, RoutineStore};
use crate::RoutineData;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

/// Keeps the latest committed routine in a single-row SQLite table.
pub struct SqliteRoutineStore {
    connection: Mutex<Connection>,
}

impl SqliteRoutineStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS routine (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                routine_json TEXT NOT NULL,
                revision INTEGER NOT NULL DEFAULT 1
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    /// How many times the routine has been saved.
    pub fn revision(&self) -> PersistenceResult<i64> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| PersistenceError::Poisoned)?;
        let revision: Option<i64> = conn
            .query_row("SELECT revision FROM routine WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(revision.unwrap_or(0))
    }
}

impl RoutineStore for SqliteRoutineStore {
    fn save_routine(&self, routine: &RoutineData) -> PersistenceResult<()> {
        super::validate_routine(routine)?;
        let json = serde_json::to_string(routine)?;
        let mut conn = self
            .connection
            .lock()
            .map_err(|_| PersistenceError::Poisoned)?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO routine (id, routine_json) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET
                routine_json = excluded.routine_json,
                revision = routine.revision + 1",
            params![json],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn load_routine(&self) -> PersistenceResult<Option<RoutineData>> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| PersistenceError::Poisoned)?;
        let json: Option<String> = conn
            .query_row("SELECT routine_json FROM routine WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(json) = json else {
            return Ok(None);
        };
        let routine: RoutineData = serde_json::from_str(&json)?;
        Ok(Some(routine))
    }
}
