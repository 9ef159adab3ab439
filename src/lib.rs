pub mod editor;
pub mod export;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod init;
pub mod options;
pub mod persistence;
pub mod routine;
pub mod session;
pub mod source;
pub mod validation;

pub use editor::{CellEditor, EditKey, EditTarget};
pub use export::{
    ClipboardError, ClipboardSink, CopyOutcome, ExportFormat, Payload, UnknownFormat,
    copy_with_fallback, export, export_all,
};
pub use init::{Initializer, LoadState};
pub use options::{OptionsError, RoutineOptions};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteRoutineStore;
pub use persistence::{
    JsonFileStore, PersistenceError, RoutineStore, StoreSink, load_routine_from_json,
    save_routine_to_json,
};
pub use routine::{ClassRow, RoutineData, RoutineEdit, RoutineError};
pub use session::{ChangeSink, Refusal, RoutineSession};
pub use source::{ClassRecord, ClassSource, JsonFileSource, SourceError, parse_class_list};
