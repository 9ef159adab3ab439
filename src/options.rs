use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_TITLE: &str = "Exam Routine";

/// Display and editing switches for a routine session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutineOptions {
    /// Shown above the table and used to name exported files.
    pub title: String,
    /// Dense rendering. Never changes the data or exports.
    pub compact: bool,
    /// When false the routine can be viewed and exported but not changed.
    pub editable: bool,
}

impl Default for RoutineOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            compact: false,
            editable: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options {path}: {source}")]
    Io { source: io::Error, path: PathBuf },
    #[error("failed to parse options {path}: {source}")]
    Parse {
        source: serde_json::Error,
        path: PathBuf,
    },
}

impl RoutineOptions {
    /// Defaults overridden by `ROUTINE_TITLE`, `ROUTINE_COMPACT` and
    /// `ROUTINE_EDITABLE`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| OptionsError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        serde_json::from_reader(file).map_err(|source| OptionsError::Parse {
            source,
            path: path.to_path_buf(),
        })
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(title) = lookup("ROUTINE_TITLE") {
            if !title.trim().is_empty() {
                self.title = title;
            }
        }
        let flag = |key: &str| lookup(key).and_then(|value| parse_flag(key, &value));
        if let Some(compact) = flag("ROUTINE_COMPACT") {
            self.compact = compact;
        }
        if let Some(editable) = flag("ROUTINE_EDITABLE") {
            self.editable = editable;
        }
        self
    }
}

fn parse_flag(key: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!(key, value = other, "ignoring unrecognised boolean");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let env: HashMap<&str, &str> = [
            ("ROUTINE_TITLE", "Mid Term"),
            ("ROUTINE_COMPACT", "yes"),
            ("ROUTINE_EDITABLE", "maybe"),
        ]
        .into_iter()
        .collect();
        let options = RoutineOptions::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(options.title, "Mid Term");
        assert!(options.compact);
        assert!(options.editable);
    }

    #[test]
    fn json_file_fills_missing_fields_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"editable": false}}"#).unwrap();
        let options = RoutineOptions::from_json_file(file.path()).unwrap();
        assert!(!options.editable);
        assert_eq!(options.title, DEFAULT_TITLE);
    }
}
