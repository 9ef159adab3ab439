use crate::routine::RoutineEdit;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The cell an edit is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditTarget {
    Date { col: usize },
    ClassName { row: usize },
    Subject { row: usize, col: usize },
}

impl EditTarget {
    /// The setter that writes `value` into this cell.
    pub fn into_edit(self, value: String) -> RoutineEdit {
        match self {
            EditTarget::Date { col } => RoutineEdit::SetDateLabel { col, value },
            EditTarget::ClassName { row } => RoutineEdit::SetClassName { row, value },
            EditTarget::Subject { row, col } => RoutineEdit::SetSubject { row, col, value },
        }
    }
}

/// Keys the edit surface reacts to. Anything else is plain typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Confirm,
    Abort,
    Other,
}

impl EditKey {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => EditKey::Confirm,
            "Escape" | "Esc" => EditKey::Abort,
            _ => EditKey::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditingCell {
    target: EditTarget,
    pending: String,
}

/// Tracks the one cell currently being edited.
///
/// The editor never touches a routine. Committing hands back the
/// [`RoutineEdit`] to apply, so the owner decides how to apply it and whom
/// to notify.
#[derive(Debug, Default)]
pub struct CellEditor {
    editing: Option<EditingCell>,
}

impl CellEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn target(&self) -> Option<EditTarget> {
        self.editing.as_ref().map(|cell| cell.target)
    }

    pub fn pending(&self) -> Option<&str> {
        self.editing.as_ref().map(|cell| cell.pending.as_str())
    }

    /// Starts editing `target`, seeded with its current value. Any edit
    /// already in flight is dropped without being applied.
    pub fn begin(&mut self, target: EditTarget, current_value: impl Into<String>) {
        if let Some(previous) = self.editing.take() {
            debug!(cell = ?previous.target, "abandoning uncommitted edit");
        }
        self.editing = Some(EditingCell {
            target,
            pending: current_value.into(),
        });
    }

    /// Replaces the pending value. Returns false when idle.
    pub fn update_pending(&mut self, value: impl Into<String>) -> bool {
        match self.editing.as_mut() {
            Some(cell) => {
                cell.pending = value.into();
                true
            }
            None => false,
        }
    }

    pub fn commit(&mut self) -> Option<RoutineEdit> {
        self.editing
            .take()
            .map(|cell| cell.target.into_edit(cell.pending))
    }

    /// Drops the pending value. Returns false when idle.
    pub fn cancel(&mut self) -> bool {
        self.editing.take().is_some()
    }

    pub fn handle_key(&mut self, key: EditKey) -> Option<RoutineEdit> {
        match key {
            EditKey::Confirm => self.commit(),
            EditKey::Abort => {
                self.cancel();
                None
            }
            EditKey::Other => None,
        }
    }

    /// Losing focus commits, same as the confirm key.
    pub fn blur(&mut self) -> Option<RoutineEdit> {
        self.commit()
    }
}
