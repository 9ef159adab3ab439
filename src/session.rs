use crate::editor::{CellEditor, EditKey, EditTarget};
use crate::export::{self, ExportFormat, Payload};
use crate::init::{Initializer, LoadState};
use crate::options::RoutineOptions;
use crate::routine::{RoutineData, RoutineEdit, RoutineError};
use crate::source::{ClassRecord, ClassSource, SourceError};
use thiserror::Error;
use tracing::{debug, info};

/// Receives every committed snapshot.
pub trait ChangeSink: Send + Sync {
    fn routine_changed(&self, data: &RoutineData);
}

impl<F> ChangeSink for F
where
    F: Fn(&RoutineData) + Send + Sync,
{
    fn routine_changed(&self, data: &RoutineData) {
        self(data)
    }
}

/// Why a session left its routine untouched. None of these are faults; a
/// caller may ignore them or use them to disable an affordance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("routine is read-only")]
    ReadOnly,
    #[error("class list is still loading")]
    Loading,
    #[error("no cell is being edited")]
    NotEditing,
    #[error(transparent)]
    Rejected(#[from] RoutineError),
}

/// Owns one routine together with its in-flight cell edit.
pub struct RoutineSession {
    data: RoutineData,
    editor: CellEditor,
    options: RoutineOptions,
    init: Initializer,
    sink: Option<Box<dyn ChangeSink>>,
}

impl RoutineSession {
    /// Default routine, waiting for a class list.
    pub fn new(options: RoutineOptions) -> Self {
        Self {
            data: RoutineData::default(),
            editor: CellEditor::new(),
            options,
            init: Initializer::new(),
            sink: None,
        }
    }

    /// Caller-supplied routine; later class lists are ignored.
    pub fn with_data(options: RoutineOptions, data: RoutineData) -> Self {
        Self {
            data,
            editor: CellEditor::new(),
            options,
            init: Initializer::preinitialized(),
            sink: None,
        }
    }

    pub fn with_change_sink(mut self, sink: impl ChangeSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn snapshot(&self) -> &RoutineData {
        &self.data
    }

    pub fn options(&self) -> &RoutineOptions {
        &self.options
    }

    pub fn title(&self) -> &str {
        &self.options.title
    }

    pub fn is_editable(&self) -> bool {
        self.options.editable
    }

    pub fn load_state(&self) -> LoadState {
        self.init.state()
    }

    pub fn is_loading(&self) -> bool {
        self.init.is_loading()
    }

    pub fn editing_target(&self) -> Option<EditTarget> {
        self.editor.target()
    }

    pub fn pending_value(&self) -> Option<&str> {
        self.editor.pending()
    }

    /// Current value of a cell, if the target is in range.
    pub fn cell_value(&self, target: EditTarget) -> Option<&str> {
        match target {
            EditTarget::Date { col } => self.data.date(col),
            EditTarget::ClassName { row } => self.data.class(row).map(|class| class.name()),
            EditTarget::Subject { row, col } => self.data.subject(row, col),
        }
    }

    pub fn begin_edit(&mut self, target: EditTarget) -> Result<(), Refusal> {
        self.ensure_editable()?;
        let current = self
            .cell_value(target)
            .ok_or_else(|| Refusal::Rejected(self.out_of_range(target)))
            .inspect_err(|reason| debug!(%reason, "edit not started"))?
            .to_string();
        self.editor.begin(target, current);
        Ok(())
    }

    pub fn update_pending(&mut self, value: impl Into<String>) -> Result<(), Refusal> {
        if self.editor.update_pending(value) {
            Ok(())
        } else {
            Err(Refusal::NotEditing)
        }
    }

    pub fn commit_edit(&mut self) -> Result<(), Refusal> {
        let edit = self.editor.commit().ok_or(Refusal::NotEditing)?;
        self.apply(edit)
    }

    pub fn cancel_edit(&mut self) -> Result<(), Refusal> {
        if self.editor.cancel() {
            Ok(())
        } else {
            Err(Refusal::NotEditing)
        }
    }

    /// Confirm commits, abort cancels, other keys leave the edit open.
    pub fn handle_key(&mut self, key: EditKey) -> Result<(), Refusal> {
        if !self.editor.is_editing() {
            return Err(Refusal::NotEditing);
        }
        match self.editor.handle_key(key) {
            Some(edit) => self.apply(edit),
            None => Ok(()),
        }
    }

    pub fn blur(&mut self) -> Result<(), Refusal> {
        let edit = self.editor.blur().ok_or(Refusal::NotEditing)?;
        self.apply(edit)
    }

    pub fn add_class(&mut self) -> Result<(), Refusal> {
        self.apply(RoutineEdit::AddClass)
    }

    pub fn add_date(&mut self) -> Result<(), Refusal> {
        self.apply(RoutineEdit::AddDate)
    }

    pub fn delete_class(&mut self, row: usize) -> Result<(), Refusal> {
        self.apply(RoutineEdit::DeleteClass { row })
    }

    pub fn delete_date(&mut self, col: usize) -> Result<(), Refusal> {
        self.apply(RoutineEdit::DeleteDate { col })
    }

    /// Applies one edit and notifies the change sink when it took effect.
    pub fn apply(&mut self, edit: RoutineEdit) -> Result<(), Refusal> {
        let result = self.try_apply(&edit);
        if let Err(reason) = &result {
            debug!(?edit, %reason, "edit refused");
        }
        result
    }

    fn try_apply(&mut self, edit: &RoutineEdit) -> Result<(), Refusal> {
        self.ensure_editable()?;
        if edit.is_structural() {
            if self.init.is_loading() {
                return Err(Refusal::Loading);
            }
            self.flush_open_edit()?;
        }
        let next = self.data.apply(edit)?;
        self.install(next);
        Ok(())
    }

    /// Swaps in a whole routine, e.g. one loaded from disk.
    pub fn replace(&mut self, data: RoutineData) -> Result<(), Refusal> {
        self.ensure_editable()?;
        self.editor.cancel();
        self.install(data);
        Ok(())
    }

    pub fn begin_loading(&mut self) {
        self.init.start_loading();
    }

    /// Hands the result of the class list fetch to the initializer.
    pub fn deliver_class_list(&mut self, result: Result<Vec<ClassRecord>, SourceError>) {
        if let Some(data) = self.init.deliver(result) {
            if self.editor.cancel() {
                debug!("dropped edit started on the placeholder routine");
            }
            self.data = data;
            self.notify();
        }
    }

    pub fn load_classes(&mut self, source: &dyn ClassSource) {
        self.begin_loading();
        let result = source.fetch_classes();
        self.deliver_class_list(result);
    }

    pub fn export(&self, format: ExportFormat) -> Payload {
        export::export(&self.data, &self.options.title, format)
    }

    pub fn export_all(&self) -> Vec<Payload> {
        export::export_all(&self.data, &self.options.title)
    }

    /// Commits an open cell edit before rows or columns shift under it.
    fn flush_open_edit(&mut self) -> Result<(), Refusal> {
        if let Some(pending) = self.editor.blur() {
            debug!(?pending, "committing open edit before structural change");
            let next = self.data.apply(&pending)?;
            self.install(next);
        }
        Ok(())
    }

    fn install(&mut self, data: RoutineData) {
        self.data = data;
        self.init.mark_initialized();
        info!(
            classes = self.data.class_count(),
            dates = self.data.date_count(),
            "routine updated"
        );
        self.notify();
    }

    fn notify(&self) {
        if let Some(sink) = &self.sink {
            sink.routine_changed(&self.data);
        }
    }

    fn ensure_editable(&self) -> Result<(), Refusal> {
        if self.options.editable {
            Ok(())
        } else {
            Err(Refusal::ReadOnly)
        }
    }

    fn out_of_range(&self, target: EditTarget) -> RoutineError {
        let date_error = |col| RoutineError::DateOutOfRange {
            index: col,
            len: self.data.date_count(),
        };
        let class_error = |row| RoutineError::ClassOutOfRange {
            index: row,
            len: self.data.class_count(),
        };
        match target {
            EditTarget::Date { col } => date_error(col),
            EditTarget::ClassName { row } => class_error(row),
            EditTarget::Subject { row, .. } if row >= self.data.class_count() => class_error(row),
            EditTarget::Subject { col, .. } => date_error(col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_session() -> (RoutineSession, Arc<Mutex<Vec<RoutineData>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let session = RoutineSession::new(RoutineOptions::default())
            .with_change_sink(move |data: &RoutineData| {
                sink_seen.lock().unwrap().push(data.clone());
            });
        (session, seen)
    }

    #[test]
    fn committed_edit_notifies_sink() {
        let (mut session, seen) = recording_session();
        session.begin_edit(EditTarget::Subject { row: 0, col: 0 }).unwrap();
        assert_eq!(session.pending_value(), Some(""));
        session.update_pending("Maths").unwrap();
        session.commit_edit().unwrap();
        assert_eq!(session.snapshot().subject(0, 0), Some("Maths"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn refused_edits_do_not_notify() {
        let (mut session, seen) = recording_session();
        assert_eq!(
            session.delete_class(0),
            Err(Refusal::Rejected(RoutineError::LastClass))
        );
        assert_eq!(
            session.begin_edit(EditTarget::Subject { row: 0, col: 4 }),
            Err(Refusal::Rejected(RoutineError::DateOutOfRange { index: 4, len: 1 }))
        );
        assert_eq!(session.commit_edit(), Err(Refusal::NotEditing));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn loading_blocks_structural_edits_only() {
        let (mut session, _) = recording_session();
        session.begin_loading();
        assert_eq!(session.add_class(), Err(Refusal::Loading));
        session
            .apply(RoutineEdit::SetDateLabel {
                col: 0,
                value: "Mon".into(),
            })
            .unwrap();
        assert_eq!(session.snapshot().date(0), Some("Mon"));
    }

    #[test]
    fn structural_edit_commits_open_edit_first() {
        let (mut session, seen) = recording_session();
        session.begin_edit(EditTarget::Date { col: 0 }).unwrap();
        session.update_pending("Mon").unwrap();
        session.add_date().unwrap();
        assert_eq!(session.editing_target(), None);
        assert_eq!(
            session.snapshot().dates(),
            &["Mon".to_string(), "Date 2".to_string()]
        );
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn read_only_session_still_exports() {
        let options = RoutineOptions {
            editable: false,
            ..RoutineOptions::default()
        };
        let mut session = RoutineSession::new(options);
        assert_eq!(session.add_date(), Err(Refusal::ReadOnly));
        assert_eq!(
            session.begin_edit(EditTarget::Date { col: 0 }),
            Err(Refusal::ReadOnly)
        );
        let payload = session.export(ExportFormat::Csv);
        assert_eq!(payload.filename, "Exam_Routine.csv");
    }
}
