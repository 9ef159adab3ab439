use crate::validation::{self, ShapeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label given to the single date column of a freshly initialized routine.
pub const DEFAULT_DATE_LABEL: &str = "Select Date";

/// One row of the routine grid: a class and one subject per date column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRow {
    name: String,
    subjects: Vec<String>,
}

impl ClassRow {
    pub fn new(name: impl Into<String>, subjects: Vec<String>) -> Self {
        Self {
            name: name.into(),
            subjects,
        }
    }

    /// A row with `width` empty subjects.
    pub fn blank(name: impl Into<String>, width: usize) -> Self {
        Self::new(name, vec![String::new(); width])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn subject(&self, col: usize) -> Option<&str> {
        self.subjects.get(col).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutineError {
    #[error("date column {index} is out of range ({len} columns)")]
    DateOutOfRange { index: usize, len: usize },
    #[error("class row {index} is out of range ({len} rows)")]
    ClassOutOfRange { index: usize, len: usize },
    #[error("cannot delete the only remaining date column")]
    LastDate,
    #[error("cannot delete the only remaining class row")]
    LastClass,
    #[error("invalid routine shape: {0}")]
    Shape(#[from] ShapeError),
}

/// A single mutation of a routine, addressable by index.
///
/// Every variant maps onto exactly one [`RoutineData`] operation, which lets
/// front-ends (CLI, HTTP) funnel user actions through [`RoutineData::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RoutineEdit {
    SetDateLabel { col: usize, value: String },
    SetClassName { row: usize, value: String },
    SetSubject { row: usize, col: usize, value: String },
    AddClass,
    AddDate,
    DeleteDate { col: usize },
    DeleteClass { row: usize },
}

impl RoutineEdit {
    /// Structural edits change the number of rows or columns.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            RoutineEdit::AddClass
                | RoutineEdit::AddDate
                | RoutineEdit::DeleteDate { .. }
                | RoutineEdit::DeleteClass { .. }
        )
    }
}

/// Snapshot of the routine grid: date columns by class rows.
///
/// Every row always carries exactly one subject per date, and both axes hold
/// at least one entry. Operations never mutate in place; each returns the
/// next snapshot or the reason it was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRoutine")]
pub struct RoutineData {
    dates: Vec<String>,
    classes: Vec<ClassRow>,
}

#[derive(Deserialize)]
struct RawRoutine {
    dates: Vec<String>,
    classes: Vec<ClassRow>,
}

impl TryFrom<RawRoutine> for RoutineData {
    type Error = ShapeError;

    fn try_from(raw: RawRoutine) -> Result<Self, Self::Error> {
        RoutineData::new(raw.dates, raw.classes)
    }
}

impl Default for RoutineData {
    /// One "Select Date" column and one unnamed class with an empty subject.
    fn default() -> Self {
        Self {
            dates: vec![DEFAULT_DATE_LABEL.to_string()],
            classes: vec![ClassRow::blank("", 1)],
        }
    }
}

impl RoutineData {
    pub fn new(dates: Vec<String>, classes: Vec<ClassRow>) -> Result<Self, ShapeError> {
        validation::validate_shape(&dates, &classes)?;
        Ok(Self { dates, classes })
    }

    /// Initial routine for a list of class names: a single "Select Date"
    /// column and one blank row per class. Returns `None` for an empty list.
    pub fn from_class_names<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<ClassRow> = names
            .into_iter()
            .map(|name| ClassRow::blank(name, 1))
            .collect();
        Self::new(vec![DEFAULT_DATE_LABEL.to_string()], classes).ok()
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn classes(&self) -> &[ClassRow] {
        &self.classes
    }

    pub fn date_count(&self) -> usize {
        self.dates.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn date(&self, col: usize) -> Option<&str> {
        self.dates.get(col).map(String::as_str)
    }

    pub fn class(&self, row: usize) -> Option<&ClassRow> {
        self.classes.get(row)
    }

    pub fn subject(&self, row: usize, col: usize) -> Option<&str> {
        self.classes.get(row).and_then(|class| class.subject(col))
    }

    pub fn apply(&self, edit: &RoutineEdit) -> Result<Self, RoutineError> {
        match edit {
            RoutineEdit::SetDateLabel { col, value } => self.set_date_label(*col, value.clone()),
            RoutineEdit::SetClassName { row, value } => self.set_class_name(*row, value.clone()),
            RoutineEdit::SetSubject { row, col, value } => {
                self.set_subject(*row, *col, value.clone())
            }
            RoutineEdit::AddClass => Ok(self.add_class()),
            RoutineEdit::AddDate => Ok(self.add_date()),
            RoutineEdit::DeleteDate { col } => self.delete_date(*col),
            RoutineEdit::DeleteClass { row } => self.delete_class(*row),
        }
    }

    pub fn set_date_label(
        &self,
        col: usize,
        value: impl Into<String>,
    ) -> Result<Self, RoutineError> {
        self.check_col(col)?;
        let mut next = self.clone();
        next.dates[col] = value.into();
        Ok(next)
    }

    pub fn set_class_name(
        &self,
        row: usize,
        value: impl Into<String>,
    ) -> Result<Self, RoutineError> {
        self.check_row(row)?;
        let mut next = self.clone();
        next.classes[row].name = value.into();
        Ok(next)
    }

    pub fn set_subject(
        &self,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<Self, RoutineError> {
        self.check_row(row)?;
        self.check_col(col)?;
        let mut next = self.clone();
        next.classes[row].subjects[col] = value.into();
        Ok(next)
    }

    /// Appends "Class N" (N = new row count) with one empty subject per date.
    pub fn add_class(&self) -> Self {
        let mut next = self.clone();
        let name = format!("Class {}", self.classes.len() + 1);
        next.classes.push(ClassRow::blank(name, self.dates.len()));
        next
    }

    /// Appends "Date N" (N = new column count) and an empty subject to every row.
    pub fn add_date(&self) -> Self {
        let mut next = self.clone();
        let label = format!("Date {}", self.dates.len() + 1);
        next.resize_columns(ColumnChange::Append(label));
        next
    }

    pub fn delete_date(&self, col: usize) -> Result<Self, RoutineError> {
        self.check_col(col)?;
        if self.dates.len() == 1 {
            return Err(RoutineError::LastDate);
        }
        let mut next = self.clone();
        next.resize_columns(ColumnChange::Remove(col));
        Ok(next)
    }

    pub fn delete_class(&self, row: usize) -> Result<Self, RoutineError> {
        self.check_row(row)?;
        if self.classes.len() == 1 {
            return Err(RoutineError::LastClass);
        }
        let mut next = self.clone();
        next.classes.remove(row);
        Ok(next)
    }

    // Sole place where the column count changes; dates and every row move together.
    fn resize_columns(&mut self, change: ColumnChange) {
        match change {
            ColumnChange::Append(label) => {
                self.dates.push(label);
                for class in &mut self.classes {
                    class.subjects.push(String::new());
                }
            }
            ColumnChange::Remove(col) => {
                self.dates.remove(col);
                for class in &mut self.classes {
                    class.subjects.remove(col);
                }
            }
        }
        debug_assert!(validation::is_rectangular(&self.dates, &self.classes));
    }

    fn check_col(&self, col: usize) -> Result<(), RoutineError> {
        if col < self.dates.len() {
            Ok(())
        } else {
            Err(RoutineError::DateOutOfRange {
                index: col,
                len: self.dates.len(),
            })
        }
    }

    fn check_row(&self, row: usize) -> Result<(), RoutineError> {
        if row < self.classes.len() {
            Ok(())
        } else {
            Err(RoutineError::ClassOutOfRange {
                index: row,
                len: self.classes.len(),
            })
        }
    }
}

enum ColumnChange {
    Append(String),
    Remove(usize),
}
