use crate::routine::ClassRow;
use thiserror::Error;

/// Structural problems that make a grid unusable as a routine snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("routine must have at least one date column")]
    NoDates,
    #[error("routine must have at least one class row")]
    NoClasses,
    #[error("class '{name}' (row {row}) has {found} subjects but there are {expected} dates")]
    Ragged {
        row: usize,
        name: String,
        found: usize,
        expected: usize,
    },
}

pub fn validate_shape(dates: &[String], classes: &[ClassRow]) -> Result<(), ShapeError> {
    if dates.is_empty() {
        return Err(ShapeError::NoDates);
    }
    if classes.is_empty() {
        return Err(ShapeError::NoClasses);
    }
    for (row, class) in classes.iter().enumerate() {
        if class.subjects().len() != dates.len() {
            return Err(ShapeError::Ragged {
                row,
                name: class.name().to_string(),
                found: class.subjects().len(),
                expected: dates.len(),
            });
        }
    }
    Ok(())
}

pub fn is_rectangular(dates: &[String], classes: &[ClassRow]) -> bool {
    classes
        .iter()
        .all(|class| class.subjects().len() == dates.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, subjects: &[&str]) -> ClassRow {
        ClassRow::new(name, subjects.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn rejects_empty_axes() {
        let dates = vec!["D1".to_string()];
        assert_eq!(validate_shape(&[], &[row("A", &[])]), Err(ShapeError::NoDates));
        assert_eq!(validate_shape(&dates, &[]), Err(ShapeError::NoClasses));
    }

    #[test]
    fn reports_first_ragged_row() {
        let dates = vec!["D1".to_string(), "D2".to_string()];
        let classes = vec![row("A", &["x", "y"]), row("B", &["x"])];
        let err = validate_shape(&dates, &classes).unwrap_err();
        assert_eq!(
            err,
            ShapeError::Ragged {
                row: 1,
                name: "B".into(),
                found: 1,
                expected: 2
            }
        );
        assert!(err.to_string().contains("class 'B'"));
        assert!(!is_rectangular(&dates, &classes));
    }
}
