use super::Payload;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("clipboard write failed: {message}")]
pub struct ClipboardError {
    message: String,
}

impl ClipboardError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Anything that can take text on behalf of the user's clipboard.
pub trait ClipboardSink {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

impl<F> ClipboardSink for F
where
    F: Fn(&str) -> Result<(), ClipboardError>,
{
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    CopiedWithFallback { primary: ClipboardError },
    Failed {
        primary: ClipboardError,
        fallback: ClipboardError,
    },
}

impl CopyOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, CopyOutcome::Failed { .. })
    }

    /// Message to show the user once the copy attempt is over.
    pub fn acknowledgement(&self) -> String {
        match self {
            CopyOutcome::Copied | CopyOutcome::CopiedWithFallback { .. } => {
                "Routine copied to clipboard.".to_string()
            }
            CopyOutcome::Failed { fallback, .. } => {
                format!("Could not copy routine: {fallback}")
            }
        }
    }
}

/// Writes the payload through `primary`, retrying once through `fallback`.
pub fn copy_with_fallback(
    payload: &Payload,
    primary: &dyn ClipboardSink,
    fallback: &dyn ClipboardSink,
) -> CopyOutcome {
    let primary_err = match primary.write_text(&payload.content) {
        Ok(()) => {
            info!(bytes = payload.content.len(), "routine copied to clipboard");
            return CopyOutcome::Copied;
        }
        Err(err) => err,
    };
    warn!(error = %primary_err, "clipboard write failed, using fallback copy");
    match fallback.write_text(&payload.content) {
        Ok(()) => CopyOutcome::CopiedWithFallback {
            primary: primary_err,
        },
        Err(fallback_err) => {
            warn!(error = %fallback_err, "fallback copy failed");
            CopyOutcome::Failed {
                primary: primary_err,
                fallback: fallback_err,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ExportFormat, export};
    use crate::routine::RoutineData;
    use std::cell::RefCell;

    fn payload() -> Payload {
        export(&RoutineData::default(), "Routine", ExportFormat::Clipboard)
    }

    fn failing(_: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::new("denied"))
    }

    #[test]
    fn primary_success_skips_fallback() {
        let copied = RefCell::new(Vec::new());
        let primary = |text: &str| -> Result<(), ClipboardError> {
            copied.borrow_mut().push(text.to_string());
            Ok(())
        };
        let outcome = copy_with_fallback(&payload(), &primary, &failing);
        assert_eq!(outcome, CopyOutcome::Copied);
        assert_eq!(copied.borrow().len(), 1);
        assert_eq!(outcome.acknowledgement(), "Routine copied to clipboard.");
    }

    #[test]
    fn fallback_success_is_still_acknowledged() {
        let fallback = |_: &str| -> Result<(), ClipboardError> { Ok(()) };
        let outcome = copy_with_fallback(&payload(), &failing, &fallback);
        assert!(outcome.is_success());
        assert!(matches!(outcome, CopyOutcome::CopiedWithFallback { .. }));
        assert_eq!(outcome.acknowledgement(), "Routine copied to clipboard.");
    }

    #[test]
    fn both_paths_failing_is_reported() {
        let outcome = copy_with_fallback(&payload(), &failing, &failing);
        assert!(!outcome.is_success());
        assert!(outcome.acknowledgement().contains("denied"));
    }
}
