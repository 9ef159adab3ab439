use crate::routine::RoutineData;
use crate::source::{ClassRecord, SourceError};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Progress of the one-off class list load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Seeds a routine from the external class list, at most once.
///
/// After it has produced a routine, or after the owner reports that the
/// routine was supplied or edited some other way, later deliveries are
/// ignored so they can never overwrite user edits.
#[derive(Debug)]
pub struct Initializer {
    state: LoadState,
    initialized: bool,
}

impl Default for Initializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Initializer {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            initialized: false,
        }
    }

    /// For routines supplied by the caller: they win over the class list.
    pub fn preinitialized() -> Self {
        Self {
            state: LoadState::Idle,
            initialized: true,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn start_loading(&mut self) {
        self.state = LoadState::Loading;
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    /// Consumes a class list delivery. Returns the routine to install, if any.
    pub fn deliver(
        &mut self,
        result: Result<Vec<ClassRecord>, SourceError>,
    ) -> Option<RoutineData> {
        let records = match result {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "class list unavailable, keeping default routine");
                self.state = LoadState::Failed;
                return None;
            }
        };
        self.state = LoadState::Ready;
        if self.initialized {
            debug!(
                classes = records.len(),
                "routine already initialized, ignoring class list"
            );
            return None;
        }
        match initial_routine(&records) {
            Some(data) => {
                info!(classes = data.class_count(), "initialized routine from class list");
                self.initialized = true;
                Some(data)
            }
            None => {
                warn!("class list is empty, keeping default routine");
                None
            }
        }
    }
}

/// One "Select Date" column and a blank row per class record.
pub fn initial_routine(records: &[ClassRecord]) -> Option<RoutineData> {
    RoutineData::from_class_names(records.iter().map(|record| record.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(names: &[&str]) -> Vec<ClassRecord> {
        names.iter().map(|name| ClassRecord::new(*name)).collect()
    }

    #[test]
    fn first_delivery_initializes() {
        let mut init = Initializer::new();
        init.start_loading();
        assert!(init.is_loading());
        let data = init.deliver(Ok(records(&["Grade 1", "Grade 2"]))).unwrap();
        assert_eq!(data.dates(), &["Select Date".to_string()]);
        assert_eq!(data.class(1).unwrap().name(), "Grade 2");
        assert_eq!(init.state(), LoadState::Ready);
    }

    #[test]
    fn second_delivery_is_ignored() {
        let mut init = Initializer::new();
        assert!(init.deliver(Ok(records(&["Grade 1"]))).is_some());
        assert!(init.deliver(Ok(records(&["Grade 9"]))).is_none());
    }

    #[test]
    fn caller_supplied_routine_takes_precedence() {
        let mut init = Initializer::preinitialized();
        assert!(init.deliver(Ok(records(&["Grade 1"]))).is_none());
    }

    #[test]
    fn failure_and_empty_list_keep_default() {
        let mut init = Initializer::new();
        init.start_loading();
        let failed = init.deliver(Err(SourceError::Unsuccessful("offline".into())));
        assert!(failed.is_none());
        assert_eq!(init.state(), LoadState::Failed);
        assert!(!init.is_initialized());

        assert!(init.deliver(Ok(Vec::new())).is_none());
        assert!(!init.is_initialized());
    }
}
