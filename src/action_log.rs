use log::info;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Grid edits and run control performed by the user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    PlaceStart { row: usize, col: usize },
    PlaceEnd { row: usize, col: usize },
    PlaceBarrier { row: usize, col: usize },
    Erase { row: usize, col: usize },
    RunStarted,
    /// `result` is one of "found", "no_path", "cancelled"
    RunFinished {
        result: String,
        path_len: Option<usize>,
        expanded: usize,
    },
    ClearSearch,
    Reset,
    LoadLayout { rows: usize },
}

/// Logged action with timestamp
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedAction {
    /// Milliseconds since the log was created
    pub timestamp_ms: u64,
    pub action: Action,
}

/// Session action logger
pub struct ActionLog {
    start_time: Instant,
    actions: Vec<LoggedAction>,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        ActionLog {
            start_time: Instant::now(),
            actions: Vec::new(),
        }
    }

    pub fn log(&mut self, action: Action) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.actions.push(LoggedAction {
            timestamp_ms,
            action,
        });
    }

    pub fn actions(&self) -> &[LoggedAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.actions)?;
        std::fs::write(path, json)?;
        info!("wrote {} actions to {}", self.actions.len(), path);
        Ok(())
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut barriers = 0;
        let mut erased = 0;
        let mut runs = 0;
        let mut found = 0;
        let mut resets = 0;

        for logged in &self.actions {
            match &logged.action {
                Action::PlaceBarrier { .. } => barriers += 1,
                Action::Erase { .. } => erased += 1,
                Action::RunStarted => runs += 1,
                Action::RunFinished { path_len: Some(_), .. } => found += 1,
                Action::Reset => resets += 1,
                _ => {}
            }
        }

        let duration = self.actions.last().map_or(0, |last| last.timestamp_ms);

        format!(
            "Session Duration: {}ms\n\
             Total Events: {}\n\
             Grid Edits: {} barriers placed, {} cells erased, {} resets\n\
             Searches: {} started, {} found a path",
            duration,
            self.actions.len(),
            barriers,
            erased,
            resets,
            runs,
            found
        )
    }
}
