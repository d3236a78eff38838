//! PATH collaborator that records every call

use devstack_core::{Error, Result};
use devstack_engine::PathManager;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct RecordingPathManager {
    calls: Mutex<Vec<Vec<PathBuf>>>,
    fail: bool,
}

impl RecordingPathManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records calls but reports every removal as failed
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Vec<PathBuf>> {
        self.calls.lock().unwrap().clone()
    }
}

impl PathManager for RecordingPathManager {
    fn remove_from_path(&self, dirs: &[PathBuf]) -> Result<()> {
        self.calls.lock().unwrap().push(dirs.to_vec());
        if self.fail {
            return Err(Error::invalid_config("PATH is read-only"));
        }
        Ok(())
    }
}
