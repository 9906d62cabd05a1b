//! Mock archive backends
//!
//! Configurable in-process backends for exercising the publisher without a
//! real archive/signing implementation:
//!
//! - [`RecordingBackend`]: records every request, detects overlapping
//!   invocations for the same output path, and can hold each invocation open
//!   for a fixed duration to widen race windows in tests
//! - [`FailingBackend`]: fails every request with a configurable message

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use walkdir::WalkDir;

use crate::backend::{ArchiveBackend, ArchiveRequest, BackendError};

/// A recorded backend invocation
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The request as handed over by the publisher
    pub request: ArchiveRequest,

    /// Number of filesystem entries under the destination directory
    pub destdir_entries: usize,
}

#[derive(Debug, Default)]
struct RecordingState {
    requests: Vec<RecordedRequest>,
    in_flight: HashSet<PathBuf>,
    overlaps: usize,
}

/// Backend that records requests and writes an empty artifact file
#[derive(Debug, Default)]
pub struct RecordingBackend {
    state: Mutex<RecordingState>,
    hold: Option<Duration>,
}

impl RecordingBackend {
    /// Create a recording backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold each invocation open for `duration` before completing
    pub fn with_hold(mut self, duration: Duration) -> Self {
        self.hold = Some(duration);
        self
    }

    /// All requests seen so far, in completion order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Output paths seen so far, in completion order
    pub fn output_paths(&self) -> Vec<PathBuf> {
        self.requests()
            .iter()
            .map(|r| r.request.output_path.clone())
            .collect()
    }

    /// Number of invocations that overlapped another for the same path
    pub fn overlaps(&self) -> usize {
        self.state.lock().unwrap().overlaps
    }
}

impl ArchiveBackend for RecordingBackend {
    fn create(&self, request: &ArchiveRequest) -> Result<(), BackendError> {
        {
            let mut state = self.state.lock().unwrap();
            if !state.in_flight.insert(request.output_path.clone()) {
                state.overlaps += 1;
            }
        }

        if let Some(hold) = self.hold {
            thread::sleep(hold);
        }

        let destdir_entries = WalkDir::new(&request.destdir)
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .count();

        std::fs::write(&request.output_path, b"")
            .map_err(|err| BackendError::new(err.to_string()))?;

        let mut state = self.state.lock().unwrap();
        state.in_flight.remove(&request.output_path);
        state.requests.push(RecordedRequest {
            request: request.clone(),
            destdir_entries,
        });

        Ok(())
    }
}

/// Backend that fails every request
#[derive(Debug)]
pub struct FailingBackend {
    message: String,
}

impl FailingBackend {
    /// Create a failing backend with the given error message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ArchiveBackend for FailingBackend {
    fn create(&self, _request: &ArchiveRequest) -> Result<(), BackendError> {
        Err(BackendError::new(self.message.clone()))
    }
}
