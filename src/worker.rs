//! Per-worker outcomes and the fan-out/join barrier shared by both phases
//!
//! Every worker owns exactly one file, so workers never coordinate with each
//! other. A failure ends that worker's own work and is recorded in its
//! [`WorkerOutcome`]; siblings and the phase timing are unaffected.

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// I/O failure that ended a single worker early
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Error creating file {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("Error opening file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Error writing to file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Error syncing to disk {}: {source}", .path.display())]
    Sync { path: PathBuf, source: io::Error },

    #[error("Error reading file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Error allocating {size}-byte block for {}: {source}", .path.display())]
    Alloc {
        path: PathBuf,
        size: usize,
        source: TryReserveError,
    },

    #[error("Error spawning worker {index}: {source}")]
    Spawn { index: usize, source: io::Error },

    #[error("Worker {index} panicked: {message}")]
    Panicked { index: usize, message: String },
}

/// Result of one worker for one phase
#[derive(Debug)]
pub struct WorkerOutcome {
    /// Worker index (also the file suffix)
    pub index: usize,
    /// File the worker operated on
    pub path: PathBuf,
    /// Blocks written, or non-empty reads performed
    pub blocks: u64,
    /// Bytes written or read before the worker finished
    pub bytes: u64,
    /// Forced flushes issued (always 0 for readers)
    pub syncs: u64,
    /// Set when the worker abandoned its work
    pub error: Option<WorkerError>,
}

impl WorkerOutcome {
    /// Fresh outcome with zeroed counters
    pub fn new(index: usize, path: PathBuf) -> Self {
        Self {
            index,
            path,
            blocks: 0,
            bytes: 0,
            syncs: 0,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Record the error that ended this worker and report it
    pub fn fail(&mut self, error: WorkerError) {
        tracing::warn!(worker = self.index, "{}", error);
        self.error = Some(error);
    }
}

/// Spawn `workers` scoped threads running `job(index)` and wait for all of them
///
/// The returned duration spans the first spawn through the last join. Outcomes
/// are returned in index order. A worker whose thread cannot be created, or
/// that panics, yields a failed outcome; the others run to completion.
pub fn fan_out<F>(workers: usize, job: F) -> (Vec<WorkerOutcome>, Duration)
where
    F: Fn(usize) -> WorkerOutcome + Sync,
{
    fan_out_with(workers, job, |index| Ok(worker_builder(index)))
}

fn worker_builder(index: usize) -> thread::Builder {
    thread::Builder::new().name(format!("worker-{}", index))
}

fn fan_out_with<F, B>(workers: usize, job: F, builder: B) -> (Vec<WorkerOutcome>, Duration)
where
    F: Fn(usize) -> WorkerOutcome + Sync,
    B: Fn(usize) -> io::Result<thread::Builder>,
{
    let start = Instant::now();
    let job = &job;

    let joined: Vec<io::Result<thread::Result<WorkerOutcome>>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|index| {
                builder(index).and_then(|b| b.spawn_scoped(scope, move || job(index)))
            })
            .collect();
        handles
            .into_iter()
            .map(|spawned| spawned.map(|h| h.join()))
            .collect()
    });

    let duration = start.elapsed();

    let outcomes = joined
        .into_iter()
        .enumerate()
        .map(|(index, result)| match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(payload)) => {
                let mut outcome = WorkerOutcome::new(index, PathBuf::new());
                outcome.fail(WorkerError::Panicked {
                    index,
                    message: panic_message(payload.as_ref()),
                });
                outcome
            }
            Err(source) => {
                let mut outcome = WorkerOutcome::new(index, PathBuf::new());
                outcome.fail(WorkerError::Spawn { index, source });
                outcome
            }
        })
        .collect();

    (outcomes, duration)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
