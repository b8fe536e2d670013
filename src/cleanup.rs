//! Removal of the per-worker files after both phases
//!
//! Unlike the phases, cleanup is not fault-isolated: it stops at the first
//! file it cannot remove and leaves the rest in place.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::BenchConfig;

#[derive(Error, Debug)]
#[error("Error cleaning up test file {}: {source}", .path.display())]
pub struct CleanupError {
    /// File whose removal failed
    pub path: PathBuf,
    /// Files removed before the failure
    pub removed: usize,
    pub source: io::Error,
}

/// Delete the worker files in index order, returning how many were removed
pub fn remove_worker_files(config: &BenchConfig) -> Result<usize, CleanupError> {
    let mut removed = 0;
    for path in config.worker_files() {
        if let Err(source) = std::fs::remove_file(&path) {
            tracing::error!(removed, "cleanup stopped at {}: {}", path.display(), source);
            return Err(CleanupError {
                path,
                removed,
                source,
            });
        }
        tracing::trace!("removed {}", path.display());
        removed += 1;
    }
    Ok(removed)
}
