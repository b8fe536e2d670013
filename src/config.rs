//! Immutable run configuration
//!
//! Built once from CLI flags and shared read-only by every worker of both phases.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default block size in bytes (4 KiB)
pub const DEFAULT_BLOCK_SIZE: usize = 4096;
/// Default data size written by each worker (128 MiB)
pub const DEFAULT_DATA_SIZE: u64 = 128 * 1024 * 1024;
/// Default number of blocks between forced flushes
pub const DEFAULT_SYNC_FREQ: u64 = 10_000;
/// Default number of concurrent workers
pub const DEFAULT_WORKERS: usize = 4;
/// Default base name of the per-worker files
pub const DEFAULT_FILE_NAME: &str = "testfile.bin";
/// Default result log path
pub const DEFAULT_LOG_FILE: &str = "benchmark.log";

/// Errors raised while validating a configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid block size: 0 (must be > 0)")]
    ZeroBlockSize,

    #[error("Invalid file name: {0:?} (must be a non-empty name without path separators)")]
    InvalidFileName(String),
}

/// Benchmark parameters for a single run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchConfig {
    /// Size of one block in bytes
    pub block_size: usize,
    /// Bytes each worker writes (truncated to whole blocks)
    pub data_size: u64,
    /// Blocks between forced flushes; 0 flushes only at the end
    pub sync_freq: u64,
    /// Number of concurrent workers per phase
    pub workers: usize,
    /// Directory holding the per-worker files
    pub dir: PathBuf,
    /// Base name of the per-worker files
    pub file_name: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            data_size: DEFAULT_DATA_SIZE,
            sync_freq: DEFAULT_SYNC_FREQ,
            workers: DEFAULT_WORKERS,
            dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl BenchConfig {
    /// Check the invariants the phases rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.file_name.is_empty() || self.file_name.contains(std::path::MAIN_SEPARATOR) {
            return Err(ConfigError::InvalidFileName(self.file_name.clone()));
        }
        Ok(())
    }

    /// Number of blocks each write worker issues
    ///
    /// Remainder bytes of `data_size` that do not fill a whole block are dropped.
    pub fn blocks_per_worker(&self) -> u64 {
        if self.block_size == 0 {
            return 0;
        }
        self.data_size / self.block_size as u64
    }

    /// Bytes each successful write worker leaves on disk
    pub fn bytes_per_worker(&self) -> u64 {
        self.blocks_per_worker() * self.block_size as u64
    }

    /// Whether the write loop flushes after the block at `block_index`
    pub fn should_sync(&self, block_index: u64) -> bool {
        self.sync_freq != 0 && block_index % self.sync_freq == 0
    }

    /// Flushes performed by one successful write worker, final flush included
    pub fn expected_syncs(&self) -> u64 {
        let blocks = self.blocks_per_worker();
        let mid_loop = match self.sync_freq {
            0 => 0,
            freq => blocks.div_ceil(freq),
        };
        mid_loop + 1
    }

    /// Path of the file owned by worker `index`
    pub fn worker_file(&self, index: usize) -> PathBuf {
        worker_file_in(&self.dir, &self.file_name, index)
    }

    /// Paths of every worker file for the configured worker count
    pub fn worker_files(&self) -> Vec<PathBuf> {
        (0..self.workers).map(|i| self.worker_file(i)).collect()
    }
}

fn worker_file_in(dir: &Path, base: &str, index: usize) -> PathBuf {
    dir.join(format!("{}_{}", base, index))
}
