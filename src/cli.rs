//! CLI argument parsing for syncbench

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{
    BenchConfig, DEFAULT_BLOCK_SIZE, DEFAULT_DATA_SIZE, DEFAULT_FILE_NAME, DEFAULT_LOG_FILE,
    DEFAULT_SYNC_FREQ, DEFAULT_WORKERS,
};
use crate::runner::RunOptions;

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable progress lines (default)
    Text,
    /// Single JSON summary for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "syncbench")]
#[command(version)]
#[command(about = "Filesystem write/read throughput benchmark with periodic fsync", long_about = None)]
pub struct Cli {
    /// Size of blocks in bytes
    #[arg(long = "block-size", alias = "blocksize", value_name = "BYTES", default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: usize,

    /// Total size of data each worker writes (in bytes)
    #[arg(long = "data-size", alias = "datasize", value_name = "BYTES", default_value_t = DEFAULT_DATA_SIZE)]
    pub data_size: u64,

    /// Number of blocks between forced flushes (0 = flush only at the end)
    #[arg(long = "sync-freq", alias = "syncfreq", value_name = "BLOCKS", default_value_t = DEFAULT_SYNC_FREQ)]
    pub sync_freq: u64,

    /// Number of concurrent workers
    #[arg(short = 'j', long = "workers", alias = "goroutines", value_name = "N", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Directory for the per-worker test files
    #[arg(long = "dir", value_name = "PATH", default_value = ".")]
    pub dir: PathBuf,

    /// Base name of the per-worker test files
    #[arg(long = "file-name", value_name = "NAME", default_value = DEFAULT_FILE_NAME)]
    pub file_name: String,

    /// Result log (appended to, created if absent)
    #[arg(long = "log-file", value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Console output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Leave the test files in place after the read phase
    #[arg(long = "keep-files")]
    pub keep_files: bool,

    /// Enable trace-level diagnostic logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Build the benchmark configuration; `runner::run` validates it
    pub fn config(&self) -> BenchConfig {
        BenchConfig {
            block_size: self.block_size,
            data_size: self.data_size,
            sync_freq: self.sync_freq,
            workers: self.workers,
            dir: self.dir.clone(),
            file_name: self.file_name.clone(),
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            log_file: self.log_file.clone(),
            format: self.format,
            keep_files: self.keep_files,
        }
    }
}
