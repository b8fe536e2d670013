//! Concurrent write and read phases
//!
//! Write: each worker creates its own file and writes zero-filled blocks,
//! flushing to durable storage every `sync_freq` blocks and once more at the end.
//! Read: each worker reopens the same-indexed file and reads it block by block
//! until end of file. Content is never compared.

use serde::Serialize;
use std::collections::TryReserveError;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use crate::config::BenchConfig;
use crate::worker::{fan_out, WorkerError, WorkerOutcome};

/// Benchmark phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Write,
    Read,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Write => write!(f, "Write"),
            Phase::Read => write!(f, "Read"),
        }
    }
}

/// Aggregate result of one phase
#[derive(Debug)]
pub struct PhaseReport {
    pub phase: Phase,
    pub block_size: usize,
    pub data_size: u64,
    pub workers: usize,
    /// Wall time from the first worker spawn through the last join
    pub duration: Duration,
    pub outcomes: Vec<WorkerOutcome>,
}

impl PhaseReport {
    fn new(phase: Phase, config: &BenchConfig, outcomes: Vec<WorkerOutcome>, duration: Duration) -> Self {
        Self {
            phase,
            block_size: config.block_size,
            data_size: config.data_size,
            workers: config.workers,
            duration,
            outcomes,
        }
    }

    /// Workers that abandoned their work
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }

    /// Workers that completed their work
    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failures()
    }

    /// Bytes moved by all workers, failed ones included up to their failure
    pub fn total_bytes(&self) -> u64 {
        self.outcomes.iter().map(|o| o.bytes).sum()
    }

    /// Block operations issued by all workers
    pub fn total_blocks(&self) -> u64 {
        self.outcomes.iter().map(|o| o.blocks).sum()
    }
}

/// Run the concurrent write phase
pub fn run_write_phase(config: &BenchConfig) -> PhaseReport {
    let _span = tracing::info_span!("write_phase", workers = config.workers).entered();
    let (outcomes, duration) = fan_out(config.workers, |index| write_worker(config, index));
    PhaseReport::new(Phase::Write, config, outcomes, duration)
}

/// Run the concurrent read phase over the files left by the write phase
pub fn run_read_phase(config: &BenchConfig) -> PhaseReport {
    let _span = tracing::info_span!("read_phase", workers = config.workers).entered();
    let (outcomes, duration) = fan_out(config.workers, |index| read_worker(config, index));
    PhaseReport::new(Phase::Read, config, outcomes, duration)
}

fn write_worker(config: &BenchConfig, index: usize) -> WorkerOutcome {
    let path = config.worker_file(index);
    let mut outcome = WorkerOutcome::new(index, path.clone());

    let mut file = match OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
    {
        Ok(f) => f,
        Err(source) => {
            outcome.fail(WorkerError::Create { path, source });
            return outcome;
        }
    };

    let blocks = config.blocks_per_worker();
    let block = if blocks == 0 {
        Vec::new()
    } else {
        match zeroed_block(config.block_size) {
            Ok(b) => b,
            Err(source) => {
                outcome.fail(WorkerError::Alloc {
                    path,
                    size: config.block_size,
                    source,
                });
                return outcome;
            }
        }
    };

    for j in 0..blocks {
        if let Err(source) = file.write_all(&block) {
            outcome.fail(WorkerError::Write { path, source });
            return outcome;
        }
        outcome.blocks += 1;
        outcome.bytes += block.len() as u64;

        if config.should_sync(j) {
            if let Err(source) = file.sync_all() {
                outcome.fail(WorkerError::Sync { path, source });
                return outcome;
            }
            outcome.syncs += 1;
        }
    }

    if let Err(source) = file.sync_all() {
        outcome.fail(WorkerError::Sync { path, source });
        return outcome;
    }
    outcome.syncs += 1;

    tracing::debug!(
        worker = index,
        blocks = outcome.blocks,
        syncs = outcome.syncs,
        "write worker finished"
    );
    outcome
}

/// Allocate one block without aborting the process when memory is short
fn zeroed_block(len: usize) -> Result<Vec<u8>, TryReserveError> {
    let mut block = Vec::new();
    block.try_reserve_exact(len)?;
    block.resize(len, 0);
    Ok(block)
}

fn read_worker(config: &BenchConfig, index: usize) -> WorkerOutcome {
    let path = config.worker_file(index);
    let mut outcome = WorkerOutcome::new(index, path.clone());

    let mut file = match File::open(&path) {
        Ok(f) => f,
        Err(source) => {
            outcome.fail(WorkerError::Open { path, source });
            return outcome;
        }
    };

    let mut buf = match zeroed_block(config.block_size) {
        Ok(b) => b,
        Err(source) => {
            outcome.fail(WorkerError::Alloc {
                path,
                size: config.block_size,
                source,
            });
            return outcome;
        }
    };
    loop {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                outcome.blocks += 1;
                outcome.bytes += n as u64;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                outcome.fail(WorkerError::Read { path, source });
                return outcome;
            }
        }
    }

    tracing::debug!(
        worker = index,
        reads = outcome.blocks,
        bytes = outcome.bytes,
        "read worker finished"
    );
    outcome
}
