//! Throughput figures derived from a phase report
//!
//! Console-only; the result log keeps its fixed one-line format.

use serde::Serialize;

use crate::bench::PhaseReport;

const MIB: f64 = 1024.0 * 1024.0;

/// Aggregate throughput of one phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Throughput {
    /// Bytes moved by all workers
    pub total_bytes: u64,
    /// Block operations issued by all workers
    pub total_ops: u64,
    /// MiB per second over the phase wall time
    pub mib_per_sec: f64,
    /// Block operations per second over the phase wall time
    pub ops_per_sec: f64,
}

impl Throughput {
    pub fn from_report(report: &PhaseReport) -> Self {
        let total_bytes = report.total_bytes();
        let total_ops = report.total_blocks();
        let secs = report.duration.as_secs_f64();

        if secs == 0.0 {
            return Self {
                total_bytes,
                total_ops,
                mib_per_sec: 0.0,
                ops_per_sec: 0.0,
            };
        }

        Self {
            total_bytes,
            total_ops,
            mib_per_sec: total_bytes as f64 / MIB / secs,
            ops_per_sec: total_ops as f64 / secs,
        }
    }
}
