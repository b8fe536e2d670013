//! Console reporting: human-readable progress lines or one JSON summary

use serde::Serialize;

use crate::bench::{Phase, PhaseReport};
use crate::config::BenchConfig;
use crate::result_log::format_duration;
use crate::stats::Throughput;

/// Serializable view of one phase
#[derive(Debug, Clone, Serialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    /// Human-readable wall time, as written to the result log
    pub duration: String,
    pub duration_secs: f64,
    pub workers: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub throughput: Throughput,
    /// Messages of the workers that failed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl PhaseSummary {
    pub fn from_report(report: &PhaseReport) -> Self {
        Self {
            phase: report.phase,
            duration: format_duration(report.duration),
            duration_secs: report.duration.as_secs_f64(),
            workers: report.workers,
            succeeded: report.succeeded(),
            failed: report.failures(),
            throughput: Throughput::from_report(report),
            errors: report
                .outcomes
                .iter()
                .filter_map(|o| o.error.as_ref().map(|e| e.to_string()))
                .collect(),
        }
    }
}

/// Outcome of the cleanup step
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupSummary {
    pub skipped: bool,
    pub removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a run produced, for `--format json`
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub config: BenchConfig,
    pub phases: Vec<PhaseSummary>,
    pub cleanup: CleanupSummary,
}

impl RunSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn print_banner() {
    println!("Filesystem sync benchmark with concurrency");
}

pub fn print_phase_start(phase: Phase, config: &BenchConfig) {
    println!(
        "\nStarting Concurrent {} Performance Test with Block Size: {} bytes, Workers: {}",
        phase, config.block_size, config.workers
    );
}

pub fn print_phase_result(summary: &PhaseSummary) {
    println!(
        "Concurrent {} Performance Test completed in: {}",
        summary.phase, summary.duration
    );
    println!(
        "  {:.2} MiB/s, {:.0} ops/s ({} bytes total)",
        summary.throughput.mib_per_sec,
        summary.throughput.ops_per_sec,
        summary.throughput.total_bytes
    );
    if summary.failed > 0 {
        println!("  {} of {} workers failed", summary.failed, summary.workers);
    }
}

pub fn print_cleanup(summary: &CleanupSummary) {
    if summary.skipped {
        println!("Keeping test files.");
    } else if summary.error.is_none() {
        println!("Test files removed successfully.");
    }
}
