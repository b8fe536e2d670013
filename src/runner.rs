//! Run orchestration: log setup, write phase, read phase, cleanup

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::bench::{run_read_phase, run_write_phase, Phase, PhaseReport};
use crate::cleanup::remove_worker_files;
use crate::cli::OutputFormat;
use crate::config::{BenchConfig, DEFAULT_LOG_FILE};
use crate::output::{self, CleanupSummary, PhaseSummary, RunSummary};
use crate::result_log::ResultLog;

/// Run-level options that are not benchmark parameters
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub log_file: PathBuf,
    pub format: OutputFormat,
    pub keep_files: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            format: OutputFormat::Text,
            keep_files: false,
        }
    }
}

/// Execute one full benchmark run
///
/// Fails before any I/O if the configuration is invalid or the result log
/// cannot be opened. Worker and cleanup failures do not fail the run; they are
/// reported in the returned summary.
pub fn run(config: &BenchConfig, options: &RunOptions) -> Result<RunSummary> {
    config.validate()?;

    let text = matches!(options.format, OutputFormat::Text);
    if text {
        output::print_banner();
    }

    let mut log = ResultLog::open(&options.log_file).context("Failed to set up result log")?;
    tracing::debug!(log = %log.path().display(), ?config, "starting run");

    let mut phases = Vec::with_capacity(2);
    for phase in [Phase::Write, Phase::Read] {
        if text {
            output::print_phase_start(phase, config);
        }
        let report = match phase {
            Phase::Write => run_write_phase(config),
            Phase::Read => run_read_phase(config),
        };
        let summary = finish_phase(&mut log, &report);
        if text {
            output::print_phase_result(&summary);
        }
        phases.push(summary);
    }

    let cleanup = if options.keep_files {
        CleanupSummary {
            skipped: true,
            ..CleanupSummary::default()
        }
    } else {
        match remove_worker_files(config) {
            Ok(removed) => CleanupSummary {
                skipped: false,
                removed,
                error: None,
            },
            Err(e) => CleanupSummary {
                skipped: false,
                removed: e.removed,
                error: Some(e.to_string()),
            },
        }
    };
    if text {
        output::print_cleanup(&cleanup);
    }

    Ok(RunSummary {
        config: config.clone(),
        phases,
        cleanup,
    })
}

fn finish_phase(log: &mut ResultLog, report: &PhaseReport) -> PhaseSummary {
    tracing::info!(
        phase = %report.phase,
        duration = ?report.duration,
        failed = report.failures(),
        "phase complete"
    );
    if let Err(e) = log.record(report) {
        tracing::error!("{}", e);
    }
    PhaseSummary::from_report(report)
}
