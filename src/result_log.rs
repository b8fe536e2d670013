//! Append-only result log, one line per phase

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::bench::{Phase, PhaseReport};

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Error opening log file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Error writing to log file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Render a duration the way Go's `time.Duration` prints it
///
/// Sub-second values use the largest fitting unit (`1.5ms`, `250µs`, `42ns`);
/// longer values are split into hours, minutes and fractional seconds
/// (`1m30.5s`, `1h0m0s`). Zero renders as `0s`.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    match nanos {
        0 => "0s".to_string(),
        n if n < 1_000 => format!("{}ns", n),
        n if n < 1_000_000 => format!("{}µs", decimal(n, 3)),
        n if n < 1_000_000_000 => format!("{}ms", decimal(n, 6)),
        n => {
            let secs = n / 1_000_000_000;
            let sub = n % 1_000_000_000;
            let hours = secs / 3600;
            let minutes = (secs / 60) % 60;

            let mut out = String::new();
            if hours > 0 {
                out.push_str(&format!("{}h", hours));
            }
            if hours > 0 || minutes > 0 {
                out.push_str(&format!("{}m", minutes));
            }
            out.push_str(&decimal((secs % 60) * 1_000_000_000 + sub, 9));
            out.push('s');
            out
        }
    }
}

/// `value / 10^digits` with trailing fractional zeros trimmed
fn decimal(value: u128, digits: u32) -> String {
    let unit = 10u128.pow(digits);
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = digits as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Render one log record, trailing newline included
pub fn format_record(
    phase: Phase,
    block_size: usize,
    data_size: u64,
    workers: usize,
    duration: Duration,
) -> String {
    format!(
        "{} Test - Block Size: {}, Data Size: {}, Goroutines: {}, Duration: {}\n",
        phase,
        block_size,
        data_size,
        workers,
        format_duration(duration)
    )
}

/// Log file held open for the lifetime of a run
///
/// The handle is closed when the value is dropped.
#[derive(Debug)]
pub struct ResultLog {
    path: PathBuf,
    file: File,
}

impl ResultLog {
    /// Open `path` for appending, creating it if absent
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref().to_path_buf();
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Ok(Self { path, file }),
            Err(source) => Err(LogError::Open { path, source }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the record for a finished phase
    pub fn record(&mut self, report: &PhaseReport) -> Result<(), LogError> {
        let line = format_record(
            report.phase,
            report.block_size,
            report.data_size,
            report.workers,
            report.duration,
        );
        self.file
            .write_all(line.as_bytes())
            .map_err(|source| LogError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_report(phase: Phase, workers: usize, duration: Duration) -> PhaseReport {
        PhaseReport {
            phase,
            block_size: 4096,
            data_size: 134217728,
            workers,
            duration,
            outcomes: Vec::new(),
        }
    }

    #[test]
    fn test_format_record() {
        let line = format_record(Phase::Write, 4096, 134217728, 4, Duration::from_millis(1500));
        assert_eq!(
            line,
            "Write Test - Block Size: 4096, Data Size: 134217728, Goroutines: 4, Duration: 1.5s\n"
        );
    }

    #[test]
    fn test_format_record_zero_duration() {
        let line = format_record(Phase::Read, 512, 1024, 0, Duration::ZERO);
        assert_eq!(
            line,
            "Read Test - Block Size: 512, Data Size: 1024, Goroutines: 0, Duration: 0s\n"
        );
    }

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(42)), "42ns");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format_duration(Duration::from_micros(250)), "250µs");
        assert_eq!(format_duration(Duration::from_micros(12_345)), "12.345ms");
        assert_eq!(format_duration(Duration::from_secs(2)), "2s");
        assert_eq!(format_duration(Duration::from_nanos(2_318_745_613)), "2.318745613s");
    }

    #[test]
    fn test_format_duration_minutes_and_hours() {
        assert_eq!(format_duration(Duration::from_millis(90_500)), "1m30.5s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2m0s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(format_duration(Duration::from_secs(3600 + 61)), "1h1m1s");
    }

    #[test]
    fn test_format_record_long_run() {
        let line = format_record(Phase::Write, 4096, 4096, 1, Duration::from_millis(90_500));
        assert!(line.ends_with("Duration: 1m30.5s\n"));
    }

    #[test]
    fn test_open_creates_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("benchmark.log");

        {
            let mut log = ResultLog::open(&path).unwrap();
            log.record(&empty_report(Phase::Write, 2, Duration::from_secs(2)))
                .unwrap();
        }
        {
            let mut log = ResultLog::open(&path).unwrap();
            assert_eq!(log.path(), path.as_path());
            log.record(&empty_report(Phase::Read, 2, Duration::from_secs(1)))
                .unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Write Test - Block Size: 4096"));
        assert!(lines[0].ends_with("Goroutines: 2, Duration: 2s"));
        assert!(lines[1].starts_with("Read Test"));
    }

    #[test]
    fn test_open_failure_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("benchmark.log");

        let err = ResultLog::open(&path).unwrap_err();
        assert!(matches!(err, LogError::Open { .. }));
        assert!(err.to_string().contains("benchmark.log"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_record_failure_reported() {
        if !Path::new("/dev/full").exists() {
            return;
        }
        let mut log = ResultLog::open("/dev/full").unwrap();

        let err = log
            .record(&empty_report(Phase::Write, 1, Duration::from_secs(1)))
            .unwrap_err();
        assert!(matches!(err, LogError::Write { .. }));
        assert!(err.to_string().starts_with("Error writing to log file /dev/full"));
    }
}
