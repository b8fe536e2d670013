//! syncbench - filesystem write/read throughput microbenchmark
//!
//! Each run fans out a fixed number of workers that write zero-filled blocks
//! to their own file with periodic fsync, then reads every file back
//! sequentially. Both phases are timed as a whole and appended to a result
//! log so configurations can be compared across runs.

pub mod bench;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod output;
pub mod result_log;
pub mod runner;
pub mod stats;
pub mod worker;
