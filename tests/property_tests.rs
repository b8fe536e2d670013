//! Property-based tests for block accounting and phase results
//!
//! Sizes are kept small so each case touches only a few KiB on disk.

use proptest::prelude::*;
use syncbench::bench::{run_read_phase, run_write_phase};
use syncbench::cleanup::remove_worker_files;
use syncbench::config::BenchConfig;
use tempfile::TempDir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_sync_count_matches_boundaries(
        blocks in 0u64..500,
        sync_freq in 0u64..50,
        block_size in 1usize..8192,
    ) {
        let cfg = BenchConfig {
            block_size,
            data_size: blocks * block_size as u64,
            sync_freq,
            ..BenchConfig::default()
        };

        // Property: one flush per block index on a sync boundary, plus the final one
        let boundaries = (0..cfg.blocks_per_worker()).filter(|&j| cfg.should_sync(j)).count() as u64;
        prop_assert_eq!(cfg.expected_syncs(), boundaries + 1);
    }

    #[test]
    fn prop_truncation_to_whole_blocks(
        data_size in 0u64..1_000_000,
        block_size in 1usize..65536,
    ) {
        let cfg = BenchConfig {
            block_size,
            data_size,
            ..BenchConfig::default()
        };

        // Property: bytes written never exceed the request and lose less than one block
        let written = cfg.bytes_per_worker();
        prop_assert!(written <= data_size);
        prop_assert!(data_size - written < block_size as u64);
        prop_assert_eq!(written % block_size as u64, 0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_write_read_cleanup_roundtrip(
        workers in 1usize..5,
        block_size in 1usize..2048,
        blocks in 0u64..12,
        extra in 0u64..64,
        sync_freq in 0u64..6,
    ) {
        let dir = TempDir::new().unwrap();
        let cfg = BenchConfig {
            block_size,
            data_size: blocks * block_size as u64 + extra.min(block_size as u64 - 1),
            sync_freq,
            workers,
            dir: dir.path().to_path_buf(),
            ..BenchConfig::default()
        };

        let write = run_write_phase(&cfg);
        prop_assert_eq!(write.failures(), 0);
        for outcome in &write.outcomes {
            prop_assert_eq!(outcome.blocks, blocks);
            prop_assert_eq!(outcome.syncs, cfg.expected_syncs());
        }

        // Property: exactly N files, each holding floor(S/B) * B bytes
        let files = cfg.worker_files();
        prop_assert_eq!(files.len(), workers);
        for path in &files {
            prop_assert_eq!(std::fs::metadata(path).unwrap().len(), blocks * block_size as u64);
        }

        let read = run_read_phase(&cfg);
        prop_assert_eq!(read.failures(), 0);
        prop_assert_eq!(read.total_bytes(), write.total_bytes());

        // Property: cleanup removes exactly N files; a second pass fails on the first
        prop_assert_eq!(remove_worker_files(&cfg).unwrap(), workers);
        let err = remove_worker_files(&cfg).unwrap_err();
        prop_assert_eq!(err.removed, 0);
    }
}
