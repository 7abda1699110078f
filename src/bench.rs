//! Benchmark orchestration: configuration, the reader workforce, and the
//! timed load window.
//!
//! The measured window opens immediately before the reader threads are
//! spawned (the background writer, if any, is already running by then) and
//! closes immediately after the last reader joins. Setup and teardown are
//! deliberately outside it.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use redb::{Database, ReadableTable};

use crate::populate::{self, TABLE};
use crate::report::BenchResult;
use crate::store;
use crate::writer;

/// Run parameters. Parsed, never range-validated: `threads: 0` spawns no
/// workers and the load window closes immediately.
#[derive(Debug, Clone, Copy)]
pub struct BenchConfig {
    /// Key/value pairs to seed before the load phase.
    pub items: usize,
    /// Reader thread count.
    pub threads: usize,
    /// Full scans performed by each reader.
    pub iters: usize,
    /// Whether to run the write contender during the load phase.
    pub background_writer: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            items: 1000,
            threads: 1,
            iters: 1000,
            background_writer: true,
        }
    }
}

impl BenchConfig {
    /// Parse the four positional CLI arguments
    /// `<items> <threads> <iters> <backgroundWriter>`.
    pub fn from_positional(args: &[String]) -> Result<Self> {
        anyhow::ensure!(args.len() == 4, "expected 4 arguments, got {}", args.len());
        let items = args[0]
            .parse()
            .with_context(|| format!("items is not an integer: {:?}", args[0]))?;
        let threads = args[1]
            .parse()
            .with_context(|| format!("threads is not an integer: {:?}", args[1]))?;
        let iters = args[2]
            .parse()
            .with_context(|| format!("iters is not an integer: {:?}", args[2]))?;
        let background_writer = args[3]
            .parse()
            .with_context(|| format!("backgroundWriter is not a boolean: {:?}", args[3]))?;
        Ok(Self {
            items,
            threads,
            iters,
            background_writer,
        })
    }
}

/// Full run against the `TMPDIR` scratch directory: provision, seed, contend,
/// measure, clean up.
pub fn run_benchmark(config: &BenchConfig) -> Result<BenchResult> {
    let scratch = store::scratch_dir()?;
    run_benchmark_in(&scratch, config)
}

/// Full run against an explicit scratch directory.
///
/// The scratch guard is dropped on every exit path, removing the backing
/// file; the store handle itself closes once the readers (joined here) and
/// the contender (signaled, never joined) release their references.
pub fn run_benchmark_in(scratch: &Path, config: &BenchConfig) -> Result<BenchResult> {
    let (db, _scratch_guard) = store::provision(scratch)?;

    let mut rng = StdRng::seed_from_u64(populate::DEFAULT_SEED);
    populate::seed_store(&db, config.items, &mut rng)?;

    let stop = Arc::new(AtomicBool::new(false));
    let _writer = config
        .background_writer
        .then(|| writer::spawn(Arc::clone(&db), Arc::clone(&stop)));

    let elapsed = run_load(&db, config.threads, config.iters)?;

    // Cooperative stop; the contender may land a few more upserts before it
    // observes the token. Cleanup proceeds without joining it.
    stop.store(true, Ordering::Relaxed);

    Ok(BenchResult {
        config: *config,
        elapsed,
    })
}

/// Spawn the reader workforce and measure wall-clock time from just before
/// the first spawn to just after the last join.
pub fn run_load(db: &Arc<Database>, threads: usize, iters: usize) -> Result<Duration> {
    let start = Instant::now();
    let mut workers = Vec::with_capacity(threads);
    for worker_id in 0..threads {
        let db = Arc::clone(db);
        workers.push(thread::spawn(move || -> Result<()> {
            pin_to_core(worker_id);
            for _ in 0..iters {
                scan_once(&db)?;
            }
            Ok(())
        }));
    }
    for worker in workers {
        worker
            .join()
            .map_err(|_| anyhow!("reader worker panicked"))??;
    }
    Ok(start.elapsed())
}

/// One read-only snapshot scan over the whole table, first key to last,
/// touching every pair. Returns the number of entries observed, which is
/// consistent for the duration of the transaction even while the contender
/// is writing.
pub fn scan_once(db: &Database) -> Result<usize> {
    let txn = db
        .begin_read()
        .context("failed to begin read transaction")?;
    let table = txn
        .open_table(TABLE)
        .context("failed to open bench table")?;
    let mut entries = 0usize;
    for pair in table.iter().context("failed to open scan cursor")? {
        let (key, value) = pair.context("scan cursor failed")?;
        let _ = (key.value(), value.value());
        entries += 1;
    }
    Ok(entries)
}

/// Pin the calling worker to a stable core to cut scheduling noise. No-op on
/// platforms where no core ids are reported.
fn pin_to_core(worker_id: usize) {
    if let Some(cores) = core_affinity::get_core_ids() {
        if let Some(core) = cores.get(worker_id % cores.len().max(1)).copied() {
            core_affinity::set_for_current(core);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_config_matches_cli_defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.items, 1000);
        assert_eq!(config.threads, 1);
        assert_eq!(config.iters, 1000);
        assert!(config.background_writer);
    }

    #[test]
    fn from_positional_parses_all_fields() {
        let config = BenchConfig::from_positional(&args(&["100", "4", "50", "false"])).unwrap();
        assert_eq!(config.items, 100);
        assert_eq!(config.threads, 4);
        assert_eq!(config.iters, 50);
        assert!(!config.background_writer);
    }

    #[test]
    fn from_positional_names_the_bad_integer() {
        let err = BenchConfig::from_positional(&args(&["abc", "1", "1", "true"])).unwrap_err();
        assert!(format!("{err:#}").contains("items is not an integer"));

        let err = BenchConfig::from_positional(&args(&["1", "1", "x", "true"])).unwrap_err();
        assert!(format!("{err:#}").contains("iters is not an integer"));
    }

    #[test]
    fn from_positional_names_the_bad_boolean() {
        let err = BenchConfig::from_positional(&args(&["1", "1", "1", "yes"])).unwrap_err();
        assert!(format!("{err:#}").contains("backgroundWriter is not a boolean"));
    }
}
