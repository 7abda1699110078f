//! Standalone runner for the redb read-path benchmark.
//!
//! Usage:
//!   cargo run --release                                      # defaults
//!   cargo run --release -- <items> <threads> <iters> <backgroundWriter>
//!
//! Requires `$TMPDIR` to point at a writable scratch directory for the
//! store's backing file.
//!
//! Exit codes: 0 on success, 1 on usage error, 2 on any fatal failure.

use std::env;
use std::process;

use redb_bench::bench::{run_benchmark, BenchConfig};
use redb_bench::report;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = match args.len() {
        1 => BenchConfig::default(),
        5 => match BenchConfig::from_positional(&args[1..]) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err:#}");
                process::exit(2);
            }
        },
        _ => {
            println!(
                "Usage: {} <items> <threads> <iters> <backgroundWriter>",
                args[0]
            );
            process::exit(1);
        }
    };

    match run_benchmark(&config) {
        Ok(result) => report::print_report(&result),
        Err(err) => {
            log::error!("benchmark failed: {err:#}");
            process::exit(2);
        }
    }
}
