//! redb Read-Path Latency Benchmark
//!
//! Measures how long a fixed number of full-scan read-only transactions take
//! against a freshly seeded, file-backed redb store, optionally while a
//! background writer hammers the same table to generate write contention.
//! Intended for head-to-head comparison against an equivalent harness built
//! on a different embedded key-value engine, under identical synthetic load.
//!
//! Flow: provision a scratch-backed store → seed it with random pairs →
//! (optionally) start the background writer → time a pool of reader threads
//! each running N full scans → report elapsed time and mean per-item latency.
//!
//! Run the benchmark: `cargo run --release -- <items> <threads> <iters> <backgroundWriter>`
//! Run tests: `cargo test`

pub mod bench;
pub mod populate;
pub mod report;
pub mod store;
pub mod writer;
