//! Background writer contender: a detached thread holding one long write
//! transaction that upserts a fixed key as fast as it can until told to stop.
//!
//! Cancellation is cooperative: the stop token is polled once per upsert, so
//! a few extra writes after the signal are expected. The harness only raises
//! the token and moves on to cleanup; it deliberately does not join the
//! thread, reproducing the peer harness's behavior. An unlinked-but-open
//! backing file keeps accepting writes until the last handle drops.

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use redb::Database;

use crate::populate::TABLE;

pub const DUMMY_KEY: &[u8] = b"dummy_key";
pub const DUMMY_VAL: &[u8] = b"dummy_val";

/// Spawn the contender on its own thread. A write failure inside the loop
/// terminates the whole process: readers measured against a silently-stopped
/// contender would report meaningless numbers.
pub fn spawn(db: Arc<Database>, stop: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(err) = write_contender(&db, &stop) {
            log::error!("background writer failed: {err:#}");
            process::exit(2);
        }
    })
}

/// One enclosing write transaction: upsert the dummy key until the stop
/// token is observed, then commit and release the write lock.
pub fn write_contender(db: &Database, stop: &AtomicBool) -> Result<()> {
    let txn = db
        .begin_write()
        .context("failed to begin contender transaction")?;
    {
        let mut table = txn
            .open_table(TABLE)
            .context("failed to open bench table")?;
        while !stop.load(Ordering::Relaxed) {
            table
                .insert(DUMMY_KEY, DUMMY_VAL)
                .context("failed to upsert dummy key")?;
        }
    }
    txn.commit()
        .context("failed to commit contender transaction")?;
    Ok(())
}
