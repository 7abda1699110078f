//! Data population: random alphanumeric pair generation and store seeding.
//!
//! Keys and values are independently random alphanumeric strings with lengths
//! drawn uniformly from `[1, 1000]`. Nothing deduplicates the keys: a
//! colliding key overwrites the earlier insert inside the same transaction,
//! so the table may end up holding fewer than the requested number of
//! entries. That mirrors the behavior of the peer harness this benchmark is
//! compared against, so it is kept rather than detected.

use anyhow::{Context, Result};
use rand::distributions::{Alphanumeric, DistString};
use rand::Rng;
use redb::{Database, TableDefinition};

/// The single table every component reads or writes.
pub const TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("bench");

pub const MAX_KEY_LEN: usize = 1000;
pub const MAX_VALUE_LEN: usize = 1000;

/// Fixed seed for the data generator, so repeated runs seed an
/// identically-shaped data set.
pub const DEFAULT_SEED: u64 = 0xCAFE_5EED;

/// Random string of exactly `len` characters from the 62-character
/// alphanumeric alphabet.
pub fn random_alphanumeric(rng: &mut impl Rng, len: usize) -> String {
    Alphanumeric.sample_string(rng, len)
}

/// Seed the store with `items` random key/value pairs in one atomic write
/// transaction, creating the table as a side effect. An insert or commit
/// failure aborts the whole transaction; no partial seed survives.
pub fn seed_store(db: &Database, items: usize, rng: &mut impl Rng) -> Result<()> {
    let txn = db.begin_write().context("failed to begin seed transaction")?;
    {
        let mut table = txn
            .open_table(TABLE)
            .context("failed to create bench table")?;
        for i in 0..items {
            let key_len = rng.gen_range(1..=MAX_KEY_LEN);
            let val_len = rng.gen_range(1..=MAX_VALUE_LEN);
            let key = random_alphanumeric(rng, key_len);
            let val = random_alphanumeric(rng, val_len);
            table
                .insert(key.as_bytes(), val.as_bytes())
                .with_context(|| format!("failed to insert pair {i}"))?;
        }
    }
    txn.commit().context("failed to commit seed transaction")?;
    Ok(())
}
