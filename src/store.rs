//! Ephemeral store provisioning: a uniquely-named backing file under the
//! scratch directory, an open with a bounded acquisition timeout, and a drop
//! guard that removes the file on every exit path.
//!
//! The backing file is owned exclusively by this module. Cleanup failures are
//! logged and swallowed: a leaked scratch file is a nuisance, not an error
//! worth aborting a finished run over.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use redb::{Database, DatabaseError};

use crate::populate::random_alphanumeric;

/// Length of the random backing-file name.
const STORE_NAME_LEN: usize = 10;

/// How long to keep retrying when the backing file is locked by another
/// process before giving up on the open.
const OPEN_TIMEOUT: Duration = Duration::from_secs(1);
const OPEN_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Drop guard for the store's backing file. Dropping it removes the file if
/// it still exists; the store handle itself closes when the last `Arc`
/// referencing it goes away.
#[derive(Debug)]
pub struct ScratchGuard {
    path: PathBuf,
}

impl ScratchGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        remove_if_exists(&self.path);
    }
}

/// Resolve the scratch directory from the required `TMPDIR` environment
/// variable.
pub fn scratch_dir() -> Result<PathBuf> {
    match env::var_os("TMPDIR") {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => bail!("no $TMPDIR in the environment; set it to a writable scratch directory"),
    }
}

/// Open a store against a previously-unused random file name under
/// `scratch`, returning the shared handle and the cleanup guard.
pub fn provision(scratch: &Path) -> Result<(Arc<Database>, ScratchGuard)> {
    let mut rng = StdRng::from_entropy();
    let path = unused_store_path(scratch, &mut rng)?;
    let db = open_with_timeout(&path, OPEN_TIMEOUT)?;
    Ok((Arc::new(db), ScratchGuard { path }))
}

/// Generate random candidate names until one names no existing file. With a
/// 62^10 name space this terminates on the first or second try in practice.
fn unused_store_path(scratch: &Path, rng: &mut impl Rng) -> Result<PathBuf> {
    loop {
        let path = scratch.join(random_alphanumeric(rng, STORE_NAME_LEN));
        let exists = path
            .try_exists()
            .with_context(|| format!("failed to check existence of {}", path.display()))?;
        if !exists {
            return Ok(path);
        }
    }
}

/// Open the store, retrying lock contention until `timeout` elapses. On any
/// other failure (or deadline expiry) the candidate file is removed
/// best-effort before the error propagates.
fn open_with_timeout(path: &Path, timeout: Duration) -> Result<Database> {
    let deadline = Instant::now() + timeout;
    loop {
        match Database::create(path) {
            Ok(db) => return Ok(db),
            Err(DatabaseError::DatabaseAlreadyOpen) if Instant::now() < deadline => {
                thread::sleep(OPEN_RETRY_INTERVAL);
            }
            Err(err) => {
                remove_if_exists(path);
                return Err(err)
                    .with_context(|| format!("failed to open store at {}", path.display()));
            }
        }
    }
}

/// Best-effort removal used on the cleanup paths. Failures are logged, never
/// escalated.
pub fn remove_if_exists(path: &Path) {
    match path.try_exists() {
        Ok(false) => {}
        Ok(true) => {
            if let Err(err) = fs::remove_file(path) {
                log::warn!("failed to remove scratch file {}: {err}", path.display());
            }
        }
        Err(err) => {
            log::warn!("failed to check scratch file {}: {err}", path.display());
        }
    }
}
