//! Bounded recency store for generated specs.
//!
//! The whole collection lives in one JSON array on disk. Every operation
//! re-reads the file; nothing is cached in memory. Mutations run a full
//! read-modify-write under the store's mutex, so writers inside one process
//! are serialised. Separate processes sharing the file are last-write-wins.

use crate::error::{Result, TaskgenError};
use crate::health::CheckResult;
use crate::io;
use crate::paths;
use crate::types::{FeatureRequest, GeneratedBreakdown, StoredSpec};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Maximum number of specs retained.
pub const MAX_SPECS: usize = 5;

/// Storage seam used by the server and CLI.
pub trait SpecStore: Send + Sync {
    /// All specs, newest first. Never fails: an unreadable collection reads
    /// as empty.
    fn list(&self) -> Vec<StoredSpec>;

    /// Persist a new spec, evicting the oldest beyond [`MAX_SPECS`].
    fn save(&self, feature: FeatureRequest, generated: GeneratedBreakdown) -> Result<StoredSpec>;

    /// Remove the spec with `id`. Returns `false` when nothing matched.
    fn delete(&self, id: &str) -> Result<bool>;

    fn health_check(&self) -> CheckResult;

    fn get(&self, id: &str) -> Option<StoredSpec> {
        self.list().into_iter().find(|s| s.id == id)
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by the file at `path`. Nothing is touched on disk until
    /// the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store rooted at `data_dir/specs.json`, creating the directory and an
    /// empty `[]` collection if they do not exist yet.
    pub fn open(data_dir: &Path) -> Result<Self> {
        io::ensure_dir(data_dir)?;
        let path = paths::specs_file(data_dir);
        if io::write_if_missing(&path, b"[]")? {
            tracing::info!(path = %path.display(), "created empty spec store");
        }
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict read of the collection, sorted newest first. A missing file is
    /// an empty collection; unreadable or corrupt contents are errors.
    pub fn load(&self) -> Result<Vec<StoredSpec>> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut specs: Vec<StoredSpec> = serde_json::from_str(&data)?;
        specs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(specs)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_all(&self, specs: &[StoredSpec]) -> Result<()> {
        let data = serde_json::to_vec_pretty(specs)
            .map_err(|e| TaskgenError::Storage(e.to_string()))?;
        io::atomic_write(&self.path, &data).map_err(|e| TaskgenError::Storage(e.to_string()))
    }
}

impl SpecStore for FileStore {
    fn list(&self) -> Vec<StoredSpec> {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "spec store unreadable, treating as empty: {e}");
            Vec::new()
        })
    }

    fn save(&self, feature: FeatureRequest, generated: GeneratedBreakdown) -> Result<StoredSpec> {
        let _guard = self.lock();

        let mut specs = self.list();
        let timestamp = next_timestamp(&specs, Utc::now());
        let spec = StoredSpec {
            id: format!("spec_{}", timestamp.timestamp_millis()),
            timestamp,
            feature,
            generated,
        };

        specs.insert(0, spec.clone());
        if specs.len() > MAX_SPECS {
            let evicted: Vec<&str> = specs[MAX_SPECS..].iter().map(|s| s.id.as_str()).collect();
            tracing::debug!(?evicted, "evicting oldest specs");
            specs.truncate(MAX_SPECS);
        }

        self.write_all(&specs)?;
        tracing::info!(id = %spec.id, "saved spec");
        Ok(spec)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.lock();

        let mut specs = self.list();
        let before = specs.len();
        specs.retain(|s| s.id != id);
        if specs.len() == before {
            return Ok(false);
        }

        self.write_all(&specs)?;
        tracing::info!(id, "deleted spec");
        Ok(true)
    }

    fn health_check(&self) -> CheckResult {
        match self.load() {
            Ok(specs) => CheckResult::healthy("Storage working").with_detail("specsCount", specs.len()),
            Err(e) => CheckResult::unhealthy(e.to_string()),
        }
    }
}

/// Millisecond timestamp for a new record: `now`, bumped past the newest
/// stored record so ids and timestamps strictly increase even when the
/// clock stalls or steps backwards.
fn next_timestamp(newest_first: &[StoredSpec], now: DateTime<Utc>) -> DateTime<Utc> {
    let mut millis = now.timestamp_millis();
    if let Some(newest) = newest_first.first() {
        let newest_millis = newest.timestamp.timestamp_millis();
        if newest_millis >= millis {
            millis = newest_millis + 1;
        }
    }
    DateTime::from_timestamp_millis(millis).unwrap_or(now)
}
