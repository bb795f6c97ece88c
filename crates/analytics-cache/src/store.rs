//! File-backed day cache.

use analytics_core::error::CacheError;
use analytics_core::traits::Clock;
use analytics_core::types::DayPayload;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::freshness::FreshnessPolicy;

/// Version tag written into every cache file.
pub const CACHE_FORMAT_VERSION: &str = "1.0";

/// A cached payload and when it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: DayPayload,
    pub cached_at: DateTime<Utc>,
}

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    daily_data: BTreeMap<NaiveDate, CacheEntry>,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default = "default_version")]
    version: String,
}

fn default_version() -> String {
    CACHE_FORMAT_VERSION.to_string()
}

/// Diagnostic summary of a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_count: usize,
    pub stale_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    /// Backing file, `None` for an in-memory store
    pub path: Option<PathBuf>,
}

/// One payload per calendar date, persisted as a single JSON document.
///
/// Every mutation rewrites the whole file through a temp file and rename.
/// A failed write is logged and the in-memory state is kept. A store built
/// with [`in_memory`](Self::in_memory) never touches the disk.
pub struct DayCacheStore {
    path: Option<PathBuf>,
    entries: BTreeMap<NaiveDate, CacheEntry>,
    last_updated: Option<DateTime<Utc>>,
    policy: FreshnessPolicy,
    clock: Arc<dyn Clock>,
}

impl DayCacheStore {
    /// Open a store, loading `path` if it exists.
    ///
    /// A missing, unreadable or corrupt file yields an empty store.
    pub fn open(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        let path = path.into();
        let (entries, last_updated) = match Self::load(&path) {
            Ok(Some(file)) => {
                info!(
                    path = %path.display(),
                    entries = file.daily_data.len(),
                    "Loaded analytics cache"
                );
                (file.daily_data, file.last_updated)
            }
            Ok(None) => {
                debug!(path = %path.display(), "No cache file yet, starting empty");
                (BTreeMap::new(), None)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not load cache, starting empty");
                (BTreeMap::new(), None)
            }
        };

        Self {
            path: Some(path),
            entries,
            last_updated,
            policy: FreshnessPolicy::default(),
            clock,
        }
    }

    /// Empty store that is never persisted.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            path: None,
            entries: BTreeMap::new(),
            last_updated: None,
            policy: FreshnessPolicy::default(),
            clock,
        }
    }

    /// Set the freshness policy used for lookups and [`stats`](Self::stats).
    pub fn with_policy(mut self, policy: FreshnessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    fn load(path: &Path) -> Result<Option<CacheFile>, CacheError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let file: CacheFile = serde_json::from_str(&content)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        if file.version != CACHE_FORMAT_VERSION {
            debug!(version = %file.version, "Cache file written by a different version");
        }
        Ok(Some(file))
    }

    /// Cached payload for a date.
    pub fn get(&self, date: NaiveDate) -> Option<&DayPayload> {
        self.entries.get(&date).map(|e| &e.data)
    }

    /// Cached entry for a date, including its timestamp.
    pub fn entry(&self, date: NaiveDate) -> Option<&CacheEntry> {
        self.entries.get(&date)
    }

    /// Upsert the payload for a date and persist.
    pub fn set(&mut self, date: NaiveDate, payload: DayPayload) {
        let now = self.clock.now();
        self.entries.insert(
            date,
            CacheEntry {
                data: payload,
                cached_at: now,
            },
        );
        self.last_updated = Some(now);
        self.persist_or_warn();
    }

    /// Remove the entry for a date and persist.
    pub fn clear(&mut self, date: NaiveDate) {
        if self.entries.remove(&date).is_some() {
            debug!(%date, "Cleared cache entry");
        }
        self.persist_or_warn();
    }

    /// Drop every entry and persist.
    pub fn clear_all(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.last_updated = None;
        info!(removed, "Cleared analytics cache");
        self.persist_or_warn();
    }

    /// Cached dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timestamp of the most recent write.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Entry counts against the staleness threshold, plus file size.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let fresh_count = self
            .entries
            .values()
            .filter(|e| self.policy.is_fresh(e.cached_at, now))
            .count();

        CacheStats {
            total_entries: self.entries.len(),
            fresh_count,
            stale_count: self.entries.len() - fresh_count,
            last_updated: self.last_updated,
            size_bytes: self
                .path
                .as_ref()
                .and_then(|p| fs::metadata(p).ok())
                .map_or(0, |m| m.len()),
            path: self.path.clone(),
        }
    }

    /// Write the whole store to disk atomically. No-op for an in-memory store.
    pub fn persist(&self) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let file = CacheFile {
            daily_data: self.entries.clone(),
            last_updated: self.last_updated,
            version: CACHE_FORMAT_VERSION.to_string(),
        };
        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = temp_path(path);
        if let Err(e) = fs::write(&tmp, content).and_then(|_| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            warn!(path = ?self.path, error = %e, "Failed to persist analytics cache");
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
