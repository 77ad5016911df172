//! Durable TTL-gated fetch cache.
//!
//! Adapters that talk to remote APIs with rate or cost concerns wrap their
//! wire fetch in this cache: a fresh entry short-circuits the network call,
//! a successful fetch overwrites the entry. Entries are JSON files (one per
//! key) holding the payload and its write timestamp, so they survive
//! process restarts.
//!
//! The whole pipeline runs as one short-lived batch process, so reads and
//! writes are not synchronized. Two overlapping runs could both miss and
//! refetch; that costs one extra API call, not correctness.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};

/// A persisted cache entry: the payload plus when it was written.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct StoredEntry<T> {
    written_at: DateTime<Utc>,
    payload: T,
}

/// File-backed key→(timestamp, payload) store with staleness checks.
#[derive(Debug, Clone)]
pub struct FetchCache {
    dir: PathBuf,
}

impl FetchCache {
    /// Creates a cache rooted at the given directory.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory this cache writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads the payload stored under `key` if it was written within `ttl`.
    ///
    /// A missing, stale, or unreadable entry is a miss; corruption is
    /// logged and never fatal. The caller fetches fresh data on a miss and
    /// calls [`write`](Self::write) — the cache never refetches on its own.
    pub fn read_if_fresh<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        self.read_if_fresh_at(key, ttl, Utc::now())
    }

    /// Like [`read_if_fresh`](Self::read_if_fresh) with an explicit clock,
    /// so staleness can be tested without sleeping.
    pub fn read_if_fresh_at<T: DeserializeOwned>(
        &self,
        key: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Option<T> {
        let path = self.entry_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(key = %key, error = %err, "cache entry unreadable, treating as miss");
                return None;
            }
        };

        let entry: StoredEntry<T> = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(key = %key, error = %err, "cache entry corrupt, treating as miss");
                return None;
            }
        };

        let age = now.signed_duration_since(entry.written_at);
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        if age > ttl {
            debug!(key = %key, age_secs = age.num_seconds(), "cache entry stale");
            return None;
        }

        debug!(key = %key, age_secs = age.num_seconds(), "cache hit");
        Some(entry.payload)
    }

    /// Writes (or overwrites) the payload under `key`, stamped with now.
    pub fn write<T: Serialize>(&self, key: &str, payload: &T) -> ProviderResult<()> {
        self.write_at(key, payload, Utc::now())
    }

    /// Like [`write`](Self::write) with an explicit timestamp.
    pub fn write_at<T: Serialize>(
        &self,
        key: &str,
        payload: &T,
        written_at: DateTime<Utc>,
    ) -> ProviderResult<()> {
        fs::create_dir_all(&self.dir).map_err(|err| {
            ProviderError::internal(format!("failed to create cache dir: {err}")).with_source(err)
        })?;

        let entry = StoredEntry {
            written_at,
            payload,
        };
        let bytes = serde_json::to_vec(&entry).map_err(|err| {
            ProviderError::internal(format!("failed to encode cache entry: {err}"))
                .with_source(err)
        })?;

        let path = self.entry_path(key);
        fs::write(&path, bytes).map_err(|err| {
            ProviderError::internal(format!("failed to write cache entry: {err}")).with_source(err)
        })?;

        debug!(key = %key, path = %path.display(), "wrote cache entry");
        Ok(())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("cache_{key}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn cache() -> (TempDir, FetchCache) {
        let dir = TempDir::new().unwrap();
        let cache = FetchCache::new(dir.path());
        (dir, cache)
    }

    #[test]
    fn write_then_fresh_read_returns_payload() {
        let (_dir, cache) = cache();
        let payload = vec!["a".to_string(), "b".to_string()];

        cache.write("events", &payload).unwrap();
        let read: Option<Vec<String>> = cache.read_if_fresh("events", Duration::from_secs(3600));

        assert_eq!(read, Some(payload));
    }

    #[test]
    fn read_after_ttl_elapsed_is_a_miss() {
        let (_dir, cache) = cache();
        let written = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

        cache.write_at("events", &vec![1, 2, 3], written).unwrap();

        // Simulated clock: one second past the TTL
        let later = written + chrono::Duration::seconds(3601);
        let stale: Option<Vec<i32>> =
            cache.read_if_fresh_at("events", Duration::from_secs(3600), later);
        assert_eq!(stale, None);

        // Still fresh right at the boundary
        let boundary = written + chrono::Duration::seconds(3600);
        let fresh: Option<Vec<i32>> =
            cache.read_if_fresh_at("events", Duration::from_secs(3600), boundary);
        assert_eq!(fresh, Some(vec![1, 2, 3]));
    }

    #[test]
    fn missing_key_is_a_miss() {
        let (_dir, cache) = cache();
        let read: Option<Vec<i32>> = cache.read_if_fresh("absent", Duration::from_secs(60));
        assert_eq!(read, None);
    }

    #[test]
    fn corrupt_entry_is_a_miss_not_an_error() {
        let (dir, cache) = cache();
        fs::write(dir.path().join("cache_events.json"), b"not json at all").unwrap();

        let read: Option<Vec<i32>> = cache.read_if_fresh("events", Duration::from_secs(60));
        assert_eq!(read, None);
    }

    #[test]
    fn overwrite_replaces_the_entry() {
        let (_dir, cache) = cache();

        cache.write("events", &vec![1]).unwrap();
        cache.write("events", &vec![2, 3]).unwrap();

        let read: Option<Vec<i32>> = cache.read_if_fresh("events", Duration::from_secs(60));
        assert_eq!(read, Some(vec![2, 3]));
    }

    #[test]
    fn survives_reopening_the_cache() {
        let (dir, cache) = cache();
        cache.write("events", &"payload".to_string()).unwrap();

        let reopened = FetchCache::new(dir.path());
        let read: Option<String> = reopened.read_if_fresh("events", Duration::from_secs(60));
        assert_eq!(read, Some("payload".to_string()));
    }
}
