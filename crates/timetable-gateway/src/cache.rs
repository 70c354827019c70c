//! Response cache for the read endpoints.
//!
//! Payloads are stored already serialized, keyed by endpoint plus canonical
//! query parameters, and expire a fixed TTL after insertion. The table they
//! are computed from never changes, so there is no invalidation path; a
//! stale entry is simply recomputed. Two requests racing on the same cold
//! key both compute and the last write wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use axum::body::Bytes;
use dashmap::DashMap;
use serde::Serialize;
use timetable_core::config::CacheConfig;
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedBody {
    body: Bytes,
    inserted_at: Instant,
}

impl CachedBody {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) < ttl
    }
}

/// Snapshot of cache counters, exposed on `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct ResponseCache {
    entries: DashMap<String, CachedBody>,
    ttl: Duration,
    max_entries: usize,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
            enabled: true,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache that never stores anything; every call computes.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Duration::ZERO, 1)
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new(Duration::from_secs(config.ttl_secs), config.max_entries)
        } else {
            Self::disabled()
        }
    }

    /// Return the cached payload for `key`, or run `compute` and store its
    /// result. Errors are passed through and never cached.
    pub fn get_or_compute<E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> Result<Bytes, E>,
    ) -> Result<Bytes, E> {
        self.get_or_compute_at(key, Instant::now(), compute)
    }

    fn get_or_compute_at<E>(
        &self,
        key: &str,
        now: Instant,
        compute: impl FnOnce() -> Result<Bytes, E>,
    ) -> Result<Bytes, E> {
        if !self.enabled {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return compute();
        }

        let cached = self
            .entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.body.clone());
        if let Some(body) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key, "cache hit");
            return Ok(body);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key, "cache miss");
        let body = compute()?;
        self.insert(key.to_string(), body.clone(), now);
        Ok(body)
    }

    fn insert(&self, key: String, body: Bytes, now: Instant) {
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.entries.retain(|_, entry| entry.is_fresh(now, self.ttl));
        }
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            // Evict oldest entry
            let oldest_key = self
                .entries
                .iter()
                .min_by_key(|entry| entry.inserted_at)
                .map(|entry| entry.key().clone());
            if let Some(k) = oldest_key {
                self.entries.remove(&k);
            }
        }
        self.entries.insert(
            key,
            CachedBody {
                body,
                inserted_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits(),
            misses: self.misses(),
        }
    }
}
