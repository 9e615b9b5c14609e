use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::error::{AppError, AppResult};

/// Buffered events per subscriber before slow receivers start lagging
const EVENT_CAPACITY: usize = 64;

/// Resource tags that queries provide and mutations invalidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Recommendations,
}

impl Display for CacheTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheTag::Recommendations => write!(f, "RECOMMENDATIONS"),
        }
    }
}

/// Notifications sent to cache subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent {
    /// A fresh value was stored under the tag
    Stored(CacheTag),
    /// The tag was marked stale; consumers should refetch
    Invalidated(CacheTag),
}

#[derive(Debug)]
struct CacheEntry {
    value: String,
    fetched_at: DateTime<Utc>,
    stale: bool,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<CacheTag, CacheEntry>,
    /// Bumped on every invalidation of a tag
    generations: HashMap<CacheTag, u64>,
}

/// In-memory query cache keyed by resource tag.
///
/// Values are kept as serialized JSON so one cache can hold results of
/// different query types. Mutations call [`QueryCache::invalidate`], which
/// marks the tag stale and notifies every subscriber.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<RwLock<CacheInner>>,
    events: broadcast::Sender<CacheEvent>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(CacheInner::default())),
            events,
        }
    }

    /// Retrieves the value stored under a tag if it is present and not stale
    pub async fn get_fresh<T: serde::de::DeserializeOwned>(
        &self,
        tag: &CacheTag,
    ) -> AppResult<Option<T>> {
        let inner = self.inner.read().await;

        match inner.entries.get(tag) {
            Some(entry) if !entry.stale => {
                let data = serde_json::from_str(&entry.value).map_err(|e| {
                    AppError::Cache(format!("Cache deserialization error: {}", e))
                })?;
                tracing::debug!(tag = %tag, fetched_at = %entry.fetched_at, "Query cache hit");
                Ok(Some(data))
            }
            _ => Ok(None),
        }
    }

    /// Current invalidation generation of a tag
    pub async fn generation(&self, tag: &CacheTag) -> u64 {
        let inner = self.inner.read().await;
        inner.generations.get(tag).copied().unwrap_or(0)
    }

    /// Stores a fresh value under a tag
    pub async fn store<T: serde::Serialize>(&self, tag: &CacheTag, value: &T) {
        let generation = self.generation(tag).await;
        self.store_if_current(tag, value, generation).await;
    }

    /// Stores a fresh value unless the tag was invalidated after `generation`
    /// was read.
    ///
    /// A fetch that started before a mutation may return pre-mutation data;
    /// storing it would hide the invalidation from the next reader.
    pub async fn store_if_current<T: serde::Serialize>(
        &self,
        tag: &CacheTag,
        value: &T,
        generation: u64,
    ) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, tag = %tag, "Cache serialization error");
                return;
            }
        };

        let mut inner = self.inner.write().await;
        let current = inner.generations.get(tag).copied().unwrap_or(0);
        if current != generation {
            tracing::debug!(
                tag = %tag,
                fetched_generation = generation,
                current_generation = current,
                "Discarding result of a fetch that raced an invalidation"
            );
            return;
        }

        inner.entries.insert(
            *tag,
            CacheEntry {
                value: json,
                fetched_at: Utc::now(),
                stale: false,
            },
        );
        drop(inner);

        // No subscribers is fine
        let _ = self.events.send(CacheEvent::Stored(*tag));
    }

    /// Marks every given tag stale and notifies subscribers
    pub async fn invalidate(&self, tags: &[CacheTag]) {
        {
            let mut inner = self.inner.write().await;
            for tag in tags {
                *inner.generations.entry(*tag).or_insert(0) += 1;
                if let Some(entry) = inner.entries.get_mut(tag) {
                    entry.stale = true;
                }
            }
        }

        for tag in tags {
            tracing::debug!(tag = %tag, "Query cache tag invalidated");
            let _ = self.events.send(CacheEvent::Invalidated(*tag));
        }
    }

    /// Subscribes to store and invalidation events
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }
}
