//! Bounded LRU cache for mention-context embeddings.
//!
//! The same entity context is embedded again whenever a document is
//! re-extracted, so vectors are kept keyed by the exact context text.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use ndarray::Array1;
use parking_lot::Mutex;

struct Slot {
    embedding: Array1<f32>,
    stored: Instant,
}

struct Lru {
    slots: HashMap<String, Slot>,
    recency: VecDeque<String>,
    capacity: usize,
    ttl: Duration,
}

impl Lru {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }

    fn forget(&mut self, key: &str) {
        self.slots.remove(key);
        self.recency.retain(|k| k != key);
    }
}

/// Thread-safe embedding cache with hit/miss counters.
pub struct EmbeddingCache {
    inner: Mutex<Lru>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EmbeddingCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Lru {
                slots: HashMap::with_capacity(capacity),
                recency: VecDeque::with_capacity(capacity),
                capacity: capacity.max(1),
                ttl,
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// 4096 contexts, one hour.
    pub fn default_cache() -> Self {
        Self::new(4096, Duration::from_secs(3600))
    }

    pub fn get(&self, key: &str) -> Option<Array1<f32>> {
        let mut lru = self.inner.lock();
        let fresh = lru.slots.get(key).map(|s| s.stored.elapsed() < lru.ttl);
        let found = match fresh {
            Some(true) => {
                lru.touch(key);
                lru.slots.get(key).map(|s| s.embedding.clone())
            }
            Some(false) => {
                lru.forget(key);
                None
            }
            None => None,
        };
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn put(&self, key: String, embedding: Array1<f32>) {
        let mut lru = self.inner.lock();
        if lru.slots.contains_key(&key) {
            lru.touch(&key);
        } else {
            while lru.slots.len() >= lru.capacity {
                match lru.recency.pop_front() {
                    Some(oldest) => {
                        lru.slots.remove(&oldest);
                    }
                    None => break,
                }
            }
            lru.recency.push_back(key.clone());
        }
        lru.slots.insert(
            key,
            Slot {
                embedding,
                stored: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}
