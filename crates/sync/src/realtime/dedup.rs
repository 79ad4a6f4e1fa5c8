use std::num::NonZeroUsize;

use lru::LruCache;

/// Bounded set of recently applied delivery keys.
///
/// The oldest key is forgotten once capacity is reached, so a replay older
/// than `capacity` deliveries is applied again.
#[derive(Debug)]
pub struct RecentDeliveries {
    seen: LruCache<String, ()>,
}

impl RecentDeliveries {
    /// Creates a set holding up to `capacity` keys (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            seen: LruCache::new(capacity),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn remember(&mut self, key: String) {
        self.seen.put(key, ());
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
