use crate::core::{constants::DEFAULT_TILE_CACHE_CAPACITY, geo::TileCoord};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// In-memory tile image cache using LRU eviction. Clones share storage.
#[derive(Debug)]
pub struct TileCache {
    cache: Arc<Mutex<LruCache<TileCoord, Arc<Vec<u8>>>>>,
}

impl TileCache {
    /// Holds up to `capacity` tiles. Zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_TILE_CACHE_CAPACITY)
    }

    /// Cached image, refreshing its recency. A poisoned lock is a miss.
    pub fn get(&self, coord: &TileCoord) -> Option<Arc<Vec<u8>>> {
        self.cache.lock().ok()?.get(coord).cloned()
    }

    /// Insert a tile into the cache, returning the shared bytes
    pub fn insert(&self, coord: TileCoord, data: Vec<u8>) -> Arc<Vec<u8>> {
        let data = Arc::new(data);
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(coord, Arc::clone(&data));
        }
        data
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.cache.lock().is_ok_and(|cache| cache.contains(coord))
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// Number of cached tiles
    pub fn len(&self) -> usize {
        self.cache.lock().map_or(0, |cache| cache.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.cache.lock().map_or(0, |cache| cache.cap().get())
    }
}

impl Clone for TileCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_cache_basic_operations() {
        let cache = TileCache::new(2);
        let tile1 = TileCoord::new(1, 2, 3);
        let tile2 = TileCoord::new(4, 5, 6);

        assert!(cache.is_empty());

        cache.insert(tile1, vec![1, 2, 3]);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&tile1));
        assert_eq!(*cache.get(&tile1).unwrap(), vec![1, 2, 3]);

        cache.insert(tile2, vec![4, 5, 6]);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_tile_cache_lru_eviction() {
        let cache = TileCache::new(2);
        let tile1 = TileCoord::new(1, 1, 1);
        let tile2 = TileCoord::new(0, 1, 1);
        let tile3 = TileCoord::new(3, 3, 2);

        cache.insert(tile1, vec![1]);
        cache.insert(tile2, vec![2]);
        cache.insert(tile3, vec![3]);

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&tile1));
        assert!(cache.contains(&tile2));
        assert!(cache.contains(&tile3));
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = TileCache::new(4);
        let other = cache.clone();
        other.insert(TileCoord::new(0, 0, 0), vec![9]);
        assert!(cache.contains(&TileCoord::new(0, 0, 0)));
        assert_eq!(cache.capacity(), 4);
    }

    #[test]
    fn test_zero_capacity_still_caches() {
        let cache = TileCache::new(0);
        assert_eq!(cache.capacity(), 1);
    }
}
