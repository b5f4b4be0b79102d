use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

use log::debug;

use crate::config::{ConfigError, LfuConfig};
use crate::level::LEVELS;
use crate::traits::Cache;
use crate::BucketLfu;

/// A [`BucketLfu`] split into independent shards to reduce lock contention.
///
/// Each key is routed to one shard by its hash. Every shard is a complete
/// `BucketLfu` with its own lock, index, buckets and RNG, so all of the
/// single-cache guarantees hold per shard. Eviction only ever considers the
/// shard the new key lands in, which makes the global eviction order
/// coarser than a single `BucketLfu` of the same total capacity.
///
/// The total capacity is split so the per-shard capacities add up to it
/// exactly; the first `capacity % shards` shards hold one extra entry.
/// The shard count is clamped to `capacity.max(1)` so no shard is left
/// with zero capacity while the cache as a whole can hold entries.
///
/// # Examples
///
/// ```
/// use bucketlfu_core::LfuConfig;
///
/// let cache = LfuConfig::new(1000).shards(8).build_sharded::<u64, u64>().unwrap();
/// assert_eq!(cache.shard_count(), 8);
/// assert_eq!(cache.capacity(), 1000);
///
/// cache.set(42, 7);
/// assert_eq!(cache.get(&42), Some(7));
/// ```
pub struct ShardedBucketLfu<K, V, S = RandomState> {
    shards: Box<[BucketLfu<K, V>]>,
    hasher: S,
}

impl<K, V> ShardedBucketLfu<K, V, RandomState>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates `shards` sub-caches sharing `capacity` between them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShardCount`] when `shards` is zero.
    pub fn new(capacity: usize, shards: usize) -> Result<Self, ConfigError> {
        Self::with_config(&LfuConfig::new(capacity).shards(shards))
    }

    pub fn with_config(config: &LfuConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, V, S> ShardedBucketLfu<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    pub fn with_config_and_hasher(config: &LfuConfig, hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let count = config.shards.min(config.capacity.max(1));
        if count < config.shards {
            debug!(
                "clamping shard count from {} to {} for capacity {}",
                config.shards, count, config.capacity
            );
        }
        let base = config.capacity / count;
        let extra = config.capacity % count;

        let shards = (0..count)
            .map(|i| {
                let mut shard = LfuConfig::new(base + usize::from(i < extra))
                    .promote_base(config.promote_base);
                if let Some(seed) = config.seed {
                    shard = shard.seed(seed.wrapping_add(i as u64));
                }
                BucketLfu::with_config(&shard)
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_boxed_slice();

        debug!(
            "creating sharded LFU cache: capacity={}, shards={}",
            config.capacity, count
        );
        Ok(Self { shards, hasher })
    }

    fn shard_for<Q>(&self, key: &Q) -> &BucketLfu<K, V>
    where
        Q: Hash + ?Sized,
    {
        let mut state = self.hasher.build_hasher();
        key.hash(&mut state);
        let idx = (state.finish() % self.shards.len() as u64) as usize;
        &self.shards[idx]
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard_for(key).get(key)
    }

    pub fn set(&self, key: K, value: V) {
        self.shard_for(&key).set(key, value)
    }

    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard_for(key).remove(key)
    }

    pub fn level<Q>(&self, key: &Q) -> Option<u8>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard_for(key).level(key)
    }

    /// Sum of the shard lengths. Shards are locked one after another, so
    /// under concurrent writes the result is not a single snapshot.
    pub fn len(&self) -> usize {
        self.shards.iter().map(BucketLfu::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(BucketLfu::is_empty)
    }

    pub fn capacity(&self) -> usize {
        self.shards.iter().map(BucketLfu::capacity).sum()
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Per-level entry counts summed over all shards.
    pub fn level_counts(&self) -> [usize; LEVELS] {
        let mut totals = [0; LEVELS];
        for shard in self.shards.iter() {
            for (total, count) in totals.iter_mut().zip(shard.level_counts()) {
                *total += count;
            }
        }
        totals
    }

    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.clear();
        }
    }

    pub fn shards(&self) -> &[BucketLfu<K, V>] {
        &self.shards
    }
}

impl<K, V, S> Cache<K, V> for ShardedBucketLfu<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn get(&self, key: &K) -> Option<V> {
        ShardedBucketLfu::get(self, key)
    }

    fn set(&self, key: K, value: V) {
        ShardedBucketLfu::set(self, key, value)
    }

    fn remove(&self, key: &K) -> bool {
        ShardedBucketLfu::remove(self, key)
    }

    fn len(&self) -> usize {
        ShardedBucketLfu::len(self)
    }
}

impl<K, V, S> fmt::Debug for ShardedBucketLfu<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedBucketLfu")
            .field("shards", &self.shards)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_zero_shards_rejected() {
        let result = ShardedBucketLfu::<u32, u32>::new(10, 0);
        assert_eq!(result.unwrap_err(), ConfigError::InvalidShardCount(0));
    }

    #[test]
    fn test_capacity_split_sums_to_total() {
        let cache = ShardedBucketLfu::<u32, u32>::new(10, 4).unwrap();
        let capacities: Vec<_> = cache.shards().iter().map(BucketLfu::capacity).collect();
        assert_eq!(capacities, vec![3, 3, 2, 2]);
        assert_eq!(cache.capacity(), 10);
    }

    #[test]
    fn test_shard_count_clamped_to_capacity() {
        let cache = ShardedBucketLfu::<u32, u32>::new(2, 8).unwrap();
        assert_eq!(cache.shard_count(), 2);
        assert_eq!(cache.capacity(), 2);
        assert!(cache.shards().iter().all(|shard| shard.capacity() == 1));

        for k in 0..16u32 {
            cache.clear();
            cache.set(k, k);
            assert_eq!(cache.get(&k), Some(k), "key {} was not retained", k);
        }
    }

    #[test]
    fn test_zero_capacity_uses_one_empty_shard() {
        let cache = ShardedBucketLfu::<u32, u32>::new(0, 8).unwrap();
        assert_eq!(cache.shard_count(), 1);
        cache.set(1, 1);
        assert_eq!(cache.get(&1), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_single_shard_behaves_like_plain_cache() {
        let cache = ShardedBucketLfu::new(1, 1).unwrap();
        cache.set(1, 1);
        cache.set(2, 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_key_always_routes_to_same_shard() {
        let cache = ShardedBucketLfu::new(64, 8).unwrap();
        for i in 0..64u32 {
            cache.set(i, i * 2);
        }
        for i in 0..64u32 {
            if let Some(v) = cache.get(&i) {
                assert_eq!(v, i * 2);
                assert_eq!(cache.level(&i), Some(1));
            }
        }
        assert!(cache.len() <= 64);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let cache = ShardedBucketLfu::new(50, 4).unwrap();
        for i in 0..1_000u32 {
            cache.set(i, i);
        }
        assert!(cache.len() <= 50);
        assert_eq!(cache.level_counts().iter().sum::<usize>(), cache.len());
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = ShardedBucketLfu::new(16, 4).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        assert!(cache.remove("a"));
        assert!(!cache.remove("a"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(ShardedBucketLfu::new(256, 16).unwrap());
        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let mut rng = fastrand::Rng::with_seed(t);
                    for _ in 0..5_000 {
                        let key = rng.u64(..512);
                        if cache.get(&key).is_none() {
                            cache.set(key, key);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 256);
        assert_eq!(cache.level_counts().iter().sum::<usize>(), cache.len());
    }
}
