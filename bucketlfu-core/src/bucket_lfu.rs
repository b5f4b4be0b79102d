use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use log::{debug, trace};
use parking_lot::Mutex;

use crate::config::{ConfigError, LfuConfig};
use crate::level::{PromotionTable, LEVELS};
use crate::traits::Cache;
#[cfg(feature = "stats")]
use crate::CacheStats;

/// A thread-safe, fixed-capacity cache with probabilistic LFU eviction.
///
/// Instead of counting every access, each entry sits in one of [`LEVELS`]
/// frequency buckets. A hit on a level-0 entry always moves it to level 1;
/// a hit on a middle level `i` moves it up with probability `base^i`
/// (`base` defaults to `0.01`); the top level saturates. Writing to an
/// existing key sends it back to level 0.
///
/// When a new key arrives and the cache is full, one entry is evicted from
/// the lowest non-empty bucket. Which entry of that bucket goes is whatever
/// the bucket's `HashMap` yields first, so there is no recency or
/// fairness guarantee among entries of the same level. The evicted item is
/// therefore only approximately the least frequently used one.
///
/// # Data Layout
///
/// - `index`: key to current level, one entry per cached key
/// - `buckets[level]`: key to value for every entry at that level
///
/// Every key in `index` lives in exactly the bucket its level names, and the
/// bucket sizes always sum to `index.len()`.
///
/// # Thread Safety
///
/// A single `parking_lot::Mutex` guards the index, all buckets and the
/// instance RNG. `get` takes the same exclusive lock as `set` and `remove`
/// because a hit may promote the entry, so promotion is atomic with the read.
/// There is no background thread; eviction runs synchronously inside `set`.
///
/// # Performance Characteristics
///
/// - **Get**: O(1) expected, at most one bucket move
/// - **Set**: O(1) expected, at most one eviction scanning [`LEVELS`] buckets
/// - **Memory**: one index entry plus one bucket entry per cached key
///
/// # Examples
///
/// ```
/// use bucketlfu_core::BucketLfu;
///
/// let cache = BucketLfu::new(2);
/// cache.set("a", 1);
/// cache.set("b", 2);
///
/// // A hit on a fresh entry always promotes it past level 0.
/// assert_eq!(cache.get("a"), Some(1));
/// assert_eq!(cache.level("a"), Some(1));
///
/// // "b" is the only level-0 entry, so it makes room for "c".
/// cache.set("c", 3);
/// assert_eq!(cache.get("b"), None);
/// assert_eq!(cache.len(), 2);
/// ```
pub struct BucketLfu<K, V> {
    capacity: usize,
    table: PromotionTable,
    state: Mutex<Buckets<K, V>>,
    #[cfg(feature = "stats")]
    stats: CacheStats,
}

/// Everything guarded by the cache lock.
struct Buckets<K, V> {
    index: HashMap<K, u8>,
    buckets: [HashMap<K, V>; LEVELS],
    rng: fastrand::Rng,
}

impl<K, V> Buckets<K, V>
where
    K: Hash + Eq + Clone,
{
    fn new(rng: fastrand::Rng) -> Self {
        Self {
            index: HashMap::new(),
            buckets: std::array::from_fn(|_| HashMap::new()),
            rng,
        }
    }

    fn get<Q>(&mut self, key: &Q, table: &PromotionTable) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let level = *self.index.get(key)?;
        let value = self.buckets[level as usize].get(key)?.clone();

        if table.should_promote(level, &mut self.rng) {
            self.promote(level, key);
        }

        Some(value)
    }

    /// Moves `key` from `level` to `level + 1`. The caller guarantees
    /// `level` is below the terminal level.
    fn promote<Q>(&mut self, level: u8, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let next = level + 1;
        if let Some((owned, value)) = self.buckets[level as usize].remove_entry(key) {
            self.buckets[next as usize].insert(owned, value);
            if let Some(slot) = self.index.get_mut(key) {
                *slot = next;
            }
        }
    }

    /// Inserts or overwrites `key`, returning the entry evicted to make room.
    fn set(&mut self, key: K, value: V, capacity: usize) -> Option<(K, V, u8)> {
        if let Some(level) = self.index.get_mut(&key) {
            // Overwrite: discard accumulated frequency credit.
            let previous = std::mem::replace(level, 0);
            if previous > 0 {
                self.buckets[previous as usize].remove(&key);
            }
            self.buckets[0].insert(key, value);
            return None;
        }

        let evicted = if self.index.len() >= capacity {
            self.evict()
        } else {
            None
        };

        self.index.insert(key.clone(), 0);
        self.buckets[0].insert(key, value);
        evicted
    }

    fn evict(&mut self) -> Option<(K, V, u8)> {
        for (level, bucket) in self.buckets.iter_mut().enumerate() {
            // HashMap iteration order is unspecified: the victim is simply
            // the first key this bucket yields, not the oldest or a random one.
            let victim = match bucket.keys().next() {
                Some(key) => key.clone(),
                None => continue,
            };
            let (key, value) = bucket.remove_entry(&victim)?;
            self.index.remove(&key);
            return Some((key, value, level as u8));
        }
        None
    }

    fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.remove(key) {
            Some(level) => {
                self.buckets[level as usize].remove(key);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.index.clear();
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
    }
}

impl<K, V> BucketLfu<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries, using the default
    /// promotion base and an entropy-seeded RNG.
    ///
    /// A capacity of `0` disables caching: `set` stores nothing and `get`
    /// always misses.
    pub fn new(capacity: usize) -> Self {
        Self::from_parts(
            capacity,
            PromotionTable::default(),
            fastrand::Rng::new(),
        )
    }

    /// Creates a cache from a validated [`LfuConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the promotion base is outside `(0, 1]`.
    /// The shard count is ignored here.
    pub fn with_config(config: &LfuConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Ok(Self::from_parts(
            config.capacity,
            PromotionTable::new(config.promote_base),
            rng,
        ))
    }

    fn from_parts(capacity: usize, table: PromotionTable, rng: fastrand::Rng) -> Self {
        debug!(
            "creating bucketed LFU cache: capacity={}, levels={}",
            capacity, LEVELS
        );
        Self {
            capacity,
            table,
            state: Mutex::new(Buckets::new(rng)),
            #[cfg(feature = "stats")]
            stats: CacheStats::new(),
        }
    }

    /// Retrieves a cached value by key, possibly promoting the entry.
    ///
    /// # Returns
    ///
    /// * `Some(V)` - A clone of the most recently set value
    /// * `None` - If the key is not cached; nothing else changes
    ///
    /// # Promotion
    ///
    /// On a hit the entry may move one level up before the lock is released:
    ///
    /// - **Level 0**: always promoted to level 1
    /// - **Level i (middle)**: promoted with probability `base^i`
    /// - **Top level**: never promoted
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketlfu_core::BucketLfu;
    ///
    /// let cache = BucketLfu::new(4);
    /// assert_eq!(cache.get(&1), None);
    ///
    /// cache.set(1, "one");
    /// assert_eq!(cache.get(&1), Some("one"));
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let result = self.state.lock().get(key, &self.table);

        #[cfg(feature = "stats")]
        {
            if result.is_some() {
                self.stats.record_hit();
            } else {
                self.stats.record_miss();
            }
        }

        result
    }

    /// Inserts or overwrites a value.
    ///
    /// # Behavior
    ///
    /// - **Existing key**: the value is replaced and the entry drops back to
    ///   level 0, whatever level it had reached
    /// - **New key, cache full**: one entry from the lowest non-empty level is
    ///   evicted first, then the key is inserted at level 0
    /// - **New key, room left**: inserted at level 0
    /// - **Zero capacity**: nothing is stored
    ///
    /// Updates never evict. The evicted value is dropped after the lock is
    /// released.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketlfu_core::BucketLfu;
    ///
    /// let cache = BucketLfu::new(1);
    /// cache.set(1, 1);
    /// cache.set(2, 2);
    ///
    /// assert_eq!(cache.get(&1), None);
    /// assert_eq!(cache.get(&2), Some(2));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn set(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        let evicted = self.state.lock().set(key, value, self.capacity);

        if let Some((_, _, level)) = evicted {
            trace!("evicted entry from level {}", level);
            #[cfg(feature = "stats")]
            self.stats.record_eviction();
        }
    }

    /// Removes `key`, returning whether it was cached. Removing an absent
    /// key is a no-op.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().remove(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every entry. Statistics are left untouched.
    pub fn clear(&self) {
        self.state.lock().clear();
    }

    /// Returns the current level of `key` without promoting it.
    pub fn level<Q>(&self, key: &Q) -> Option<u8>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().index.get(key).copied()
    }

    /// Number of entries in each bucket, lowest level first.
    ///
    /// Taken under one lock acquisition, so the counts always sum to
    /// [`len`](Self::len) at that instant.
    pub fn level_counts(&self) -> [usize; LEVELS] {
        let state = self.state.lock();
        std::array::from_fn(|level| state.buckets[level].len())
    }

    /// Returns the hit/miss/eviction counters of this cache.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketlfu_core::BucketLfu;
    ///
    /// let cache = BucketLfu::new(1);
    /// cache.set("a", 1);
    /// cache.get("a");
    /// cache.get("b");
    /// cache.set("c", 3);
    ///
    /// let stats = cache.stats();
    /// assert_eq!(stats.hits(), 1);
    /// assert_eq!(stats.misses(), 1);
    /// assert_eq!(stats.evictions(), 1);
    /// ```
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<K, V> Cache<K, V> for BucketLfu<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        BucketLfu::get(self, key)
    }

    fn set(&self, key: K, value: V) {
        BucketLfu::set(self, key, value)
    }

    fn remove(&self, key: &K) -> bool {
        BucketLfu::remove(self, key)
    }

    fn len(&self) -> usize {
        BucketLfu::len(self)
    }
}

impl<K, V> fmt::Debug for BucketLfu<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.state.lock().index.len();
        f.debug_struct("BucketLfu")
            .field("capacity", &self.capacity)
            .field("len", &len)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
