/// The contract shared by every cache in this crate.
///
/// Implementations are internally synchronized: every method takes `&self`
/// and may be called from many threads without external locking.
///
/// # Examples
///
/// ```
/// use bucketlfu_core::{BucketLfu, Cache};
///
/// fn warm<C: Cache<u32, u32>>(cache: &C) {
///     for i in 0..4 {
///         cache.set(i, i * 10);
///     }
/// }
///
/// let cache: BucketLfu<u32, u32> = BucketLfu::new(8);
/// warm(&cache);
/// assert_eq!(Cache::get(&cache, &2), Some(20));
/// assert_eq!(Cache::len(&cache), 4);
/// ```
pub trait Cache<K, V> {
    /// Returns a clone of the value stored for `key`, if any.
    fn get(&self, key: &K) -> Option<V>;

    /// Stores `value` under `key`, evicting another entry if the cache is full.
    fn set(&self, key: K, value: V);

    /// Removes `key`, returning whether it was present.
    fn remove(&self, key: &K) -> bool;

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
