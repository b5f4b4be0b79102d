use log::debug;

use bucketlfu_core::Cache;

use crate::{KeyReader, TraceError};

/// Hit and miss counts from replaying a key sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitRatio {
    pub hits: u64,
    pub misses: u64,
}

impl HitRatio {
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, `0.0` for an empty replay.
    pub fn ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Feeds every key from `reader` through `cache`, reading `batch` keys at a
/// time. A miss stores the key as its own value.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use bucketlfu_core::BucketLfu;
/// use bucketlfu_trace::{replay, LirsReader};
///
/// let cache: BucketLfu<i64, i64> = BucketLfu::new(8);
/// let mut reader = LirsReader::new(Cursor::new("1\n2\n1\n1\n3\n"));
///
/// let result = replay(&cache, &mut reader, 2).unwrap();
/// assert_eq!(result.hits, 2);
/// assert_eq!(result.misses, 3);
/// ```
pub fn replay<C, R>(cache: &C, reader: &mut R, batch: usize) -> Result<HitRatio, TraceError>
where
    C: Cache<i64, i64> + ?Sized,
    R: KeyReader + ?Sized,
{
    let mut keys = vec![0; batch.max(1)];
    let mut result = HitRatio::default();

    loop {
        let n = reader.read_keys(&mut keys)?;
        for &key in &keys[..n] {
            if cache.get(&key).is_some() {
                result.hits += 1;
            } else {
                result.misses += 1;
                cache.set(key, key);
            }
        }
        if n < keys.len() {
            break;
        }
    }

    debug!(
        "replayed {} keys: {} hits, ratio {:.4}",
        result.total(),
        result.hits,
        result.ratio()
    );
    Ok(result)
}
