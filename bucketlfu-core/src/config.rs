use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use thiserror::Error;

use crate::level::DEFAULT_PROMOTE_BASE;
use crate::{BucketLfu, ShardedBucketLfu};

/// Rejected cache configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("promote base must be in (0, 1], got {0}")]
    InvalidPromoteBase(f64),
    #[error("shard count must be at least 1, got {0}")]
    InvalidShardCount(usize),
}

/// Construction parameters for [`BucketLfu`] and [`ShardedBucketLfu`].
///
/// # Fields
///
/// * `capacity` - Maximum number of entries. `0` disables retention entirely.
/// * `promote_base` - Base of the promotion probability (default `0.01`).
///   `1.0` makes every promotion below the terminal level certain.
/// * `seed` - Seed for the instance RNG. `None` seeds from entropy.
/// * `shards` - Number of independent sub-caches (sharded cache only).
///
/// # Examples
///
/// ```
/// use bucketlfu_core::{BucketLfu, ConfigError, LfuConfig};
///
/// let cache: BucketLfu<u64, String> = LfuConfig::new(1024).seed(7).build().unwrap();
/// assert_eq!(cache.capacity(), 1024);
///
/// let err = LfuConfig::new(16).promote_base(1.5).build::<u64, u64>().unwrap_err();
/// assert_eq!(err, ConfigError::InvalidPromoteBase(1.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LfuConfig {
    pub capacity: usize,
    pub promote_base: f64,
    pub seed: Option<u64>,
    pub shards: usize,
}

impl LfuConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            promote_base: DEFAULT_PROMOTE_BASE,
            seed: None,
            shards: 1,
        }
    }

    pub fn promote_base(mut self, base: f64) -> Self {
        self.promote_base = base;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    /// Checks every field, returning the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.promote_base;
        if !base.is_finite() || base <= 0.0 || base > 1.0 {
            return Err(ConfigError::InvalidPromoteBase(base));
        }
        if self.shards == 0 {
            return Err(ConfigError::InvalidShardCount(self.shards));
        }
        Ok(())
    }

    pub fn build<K, V>(&self) -> Result<BucketLfu<K, V>, ConfigError>
    where
        K: Hash + Eq + Clone,
        V: Clone,
    {
        BucketLfu::with_config(self)
    }

    pub fn build_sharded<K, V>(&self) -> Result<ShardedBucketLfu<K, V, RandomState>, ConfigError>
    where
        K: Hash + Eq + Clone,
        V: Clone,
    {
        ShardedBucketLfu::with_config(self)
    }

    pub fn build_sharded_with_hasher<K, V, S>(
        &self,
        hasher: S,
    ) -> Result<ShardedBucketLfu<K, V, S>, ConfigError>
    where
        K: Hash + Eq + Clone,
        V: Clone,
        S: BuildHasher,
    {
        ShardedBucketLfu::with_config_and_hasher(self, hasher)
    }
}

impl Default for LfuConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LfuConfig::new(10);
        assert_eq!(config.capacity, 10);
        assert_eq!(config.promote_base, DEFAULT_PROMOTE_BASE);
        assert_eq!(config.seed, None);
        assert_eq!(config.shards, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_promote_base_bounds() {
        assert!(LfuConfig::new(1).promote_base(1.0).validate().is_ok());
        assert!(LfuConfig::new(1).promote_base(f64::MIN_POSITIVE).validate().is_ok());

        for bad in [0.0, -0.5, 1.0001, f64::NAN, f64::INFINITY] {
            let result = LfuConfig::new(1).promote_base(bad).validate();
            assert!(
                matches!(result, Err(ConfigError::InvalidPromoteBase(_))),
                "{} accepted",
                bad
            );
        }
    }

    #[test]
    fn test_zero_shards_rejected() {
        let result = LfuConfig::new(8).shards(0).validate();
        assert_eq!(result, Err(ConfigError::InvalidShardCount(0)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::InvalidPromoteBase(2.0).to_string(),
            "promote base must be in (0, 1], got 2"
        );
        assert_eq!(
            ConfigError::InvalidShardCount(0).to_string(),
            "shard count must be at least 1, got 0"
        );
    }
}
