//! # bucketlfu Core
//!
//! A fixed-capacity, thread-safe cache that approximates least-frequently-used
//! eviction with a handful of frequency buckets and probabilistic promotion.
//!
//! ## Features
//!
//! - **Bucketed frequency tracking**: entries live in one of [`LEVELS`] buckets
//!   instead of carrying exact access counters
//! - **Probabilistic promotion**: a first repeat access always promotes, later
//!   promotions get exponentially rarer (`base^level`)
//! - **Synchronous eviction**: a full cache evicts from its lowest non-empty
//!   bucket right before inserting a new key
//! - **Single lock**: one `parking_lot::Mutex` per cache, no background work
//! - **Sharding**: [`ShardedBucketLfu`] spreads keys over independent caches
//! - **Statistics**: optional hit/miss/eviction counters (`stats` feature)
//!
//! ## Module Organization
//!
//! - [`bucket_lfu`] - The cache itself
//! - [`sharded`] - Hash-sharded wrapper around several caches
//! - [`level`] - Level constants and the promotion probability table
//! - [`config`] - Construction parameters and their validation
//! - [`traits`] - The [`Cache`] contract shared by both cache types
//!
//! ## Example
//!
//! ```
//! use bucketlfu_core::{BucketLfu, MAX_LEVEL};
//!
//! let cache = BucketLfu::new(100);
//! cache.set("user:1", "alice");
//!
//! assert_eq!(cache.get("user:1"), Some("alice"));
//! assert!(cache.level("user:1").unwrap() <= MAX_LEVEL);
//! ```
pub mod bucket_lfu;
pub mod config;
pub mod level;
pub mod sharded;
pub mod traits;

#[cfg(feature = "stats")]
mod stats;

pub use bucket_lfu::BucketLfu;
pub use config::{ConfigError, LfuConfig};
pub use level::{PromotionTable, DEFAULT_PROMOTE_BASE, LEVELS, MAX_LEVEL};
pub use sharded::ShardedBucketLfu;
pub use traits::Cache;

#[cfg(feature = "stats")]
pub use stats::CacheStats;
