//! # bucketlfu
//!
//! A fixed-capacity, thread-safe key/value cache that approximates
//! least-frequently-used eviction with a few discrete frequency buckets and
//! probabilistic promotion.
//!
//! ## Features
//!
//! - **O(1) expected operations**: no heap, no per-frequency linked lists
//! - **Thread-safe**: one mutex per cache, callable from any thread
//! - **Frequency-biased eviction**: a full cache always evicts from its
//!   lowest non-empty frequency bucket
//! - **Sharding**: optional hash-sharded variant for heavy contention
//! - **Trace replay**: ARC and LIRS trace readers for hit-ratio evaluation
//!
//! ## Quick Start
//!
//! ```rust
//! use bucketlfu::BucketLfu;
//!
//! let cache = BucketLfu::new(2);
//! cache.set(1, "one");
//! cache.set(2, "two");
//!
//! // Reading key 1 promotes it above key 2.
//! assert_eq!(cache.get(&1), Some("one"));
//!
//! // The cache is full, so the least confirmed entry (key 2) makes room.
//! cache.set(3, "three");
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.len(), 2);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use bucketlfu::{BucketLfu, LfuConfig};
//!
//! let cache: BucketLfu<String, Vec<u8>> = LfuConfig::new(10_000)
//!     .promote_base(0.05)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! assert_eq!(cache.capacity(), 10_000);
//! ```
//!
//! ## Sharing Across Threads
//!
//! ```rust
//! use bucketlfu::BucketLfu;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(BucketLfu::new(128));
//! let handles: Vec<_> = (0..4u64)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..32 {
//!                 cache.set(t * 32 + i, i);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 128);
//! ```

use std::path::Path;

pub use bucketlfu_core::*;
pub use bucketlfu_trace as trace;

/// Opens the trace at `path` and replays it through `cache`.
///
/// Keys are read `batch` at a time; every miss stores the key as its own
/// value. See [`trace::replay`].
///
/// # Errors
///
/// Any [`trace::TraceError`] from opening or parsing the trace.
///
/// # Examples
///
/// ```no_run
/// use bucketlfu::{replay_trace, BucketLfu};
///
/// let cache: BucketLfu<i64, i64> = BucketLfu::new(1000);
/// let result = replay_trace("traces/OLTP.arc", &cache, 4096).unwrap();
/// println!("{:.2}% hits", result.ratio() * 100.0);
/// ```
pub fn replay_trace<C>(
    path: impl AsRef<Path>,
    cache: &C,
    batch: usize,
) -> Result<trace::HitRatio, trace::TraceError>
where
    C: Cache<i64, i64> + ?Sized,
{
    let mut source = trace::Trace::open(path)?;
    trace::replay(cache, &mut source, batch)
}
