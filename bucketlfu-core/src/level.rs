/// Number of frequency buckets.
pub const LEVELS: usize = 4;

/// The terminal, saturating level. Entries here never promote further.
pub const MAX_LEVEL: u8 = (LEVELS - 1) as u8;

/// Base of the promotion probability. An entry at level `i` (with
/// `0 < i < MAX_LEVEL`) moves up on a hit with probability `base^i`.
pub const DEFAULT_PROMOTE_BASE: f64 = 0.01;

/// Per-level promotion thresholds, computed once at construction.
///
/// A hit on an entry at level `i` draws `r` uniformly from `[0, 1)` and
/// promotes iff `r < threshold(i)`. Level 0 is handled without a draw.
///
/// # Examples
///
/// ```
/// use bucketlfu_core::{PromotionTable, MAX_LEVEL};
///
/// let table = PromotionTable::new(0.01);
/// assert_eq!(table.threshold(0), 1.0);
/// assert!((table.threshold(1) - 0.01).abs() < 1e-12);
/// assert!((table.threshold(2) - 0.0001).abs() < 1e-12);
/// assert_eq!(table.threshold(MAX_LEVEL), 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PromotionTable {
    thresholds: [f64; LEVELS],
}

impl PromotionTable {
    pub fn new(base: f64) -> Self {
        let mut thresholds = [0.0; LEVELS];
        let mut p = 1.0;
        for threshold in thresholds.iter_mut().take(LEVELS - 1) {
            *threshold = p;
            p *= base;
        }
        Self { thresholds }
    }

    /// Probability that a hit at `level` promotes the entry.
    #[inline]
    pub fn threshold(&self, level: u8) -> f64 {
        self.thresholds[level as usize]
    }

    /// Decides whether a hit at `level` promotes, drawing from `rng` only
    /// for the probabilistic middle levels.
    #[inline]
    pub(crate) fn should_promote(&self, level: u8, rng: &mut fastrand::Rng) -> bool {
        match level {
            0 => true,
            MAX_LEVEL => false,
            _ => rng.f64() < self.threshold(level),
        }
    }
}

impl Default for PromotionTable {
    fn default() -> Self {
        Self::new(DEFAULT_PROMOTE_BASE)
    }
}
