//! Process-wide counters for range events at the extreme tail of `f64`.
//!
//! Two places in the codec approximate instead of computing exactly:
//! [`crate::get_cached_power`] clamps its table index, and
//! [`crate::DecomposedFloat::to_double`] gives up when the power-of-ten ladder
//! runs out of steps (parse overflow). Neither is an error on the hot path,
//! but both are counted here and logged at `debug` level so round-trip
//! property tests can tell when they strayed into that territory.
//!
//! The counters are plain `Relaxed` atomics: they are monotonic tallies and
//! never used to order other memory.

use std::sync::atomic::{AtomicU64, Ordering};

static CACHED_POWER_CLAMPS: AtomicU64 = AtomicU64::new(0);
static PARSE_OVERFLOWS: AtomicU64 = AtomicU64::new(0);

/// Snapshot of the range-event counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeEvents {
    /// Lookups whose computed index fell outside the cached-power table
    pub cached_power_clamps: u64,
    /// Parses whose magnitude did not fit in a finite `f64`
    pub parse_overflows: u64,
}

impl RangeEvents {
    /// True when no range event has been recorded.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.cached_power_clamps == 0 && self.parse_overflows == 0
    }

    /// Events recorded since `earlier` was taken.
    #[inline]
    pub fn since(&self, earlier: &RangeEvents) -> RangeEvents {
        RangeEvents {
            cached_power_clamps: self
                .cached_power_clamps
                .saturating_sub(earlier.cached_power_clamps),
            parse_overflows: self
                .parse_overflows
                .saturating_sub(earlier.parse_overflows),
        }
    }
}

/// Read the current counters.
///
/// # Example
/// ```
/// # use f64_forge_helpers::{parse_double, range_events};
/// let before = range_events();
/// let (value, _) = parse_double("1e400");
/// assert!(value.is_infinite());
/// assert!(range_events().since(&before).parse_overflows >= 1);
/// ```
#[inline]
pub fn range_events() -> RangeEvents {
    RangeEvents {
        cached_power_clamps: CACHED_POWER_CLAMPS.load(Ordering::Relaxed),
        parse_overflows: PARSE_OVERFLOWS.load(Ordering::Relaxed),
    }
}

/// Zero both counters.
///
/// # Example
/// ```
/// # use f64_forge_helpers::{parse_double, range_events, reset_range_events};
/// parse_double("1e999");
/// reset_range_events();
/// assert!(range_events().is_clean());
/// ```
#[inline]
pub fn reset_range_events() {
    CACHED_POWER_CLAMPS.store(0, Ordering::Relaxed);
    PARSE_OVERFLOWS.store(0, Ordering::Relaxed);
}

#[inline(always)]
pub(crate) fn record_cached_power_clamp(exp2_target: i32, index: i32) {
    CACHED_POWER_CLAMPS.fetch_add(1, Ordering::Relaxed);
    log::debug!("cached power index {index} for exp2 {exp2_target} clamped to table range");
}

#[inline(always)]
pub(crate) fn record_parse_overflow(exp10: i32) {
    PARSE_OVERFLOWS.fetch_add(1, Ordering::Relaxed);
    log::debug!("decimal scale exponent {exp10} overflows f64");
}
