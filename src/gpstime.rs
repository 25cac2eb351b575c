//! GPS Time Oracle Adapter
//!
//! The beacon core consumes GPS time as an opaque, continuously refreshed
//! snapshot. NMEA parsing and PPS clock discipline live outside this crate;
//! this module fixes the exact semantics the scheduler depends on:
//!
//! - `last_update_monotonic_us` is monotonic-clock time of the most recent
//!   accepted fix, independent of the reported unix time.
//! - `update_count` distinguishes "never synchronized" from "synchronized
//!   once, now stale".

use crate::types::Locator;

/// Snapshot of the most recent GPS time solution
///
/// Owned by the time oracle, read by the scheduler. The scheduler never
/// writes this structure.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimeSolution {
    /// Unix time of the last accepted fix, in seconds
    pub unix_time_s: u32,
    /// Whether a solution is currently active (receiver locked)
    pub solution_active: bool,
    /// Monotonic-clock time of the last accepted fix, in microseconds
    pub last_update_monotonic_us: u64,
    /// Rolling count of accepted fixes since boot
    pub update_count: u32,
    /// Geographic position (latitude, longitude) in degrees, if resolved
    pub position: Option<(f64, f64)>,
}

impl TimeSolution {
    /// Age of the last accepted fix in whole seconds
    ///
    /// Saturates to zero if the snapshot timestamp is in the caller's
    /// future (clock domains crossed mid-update).
    #[must_use]
    pub const fn fix_age_s(&self, now_monotonic_us: u64) -> u64 {
        now_monotonic_us.saturating_sub(self.last_update_monotonic_us) / 1_000_000
    }

    /// Whether the oracle has ever produced an accepted fix
    #[must_use]
    pub const fn ever_synchronized(&self) -> bool {
        self.update_count > 0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TimeSolution {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "TimeSolution(utm={}, active={}, updates={})",
            self.unix_time_s,
            self.solution_active,
            self.update_count
        );
    }
}

/// Source of time solution snapshots
///
/// Implemented by the GPS receiver adapter; test doubles implement it
/// directly over a stored snapshot.
pub trait TimeOracle {
    /// Take a snapshot of the current time solution
    fn solution(&self) -> TimeSolution;
}

/// Derive a 6-character Maidenhead locator from a GPS position
///
/// Uses scaled-integer grid units (1/12 degree longitude, 1/24 degree
/// latitude) so grid boundaries resolve identically on host and target.
#[must_use]
pub fn qth_locator(lat_deg: f64, lon_deg: f64) -> Locator {
    // 4320 units span the full circle/pole range for both axes
    const UNITS_MAX: u32 = 4319;

    let lon = (lon_deg + 180.0).clamp(0.0, 360.0);
    let lat = (lat_deg + 90.0).clamp(0.0, 180.0);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lon_units = ((lon * 12.0) as u32).min(UNITS_MAX);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lat_units = ((lat * 24.0) as u32).min(UNITS_MAX);

    #[allow(clippy::cast_possible_truncation)]
    let chars = [
        b'A' + (lon_units / 240) as u8,
        b'A' + (lat_units / 240) as u8,
        b'0' + ((lon_units % 240) / 24) as u8,
        b'0' + ((lat_units % 240) / 24) as u8,
        b'a' + (lon_units % 24) as u8,
        b'a' + (lat_units % 24) as u8,
    ];

    Locator::new(core::str::from_utf8(&chars).unwrap_or("AA00aa"))
}
