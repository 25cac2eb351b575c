//! Slot Scheduler
//!
//! Decides, on each control-context poll, whether "now" falls at the start
//! of an eligible transmission slot. WSPR slots are 120-second UTC-aligned
//! windows of the hour; the scheduler is polled many times per slot, so an
//! edge-triggered debounce memory guarantees exactly one fire per rising
//! edge of eligibility.

use crate::config::{
    DEFAULT_SLOT_SKIP, DEFAULT_STALENESS_LIMIT_S, SECONDS_PER_HOUR, SECONDS_PER_SLOT,
};
use crate::gpstime::TimeSolution;

/// Transmission schedule configuration
///
/// Set once at startup; read-only from the scheduler's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Refuse free-running transmission without a GPS-disciplined clock
    pub gps_mandatory: bool,
    /// Permit extrapolating from a lapsed solution within the staleness limit
    pub allow_stale_fallback: bool,
    /// Transmit in one of every N slots (1 = every slot)
    slot_skip: u8,
    /// Maximum acceptable fix age when extrapolating, in seconds
    pub staleness_limit_s: u32,
}

impl ScheduleConfig {
    /// Create a config with the firmware defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gps_mandatory: false,
            allow_stale_fallback: false,
            slot_skip: DEFAULT_SLOT_SKIP,
            staleness_limit_s: DEFAULT_STALENESS_LIMIT_S,
        }
    }

    /// Set the slot skip; zero is clamped to one
    #[must_use]
    pub const fn with_slot_skip(mut self, slot_skip: u8) -> Self {
        self.slot_skip = if slot_skip == 0 { 1 } else { slot_skip };
        self
    }

    /// Require a GPS-disciplined clock for any transmission
    #[must_use]
    pub const fn with_gps_mandatory(mut self, mandatory: bool) -> Self {
        self.gps_mandatory = mandatory;
        self
    }

    /// Permit stale-solution extrapolation
    #[must_use]
    pub const fn with_stale_fallback(mut self, allow: bool) -> Self {
        self.allow_stale_fallback = allow;
        self
    }

    /// Set the staleness limit in seconds
    #[must_use]
    pub const fn with_staleness_limit_s(mut self, limit_s: u32) -> Self {
        self.staleness_limit_s = limit_s;
        self
    }

    /// Get the slot skip (always at least 1)
    #[must_use]
    pub const fn slot_skip(&self) -> u8 {
        self.slot_skip
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ScheduleConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Sched(skip={}, mandatory={}, stale={}/{}s)",
            self.slot_skip,
            self.gps_mandatory,
            self.allow_stale_fallback,
            self.staleness_limit_s
        );
    }
}

/// Outcome of one scheduler poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotAction {
    /// No usable time source; a steady state, not an error
    NoTimeSource,
    /// Time known, not an eligible slot; the oscillator should be idle
    PassiveSlot,
    /// Start of an eligible slot not yet handled; encode and transmit
    FireSlot(u32),
    /// Polled again inside a slot already handled this cycle
    AlreadyFired,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SlotAction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::NoTimeSource => defmt::write!(f, "NoTimeSource"),
            Self::PassiveSlot => defmt::write!(f, "PassiveSlot"),
            Self::FireSlot(slot) => defmt::write!(f, "FireSlot({})", slot),
            Self::AlreadyFired => defmt::write!(f, "AlreadyFired"),
        }
    }
}

/// Slot scheduler with per-instance debounce memory
#[derive(Clone, Debug, Default)]
pub struct SlotScheduler {
    /// Slot index of the most recent fire; cleared on every passive slot
    last_fired_slot: Option<u32>,
}

impl SlotScheduler {
    /// Create a new scheduler
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_fired_slot: None,
        }
    }

    /// Slot index of the most recent fire, if still armed
    #[must_use]
    pub const fn last_fired_slot(&self) -> Option<u32> {
        self.last_fired_slot
    }

    /// Poll the schedule
    ///
    /// Called at least once per second by the control context. Absence of
    /// a time source is a steady state the caller polls through, never an
    /// error. GPS-mandatory policy is the caller's to enforce on top of
    /// the returned action.
    pub fn poll(
        &mut self,
        now_monotonic_us: u64,
        solution: &TimeSolution,
        config: &ScheduleConfig,
    ) -> SlotAction {
        let Some(effective_unix_time) = effective_unix_time(now_monotonic_us, solution, config)
        else {
            return SlotAction::NoTimeSource;
        };

        let slot_index = (effective_unix_time % SECONDS_PER_HOUR) / SECONDS_PER_SLOT;

        if slot_index % u32::from(config.slot_skip()) != 0 {
            // Re-arm: a fire is allowed again after any passive interval
            self.last_fired_slot = None;
            return SlotAction::PassiveSlot;
        }

        if self.last_fired_slot == Some(slot_index) {
            return SlotAction::AlreadyFired;
        }

        self.last_fired_slot = Some(slot_index);
        SlotAction::FireSlot(slot_index)
    }
}

/// Compute the effective unix time, or None when the source is unusable
///
/// An active solution is used directly. A lapsed one is extrapolated from
/// the fix age, but only when fallback is configured and the age is within
/// the staleness limit.
pub(crate) fn effective_unix_time(
    now_monotonic_us: u64,
    solution: &TimeSolution,
    config: &ScheduleConfig,
) -> Option<u32> {
    if !solution.ever_synchronized() {
        return None;
    }

    if solution.solution_active {
        return Some(solution.unix_time_s);
    }

    let age_s = solution.fix_age_s(now_monotonic_us);
    if config.allow_stale_fallback && age_s <= u64::from(config.staleness_limit_s) {
        #[allow(clippy::cast_possible_truncation)]
        return Some(solution.unix_time_s.wrapping_add(age_s as u32));
    }

    None
}
