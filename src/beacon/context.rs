//! Beacon Context
//!
//! Control-context orchestrator: polls the slot scheduler each tick,
//! invokes the packet encoder on a fired slot, loads the symbol pipeline,
//! and gates the oscillator. Also carries the caller-policy decisions the
//! scheduler deliberately leaves out (GPS-mandatory refusal, busy-skip).

use heapless::String;

use crate::beacon::encoder::{
    encode_with_fallback, EncodeError, MessageEncoder, Packing, ToneSequence,
};
use crate::beacon::pipeline::SymbolPipeline;
use crate::beacon::scheduler::{self, ScheduleConfig, SlotAction, SlotScheduler};
use crate::config::{MESSAGE_MAX_LEN, SECONDS_PER_HOUR, SECONDS_PER_SLOT};
use crate::gpstime::{qth_locator, TimeSolution};
use crate::osc::ToneOscillator;
use crate::types::{BeaconIdentity, BeaconProtocol, DialFrequency, RfChannel};

/// Outcome of one control-loop tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No usable time source; keep polling
    NoTimeSource,
    /// Passive slot; oscillator stopped
    Passive,
    /// Eligible slot already handled this cycle
    AlreadyFired,
    /// A transmission is still in flight; this cycle was skipped
    TxInProgress,
    /// Transmission started for this slot
    Fired {
        /// Slot index that fired
        slot: u32,
        /// Packing the encoder settled on
        packing: Packing,
    },
    /// Forced transmission started outside the slot schedule
    Forced(Packing),
    /// Encoding failed; this cycle was skipped
    EncodeFailed(EncodeError),
}

#[cfg(feature = "embedded")]
impl defmt::Format for TickOutcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::NoTimeSource => defmt::write!(f, "NoTimeSource"),
            Self::Passive => defmt::write!(f, "Passive"),
            Self::AlreadyFired => defmt::write!(f, "AlreadyFired"),
            Self::TxInProgress => defmt::write!(f, "TxInProgress"),
            Self::Fired { slot, packing } => defmt::write!(f, "Fired({}, {})", slot, packing),
            Self::Forced(packing) => defmt::write!(f, "Forced({})", packing),
            Self::EncodeFailed(err) => defmt::write!(f, "EncodeFailed({})", err),
        }
    }
}

/// Beacon orchestrator owned by the control context
pub struct BeaconContext<E> {
    identity: BeaconIdentity,
    config: ScheduleConfig,
    protocol: BeaconProtocol,
    scheduler: SlotScheduler,
    encoder: E,
    message: String<MESSAGE_MAX_LEN>,
    dial: DialFrequency,
    carrier_shift_hz: i32,
    channel: RfChannel,
}

impl<E: MessageEncoder> BeaconContext<E> {
    /// Create a new beacon context
    ///
    /// The initial message is the standard structured `CALL LOC PWR`
    /// built from the identity.
    #[must_use]
    pub fn new(
        identity: BeaconIdentity,
        config: ScheduleConfig,
        protocol: BeaconProtocol,
        encoder: E,
        dial: DialFrequency,
        channel: RfChannel,
    ) -> Self {
        let message = identity.standard_message();
        Self {
            identity,
            config,
            protocol,
            scheduler: SlotScheduler::new(),
            encoder,
            message,
            dial,
            carrier_shift_hz: 0,
            channel,
        }
    }

    /// Get the station identity
    #[must_use]
    pub const fn identity(&self) -> &BeaconIdentity {
        &self.identity
    }

    /// Get the schedule configuration
    #[must_use]
    pub const fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Get the transmission protocol
    #[must_use]
    pub const fn protocol(&self) -> BeaconProtocol {
        self.protocol
    }

    /// Get the current message text
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the message encoder
    #[must_use]
    pub const fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Get the dial frequency (without carrier shift)
    #[must_use]
    pub const fn dial(&self) -> DialFrequency {
        self.dial
    }

    /// Get the carrier shift in Hz
    #[must_use]
    pub const fn carrier_shift_hz(&self) -> i32 {
        self.carrier_shift_hz
    }

    /// Replace the message text, truncating beyond the buffer bound
    pub fn set_message(&mut self, message: &str) {
        self.message.clear();
        for c in message.chars().take(MESSAGE_MAX_LEN) {
            if self.message.push(c).is_err() {
                break;
            }
        }
    }

    /// Set the dial frequency
    pub fn set_dial(&mut self, dial: DialFrequency) {
        self.dial = dial;
    }

    /// Set the carrier shift relative to the dial frequency
    ///
    /// Rejected (returns false) when the shifted carrier would leave the
    /// supported frequency range.
    pub fn set_carrier_shift_hz(&mut self, shift_hz: i32) -> bool {
        if self.dial.offset_by(shift_hz).is_none() {
            return false;
        }
        self.carrier_shift_hz = shift_hz;
        true
    }

    /// Rebuild the standard message using the GPS-derived locator
    ///
    /// No-op when the solution carries no position.
    pub fn update_message_from_gps(&mut self, solution: &TimeSolution) {
        let Some((lat, lon)) = solution.position else {
            return;
        };
        let locator = qth_locator(lat, lon);
        self.message.clear();
        let _ = core::fmt::write(
            &mut self.message,
            format_args!(
                "{} {} {}",
                self.identity.callsign().as_str(),
                locator.as_str(),
                self.identity.tx_power().as_dbm()
            ),
        );
    }

    /// Run one control-loop tick
    ///
    /// Polls the scheduler; on a fired slot encodes the current message,
    /// loads the pipeline, then starts the oscillator — strictly in that
    /// order, so the RF context never observes a half-written buffer. A
    /// slot that fires while a transmission is still pending is skipped
    /// (there is no mid-transmission cancellation).
    pub fn tick<O: ToneOscillator>(
        &mut self,
        now_monotonic_us: u64,
        solution: &TimeSolution,
        pipeline: &mut SymbolPipeline,
        oscillator: &mut O,
    ) -> TickOutcome {
        match self.scheduler.poll(now_monotonic_us, solution, &self.config) {
            SlotAction::NoTimeSource => TickOutcome::NoTimeSource,
            SlotAction::AlreadyFired => TickOutcome::AlreadyFired,
            SlotAction::PassiveSlot => {
                if !pipeline.pending() {
                    oscillator.stop(self.channel);
                }
                TickOutcome::Passive
            }
            SlotAction::FireSlot(slot) => {
                if pipeline.pending() {
                    return TickOutcome::TxInProgress;
                }
                match self.start_transmission(now_monotonic_us, pipeline, oscillator) {
                    Ok(packing) => TickOutcome::Fired { slot, packing },
                    Err(err) => TickOutcome::EncodeFailed(err),
                }
            }
        }
    }

    /// Force an immediate transmission outside the slot schedule
    ///
    /// Serial-command path. Refused while a transmission is pending, and
    /// refused under GPS-mandatory policy until the oracle has ever
    /// produced a fix.
    pub fn force_transmit<O: ToneOscillator>(
        &mut self,
        now_monotonic_us: u64,
        solution: &TimeSolution,
        pipeline: &mut SymbolPipeline,
        oscillator: &mut O,
    ) -> TickOutcome {
        if self.config.gps_mandatory && !solution.ever_synchronized() {
            return TickOutcome::NoTimeSource;
        }
        if pipeline.pending() {
            return TickOutcome::TxInProgress;
        }
        match self.start_transmission(now_monotonic_us, pipeline, oscillator) {
            Ok(packing) => TickOutcome::Forced(packing),
            Err(err) => TickOutcome::EncodeFailed(err),
        }
    }

    /// Encode the current message, load the pipeline, start the oscillator
    ///
    /// Precondition (checked by callers): pipeline not pending.
    fn start_transmission<O: ToneOscillator>(
        &mut self,
        now_monotonic_us: u64,
        pipeline: &mut SymbolPipeline,
        oscillator: &mut O,
    ) -> Result<Packing, EncodeError> {
        let mut tones = ToneSequence::new();
        let packing = encode_with_fallback(&mut self.encoder, &self.message, &mut tones)?;

        let carrier = self
            .dial
            .offset_by(self.carrier_shift_hz)
            .unwrap_or(self.dial);

        pipeline.load(
            &tones,
            carrier,
            self.channel,
            self.protocol.symbol_period_us(),
            now_monotonic_us,
        );
        oscillator.start(self.channel);
        Ok(packing)
    }

    /// Take a read-only diagnostics snapshot
    #[must_use]
    pub fn diagnostics(
        &self,
        now_monotonic_us: u64,
        solution: &TimeSolution,
        pipeline: &SymbolPipeline,
    ) -> BeaconDiagnostics {
        let effective =
            scheduler::effective_unix_time(now_monotonic_us, solution, &self.config);
        BeaconDiagnostics {
            last_fired_slot: self.scheduler.last_fired_slot(),
            pending: pipeline.pending(),
            loaded_count: pipeline.loaded_count(),
            cursor: pipeline.cursor(),
            dial_hz: pipeline.dial().map(DialFrequency::as_hz),
            next_deadline_us: pipeline.next_deadline_us(),
            solution_active: solution.solution_active,
            update_count: solution.update_count,
            fix_age_s: solution.fix_age_s(now_monotonic_us),
            effective_unix_time: effective,
            current_slot: effective.map(|t| (t % SECONDS_PER_HOUR) / SECONDS_PER_SLOT),
        }
    }
}

/// Read-only dump of scheduler, pipeline, and time-oracle state
///
/// Side-effect-free observer for operational visibility; not part of the
/// scheduling contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeaconDiagnostics {
    /// Debounce memory of the scheduler
    pub last_fired_slot: Option<u32>,
    /// Whether a transmission is in flight
    pub pending: bool,
    /// Symbols loaded for the current/last transmission
    pub loaded_count: usize,
    /// RF-context consumption cursor
    pub cursor: usize,
    /// Dial frequency of the loaded transmission
    pub dial_hz: Option<u32>,
    /// Deadline of the active symbol interval
    pub next_deadline_us: Option<u64>,
    /// Whether the GPS solution is currently active
    pub solution_active: bool,
    /// Accepted fix count since boot
    pub update_count: u32,
    /// Age of the last accepted fix in seconds
    pub fix_age_s: u64,
    /// Effective unix time the scheduler would use, if any
    pub effective_unix_time: Option<u32>,
    /// Slot index derived from the effective time, if any
    pub current_slot: Option<u32>,
}

#[cfg(feature = "embedded")]
impl defmt::Format for BeaconDiagnostics {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Diag(slot={}, pending={}, ix={}/{}, age={}s, rmc={})",
            self.current_slot,
            self.pending,
            self.cursor,
            self.loaded_count,
            self.fix_age_s,
            self.update_count
        );
    }
}
