//! Symbol Pipeline
//!
//! Transfers one fully-encoded tone sequence from the control context to
//! the RF context. The interface is deliberately narrow and asymmetric:
//! `load`/`clear` are the only writes crossing into the RF domain,
//! `pending` is the only read crossing back. The control context MUST NOT
//! touch the pipeline while a transmission is pending; violating that
//! precondition is a programming defect and asserts fatally rather than
//! corrupting an in-flight transmission.
//!
//! All mutation goes through `&mut self`, so each context's exclusive
//! access is compiler-checked. On target the single instance lives in a
//! critical-section cell; neither side holds it across a wait.

use heapless::Vec;

use crate::config::SYMBOL_CAPACITY;
use crate::osc::ToneOscillator;
use crate::types::{DialFrequency, RfChannel, Tone};

/// One-shot producer/consumer handoff for an encoded transmission
#[derive(Clone, Debug, Default)]
pub struct SymbolPipeline {
    /// Loaded tone sequence; length is the loaded count
    tones: Vec<Tone, SYMBOL_CAPACITY>,
    /// Consumption cursor, advanced by the RF context
    cursor: usize,
    /// Dial frequency for this transmission
    dial: Option<DialFrequency>,
    /// RF output channel for this transmission
    channel: RfChannel,
    /// Duration of one symbol interval in microseconds
    symbol_period_us: u64,
    /// Deadline at which the current symbol interval ends
    ///
    /// `Some` exactly while a transmission is pending.
    next_deadline_us: Option<u64>,
}

/// Outcome of one RF-context service call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolStep {
    /// Nothing loaded; nothing to do
    Idle,
    /// Current symbol interval has not elapsed yet
    Waiting,
    /// Interval elapsed: retune the oscillator to this tone
    Retune {
        /// Tone index to radiate for the next interval
        tone: Tone,
        /// Dial frequency of the transmission
        dial: DialFrequency,
        /// RF output channel of the transmission
        channel: RfChannel,
    },
    /// Final symbol interval elapsed; pipeline is no longer pending
    ///
    /// The oscillator is left at its last commanded state until the
    /// control context explicitly stops it.
    Completed,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SymbolStep {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "Idle"),
            Self::Waiting => defmt::write!(f, "Waiting"),
            Self::Retune { tone, .. } => defmt::write!(f, "Retune({})", tone),
            Self::Completed => defmt::write!(f, "Completed"),
        }
    }
}

impl SymbolPipeline {
    /// Create an empty pipeline
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tones: Vec::new(),
            cursor: 0,
            dial: None,
            channel: RfChannel::new(0),
            symbol_period_us: 0,
            next_deadline_us: None,
        }
    }

    /// Whether a transmission is still in flight
    ///
    /// True while the RF context has unconsumed symbols or the current
    /// symbol interval has not elapsed. Non-blocking; this is how the
    /// control context waits for completion without stalling.
    #[must_use]
    pub const fn pending(&self) -> bool {
        self.next_deadline_us.is_some()
    }

    /// Number of symbols loaded for this transmission
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.tones.len()
    }

    /// Consumption cursor position
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Dial frequency of the loaded transmission, if any
    #[must_use]
    pub const fn dial(&self) -> Option<DialFrequency> {
        self.dial
    }

    /// Deadline at which the active symbol interval ends, if pending
    #[must_use]
    pub const fn next_deadline_us(&self) -> Option<u64> {
        self.next_deadline_us
    }

    /// Reset the pipeline to empty
    ///
    /// # Panics
    ///
    /// Asserts that no transmission is pending; clearing an in-flight
    /// buffer would corrupt the transmission.
    pub fn clear(&mut self) {
        assert!(!self.pending(), "pipeline cleared while transmission pending");
        self.tones.clear();
        self.cursor = 0;
        self.dial = None;
        self.next_deadline_us = None;
    }

    /// Load an encoded transmission and arm the first-symbol deadline
    ///
    /// The RF context begins consuming only after the control context
    /// starts the oscillator, which it does strictly after this returns.
    ///
    /// # Panics
    ///
    /// Asserts that no transmission is pending and that `tones` fits the
    /// buffer capacity. Both are caller-side programming defects.
    pub fn load(
        &mut self,
        tones: &[Tone],
        dial: DialFrequency,
        channel: RfChannel,
        symbol_period_us: u64,
        now_monotonic_us: u64,
    ) {
        assert!(!self.pending(), "pipeline loaded while transmission pending");
        assert!(tones.len() <= SYMBOL_CAPACITY, "tone sequence exceeds capacity");

        self.tones.clear();
        // Capacity asserted above
        let _ = self.tones.extend_from_slice(tones);
        self.cursor = 0;
        self.dial = Some(dial);
        self.channel = channel;
        self.symbol_period_us = symbol_period_us;
        self.next_deadline_us = Some(now_monotonic_us);
    }

    /// Service the pipeline from the RF context
    ///
    /// Invoked once per RF-context poll at a cadence well below the symbol
    /// period. Advances the cursor when the active interval has elapsed
    /// and reports the tone to retune to; after the final interval the
    /// pipeline becomes non-pending.
    pub fn service(&mut self, now_monotonic_us: u64) -> SymbolStep {
        let (Some(deadline), Some(dial)) = (self.next_deadline_us, self.dial) else {
            return SymbolStep::Idle;
        };

        if now_monotonic_us < deadline {
            return SymbolStep::Waiting;
        }

        if self.cursor < self.tones.len() {
            let tone = self.tones[self.cursor];
            self.cursor += 1;
            self.next_deadline_us = Some(deadline + self.symbol_period_us);
            return SymbolStep::Retune {
                tone,
                dial,
                channel: self.channel,
            };
        }

        // Final symbol interval elapsed
        self.next_deadline_us = None;
        SymbolStep::Completed
    }
}

/// Drive a tone oscillator from one pipeline service call
///
/// RF-context glue: retunes on `Retune`, otherwise leaves the oscillator
/// untouched. Returns the step for the caller's bookkeeping.
pub fn service_transmission<O: ToneOscillator>(
    pipeline: &mut SymbolPipeline,
    oscillator: &mut O,
    now_monotonic_us: u64,
) -> SymbolStep {
    let step = pipeline.service(now_monotonic_us);
    if let SymbolStep::Retune { tone, dial, .. } = step {
        oscillator.set_tone(dial, tone);
    }
    step
}
