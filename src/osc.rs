//! Oscillator Control Seam
//!
//! The frequency-synthesis primitive lives outside this crate. The beacon
//! core drives it through this narrow contract: the control context gates
//! `start`/`stop` around a transmission, the RF context retunes once per
//! symbol interval. Exactly one control handle exists process-wide.

use crate::types::{DialFrequency, RfChannel, Tone};

/// Digitally synthesized tone oscillator
pub trait ToneOscillator {
    /// Start radiating on the output channel
    fn start(&mut self, channel: RfChannel);

    /// Stop radiating; the output pin is driven to its idle level
    fn stop(&mut self, channel: RfChannel);

    /// Retune to the carrier for tone index `tone` above the dial frequency
    ///
    /// Called once per symbol interval by the RF context. Must not block
    /// beyond a small fraction of the symbol period.
    fn set_tone(&mut self, dial: DialFrequency, tone: Tone);
}
