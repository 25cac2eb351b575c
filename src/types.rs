//! Shared types used across the beacon firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

use heapless::String;

use crate::config::{
    CALLSIGN_MAX_LEN, FT8_SYMBOL_COUNT, FT8_SYMBOL_PERIOD_US, LOCATOR_MAX_LEN,
    MAX_DIAL_FREQUENCY_HZ, MESSAGE_MAX_LEN, MIN_DIAL_FREQUENCY_HZ, WSPR_SYMBOL_COUNT,
    WSPR_SYMBOL_PERIOD_US,
};

/// One tone index of an encoded transmission
pub type Tone = u8;

/// Dial frequency in Hertz with validation
///
/// The base/reference frequency of the protocol passband, to which a
/// small per-symbol modulation shift is added by the oscillator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DialFrequency(u32);

impl DialFrequency {
    /// Create a new dial frequency from Hz, returns None if out of range
    #[must_use]
    pub const fn from_hz(hz: u32) -> Option<Self> {
        if hz >= MIN_DIAL_FREQUENCY_HZ && hz <= MAX_DIAL_FREQUENCY_HZ {
            Some(Self(hz))
        } else {
            None
        }
    }

    /// Get the frequency in Hz
    #[must_use]
    pub const fn as_hz(self) -> u32 {
        self.0
    }

    /// Get the frequency in kHz (truncated)
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.0 / 1000
    }

    /// Apply a signed carrier shift, returns None if the result leaves
    /// the supported range
    #[must_use]
    pub fn offset_by(self, shift_hz: i32) -> Option<Self> {
        let hz = i64::from(self.0) + i64::from(shift_hz);
        let hz = u32::try_from(hz).ok()?;
        Self::from_hz(hz)
    }
}

impl fmt::Debug for DialFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DialFrequency({} Hz)", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DialFrequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} Hz", self.0);
    }
}

/// RF output channel (synthesized output pin index)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RfChannel(u8);

impl RfChannel {
    /// Create a channel from its output pin index
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the output pin index
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RfChannel {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "RF{}", self.0);
    }
}

/// Beacon transmission protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BeaconProtocol {
    /// WSPR: 162 symbols, 4-FSK, 110.6 s transmission
    Wspr,
    /// FT8: 79 symbols, 8-FSK, 12.6 s transmission
    #[default]
    Ft8,
}

impl BeaconProtocol {
    /// Number of tone symbols in one transmission
    #[must_use]
    pub const fn symbol_count(self) -> usize {
        match self {
            Self::Wspr => WSPR_SYMBOL_COUNT,
            Self::Ft8 => FT8_SYMBOL_COUNT,
        }
    }

    /// Duration of one symbol interval in microseconds
    #[must_use]
    pub const fn symbol_period_us(self) -> u64 {
        match self {
            Self::Wspr => WSPR_SYMBOL_PERIOD_US,
            Self::Ft8 => FT8_SYMBOL_PERIOD_US,
        }
    }

    /// Number of distinct tones in the FSK alphabet
    #[must_use]
    pub const fn tone_count(self) -> u8 {
        match self {
            Self::Wspr => 4,
            Self::Ft8 => 8,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BeaconProtocol {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Wspr => defmt::write!(f, "WSPR"),
            Self::Ft8 => defmt::write!(f, "FT8"),
        }
    }
}

/// HAM radio callsign, bounded to 12 characters
///
/// Longer input is truncated on construction; the stored value is
/// immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Callsign(String<CALLSIGN_MAX_LEN>);

impl Callsign {
    /// Create a callsign, truncating input beyond 12 characters
    #[must_use]
    pub fn new(callsign: &str) -> Self {
        let mut s = String::new();
        for c in callsign.chars().take(CALLSIGN_MAX_LEN) {
            if s.push(c).is_err() {
                break;
            }
        }
        Self(s)
    }

    /// Get the callsign as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Callsign {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.0.as_str());
    }
}

/// Maidenhead grid locator, bounded to 7 characters
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Locator(String<LOCATOR_MAX_LEN>);

impl Locator {
    /// Create a locator, truncating input beyond 7 characters
    #[must_use]
    pub fn new(locator: &str) -> Self {
        let mut s = String::new();
        for c in locator.chars().take(LOCATOR_MAX_LEN) {
            if s.push(c).is_err() {
                break;
            }
        }
        Self(s)
    }

    /// Get the locator as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Locator {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.0.as_str());
    }
}

/// Transmit power report in dBm
///
/// WSPR reports power in whole dBm between 0 and 60; values outside
/// that range are clamped on construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TxPower(u8);

impl TxPower {
    /// Maximum reportable power (60 dBm = 1 kW)
    pub const MAX_DBM: u8 = 60;

    /// Create a power report, clamping to the reportable range
    #[must_use]
    pub const fn from_dbm(dbm: u8) -> Self {
        if dbm > Self::MAX_DBM {
            Self(Self::MAX_DBM)
        } else {
            Self(dbm)
        }
    }

    /// Get the power in dBm
    #[must_use]
    pub const fn as_dbm(self) -> u8 {
        self.0
    }
}

impl Default for TxPower {
    fn default() -> Self {
        Self(10) // 10 mW class beacon
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TxPower {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} dBm", self.0);
    }
}

/// Station identity carried in every structured beacon message
///
/// Immutable after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeaconIdentity {
    callsign: Callsign,
    locator: Locator,
    tx_power: TxPower,
}

impl BeaconIdentity {
    /// Create a new identity
    #[must_use]
    pub fn new(callsign: &str, locator: &str, tx_power_dbm: u8) -> Self {
        Self {
            callsign: Callsign::new(callsign),
            locator: Locator::new(locator),
            tx_power: TxPower::from_dbm(tx_power_dbm),
        }
    }

    /// Get the callsign
    #[must_use]
    pub const fn callsign(&self) -> &Callsign {
        &self.callsign
    }

    /// Get the grid locator
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Get the reported transmit power
    #[must_use]
    pub const fn tx_power(&self) -> TxPower {
        self.tx_power
    }

    /// Build the standard structured message `CALL LOC PWR`
    #[must_use]
    pub fn standard_message(&self) -> String<MESSAGE_MAX_LEN> {
        let mut msg = String::new();
        let _ = core::fmt::write(
            &mut msg,
            format_args!(
                "{} {} {}",
                self.callsign.as_str(),
                self.locator.as_str(),
                self.tx_power.as_dbm()
            ),
        );
        msg
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BeaconIdentity {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} {} {}", self.callsign, self.locator, self.tx_power);
    }
}
