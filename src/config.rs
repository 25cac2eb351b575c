//! System configuration and protocol constants
//!
//! This module defines compile-time constants for the beacon firmware.
//! Protocol timing, schedule defaults, and pin mappings are centralized here.

/// Seconds in one hour, the period over which slot indices repeat
pub const SECONDS_PER_HOUR: u32 = 3600;

/// Seconds in one WSPR transmission slot (2-minute UTC-aligned windows)
pub const SECONDS_PER_SLOT: u32 = 120;

/// WSPR symbol count (4-FSK, 110.6 s transmission)
pub const WSPR_SYMBOL_COUNT: usize = 162;

/// WSPR symbol period in microseconds (8192/12000 s keying rate)
pub const WSPR_SYMBOL_PERIOD_US: u64 = 682_667;

/// FT8 symbol count (8-FSK, 12.6 s transmission)
pub const FT8_SYMBOL_COUNT: usize = 79;

/// FT8 symbol period in microseconds
///
/// 1 ms under the nominal 1920/12000 s keying rate, keeping the full
/// 79-symbol transmission inside its 15 s window with margin for retune
/// latency.
pub const FT8_SYMBOL_PERIOD_US: u64 = 159_000;

/// Symbol pipeline capacity; sized for the longest supported protocol
pub const SYMBOL_CAPACITY: usize = WSPR_SYMBOL_COUNT;

/// Default staleness limit for a lapsed GPS solution, in seconds
///
/// A fix older than this is treated as no time source even when stale
/// fallback is enabled. Ten minutes keeps worst-case crystal drift well
/// inside a slot boundary; override via `ScheduleConfig`.
pub const DEFAULT_STALENESS_LIMIT_S: u32 = 600;

/// Default slot skip: transmit in one of every N eligible slots
pub const DEFAULT_SLOT_SKIP: u8 = 5;

/// Default dial frequency (10m WSPR/FT8 passband)
pub const DEFAULT_DIAL_FREQUENCY_HZ: u32 = 28_075_500;

/// Default carrier shift relative to the dial frequency, in Hz
pub const DEFAULT_CARRIER_SHIFT_HZ: i32 = 55;

/// Lowest dial frequency the output stage can synthesize cleanly
pub const MIN_DIAL_FREQUENCY_HZ: u32 = 500_000;

/// Highest supported dial frequency (top of 10m band)
pub const MAX_DIAL_FREQUENCY_HZ: u32 = 29_700_000;

/// Maximum callsign length in characters
pub const CALLSIGN_MAX_LEN: usize = 12;

/// Maximum Maidenhead locator length in characters
pub const LOCATOR_MAX_LEN: usize = 7;

/// Maximum beacon message length in characters
pub const MESSAGE_MAX_LEN: usize = 32;

/// Maximum free-text message length the raw packing path accepts
pub const FREE_TEXT_MAX_LEN: usize = 13;

/// Serial command buffer size in bytes
pub const COMMAND_BUFFER_SIZE: usize = 48;

/// Control context poll interval in milliseconds
pub const CONTROL_POLL_INTERVAL_MS: u64 = 100;

/// RF context service interval in microseconds
///
/// Must stay a small fraction of the shortest symbol period.
pub const RF_SERVICE_INTERVAL_US: u64 = 4_000;

/// Watchdog timeout in microseconds
pub const WATCHDOG_TIMEOUT_US: u32 = 8_000_000;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// Digitally synthesized RF output
    pub const RF_OUT: &str = "PA8";

    /// GPS receiver UART RX
    pub const GPS_RX: &str = "PA10";

    /// GPS PPS input
    pub const GPS_PPS: &str = "PB0";

    /// Serial control channel RX
    pub const CMD_RX: &str = "PA3";

    /// Serial control channel TX
    pub const CMD_TX: &str = "PA2";
}
