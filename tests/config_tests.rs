//! Configuration and constants tests
//!
//! Verifies protocol timing, schedule defaults, and the pin map are
//! valid and mutually consistent.

use beacon_firmware::config::*;
use beacon_firmware::types::DialFrequency;

// ============================================================================
// Protocol Timing
// ============================================================================

#[test]
fn wspr_timing() {
    assert_eq!(WSPR_SYMBOL_COUNT, 162);
    assert_eq!(WSPR_SYMBOL_PERIOD_US, 682_667);
}

#[test]
fn ft8_timing() {
    assert_eq!(FT8_SYMBOL_COUNT, 79);
    assert_eq!(FT8_SYMBOL_PERIOD_US, 159_000);
}

#[test]
fn wspr_transmission_fits_its_slot() {
    let tx_us = WSPR_SYMBOL_COUNT as u64 * WSPR_SYMBOL_PERIOD_US;
    assert!(tx_us < u64::from(SECONDS_PER_SLOT) * 1_000_000);
}

#[test]
fn ft8_transmission_fits_its_window() {
    // FT8 cycles are 15 s
    let tx_us = FT8_SYMBOL_COUNT as u64 * FT8_SYMBOL_PERIOD_US;
    assert!(tx_us < 15_000_000);
}

#[test]
fn pipeline_capacity_covers_both_protocols() {
    assert!(SYMBOL_CAPACITY >= WSPR_SYMBOL_COUNT);
    assert!(SYMBOL_CAPACITY >= FT8_SYMBOL_COUNT);
}

#[test]
fn slot_arithmetic_consistent() {
    // Slots must tile the hour exactly
    assert_eq!(SECONDS_PER_HOUR % SECONDS_PER_SLOT, 0);
}

// ============================================================================
// Service Cadences
// ============================================================================

#[test]
fn rf_service_interval_is_a_small_fraction_of_the_symbol_period() {
    assert!(RF_SERVICE_INTERVAL_US * 10 <= FT8_SYMBOL_PERIOD_US);
    assert!(RF_SERVICE_INTERVAL_US * 10 <= WSPR_SYMBOL_PERIOD_US);
}

#[test]
fn watchdog_window_covers_the_control_poll() {
    assert!(u64::from(WATCHDOG_TIMEOUT_US) > CONTROL_POLL_INTERVAL_MS * 1_000);
}

// ============================================================================
// Frequency Defaults
// ============================================================================

#[test]
fn default_dial_is_in_range() {
    let dial = DialFrequency::from_hz(DEFAULT_DIAL_FREQUENCY_HZ);
    assert!(dial.is_some());
}

#[test]
fn default_carrier_shift_is_applicable() {
    let dial = DialFrequency::from_hz(DEFAULT_DIAL_FREQUENCY_HZ).unwrap();
    assert!(dial.offset_by(DEFAULT_CARRIER_SHIFT_HZ).is_some());
}

// ============================================================================
// Buffer Bounds
// ============================================================================

#[test]
fn free_text_fits_the_message_buffer() {
    assert!(FREE_TEXT_MAX_LEN <= MESSAGE_MAX_LEN);
}

#[test]
fn standard_message_fits_the_message_buffer() {
    // "CALL LOC PWR" worst case: callsign + locator + 2 spaces + 2 digits
    assert!(CALLSIGN_MAX_LEN + LOCATOR_MAX_LEN + 4 <= MESSAGE_MAX_LEN);
}

// ============================================================================
// Pin Map
// ============================================================================

// The entry point wires peripherals by these names; keep the map in step
// with the `p.PAx` usage in src/main.rs.

#[test]
fn status_led_pin() {
    assert_eq!(pins::LED_STATUS, "PA5");
}

#[test]
fn rf_output_pin() {
    assert_eq!(pins::RF_OUT, "PA8");
}

#[test]
fn command_uart_pins() {
    // USART2 on PA2/PA3
    assert_eq!(pins::CMD_RX, "PA3");
    assert_eq!(pins::CMD_TX, "PA2");
}

#[test]
fn gps_pins_defined() {
    assert!(!pins::GPS_RX.is_empty());
    assert!(!pins::GPS_PPS.is_empty());
}
