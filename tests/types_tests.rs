//! Tests for shared domain types
//!
//! Validated newtypes, protocol parameters, the standard message format,
//! and the Maidenhead locator derivation.

use beacon_firmware::gpstime::qth_locator;
use beacon_firmware::types::{
    BeaconIdentity, BeaconProtocol, Callsign, DialFrequency, Locator, TxPower,
};

// ============================================================================
// Dial Frequency
// ============================================================================

#[test]
fn dial_frequency_accepts_in_range() {
    assert!(DialFrequency::from_hz(28_075_500).is_some());
    assert!(DialFrequency::from_hz(500_000).is_some());
    assert!(DialFrequency::from_hz(29_700_000).is_some());
}

#[test]
fn dial_frequency_rejects_out_of_range() {
    assert!(DialFrequency::from_hz(499_999).is_none());
    assert!(DialFrequency::from_hz(29_700_001).is_none());
    assert!(DialFrequency::from_hz(0).is_none());
}

#[test]
fn dial_frequency_conversions() {
    let f = DialFrequency::from_hz(28_075_500).unwrap();
    assert_eq!(f.as_hz(), 28_075_500);
    assert_eq!(f.as_khz(), 28_075);
}

#[test]
fn offset_by_shifts_within_range() {
    let f = DialFrequency::from_hz(28_075_500).unwrap();
    assert_eq!(f.offset_by(55).unwrap().as_hz(), 28_075_555);
    assert_eq!(f.offset_by(-500).unwrap().as_hz(), 28_075_000);
    assert_eq!(f.offset_by(0).unwrap(), f);
}

#[test]
fn offset_by_rejects_range_escape() {
    let low = DialFrequency::from_hz(500_000).unwrap();
    assert!(low.offset_by(-1).is_none());

    let high = DialFrequency::from_hz(29_700_000).unwrap();
    assert!(high.offset_by(1).is_none());

    // Underflow past zero
    assert!(low.offset_by(i32::MIN).is_none());
}

// ============================================================================
// Protocol Parameters
// ============================================================================

#[test]
fn wspr_protocol_parameters() {
    let p = BeaconProtocol::Wspr;
    assert_eq!(p.symbol_count(), 162);
    assert_eq!(p.symbol_period_us(), 682_667);
    assert_eq!(p.tone_count(), 4);
}

#[test]
fn ft8_protocol_parameters() {
    let p = BeaconProtocol::Ft8;
    assert_eq!(p.symbol_count(), 79);
    assert_eq!(p.symbol_period_us(), 159_000);
    assert_eq!(p.tone_count(), 8);
}

#[test]
fn default_protocol_is_ft8() {
    assert_eq!(BeaconProtocol::default(), BeaconProtocol::Ft8);
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn callsign_truncates_long_input() {
    let c = Callsign::new("VERYLONGCALLSIGN");
    assert_eq!(c.as_str(), "VERYLONGCALL");
}

#[test]
fn locator_truncates_long_input() {
    let l = Locator::new("JN58td99xx");
    assert_eq!(l.as_str(), "JN58td9");
}

#[test]
fn tx_power_clamps_to_reportable_range() {
    assert_eq!(TxPower::from_dbm(10).as_dbm(), 10);
    assert_eq!(TxPower::from_dbm(60).as_dbm(), 60);
    assert_eq!(TxPower::from_dbm(61).as_dbm(), 60);
    assert_eq!(TxPower::from_dbm(255).as_dbm(), 60);
    assert_eq!(TxPower::default().as_dbm(), 10);
}

#[test]
fn standard_message_format() {
    let identity = BeaconIdentity::new("K1ABC", "FN42", 37);
    assert_eq!(identity.standard_message().as_str(), "K1ABC FN42 37");
}

#[test]
fn identity_clamps_its_fields() {
    let identity = BeaconIdentity::new("TOOLONGCALLSIGN", "AA00bb11cc", 100);
    assert_eq!(identity.callsign().as_str(), "TOOLONGCALLS");
    assert_eq!(identity.locator().as_str(), "AA00bb1");
    assert_eq!(identity.tx_power().as_dbm(), 60);
}

// ============================================================================
// Maidenhead Locator
// ============================================================================

#[test]
fn qth_locator_known_positions() {
    // Munich
    assert_eq!(qth_locator(48.14666, 11.60833).as_str(), "JN58td");
    // W1AW, Newington CT
    assert_eq!(qth_locator(41.714775, -72.727260).as_str(), "FN31pr");
}

#[test]
fn qth_locator_grid_corners() {
    assert_eq!(qth_locator(-90.0, -180.0).as_str(), "AA00aa");
    // Top corner clamps into the last square rather than overflowing
    assert_eq!(qth_locator(89.99, 179.99).as_str(), "RR99xx");
    assert_eq!(qth_locator(90.0, 180.0).as_str(), "RR99xx");
}

#[test]
fn qth_locator_equator_prime_meridian() {
    assert_eq!(qth_locator(0.0, 0.0).as_str(), "JJ00aa");
}
