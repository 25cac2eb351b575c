//! Tests for the symbol pipeline
//!
//! Covers the load/pending/service lifecycle, deadline arithmetic, and
//! the fatal preconditions on mutating a pending pipeline.

use beacon_firmware::beacon::pipeline::{service_transmission, SymbolPipeline, SymbolStep};
use beacon_firmware::config::SYMBOL_CAPACITY;
use beacon_firmware::osc::ToneOscillator;
use beacon_firmware::types::{DialFrequency, RfChannel, Tone};

const PERIOD_US: u64 = 160_000;

fn dial() -> DialFrequency {
    DialFrequency::from_hz(28_075_500).unwrap()
}

/// Oscillator double that records every command
#[derive(Default)]
struct RecordingOscillator {
    events: Vec<OscEvent>,
}

#[derive(Debug, PartialEq)]
enum OscEvent {
    Start(u8),
    Stop(u8),
    SetTone(u32, Tone),
}

impl ToneOscillator for RecordingOscillator {
    fn start(&mut self, channel: RfChannel) {
        self.events.push(OscEvent::Start(channel.index()));
    }

    fn stop(&mut self, channel: RfChannel) {
        self.events.push(OscEvent::Stop(channel.index()));
    }

    fn set_tone(&mut self, dial: DialFrequency, tone: Tone) {
        self.events.push(OscEvent::SetTone(dial.as_hz(), tone));
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn new_pipeline_is_idle() {
    let mut pipeline = SymbolPipeline::new();
    assert!(!pipeline.pending());
    assert_eq!(pipeline.loaded_count(), 0);
    assert_eq!(pipeline.service(0), SymbolStep::Idle);
}

#[test]
fn load_makes_pipeline_pending() {
    let mut pipeline = SymbolPipeline::new();
    pipeline.load(&[1, 2, 3], dial(), RfChannel::new(0), PERIOD_US, 1_000);

    assert!(pipeline.pending());
    assert_eq!(pipeline.loaded_count(), 3);
    assert_eq!(pipeline.cursor(), 0);
    assert_eq!(pipeline.dial(), Some(dial()));
}

#[test]
fn first_service_retunes_to_first_symbol() {
    let mut pipeline = SymbolPipeline::new();
    pipeline.load(&[5, 6], dial(), RfChannel::new(2), PERIOD_US, 1_000);

    assert_eq!(
        pipeline.service(1_000),
        SymbolStep::Retune {
            tone: 5,
            dial: dial(),
            channel: RfChannel::new(2),
        }
    );
    assert_eq!(pipeline.cursor(), 1);
}

#[test]
fn service_before_deadline_waits() {
    let mut pipeline = SymbolPipeline::new();
    pipeline.load(&[5, 6], dial(), RfChannel::new(0), PERIOD_US, 1_000);

    // First deadline is the load time itself
    assert_eq!(pipeline.service(0), SymbolStep::Waiting);
    assert_eq!(pipeline.service(1_000), SymbolStep::Retune {
        tone: 5,
        dial: dial(),
        channel: RfChannel::new(0),
    });

    // Second symbol not due until one period after the first
    assert_eq!(pipeline.service(1_000 + PERIOD_US - 1), SymbolStep::Waiting);
    assert!(matches!(
        pipeline.service(1_000 + PERIOD_US),
        SymbolStep::Retune { tone: 6, .. }
    ));
}

#[test]
fn full_consumption_completes_and_clears_pending() {
    let mut pipeline = SymbolPipeline::new();
    let tones = [0u8, 1, 3, 2];
    pipeline.load(&tones, dial(), RfChannel::new(0), PERIOD_US, 0);

    let mut now = 0;
    for expected in tones {
        assert!(matches!(
            pipeline.service(now),
            SymbolStep::Retune { tone, .. } if tone == expected
        ));
        assert!(pipeline.pending());
        now += PERIOD_US;
    }

    // Final symbol interval elapses, pipeline becomes non-pending
    assert_eq!(pipeline.service(now), SymbolStep::Completed);
    assert!(!pipeline.pending());
    assert_eq!(pipeline.service(now + PERIOD_US), SymbolStep::Idle);
}

#[test]
fn deadlines_advance_without_drift() {
    let mut pipeline = SymbolPipeline::new();
    pipeline.load(&[0; 10], dial(), RfChannel::new(0), PERIOD_US, 500);

    // Service calls arrive late; deadlines stay anchored to the load time
    for k in 0..10u64 {
        let late = 500 + k * PERIOD_US + PERIOD_US / 3;
        assert!(matches!(pipeline.service(late), SymbolStep::Retune { .. }));
        assert_eq!(pipeline.next_deadline_us(), Some(500 + (k + 1) * PERIOD_US));
    }
}

#[test]
fn clear_resets_idle_pipeline() {
    let mut pipeline = SymbolPipeline::new();
    pipeline.load(&[1], dial(), RfChannel::new(0), PERIOD_US, 0);
    assert!(matches!(pipeline.service(0), SymbolStep::Retune { .. }));
    assert_eq!(pipeline.service(PERIOD_US), SymbolStep::Completed);

    pipeline.clear();
    assert!(!pipeline.pending());
    assert_eq!(pipeline.loaded_count(), 0);
    assert_eq!(pipeline.dial(), None);
}

#[test]
fn pipeline_is_reusable_after_completion() {
    let mut pipeline = SymbolPipeline::new();
    pipeline.load(&[1], dial(), RfChannel::new(0), PERIOD_US, 0);
    assert!(matches!(pipeline.service(0), SymbolStep::Retune { .. }));
    assert_eq!(pipeline.service(PERIOD_US), SymbolStep::Completed);

    pipeline.load(&[7, 7], dial(), RfChannel::new(1), PERIOD_US, 2_000_000);
    assert!(pipeline.pending());
    assert_eq!(pipeline.loaded_count(), 2);
    assert_eq!(pipeline.cursor(), 0);
}

#[test]
fn capacity_sequence_loads() {
    let mut pipeline = SymbolPipeline::new();
    let tones = vec![0u8; SYMBOL_CAPACITY];
    pipeline.load(&tones, dial(), RfChannel::new(0), PERIOD_US, 0);
    assert_eq!(pipeline.loaded_count(), SYMBOL_CAPACITY);
}

// ============================================================================
// Fatal Preconditions
// ============================================================================

#[test]
#[should_panic(expected = "pipeline loaded while transmission pending")]
fn load_while_pending_is_fatal() {
    let mut pipeline = SymbolPipeline::new();
    pipeline.load(&[1, 2], dial(), RfChannel::new(0), PERIOD_US, 0);
    pipeline.load(&[3, 4], dial(), RfChannel::new(0), PERIOD_US, 0);
}

#[test]
#[should_panic(expected = "pipeline cleared while transmission pending")]
fn clear_while_pending_is_fatal() {
    let mut pipeline = SymbolPipeline::new();
    pipeline.load(&[1, 2], dial(), RfChannel::new(0), PERIOD_US, 0);
    pipeline.clear();
}

#[test]
#[should_panic(expected = "tone sequence exceeds capacity")]
fn over_capacity_load_is_fatal() {
    let mut pipeline = SymbolPipeline::new();
    let tones = vec![0u8; SYMBOL_CAPACITY + 1];
    pipeline.load(&tones, dial(), RfChannel::new(0), PERIOD_US, 0);
}

// ============================================================================
// RF-Side Glue
// ============================================================================

#[test]
fn service_transmission_drives_oscillator() {
    let mut pipeline = SymbolPipeline::new();
    let mut osc = RecordingOscillator::default();
    pipeline.load(&[2, 0, 3], dial(), RfChannel::new(0), PERIOD_US, 0);

    let mut now = 0;
    for _ in 0..3 {
        service_transmission(&mut pipeline, &mut osc, now);
        // Waiting polls in between must not retune
        service_transmission(&mut pipeline, &mut osc, now + PERIOD_US / 2);
        now += PERIOD_US;
    }
    let step = service_transmission(&mut pipeline, &mut osc, now);
    assert_eq!(step, SymbolStep::Completed);

    // Exactly one retune per symbol; no start/stop from the RF side
    assert_eq!(
        osc.events,
        [
            OscEvent::SetTone(28_075_500, 2),
            OscEvent::SetTone(28_075_500, 0),
            OscEvent::SetTone(28_075_500, 3),
        ]
    );
}
