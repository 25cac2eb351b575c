//! WSPR/FT8 Beacon Firmware Library
//!
//! This library provides the core functionality for a GPS-disciplined
//! WSPR/FT8 beacon transmitter. The RF carrier is synthesized digitally
//! on an MCU output pin; no external frequency synthesizer is required.
//! An external GPS receiver is optional and serves to hold the WSPR time
//! window alignment.
//!
//! # Architecture
//!
//! Two execution contexts cooperate:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CONTROL CONTEXT                           │
//! │  Slot Scheduler │ Packet Encoder │ Command Surface           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    SYMBOL PIPELINE                           │
//! │        one-shot producer/consumer tone handoff               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      RF CONTEXT                              │
//! │  per-symbol oscillator retune at a fixed cadence             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flows one direction per cycle: time oracle → slot scheduler →
//! packet encoder → symbol pipeline → RF context → radiated signal.
//! The scheduler also gates oscillator start/stop.
//!
//! # Design Principles
//!
//! - **Type-driven design**: Custom types enforce invariants at compile time
//! - **No unsafe in application code**: All unsafe isolated in HAL layers
//! - **Explicit error handling**: Steady states are enum variants, caller
//!   misuse is a fatal assertion, never a silent overwrite
//! - **Bounded memory**: No allocator; all buffers are fixed capacity

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Beacon Core
///
/// Slot scheduling, symbol pipeline, encoder seam, and orchestration.
pub mod beacon;

/// Serial Command Surface
///
/// Single-letter command parser for the control channel.
pub mod command;

/// GPS Time Oracle Adapter
///
/// Time solution snapshot semantics and Maidenhead derivation.
pub mod gpstime;

/// Oscillator Control Seam
///
/// Start/stop/retune contract consumed by both contexts.
pub mod osc;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
