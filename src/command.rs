//! Serial Command Surface
//!
//! Single-letter control commands over a byte stream, terminated by `;`.
//! The parser only produces commands; acting on them (encode + load +
//! start for a forced transmission) happens in the control context, where
//! the pipeline's pending precondition still applies.
//!
//! Commands:
//! - `M<text>;` inject a free-text message
//! - `O<±hz>;`  set the carrier frequency offset
//! - `T;`       force an immediate transmission
//! - `D;`       dump diagnostics

use heapless::{String, Vec};

use crate::config::{COMMAND_BUFFER_SIZE, MESSAGE_MAX_LEN};

/// Command parser over a serial byte stream
pub struct CommandParser {
    /// Command buffer
    buffer: Vec<u8, COMMAND_BUFFER_SIZE>,
}

impl CommandParser {
    /// Create a new command parser
    #[must_use]
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Feed a byte to the parser
    ///
    /// Returns a command when one is complete.
    pub fn feed(&mut self, byte: u8) -> Option<BeaconCommand> {
        // Commands end with ';'
        if byte == b';' {
            let cmd = self.parse_buffer();
            self.buffer.clear();
            cmd
        } else if byte == b'\r' || byte == b'\n' {
            // Ignore line endings
            None
        } else {
            let _ = self.buffer.push(byte);

            // Prevent overflow
            if self.buffer.len() >= COMMAND_BUFFER_SIZE {
                self.buffer.clear();
            }

            None
        }
    }

    /// Parse the current buffer as a command
    fn parse_buffer(&self) -> Option<BeaconCommand> {
        let cmd = core::str::from_utf8(&self.buffer).ok()?;
        let mut chars = cmd.chars();
        let letter = chars.next()?;
        let rest = chars.as_str();

        match letter {
            'M' | 'm' => Some(BeaconCommand::SetMessage(bounded_message(rest))),
            'O' | 'o' => {
                let hz: i32 = rest.parse().ok()?;
                Some(BeaconCommand::SetFrequencyOffset(hz))
            }
            'T' | 't' if rest.is_empty() => Some(BeaconCommand::ForceTransmit),
            'D' | 'd' if rest.is_empty() => Some(BeaconCommand::DumpDiagnostics),
            _ => Some(BeaconCommand::Unknown(letter)),
        }
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

fn bounded_message(text: &str) -> String<MESSAGE_MAX_LEN> {
    let mut msg = String::new();
    for c in text.chars().take(MESSAGE_MAX_LEN) {
        if msg.push(c).is_err() {
            break;
        }
    }
    msg
}

/// Control command parsed from serial input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BeaconCommand {
    /// Replace the beacon message with free text
    SetMessage(String<MESSAGE_MAX_LEN>),
    /// Set the carrier frequency offset in Hz
    SetFrequencyOffset(i32),
    /// Force an immediate transmission outside the slot schedule
    ForceTransmit,
    /// Dump scheduler/pipeline/time-oracle diagnostics
    DumpDiagnostics,
    /// Unrecognized command letter
    Unknown(char),
}

#[cfg(feature = "embedded")]
impl defmt::Format for BeaconCommand {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::SetMessage(msg) => defmt::write!(f, "SetMessage({})", msg.as_str()),
            Self::SetFrequencyOffset(hz) => defmt::write!(f, "SetOffset({})", hz),
            Self::ForceTransmit => defmt::write!(f, "ForceTransmit"),
            Self::DumpDiagnostics => defmt::write!(f, "DumpDiagnostics"),
            Self::Unknown(c) => defmt::write!(f, "Unknown({})", c),
        }
    }
}
