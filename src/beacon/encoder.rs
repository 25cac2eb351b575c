//! Packet Encoder Seam
//!
//! The WSPR/FT8 bit-level codec lives outside this crate. The beacon core
//! consumes it through the [`MessageEncoder`] trait and applies one policy
//! of its own: when structured encoding rejects a message, degrade to the
//! raw free-text packing path for messages of 13 characters or less,
//! otherwise skip the cycle and report the failure.

use heapless::Vec;

use crate::config::{FREE_TEXT_MAX_LEN, SYMBOL_CAPACITY};
use crate::types::Tone;

/// Encoded tone sequence, bounded by the pipeline capacity
pub type ToneSequence = Vec<Tone, SYMBOL_CAPACITY>;

/// Encoder rejection reasons
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// Message exceeds what structured or free-text packing can carry
    MessageTooLong,
    /// Message cannot be parsed into any packing
    Unparseable,
}

#[cfg(feature = "embedded")]
impl defmt::Format for EncodeError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::MessageTooLong => defmt::write!(f, "MessageTooLong"),
            Self::Unparseable => defmt::write!(f, "Unparseable"),
        }
    }
}

/// How a message was packed into the transmission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Packing {
    /// Standard structured message encoding
    Structured,
    /// Raw free-text packing (13 characters or less)
    FreeText,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Packing {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Structured => defmt::write!(f, "Structured"),
            Self::FreeText => defmt::write!(f, "FreeText"),
        }
    }
}

/// Bit-level message encoder (consumed interface)
pub trait MessageEncoder {
    /// Encode a standard structured message into a tone sequence
    ///
    /// On success the sequence holds exactly the protocol's symbol count.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when the message does not fit the
    /// structured format.
    fn encode_structured(
        &mut self,
        message: &str,
        tones: &mut ToneSequence,
    ) -> Result<(), EncodeError>;

    /// Pack raw free text (13 characters or less) into a tone sequence
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when the text cannot be packed.
    fn encode_free_text(
        &mut self,
        message: &str,
        tones: &mut ToneSequence,
    ) -> Result<(), EncodeError>;
}

/// Encode a message, degrading to free-text packing when possible
///
/// Tries structured encoding first. On rejection, messages of 13
/// characters or less fall back to the raw free-text path; longer
/// messages propagate the structured error.
///
/// # Errors
///
/// Returns the structured-encoding error when no fallback applies, or
/// the free-text error when the fallback itself fails.
pub fn encode_with_fallback<E: MessageEncoder>(
    encoder: &mut E,
    message: &str,
    tones: &mut ToneSequence,
) -> Result<Packing, EncodeError> {
    match encoder.encode_structured(message, tones) {
        Ok(()) => Ok(Packing::Structured),
        Err(err) => {
            if message.chars().count() > FREE_TEXT_MAX_LEN {
                return Err(err);
            }
            tones.clear();
            encoder.encode_free_text(message, tones)?;
            Ok(Packing::FreeText)
        }
    }
}
