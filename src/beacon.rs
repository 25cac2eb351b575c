//! Beacon Core
//!
//! Slot scheduling, the symbol-delivery pipeline, the encoder seam, and
//! the control-loop orchestrator that ties them together.

pub mod context;
pub mod encoder;
pub mod pipeline;
pub mod scheduler;

pub use context::{BeaconContext, BeaconDiagnostics, TickOutcome};
pub use encoder::{encode_with_fallback, EncodeError, MessageEncoder, Packing, ToneSequence};
pub use pipeline::{service_transmission, SymbolPipeline, SymbolStep};
pub use scheduler::{ScheduleConfig, SlotAction, SlotScheduler};
