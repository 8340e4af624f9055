//! APRS packet audio encoder
//!
//! Builds AX.25 UI frames and encodes them as Bell 202 AFSK audio. Every stage
//! is a lazy iterator: bits -> FCS -> stuffing -> flags/NRZI -> samples.

pub mod error;
pub mod bits;
pub mod callsign;
pub mod frame;
pub mod fcs;
pub mod stuffing;
pub mod framing;
pub mod modulator;
pub mod encoder;

pub use callsign::Callsign;
pub use encoder::Encoder;
pub use error::{AprsError, Result};
pub use frame::{Frame, FrameKind};
pub use modulator::AfskConfig;

// Bell 202 physical layer
pub const MARK_HZ: f64 = 1200.0;
pub const SPACE_HZ: f64 = 2200.0;
pub const BAUD_RATE: f64 = 1200.0;
pub const SAMPLE_RATE: u32 = 44100;

// Output shaping
pub const AMPLITUDE: f32 = 0.5; // headroom for other tones/noise
pub const SILENCE_SECS: f64 = 1.05; // device startup/output latency

// AX.25 framing
pub const FLAG: u8 = 0x7E;
pub const PREAMBLE_ZERO_BYTES: usize = 20;
pub const PREAMBLE_FLAGS: usize = 100;

/// Default destination for APRS traffic
pub const APRS_DESTINATION: &str = "APRS";
/// Default digipeater path
pub const DEFAULT_PATH: &str = "WIDE1-1,WIDE2-1";
