#![forbid(unsafe_code)]

//! Frame transport, handshake, rotation clock, and the scrambler/unscrambler
//! pair that together implement the rotating-substitution keystroke
//! pipeline. Device I/O (keyboard capture, HID gadget, virtual keyboard) is
//! behind the traits in [`device`]; concrete implementations live in the
//! `sender` and `endpoint` binaries.

pub mod clock;
pub mod device;
pub mod errors;
pub mod frame;
pub mod handshake;
pub mod keycodes;
pub mod keystroke;
pub mod scrambler;
pub mod transport;
pub mod unscrambler;

pub use clock::RotationClock;
pub use errors::{Error, Result};
pub use handshake::Session;
pub use scrambler::Scrambler;
pub use unscrambler::Unscrambler;
