#![forbid(unsafe_code)]

//! Cryptographic core of `keyveil`: the ephemeral key exchange run once at
//! pairing time, the per-rotation seed derivation, and the rotating
//! substitution alphabets built from that seed.
//!
//! There is no AEAD here and no record cipher. The wire bytes between the two
//! peers are never encrypted; what rotates is the mapping from plaintext
//! characters to the characters actually typed on the wire, which is the
//! threat model this crate is built around (see the design document).

pub mod alphabet;
pub mod handshake;
pub mod kdf;
pub mod keymap;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("handshake failed: {0}")]
    Handshake(String),
    #[error("key derivation failed: {0}")]
    Kdf(String),
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

pub use handshake::{EphemeralKeypair, SharedSecret};
pub use keymap::{Permutation, PermutationCache};
