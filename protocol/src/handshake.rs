//! The one-time handshake: ephemeral X25519 key agreement plus a time-base
//! exchange, run once over the serial link before the event loop starts.
//!
//! A is fixed as the initiator ("send first"), B as the responder ("receive
//! first"). The result on both sides is a [`Session`] holding the derived
//! symmetric key and the shared base time; this replaces any notion of a
//! lazily-initialized global, since the whole pipeline is built to receive
//! this value explicitly once the handshake completes.

use std::io::{Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use keyveil_crypto::handshake::{EphemeralKeypair, SharedSecret};

use crate::errors::Result;
use crate::frame::{decode_base_time, decode_public_key, encode_base_time, encode_public_key};
use crate::transport::{read_frame, write_frame};

/// The shared state produced once by the handshake and threaded through the
/// rotation clock, scrambler, and unscrambler for the rest of the process.
pub struct Session {
    pub key: SharedSecret,
    pub base_time: i64,
}

/// Run the initiator side (A) of the handshake over `stream`.
///
/// A generates its own base time from the wall clock at the moment the
/// exchange completes and sends it to B; B does not send anything back on
/// this frame.
pub fn perform_initiator<S: Read + Write>(stream: &mut S) -> Result<Session> {
    let keypair = EphemeralKeypair::generate();
    write_frame(stream, &encode_public_key(keypair.public_key().as_bytes()))?;

    let peer_payload = read_frame(stream)?;
    let peer_public = decode_public_key(&peer_payload)?;
    let shared = keypair.diffie_hellman(&peer_public.into())?;

    let base_time = now_unix_seconds();
    write_frame(stream, &encode_base_time(base_time))?;

    Ok(Session {
        key: shared,
        base_time,
    })
}

/// Run the responder side (B) of the handshake over `stream`.
///
/// Setting the local system clock from the received base time is a
/// device-level concern (it requires elevated privileges and is
/// best-effort); it is left to the caller, which receives `base_time` here
/// and decides what to do with it.
pub fn perform_responder<S: Read + Write>(stream: &mut S) -> Result<Session> {
    let keypair = EphemeralKeypair::generate();

    let peer_payload = read_frame(stream)?;
    let peer_public = decode_public_key(&peer_payload)?;

    write_frame(stream, &encode_public_key(keypair.public_key().as_bytes()))?;
    let shared = keypair.diffie_hellman(&peer_public.into())?;

    let base_time_payload = read_frame(stream)?;
    let base_time = decode_base_time(&base_time_payload)?;

    Ok(Session {
        key: shared,
        base_time,
    })
}

fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs() as i64
}
