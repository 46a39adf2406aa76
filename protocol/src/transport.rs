//! Length-prefixed framing over the handshake's serial link.
//!
//! A 4-byte big-endian length `n` followed by exactly `n` payload bytes.
//! Used only for the three handshake messages; the keystroke stream itself
//! runs over the separate HID channel (see [`crate::device`]).

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use crate::errors::{Error, Result};

/// Safety cap on a single handshake frame's payload. The largest real payload
/// is a 32-byte public key; this leaves generous room without allowing a
/// confused or hostile peer to force an unbounded allocation.
pub const MAX_FRAME_LEN: usize = 4096;

/// Write `payload` as one length-prefixed frame.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_FRAME_LEN {
        return Err(Error::link_broken("outgoing frame exceeds safety cap"));
    }
    let mut buf = BytesMut::with_capacity(4 + payload.len());
    buf.put_u32(payload.len() as u32);
    buf.extend_from_slice(payload);
    writer.write_all(&buf).map_err(Error::Io)
}

/// Read exactly one length-prefixed frame. A short read anywhere in the
/// header or body is reported as a broken link rather than an I/O error,
/// since on this transport there is no partial-frame retry: the caller
/// reconnects and re-handshakes.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; 4];
    reader
        .read_exact(&mut header)
        .map_err(|_| Error::link_broken("truncated frame header"))?;
    let len = (&header[..]).get_u32() as usize;
    if len > MAX_FRAME_LEN {
        return Err(Error::link_broken("incoming frame exceeds safety cap"));
    }
    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .map_err(|_| Error::link_broken("truncated frame payload"))?;
    Ok(payload)
}
