//! Wire codec seam
//!
//! The on-wire format belongs to the transport layer; the core only needs
//! "body in, bytes out". The postcard implementation is the default the
//! cluster ships with and what the test suite decodes against.

use crate::event::{EventBody, EventHeader};

/// Encodes an event body for IPC and network emission. An empty return
/// signals an encode failure; the dispatcher never sends empty payloads.
pub trait EventCodec {
    fn encode(&self, header: &EventHeader, body: &EventBody) -> Vec<u8>;
}

/// postcard-backed codec: varint-framed, no self-describing overhead.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostcardCodec;

impl EventCodec for PostcardCodec {
    fn encode(&self, _header: &EventHeader, body: &EventBody) -> Vec<u8> {
        postcard::to_allocvec(body).unwrap_or_default()
    }
}

/// Decode a payload produced by [`PostcardCodec`].
pub fn decode_body(payload: &[u8]) -> Result<EventBody, postcard::Error> {
    postcard::from_bytes(payload)
}
