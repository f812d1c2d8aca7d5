//! Packet codec for tokio.
//!
//! Frames are a varuint32 byte length followed by the packet id and body.
//! [`PacketCodec`] turns a byte stream into [`Packet`] values and back.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::encode::WriteExt;
use crate::error::{ProtocolError, Result};
use crate::packet::Packet;

/// Default maximum frame length (2 MiB).
pub const DEFAULT_MAX_FRAME_LEN: usize = 2 * 1024 * 1024;

/// Tokio codec for encoding/decoding length-prefixed [`Packet`] frames.
#[derive(Debug, Clone)]
pub struct PacketCodec {
    max_len: usize,
}

impl PacketCodec {
    /// Create a codec with the default frame limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_FRAME_LEN)
    }

    /// Create a codec with a custom frame limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Peek the frame length prefix without consuming it.
    ///
    /// Returns the prefix width and the declared length, or `None` if the
    /// prefix itself is still incomplete.
    fn peek_len(src: &[u8]) -> Result<Option<(usize, usize)>> {
        let mut len: u32 = 0;
        for (i, b) in src.iter().take(5).enumerate() {
            len |= u32::from(b & 0x7f) << (7 * i);
            if b & 0x80 == 0 {
                return Ok(Some((i + 1, len as usize)));
            }
        }
        if src.len() >= 5 {
            return Err(ProtocolError::VarIntOverflow { bits: 32 });
        }
        Ok(None)
    }
}

impl Default for PacketCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        let Some((prefix, len)) = Self::peek_len(src)? else {
            return Ok(None);
        };
        if len > self.max_len {
            return Err(ProtocolError::FrameTooLong {
                actual: len,
                limit: self.max_len,
            });
        }
        if src.len() < prefix + len {
            src.reserve(prefix + len - src.len());
            return Ok(None);
        }

        src.advance(prefix);
        let frame = src.split_to(len).freeze();
        Packet::decode(frame).map(Some)
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = ProtocolError;

    fn encode(&mut self, pk: Packet, dst: &mut BytesMut) -> Result<()> {
        let mut body = BytesMut::new();
        pk.encode(&mut body);
        if body.len() > self.max_len {
            return Err(ProtocolError::FrameTooLong {
                actual: body.len(),
                limit: self.max_len,
            });
        }
        dst.reserve(body.len() + 5);
        dst.put_varuint32(body.len() as u32);
        dst.extend_from_slice(&body);
        Ok(())
    }
}
