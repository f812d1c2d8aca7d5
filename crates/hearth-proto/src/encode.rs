//! Primitive field encoding shared by every packet.
//!
//! Integers that the protocol sends as varints use LEB128; signed varints are
//! zig-zag encoded first. Strings are a varuint32 byte length followed by UTF-8.
//! [`WriteExt`] is implemented for every [`BufMut`] and [`ReadExt`] for every
//! [`Buf`], so packets encode straight into a `BytesMut` and decode from `Bytes`.

use bytes::{Buf, BufMut};
use uuid::Uuid;

use crate::error::{ProtocolError, Result};
use crate::packet::Vec3;

/// Writing helpers for protocol primitives.
pub trait WriteExt: BufMut {
    /// Write an unsigned LEB128 varint of at most 32 bits.
    fn put_varuint32(&mut self, mut v: u32) {
        while v >= 0x80 {
            self.put_u8((v as u8) | 0x80);
            v >>= 7;
        }
        self.put_u8(v as u8);
    }

    /// Write a zig-zag encoded signed varint of at most 32 bits.
    fn put_varint32(&mut self, v: i32) {
        self.put_varuint32(((v << 1) ^ (v >> 31)) as u32);
    }

    /// Write an unsigned LEB128 varint of at most 64 bits.
    fn put_varuint64(&mut self, mut v: u64) {
        while v >= 0x80 {
            self.put_u8((v as u8) | 0x80);
            v >>= 7;
        }
        self.put_u8(v as u8);
    }

    /// Write a zig-zag encoded signed varint of at most 64 bits.
    fn put_varint64(&mut self, v: i64) {
        self.put_varuint64(((v << 1) ^ (v >> 63)) as u64);
    }

    /// Write a length-prefixed UTF-8 string.
    fn put_string(&mut self, s: &str) {
        self.put_varuint32(s.len() as u32);
        self.put_slice(s.as_bytes());
    }

    /// Write a boolean as a single byte.
    fn put_bool(&mut self, b: bool) {
        self.put_u8(u8::from(b));
    }

    /// Write a UUID as its 16 raw bytes.
    fn put_uuid(&mut self, id: &Uuid) {
        self.put_slice(id.as_bytes());
    }

    /// Write three little-endian f32 components.
    fn put_vec3(&mut self, v: Vec3) {
        self.put_f32_le(v.x);
        self.put_f32_le(v.y);
        self.put_f32_le(v.z);
    }

    /// Write a varuint32 count followed by each string.
    fn put_string_slice(&mut self, values: &[String]) {
        self.put_varuint32(values.len() as u32);
        for v in values {
            self.put_string(v);
        }
    }
}

impl<B: BufMut + ?Sized> WriteExt for B {}

/// Reading helpers for protocol primitives.
///
/// Every method checks the remaining length first, so a truncated payload is
/// reported as [`ProtocolError::UnexpectedEof`] instead of panicking.
pub trait ReadExt: Buf {
    /// Fail unless at least `needed` bytes remain.
    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(ProtocolError::UnexpectedEof {
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read a single byte.
    fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.get_u8())
    }

    /// Read a boolean byte; any non-zero value is `true`.
    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read a little-endian u16.
    fn read_u16_le(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.get_u16_le())
    }

    /// Read a little-endian u32.
    fn read_u32_le(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.get_u32_le())
    }

    /// Read a little-endian i32.
    fn read_i32_le(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.get_i32_le())
    }

    /// Read a big-endian i32.
    fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.get_i32())
    }

    /// Read a little-endian f32.
    fn read_f32_le(&mut self) -> Result<f32> {
        self.ensure(4)?;
        Ok(self.get_f32_le())
    }

    /// Read an unsigned LEB128 varint of at most 32 bits.
    fn read_varuint32(&mut self) -> Result<u32> {
        let mut v: u32 = 0;
        for shift in (0..35).step_by(7) {
            let b = self.read_u8()?;
            v |= u32::from(b & 0x7f) << shift;
            if b & 0x80 == 0 {
                return Ok(v);
            }
        }
        Err(ProtocolError::VarIntOverflow { bits: 32 })
    }

    /// Read a zig-zag encoded signed varint of at most 32 bits.
    fn read_varint32(&mut self) -> Result<i32> {
        let ux = self.read_varuint32()?;
        Ok(((ux >> 1) as i32) ^ -((ux & 1) as i32))
    }

    /// Read an unsigned LEB128 varint of at most 64 bits.
    fn read_varuint64(&mut self) -> Result<u64> {
        let mut v: u64 = 0;
        for shift in (0..70).step_by(7) {
            let b = self.read_u8()?;
            v |= u64::from(b & 0x7f) << shift;
            if b & 0x80 == 0 {
                return Ok(v);
            }
        }
        Err(ProtocolError::VarIntOverflow { bits: 64 })
    }

    /// Read a zig-zag encoded signed varint of at most 64 bits.
    fn read_varint64(&mut self) -> Result<i64> {
        let ux = self.read_varuint64()?;
        Ok(((ux >> 1) as i64) ^ -((ux & 1) as i64))
    }

    /// Read a varuint32 collection length, rejecting lengths that cannot fit.
    ///
    /// Every element occupies at least one byte, so a count larger than the
    /// remaining payload is malformed and rejected before any allocation.
    fn read_len(&mut self, what: &'static str) -> Result<usize> {
        let len = self.read_varuint32()? as usize;
        if len > self.remaining() {
            return Err(ProtocolError::LengthOutOfBounds { what, len });
        }
        Ok(len)
    }

    /// Read a length-prefixed UTF-8 string.
    fn read_string(&mut self) -> Result<String> {
        let len = self.read_varuint32()? as usize;
        self.ensure(len)?;
        let mut raw = vec![0u8; len];
        self.copy_to_slice(&mut raw);
        Ok(String::from_utf8(raw)?)
    }

    /// Read a UUID from 16 raw bytes.
    fn read_uuid(&mut self) -> Result<Uuid> {
        self.ensure(16)?;
        let mut raw = [0u8; 16];
        self.copy_to_slice(&mut raw);
        Ok(Uuid::from_bytes(raw))
    }

    /// Read three little-endian f32 components.
    fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3 {
            x: self.read_f32_le()?,
            y: self.read_f32_le()?,
            z: self.read_f32_le()?,
        })
    }

    /// Read a varuint32 count followed by that many strings.
    fn read_string_vec(&mut self, what: &'static str) -> Result<Vec<String>> {
        let len = self.read_len(what)?;
        (0..len).map(|_| self.read_string()).collect()
    }
}

impl<B: Buf + ?Sized> ReadExt for B {}
