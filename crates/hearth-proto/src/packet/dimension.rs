use bytes::{Bytes, BytesMut};

use super::{id, PacketBody};
use crate::encode::{ReadExt, WriteExt};
use crate::error::Result;

/// A position or direction in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Construct a vector from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Logical dimension ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// The overworld.
    Overworld,
    /// The nether.
    Nether,
    /// The end.
    End,
    /// A dimension id this server does not know about.
    Unknown(i32),
}

impl Dimension {
    /// Wire value of the dimension.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Overworld => 0,
            Self::Nether => 1,
            Self::End => 2,
            Self::Unknown(v) => v,
        }
    }

    /// Dimension for a wire value.
    pub fn from_i32(v: i32) -> Self {
        match v {
            0 => Self::Overworld,
            1 => Self::Nether,
            2 => Self::End,
            other => Self::Unknown(other),
        }
    }
}

/// Moves the client into another dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeDimension {
    /// Target dimension.
    pub dimension: Dimension,
    /// Position in the target dimension.
    pub position: Vec3,
    /// Whether this change follows a respawn.
    pub respawn: bool,
}

impl PacketBody for ChangeDimension {
    const ID: u32 = id::CHANGE_DIMENSION;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_varint32(self.dimension.as_i32());
        buf.put_vec3(self.position);
        buf.put_bool(self.respawn);
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        Ok(Self {
            dimension: Dimension::from_i32(buf.read_varint32()?),
            position: buf.read_vec3()?,
            respawn: buf.read_bool()?,
        })
    }
}
