//! # hearth-proto
//!
//! Wire-level packet types for the hearthd game server.
//!
//! ## Features
//!
//! - A closed [`Packet`] sum type with a pass-through variant for unmodelled ids
//! - Binary encoding and decoding of every modelled packet
//! - The command schema used by the AvailableCommands catalog
//! - Optional Tokio codec for length-prefixed framing
//! - Text formatting helpers
//!
//! ## Quick Start
//!
//! ```rust
//! use bytes::BytesMut;
//! use hearth_proto::{Packet, Text, TextType};
//!
//! let pk: Packet = Text::new(TextType::Raw, "Hello, world!").into();
//! let mut buf = BytesMut::new();
//! pk.encode(&mut buf);
//!
//! let decoded = Packet::decode(buf.freeze()).expect("valid packet");
//! assert_eq!(decoded, pk);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod encode;
pub mod error;
pub mod format;
pub mod packet;

#[cfg(feature = "tokio")]
pub mod codec;

pub use self::command::{Command, CommandEnum, CommandOverload, CommandParameter};
pub use self::error::ProtocolError;
pub use self::packet::{
    AvailableCommands, ChangeDimension, CommandOrigin, CommandOutput, CommandOutputMessage,
    CommandRequest, Dimension, Disconnect, Login, OriginType, Packet, PacketBody, SetTitle, Text,
    TextType, TitleAction, Transfer, Vec3,
};

#[cfg(feature = "tokio")]
pub use self::codec::PacketCodec;

/// Protocol version spoken by this crate.
pub const PROTOCOL_VERSION: i32 = 390;
