//! Packet definitions.
//!
//! [`Packet`] is the closed set of messages the server understands, plus
//! [`Packet::Unknown`] which carries any other packet id through untouched so
//! newer clients never break decoding.

mod command;
mod connection;
mod dimension;
mod text;
mod title;

pub use command::{
    AvailableCommands, CommandOrigin, CommandOutput, CommandOutputMessage, CommandRequest,
    OriginType, OUTPUT_TYPE_ALL_OUTPUT, OUTPUT_TYPE_DATA_SET,
};
pub use connection::{Disconnect, Login, Transfer};
pub use dimension::{ChangeDimension, Dimension, Vec3};
pub use text::{Text, TextType};
pub use title::{SetTitle, TitleAction};

use bytes::{Bytes, BytesMut};

use crate::encode::{ReadExt, WriteExt};
use crate::error::Result;

/// Packet identifiers.
pub mod id {
    /// Login handshake sent by the client.
    pub const LOGIN: u32 = 0x01;
    /// Disconnect notice sent by the server.
    pub const DISCONNECT: u32 = 0x05;
    /// Chat and other text.
    pub const TEXT: u32 = 0x09;
    /// Forced dimension change.
    pub const CHANGE_DIMENSION: u32 = 0x3d;
    /// Command catalog.
    pub const AVAILABLE_COMMANDS: u32 = 0x4c;
    /// Command typed by the client.
    pub const COMMAND_REQUEST: u32 = 0x4d;
    /// Result of a command.
    pub const COMMAND_OUTPUT: u32 = 0x4f;
    /// Server transfer.
    pub const TRANSFER: u32 = 0x55;
    /// Title, subtitle and action bar control.
    pub const SET_TITLE: u32 = 0x58;
}

/// A packet body with a fixed id.
pub trait PacketBody: Sized {
    /// The packet id written before the body.
    const ID: u32;

    /// Encode the body (without id) into `buf`.
    fn encode(&self, buf: &mut BytesMut);

    /// Decode the body (without id) from `buf`.
    fn decode(buf: &mut Bytes) -> Result<Self>;
}

/// Every packet the server reads or writes.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Packet {
    /// Login handshake.
    Login(Login),
    /// Text message.
    Text(Text),
    /// Title control.
    SetTitle(SetTitle),
    /// Dimension change.
    ChangeDimension(ChangeDimension),
    /// Disconnect notice.
    Disconnect(Disconnect),
    /// Server transfer.
    Transfer(Transfer),
    /// Command request from the client.
    CommandRequest(CommandRequest),
    /// Command output to the client.
    CommandOutput(CommandOutput),
    /// Command catalog.
    AvailableCommands(AvailableCommands),
    /// Any packet id not modelled above; the payload is kept verbatim.
    Unknown {
        /// Packet id.
        id: u32,
        /// Raw payload following the id.
        payload: Bytes,
    },
}

impl Packet {
    /// The packet id this packet is written with.
    pub fn id(&self) -> u32 {
        match self {
            Self::Login(_) => Login::ID,
            Self::Text(_) => Text::ID,
            Self::SetTitle(_) => SetTitle::ID,
            Self::ChangeDimension(_) => ChangeDimension::ID,
            Self::Disconnect(_) => Disconnect::ID,
            Self::Transfer(_) => Transfer::ID,
            Self::CommandRequest(_) => CommandRequest::ID,
            Self::CommandOutput(_) => CommandOutput::ID,
            Self::AvailableCommands(_) => AvailableCommands::ID,
            Self::Unknown { id, .. } => *id,
        }
    }

    /// A short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "Login",
            Self::Text(_) => "Text",
            Self::SetTitle(_) => "SetTitle",
            Self::ChangeDimension(_) => "ChangeDimension",
            Self::Disconnect(_) => "Disconnect",
            Self::Transfer(_) => "Transfer",
            Self::CommandRequest(_) => "CommandRequest",
            Self::CommandOutput(_) => "CommandOutput",
            Self::AvailableCommands(_) => "AvailableCommands",
            Self::Unknown { .. } => "Unknown",
        }
    }

    /// Encode the packet id followed by its body.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_varuint32(self.id());
        match self {
            Self::Login(pk) => pk.encode(buf),
            Self::Text(pk) => pk.encode(buf),
            Self::SetTitle(pk) => pk.encode(buf),
            Self::ChangeDimension(pk) => pk.encode(buf),
            Self::Disconnect(pk) => pk.encode(buf),
            Self::Transfer(pk) => pk.encode(buf),
            Self::CommandRequest(pk) => pk.encode(buf),
            Self::CommandOutput(pk) => pk.encode(buf),
            Self::AvailableCommands(pk) => pk.encode(buf),
            Self::Unknown { payload, .. } => buf.extend_from_slice(payload),
        }
    }

    /// Decode a packet from a complete frame body (id + payload).
    pub fn decode(mut buf: Bytes) -> Result<Self> {
        let packet_id = buf.read_varuint32()?;
        let buf = &mut buf;
        Ok(match packet_id {
            id::LOGIN => Self::Login(Login::decode(buf)?),
            id::TEXT => Self::Text(Text::decode(buf)?),
            id::SET_TITLE => Self::SetTitle(SetTitle::decode(buf)?),
            id::CHANGE_DIMENSION => Self::ChangeDimension(ChangeDimension::decode(buf)?),
            id::DISCONNECT => Self::Disconnect(Disconnect::decode(buf)?),
            id::TRANSFER => Self::Transfer(Transfer::decode(buf)?),
            id::COMMAND_REQUEST => Self::CommandRequest(CommandRequest::decode(buf)?),
            id::COMMAND_OUTPUT => Self::CommandOutput(CommandOutput::decode(buf)?),
            id::AVAILABLE_COMMANDS => Self::AvailableCommands(AvailableCommands::decode(buf)?),
            _ => Self::Unknown {
                id: packet_id,
                payload: std::mem::take(buf),
            },
        })
    }
}

macro_rules! impl_from_body {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Packet {
                fn from(pk: $variant) -> Self {
                    Self::$variant(pk)
                }
            }
        )*
    };
}

impl_from_body!(
    Login,
    Text,
    SetTitle,
    ChangeDimension,
    Disconnect,
    Transfer,
    CommandRequest,
    CommandOutput,
    AvailableCommands,
);
