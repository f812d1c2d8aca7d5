use bytes::{BufMut, Bytes, BytesMut};

use super::{id, PacketBody};
use crate::encode::{ReadExt, WriteExt};
use crate::error::Result;

/// First packet of every connection: identifies the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    /// Protocol version the client speaks.
    pub protocol_version: i32,
    /// Name shown for the player in chat.
    pub display_name: String,
}

impl PacketBody for Login {
    const ID: u32 = id::LOGIN;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_i32(self.protocol_version);
        buf.put_string(&self.display_name);
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        Ok(Self {
            protocol_version: buf.read_i32()?,
            display_name: buf.read_string()?,
        })
    }
}

/// Tells the client it is being disconnected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnect {
    /// Skip the disconnect screen entirely.
    pub hide_disconnection_screen: bool,
    /// Reason shown on the disconnect screen.
    pub message: String,
}

impl PacketBody for Disconnect {
    const ID: u32 = id::DISCONNECT;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_bool(self.hide_disconnection_screen);
        if !self.hide_disconnection_screen {
            buf.put_string(&self.message);
        }
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        let hide_disconnection_screen = buf.read_bool()?;
        let message = if hide_disconnection_screen {
            String::new()
        } else {
            buf.read_string()?
        };
        Ok(Self {
            hide_disconnection_screen,
            message,
        })
    }
}

/// Instructs the client to reconnect to another server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Host or IP address of the target server.
    pub address: String,
    /// Port of the target server.
    pub port: u16,
}

impl PacketBody for Transfer {
    const ID: u32 = id::TRANSFER;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_string(&self.address);
        buf.put_u16_le(self.port);
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        Ok(Self {
            address: buf.read_string()?,
            port: buf.read_u16_le()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_disconnect_has_no_message() {
        let pk = Disconnect {
            hide_disconnection_screen: true,
            message: String::new(),
        };
        let mut buf = BytesMut::new();
        pk.encode(&mut buf);
        assert_eq!(&buf[..], &[1]);
    }

    #[test]
    fn test_transfer_port_little_endian() {
        let pk = Transfer {
            address: "a".into(),
            port: 19132,
        };
        let mut buf = BytesMut::new();
        pk.encode(&mut buf);
        assert_eq!(&buf[..], &[1, b'a', 0xbc, 0x4a]);
    }
}
