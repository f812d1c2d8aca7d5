//! The transport a session drives.

use async_trait::async_trait;
use hearth_proto::Packet;
use std::net::SocketAddr;

use crate::error::ConnectionError;

/// A framed, already logged-in packet connection to one client.
///
/// Writes never wait: implementations queue the packet and return, so any
/// task may send to a client while its session is blocked reading.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Wait for the next packet from the client.
    async fn read_packet(&self) -> Result<Packet, ConnectionError>;

    /// Queue a packet for the client.
    fn write_packet(&self, pk: Packet) -> Result<(), ConnectionError>;

    /// Close the connection. Pending reads fail with [`ConnectionError::Closed`].
    fn close(&self) -> Result<(), ConnectionError>;

    /// Address of the client.
    fn remote_addr(&self) -> SocketAddr;

    /// Name the client logged in with.
    fn display_name(&self) -> &str;
}
