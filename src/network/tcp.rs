//! TCP transport.
//!
//! ```text
//!   client ──▶ FramedRead<PacketCodec> ──▶ read_packet()   (session task)
//!   client ◀── FramedWrite<PacketCodec> ◀── writer task ◀── mpsc ◀── write_packet()
//! ```
//!
//! The writer task owns the write half. On close it drains whatever is
//! already queued, so a Disconnect written just before closing still arrives.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use hearth_proto::{Disconnect, Login, Packet, PacketCodec, PROTOCOL_VERSION};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, mpsc};
use tokio::time::timeout;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::Connection;
use crate::config::SessionConfig;
use crate::error::ConnectionError;

/// Longest display name a client may log in with.
pub const MAX_DISPLAY_NAME_LEN: usize = 16;

/// A logged-in client connection over TCP.
pub struct TcpConnection {
    addr: SocketAddr,
    display_name: String,
    reader: Mutex<FramedRead<OwnedReadHalf, PacketCodec>>,
    outgoing: mpsc::Sender<Packet>,
    shutdown: CancellationToken,
}

impl TcpConnection {
    /// Perform the login handshake on a freshly accepted stream.
    ///
    /// The first packet must be a [`Login`] arriving within the configured
    /// timeout, speaking [`PROTOCOL_VERSION`], with a valid display name.
    pub async fn accept(
        stream: TcpStream,
        addr: SocketAddr,
        config: &SessionConfig,
    ) -> Result<Self, ConnectionError> {
        if let Err(e) = stream.set_nodelay(true) {
            warn!(%addr, error = %e, "Failed to set TCP_NODELAY");
        }

        let (read_half, write_half) = stream.into_split();
        let codec = PacketCodec::with_max_len(config.max_frame_len);
        let mut reader = FramedRead::new(read_half, codec.clone());
        let mut writer = FramedWrite::new(write_half, codec);

        let first = timeout(config.login_timeout(), reader.next())
            .await
            .map_err(|_| ConnectionError::Handshake("login timed out".into()))?;
        let login = match first {
            Some(Ok(Packet::Login(login))) => login,
            Some(Ok(other)) => {
                return Err(ConnectionError::Handshake(format!(
                    "expected Login, got {}",
                    other.name()
                )));
            }
            Some(Err(e)) => return Err(e.into()),
            None => return Err(ConnectionError::Closed),
        };

        if let Err(reason) = validate_login(&login) {
            let pk = Disconnect {
                hide_disconnection_screen: false,
                message: reason.to_string(),
            };
            let _ = writer.send(pk.into()).await;
            return Err(ConnectionError::Handshake(reason.to_string()));
        }

        let (outgoing, rx) = mpsc::channel(config.outbound_queue.max(1));
        let shutdown = CancellationToken::new();
        tokio::spawn(write_loop(writer, rx, shutdown.clone(), addr));

        debug!(%addr, name = %login.display_name, "Login accepted");
        Ok(Self {
            addr,
            display_name: login.display_name,
            reader: Mutex::new(reader),
            outgoing,
            shutdown,
        })
    }
}

fn validate_login(login: &Login) -> Result<(), &'static str> {
    if login.protocol_version < PROTOCOL_VERSION {
        return Err("Outdated client");
    }
    if login.protocol_version > PROTOCOL_VERSION {
        return Err("Outdated server");
    }
    let len = login.display_name.chars().count();
    if len == 0 || len > MAX_DISPLAY_NAME_LEN {
        return Err("Invalid display name");
    }
    Ok(())
}

async fn write_loop(
    mut writer: FramedWrite<OwnedWriteHalf, PacketCodec>,
    mut rx: mpsc::Receiver<Packet>,
    shutdown: CancellationToken,
    addr: SocketAddr,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            pk = rx.recv() => {
                let Some(pk) = pk else { break };
                if let Err(e) = writer.send(pk).await {
                    debug!(%addr, error = %e, "Write failed");
                    return;
                }
            }
        }
    }

    while let Ok(pk) = rx.try_recv() {
        if writer.send(pk).await.is_err() {
            return;
        }
    }
    let _ = writer.close().await;
}

#[async_trait]
impl Connection for TcpConnection {
    async fn read_packet(&self) -> Result<Packet, ConnectionError> {
        let mut reader = self.reader.lock().await;
        tokio::select! {
            _ = self.shutdown.cancelled() => Err(ConnectionError::Closed),
            next = reader.next() => match next {
                Some(Ok(pk)) => Ok(pk),
                Some(Err(e)) => Err(e.into()),
                None => Err(ConnectionError::Closed),
            },
        }
    }

    fn write_packet(&self, pk: Packet) -> Result<(), ConnectionError> {
        if self.shutdown.is_cancelled() {
            return Err(ConnectionError::Closed);
        }
        self.outgoing.try_send(pk).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ConnectionError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => ConnectionError::Closed,
        })
    }

    fn close(&self) -> Result<(), ConnectionError> {
        if self.shutdown.is_cancelled() {
            return Err(ConnectionError::Closed);
        }
        self.shutdown.cancel();
        Ok(())
    }

    fn remote_addr(&self) -> SocketAddr {
        self.addr
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}
