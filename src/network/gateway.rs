//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listen socket and spawns one task per client. Each
//! task performs the login, wires a [`Player`] to a [`Session`], and runs the
//! forwarders that deliver command output and global chat to that client.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, instrument, warn};

use super::{Connection, TcpConnection};
use crate::chat::{ChatSink, GlobalChat};
use crate::cmd::{CommandRegistry, Output};
use crate::config::SessionConfig;
use crate::player::Player;
use crate::session::{Session, SessionDeps};

/// The Gateway accepts incoming TCP connections and spawns sessions.
pub struct Gateway {
    listener: TcpListener,
    config: SessionConfig,
    chat: GlobalChat,
    commands: Arc<CommandRegistry>,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(
        addr: SocketAddr,
        config: SessionConfig,
        chat: GlobalChat,
        commands: Arc<CommandRegistry>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "Listener bound");
        Ok(Self {
            listener,
            config,
            chat,
            commands,
        })
    }

    /// The address actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    debug!(%addr, "Connection accepted");
                    tokio::spawn(serve(
                        stream,
                        addr,
                        self.config.clone(),
                        self.chat.clone(),
                        Arc::clone(&self.commands),
                    ));
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}

async fn serve(
    stream: TcpStream,
    addr: SocketAddr,
    config: SessionConfig,
    chat: GlobalChat,
    commands: Arc<CommandRegistry>,
) {
    let conn = match TcpConnection::accept(stream, addr, &config).await {
        Ok(conn) => conn,
        Err(e) => {
            warn!(%addr, error = %e, "Login failed");
            return;
        }
    };

    let sink: Arc<dyn ChatSink> = Arc::new(chat.clone());
    let (player, outputs) = Player::new(
        conn.display_name().to_string(),
        Arc::clone(&sink),
        Arc::clone(&commands),
    );
    let session = Session::new(
        Arc::new(player),
        Arc::new(conn),
        SessionDeps {
            chat: sink,
            catalog: commands,
        },
    );

    let chat_rx = chat.subscribe();
    let handle = session.handle();
    tokio::spawn(forward_output(Arc::clone(&session), outputs));
    tokio::spawn(forward_chat(Arc::clone(&session), chat_rx));

    if let Err(e) = handle.await {
        error!(%addr, error = %e, "Session task failed");
    }
    info!(%addr, "Connection closed");
}

/// Deliver command output produced by the player back to its session.
async fn forward_output(session: Arc<Session>, mut outputs: mpsc::UnboundedReceiver<Output>) {
    loop {
        tokio::select! {
            _ = session.closed() => break,
            output = outputs.recv() => match output {
                Some(output) => session.send_command_output(&output),
                None => break,
            },
        }
    }
}

/// Deliver global chat to the session's client.
async fn forward_chat(session: Arc<Session>, mut chat_rx: broadcast::Receiver<Arc<str>>) {
    loop {
        tokio::select! {
            _ = session.closed() => break,
            msg = chat_rx.recv() => match msg {
                Ok(text) => session.send_message(&text),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(name = %session.display_name(), skipped, "Chat subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}
