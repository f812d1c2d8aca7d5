//! Session - the protocol state of one connected client.
//!
//! A session sits between a logged-in [`Connection`] and the [`Controllable`]
//! entity it drives:
//!
//! ```text
//!   Connection ──read──▶ dispatch loop ──▶ Controllable::chat / execute_command
//!       ▲                                             │
//!       └────write──── outbound senders ◀── server logic, command output
//! ```
//!
//! The dispatch loop runs in its own Tokio task and is the only reader.
//! Outbound senders may be called from any task at any time. Teardown is
//! triggered by a read error, a rejected packet, or the closed flag (set by
//! [`Session::disconnect`]), and always runs [`Session::close`] exactly once.

mod controllable;
mod handlers;
mod outbound;
pub mod param_type;

pub use controllable::Controllable;
pub use param_type::ParamType;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};

use hearth_proto::format::yellow;
use hearth_proto::{CommandOrigin, Packet};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::chat::ChatSink;
use crate::cmd::CommandCatalog;
use crate::network::Connection;

/// Collaborators shared by every session of a server.
#[derive(Clone)]
pub struct SessionDeps {
    /// Receives join and leave announcements.
    pub chat: Arc<dyn ChatSink>,
    /// Commands advertised to the client.
    pub catalog: Arc<dyn CommandCatalog>,
}

/// Handles incoming packets from a connection and sends outgoing packets on
/// behalf of the entity it controls.
pub struct Session {
    display_name: String,
    remote_addr: SocketAddr,
    conn: Arc<dyn Connection>,
    controllable: Arc<dyn Controllable>,
    deps: SessionDeps,

    /// Set once the controllable is gone or the client was disconnected.
    controllable_closed: AtomicBool,
    /// Origin of the most recent accepted command request.
    cmd_origin: Mutex<CommandOrigin>,
    close_once: Once,
    done: CancellationToken,
}

impl Session {
    /// Create a session controlling `controllable` through `conn`, and
    /// announce the player's arrival.
    ///
    /// Nothing is read from the connection until [`Session::handle`] is called.
    pub fn new(
        controllable: Arc<dyn Controllable>,
        conn: Arc<dyn Connection>,
        deps: SessionDeps,
    ) -> Arc<Self> {
        let session = Arc::new(Self {
            display_name: conn.display_name().to_string(),
            remote_addr: conn.remote_addr(),
            conn,
            controllable,
            deps,
            controllable_closed: AtomicBool::new(false),
            cmd_origin: Mutex::new(CommandOrigin::default()),
            close_once: Once::new(),
            done: CancellationToken::new(),
        });

        session
            .deps
            .chat
            .announce(&yellow(format!("{} has joined the game", session.display_name)));
        info!(name = %session.display_name, addr = %session.remote_addr, "Session started");
        session
    }

    /// Start handling packets from the client in a new task, then send the
    /// command catalog. Returns without waiting for the dispatch loop.
    pub fn handle(self: &Arc<Self>) -> JoinHandle<()> {
        let handle = tokio::spawn(Arc::clone(self).handle_packets());
        self.send_available_commands();
        handle
    }

    /// Close the controllable and the connection, and announce the player's
    /// departure.
    ///
    /// Only the first call has any effect. Failures while closing either side
    /// are logged and otherwise ignored so teardown always completes.
    pub fn close(&self) {
        self.close_once.call_once(|| {
            self.controllable_closed.store(true, Ordering::Release);

            if let Err(e) = self.controllable.close() {
                debug!(name = %self.display_name, error = %e, "Error closing controllable");
            }
            if let Err(e) = self.conn.close() {
                debug!(addr = %self.remote_addr, error = %e, "Error closing connection");
            }

            self.deps
                .chat
                .announce(&yellow(format!("{} has left the game", self.display_name)));
            self.done.cancel();
            info!(name = %self.display_name, addr = %self.remote_addr, "Session closed");
        });
    }

    /// Name the client logged in with.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Address of the client.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Whether the closed flag is set. Once true, no more packets are written.
    pub fn is_closed(&self) -> bool {
        self.controllable_closed.load(Ordering::Acquire)
    }

    /// Wait until [`Session::close`] has run.
    pub async fn closed(&self) {
        self.done.cancelled().await
    }

    /// The origin that the next command output will be addressed to.
    pub fn pending_command_origin(&self) -> CommandOrigin {
        self.cmd_origin.lock().clone()
    }

    /// Continuously handle packets from the connection until it fails, a packet
    /// is rejected, or the closed flag is observed.
    #[instrument(skip(self), fields(name = %self.display_name, addr = %self.remote_addr), name = "session")]
    async fn handle_packets(self: Arc<Self>) {
        let _guard = CloseGuard(&self);
        loop {
            let pk = match self.conn.read_packet().await {
                Ok(pk) => pk,
                Err(e) => {
                    debug!(error = %e, "Read ended");
                    return;
                }
            };
            if self.is_closed() {
                // The controllable went away while we were reading; don't act
                // on its behalf any more.
                debug!(packet = pk.name(), "Dropping packet for closed session");
                return;
            }

            let name = pk.name();
            if let Err(e) = self.handle_packet(pk) {
                error!(
                    packet = name,
                    code = e.error_code(),
                    error = %e,
                    "Error processing packet"
                );
                return;
            }
        }
    }

    /// Queue a packet unless the session is closed. Write failures mean the
    /// connection is dying, which the dispatch loop notices on its own.
    fn write_packet(&self, pk: impl Into<Packet>) {
        if self.is_closed() {
            return;
        }
        let pk = pk.into();
        let name = pk.name();
        if let Err(e) = self.conn.write_packet(pk) {
            debug!(addr = %self.remote_addr, packet = name, error = %e, "Dropped outbound packet");
        }
    }
}

/// Closes the session when the dispatch loop exits, whichever way it exits.
struct CloseGuard<'a>(&'a Session);

impl Drop for CloseGuard<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}
