//! The daemon's controllable entity.
//!
//! World simulation is not part of this server, so a [`Player`] only chats and
//! runs commands. Command output is queued on a channel and delivered by the
//! gateway through the player's session, which knows the request origin.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::debug;

use crate::chat::ChatSink;
use crate::cmd::{CommandRegistry, Output};
use crate::session::Controllable;

/// A connected player.
pub struct Player {
    name: String,
    chat: Arc<dyn ChatSink>,
    commands: Arc<CommandRegistry>,
    outputs: mpsc::UnboundedSender<Output>,
    closed: AtomicBool,
}

impl Player {
    /// Create a player and the receiver for its command output.
    pub fn new(
        name: String,
        chat: Arc<dyn ChatSink>,
        commands: Arc<CommandRegistry>,
    ) -> (Self, mpsc::UnboundedReceiver<Output>) {
        let (outputs, rx) = mpsc::unbounded_channel();
        let player = Self {
            name,
            chat,
            commands,
            outputs,
            closed: AtomicBool::new(false),
        };
        (player, rx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Controllable for Player {
    fn chat(&self, message: &str) {
        if self.is_closed() {
            return;
        }
        self.chat.announce(&format!("<{}> {}", self.name, message));
    }

    fn execute_command(&self, command_line: &str) {
        if self.is_closed() {
            return;
        }
        let output = self.commands.execute(&self.name, command_line);
        // The receiver is gone once the session has shut down.
        let _ = self.outputs.send(output);
    }

    fn close(&self) -> anyhow::Result<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(name = %self.name, "Player closed");
        }
        Ok(())
    }
}
