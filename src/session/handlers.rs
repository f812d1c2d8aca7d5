//! Inbound packet handlers.

use hearth_proto::{CommandRequest, Packet, Text, TextType};
use tracing::debug;

use super::Session;
use crate::error::{HandlerResult, ProtocolViolation};

impl Session {
    /// Handle one packet from the client. An error means the packet was
    /// invalid in its context and the session must end.
    pub(super) fn handle_packet(&self, pk: Packet) -> HandlerResult {
        match pk {
            Packet::Text(pk) => self.handle_text(pk),
            Packet::CommandRequest(pk) => self.handle_command_request(pk),
            other => {
                debug!(packet = other.name(), id = other.id(), payload = ?other, "Unhandled packet");
                Ok(())
            }
        }
    }

    fn handle_text(&self, pk: Text) -> HandlerResult {
        if pk.text_type != TextType::Chat {
            return Err(ProtocolViolation::InvalidTextType(pk.text_type).into());
        }
        if pk.source_name != self.display_name {
            return Err(ProtocolViolation::SourceNameMismatch {
                source_name: pk.source_name,
                display_name: self.display_name.clone(),
            }
            .into());
        }
        self.controllable.chat(&pk.message);
        Ok(())
    }

    fn handle_command_request(&self, pk: CommandRequest) -> HandlerResult {
        if pk.internal {
            return Err(ProtocolViolation::InternalCommandRequest.into());
        }
        *self.cmd_origin.lock() = pk.command_origin;
        self.controllable.execute_command(&pk.command_line);
        Ok(())
    }
}
