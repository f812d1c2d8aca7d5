//! Outbound packet constructors.
//!
//! Every sender is fire-and-forget: the packet is queued on the connection
//! and write failures are dropped (see [`Session::write_packet`]).

use std::net::IpAddr;
use std::sync::atomic::Ordering;

use hearth_proto::command::{ARG_VALID, Command, CommandOverload, CommandParameter};
use hearth_proto::packet::OUTPUT_TYPE_ALL_OUTPUT;
use hearth_proto::{
    AvailableCommands, ChangeDimension, CommandOutput, CommandOutputMessage, Dimension,
    Disconnect, SetTitle, Text, TextType, TitleAction, Transfer, Vec3,
};

use super::Session;
use super::param_type::value_to_param_type;
use crate::cmd::{CommandDescriptor, Output};

impl Session {
    /// Send a raw chat message.
    pub fn send_message(&self, message: &str) {
        self.send_text(TextType::Raw, message);
    }

    /// Send a tip shown above the hotbar.
    pub fn send_tip(&self, message: &str) {
        self.send_text(TextType::Tip, message);
    }

    /// Send an announcement, shown in chat without a sender prefix.
    pub fn send_announcement(&self, message: &str) {
        self.send_text(TextType::Announcement, message);
    }

    /// Send a popup shown above the hotbar until replaced.
    pub fn send_popup(&self, message: &str) {
        self.send_text(TextType::Popup, message);
    }

    /// Send a jukebox popup, the "now playing" line above the hotbar.
    pub fn send_jukebox_popup(&self, message: &str) {
        self.send_text(TextType::JukeboxPopup, message);
    }

    fn send_text(&self, text_type: TextType, message: &str) {
        self.write_packet(Text::new(text_type, message));
    }

    /// Show a title. Durations are in ticks.
    pub fn send_title(&self, text: &str, fade_in: i32, remain: i32, fade_out: i32) {
        self.send_title_action(TitleAction::SetTitle, text, fade_in, remain, fade_out);
    }

    /// Show a subtitle below the current title. Durations are in ticks.
    pub fn send_subtitle(&self, text: &str, fade_in: i32, remain: i32, fade_out: i32) {
        self.send_title_action(TitleAction::SetSubtitle, text, fade_in, remain, fade_out);
    }

    /// Show a message in the action bar. Durations are in ticks.
    pub fn send_action_bar_message(&self, text: &str, fade_in: i32, remain: i32, fade_out: i32) {
        self.send_title_action(TitleAction::SetActionBar, text, fade_in, remain, fade_out);
    }

    fn send_title_action(
        &self,
        action_type: TitleAction,
        text: &str,
        fade_in_duration: i32,
        remain_duration: i32,
        fade_out_duration: i32,
    ) {
        self.write_packet(SetTitle {
            action_type,
            text: text.to_string(),
            fade_in_duration,
            remain_duration,
            fade_out_duration,
        });
    }

    /// Switch the client to the nether without moving the player.
    pub fn send_nether_dimension(&self) {
        self.send_dimension(Dimension::Nether);
    }

    /// Switch the client to the end without moving the player.
    pub fn send_end_dimension(&self) {
        self.send_dimension(Dimension::End);
    }

    /// Switch the client to the overworld without moving the player.
    pub fn send_overworld_dimension(&self) {
        self.send_dimension(Dimension::Overworld);
    }

    fn send_dimension(&self, dimension: Dimension) {
        self.write_packet(ChangeDimension {
            dimension,
            position: Vec3::ZERO,
            respawn: false,
        });
    }

    /// Transfer the client to the server at `ip` and `port`.
    pub fn transfer(&self, ip: IpAddr, port: u16) {
        self.write_packet(Transfer {
            address: ip.to_string(),
            port,
        });
    }

    /// Disconnect the client and stop handling its packets. A non-empty
    /// message is shown on the disconnect screen; an empty one hides it.
    pub fn disconnect(&self, message: &str) {
        self.write_packet(Disconnect {
            hide_disconnection_screen: message.is_empty(),
            message: message.to_string(),
        });
        self.controllable_closed.store(true, Ordering::Release);
    }

    /// Send the output of a command to whoever issued the most recent command
    /// request: the player, or an automation connection acting for it.
    pub fn send_command_output(&self, output: &Output) {
        let mut messages = Vec::with_capacity(output.message_count() + output.error_count());
        messages.extend(output.messages().iter().map(|m| CommandOutputMessage {
            success: true,
            message: m.clone(),
            parameters: Vec::new(),
        }));
        messages.extend(output.errors().iter().map(|e| CommandOutputMessage {
            success: false,
            message: e.clone(),
            parameters: Vec::new(),
        }));

        self.write_packet(CommandOutput {
            command_origin: self.pending_command_origin(),
            output_type: OUTPUT_TYPE_ALL_OUTPUT,
            success_count: clamp_count(output.message_count()),
            output_messages: messages,
            data_set: String::new(),
        });
    }

    /// Send every available command. Once sent they show up in `/help` and
    /// are auto-completed by the client.
    pub fn send_available_commands(&self) {
        let all = self.deps.catalog.all_commands();
        let mut pk = AvailableCommands::default();
        for (alias, c) in &all {
            // Aliases map to the same descriptor; only emit it under its name.
            if c.name != *alias {
                continue;
            }
            pk.commands.push(wire_command(c));
        }
        pk.commands.sort_by(|a, b| a.name.cmp(&b.name));
        self.write_packet(pk);
    }
}

/// Build the wire form of one command, resolving each parameter's type.
fn wire_command(c: &CommandDescriptor) -> Command {
    let overloads = c
        .overloads
        .iter()
        .map(|params| CommandOverload {
            parameters: params
                .iter()
                .map(|info| {
                    let value = info.value.as_ref();
                    let (t, command_enum) = value_to_param_type(value);
                    CommandParameter {
                        name: info.name.clone(),
                        param_type: t | ARG_VALID,
                        optional: info.optional,
                        collapse_enum_options: value.as_any().is::<bool>(),
                        command_enum,
                        suffix: info.suffix.clone(),
                    }
                })
                .collect(),
        })
        .collect();

    Command {
        name: c.name.clone(),
        description: c.description.clone(),
        flags: 0,
        permission_level: 0,
        aliases: c.aliases.clone(),
        overloads,
    }
}

/// Counts on the wire are u32; larger counts saturate.
fn clamp_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
