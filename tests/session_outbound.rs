//! Outbound senders and the command catalog.

mod common;

use std::net::{IpAddr, Ipv4Addr};

use common::{Harness, StaticCatalog, join};
use hearth_proto::command::{ARG_TYPE_INT, ARG_TYPE_POSITION, ARG_TYPE_TARGET, ARG_TYPE_VALUE, ARG_VALID};
use hearth_proto::packet::OUTPUT_TYPE_ALL_OUTPUT;
use hearth_proto::{
    AvailableCommands, ChangeDimension, CommandOrigin, CommandRequest, Dimension, Disconnect,
    OriginType, Packet, SetTitle, Text, TextType, TitleAction, Transfer, Vec3,
};
use hearthd::cmd::{Choice, CommandDescriptor, Output, ParamInfo, Target, Varargs};

fn last_text(h: &Harness) -> Text {
    match h.conn.last_written() {
        Some(Packet::Text(pk)) => pk,
        other => panic!("expected Text, got {other:?}"),
    }
}

fn last_title(h: &Harness) -> SetTitle {
    match h.conn.last_written() {
        Some(Packet::SetTitle(pk)) => pk,
        other => panic!("expected SetTitle, got {other:?}"),
    }
}

fn last_dimension(h: &Harness) -> ChangeDimension {
    match h.conn.last_written() {
        Some(Packet::ChangeDimension(pk)) => pk,
        other => panic!("expected ChangeDimension, got {other:?}"),
    }
}

fn catalog(h: &Harness) -> AvailableCommands {
    match h.conn.written().into_iter().next() {
        Some(Packet::AvailableCommands(pk)) => pk,
        other => panic!("expected AvailableCommands, got {other:?}"),
    }
}

#[test]
fn test_text_senders() {
    let h = Harness::new("Alice");
    let cases: [(fn(&hearthd::session::Session, &str), TextType); 5] = [
        (|s, m| s.send_message(m), TextType::Raw),
        (|s, m| s.send_tip(m), TextType::Tip),
        (|s, m| s.send_announcement(m), TextType::Announcement),
        (|s, m| s.send_popup(m), TextType::Popup),
        (|s, m| s.send_jukebox_popup(m), TextType::JukeboxPopup),
    ];
    for (send, text_type) in cases {
        send(&h.session, "hello");
        let pk = last_text(&h);
        assert_eq!(pk.text_type, text_type);
        assert_eq!(pk.message, "hello");
    }
}

#[test]
fn test_title_senders() {
    let h = Harness::new("Alice");

    h.session.send_title("Welcome", 10, 70, 20);
    assert_eq!(
        last_title(&h),
        SetTitle {
            action_type: TitleAction::SetTitle,
            text: "Welcome".into(),
            fade_in_duration: 10,
            remain_duration: 70,
            fade_out_duration: 20,
        }
    );

    h.session.send_subtitle("to the server", 1, 2, 3);
    let pk = last_title(&h);
    assert_eq!(pk.action_type, TitleAction::SetSubtitle);
    assert_eq!(pk.text, "to the server");

    h.session.send_action_bar_message("low health", 0, 40, 0);
    let pk = last_title(&h);
    assert_eq!(pk.action_type, TitleAction::SetActionBar);
    assert_eq!(pk.remain_duration, 40);
}

#[test]
fn test_dimension_senders() {
    let h = Harness::new("Alice");

    h.session.send_nether_dimension();
    assert_eq!(
        last_dimension(&h),
        ChangeDimension {
            dimension: Dimension::Nether,
            position: Vec3::ZERO,
            respawn: false,
        }
    );

    h.session.send_end_dimension();
    assert_eq!(last_dimension(&h).dimension, Dimension::End);

    h.session.send_overworld_dimension();
    assert_eq!(last_dimension(&h).dimension, Dimension::Overworld);
}

#[test]
fn test_transfer() {
    let h = Harness::new("Alice");
    h.session.transfer(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)), 19133);
    assert_eq!(
        h.conn.last_written(),
        Some(Packet::Transfer(Transfer {
            address: "192.168.1.20".into(),
            port: 19133,
        }))
    );
}

#[tokio::test]
async fn test_disconnect_with_message() {
    let h = Harness::new("Alice");
    let handle = h.start();

    h.session.disconnect("banned");

    assert_eq!(
        h.conn.last_written(),
        Some(Packet::Disconnect(Disconnect {
            hide_disconnection_screen: false,
            message: "banned".into(),
        }))
    );
    assert!(h.session.is_closed());

    // Nothing is written after the disconnect.
    h.session.send_message("too late");
    assert!(matches!(h.conn.last_written(), Some(Packet::Disconnect(_))));

    // The loop stops at its next flag check without acting on the packet.
    h.send(Text::chat("Alice", "one more"));
    join(handle).await;
    assert!(h.ctrl.chats.lock().is_empty());
    assert_eq!(h.conn.close_count(), 1);
    assert_eq!(h.ctrl.close_count(), 1);
}

#[test]
fn test_silent_disconnect() {
    let h = Harness::new("Alice");
    h.session.disconnect("");
    match h.conn.last_written() {
        Some(Packet::Disconnect(pk)) => assert!(pk.hide_disconnection_screen),
        other => panic!("expected Disconnect, got {other:?}"),
    }
    assert!(h.session.is_closed());
}

#[test]
fn test_write_failures_are_swallowed() {
    let h = Harness::new("Alice");
    h.conn.fail_writes();

    h.session.send_message("dropped");
    h.session.send_available_commands();
    h.session.disconnect("bye");

    assert!(h.conn.written().is_empty());
    assert!(h.session.is_closed());
}

#[tokio::test]
async fn test_command_output_entries() {
    let h = Harness::new("Alice");
    let handle = h.start();

    let origin = CommandOrigin {
        origin: OriginType::Player,
        request_id: "req-7".into(),
        ..Default::default()
    };
    h.send(CommandRequest {
        command_line: "/kill".into(),
        command_origin: origin.clone(),
        internal: false,
    });
    common::eventually(|| h.ctrl.commands.lock().len() == 1).await;

    let mut output = Output::new();
    output.print("first");
    output.error("oops");
    output.print("second");
    h.session.send_command_output(&output);

    let pk = match h.conn.last_written() {
        Some(Packet::CommandOutput(pk)) => pk,
        other => panic!("expected CommandOutput, got {other:?}"),
    };
    assert_eq!(pk.command_origin, origin);
    assert_eq!(pk.output_type, OUTPUT_TYPE_ALL_OUTPUT);
    assert_eq!(pk.success_count, 2);
    let entries: Vec<_> = pk
        .output_messages
        .iter()
        .map(|m| (m.success, m.message.as_str()))
        .collect();
    assert_eq!(entries, [(true, "first"), (true, "second"), (false, "oops")]);

    drop(h.inbound);
    join(handle).await;
}

#[tokio::test]
async fn test_catalog_sent_on_handle() {
    let h = Harness::with_catalog(
        "Alice",
        StaticCatalog::default().with(CommandDescriptor::new("version", "Shows the version")),
    );
    assert!(h.conn.written().is_empty());

    let handle = h.start();
    let pk = catalog(&h);
    assert_eq!(pk.commands.len(), 1);
    assert_eq!(pk.commands[0].name, "version");
    assert_eq!(pk.commands[0].description, "Shows the version");

    drop(h.inbound);
    join(handle).await;
}

#[test]
fn test_catalog_skips_aliases() {
    let h = Harness::with_catalog(
        "Alice",
        StaticCatalog::default()
            .with(CommandDescriptor::new("teleport", "").with_aliases(["tp", "warp"]))
            .with(CommandDescriptor::new("help", "").with_aliases(["?"])),
    );
    h.session.send_available_commands();

    let pk = catalog(&h);
    let names: Vec<_> = pk.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["help", "teleport"]);
    assert_eq!(pk.commands[1].aliases, ["tp", "warp"]);
}

#[test]
fn test_catalog_parameter_types() {
    let h = Harness::with_catalog(
        "Alice",
        StaticCatalog::default().with(
            CommandDescriptor::new("tp", "")
                .with_overload(vec![
                    ParamInfo::new("victim", Target),
                    ParamInfo::new("destination", Vec3::ZERO),
                    ParamInfo::new("check", false).optional(),
                ])
                .with_overload(vec![
                    ParamInfo::new("amount", 0i32).with_suffix("L"),
                    ParamInfo::new("mode", Choice::new("Mode", ["fast", "slow"])),
                    ParamInfo::new("reason", Varargs).optional(),
                ]),
        ),
    );
    h.session.send_available_commands();

    let pk = catalog(&h);
    let overloads = &pk.commands[0].overloads;
    assert_eq!(overloads.len(), 2);

    let first = &overloads[0].parameters;
    assert_eq!(first[0].param_type, ARG_TYPE_TARGET | ARG_VALID);
    assert_eq!(first[1].param_type, ARG_TYPE_POSITION | ARG_VALID);
    assert_eq!(first[2].param_type, ARG_VALID);
    assert!(first[2].optional);
    assert!(first[2].collapse_enum_options);
    let bool_enum = first[2].command_enum.as_ref().expect("bool enum");
    assert_eq!(bool_enum.enum_type, "bool");
    assert_eq!(bool_enum.options, ["true", "1", "false", "0"]);

    let second = &overloads[1].parameters;
    assert_eq!(second[0].param_type, ARG_TYPE_INT | ARG_VALID);
    assert_eq!(second[0].suffix, "L");
    assert!(!second[1].collapse_enum_options);
    assert_eq!(
        second[1].command_enum.as_ref().map(|e| e.options.clone()),
        Some(vec!["fast".to_string(), "slow".to_string()])
    );
    assert_eq!(second[2].param_type, ARG_TYPE_VALUE | ARG_VALID);
    assert!(second[2].command_enum.is_none());
}
