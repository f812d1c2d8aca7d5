//! End-to-end tests over loopback TCP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use hearth_proto::{
    CommandOrigin, CommandRequest, Login, Packet, PacketCodec, PROTOCOL_VERSION, Text, TextType,
};
use hearthd::chat::GlobalChat;
use hearthd::cmd::{CommandDescriptor, CommandRegistry, Output};
use hearthd::config::SessionConfig;
use hearthd::network::Gateway;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn spawn_server() -> SocketAddr {
    let commands = Arc::new(CommandRegistry::new());
    commands.register(
        CommandDescriptor::new("ping", "Replies with pong").with_aliases(["p"]),
        |_source: &str, _args: &str, out: &mut Output| out.print("pong"),
    );
    let gateway = Gateway::bind(
        "127.0.0.1:0".parse().unwrap(),
        SessionConfig::default(),
        GlobalChat::new(64),
        commands,
    )
    .await
    .unwrap();
    let addr = gateway.local_addr().unwrap();
    tokio::spawn(gateway.run());
    addr
}

struct TestClient {
    framed: Framed<TcpStream, PacketCodec>,
}

impl TestClient {
    async fn connect(addr: SocketAddr, version: i32, name: &str) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let mut framed = Framed::new(stream, PacketCodec::new());
        framed
            .send(
                Login {
                    protocol_version: version,
                    display_name: name.to_string(),
                }
                .into(),
            )
            .await
            .unwrap();
        Self { framed }
    }

    async fn send(&mut self, pk: impl Into<Packet>) {
        self.framed.send(pk.into()).await.unwrap();
    }

    async fn recv(&mut self) -> Option<Packet> {
        tokio::time::timeout(TIMEOUT, self.framed.next())
            .await
            .expect("timed out waiting for packet")
            .map(|r| r.unwrap())
    }

    /// Read until a packet matches, skipping the rest.
    async fn expect<T>(&mut self, mut f: impl FnMut(Packet) -> Option<T>) -> T {
        loop {
            let pk = self.recv().await.expect("connection closed");
            if let Some(v) = f(pk) {
                return v;
            }
        }
    }
}

#[tokio::test]
async fn test_login_receives_catalog() {
    let addr = spawn_server().await;
    let mut client = TestClient::connect(addr, PROTOCOL_VERSION, "Alice").await;

    let pk = match client.recv().await {
        Some(Packet::AvailableCommands(pk)) => pk,
        other => panic!("expected AvailableCommands, got {other:?}"),
    };
    assert_eq!(pk.commands.len(), 1);
    assert_eq!(pk.commands[0].name, "ping");
    assert_eq!(pk.commands[0].aliases, ["p"]);
}

#[tokio::test]
async fn test_outdated_client_is_refused() {
    let addr = spawn_server().await;
    let mut client = TestClient::connect(addr, PROTOCOL_VERSION - 1, "Alice").await;

    match client.recv().await {
        Some(Packet::Disconnect(pk)) => {
            assert!(!pk.hide_disconnection_screen);
            assert_eq!(pk.message, "Outdated client");
        }
        other => panic!("expected Disconnect, got {other:?}"),
    }
    assert!(client.recv().await.is_none());
}

#[tokio::test]
async fn test_chat_is_broadcast() {
    let addr = spawn_server().await;
    let mut alice = TestClient::connect(addr, PROTOCOL_VERSION, "Alice").await;
    alice.expect(|pk| matches!(pk, Packet::AvailableCommands(_)).then_some(())).await;

    let mut bob = TestClient::connect(addr, PROTOCOL_VERSION, "Bob").await;
    bob.expect(|pk| matches!(pk, Packet::AvailableCommands(_)).then_some(())).await;

    // Alice sees Bob arrive.
    let joined = alice
        .expect(|pk| match pk {
            Packet::Text(t) if t.message.contains("Bob has joined") => Some(t),
            _ => None,
        })
        .await;
    assert_eq!(joined.text_type, TextType::Raw);

    alice.send(Text::chat("Alice", "hi")).await;
    let line = bob
        .expect(|pk| match pk {
            Packet::Text(t) => Some(t.message),
            _ => None,
        })
        .await;
    assert_eq!(line, "<Alice> hi");
}

#[tokio::test]
async fn test_command_round_trip() {
    let addr = spawn_server().await;
    let mut client = TestClient::connect(addr, PROTOCOL_VERSION, "Alice").await;
    client.expect(|pk| matches!(pk, Packet::AvailableCommands(_)).then_some(())).await;

    let origin = CommandOrigin {
        request_id: "42".into(),
        ..Default::default()
    };
    client
        .send(CommandRequest {
            command_line: "/ping".into(),
            command_origin: origin.clone(),
            internal: false,
        })
        .await;

    let out = client
        .expect(|pk| match pk {
            Packet::CommandOutput(o) => Some(o),
            _ => None,
        })
        .await;
    assert_eq!(out.command_origin, origin);
    assert_eq!(out.success_count, 1);
    assert_eq!(out.output_messages.len(), 1);
    assert_eq!(out.output_messages[0].message, "pong");
}

#[tokio::test]
async fn test_spoofed_chat_drops_connection() {
    let addr = spawn_server().await;
    let mut client = TestClient::connect(addr, PROTOCOL_VERSION, "Alice").await;
    client.expect(|pk| matches!(pk, Packet::AvailableCommands(_)).then_some(())).await;

    client.send(Text::chat("Bob", "not really Bob")).await;

    // No explanation is sent; the connection just ends.
    while let Some(pk) = client.recv().await {
        assert!(!matches!(pk, Packet::Disconnect(_)), "unexpected {pk:?}");
    }
}
