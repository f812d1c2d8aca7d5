//! Integration test common infrastructure.
//!
//! In-memory stand-ins for everything a session talks to, so tests can feed
//! packets in and inspect what came out.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hearth_proto::Packet;
use hearthd::chat::ChatSink;
use hearthd::cmd::{CommandCatalog, CommandDescriptor};
use hearthd::error::ConnectionError;
use hearthd::network::Connection;
use hearthd::session::{Controllable, Session, SessionDeps};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How long a test waits for the dispatch loop before giving up.
pub const LOOP_TIMEOUT: Duration = Duration::from_secs(2);

/// A connection fed from a channel that records everything written to it.
pub struct MockConnection {
    name: String,
    addr: SocketAddr,
    inbound: tokio::sync::Mutex<mpsc::UnboundedReceiver<Packet>>,
    written: Mutex<Vec<Packet>>,
    closes: AtomicUsize,
    fail_writes: AtomicBool,
    shutdown: CancellationToken,
}

impl MockConnection {
    pub fn new(name: &str) -> (Arc<Self>, mpsc::UnboundedSender<Packet>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Arc::new(Self {
            name: name.to_string(),
            addr: "127.0.0.1:19132".parse().unwrap(),
            inbound: tokio::sync::Mutex::new(rx),
            written: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        });
        (conn, tx)
    }

    pub fn written(&self) -> Vec<Packet> {
        self.written.lock().clone()
    }

    pub fn last_written(&self) -> Option<Packet> {
        self.written.lock().last().cloned()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn read_packet(&self) -> Result<Packet, ConnectionError> {
        let mut inbound = self.inbound.lock().await;
        tokio::select! {
            _ = self.shutdown.cancelled() => Err(ConnectionError::Closed),
            pk = inbound.recv() => pk.ok_or(ConnectionError::Closed),
        }
    }

    fn write_packet(&self, pk: Packet) -> Result<(), ConnectionError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ConnectionError::QueueFull);
        }
        self.written.lock().push(pk);
        Ok(())
    }

    fn close(&self) -> Result<(), ConnectionError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.shutdown.cancel();
        Ok(())
    }

    fn remote_addr(&self) -> SocketAddr {
        self.addr
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// A controllable that records every call.
#[derive(Default)]
pub struct MockControllable {
    pub chats: Mutex<Vec<String>>,
    pub commands: Mutex<Vec<String>>,
    closes: AtomicUsize,
    fail_close: AtomicBool,
}

impl MockControllable {
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn fail_close(&self) {
        self.fail_close.store(true, Ordering::SeqCst);
    }
}

impl Controllable for MockControllable {
    fn chat(&self, message: &str) {
        self.chats.lock().push(message.to_string());
    }

    fn execute_command(&self, command_line: &str) {
        self.commands.lock().push(command_line.to_string());
    }

    fn close(&self) -> anyhow::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close.load(Ordering::SeqCst) {
            anyhow::bail!("entity already removed");
        }
        Ok(())
    }
}

/// A chat sink that keeps every announcement.
#[derive(Default)]
pub struct RecordingChat {
    lines: Mutex<Vec<String>>,
}

impl RecordingChat {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines.lock().iter().filter(|l| l.contains(needle)).count()
    }
}

impl ChatSink for RecordingChat {
    fn announce(&self, text: &str) {
        self.lines.lock().push(text.to_string());
    }
}

/// A fixed catalog keyed the way a registry keys it: by name and by alias.
#[derive(Default)]
pub struct StaticCatalog {
    commands: HashMap<String, Arc<CommandDescriptor>>,
}

impl StaticCatalog {
    pub fn with(mut self, descriptor: CommandDescriptor) -> Self {
        let descriptor = Arc::new(descriptor);
        for alias in &descriptor.aliases {
            self.commands.insert(alias.clone(), Arc::clone(&descriptor));
        }
        self.commands.insert(descriptor.name.clone(), descriptor);
        self
    }
}

impl CommandCatalog for StaticCatalog {
    fn all_commands(&self) -> HashMap<String, Arc<CommandDescriptor>> {
        self.commands.clone()
    }
}

/// A session wired to mocks, plus handles on each of them.
pub struct Harness {
    pub session: Arc<Session>,
    pub conn: Arc<MockConnection>,
    pub ctrl: Arc<MockControllable>,
    pub chat: Arc<RecordingChat>,
    pub inbound: mpsc::UnboundedSender<Packet>,
}

impl Harness {
    pub fn new(name: &str) -> Self {
        Self::with_catalog(name, StaticCatalog::default())
    }

    pub fn with_catalog(name: &str, catalog: StaticCatalog) -> Self {
        let (conn, inbound) = MockConnection::new(name);
        let ctrl = Arc::new(MockControllable::default());
        let chat = Arc::new(RecordingChat::default());
        let session = Session::new(
            Arc::clone(&ctrl) as Arc<dyn Controllable>,
            Arc::clone(&conn) as Arc<dyn Connection>,
            SessionDeps {
                chat: Arc::clone(&chat) as Arc<dyn ChatSink>,
                catalog: Arc::new(catalog),
            },
        );
        Self {
            session,
            conn,
            ctrl,
            chat,
            inbound,
        }
    }

    /// Start the dispatch loop.
    pub fn start(&self) -> JoinHandle<()> {
        self.session.handle()
    }

    pub fn send(&self, pk: impl Into<Packet>) {
        self.inbound.send(pk.into()).expect("dispatch loop gone");
    }
}

/// Wait for the dispatch loop to exit.
pub async fn join(handle: JoinHandle<()>) {
    tokio::time::timeout(LOOP_TIMEOUT, handle)
        .await
        .expect("dispatch loop did not exit")
        .expect("dispatch loop panicked");
}

/// Poll until `cond` holds, failing the test after [`LOOP_TIMEOUT`].
pub async fn eventually(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(LOOP_TIMEOUT, async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
