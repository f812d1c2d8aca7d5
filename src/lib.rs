//! hearthd - Hearth game server daemon.
//!
//! Each client that logs in gets a [`Session`](session::Session): the
//! per-connection protocol layer that validates inbound packets, drives the
//! player it controls, and builds every outbound message.

pub mod chat;
pub mod cmd;
pub mod config;
pub mod error;
pub mod network;
pub mod player;
pub mod session;
