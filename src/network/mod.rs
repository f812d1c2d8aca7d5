//! Network layer: the connection abstraction and its TCP implementation.

pub mod connection;
pub mod gateway;
pub mod tcp;

pub use connection::Connection;
pub use gateway::Gateway;
pub use tcp::TcpConnection;
