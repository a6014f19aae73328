//! Network server.
//!
//! The [`OvenServer`] accepts TCP connections and runs one
//! [`ConnectionHandler`] task per client, all sharing a single oven.

pub mod connection;
pub mod listener;

pub use connection::ConnectionHandler;
pub use listener::OvenServer;
