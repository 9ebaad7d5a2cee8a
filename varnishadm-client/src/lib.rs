//! Async client for the Varnish admin (CLI) protocol.
//!
//! Connect to a running varnishd management port, authenticate via the
//! challenge/response handshake, and issue administrative commands
//! (status, start, stop, cache bans).

pub mod client;
pub mod connection;
pub mod error;
pub mod mock;
pub mod state;

pub use client::VarnishAdminClient;
pub use error::{AdminError, Result};
pub use state::{ClientConfig, ServerAddress};
