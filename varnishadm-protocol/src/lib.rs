//! Varnish admin (CLI) protocol types, commands, and response parsing.
//!
//! This crate provides the shared protocol layer for the text-based
//! management interface exposed by `varnishd`, used by the client crate.

pub mod auth;
pub mod command;
pub mod error;
pub mod response;
pub mod status;
pub mod version;

pub use command::Command;
pub use error::{CliError, Result};
pub use response::ResponseFrame;
pub use status::StatusCode;
pub use version::ProtocolVersion;
