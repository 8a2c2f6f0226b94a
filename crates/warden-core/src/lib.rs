//! Warden Core Library
//!
//! Core types, configuration, and errors for the Warden directory
//! authentication service.

pub mod config;
pub mod error;
pub mod types;

pub use config::WardenConfig;
pub use error::{Error, Result};

/// Warden version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default LDAPS port
pub const DEFAULT_LDAP_PORT: u16 = 636;

/// Default LDAP protocol version
pub const DEFAULT_LDAP_VERSION: u8 = 3;

/// Default connect and operation timeout (seconds)
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
