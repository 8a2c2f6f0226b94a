//! Error types for Warden

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Connector Errors
    #[error("LDAP connection failed: {0}")]
    Connection(String),

    #[error("LDAP service account bind failed: {0}")]
    ServiceBind(String),

    #[error("LDAP search failed: {0}")]
    Search(String),

    // Configuration Errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Directory authentication is disabled")]
    Disabled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn connection(msg: impl Into<String>) -> Self {
        Error::Connection(msg.into())
    }

    pub fn service_bind(msg: impl Into<String>) -> Self {
        Error::ServiceBind(msg.into())
    }

    pub fn search(msg: impl Into<String>) -> Self {
        Error::Search(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Whether the error indicates the directory itself is unreachable or
    /// misconfigured, as opposed to a per-request failure.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Connection(_) | Error::ServiceBind(_) | Error::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(Error::connection("refused").is_fatal());
        assert!(Error::service_bind("code 49").is_fatal());
        assert!(Error::config("missing host").is_fatal());
        assert!(!Error::search("bad filter").is_fatal());
        assert!(!Error::Disabled.is_fatal());
    }
}
