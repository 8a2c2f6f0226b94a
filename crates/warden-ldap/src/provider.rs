//! Directory authentication surface
//!
//! The two-method boundary the surrounding application consumes: principal
//! lookup by login identifier, credential verification by DN and password.
//! Applications adapt this to their own user/session abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use warden_core::config::LdapSettings;
use warden_core::types::Principal;
use warden_core::{Error, Result};

use crate::connector::LdapConnector;
use crate::resolver;

/// Capability boundary for directory authentication.
#[async_trait]
pub trait DirectoryAuth: Send + Sync {
    /// Resolves a login identifier into a full principal, roles included.
    async fn find_by_login(&self, login: &str) -> Result<Option<Principal>>;

    /// Validates a submitted password for the entry at `dn`, optionally
    /// requiring membership in `required_group`.
    async fn verify_credentials(
        &self,
        dn: &str,
        password: &str,
        required_group: Option<&str>,
    ) -> Result<bool>;
}

/// Directory authentication backed by [`LdapConnector`].
pub struct DirectoryAuthProvider {
    connector: Arc<LdapConnector>,
}

impl DirectoryAuthProvider {
    pub fn new(settings: LdapSettings) -> Result<Self> {
        Ok(Self {
            connector: Arc::new(LdapConnector::new(settings)?),
        })
    }

    /// Underlying connector, for lifecycle operations such as
    /// [`LdapConnector::test_connection`] and [`LdapConnector::close`].
    pub fn connector(&self) -> Arc<LdapConnector> {
        self.connector.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.connector.settings().enabled
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.is_enabled() {
            Ok(())
        } else {
            Err(Error::Disabled)
        }
    }
}

#[async_trait]
impl DirectoryAuth for DirectoryAuthProvider {
    async fn find_by_login(&self, login: &str) -> Result<Option<Principal>> {
        self.ensure_enabled()?;

        let entry = self.connector.find_by_login(login).await?;
        let mapping = &self.connector.settings().role_mappings;

        Ok(entry.map(|entry| resolver::resolve_principal(&entry, mapping)))
    }

    async fn verify_credentials(
        &self,
        dn: &str,
        password: &str,
        required_group: Option<&str>,
    ) -> Result<bool> {
        self.ensure_enabled()?;

        self.connector
            .verify_credentials(dn, password, required_group)
            .await
    }
}
