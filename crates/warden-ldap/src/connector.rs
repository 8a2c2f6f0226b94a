//! LDAP session management and protocol operations
//!
//! One connector owns at most one live directory session, established
//! lazily and bound as the service account. Every protocol operation
//! serializes on the session mutex, so a connector can be shared across
//! tasks; the rebind used for credential verification and the restoring
//! service bind run under a single lock acquisition.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use warden_core::config::LdapSettings;
use warden_core::types::DirectoryEntry;
use warden_core::{Error, Result};

use crate::filter;
use crate::membership;

/// Attributes requested when looking up a user entry.
const LOOKUP_ATTRS: [&str; 6] = ["cn", "name", "displayName", "mail", "memberOf", "primaryGroupID"];

/// LDAP result code for invalid credentials.
const RC_INVALID_CREDENTIALS: u32 = 49;

/// Directory-reported outcome of a bind: result code and message.
#[derive(Debug, Clone)]
pub struct BindOutcome {
    pub rc: u32,
    pub text: String,
}

/// A search hit: entry DN plus its attribute bag.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub dn: String,
    pub attrs: HashMap<String, Vec<String>>,
}

/// Protocol operations of a live directory session.
///
/// [`LdapSession`] is the wire implementation; tests substitute a scripted
/// session so bind ordering and identity restoration can be checked without
/// a server.
#[async_trait]
pub trait DirectorySession: Send + Sized {
    /// Opens a transport connection. Does not bind.
    async fn connect(settings: &LdapSettings) -> Result<Self>;

    async fn simple_bind(&mut self, dn: &str, password: &str, timeout: Duration)
        -> Result<BindOutcome>;

    async fn search(
        &mut self,
        base: &str,
        scope: Scope,
        filter: &str,
        attrs: &[&str],
        timeout: Duration,
    ) -> Result<Vec<RawEntry>>;

    async fn unbind(&mut self);
}

/// Live session backed by `ldap3`.
pub struct LdapSession {
    ldap: Ldap,
}

#[async_trait]
impl DirectorySession for LdapSession {
    async fn connect(settings: &LdapSettings) -> Result<Self> {
        let url = settings.server_url();
        debug!(url = %url, "connecting to directory server");

        let conn_settings =
            LdapConnSettings::new().set_conn_timeout(settings.connect_timeout());

        let (conn, ldap) = LdapConnAsync::with_settings(conn_settings, &url)
            .await
            .map_err(|e| Error::connection(format!("unable to connect to {}: {}", url, e)))?;

        ldap3::drive!(conn);

        Ok(Self { ldap })
    }

    async fn simple_bind(
        &mut self,
        dn: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<BindOutcome> {
        let res = self
            .ldap
            .with_timeout(timeout)
            .simple_bind(dn, password)
            .await
            .map_err(|e| Error::connection(format!("bind failed: {}", e)))?;

        Ok(BindOutcome {
            rc: res.rc,
            text: res.text,
        })
    }

    async fn search(
        &mut self,
        base: &str,
        scope: Scope,
        filter: &str,
        attrs: &[&str],
        timeout: Duration,
    ) -> Result<Vec<RawEntry>> {
        let (entries, _res) = self
            .ldap
            .with_timeout(timeout)
            .search(base, scope, filter, attrs.to_vec())
            .await
            .map_err(|e| Error::search(e.to_string()))?
            .success()
            .map_err(|e| Error::search(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(|raw| {
                let entry = SearchEntry::construct(raw);
                RawEntry {
                    dn: entry.dn,
                    attrs: entry.attrs,
                }
            })
            .collect())
    }

    async fn unbind(&mut self) {
        let _ = self.ldap.unbind().await;
    }
}

/// Connector to the directory server.
///
/// Owns the session lifecycle: lazy connect, service-account bind, search,
/// and the re-bind used to verify end-user passwords.
pub struct LdapConnector<S: DirectorySession = LdapSession> {
    settings: Arc<LdapSettings>,
    session: Mutex<Option<S>>,
}

impl<S: DirectorySession> LdapConnector<S> {
    /// Creates a connector from validated settings.
    pub fn new(settings: LdapSettings) -> Result<Self> {
        settings.validate()?;

        if settings.ldap_version != 3 {
            return Err(Error::config(format!(
                "unsupported LDAP protocol version {}, only version 3 is supported",
                settings.ldap_version
            )));
        }
        if settings.follow_referrals {
            warn!("follow_referrals is set but referral chasing is not supported; referrals will be returned unresolved");
        }

        Ok(Self {
            settings: Arc::new(settings),
            session: Mutex::new(None),
        })
    }

    /// Returns the connector settings.
    pub fn settings(&self) -> &Arc<LdapSettings> {
        &self.settings
    }

    /// Tears down the session. The next operation reconnects lazily.
    pub async fn close(&self) {
        let mut guard = self.session.lock().await;
        if let Some(mut session) = guard.take() {
            session.unbind().await;
        }
    }

    /// Looks up the entry whose login attribute equals `login`.
    ///
    /// The login is escaped before filter construction; metacharacters in it
    /// cannot widen the search. Returns `Ok(None)` when nothing matches.
    pub async fn find_by_login(&self, login: &str) -> Result<Option<DirectoryEntry>> {
        let search_filter = filter::login_filter(&self.settings, login);
        debug!(filter = %search_filter, "searching directory for login");

        let mut guard = self.session.lock().await;
        let mut session = match guard.take() {
            Some(session) => session,
            None => self.open_session().await?,
        };

        let entries = match session
            .search(
                &self.settings.base_dn,
                Scope::Subtree,
                &search_filter,
                &LOOKUP_ATTRS,
                self.settings.operation_timeout(),
            )
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                // Session may be poisoned; drop it so the next call reconnects.
                session.unbind().await;
                return Err(e);
            }
        };

        *guard = Some(session);

        Ok(entries
            .into_iter()
            .next()
            .map(|raw| DirectoryEntry::from_attrs(raw.dn, &raw.attrs)))
    }

    /// Verifies `password` for the entry at `dn` by re-binding as that DN,
    /// optionally also requiring membership in `required_group`.
    ///
    /// An empty or rejected password is a plain `false`; the caller cannot
    /// tell a wrong password from an unknown DN. Whatever the outcome, the
    /// session leaves this method bound as the service account again (or torn
    /// down entirely if that restore fails).
    pub async fn verify_credentials(
        &self,
        dn: &str,
        password: &str,
        required_group: Option<&str>,
    ) -> Result<bool> {
        // An empty password would turn the bind into an unauthenticated bind,
        // which many servers accept.
        if password.is_empty() {
            return Ok(false);
        }

        let mut guard = self.session.lock().await;
        let mut session = match guard.take() {
            Some(session) => session,
            None => self.open_session().await?,
        };

        let timeout = self.settings.operation_timeout();

        let bound = match session.simple_bind(dn, password, timeout).await {
            Ok(res) => {
                if res.rc != 0 && res.rc != RC_INVALID_CREDENTIALS {
                    debug!(rc = res.rc, "user bind rejected");
                }
                res.rc == 0
            }
            Err(e) => {
                session.unbind().await;
                return Err(e);
            }
        };

        // Restore the service identity before anything else touches the
        // session. A verification bind must never persist as the connector's
        // ambient identity.
        match session
            .simple_bind(&self.settings.bind_dn, &self.settings.bind_password, timeout)
            .await
        {
            Ok(res) if res.rc == 0 => {}
            Ok(res) => {
                session.unbind().await;
                return Err(Error::service_bind(format!(
                    "restoring service identity failed, code {}: {}",
                    res.rc, res.text
                )));
            }
            Err(e) => {
                session.unbind().await;
                return Err(Error::service_bind(format!(
                    "restoring service identity failed: {}",
                    e
                )));
            }
        }

        if !bound {
            *guard = Some(session);
            return Ok(false);
        }

        let verdict = match required_group {
            None => Ok(true),
            Some(group) => self.is_member(&mut session, dn, group).await,
        };

        match verdict {
            Ok(is_member) => {
                *guard = Some(session);
                Ok(is_member)
            }
            Err(e) => {
                session.unbind().await;
                Err(e)
            }
        }
    }

    /// Checks whether the entry at `dn` belongs to `group` by searching
    /// `groupOfUniqueNames` entries listing it as a unique member.
    ///
    /// Runs with service-account privilege on an already-restored session.
    async fn is_member(&self, session: &mut S, dn: &str, group: &str) -> Result<bool> {
        let search_filter = filter::member_filter(dn);
        debug!(filter = %search_filter, "searching for group membership");

        let entries = session
            .search(
                &self.settings.base_dn,
                Scope::Subtree,
                &search_filter,
                &["dn"],
                self.settings.operation_timeout(),
            )
            .await?;

        Ok(entries
            .into_iter()
            .any(|raw| membership::dn_matches_group(&raw.dn, group, self.settings.group_match)))
    }

    /// Binds as the service account and reads the root DSE.
    pub async fn test_connection(&self) -> Result<ServerInfo> {
        let mut guard = self.session.lock().await;
        let mut session = match guard.take() {
            Some(session) => session,
            None => self.open_session().await?,
        };

        let entries = match session
            .search(
                "",
                Scope::Base,
                "(objectClass=*)",
                &[
                    "vendorName",
                    "vendorVersion",
                    "namingContexts",
                    "supportedLDAPVersion",
                ],
                self.settings.operation_timeout(),
            )
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                session.unbind().await;
                return Err(e);
            }
        };

        *guard = Some(session);

        let info = match entries.into_iter().next() {
            Some(entry) => ServerInfo {
                vendor: entry.attrs.get("vendorName").and_then(|v| v.first().cloned()),
                version: entry
                    .attrs
                    .get("vendorVersion")
                    .and_then(|v| v.first().cloned()),
                naming_contexts: entry
                    .attrs
                    .get("namingContexts")
                    .cloned()
                    .unwrap_or_default(),
                supported_ldap_version: entry
                    .attrs
                    .get("supportedLDAPVersion")
                    .cloned()
                    .unwrap_or_default(),
            },
            None => ServerInfo::default(),
        };

        Ok(info)
    }

    /// Opens a new session: connect, then bind the service account.
    ///
    /// Only called when no session exists; reuse is checked first at every
    /// call site, under the session lock.
    async fn open_session(&self) -> Result<S> {
        let mut session = S::connect(&self.settings).await?;

        let res = session
            .simple_bind(
                &self.settings.bind_dn,
                &self.settings.bind_password,
                self.settings.operation_timeout(),
            )
            .await?;

        if res.rc != 0 {
            session.unbind().await;
            return Err(Error::service_bind(format!(
                "unable to bind service account, code {}: {}",
                res.rc, res.text
            )));
        }

        debug!("directory session established");
        Ok(session)
    }
}

/// Root DSE details reported by [`LdapConnector::test_connection`].
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub naming_contexts: Vec<String>,
    pub supported_ldap_version: Vec<String>,
}
