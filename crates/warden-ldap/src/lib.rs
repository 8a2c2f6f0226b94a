//! LDAP directory authentication module
//!
//! Authenticates end users against an LDAP directory and maps their group
//! membership to application roles.
//!
//! Flow:
//! - Bind lazily as the service account and keep one session per connector
//! - Look up the entry whose login attribute matches the supplied identifier
//! - Verify a candidate password by re-binding as the entry's DN, then
//!   restore the service identity before the session is reused
//! - Resolve roles from `memberOf` values through the configured mapping

mod connector;
mod filter;
mod membership;
mod provider;
mod resolver;

pub use connector::{BindOutcome, DirectorySession, LdapConnector, LdapSession, RawEntry, ServerInfo};
pub use membership::dn_matches_group;
pub use provider::{DirectoryAuth, DirectoryAuthProvider};
pub use resolver::{resolve_principal, resolve_roles};
