//! Domain types shared across Warden crates

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Directory Entry
// ============================================================================

/// A single entry returned by a directory search.
///
/// The directory hands back a loose attribute bag; this is the fixed-shape
/// view of it. Anything downstream code needs must be an explicit field here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Distinguished name of the entry.
    pub dn: String,

    /// Canonical identifier (`cn`).
    pub id: String,

    /// Display name, when the directory provides one.
    pub display_name: Option<String>,

    /// Email address (`mail`).
    pub email: Option<String>,

    /// Raw `memberOf` values, as DNs.
    pub groups: Vec<String>,

    /// Primary group token (`primaryGroupID`), Active Directory only.
    /// Carried for callers that need it; role resolution ignores it.
    pub primary_group_token: Option<String>,
}

impl DirectoryEntry {
    /// Builds an entry from a raw attribute bag.
    ///
    /// Attribute names are matched case-insensitively; directory servers do
    /// not agree on the casing they return.
    pub fn from_attrs(dn: String, attrs: &HashMap<String, Vec<String>>) -> Self {
        let id = first_attr(attrs, "cn")
            .or_else(|| first_attr(attrs, "displayName"))
            .unwrap_or_else(|| dn.clone());

        Self {
            id,
            display_name: first_attr(attrs, "displayName").or_else(|| first_attr(attrs, "name")),
            email: first_attr(attrs, "mail"),
            groups: multi_attr(attrs, "memberOf"),
            primary_group_token: first_attr(attrs, "primaryGroupID"),
            dn,
        }
    }
}

fn first_attr(attrs: &HashMap<String, Vec<String>>, name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .and_then(|(_, v)| v.first())
        .cloned()
}

fn multi_attr(attrs: &HashMap<String, Vec<String>>, name: &str) -> Vec<String> {
    attrs
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}

// ============================================================================
// Principal
// ============================================================================

/// The resolved, application-facing user.
///
/// Built from a [`DirectoryEntry`] plus role resolution; immutable and scoped
/// to a single authentication flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Canonical identifier of the user.
    pub id: String,

    /// Display name.
    pub display_name: Option<String>,

    /// Email address.
    pub email: Option<String>,

    /// Distinguished name within the directory.
    pub dn: String,

    /// Application role identifiers, deduplicated, in mapping-hit order.
    pub roles: Vec<String>,
}

// ============================================================================
// Role Mapping
// ============================================================================

/// One configured group-to-role rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    /// Directory group identifier (a group DN).
    pub group: String,

    /// Application role this group grants.
    pub role: String,
}

/// Ordered table of group-to-role rules.
///
/// Configured once at startup and read-only afterwards. Several groups may
/// grant the same role; resolution deduplicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleMapping(Vec<RoleRule>);

impl RoleMapping {
    pub fn new(rules: Vec<RoleRule>) -> Self {
        Self(rules)
    }

    /// Convenience constructor from `(group, role)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(group, role)| RoleRule {
                    group: group.into(),
                    role: role.into(),
                })
                .collect(),
        )
    }

    /// Role granted by a group, if the group is mapped. First rule wins.
    pub fn role_for(&self, group: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|rule| rule.group == group)
            .map(|rule| rule.role.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleRule> {
        self.0.iter()
    }
}
