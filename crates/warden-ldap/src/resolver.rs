//! Group-to-role resolution
//!
//! Pure functions, no directory access: resolution must be testable without
//! a live server and produce the same output for the same input every time.

use warden_core::types::{DirectoryEntry, Principal, RoleMapping};

/// Maps raw group values to application roles.
///
/// Groups are considered in input order; a group grants a role only through
/// a direct match in the mapping, and each role appears at most once. Unknown
/// groups are skipped, an empty input yields an empty result.
pub fn resolve_roles(groups: &[String], mapping: &RoleMapping) -> Vec<String> {
    let mut roles = Vec::new();

    for group in groups {
        if let Some(role) = mapping.role_for(group) {
            if !roles.iter().any(|r| r == role) {
                roles.push(role.to_string());
            }
        }
    }

    roles
}

/// Builds the application-facing principal from a directory entry.
pub fn resolve_principal(entry: &DirectoryEntry, mapping: &RoleMapping) -> Principal {
    Principal {
        id: entry.id.clone(),
        display_name: entry.display_name.clone(),
        email: entry.email.clone(),
        dn: entry.dn.clone(),
        roles: resolve_roles(&entry.groups, mapping),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn mapping() -> RoleMapping {
        RoleMapping::from_pairs([
            ("cn=admins,dc=example,dc=com", "admin"),
            ("cn=staff,dc=example,dc=com", "user"),
            ("cn=ops,dc=example,dc=com", "admin"),
        ])
    }

    #[test]
    fn only_mapped_groups_grant_roles() {
        let roles = resolve_roles(
            &groups(&[
                "cn=admins,dc=example,dc=com",
                "cn=unmapped,dc=example,dc=com",
            ]),
            &mapping(),
        );

        assert_eq!(roles, vec!["admin"]);
    }

    #[test]
    fn duplicate_roles_are_deduplicated() {
        // admins and ops both grant "admin".
        let roles = resolve_roles(
            &groups(&[
                "cn=admins,dc=example,dc=com",
                "cn=ops,dc=example,dc=com",
                "cn=staff,dc=example,dc=com",
            ]),
            &mapping(),
        );

        assert_eq!(roles, vec!["admin", "user"]);
    }

    #[test]
    fn order_follows_the_input_groups() {
        let roles = resolve_roles(
            &groups(&[
                "cn=staff,dc=example,dc=com",
                "cn=admins,dc=example,dc=com",
            ]),
            &mapping(),
        );

        assert_eq!(roles, vec!["user", "admin"]);
    }

    #[test]
    fn empty_inputs_yield_empty_results() {
        assert!(resolve_roles(&[], &mapping()).is_empty());
        assert!(resolve_roles(
            &groups(&["cn=admins,dc=example,dc=com"]),
            &RoleMapping::default()
        )
        .is_empty());
    }

    #[test]
    fn resolution_is_idempotent() {
        let input = groups(&["cn=admins,dc=example,dc=com", "cn=staff,dc=example,dc=com"]);
        let first = resolve_roles(&input, &mapping());
        let second = resolve_roles(&input, &mapping());

        assert_eq!(first, second);
    }

    #[test]
    fn principal_carries_entry_fields_and_roles() {
        let entry = DirectoryEntry {
            dn: "uid=alice,dc=example,dc=com".to_string(),
            id: "alice".to_string(),
            display_name: Some("Alice Liddell".to_string()),
            email: Some("alice@example.com".to_string()),
            groups: groups(&["cn=admins,dc=example,dc=com"]),
            primary_group_token: None,
        };

        let principal = resolve_principal(&entry, &mapping());

        assert_eq!(principal.id, "alice");
        assert_eq!(principal.dn, "uid=alice,dc=example,dc=com");
        assert_eq!(principal.roles, vec!["admin"]);
    }
}
