//! Group DN comparison for membership checks

use warden_core::config::GroupMatchMode;

/// Decides whether a group entry's DN matches the configured group
/// identifier.
///
/// `Exact` accepts a full-DN match, or the identifier given as the leading
/// RDNs of the entry DN (so `cn=admins` matches
/// `cn=admins,ou=groups,dc=example,dc=com`). Comparison is case-insensitive
/// and tolerant of whitespace around RDN separators.
///
/// `Suffix` reproduces the loose substring containment of older deployments
/// and should only be enabled for compatibility with them.
pub fn dn_matches_group(entry_dn: &str, group: &str, mode: GroupMatchMode) -> bool {
    let entry = normalize_dn(entry_dn);
    let group = normalize_dn(group);

    if entry.is_empty() || group.is_empty() {
        return false;
    }

    match mode {
        GroupMatchMode::Exact => {
            entry == group
                || (entry.len() > group.len()
                    && entry.starts_with(&group)
                    && entry.as_bytes()[group.len()] == b',')
        }
        GroupMatchMode::Suffix => entry.contains(&group),
    }
}

/// Lowercases a DN and strips whitespace around its RDN separators.
///
/// Only unescaped commas separate RDNs; an escaped comma (`\,`) stays part
/// of the attribute value, whitespace and all.
fn normalize_dn(dn: &str) -> String {
    let mut rdns = Vec::new();
    let mut current = String::new();
    let mut chars = dn.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ',' => rdns.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    rdns.push(current);

    rdns.iter()
        .map(|rdn| rdn.trim().to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(",")
}
