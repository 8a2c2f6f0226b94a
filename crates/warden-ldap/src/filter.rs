//! Search filter construction
//!
//! Every value interpolated into a filter goes through `ldap3::ldap_escape`
//! so a login identifier can never smuggle additional filter clauses.

use ldap3::ldap_escape;
use warden_core::config::LdapSettings;

/// Filter matching a user entry by its login attribute.
pub fn login_filter(settings: &LdapSettings, login: &str) -> String {
    format!(
        "(&(objectClass={})({}={}))",
        ldap_escape(settings.object_class.as_str()),
        settings.login_attribute,
        ldap_escape(login)
    )
}

/// Filter matching group entries that list `dn` as a unique member.
pub fn member_filter(dn: &str) -> String {
    format!(
        "(&(objectClass=groupOfUniqueNames)(uniqueMember={}))",
        ldap_escape(dn)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_filter_uses_configured_attributes() {
        let settings = LdapSettings::default();
        assert_eq!(
            login_filter(&settings, "alice"),
            "(&(objectClass=person)(uid=alice))"
        );
    }

    #[test]
    fn login_filter_escapes_metacharacters() {
        let settings = LdapSettings::default();

        // A hostile login must stay a literal value, never widen the filter.
        let filter = login_filter(&settings, "a)(uid=*");
        assert_eq!(filter, "(&(objectClass=person)(uid=a\\29\\28uid=\\2a))");
        assert!(!filter.contains("(uid=*)"));
    }

    #[test]
    fn login_filter_escapes_backslash_and_nul() {
        let settings = LdapSettings::default();
        let filter = login_filter(&settings, "a\\b\0c");
        assert_eq!(filter, "(&(objectClass=person)(uid=a\\5cb\\00c))");
    }

    #[test]
    fn member_filter_escapes_the_dn() {
        let filter = member_filter("uid=alice,dc=example,dc=com");
        assert_eq!(
            filter,
            "(&(objectClass=groupOfUniqueNames)(uniqueMember=uid=alice,dc=example,dc=com))"
        );

        let hostile = member_filter("x)(objectClass=*");
        assert!(hostile.contains("x\\29\\28objectClass=\\2a"));
    }
}
