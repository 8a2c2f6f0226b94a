//! Configuration for Warden

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::RoleMapping;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    #[serde(default)]
    pub ldap: LdapSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WardenConfig {
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| crate::Error::config(format!("Failed to parse config: {}", e)))
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("WARDEN_LDAP_HOST") {
            config.ldap.host = host;
        }
        if let Ok(port) = std::env::var("WARDEN_LDAP_PORT") {
            if let Ok(p) = port.parse() {
                config.ldap.port = p;
            }
        }
        if let Ok(protocol) = std::env::var("WARDEN_LDAP_PROTOCOL") {
            config.ldap.protocol = protocol;
        }
        if let Ok(dn) = std::env::var("WARDEN_LDAP_BASE_DN") {
            config.ldap.base_dn = dn;
        }
        if let Ok(dn) = std::env::var("WARDEN_LDAP_BIND_DN") {
            config.ldap.bind_dn = dn;
        }
        if let Ok(password) = std::env::var("WARDEN_LDAP_BIND_PASSWORD") {
            config.ldap.bind_password = password;
        }
        if let Ok(enabled) = std::env::var("WARDEN_LDAP_ENABLED") {
            config.ldap.enabled = enabled == "true" || enabled == "1";
        }
        if let Ok(level) = std::env::var("WARDEN_LOG_LEVEL") {
            config.logging.level = level;
        }

        config
    }
}

/// LDAP Connector Configuration Section
///
/// Built once at startup and never mutated; the connector only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdapSettings {
    /// Enable directory authentication
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Protocol scheme, `ldaps://` or `ldap://`
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Directory server host
    #[serde(default)]
    pub host: String,

    /// Directory server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// LDAP protocol version
    #[serde(default = "default_ldap_version")]
    pub ldap_version: u8,

    /// Whether to follow referrals
    #[serde(default)]
    pub follow_referrals: bool,

    /// Connect timeout in seconds
    #[serde(default = "default_timeout")]
    pub connect_timeout_seconds: u64,

    /// Operation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Base DN for all searches
    #[serde(default)]
    pub base_dn: String,

    /// Object class of user entries
    #[serde(default = "default_object_class")]
    pub object_class: String,

    /// Attribute matched against the login identifier
    #[serde(default = "default_login_attribute")]
    pub login_attribute: String,

    /// Service account DN used for searches
    #[serde(default)]
    pub bind_dn: String,

    /// Service account password
    #[serde(default, skip_serializing)]
    pub bind_password: String,

    /// Group-to-role rules, in precedence order
    #[serde(default)]
    pub role_mappings: RoleMapping,

    /// How group DNs are compared in membership checks
    #[serde(default)]
    pub group_match: GroupMatchMode,
}

/// Comparison policy for group membership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMatchMode {
    /// Exact DN match, or the group given as a leading RDN of the entry DN.
    #[default]
    Exact,

    /// Loose suffix/substring match. Compatibility mode only: it can match
    /// unrelated groups whose DN happens to contain the configured string.
    Suffix,
}

fn default_enabled() -> bool {
    true
}

fn default_protocol() -> String {
    "ldaps://".to_string()
}

fn default_port() -> u16 {
    crate::DEFAULT_LDAP_PORT
}

fn default_ldap_version() -> u8 {
    crate::DEFAULT_LDAP_VERSION
}

fn default_timeout() -> u64 {
    crate::DEFAULT_TIMEOUT_SECONDS
}

fn default_object_class() -> String {
    "person".to_string()
}

fn default_login_attribute() -> String {
    "uid".to_string()
}

impl Default for LdapSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            protocol: default_protocol(),
            host: String::new(),
            port: default_port(),
            ldap_version: default_ldap_version(),
            follow_referrals: false,
            connect_timeout_seconds: default_timeout(),
            timeout_seconds: default_timeout(),
            base_dn: String::new(),
            object_class: default_object_class(),
            login_attribute: default_login_attribute(),
            bind_dn: String::new(),
            bind_password: String::new(),
            role_mappings: RoleMapping::default(),
            group_match: GroupMatchMode::default(),
        }
    }
}

impl LdapSettings {
    /// Full server URL, e.g. `ldaps://ldap.example.com:636`.
    pub fn server_url(&self) -> String {
        format!("{}{}:{}", self.protocol, self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> crate::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.host.is_empty() {
            return Err(crate::Error::config("LDAP host is required"));
        }

        if self.protocol != "ldaps://" && self.protocol != "ldap://" {
            return Err(crate::Error::config(
                "LDAP protocol must be ldap:// or ldaps://",
            ));
        }

        if self.base_dn.is_empty() {
            return Err(crate::Error::config("LDAP base DN is required"));
        }

        if self.bind_dn.is_empty() {
            return Err(crate::Error::config("LDAP service account DN is required"));
        }

        if self.login_attribute.is_empty() {
            return Err(crate::Error::config("LDAP login attribute is required"));
        }

        Ok(())
    }
}

/// Logging Configuration Section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_directory_conventions() {
        let settings = LdapSettings::default();

        assert!(settings.enabled);
        assert_eq!(settings.protocol, "ldaps://");
        assert_eq!(settings.port, 636);
        assert_eq!(settings.ldap_version, 3);
        assert!(!settings.follow_referrals);
        assert_eq!(settings.object_class, "person");
        assert_eq!(settings.login_attribute, "uid");
        assert_eq!(settings.connect_timeout(), Duration::from_secs(10));
        assert_eq!(settings.operation_timeout(), Duration::from_secs(10));
        assert_eq!(settings.group_match, GroupMatchMode::Exact);
    }

    #[test]
    fn server_url_rendering() {
        let settings = LdapSettings {
            host: "ldap.example.com".to_string(),
            ..Default::default()
        };

        assert_eq!(settings.server_url(), "ldaps://ldap.example.com:636");
    }

    #[test]
    fn validation_requires_host_base_and_bind_dn() {
        let mut settings = LdapSettings::default();
        assert!(settings.validate().is_err());

        settings.host = "ldap.example.com".to_string();
        assert!(settings.validate().is_err());

        settings.base_dn = "dc=example,dc=com".to_string();
        assert!(settings.validate().is_err());

        settings.bind_dn = "cn=search,dc=example,dc=com".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validation_rejects_unknown_scheme() {
        let settings = LdapSettings {
            host: "ldap.example.com".to_string(),
            base_dn: "dc=example,dc=com".to_string(),
            bind_dn: "cn=search,dc=example,dc=com".to_string(),
            protocol: "http://".to_string(),
            ..Default::default()
        };

        assert!(settings.validate().is_err());
    }

    #[test]
    fn disabled_settings_skip_validation() {
        let settings = LdapSettings {
            enabled: false,
            ..Default::default()
        };

        assert!(settings.validate().is_ok());
    }

    #[test]
    fn config_parses_role_mappings_in_order() {
        let toml = r#"
            [ldap]
            host = "ldap.example.com"
            base_dn = "dc=example,dc=com"
            bind_dn = "cn=search,dc=example,dc=com"
            bind_password = "secret"

            [[ldap.role_mappings]]
            group = "cn=admins,dc=example,dc=com"
            role = "admin"

            [[ldap.role_mappings]]
            group = "cn=staff,dc=example,dc=com"
            role = "user"
        "#;

        let config: WardenConfig = toml::from_str(toml).unwrap();
        let rules: Vec<_> = config.ldap.role_mappings.iter().collect();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].role, "admin");
        assert_eq!(rules[1].role, "user");
        assert!(config.ldap.validate().is_ok());
    }

    #[test]
    fn group_match_mode_parses_from_config() {
        let toml = r#"
            [ldap]
            host = "ldap.example.com"
            base_dn = "dc=example,dc=com"
            bind_dn = "cn=search,dc=example,dc=com"
            group_match = "suffix"
        "#;

        let config: WardenConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.ldap.group_match, GroupMatchMode::Suffix);
    }
}
