//! check command - test the directory connection

use anyhow::Result;
use colored::Colorize;
use warden_ldap::DirectoryAuthProvider;

pub async fn execute(provider: &DirectoryAuthProvider) -> Result<()> {
    let settings = provider.connector().settings().clone();

    println!("Server: {}", settings.server_url().cyan());

    if !provider.is_enabled() {
        println!("{}", "Directory authentication is disabled".yellow());
        return Ok(());
    }

    let info = provider.connector().test_connection().await?;

    println!("{}", "Connection successful".green());
    if let Some(vendor) = &info.vendor {
        println!("  Vendor: {}", vendor);
    }
    if let Some(version) = &info.version {
        println!("  Version: {}", version);
    }
    if !info.naming_contexts.is_empty() {
        println!("  Naming contexts: {}", info.naming_contexts.join(", "));
    }
    if !info.supported_ldap_version.is_empty() {
        println!(
            "  Supported LDAP versions: {}",
            info.supported_ldap_version.join(", ")
        );
    }

    Ok(())
}
