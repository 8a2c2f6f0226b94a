//! lookup command - resolve a login identifier to a principal

use anyhow::Result;
use colored::Colorize;
use warden_ldap::{DirectoryAuth, DirectoryAuthProvider};

pub async fn execute(provider: &DirectoryAuthProvider, login: &str, json: bool) -> Result<()> {
    let principal = match provider.find_by_login(login).await? {
        Some(principal) => principal,
        None => {
            println!("{}", "No matching entry".yellow());
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&principal)?);
        return Ok(());
    }

    println!("{}: {}", "Id".bold(), principal.id);
    println!("{}: {}", "DN".bold(), principal.dn);
    if let Some(name) = &principal.display_name {
        println!("{}: {}", "Name".bold(), name);
    }
    if let Some(email) = &principal.email {
        println!("{}: {}", "Email".bold(), email);
    }
    println!(
        "{}: {}",
        "Roles".bold(),
        if principal.roles.is_empty() {
            "(none)".to_string()
        } else {
            principal.roles.join(", ")
        }
    );

    Ok(())
}
