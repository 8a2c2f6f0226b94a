//! login command - verify a user's credentials
//!
//! Lookup failures and wrong passwords produce the same generic message so
//! the command cannot be used to discover which logins exist.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use warden_ldap::{DirectoryAuth, DirectoryAuthProvider};

pub async fn execute(
    provider: &DirectoryAuthProvider,
    login: &str,
    require_group: Option<&str>,
) -> Result<()> {
    print!("Password: ");
    io::stdout().flush()?;

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);

    let verified = match provider.find_by_login(login).await? {
        Some(principal) => {
            provider
                .verify_credentials(&principal.dn, password, require_group)
                .await?
        }
        None => false,
    };

    if !verified {
        println!("{}", "Authentication failed".red());
        std::process::exit(1);
    }

    println!("{}", "Authentication succeeded".green());
    Ok(())
}
