use anyhow::Result;
use warrant_auth::TokenAuthority;

use crate::cli::{OutputFormat, ValidateArgs};
use crate::output::{print_success, print_token};

pub fn validate(authority: &TokenAuthority, args: &ValidateArgs, format: OutputFormat) -> Result<()> {
    for key in &args.revoked {
        authority.revoke(key)?;
    }

    let permissions: Vec<&str> = args.permissions.iter().map(String::as_str).collect();
    match authority.validate(args.token.trim(), &permissions) {
        Ok(token) => {
            print_success(&format!("Token {} is valid", token.id));
            print_token(&token, format)
        }
        Err(e) => anyhow::bail!("Token rejected ({}): {e}", e.category()),
    }
}
