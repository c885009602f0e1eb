use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use warrant_auth::{AuthorityConfig, ConfigError};

/// Loads the authority configuration, falling back to defaults without a file.
pub fn load(path: Option<&Path>) -> Result<AuthorityConfig> {
    match path {
        Some(path) => AuthorityConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(AuthorityConfig::default()),
    }
}

/// Resolves the signing secret.
///
/// Order: secret file, then the literal secret. A trailing newline in the
/// file is not part of the secret.
pub fn resolve_secret(secret: Option<&str>, secret_file: Option<&Path>) -> Result<Vec<u8>> {
    if let Some(path) = secret_file {
        let mut bytes = fs::read(path)
            .with_context(|| format!("Failed to read secret file: {}", path.display()))?;
        while matches!(bytes.last(), Some(b'\n' | b'\r')) {
            bytes.pop();
        }
        if bytes.is_empty() {
            anyhow::bail!("Secret file {} is empty", path.display());
        }
        return Ok(bytes);
    }

    match secret {
        Some(s) if !s.is_empty() => Ok(s.as_bytes().to_vec()),
        _ => Err(ConfigError::Missing(
            "secret (use --secret-file, WARRANT_SECRET_FILE or WARRANT_SECRET)".to_string(),
        )
        .into()),
    }
}
