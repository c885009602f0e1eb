use anyhow::{Context, Result};
use serde_json::Value;
use warrant_auth::{TokenAuthority, TokenRequest};

use crate::cli::{IssueArgs, OutputFormat};
use crate::output::print_token;

/// Splits `key=value`, parsing the value as JSON and falling back to a plain string.
pub fn parse_claim(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid claim \"{raw}\". Expected format: key=value"))?;
    if key.is_empty() {
        anyhow::bail!("Invalid claim \"{raw}\": key must not be empty");
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub fn issue(authority: &TokenAuthority, args: &IssueArgs, format: OutputFormat) -> Result<()> {
    let mut request = TokenRequest::new(&args.name).permissions(args.permissions.iter().cloned());
    for raw in &args.claims {
        let (key, value) = parse_claim(raw)?;
        request = request.claim(key, value);
    }
    if let Some(validity) = args.validity {
        request = request.validity(validity);
    }

    let issued = authority.issue(request);
    println!("{}", issued.encoded);
    print_token(&issued.token, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn claim_values_are_json_when_possible() {
        assert_eq!(parse_claim("n=42").unwrap(), ("n".to_string(), json!(42)));
        assert_eq!(parse_claim("ok=true").unwrap(), ("ok".to_string(), json!(true)));
        assert_eq!(
            parse_claim(r#"obj={"a":[1,2]}"#).unwrap(),
            ("obj".to_string(), json!({"a": [1, 2]}))
        );
    }

    #[test]
    fn claim_values_fall_back_to_strings() {
        assert_eq!(
            parse_claim("host=db-1").unwrap(),
            ("host".to_string(), json!("db-1"))
        );
        assert_eq!(
            parse_claim("expr=a=b").unwrap(),
            ("expr".to_string(), json!("a=b"))
        );
        assert_eq!(parse_claim("empty=").unwrap(), ("empty".to_string(), json!("")));
    }

    #[test]
    fn malformed_claims_are_rejected() {
        assert!(parse_claim("no-separator").is_err());
        assert!(parse_claim("=value").is_err());
    }
}
