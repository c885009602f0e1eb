use anyhow::Result;
use colored::Colorize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;
use warrant_auth::Token;

use crate::cli::OutputFormat;

pub fn print_token(token: &Token, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(token)?);
        }
        OutputFormat::Table => {
            print_as_table(token)?;
        }
    }
    Ok(())
}

pub fn print_success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn print_as_table(token: &Token) -> Result<()> {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    builder.push_record(["id".to_string(), token.id.clone()]);
    builder.push_record(["name".to_string(), token.name.clone()]);
    builder.push_record(["timestamp".to_string(), token.timestamp.to_string()]);
    builder.push_record(["validity".to_string(), token.validity.to_string()]);
    builder.push_record(["permissions".to_string(), token.permissions.join(", ")]);
    for (key, value) in &token.contents {
        builder.push_record([format!("contents.{key}"), render_value(value)?]);
    }
    println!("{}", builder.build().with(Style::rounded()));
    Ok(())
}

fn render_value(value: &Value) -> Result<String> {
    Ok(match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other)?,
    })
}
