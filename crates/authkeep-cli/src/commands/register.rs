//! Register command implementation.

use anyhow::{Context, Result, anyhow};
use clap::Args;
use colored::Colorize;

use authkeep_core::RegistrationForm;

use crate::output;
use crate::session::CliStore;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username for the new account
    #[arg(long)]
    pub username: String,

    /// Password for the new account
    #[arg(long)]
    pub password: String,

    /// Extra registration field as key=value (repeatable)
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

fn parse_field(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", s))?;

    if key.is_empty() {
        return Err(anyhow!("field name must not be empty"));
    }

    Ok((key.to_string(), value.to_string()))
}

pub async fn run(store: &CliStore, args: RegisterArgs) -> Result<()> {
    let form = args
        .fields
        .into_iter()
        .fold(
            RegistrationForm::new(&args.username, &args.password),
            |form, (key, value)| form.with_field(key, value),
        );

    eprintln!("{}", "Registering...".dimmed());

    let payload = store.register(form).await.context("Failed to register")?;

    output::success(&format!("Registered {}", args.username));
    if !payload.is_null() {
        output::json_pretty(&payload)?;
    }
    output::hint("Run 'authkeep login' to start a session.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_fields() {
        assert_eq!(
            parse_field("email=bob@example.com").unwrap(),
            ("email".to_string(), "bob@example.com".to_string())
        );
        assert_eq!(
            parse_field("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn rejects_malformed_fields() {
        assert!(parse_field("email").is_err());
        assert!(parse_field("=value").is_err());
    }
}
