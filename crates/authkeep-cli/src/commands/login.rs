//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use authkeep_core::Credentials;

use crate::output;
use crate::session::CliStore;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username to authenticate as
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Space-separated scopes to request
    #[arg(long)]
    pub scope: Option<String>,
}

pub async fn run(store: &CliStore, args: LoginArgs) -> Result<()> {
    let mut credentials = Credentials::new(&args.username, &args.password);
    if let Some(scope) = args.scope {
        credentials = credentials.with_scope(scope);
    }

    eprintln!("{}", "Logging in...".dimmed());

    let user = store.login(credentials).await.context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("Username", user.username().unwrap_or(&args.username));
    if let Some(token_type) = user.token_type() {
        output::field("Token type", token_type);
    }

    Ok(())
}
