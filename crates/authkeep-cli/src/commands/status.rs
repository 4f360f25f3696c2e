//! Status command implementation.

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use authkeep_core::SessionState;

use crate::output;
use crate::session::LocalStore;

const REDACTED: &str = "[REDACTED]";

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print the session as JSON
    #[arg(long)]
    pub json: bool,

    /// Include the access token in JSON output
    #[arg(long, requires = "json")]
    pub show_token: bool,
}

pub async fn run(store: &LocalStore, args: StatusArgs) -> Result<()> {
    let state = store.state();

    if args.json {
        return output::json_pretty(&state_json(&state, args.show_token)?);
    }

    match state.user() {
        Some(user) => {
            output::field("Logged in", "yes");
            if let Some(username) = user.username() {
                output::field("Username", username);
            }
            if let Some(token_type) = user.token_type() {
                output::field("Token type", token_type);
            }
            for (claim, value) in user.claims() {
                if matches!(claim.as_str(), "username" | "token_type") && value.is_string() {
                    continue;
                }
                output::field(claim, &value.to_string());
            }
        }
        None => {
            output::field("Logged in", "no");
            output::hint("Run 'authkeep login' to start a session.");
        }
    }

    Ok(())
}

/// Render the state as `{"loggedIn": .., "user": ..}`, masking the token
/// unless asked not to.
fn state_json(state: &SessionState, show_token: bool) -> Result<Value> {
    let mut json = serde_json::to_value(state)?;

    if !show_token
        && let Some(token) = json
            .get_mut("user")
            .and_then(|user| user.get_mut("access_token"))
    {
        *token = Value::String(REDACTED.to_string());
    }

    Ok(json)
}
