//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::LocalStore;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(store: &LocalStore, _args: LogoutArgs) -> Result<()> {
    let was_logged_in = store.is_logged_in();

    store.logout().await;

    if was_logged_in {
        output::success("Logged out");
    } else {
        output::success("No active session");
    }

    Ok(())
}
