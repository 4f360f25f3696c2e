//! Subcommand implementations.

mod login;
mod logout;
mod register;
mod status;

use anyhow::Result;
use clap::Subcommand;

use crate::cli::ConfigArgs;
use crate::session;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Exchange a username and password for an access token
    Login(login::LoginArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Create a new user (does not log in)
    Register(register::RegisterArgs),

    /// Display the stored session
    Status(status::StatusArgs),
}

pub async fn handle(cmd: Command, config: &ConfigArgs) -> Result<()> {
    match cmd {
        Command::Login(args) => login::run(&session::open_store(config)?, args).await,
        Command::Register(args) => register::run(&session::open_store(config)?, args).await,
        // These never reach the API, so a bad --api-url does not stop them.
        Command::Logout(args) => logout::run(&session::open_local_store(config)?, args).await,
        Command::Status(args) => status::run(&session::open_local_store(config)?, args).await,
    }
}
