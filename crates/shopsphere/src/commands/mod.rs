//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod util;
pub mod wishlist;

use shopsphere_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    resolved: Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Wishlist(args) => wishlist::handle(session, &resolved, args, global).await,
        Command::Login(args) => auth::login(session, resolved, args, global).await,
        Command::Logout => auth::logout(session, resolved, global),
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions run without a session".into(),
        )),
    }
}
