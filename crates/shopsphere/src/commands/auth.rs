//! Login / logout handlers.

use std::io::{self, BufRead, IsTerminal};

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use shopsphere_core::{CoreError, Session};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::{self, Resolved};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn login(
    session: &Session,
    mut resolved: Resolved,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if global.token.is_some() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "--token bypasses the credential store; unset it to log in".into(),
        });
    }

    let username = match args.username {
        Some(u) => u,
        None if io::stdin().is_terminal() => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(util::prompt_err)?,
        None => {
            return Err(CliError::Validation {
                field: "username".into(),
                reason: "pass --username when stdin is not a terminal".into(),
            });
        }
    };

    let password = if args.password_stdin {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        rpassword::prompt_password("Password: ")?
    };

    if username.trim().is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }
    let password = SecretString::from(password);

    let pb = util::spinner(global, "Logging in");
    let result = session.login(username.trim(), &password).await;
    pb.finish_and_clear();

    match result {
        Ok(()) => {
            output::success(
                global,
                &format!("Logged in as {} (profile '{}')", username.trim(), resolved.profile_name),
            );
            Ok(())
        }
        // The server accepted the login but the keyring refused the token.
        Err(CoreError::Credential { message }) => {
            tracing::warn!(%message, "keyring unavailable after login");
            let token = session.client().token();
            let Some(token) = token else {
                return Err(CliError::Credential { message });
            };
            if !util::confirm(
                "System keyring unavailable. Save the token to the config file in plaintext?",
                global,
                "save token in plaintext",
            )? {
                return Err(CliError::Credential { message });
            }

            resolved.profile.token = Some(token.expose_secret().to_owned());
            resolved
                .config
                .profiles
                .insert(resolved.profile_name.clone(), resolved.profile);
            let path = config::save_config(&resolved.config)?;
            output::success(
                global,
                &format!("Logged in; token saved to {}", path.display()),
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn logout(session: &Session, mut resolved: Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let had_session = session.is_authenticated();
    let result = session.logout();

    // A plaintext token in the profile would resurrect the session.
    if resolved.profile.token.is_some() {
        resolved.profile.token = None;
        resolved
            .config
            .profiles
            .insert(resolved.profile_name.clone(), resolved.profile);
        let path = config::save_config(&resolved.config)?;
        output::note(global, &format!("Removed plaintext token from {}", path.display()));
    }

    result?;
    if had_session {
        output::success(global, &format!("Logged out of profile '{}'", resolved.profile_name));
    } else {
        output::note(global, "No stored session");
    }
    Ok(())
}
