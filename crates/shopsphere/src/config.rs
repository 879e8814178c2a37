//! CLI configuration -- thin wrapper around `shopsphere_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--api-url, --token,
//! --insecure, --timeout) and builds the core `Session`.

use std::sync::Arc;

use secrecy::SecretString;

use shopsphere_core::{ClientConfig, CoreError, CredentialStore, MemoryCredentialStore, Session};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use shopsphere_config::{
    Config, KeyringCredentialStore, Profile, config_path, load_config, save_config,
};

/// Everything a command needs to know about the active profile.
#[derive(Debug)]
pub struct Resolved {
    pub config: Config,
    pub profile_name: String,
    pub profile: Profile,
}

/// Load the config and pick the active profile.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let config = load_config()?;
    let profile_name = config.active_profile_name(global.profile.as_deref());
    let profile = config
        .profile(&profile_name, global.profile.is_some())
        .map_err(|_| CliError::ProfileNotFound {
            name: profile_name.clone(),
            available: available_profiles(&config),
        })?;

    Ok(Resolved {
        config,
        profile_name,
        profile,
    })
}

fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        return "(none)".into();
    }
    config
        .profiles
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Translate the resolved profile plus global flags into a `ClientConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn client_config(resolved: &Resolved, global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let mut profile = resolved.profile.clone();
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }

    Ok(shopsphere_config::profile_to_client_config(
        &profile,
        &resolved.config.defaults,
    )?)
}

/// Credential store for this invocation: `--token` wins, then the keyring
/// with the profile's plaintext token as fallback.
pub fn credential_store(
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<Arc<dyn CredentialStore>, CliError> {
    let key = resolved.profile.token_key();

    if let Some(ref token) = global.token {
        let store = MemoryCredentialStore::new();
        store
            .store(key, SecretString::from(token.clone()))
            .map_err(CoreError::from)?;
        return Ok(Arc::new(store));
    }

    let mut store = KeyringCredentialStore::new(resolved.profile_name.clone());
    if let Some(ref token) = resolved.profile.token {
        store = store.with_plaintext(key, SecretString::from(token.clone()));
    }
    Ok(Arc::new(store))
}

/// Resolve the profile and open a session against it.
pub fn connect(global: &GlobalOpts) -> Result<(Resolved, Session), CliError> {
    let resolved = resolve(global)?;
    let client_config = client_config(&resolved, global)?;
    let credentials = credential_store(&resolved, global)?;

    tracing::debug!(
        profile = %resolved.profile_name,
        base_url = %client_config.base_url,
        "connecting"
    );
    let session = Session::connect(&client_config, credentials)?;
    Ok((resolved, session))
}
