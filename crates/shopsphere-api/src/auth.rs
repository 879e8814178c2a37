use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use secrecy::SecretString;

use crate::client::ApiClient;
use crate::error::Error;

/// Key the bearer token is stored under unless configured otherwise.
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Persistent token storage, shared by the HTTP client and the session.
///
/// Implementations are read on every outgoing request, so `load` should be
/// cheap. Token values must never be logged.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Current value for `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> Option<SecretString>;

    /// Replace the value for `key`.
    fn store(&self, key: &str, token: SecretString) -> Result<(), Error>;

    /// Delete the value for `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), Error>;
}

/// Process-local credential store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, SecretString>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a token under [`DEFAULT_TOKEN_KEY`].
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        store
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(DEFAULT_TOKEN_KEY.to_owned(), SecretString::from(token.into()));
        store
    }
}

impl fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        f.debug_struct("MemoryCredentialStore")
            .field("keys", &keys)
            .finish()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self, key: &str) -> Option<SecretString> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn store(&self, key: &str, token: SecretString) -> Result<(), Error> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), token);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Attempts to renew the session token after a 401.
///
/// Contract: may succeed or fail; must leave the credential store holding
/// a token if it held one before the call. Implementations must talk to
/// the server through [`ApiClient::http`] rather than the retrying request
/// path, so a failing restore can never recurse.
#[async_trait]
pub trait SessionRestorer: Send + Sync + fmt::Debug {
    async fn restore(&self, client: &ApiClient) -> Result<(), Error>;
}
