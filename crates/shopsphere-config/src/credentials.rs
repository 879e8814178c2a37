// ── Keyring-backed credential store ──
//
// Tokens live in the OS keyring under service `shopsphere`, entry
// `{profile}/{key}`. A plaintext profile token is consulted when the keyring
// has nothing. Values are cached in-process since `load` runs per request.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use shopsphere_api::{CredentialStore, Error};

/// Keyring service name for every ShopSphere entry.
pub const KEYRING_SERVICE: &str = "shopsphere";

pub struct KeyringCredentialStore {
    profile: String,
    cache: RwLock<HashMap<String, SecretString>>,
    plaintext: RwLock<Option<(String, SecretString)>>,
}

impl KeyringCredentialStore {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            cache: RwLock::new(HashMap::new()),
            plaintext: RwLock::new(None),
        }
    }

    /// Fall back to `token` for `key` when the keyring has no entry.
    pub fn with_plaintext(self, key: impl Into<String>, token: SecretString) -> Self {
        *self.plaintext.write().unwrap_or_else(PoisonError::into_inner) = Some((key.into(), token));
        self
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, keyring::Error> {
        keyring::Entry::new(KEYRING_SERVICE, &format!("{}/{key}", self.profile))
    }

    fn keyring_lookup(&self, key: &str) -> Option<SecretString> {
        match self.entry(key).and_then(|entry| entry.get_password()) {
            Ok(secret) => Some(SecretString::from(secret)),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                debug!(profile = %self.profile, key, error = %e, "keyring lookup failed");
                None
            }
        }
    }

    fn plaintext_lookup(&self, key: &str) -> Option<SecretString> {
        self.plaintext
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|(k, _)| k == key)
            .map(|(_, token)| token.clone())
    }
}

impl fmt::Debug for KeyringCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyringCredentialStore")
            .field("service", &KEYRING_SERVICE)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn load(&self, key: &str) -> Option<SecretString> {
        if let Some(token) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            return Some(token.clone());
        }

        let token = self
            .keyring_lookup(key)
            .or_else(|| self.plaintext_lookup(key))?;
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), token.clone());
        Some(token)
    }

    /// The cache is updated before the keyring, so the current process keeps
    /// the token even when persisting it fails.
    fn store(&self, key: &str, token: SecretString) -> Result<(), Error> {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), token.clone());

        self.entry(key)
            .and_then(|entry| entry.set_password(token.expose_secret()))
            .map_err(|e| Error::Credential(format!("keyring write failed: {e}")))
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        {
            let mut plaintext = self.plaintext.write().unwrap_or_else(PoisonError::into_inner);
            if plaintext.as_ref().is_some_and(|(k, _)| k == key) {
                *plaintext = None;
            }
        }

        match self.entry(key).and_then(|entry| entry.delete_credential()) {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(profile = %self.profile, key, error = %e, "keyring delete failed");
                Err(Error::Credential(format!("keyring delete failed: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exposed(token: Option<SecretString>) -> Option<String> {
        token.map(|t| t.expose_secret().to_owned())
    }

    #[test]
    fn plaintext_fallback_is_scoped_to_its_key() {
        let store = KeyringCredentialStore::new("shopsphere-test-fallback")
            .with_plaintext("token", SecretString::from("plain".to_owned()));

        assert_eq!(exposed(store.load("token")), Some("plain".into()));
        assert_eq!(exposed(store.load("other")), None);
    }

    #[test]
    fn remove_forgets_plaintext_fallback() {
        let store = KeyringCredentialStore::new("shopsphere-test-remove")
            .with_plaintext("token", SecretString::from("plain".to_owned()));
        assert!(store.load("token").is_some());

        // The keyring itself may be unavailable on CI; only the in-process
        // state is asserted.
        let _ = store.remove("token");
        assert_eq!(exposed(store.load("token")), None);
    }

    #[test]
    fn debug_output_hides_tokens() {
        let store = KeyringCredentialStore::new("p")
            .with_plaintext("token", SecretString::from("hunter2".to_owned()));
        let rendered = format!("{store:?}");
        assert!(rendered.contains("shopsphere"));
        assert!(!rendered.contains("hunter2"));
    }
}
