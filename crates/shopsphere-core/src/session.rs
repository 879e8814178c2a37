// ── Session lifecycle ──
//
// Owns the shared `ApiClient` and the logout fan-out. State containers
// register themselves at construction; `logout()` drops the token and resets
// every container still alive. Registrations are weak, so a dropped
// container is pruned instead of kept around by the session.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use secrecy::SecretString;
use shopsphere_api::{ApiClient, CredentialStore, RefreshTokenRestorer, TlsMode, TransportConfig};
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, TlsVerification};
use crate::error::CoreError;

/// State that must be wiped when the session ends.
pub trait LogoutReset: Send + Sync {
    fn reset_session(&self);
}

/// Shared handle to the storefront session.
///
/// Cheaply cloneable via `Arc<SessionInner>`.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: ApiClient,
    reset_targets: Mutex<Vec<Weak<dyn LogoutReset>>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("client", &self.inner.client)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Wrap an already-configured client.
    pub fn new(client: ApiClient) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                client,
                reset_targets: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Build the HTTP client from runtime config and a credential store.
    pub fn connect(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let client = ApiClient::new(config.base_url.as_str(), &transport, credentials)?
            .with_token_key(config.token_key.clone())
            .with_restorer(Arc::new(RefreshTokenRestorer::new(
                config.refresh_path.clone(),
            )));
        debug!(base_url = %client.base_url(), "session client ready");
        Ok(Self::new(client))
    }

    /// The shared HTTP client.
    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// Whether a token is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.inner.client.token().is_some()
    }

    /// Log in with username/password; the token lands in the credential store.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        self.inner.client.login(username, password).await?;
        info!(username, "logged in");
        Ok(())
    }

    /// Reset `target` on every logout for as long as it is alive.
    ///
    /// Only a weak reference is kept. Dropped targets are pruned here and
    /// on logout.
    pub fn on_logout<T: LogoutReset + 'static>(&self, target: &Arc<T>) {
        let target: Weak<dyn LogoutReset> = Arc::downgrade(target) as Weak<T>;
        let mut targets = self
            .inner
            .reset_targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        targets.retain(|t| t.strong_count() > 0);
        targets.push(target);
    }

    /// Drop the stored token and reset every live state container.
    ///
    /// Containers are reset even if the credential store fails to forget the
    /// token; that failure is returned afterwards.
    pub fn logout(&self) -> Result<(), CoreError> {
        let cleared = self.inner.client.clear_token();
        if let Err(ref e) = cleared {
            warn!(error = %e, "failed to remove stored token");
        }

        let mut targets = self
            .inner
            .reset_targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        targets.retain(|weak| match weak.upgrade() {
            Some(target) => {
                target.reset_session();
                true
            }
            None => false,
        });
        info!(targets = targets.len(), "logged out");
        drop(targets);

        cleared.map_err(CoreError::from)
    }
}

fn build_transport(config: &ClientConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        ..TransportConfig::default()
    }
    .with_timeout(config.timeout)
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use shopsphere_api::MemoryCredentialStore;

    use super::*;

    fn session_with_token() -> Session {
        Session::connect(
            &ClientConfig::default(),
            Arc::new(MemoryCredentialStore::with_token("abc")),
        )
        .expect("session")
    }

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl LogoutReset for Counter {
        fn reset_session(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn registered(session: &Session) -> usize {
        session
            .inner
            .reset_targets
            .lock()
            .expect("registry lock")
            .len()
    }

    #[test]
    fn logout_clears_token_and_resets_every_target() {
        let session = session_with_token();
        let first = Arc::new(Counter::default());
        let second = Arc::new(Counter::default());
        session.on_logout(&first);
        session.on_logout(&second);

        assert!(session.is_authenticated());
        session.logout().expect("logout");

        assert!(!session.is_authenticated());
        assert_eq!(first.0.load(Ordering::SeqCst), 1);
        assert_eq!(second.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropped_targets_are_pruned() {
        let session = session_with_token();
        let kept = Arc::new(Counter::default());
        session.on_logout(&kept);
        for _ in 0..100 {
            session.on_logout(&Arc::new(Counter::default()));
        }
        assert_eq!(registered(&session), 2);

        session.logout().expect("logout");

        assert_eq!(registered(&session), 1);
        assert_eq!(kept.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn logout_without_token_is_fine() {
        let session = Session::connect(
            &ClientConfig::default(),
            Arc::new(MemoryCredentialStore::new()),
        )
        .expect("session");
        assert!(session.logout().is_ok());
    }

    #[test]
    fn custom_token_key_is_honoured() {
        let config = ClientConfig {
            token_key: "shop-token".into(),
            ..ClientConfig::default()
        };
        let store = Arc::new(MemoryCredentialStore::with_token("abc"));
        let session = Session::connect(&config, store).expect("session");

        assert_eq!(session.client().token_key(), "shop-token");
        assert!(!session.is_authenticated());
    }
}
