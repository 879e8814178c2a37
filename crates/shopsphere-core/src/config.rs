// ── Runtime connection configuration ──
//
// These types describe *how* to reach the storefront API. They carry
// connection tuning and storage keys but never touch disk. The CLI builds
// a `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use shopsphere_api::{DEFAULT_REFRESH_PATH, DEFAULT_TOKEN_KEY};
use url::Url;

/// API origin used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// Configuration for talking to one storefront API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin, e.g. `http://localhost:8080/api`.
    pub base_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Credential-store key holding the bearer token.
    pub token_key: String,
    /// Refresh endpoint used to restore an expired session.
    pub refresh_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            token_key: DEFAULT_TOKEN_KEY.into(),
            refresh_path: DEFAULT_REFRESH_PATH.into(),
        }
    }
}
