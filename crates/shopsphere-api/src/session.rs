// Session endpoints
//
// Username/password login and token refresh. Both talk to the server through
// `ApiClient::http()` directly: login must not trigger a restore, and the
// refresh call is itself the restore.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::auth::SessionRestorer;
use crate::client::{ApiClient, handle_response};
use crate::error::Error;
use crate::models::TokenResponse;

/// Default path of the token refresh endpoint, relative to the API origin.
pub const DEFAULT_REFRESH_PATH: &str = "auth/refresh";

const LOGIN_PATH: &str = "auth/login";

impl ApiClient {
    /// Authenticate with username/password and store the returned token.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.url(LOGIN_PATH)?;
        debug!("logging in at {url}");

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self.http().post(url).json(&body).send().await?;
        let token: TokenResponse = handle_response(resp).await?;
        self.store_token(SecretString::from(token.token))?;

        debug!("login successful");
        Ok(())
    }
}

/// Restores a session by exchanging the current bearer token for a new one.
///
/// `POST {origin}/{path}` with the stored token; a `{"token": "..."}` reply
/// replaces it. Any failure leaves the stored token untouched.
#[derive(Debug, Clone)]
pub struct RefreshTokenRestorer {
    path: String,
}

impl RefreshTokenRestorer {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Default for RefreshTokenRestorer {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_PATH)
    }
}

#[async_trait]
impl SessionRestorer for RefreshTokenRestorer {
    async fn restore(&self, client: &ApiClient) -> Result<(), Error> {
        let current = client.token().ok_or(Error::MissingToken)?;
        let url = client.url(&self.path)?;
        debug!("refreshing session at {url}");

        let resp = client
            .http()
            .post(url)
            .bearer_auth(current.expose_secret())
            .send()
            .await?;
        let token: TokenResponse = handle_response(resp).await?;
        if token.token.is_empty() {
            return Err(Error::Unauthorized {
                message: Some("refresh returned an empty token".into()),
            });
        }

        client.store_token(SecretString::from(token.token))
    }
}
