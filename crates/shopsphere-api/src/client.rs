// Storefront HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection from
// an injected credential store, and a single restore-and-retry on HTTP 401.
// Endpoint groups (wishlist, session) are inherent methods in sibling files.

use std::fmt;
use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::auth::{CredentialStore, DEFAULT_TOKEN_KEY, SessionRestorer};
use crate::error::Error;
use crate::models::ErrorBody;
use crate::session::RefreshTokenRestorer;
use crate::transport::TransportConfig;

/// Which send this is for a given request. A request gets at most one
/// retry, and only the initial attempt may trigger a session restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    Retry,
}

impl Attempt {
    /// The attempt that follows this one, or `None` once retried.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Initial => Some(Self::Retry),
            Self::Retry => None,
        }
    }
}

/// An outgoing request, described once and replayable on retry.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
        }
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: &(impl Serialize + ?Sized)) -> Result<Self, Error> {
        let value = serde_json::to_value(body).map_err(|e| Error::Deserialization {
            message: format!("failed to encode request body: {e}"),
            body: String::new(),
        })?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Shared HTTP client for the storefront API.
///
/// Every request carries `Authorization: Bearer <token>` when the credential
/// store holds a token. A 401 on the first attempt, with a token present,
/// runs the session restorer once and replays the request with whatever
/// token is stored afterwards. The replay's outcome is final.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
    token_key: String,
    restorer: Arc<dyn SessionRestorer>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token_key", &self.token_key)
            .field("restorer", &self.restorer)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from the API origin and transport settings.
    ///
    /// The session restorer defaults to [`RefreshTokenRestorer`] against
    /// `auth/refresh`; swap it with [`with_restorer`](Self::with_restorer).
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, credentials)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            credentials,
            token_key: DEFAULT_TOKEN_KEY.to_owned(),
            restorer: Arc::new(RefreshTokenRestorer::default()),
        })
    }

    pub fn with_restorer(mut self, restorer: Arc<dyn SessionRestorer>) -> Self {
        self.restorer = restorer;
        self
    }

    pub fn with_token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The underlying HTTP client (for auth flows that bypass the retry path).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The API origin, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    /// The token currently held by the credential store.
    pub fn token(&self) -> Option<SecretString> {
        self.credentials.load(&self.token_key)
    }

    /// Replace the stored token.
    pub fn store_token(&self, token: SecretString) -> Result<(), Error> {
        self.credentials.store(&self.token_key, token)
    }

    /// Drop the stored token.
    pub fn clear_token(&self) -> Result<(), Error> {
        self.credentials.remove(&self.token_key)
    }

    /// Join a relative path (e.g. `"wishlist/add/42"`) onto the base URL.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request path ─────────────────────────────────────────────────

    /// Send a request, restoring the session and retrying once on 401.
    ///
    /// Returns the final response whatever its status; callers decide how
    /// to interpret non-success codes. Transport errors propagate directly.
    pub async fn send(&self, request: &ApiRequest) -> Result<reqwest::Response, Error> {
        let mut attempt = Attempt::Initial;
        loop {
            let resp = self.dispatch(request, attempt).await?;
            if resp.status() != StatusCode::UNAUTHORIZED {
                return Ok(resp);
            }

            let Some(next) = attempt.next() else {
                debug!(path = request.path(), "still unauthorized after retry");
                return Ok(resp);
            };

            if self.token().is_none() {
                debug!(path = request.path(), "unauthorized without a token; not restoring");
                return Ok(resp);
            }

            self.restore_session().await;
            attempt = next;
        }
    }

    /// Issue one attempt with the token that is stored right now.
    async fn dispatch(
        &self,
        request: &ApiRequest,
        attempt: Attempt,
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(&request.path)?;
        debug!(?attempt, "{} {url}", request.method);

        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(token) = self.token() {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// Run the restorer; its failure is logged and otherwise ignored.
    #[instrument(skip(self), fields(restorer = ?self.restorer))]
    async fn restore_session(&self) {
        match self.restorer.restore(self).await {
            Ok(()) => debug!("session restored"),
            Err(e) => warn!(error = %e, "session restore failed; retrying with current token"),
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let resp = self.send(&ApiRequest::get(path)).await?;
        handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let resp = self.send(&ApiRequest::post(path).json(body)?).await?;
        handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let resp = self.send(&ApiRequest::delete(path)).await?;
        handle_empty(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

pub(crate) async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

pub(crate) async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

/// Map a non-success response to an [`Error`], keeping the body's `error`
/// field when the server sent one.
pub(crate) async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&raw)
        .ok()
        .and_then(|body| body.error)
        .filter(|msg| !msg.is_empty());

    if status == StatusCode::UNAUTHORIZED {
        Error::Unauthorized { message }
    } else {
        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Parse the origin and make sure its path ends in `/` so relative joins
/// append instead of replacing the last segment.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryCredentialStore;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(
            reqwest::Client::new(),
            base,
            Arc::new(MemoryCredentialStore::new()),
        )
        .expect("client")
    }

    #[test]
    fn attempt_allows_exactly_one_retry() {
        assert_eq!(Attempt::Initial.next(), Some(Attempt::Retry));
        assert_eq!(Attempt::Retry.next(), None);
    }

    #[test]
    fn url_joins_under_api_prefix() {
        let client = client("http://localhost:8080/api");
        assert_eq!(
            client.url("wishlist/add/42").expect("url").as_str(),
            "http://localhost:8080/api/wishlist/add/42"
        );
        assert_eq!(
            client.url("/wishlist").expect("url").as_str(),
            "http://localhost:8080/api/wishlist"
        );
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = client("http://shop.example/api///");
        assert_eq!(client.base_url().as_str(), "http://shop.example/api/");
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let result = ApiClient::with_client(
            reqwest::Client::new(),
            "not a url",
            Arc::new(MemoryCredentialStore::new()),
        );
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
