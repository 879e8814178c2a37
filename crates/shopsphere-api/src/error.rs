use thiserror::Error;

/// Top-level error type for the `shopsphere-api` crate.
///
/// Covers every failure mode of the storefront HTTP surface: authorization,
/// transport, structured API errors, and credential storage.
/// `shopsphere-core` maps these into operation-scoped errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authorization ───────────────────────────────────────────────
    /// HTTP 401 that survived the restore-and-retry path.
    #[error(
        "Authorization required: {}",
        .message.as_deref().unwrap_or("missing or expired session")
    )]
    Unauthorized { message: Option<String> },

    /// An auth flow needed a token but the credential store has none.
    #[error("No session token stored")]
    MissingToken,

    /// Reading or writing the credential store failed.
    #[error("Credential store error: {0}")]
    Credential(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success response. `message` is the body's `error` field, if any.
    #[error(
        "API error (HTTP {status}): {}",
        .message.as_deref().unwrap_or("no error message")
    )]
    Api {
        status: u16,
        message: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the server rejected the request as unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
            || matches!(self, Self::Transport(e) if e.status() == Some(reqwest::StatusCode::UNAUTHORIZED))
    }

    /// The `error` string the server put in its response body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status code, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_only_for_response_errors() {
        let err = Error::Api {
            status: 409,
            message: Some("Product already in wishlist".into()),
        };
        assert_eq!(err.server_message(), Some("Product already in wishlist"));
        assert_eq!(err.status(), Some(409));

        assert_eq!(Error::MissingToken.server_message(), None);
        assert_eq!(Error::MissingToken.status(), None);
    }

    #[test]
    fn unauthorized_display_falls_back() {
        let err = Error::Unauthorized { message: None };
        assert!(err.is_unauthorized());
        assert_eq!(
            err.to_string(),
            "Authorization required: missing or expired session"
        );
    }

    #[test]
    fn unauthorized_reports_401() {
        assert_eq!(Error::Unauthorized { message: None }.status(), Some(401));
        assert_eq!(Error::Tls("bad pem".into()).status(), None);
    }
}
