// ── Core error types ──
//
// User-facing errors from shopsphere-core. Consumers never see raw
// transport failures: `WishlistError` is built at each operation boundary,
// and `From<shopsphere_api::Error>` covers session and setup paths.

use shopsphere_api::Error as ApiError;
use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// The wishlist operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Fetch,
    Add,
    Remove,
    Check,
}

impl Operation {
    /// Message shown when the server wants the user to log in.
    pub fn login_prompt(self) -> &'static str {
        match self {
            Self::Fetch => "Please login to view your wishlist",
            Self::Add => "Please login to add items to wishlist",
            Self::Remove => "Please login to remove items from wishlist",
            Self::Check => "Please login to check your wishlist",
        }
    }

    /// Message used when the server gave no `error` text.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Fetch => "Failed to fetch wishlist",
            Self::Add => "Failed to add to wishlist",
            Self::Remove => "Failed to remove from wishlist",
            Self::Check => "Failed to check wishlist status",
        }
    }
}

/// Outcome of a failed wishlist request, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WishlistError {
    /// The user has to log in (HTTP 401 survived the restore-and-retry).
    #[error("{message}")]
    AuthRequired { message: String },

    /// Anything else: server rejection, transport failure, bad payload.
    #[error("{message}")]
    RequestFailed { message: String },
}

impl WishlistError {
    /// Classify an API error for `op`.
    pub fn from_api(op: Operation, err: &ApiError) -> Self {
        if err.is_unauthorized() {
            return Self::AuthRequired {
                message: op.login_prompt().to_owned(),
            };
        }

        let message = err
            .server_message()
            .map_or_else(|| op.fallback_message().to_owned(), str::to_owned);
        Self::RequestFailed { message }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::AuthRequired { message } | Self::RequestFailed { message } => message,
        }
    }
}

/// Errors from session setup, login, and logout.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach storefront at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Credential store error: {message}")]
    Credential { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        let status = err.status();
        match err {
            ApiError::Unauthorized { message } => Self::AuthenticationFailed {
                message: message.unwrap_or_else(|| "invalid or expired credentials".into()),
            },
            ApiError::MissingToken => Self::AuthenticationFailed {
                message: "not logged in".into(),
            },
            ApiError::Credential(message) => Self::Credential { message },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout
                } else if e.is_connect() {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    Self::Api {
                        message: e.to_string(),
                        status,
                    }
                }
            }
            ApiError::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => Self::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::Api { status: code, message } => Self::Api {
                message: message.unwrap_or_else(|| format!("HTTP {code}")),
                status,
            },
            ApiError::Deserialization { message, body: _ } => {
                Self::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_operation_prompt() {
        let err = ApiError::Unauthorized {
            message: Some("token expired".into()),
        };
        assert_eq!(
            WishlistError::from_api(Operation::Fetch, &err),
            WishlistError::AuthRequired {
                message: "Please login to view your wishlist".into()
            }
        );
        assert_eq!(
            WishlistError::from_api(Operation::Remove, &err).message(),
            "Please login to remove items from wishlist"
        );
    }

    #[test]
    fn server_error_text_wins_over_fallback() {
        let err = ApiError::Api {
            status: 409,
            message: Some("Product already in wishlist".into()),
        };
        assert_eq!(
            WishlistError::from_api(Operation::Add, &err),
            WishlistError::RequestFailed {
                message: "Product already in wishlist".into()
            }
        );
    }

    #[test]
    fn missing_server_text_uses_fallback() {
        let err = ApiError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(
            WishlistError::from_api(Operation::Add, &err).message(),
            "Failed to add to wishlist"
        );
        assert_eq!(
            WishlistError::from_api(Operation::Check, &err).message(),
            "Failed to check wishlist status"
        );

        let err = ApiError::Deserialization {
            message: "expected array".into(),
            body: "{}".into(),
        };
        assert_eq!(
            WishlistError::from_api(Operation::Fetch, &err).message(),
            "Failed to fetch wishlist"
        );
    }

    #[test]
    fn operation_names_are_snake_case() {
        assert_eq!(Operation::Fetch.to_string(), "fetch");
        let name: &'static str = Operation::Remove.into();
        assert_eq!(name, "remove");
    }

    #[test]
    fn api_error_converts_to_core_error() {
        let core: CoreError = ApiError::Api {
            status: 503,
            message: None,
        }
        .into();
        assert!(matches!(
            core,
            CoreError::Api {
                status: Some(503),
                ref message
            } if message == "HTTP 503"
        ));
    }
}
