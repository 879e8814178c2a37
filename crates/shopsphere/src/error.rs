//! CLI error types with miette diagnostics.
//!
//! Maps core, wishlist, and config errors into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use shopsphere_config::ConfigError;
use shopsphere_core::{CoreError, WishlistError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the storefront at {url}")]
    #[diagnostic(
        code(shopsphere::connection_failed),
        help(
            "Check that the API is running and the URL is right.\n\
             Reason: {reason}\n\
             Override with: shopsphere --api-url <URL> ..."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(shopsphere::timeout),
        help("Increase the timeout with --timeout or check the storefront's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(shopsphere::auth_required),
        help("Run: shopsphere login --profile {profile}")
    )]
    AuthRequired { message: String, profile: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(shopsphere::auth_failed),
        help("Check your username and password, then run: shopsphere login")
    )]
    AuthFailed { message: String },

    #[error("Credential store error: {message}")]
    #[diagnostic(
        code(shopsphere::credentials),
        help(
            "The system keyring may be locked or unavailable.\n\
             Pass a token for one invocation with --token or SHOPSPHERE_TOKEN."
        )
    )]
    Credential { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(shopsphere::request_failed))]
    RequestFailed { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(shopsphere::api_error))]
    Api { message: String, status: Option<u16> },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shopsphere::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(shopsphere::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: shopsphere config init --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(shopsphere::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' needs confirmation")]
    #[diagnostic(
        code(shopsphere::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Rendering ───────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(shopsphere::render))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(shopsphere::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthRequired { .. }
            | Self::AuthFailed { .. }
            | Self::Api {
                status: Some(401 | 403),
                ..
            } => exit_code::AUTH,
            Self::Api {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile to a wishlist failure.
    pub fn from_wishlist(err: WishlistError, profile: &str) -> Self {
        match err {
            WishlistError::AuthRequired { message } => Self::AuthRequired {
                message,
                profile: profile.into(),
            },
            WishlistError::RequestFailed { message } => Self::RequestFailed { message },
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Timeout => Self::Timeout,
            CoreError::Api { message, status } => Self::Api { message, status },
            CoreError::Credential { message } => Self::Credential { message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}
