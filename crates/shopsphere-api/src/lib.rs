// shopsphere-api: Async Rust client for the ShopSphere storefront REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod session;
pub mod transport;
mod wishlist;

pub use auth::{CredentialStore, DEFAULT_TOKEN_KEY, MemoryCredentialStore, SessionRestorer};
pub use client::{ApiClient, ApiRequest, Attempt};
pub use error::Error;
pub use models::{AddResponse, CheckResponse, Product, ProductId};
pub use session::{DEFAULT_REFRESH_PATH, RefreshTokenRestorer};
pub use transport::{TlsMode, TransportConfig};
