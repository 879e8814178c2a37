//! Wishlist state and session layer between `shopsphere-api` and UI
//! consumers (CLI, embedding applications).
//!
//! - **[`Session`]** Owns the shared [`ApiClient`](shopsphere_api::ApiClient)
//!   (bearer injection plus one restore-and-retry on 401) and fans out
//!   logout to every registered state container.
//!
//! - **[`Wishlist`]** Fetch / add / remove / check operations. Each maps one
//!   user action to one REST call and folds the result into the store.
//!   Status checks soft-fail to "not in wishlist".
//!
//! - **[`WishlistStore`]** Predictable state container: a `watch` channel
//!   of [`WishlistState`] snapshots mutated only through [`WishlistAction`]s.
//!   Results of requests started before a logout are discarded.
//!
//! - **[`StateStream`]** Subscription handle with `current()` / `latest()` /
//!   `changed()` for reactive rendering.

pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod stream;
pub mod wishlist;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, DEFAULT_BASE_URL, TlsVerification};
pub use error::{CoreError, Operation, WishlistError};
pub use model::{Product, ProductId};
pub use session::{LogoutReset, Session};
pub use store::{Ticket, WishlistAction, WishlistState, WishlistStore};
pub use stream::{StateStream, StateWatchStream};
pub use wishlist::Wishlist;

pub use shopsphere_api::{CredentialStore, MemoryCredentialStore};
