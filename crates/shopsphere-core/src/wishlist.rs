// ── Wishlist operations ──
//
// Each operation is one REST call whose outcome is folded into the store.
// Fetch, add, and remove surface a `WishlistError`; check soft-fails to
// "not in wishlist". Results that resolve after a logout are dropped.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Operation, WishlistError};
use crate::model::{Product, ProductId};
use crate::session::Session;
use crate::store::{WishlistAction, WishlistState, WishlistStore};
use crate::stream::StateStream;

/// Wishlist facade: operations plus the state they maintain.
///
/// Cheaply cloneable; clones share one store.
#[derive(Clone)]
pub struct Wishlist {
    inner: Arc<WishlistInner>,
}

struct WishlistInner {
    session: Session,
    store: Arc<WishlistStore>,
}

impl Wishlist {
    /// Create an empty wishlist bound to `session` and register its
    /// logout reset.
    pub fn new(session: &Session) -> Self {
        let store = Arc::new(WishlistStore::new());
        session.on_logout(&store);

        Self {
            inner: Arc::new(WishlistInner {
                session: session.clone(),
                store,
            }),
        }
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn store(&self) -> &Arc<WishlistStore> {
        &self.inner.store
    }

    /// Current state snapshot.
    pub fn state(&self) -> Arc<WishlistState> {
        self.inner.store.snapshot()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> StateStream {
        self.inner.store.subscribe()
    }

    // ── Server-backed operations ─────────────────────────────────────

    /// Replace the local list with the server's wishlist.
    ///
    /// On failure `error` is set and `items` is left as it was.
    pub async fn fetch(&self) -> Result<Vec<Product>, WishlistError> {
        let store = &self.inner.store;
        let ticket = store.ticket();
        store.dispatch_for(ticket, WishlistAction::FetchPending);

        match self.inner.session.client().list_wishlist().await {
            Ok(products) => {
                debug!(count = products.len(), "wishlist fetched");
                store.dispatch_for(ticket, WishlistAction::FetchFulfilled(products.clone()));
                Ok(products)
            }
            Err(e) => {
                let err = WishlistError::from_api(Operation::Fetch, &e);
                debug!(error = %e, "wishlist fetch failed");
                store.dispatch_for(ticket, WishlistAction::FetchRejected(err.message().to_owned()));
                Err(err)
            }
        }
    }

    /// Add a product. Membership flips to `true`; `items` waits for the
    /// next fetch. Returns the server's confirmation message, if any.
    pub async fn add(&self, product_id: ProductId) -> Result<Option<String>, WishlistError> {
        let ticket = self.inner.store.ticket();

        match self.inner.session.client().add_to_wishlist(product_id).await {
            Ok(resp) => {
                self.inner
                    .store
                    .dispatch_for(ticket, WishlistAction::Added(product_id));
                Ok(resp.message)
            }
            Err(e) => {
                debug!(%product_id, error = %e, "add to wishlist failed");
                Err(WishlistError::from_api(Operation::Add, &e))
            }
        }
    }

    /// Remove a product from both `items` and the membership mapping.
    pub async fn remove(&self, product_id: ProductId) -> Result<(), WishlistError> {
        let ticket = self.inner.store.ticket();

        match self
            .inner
            .session
            .client()
            .remove_from_wishlist(product_id)
            .await
        {
            Ok(()) => {
                self.inner
                    .store
                    .dispatch_for(ticket, WishlistAction::Removed(product_id));
                Ok(())
            }
            Err(e) => {
                debug!(%product_id, error = %e, "remove from wishlist failed");
                Err(WishlistError::from_api(Operation::Remove, &e))
            }
        }
    }

    /// Ask the server whether `product_id` is wishlisted.
    ///
    /// Never fails: any error, including a missing login, resolves to
    /// `false`. Failures other than 401 are logged at `warn`.
    pub async fn check(&self, product_id: ProductId) -> bool {
        let ticket = self.inner.store.ticket();

        let is_in_wishlist = match self.inner.session.client().check_wishlist(product_id).await {
            Ok(flag) => flag,
            Err(e) => {
                let err = WishlistError::from_api(Operation::Check, &e);
                if err.is_auth_required() {
                    debug!(%product_id, reason = err.message(), "treating as absent");
                } else {
                    warn!(%product_id, error = %e, reason = err.message(), "treating as absent");
                }
                false
            }
        };

        self.inner.store.dispatch_for(
            ticket,
            WishlistAction::StatusChecked {
                product_id,
                is_in_wishlist,
            },
        );
        is_in_wishlist
    }

    // ── Local operations ─────────────────────────────────────────────

    /// Empty `items` and the membership mapping.
    pub fn clear(&self) {
        self.inner.store.dispatch(WishlistAction::Clear);
    }

    /// Set membership directly (optimistic UI updates).
    pub fn update_status(&self, product_id: ProductId, is_in_wishlist: bool) {
        self.inner.store.dispatch(WishlistAction::UpdateStatus {
            product_id,
            is_in_wishlist,
        });
    }
}
