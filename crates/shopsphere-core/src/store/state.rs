// ── Wishlist state and reducer ──
//
// `WishlistState` is plain data; every change goes through
// `WishlistState::apply` with a `WishlistAction`, so the set of possible
// transitions is closed and testable without a server.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Product, ProductId};

/// Snapshot of the user's wishlist as the client knows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WishlistState {
    /// Products from the last successful fetch, in server order.
    pub items: Vec<Product>,
    /// `true` while a fetch is outstanding.
    pub loading: bool,
    /// Message from the last failed fetch.
    pub error: Option<String>,
    /// Product id -> whether it is in the wishlist.
    pub membership: BTreeMap<ProductId, bool>,
}

/// Every transition the wishlist state supports.
#[derive(Debug, Clone, PartialEq)]
pub enum WishlistAction {
    /// A fetch started.
    FetchPending,
    /// A fetch returned these products.
    FetchFulfilled(Vec<Product>),
    /// A fetch failed with this user-facing message.
    FetchRejected(String),
    /// The server accepted an add.
    Added(ProductId),
    /// The server accepted a remove.
    Removed(ProductId),
    /// A status check resolved (soft-failed checks resolve to `false`).
    StatusChecked {
        product_id: ProductId,
        is_in_wishlist: bool,
    },
    /// Local reset of items and membership.
    Clear,
    /// Local optimistic membership update.
    UpdateStatus {
        product_id: ProductId,
        is_in_wishlist: bool,
    },
    /// The user logged out somewhere in the application.
    LoggedOut,
}

impl WishlistState {
    /// Whether `product_id` is known to be in the wishlist.
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.membership.get(&product_id).copied().unwrap_or(false)
    }

    /// Look up a fetched product.
    pub fn item(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == product_id)
    }

    pub fn apply(&mut self, action: WishlistAction) {
        match action {
            WishlistAction::FetchPending => {
                self.loading = true;
                self.error = None;
            }
            WishlistAction::FetchFulfilled(products) => {
                self.loading = false;
                self.error = None;
                self.items = Vec::with_capacity(products.len());
                for product in products {
                    self.membership.insert(product.id, true);
                    if self.item(product.id).is_none() {
                        self.items.push(product);
                    }
                }
            }
            WishlistAction::FetchRejected(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            WishlistAction::Added(product_id) => {
                self.membership.insert(product_id, true);
            }
            WishlistAction::Removed(product_id) => {
                self.membership.insert(product_id, false);
                self.items.retain(|p| p.id != product_id);
            }
            WishlistAction::StatusChecked {
                product_id,
                is_in_wishlist,
            }
            | WishlistAction::UpdateStatus {
                product_id,
                is_in_wishlist,
            } => {
                self.membership.insert(product_id, is_in_wishlist);
            }
            WishlistAction::Clear => {
                self.items.clear();
                self.membership.clear();
            }
            WishlistAction::LoggedOut => {
                self.items.clear();
                self.membership.clear();
                self.error = None;
                self.loading = false;
            }
        }
    }
}
