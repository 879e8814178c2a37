// ── Reactive wishlist store ──
//
// Holds the current `WishlistState` behind a `watch` channel. Mutations
// rebuild the snapshot and wake subscribers. A session generation counter
// lets results of requests started before a logout be dropped.

mod state;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::trace;

pub use state::{WishlistAction, WishlistState};

use crate::session::LogoutReset;
use crate::stream::StateStream;

/// Session generation captured when an operation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Predictable state container for the wishlist.
///
/// All writes go through [`dispatch`](Self::dispatch) or
/// [`dispatch_for`](Self::dispatch_for); readers take cheap `Arc` snapshots
/// or subscribe for changes.
pub struct WishlistStore {
    state: watch::Sender<Arc<WishlistState>>,
    /// Bumped on logout, only while the watch lock is held.
    generation: AtomicU64,
}

impl Default for WishlistStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WishlistStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(WishlistState::default()));
        Self {
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<WishlistState> {
        self.state.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.state.subscribe())
    }

    /// Apply an action unconditionally.
    pub fn dispatch(&self, action: WishlistAction) {
        trace!(?action, "dispatch");
        // `send_modify` updates unconditionally, even with zero receivers.
        self.state
            .send_modify(|snap| Arc::make_mut(snap).apply(action));
    }

    /// Mark the start of a server round-trip.
    pub fn ticket(&self) -> Ticket {
        Ticket(self.generation.load(Ordering::Acquire))
    }

    /// Apply an action only if no logout happened since `ticket` was taken.
    ///
    /// Returns `false` when the action was discarded as stale.
    pub fn dispatch_for(&self, ticket: Ticket, action: WishlistAction) -> bool {
        self.state.send_if_modified(|snap| {
            if self.generation.load(Ordering::Acquire) != ticket.0 {
                trace!(?action, "discarding result from before logout");
                return false;
            }
            Arc::make_mut(snap).apply(action);
            true
        })
    }

    /// Reset on logout and invalidate every outstanding ticket.
    pub fn reset_session(&self) {
        self.state.send_modify(|snap| {
            self.generation.fetch_add(1, Ordering::AcqRel);
            Arc::make_mut(snap).apply(WishlistAction::LoggedOut);
        });
    }
}

impl LogoutReset for WishlistStore {
    fn reset_session(&self) {
        WishlistStore::reset_session(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductId;

    #[test]
    fn stale_ticket_is_discarded_after_logout() {
        let store = WishlistStore::new();
        let ticket = store.ticket();

        store.reset_session();

        assert!(!store.dispatch_for(ticket, WishlistAction::Added(ProductId(1))));
        assert!(store.snapshot().membership.is_empty());

        let fresh = store.ticket();
        assert!(store.dispatch_for(fresh, WishlistAction::Added(ProductId(1))));
        assert!(store.snapshot().is_in_wishlist(ProductId(1)));
    }

    #[test]
    fn snapshots_are_isolated_from_later_writes() {
        let store = WishlistStore::new();
        let before = store.snapshot();

        store.dispatch(WishlistAction::Added(ProductId(2)));

        assert!(!before.is_in_wishlist(ProductId(2)));
        assert!(store.snapshot().is_in_wishlist(ProductId(2)));
    }

    #[tokio::test]
    async fn subscribers_see_dispatches() {
        let store = WishlistStore::new();
        let mut stream = store.subscribe();

        store.dispatch(WishlistAction::UpdateStatus {
            product_id: ProductId(3),
            is_in_wishlist: true,
        });

        let snap = stream.changed().await.expect("store alive");
        assert!(snap.is_in_wishlist(ProductId(3)));
    }

    #[tokio::test]
    async fn discarded_dispatch_does_not_notify() {
        let store = WishlistStore::new();
        let ticket = store.ticket();
        store.reset_session();

        let mut stream = store.subscribe();
        store.dispatch_for(ticket, WishlistAction::Added(ProductId(9)));

        assert!(!stream.has_changed());
    }
}
