#![allow(clippy::unwrap_used)]
// Integration tests for `Wishlist` against a wiremock storefront: state
// transitions per operation, error messages, and logout invalidation.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopsphere_core::{
    ClientConfig, MemoryCredentialStore, ProductId, Session, Wishlist, WishlistError,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(token: Option<&str>) -> (MockServer, Session, Wishlist) {
    let server = MockServer::start().await;
    let config = ClientConfig {
        base_url: format!("{}/api", server.uri()).parse().unwrap(),
        ..ClientConfig::default()
    };
    let store = Arc::new(match token {
        Some(t) => MemoryCredentialStore::with_token(t),
        None => MemoryCredentialStore::new(),
    });
    let session = Session::connect(&config, store).unwrap();
    let wishlist = Wishlist::new(&session);
    (server, session, wishlist)
}

fn product(id: u64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "price": 19.99,
        "imageUrl": format!("https://cdn.example.com/{id}.png"),
        "stock": 3
    })
}

fn ids(wishlist: &Wishlist) -> Vec<u64> {
    wishlist.state().items.iter().map(|p| p.id.0).collect()
}

// ── Fetch ───────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_replaces_items_in_server_order() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product(7, "Lamp"),
            product(3, "Mug"),
            product(11, "Desk")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let products = wishlist.fetch().await.unwrap();
    assert_eq!(products.len(), 3);

    let state = wishlist.state();
    assert_eq!(ids(&wishlist), vec![7, 3, 11]);
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert!(state.is_in_wishlist(ProductId(3)));
    assert_eq!(state.items[0].name, "Lamp");
}

#[tokio::test]
async fn fetch_unauthorized_prompts_login() {
    let (server, _session, wishlist) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "no token"})))
        .mount(&server)
        .await;

    let err = wishlist.fetch().await.unwrap_err();
    assert_eq!(
        err,
        WishlistError::AuthRequired {
            message: "Please login to view your wishlist".into()
        }
    );

    let state = wishlist.state();
    assert!(!state.loading);
    assert_eq!(
        state.error.as_deref(),
        Some("Please login to view your wishlist")
    );
}

#[tokio::test]
async fn fetch_failure_keeps_previous_items() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(1, "Pen")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Database unavailable"})),
        )
        .mount(&server)
        .await;

    wishlist.fetch().await.unwrap();
    let err = wishlist.fetch().await.unwrap_err();

    assert_eq!(err.message(), "Database unavailable");
    assert_eq!(ids(&wishlist), vec![1]);
    assert_eq!(
        wishlist.state().error.as_deref(),
        Some("Database unavailable")
    );
}

#[tokio::test]
async fn fetch_without_server_text_uses_fallback() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = wishlist.fetch().await.unwrap_err();
    assert_eq!(err.message(), "Failed to fetch wishlist");
    assert!(!err.is_auth_required());
}

// ── Add / remove ────────────────────────────────────────────────────

#[tokio::test]
async fn add_marks_membership_without_touching_items() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/api/wishlist/add/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Added to wishlist"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let message = wishlist.add(ProductId(42)).await.unwrap();

    assert_eq!(message.as_deref(), Some("Added to wishlist"));
    assert!(wishlist.state().is_in_wishlist(ProductId(42)));
    assert!(wishlist.state().items.is_empty());
}

#[tokio::test]
async fn add_failure_leaves_state_alone() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/api/wishlist/add/42"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"error": "Already in wishlist"})),
        )
        .mount(&server)
        .await;

    let err = wishlist.add(ProductId(42)).await.unwrap_err();

    assert_eq!(err.message(), "Already in wishlist");
    assert!(!wishlist.state().is_in_wishlist(ProductId(42)));
    assert_eq!(wishlist.state().error, None);
}

#[tokio::test]
async fn add_unauthorized_prompts_login() {
    let (server, _session, wishlist) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/api/wishlist/add/5"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = wishlist.add(ProductId(5)).await.unwrap_err();
    assert_eq!(err.message(), "Please login to add items to wishlist");
}

#[tokio::test]
async fn remove_drops_item_and_membership() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([product(1, "Pen"), product(2, "Ink")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/wishlist/remove/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Removed"})))
        .expect(1)
        .mount(&server)
        .await;

    wishlist.fetch().await.unwrap();
    wishlist.remove(ProductId(1)).await.unwrap();

    assert_eq!(ids(&wishlist), vec![2]);
    assert!(!wishlist.state().is_in_wishlist(ProductId(1)));
    assert!(wishlist.state().is_in_wishlist(ProductId(2)));
}

#[tokio::test]
async fn add_then_remove_flips_membership() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/api/wishlist/add/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Added"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/wishlist/remove/42"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    wishlist.add(ProductId(42)).await.unwrap();
    assert!(wishlist.state().is_in_wishlist(ProductId(42)));

    wishlist.remove(ProductId(42)).await.unwrap();
    assert!(!wishlist.state().is_in_wishlist(ProductId(42)));
    assert!(ids(&wishlist).is_empty());
}

#[tokio::test]
async fn remove_failure_reports_fallback() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("DELETE"))
        .and(path("/api/wishlist/remove/9"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = wishlist.remove(ProductId(9)).await.unwrap_err();
    assert_eq!(err.message(), "Failed to remove from wishlist");
}

// ── Check ───────────────────────────────────────────────────────────

#[tokio::test]
async fn check_records_server_answer() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/wishlist/check/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"isInWishlist": true})))
        .mount(&server)
        .await;

    assert!(wishlist.check(ProductId(8)).await);
    assert!(wishlist.state().is_in_wishlist(ProductId(8)));
}

#[tokio::test]
async fn check_soft_fails_to_false() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/wishlist/check/8"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/wishlist/check/9"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    wishlist.update_status(ProductId(8), true);

    assert!(!wishlist.check(ProductId(8)).await);
    assert!(!wishlist.check(ProductId(9)).await);

    let state = wishlist.state();
    assert_eq!(state.membership.get(&ProductId(8)), Some(&false));
    assert_eq!(state.membership.get(&ProductId(9)), Some(&false));
    assert_eq!(state.error, None);
}

// ── Local operations ────────────────────────────────────────────────

#[tokio::test]
async fn clear_and_update_status_are_local() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(4, "Cup")])))
        .expect(1)
        .mount(&server)
        .await;

    wishlist.fetch().await.unwrap();
    wishlist.update_status(ProductId(10), true);
    assert!(wishlist.state().is_in_wishlist(ProductId(10)));

    wishlist.clear();
    let state = wishlist.state();
    assert!(state.items.is_empty());
    assert!(state.membership.is_empty());
}

// ── Logout ──────────────────────────────────────────────────────────

#[tokio::test]
async fn logout_resets_state() {
    let (server, session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(4, "Cup")])))
        .mount(&server)
        .await;

    wishlist.fetch().await.unwrap();
    session.logout().unwrap();

    let state = wishlist.state();
    assert!(state.items.is_empty());
    assert!(state.membership.is_empty());
    assert!(!state.loading);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn fetch_resolving_after_logout_is_discarded() {
    let (server, session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([product(4, "Cup")]))
                .set_delay(Duration::from_secs(1)),
        )
        .mount(&server)
        .await;

    let mut updates = wishlist.subscribe();
    let pending = tokio::spawn({
        let wishlist = wishlist.clone();
        async move { wishlist.fetch().await }
    });

    tokio::time::timeout(Duration::from_secs(5), async {
        while !updates.current().loading {
            updates.changed().await.unwrap();
        }
    })
    .await
    .unwrap();
    session.logout().unwrap();

    // The caller still gets its result; the store does not.
    let products = pending.await.unwrap().unwrap();
    assert_eq!(products.len(), 1);

    let state = wishlist.state();
    assert!(state.items.is_empty());
    assert!(!state.loading);
}

#[tokio::test]
async fn dropped_wishlist_releases_its_store() {
    let (_server, session, wishlist) = setup(Some("tok")).await;

    let store = Arc::downgrade(wishlist.store());
    drop(wishlist);
    assert!(store.upgrade().is_none());

    let survivor = Wishlist::new(&session);
    survivor.update_status(ProductId(8), true);
    session.logout().unwrap();
    assert!(survivor.state().membership.is_empty());
}

// ── Subscription ────────────────────────────────────────────────────

#[tokio::test]
async fn subscribers_observe_fetch() {
    let (server, _session, wishlist) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(6, "Hat")])))
        .mount(&server)
        .await;

    let mut stream = wishlist.subscribe().into_stream();
    let initial = stream.next().await.unwrap();
    assert!(initial.items.is_empty());

    wishlist.fetch().await.unwrap();

    let latest = wishlist.subscribe();
    assert_eq!(latest.current().items.len(), 1);
    // Intermediate snapshots coalesce; the stream yields the settled one.
    let next = stream.next().await.unwrap();
    assert_eq!(next.items.len(), 1);
    assert!(!next.loading);
}
