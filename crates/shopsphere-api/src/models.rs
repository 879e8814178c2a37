// Wire types for the storefront REST API.
//
// Field names follow the server's camelCase JSON. Only `id` is load-bearing
// for the wishlist; the rest of `Product` is carried through for display.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned numeric product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A catalogue product as returned by `GET /wishlist`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<i64>,
}

/// Body of `POST /wishlist/add/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /wishlist/check/{id}`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CheckResponse {
    #[serde(rename = "isInWishlist")]
    pub is_in_wishlist: bool,
}

/// Error shape shared by every endpoint: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of the login and refresh endpoints.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
}
