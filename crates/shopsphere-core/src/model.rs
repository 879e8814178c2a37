// ── Domain model ──
//
// The wishlist only cares about product identity, so the wire types from
// `shopsphere-api` double as the domain types.

pub use shopsphere_api::{Product, ProductId};
