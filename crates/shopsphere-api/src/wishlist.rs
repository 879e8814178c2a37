// Wishlist endpoints
//
// One method per REST call. These return raw API errors; mapping them into
// operation-level outcomes is the core crate's job.

use serde_json::json;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{AddResponse, CheckResponse, Product, ProductId};

impl ApiClient {
    /// `GET /wishlist`: the user's wishlist in server order.
    pub async fn list_wishlist(&self) -> Result<Vec<Product>, Error> {
        self.get("wishlist").await
    }

    /// `POST /wishlist/add/{id}`; returns the server's confirmation message.
    pub async fn add_to_wishlist(&self, product_id: ProductId) -> Result<AddResponse, Error> {
        self.post(&format!("wishlist/add/{product_id}"), &json!({}))
            .await
    }

    /// `DELETE /wishlist/remove/{id}`.
    pub async fn remove_from_wishlist(&self, product_id: ProductId) -> Result<(), Error> {
        self.delete(&format!("wishlist/remove/{product_id}")).await
    }

    /// `GET /wishlist/check/{id}`.
    pub async fn check_wishlist(&self, product_id: ProductId) -> Result<bool, Error> {
        let resp: CheckResponse = self.get(&format!("wishlist/check/{product_id}")).await?;
        Ok(resp.is_in_wishlist)
    }
}
