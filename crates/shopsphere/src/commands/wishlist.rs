//! Wishlist command handlers.

use serde::Serialize;
use tabled::Tabled;

use shopsphere_core::{Product, ProductId, Session, Wishlist};

use crate::cli::{GlobalOpts, WishlistArgs, WishlistCommand};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Stock")]
    stock: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            price: p.price.map(|v| format!("{v:.2}")).unwrap_or_default(),
            category: p.category.clone().unwrap_or_default(),
            stock: p.stock.map(|s| s.to_string()).unwrap_or_default(),
            rating: match (p.rating, p.review_count) {
                (Some(r), Some(n)) => format!("{r:.1} ({n})"),
                (Some(r), None) => format!("{r:.1}"),
                _ => String::new(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusEntry {
    product_id: ProductId,
    is_in_wishlist: bool,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Product")]
    product_id: String,
    #[tabled(rename = "In wishlist")]
    is_in_wishlist: &'static str,
}

impl From<&StatusEntry> for StatusRow {
    fn from(s: &StatusEntry) -> Self {
        Self {
            product_id: s.product_id.to_string(),
            is_in_wishlist: if s.is_in_wishlist { "yes" } else { "no" },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    resolved: &Resolved,
    args: WishlistArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let wishlist = Wishlist::new(session);
    let fail = |e| CliError::from_wishlist(e, &resolved.profile_name);

    match args.command {
        WishlistCommand::List => {
            let pb = util::spinner(global, "Fetching wishlist");
            let result = wishlist.fetch().await;
            pb.finish_and_clear();
            let products = result.map_err(fail)?;

            if products.is_empty() && global.output == crate::cli::OutputFormat::Table {
                output::note(global, "Your wishlist is empty");
                return Ok(());
            }
            let out = output::render_list(
                global.output,
                &products,
                |p| ProductRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WishlistCommand::Add { product_id } => {
            let id = ProductId(product_id);
            let message = wishlist.add(id).await.map_err(fail)?;
            let message = message.unwrap_or_else(|| format!("Product {id} added to wishlist"));
            output::success(global, &message);
            Ok(())
        }

        WishlistCommand::Remove { product_id } => {
            let id = ProductId(product_id);
            wishlist.remove(id).await.map_err(fail)?;
            output::success(global, &format!("Product {id} removed from wishlist"));
            Ok(())
        }

        WishlistCommand::Check { product_ids } => {
            let mut entries = Vec::with_capacity(product_ids.len());
            for id in product_ids.into_iter().map(ProductId) {
                entries.push(StatusEntry {
                    product_id: id,
                    is_in_wishlist: wishlist.check(id).await,
                });
            }

            let out = output::render_list(global.output, &entries, |s| StatusRow::from(s), |s| {
                format!("{} {}", s.product_id, s.is_in_wishlist)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
