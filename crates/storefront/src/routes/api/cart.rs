//! Cart JSON API.
//!
//! Read-only view of the visitor's cart in the same shape it is persisted in,
//! plus the derived totals.

use axum::{Json, extract::State};
use serde::Serialize;
use storecart_core::{CartEntry, Price};
use tracing::instrument;

use crate::middleware::CartContext;
use crate::state::AppState;

/// Cart summary returned by `GET /api/cart`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartEntry>,
    pub total_quantity: u32,
    pub subtotal: String,
}

/// Return the visitor's cart.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, cart: CartContext) -> Json<CartSummary> {
    Json(CartSummary {
        items: cart.entries().to_vec(),
        total_quantity: cart.total_quantity(),
        subtotal: Price::usd(cart.items().subtotal(state.catalog())).display(),
    })
}
