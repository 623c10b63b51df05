//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the visitor's session (see [`CartContext`]).
//!
//! Mutations answer with the re-rendered fragment that issued them (an item
//! card or the cart panel) plus an `HX-Trigger: cart-updated` header. The
//! header badge and an open panel listen for that event and refresh
//! themselves. Plain form posts without HTMX are redirected back
//! to the catalog page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use storecart_core::{Catalog, Price, Product, ProductId, ShoppingCart, Storage};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CartContext;
use crate::routes::store::{ProductCardView, StoreItemTemplate};
use crate::state::AppState;

/// Event name announced to the page after every cart change.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// One line of the cart panel.
#[derive(Clone, Debug)]
pub struct CartLineView {
    pub id: i32,
    pub name: String,
    pub img_url: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

impl CartLineView {
    fn new(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            img_url: product.img_url.clone(),
            quantity,
            unit_price: product.unit_price().display(),
            line_price: Price::usd(product.price * Decimal::from(quantity)).display(),
        }
    }
}

/// Cart summary panel display data.
///
/// Entries whose product is no longer in the catalog get no line, but still
/// count toward `item_count`.
#[derive(Clone, Debug)]
pub struct CartPanelView {
    pub is_open: bool,
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

impl CartPanelView {
    #[must_use]
    pub fn build<S: Storage>(cart: &ShoppingCart<S>, catalog: &Catalog) -> Self {
        let lines = cart
            .items()
            .entries()
            .iter()
            .filter_map(|entry| {
                catalog
                    .get(entry.id)
                    .map(|product| CartLineView::new(product, entry.quantity.get()))
            })
            .collect();

        Self {
            is_open: cart.is_open(),
            lines,
            total: Price::usd(cart.items().subtotal(catalog)).display(),
            item_count: cart.total_quantity(),
        }
    }
}

/// Which fragment a mutation should answer with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fragment {
    /// The product's item card on the catalog page.
    #[default]
    Card,
    /// The cart summary panel.
    Panel,
}

/// Cart mutation form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub id: ProductId,
    #[serde(default)]
    pub fragment: Fragment,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub panel: CartPanelView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

#[derive(Debug, Clone, Copy)]
enum CartAction {
    Increase,
    Decrease,
    Remove,
}

impl CartAction {
    fn apply<S: Storage>(self, cart: &mut ShoppingCart<S>, id: ProductId) {
        match self {
            Self::Increase => cart.increase(id),
            Self::Decrease => cart.decrease(id),
            Self::Remove => cart.remove(id),
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Increase => "Increased cart quantity",
            Self::Decrease => "Decreased cart quantity",
            Self::Remove => "Removed item from cart",
        }
    }
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

fn render(template: &impl Template) -> Result<String> {
    template
        .render()
        .map_err(|e| AppError::Internal(format!("template render failed: {e}")))
}

/// Apply `action`, save the cart, and render the requested fragment.
///
/// A change made from the panel also carries the product's item card as an
/// out-of-band swap, so the catalog page never shows a stale quantity. An
/// open panel refreshes itself on `cart-updated`.
async fn apply_action(
    state: &AppState,
    mut cart: CartContext,
    headers: &HeaderMap,
    form: CartItemForm,
    action: CartAction,
) -> Result<Response> {
    action.apply(&mut *cart, form.id);
    cart.commit().await;

    let product_id = form.id.to_string();
    add_breadcrumb("cart", action.label(), Some(&[("product_id", product_id.as_str())]));
    tracing::debug!(
        product_id = %form.id,
        quantity = cart.get_quantity(form.id),
        total_quantity = cart.total_quantity(),
        "{}",
        action.label()
    );

    if !is_htmx(headers) {
        return Ok(Redirect::to("/").into_response());
    }

    let card = state.catalog().get(form.id).map(|product| StoreItemTemplate {
        item: ProductCardView::new(product, cart.get_quantity(form.id)),
        oob: form.fragment == Fragment::Panel,
    });

    let fragment = match form.fragment {
        Fragment::Card => match card {
            Some(card) => card.into_response(),
            // Stale entry for a product that left the catalog: nothing to redraw.
            None => StatusCode::NO_CONTENT.into_response(),
        },
        Fragment::Panel => {
            cart.open_cart();
            let mut html = render(&CartPanelTemplate {
                panel: CartPanelView::build(&*cart, state.catalog()),
            })?;
            if let Some(card) = card {
                html.push_str(&render(&card)?);
            }
            Html(html).into_response()
        }
    };

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        fragment,
    )
        .into_response())
}

/// Add one of a product to the cart (HTMX).
///
/// Only products in the catalog can be added.
#[instrument(skip(state, cart, headers))]
pub async fn increase(
    State(state): State<AppState>,
    cart: CartContext,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    if !state.catalog().contains(form.id) {
        return Err(AppError::NotFound(format!("product {}", form.id)));
    }
    apply_action(&state, cart, &headers, form, CartAction::Increase).await
}

/// Take one of a product out of the cart (HTMX).
#[instrument(skip(state, cart, headers))]
pub async fn decrease(
    State(state): State<AppState>,
    cart: CartContext,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    apply_action(&state, cart, &headers, form, CartAction::Decrease).await
}

/// Remove a product from the cart entirely (HTMX).
#[instrument(skip(state, cart, headers))]
pub async fn remove(
    State(state): State<AppState>,
    cart: CartContext,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    apply_action(&state, cart, &headers, form, CartAction::Remove).await
}

/// Show the cart panel (HTMX).
#[instrument(skip_all)]
pub async fn open(State(state): State<AppState>, mut cart: CartContext) -> impl IntoResponse {
    cart.open_cart();
    add_breadcrumb("cart", "Opened cart", None);
    CartPanelTemplate {
        panel: CartPanelView::build(&*cart, state.catalog()),
    }
}

/// Re-render the open cart panel (HTMX).
///
/// An open panel requests this whenever the cart changes elsewhere on the page.
#[instrument(skip_all)]
pub async fn panel(State(state): State<AppState>, mut cart: CartContext) -> impl IntoResponse {
    cart.open_cart();
    CartPanelTemplate {
        panel: CartPanelView::build(&*cart, state.catalog()),
    }
}

/// Hide the cart panel (HTMX).
#[instrument(skip_all)]
pub async fn close(State(state): State<AppState>, mut cart: CartContext) -> impl IntoResponse {
    cart.close_cart();
    CartPanelTemplate {
        panel: CartPanelView::build(&*cart, state.catalog()),
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip_all)]
pub async fn count(cart: CartContext) -> impl IntoResponse {
    CartCountTemplate {
        count: cart.total_quantity(),
    }
}
