//! Catalog page and item display units.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use storecart_core::Product;
use tracing::instrument;

use crate::filters;
use crate::middleware::CartContext;
use crate::routes::cart::CartPanelView;
use crate::state::AppState;

/// One product card: static attributes plus its current cart quantity.
#[derive(Clone, Debug)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub img_url: String,
    pub quantity: u32,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.unit_price().display(),
            img_url: product.img_url.clone(),
            quantity,
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "store/index.html")]
pub struct StoreTemplate {
    pub products: Vec<ProductCardView>,
    pub count: u32,
    pub panel: CartPanelView,
}

/// Single item card fragment (for HTMX).
///
/// With `oob` set the card is marked for an out-of-band swap, so it can ride
/// along with a response that targets some other element.
#[derive(Template, WebTemplate)]
#[template(path = "partials/store_item.html")]
pub struct StoreItemTemplate {
    pub item: ProductCardView,
    pub oob: bool,
}

/// Display the catalog with one card per product, in catalog order.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, cart: CartContext) -> impl IntoResponse {
    let catalog = state.catalog();
    let products = catalog
        .iter()
        .map(|product| ProductCardView::new(product, cart.get_quantity(product.id)))
        .collect();

    StoreTemplate {
        products,
        count: cart.total_quantity(),
        panel: CartPanelView::build(&*cart, catalog),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use storecart_core::ProductId;

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(4),
            name: "Car".to_string(),
            price: Decimal::new(14_000, 0),
            img_url: "/static/imgs/car.svg".to_string(),
        }
    }

    #[test]
    fn test_card_view_formats_price() {
        let view = ProductCardView::new(&product(), 2);
        assert_eq!(view.id, 4);
        assert_eq!(view.price, "$14,000.00");
        assert_eq!(view.quantity, 2);
    }

    #[test]
    fn test_card_without_quantity_offers_add() {
        let html = StoreItemTemplate {
            item: ProductCardView::new(&product(), 0),
            oob: false,
        }
        .render()
        .unwrap();
        assert!(html.contains("id=\"product-4\""));
        assert!(html.contains("+ Add To Cart"));
        assert!(!html.contains("Remove"));
    }

    #[test]
    fn test_card_with_quantity_offers_controls() {
        let html = StoreItemTemplate {
            item: ProductCardView::new(&product(), 3),
            oob: false,
        }
        .render()
        .unwrap();
        assert!(html.contains("<span class=\"quantity\">3</span> in cart"));
        assert!(html.contains("/cart/decrease"));
        assert!(html.contains("/cart/increase"));
        assert!(html.contains("Remove"));
        assert!(!html.contains("+ Add To Cart"));
    }

    #[test]
    fn test_card_out_of_band() {
        let html = StoreItemTemplate {
            item: ProductCardView::new(&product(), 1),
            oob: true,
        }
        .render()
        .unwrap();
        assert!(html.contains("id=\"product-4\" hx-swap-oob=\"true\""));

        let html = StoreItemTemplate {
            item: ProductCardView::new(&product(), 1),
            oob: false,
        }
        .render()
        .unwrap();
        assert!(!html.contains("hx-swap-oob"));
    }
}
