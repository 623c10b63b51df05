//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (record in span, echo in response)
//! 4. Session layer (tower-sessions)
//! 5. Security headers
//!
//! [`CartContext`] is not a layer: it is an extractor that reads the cart out
//! of the session for the handlers that ask for it.

pub mod cart;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use cart::CartContext;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
