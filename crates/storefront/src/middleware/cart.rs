//! Cart extractor.
//!
//! Handlers that read or change the cart take a [`CartContext`] argument. It
//! is built from the visitor's session for each request, so every handler gets
//! the cart explicitly instead of looking it up from shared global state.

use std::ops::{Deref, DerefMut};

use axum::{extract::FromRequestParts, http::request::Parts};
use storecart_core::{CART_STORAGE_KEY, ShoppingCart};
use tower_sessions::Session;

use crate::error::AppError;
use crate::storage::SessionStorage;

/// The visitor's cart, rehydrated from their session.
///
/// Dereferences to [`ShoppingCart`]. Call [`CartContext::commit`] after
/// mutating so the changes reach the session store.
#[derive(Debug)]
pub struct CartContext {
    cart: ShoppingCart<SessionStorage>,
}

impl CartContext {
    /// Rehydrate the cart stored in `session`.
    pub async fn load(session: Session) -> Self {
        let storage = SessionStorage::preload(session, &[CART_STORAGE_KEY]).await;
        Self {
            cart: ShoppingCart::load(storage),
        }
    }

    /// Write pending cart changes to the session.
    ///
    /// Persistence is best-effort: a failed write is logged and the response
    /// is still rendered from the in-memory cart.
    pub async fn commit(&mut self) {
        let storage = self.cart.storage_mut();
        if !storage.is_dirty() {
            return;
        }
        if let Err(e) = storage.flush().await {
            tracing::warn!(error = %e, "Failed to save cart to session");
        }
    }
}

impl Deref for CartContext {
    type Target = ShoppingCart<SessionStorage>;

    fn deref(&self) -> &Self::Target {
        &self.cart
    }
}

impl DerefMut for CartContext {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cart
    }
}

impl<S> FromRequestParts<S> for CartContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(format!("session unavailable: {msg}")))?;

        Ok(Self::load(session).await)
    }
}
