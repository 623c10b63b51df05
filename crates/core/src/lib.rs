//! Storecart Core - cart state and catalog types.
//!
//! This crate provides the pieces shared by the storefront and the CLI:
//! - `storefront` - Server-rendered catalog page and cart controls
//! - `cli` - Session table migration and catalog inspection
//!
//! # Architecture
//!
//! The core crate does no network or database I/O. Durable storage is reached
//! through the [`storage::Storage`] trait, which the storefront implements on
//! top of the visitor's session.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and the product catalog
//! - [`cart`] - The cart state container and its write-through wrapper
//! - [`storage`] - Key-value storage trait and JSON load/store helpers
//! - [`visibility`] - Open/closed flag for the cart summary panel

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod storage;
pub mod types;
pub mod visibility;

pub use cart::{CART_STORAGE_KEY, CartEntry, CartItems, ShoppingCart};
pub use storage::{DecodeError, MemoryStorage, Storage, StorageError, StoreError};
pub use types::*;
pub use visibility::CartVisibility;
