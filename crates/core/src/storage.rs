//! Key-value storage abstraction with JSON at the boundary.
//!
//! The [`Storage`] trait mirrors the Web Storage API: string keys, string
//! values, overwrite on set. Typed values are written and read through
//! [`store_json`] and [`load_json`], which serialize with `serde_json`.
//!
//! Durability is best-effort. [`load_json`] reports every failure explicitly;
//! [`load_or`] is the caller-side policy that substitutes a default value and
//! logs the cause instead.

use std::collections::HashMap;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded writing {key} ({size} bytes)")]
    QuotaExceeded { key: String, size: usize },
}

/// Errors reading a typed value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read stored value: {0}")]
    Read(#[from] StorageError),
    #[error("stored value is not valid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors writing a typed value.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write value: {0}")]
    Write(#[from] StorageError),
}

/// A durable string key-value store.
pub trait Storage {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete the value under `key`. Succeeds if nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Decode the JSON value stored under `key`.
///
/// # Errors
///
/// Returns `DecodeError::Read` if the backend fails, or `DecodeError::Json`
/// if the stored text does not decode as `T`.
pub fn load_json<T, S>(storage: &S, key: &str) -> Result<Option<T>, DecodeError>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    match storage.get_item(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Decode the value under `key`, falling back to `default` when it is absent
/// or cannot be read.
pub fn load_or<T, S>(storage: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    match load_json(storage, key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable stored value");
            default
        }
    }
}

/// Serialize `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StoreError::Encode` if serialization fails, or `StoreError::Write`
/// if the backend rejects the write.
pub fn store_json<T, S>(storage: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    storage.set_item(key, raw)?;
    Ok(())
}

/// In-memory storage, optionally with a per-value size limit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty store with no size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects values longer than `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        if self.quota.is_some_and(|quota| value.len() > quota) {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                size: value.len(),
            });
        }
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}
