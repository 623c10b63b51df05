//! Session-backed implementation of the core [`Storage`] trait.
//!
//! The visitor's tower-sessions record plays the part of browser local
//! storage: it is scoped to one visitor and survives page reloads. Session
//! access is async, so [`SessionStorage`] reads the keys a request needs up
//! front, serves the synchronous `Storage` calls from that snapshot, and writes
//! changed keys back in [`SessionStorage::flush`].

use std::collections::{BTreeSet, HashMap};

use storecart_core::{Storage, StorageError};
use tower_sessions::Session;

/// Prefix that keeps storage keys apart from other session data.
const SESSION_KEY_PREFIX: &str = "storage:";

fn session_key(key: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{key}")
}

/// Per-request view of the session as a string key-value store.
#[derive(Debug)]
pub struct SessionStorage {
    session: Session,
    /// Preloaded values; `None` means the key is absent.
    values: HashMap<String, Option<String>>,
    /// Keys whose read failed during preload.
    unreadable: BTreeSet<String>,
    /// Keys changed since preload.
    dirty: BTreeSet<String>,
}

impl SessionStorage {
    /// Read `keys` from the session.
    ///
    /// A key whose stored value cannot be read is remembered as unreadable;
    /// `get_item` reports it as a storage error so callers fall back to their
    /// defaults.
    pub async fn preload(session: Session, keys: &[&str]) -> Self {
        let mut values = HashMap::with_capacity(keys.len());
        let mut unreadable = BTreeSet::new();

        for key in keys {
            match session.get::<String>(&session_key(key)).await {
                Ok(value) => {
                    values.insert((*key).to_string(), value);
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "Failed to read session storage");
                    unreadable.insert((*key).to_string());
                }
            }
        }

        Self {
            session,
            values,
            unreadable,
            dirty: BTreeSet::new(),
        }
    }

    /// Whether any key has been written or removed since preload.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Write every changed key back to the session.
    ///
    /// # Errors
    ///
    /// Returns the session error for the first key that fails; keys not yet
    /// written stay dirty.
    pub async fn flush(&mut self) -> Result<(), tower_sessions::session::Error> {
        while let Some(key) = self.dirty.pop_first() {
            let result = match self.values.get(&key) {
                Some(Some(value)) => self.session.insert(&session_key(&key), value).await,
                _ => self
                    .session
                    .remove::<String>(&session_key(&key))
                    .await
                    .map(|_| ()),
            };
            if let Err(e) = result {
                self.dirty.insert(key);
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Storage for SessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unreadable.contains(key) {
            return Err(StorageError::Unavailable(format!(
                "session value for {key} could not be read"
            )));
        }
        self.values.get(key).cloned().ok_or_else(|| {
            StorageError::Unavailable(format!("{key} was not loaded for this request"))
        })
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.unreadable.remove(key);
        self.values.insert(key.to_string(), Some(value));
        self.dirty.insert(key.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.unreadable.remove(key);
        self.values.insert(key.to_string(), None);
        self.dirty.insert(key.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_absent_key_reads_as_none() {
        let storage = SessionStorage::preload(new_session(), &["cart"]).await;
        assert_eq!(storage.get_item("cart").unwrap(), None);
        assert!(!storage.is_dirty());
    }

    #[tokio::test]
    async fn test_unloaded_key_is_error() {
        let storage = SessionStorage::preload(new_session(), &["cart"]).await;
        assert!(storage.get_item("other").is_err());
    }

    #[tokio::test]
    async fn test_flush_writes_to_session() {
        let session = new_session();
        let mut storage = SessionStorage::preload(session.clone(), &["cart"]).await;
        storage.set_item("cart", "[1]".to_string()).unwrap();
        assert!(storage.is_dirty());
        storage.flush().await.unwrap();
        assert!(!storage.is_dirty());

        let reread = SessionStorage::preload(session, &["cart"]).await;
        assert_eq!(reread.get_item("cart").unwrap().as_deref(), Some("[1]"));
    }

    #[tokio::test]
    async fn test_flush_removes_from_session() {
        let session = new_session();
        session
            .insert(&session_key("cart"), "[1]".to_string())
            .await
            .unwrap();

        let mut storage = SessionStorage::preload(session.clone(), &["cart"]).await;
        storage.remove_item("cart").unwrap();
        storage.flush().await.unwrap();

        let raw: Option<String> = session.get(&session_key("cart")).await.unwrap();
        assert!(raw.is_none());
    }

    #[tokio::test]
    async fn test_non_string_session_value_is_unreadable() {
        let session = new_session();
        session.insert(&session_key("cart"), 42).await.unwrap();

        let storage = SessionStorage::preload(session, &["cart"]).await;
        assert!(matches!(
            storage.get_item("cart"),
            Err(StorageError::Unavailable(_))
        ));
    }
}
