//! Key-value persistence contract and baseline adapters.
//!
//! The desktop core persists two side tables (icon positions, window
//! registry) through this interface, keyed by fixed string names. Writes are
//! fire-and-forget best-effort durability: a failed save is reported but
//! never rolls back in-memory state.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`KeyValueStore`] methods.
pub type KeyValueFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service storing raw JSON strings under fixed keys.
pub trait KeyValueStore {
    /// Loads the raw JSON string stored under `key`, if any.
    fn load_value<'a>(&'a self, key: &'a str)
        -> KeyValueFuture<'a, Result<Option<String>, String>>;

    /// Stores `raw_json` under `key`, replacing any previous value.
    fn save_value<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> KeyValueFuture<'a, Result<(), String>>;

    /// Removes the value stored under `key`, if any.
    fn remove_value<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Adapter that stores nothing and loads nothing. Used on targets without a
/// durability backend and as the baseline in tests.
pub struct NoopKeyValueStore;

impl KeyValueStore for NoopKeyValueStore {
    fn load_value<'a>(
        &'a self,
        _key: &'a str,
    ) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_value<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn remove_value<'a>(&'a self, _key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory adapter backed by a shared map. Clones observe the same data.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryKeyValueStore {
    fn load_value<'a>(
        &'a self,
        key: &'a str,
    ) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().get(key).cloned()) })
    }

    fn save_value<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn remove_value<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed value stored under `key`.
///
/// # Errors
///
/// Returns an error when the store read or JSON decoding fails.
pub async fn load_typed<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_value(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw).map(Some).map_err(|e| e.to_string())
}

/// Serializes and stores a typed value under `key`.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_typed<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_value(key, &raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct IconSlot {
        x: i32,
        y: i32,
    }

    #[test]
    fn memory_store_saves_overwrites_and_removes() {
        let store = MemoryKeyValueStore::default();
        let store_obj: &dyn KeyValueStore = &store;

        block_on(store_obj.save_value("desktop.icons", "{\"a\":1}")).expect("save");
        block_on(store_obj.save_value("desktop.icons", "{\"a\":2}")).expect("overwrite");
        assert_eq!(
            block_on(store_obj.load_value("desktop.icons")).expect("load"),
            Some("{\"a\":2}".to_string())
        );

        block_on(store_obj.remove_value("desktop.icons")).expect("remove");
        assert_eq!(
            block_on(store_obj.load_value("desktop.icons")).expect("load"),
            None
        );
    }

    #[test]
    fn memory_store_clones_share_data() {
        let store = MemoryKeyValueStore::default();
        let alias = store.clone();
        block_on(store.save_value("k", "1")).expect("save");
        assert_eq!(block_on(alias.load_value("k")).expect("load"), Some("1".to_string()));
    }

    #[test]
    fn typed_helpers_round_trip() {
        let store = MemoryKeyValueStore::default();
        block_on(save_typed(&store, "slot", &IconSlot { x: 20, y: 115 })).expect("save typed");

        let loaded: Option<IconSlot> = block_on(load_typed(&store, "slot")).expect("load typed");
        assert_eq!(loaded, Some(IconSlot { x: 20, y: 115 }));
    }

    #[test]
    fn typed_load_reports_decode_failure() {
        let store = MemoryKeyValueStore::default();
        block_on(store.save_value("slot", "not-json")).expect("save");
        let err = block_on(load_typed::<_, IconSlot>(&store, "slot")).expect_err("decode fails");
        assert!(!err.is_empty());
    }

    #[test]
    fn noop_store_loads_nothing_and_accepts_writes() {
        let store = NoopKeyValueStore;
        let store_obj: &dyn KeyValueStore = &store;
        block_on(store_obj.save_value("k", "{}")).expect("save");
        assert_eq!(block_on(store_obj.load_value("k")).expect("load"), None);
        block_on(store_obj.remove_value("k")).expect("remove");
    }
}
