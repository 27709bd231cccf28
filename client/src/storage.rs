//! Client-side persistence port.
//!
//! The portal keeps disposable scratch state (the cart per period) and a few
//! global preferences in a key-value cache. The port is deliberately tiny so
//! the state machines stay unit-testable against an in-memory backend.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use huay_types::lottery::{BetSession, BetType, Cart, InputMode};

/// Well-known cache keys. The cart key is period-scoped; preferences and
/// session keys are global.
pub mod keys {
    pub const BET_TYPE: &str = "lottery_bet_type";
    pub const INPUT_MODE: &str = "lottery_input_mode";
    pub const MEMBER_TOKEN: &str = "memberToken";
    pub const MEMBER_REFRESH_TOKEN: &str = "memberRefreshToken";
    pub const MEMBER_ID: &str = "memberId";
    pub const MEMBER_PROFILE: &str = "memberProfile";

    pub fn cart(period_id: &str) -> String {
        format!("lottery_cart_{period_id}")
    }
}

/// Synchronous key-value cache. Writes are the last step of every state
/// mutation (write-through), so implementations need no transactionality.
pub trait KeyValue: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.map
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).remove(key);
    }
}

/// File-backed backend: one JSON object per store, rewritten on every change.
pub struct JsonFileStore {
    path: PathBuf,
    map: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open a store at `path`, loading any existing content. A missing or
    /// malformed file starts empty.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let map = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err),
        };
        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    fn flush(&self, map: &HashMap<String, String>) {
        let raw = match serde_json::to_string(map) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(?err, "failed to encode local store");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, raw) {
            tracing::warn!(?err, path = %self.path.display(), "failed to write local store");
        }
    }
}

impl KeyValue for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.insert(key.to_string(), value.to_string());
        self.flush(&map);
    }

    fn remove(&self, key: &str) {
        let mut map = self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.remove(key);
        self.flush(&map);
    }
}

/// Shared handle over a [`KeyValue`] backend with typed load/save helpers for
/// the betting session. Hydration of a missing or malformed value falls back
/// to the documented defaults: empty cart, default bet type, keypad mode.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<dyn KeyValue>,
}

impl LocalStore {
    pub fn new(inner: Arc<dyn KeyValue>) -> Self {
        Self { inner }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn raw(&self) -> &Arc<dyn KeyValue> {
        &self.inner
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    pub fn set(&self, key: &str, value: &str) {
        self.inner.set(key, value)
    }

    pub fn remove(&self, key: &str) {
        self.inner.remove(key)
    }

    /// Rebuild the betting session for a period from cached state.
    pub fn load_session(&self, period_id: &str) -> BetSession {
        let selected: Vec<BetType> = self
            .inner
            .get(keys::BET_TYPE)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        let input_mode = self
            .inner
            .get(keys::INPUT_MODE)
            .and_then(|raw| InputMode::from_str(&raw))
            .unwrap_or_default();
        let cart: Cart = self
            .inner
            .get(&keys::cart(period_id))
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        BetSession::hydrate(selected, input_mode, cart)
    }

    pub fn save_cart(&self, period_id: &str, cart: &Cart) {
        match serde_json::to_string(cart) {
            Ok(raw) => self.inner.set(&keys::cart(period_id), &raw),
            Err(err) => tracing::warn!(?err, "failed to encode cart"),
        }
    }

    pub fn save_selected(&self, selected: &[BetType]) {
        match serde_json::to_string(selected) {
            Ok(raw) => self.inner.set(keys::BET_TYPE, &raw),
            Err(err) => tracing::warn!(?err, "failed to encode bet-type selection"),
        }
    }

    pub fn save_input_mode(&self, mode: InputMode) {
        self.inner.set(keys::INPUT_MODE, mode.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v");
        assert_eq!(store.get("k"), Some("v".to_string()));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_load_session_defaults_on_malformed_state() {
        let store = LocalStore::in_memory();
        store.set(keys::BET_TYPE, "not json");
        store.set(keys::INPUT_MODE, "telepathy");
        store.set(&keys::cart("7"), "{broken");

        let session = store.load_session("7");
        assert_eq!(session.selected(), &[BetType::TopThree]);
        assert_eq!(session.input_mode(), InputMode::Keypad);
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_load_session_restores_saved_state() {
        let store = LocalStore::in_memory();
        store.save_selected(&[BetType::TopTwo, BetType::BottomTwo]);
        store.save_input_mode(InputMode::Grid);

        let mut cart = Cart::default();
        cart.add(huay_types::lottery::LineDraft {
            bet_type: BetType::TopTwo,
            number: "55".to_string(),
            amount: 10,
            multiply: 90.0,
            sale_cap: None,
        });
        store.save_cart("7", &cart);

        let session = store.load_session("7");
        assert_eq!(session.selected(), &[BetType::TopTwo, BetType::BottomTwo]);
        assert_eq!(session.input_mode(), InputMode::Grid);
        assert_eq!(session.cart(), &cart);

        // Cart keys are period-scoped.
        assert!(store.load_session("8").cart().is_empty());
    }

    #[test]
    fn test_json_file_store_persists_across_opens() {
        let path = std::env::temp_dir().join(format!(
            "huay-store-{}-{}.json",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set("memberToken", "abc");
        }
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("memberToken"), Some("abc".to_string()));

        std::fs::remove_file(&path).ok();
    }
}
