//! Member session state.
//!
//! Tokens and the cached profile are written through to the local store on
//! every change so a restarted process resumes the same session.

use std::sync::{Arc, Mutex};

use huay_types::api::MemberProfile;

use crate::storage::{keys, LocalStore};

#[derive(Default)]
struct AuthState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    profile: Option<MemberProfile>,
}

/// Shared, cloneable view of the member session.
#[derive(Clone)]
pub struct AuthSession {
    store: LocalStore,
    inner: Arc<Mutex<AuthState>>,
}

impl AuthSession {
    /// Hydrate the session from the local store. Missing or malformed cached
    /// values leave the session logged out.
    pub fn new(store: LocalStore) -> Self {
        let state = AuthState {
            access_token: store.get(keys::MEMBER_TOKEN),
            refresh_token: store.get(keys::MEMBER_REFRESH_TOKEN),
            profile: store
                .get(keys::MEMBER_PROFILE)
                .and_then(|raw| serde_json::from_str(&raw).ok()),
        };
        Self {
            store,
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().access_token.is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    pub fn profile(&self) -> Option<MemberProfile> {
        self.lock().profile.clone()
    }

    pub fn set_tokens(&self, access: &str, refresh: &str) {
        let mut state = self.lock();
        state.access_token = Some(access.to_string());
        state.refresh_token = Some(refresh.to_string());
        drop(state);
        self.store.set(keys::MEMBER_TOKEN, access);
        self.store.set(keys::MEMBER_REFRESH_TOKEN, refresh);
    }

    pub fn set_access_token(&self, access: &str) {
        self.lock().access_token = Some(access.to_string());
        self.store.set(keys::MEMBER_TOKEN, access);
    }

    pub fn set_profile(&self, profile: MemberProfile) {
        self.store.set(keys::MEMBER_ID, &profile.id);
        match serde_json::to_string(&profile) {
            Ok(raw) => self.store.set(keys::MEMBER_PROFILE, &raw),
            Err(err) => tracing::warn!(?err, "failed to encode member profile"),
        }
        self.lock().profile = Some(profile);
    }

    /// Drop all session state, locally and in the store.
    pub fn clear(&self) {
        let mut state = self.lock();
        *state = AuthState::default();
        drop(state);
        self.store.remove(keys::MEMBER_TOKEN);
        self.store.remove(keys::MEMBER_REFRESH_TOKEN);
        self.store.remove(keys::MEMBER_ID);
        self.store.remove(keys::MEMBER_PROFILE);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AuthState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str) -> MemberProfile {
        MemberProfile {
            id: id.to_string(),
            phone: "0812345678".to_string(),
            full_name: None,
            credit: 0.0,
        }
    }

    #[test]
    fn test_session_starts_logged_out() {
        let session = AuthSession::new(LocalStore::in_memory());
        assert!(!session.is_authenticated());
        assert_eq!(session.access_token(), None);
        assert_eq!(session.profile(), None);
    }

    #[test]
    fn test_session_persists_through_store() {
        let store = LocalStore::in_memory();
        let session = AuthSession::new(store.clone());
        session.set_tokens("acc", "ref");
        session.set_profile(profile("m-1"));

        // A second session over the same store sees the login.
        let rehydrated = AuthSession::new(store.clone());
        assert!(rehydrated.is_authenticated());
        assert_eq!(rehydrated.access_token(), Some("acc".to_string()));
        assert_eq!(rehydrated.refresh_token(), Some("ref".to_string()));
        assert_eq!(rehydrated.profile().map(|p| p.id), Some("m-1".to_string()));
        assert_eq!(store.get(keys::MEMBER_ID), Some("m-1".to_string()));
    }

    #[test]
    fn test_clear_wipes_store() {
        let store = LocalStore::in_memory();
        let session = AuthSession::new(store.clone());
        session.set_tokens("acc", "ref");
        session.set_profile(profile("m-1"));
        session.clear();

        assert!(!session.is_authenticated());
        assert_eq!(store.get(keys::MEMBER_TOKEN), None);
        assert_eq!(store.get(keys::MEMBER_REFRESH_TOKEN), None);
        assert_eq!(store.get(keys::MEMBER_ID), None);
        assert_eq!(store.get(keys::MEMBER_PROFILE), None);
    }
}
