/// Explicit session state for the SPA
///
/// Replaces ambient module-level state with one object owning the session
/// lifecycle: populated on login success, cleared on logout or when the API
/// rejects the token. Views receive a reference to the [`Session`]; nothing
/// reads storage directly.
///
/// Persistence goes through the [`Storage`] seam (the web shell backs it
/// with `localStorage`; tests use [`MemoryStorage`]). The stored copy of
/// the user object is a cache with no server-side invalidation hook.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage key for the bearer token
const TOKEN_KEY: &str = "token";

/// Storage key for the cached user object
const USER_KEY: &str = "user";

/// The `{id, email}` user object cached alongside the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id
    pub id: i32,

    /// Email address
    pub email: String,
}

/// Key-value persistence seam for session state
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory storage, used in tests and headless contexts
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

// Lets a Session borrow its backing store, e.g. across a simulated reload.
impl<T: Storage + ?Sized> Storage for &mut T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

/// The application's session state
#[derive(Debug)]
pub struct Session<S: Storage> {
    storage: S,
    token: Option<String>,
    user: Option<UserProfile>,
}

impl<S: Storage> Session<S> {
    /// Loads session state from storage
    ///
    /// A cached user that fails to parse is discarded rather than kept as
    /// garbage; the token alone still satisfies the navigation guard.
    pub fn load(storage: S) -> Self {
        let token = storage.get(TOKEN_KEY);
        let user = storage
            .get(USER_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok());

        Self {
            storage,
            token,
            user,
        }
    }

    /// Populates the session after a successful login or registration
    pub fn establish(&mut self, token: String, user: UserProfile) {
        self.storage.set(TOKEN_KEY, &token);
        if let Ok(raw) = serde_json::to_string(&user) {
            self.storage.set(USER_KEY, &raw);
        }
        self.token = Some(token);
        self.user = Some(user);
    }

    /// Clears the session on logout, or when the API rejected the token
    /// (expiry detection happens server-side, never in the guard)
    pub fn clear(&mut self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        self.token = None;
        self.user = None;
    }

    /// Whether a token is stored, valid or not; this is all the navigation
    /// guard looks at
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The stored bearer token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The cached user object
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}
