//! Identity sink: the externally shared username/roles state.
//!
//! The credential manager pushes a denormalized copy of the identity fields
//! here on every write; nothing is ever pulled back out by the credential
//! side.

use parking_lot::RwLock;

/// Receiver for identity updates. Setters are idempotent and have no side
/// effects beyond updating shared identity state.
pub trait IdentitySink: Send + Sync {
    fn set_username(&self, username: &str);

    fn set_roles(&self, roles: &[String]);
}

/// Process-wide in-memory identity store.
#[derive(Debug, Default)]
pub struct UserStore {
    state: RwLock<UserState>,
}

#[derive(Debug, Default, Clone)]
struct UserState {
    username: String,
    roles: Vec<String>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(&self) -> String {
        self.state.read().username.clone()
    }

    pub fn roles(&self) -> Vec<String> {
        self.state.read().roles.clone()
    }
}

impl IdentitySink for UserStore {
    fn set_username(&self, username: &str) {
        self.state.write().username = username.to_string();
    }

    fn set_roles(&self, roles: &[String]) {
        self.state.write().roles = roles.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let store = UserStore::new();
        assert_eq!(store.username(), "");
        assert!(store.roles().is_empty());
    }

    #[test]
    fn test_setters_replace_state() {
        let store = UserStore::new();
        store.set_username("alice");
        store.set_roles(&["admin".to_string(), "editor".to_string()]);

        assert_eq!(store.username(), "alice");
        assert_eq!(store.roles(), vec!["admin", "editor"]);

        store.set_roles(&[]);
        assert!(store.roles().is_empty());
    }
}
