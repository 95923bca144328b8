//! Account service - user directory and session pointer

use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::services::storage::Storage;

/// Registration, login and the persisted session pointer
#[derive(Clone)]
pub struct AccountService {
    storage: Storage,
}

impl AccountService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// All registered users, in registration order
    pub fn users(&self) -> Vec<User> {
        self.storage.load_or(&self.storage.keys().users, Vec::new())
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.users().into_iter().find(|u| u.email == email)
    }

    /// Register a new user
    ///
    /// Emails are compared exactly; "A@x.com" and "a@x.com" are different
    /// accounts.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let key = &self.storage.keys().users;
        let mut users: Vec<User> = self.storage.try_load(key)?.unwrap_or_default();

        if users.iter().any(|u| u.email == email) {
            return Err(Error::DuplicateEmail);
        }

        let user = User::new(name, email, password);
        users.push(user.clone());
        self.storage.save(key, &users)?;

        Ok(user)
    }

    /// Match credentials and persist the session pointer
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .users()
            .into_iter()
            .find(|u| u.credentials_match(email, password))
            .ok_or(Error::InvalidCredentials)?;

        self.storage.save(&self.storage.keys().current_user, &user)?;
        Ok(user)
    }

    /// Clear the session pointer
    pub fn logout(&self) -> Result<()> {
        self.storage.remove(&self.storage.keys().current_user)
    }

    /// The persisted session pointer, as stored
    pub fn session_pointer(&self) -> Option<User> {
        self.storage.load_or(&self.storage.keys().current_user, None)
    }

    /// Restore the persisted session
    ///
    /// With `validate` set, a pointer whose user is gone from the directory
    /// is cleared and no session is restored.
    pub fn restore_session(&self, validate: bool) -> Result<Option<User>> {
        let Some(user) = self.session_pointer() else {
            return Ok(None);
        };

        if validate && !self.users().iter().any(|u| u.same_identity(&user)) {
            self.logout()?;
            return Ok(None);
        }

        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::ports::KeyValueStore;
    use crate::services::storage::StorageKeys;

    fn service() -> (AccountService, MemoryStore) {
        let store = MemoryStore::new();
        let storage = Storage::new(Arc::new(store.clone()), StorageKeys::default());
        (AccountService::new(storage), store)
    }

    #[test]
    fn test_register_and_login() {
        let (accounts, _) = service();
        let user = accounts.register("Ada", "ada@example.com", "pw").unwrap();

        let logged_in = accounts.login("ada@example.com", "pw").unwrap();
        assert_eq!(logged_in, user);
        assert_eq!(accounts.session_pointer(), Some(user));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (accounts, _) = service();
        accounts.register("Ada", "ada@example.com", "pw").unwrap();

        let second = accounts.register("Other", "ada@example.com", "pw2");
        assert!(matches!(second, Err(Error::DuplicateEmail)));
        assert_eq!(accounts.users().len(), 1);
    }

    #[test]
    fn test_email_match_is_case_sensitive() {
        let (accounts, _) = service();
        accounts.register("Ada", "ada@example.com", "pw").unwrap();
        accounts.register("Ada", "Ada@example.com", "pw").unwrap();
        assert_eq!(accounts.users().len(), 2);
    }

    #[test]
    fn test_invalid_credentials_leave_session_unset() {
        let (accounts, _) = service();
        accounts.register("Ada", "ada@example.com", "pw").unwrap();

        assert!(matches!(
            accounts.login("ada@example.com", "wrong"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            accounts.login("nobody@example.com", "pw"),
            Err(Error::InvalidCredentials)
        ));
        assert!(accounts.session_pointer().is_none());
    }

    #[test]
    fn test_logout_clears_pointer() {
        let (accounts, _) = service();
        accounts.register("Ada", "ada@example.com", "pw").unwrap();
        accounts.login("ada@example.com", "pw").unwrap();

        accounts.logout().unwrap();
        assert!(accounts.session_pointer().is_none());
        // Logging out twice is fine
        accounts.logout().unwrap();
    }

    #[test]
    fn test_restore_session() {
        let (accounts, _) = service();
        assert!(accounts.restore_session(true).unwrap().is_none());

        let user = accounts.register("Ada", "ada@example.com", "pw").unwrap();
        accounts.login("ada@example.com", "pw").unwrap();
        assert_eq!(accounts.restore_session(true).unwrap(), Some(user));
    }

    #[test]
    fn test_dangling_session_is_dropped_when_validating() {
        let (accounts, store) = service();
        let ghost = User::new("Ghost", "ghost@example.com", "pw");
        store
            .set("smartstudy_current_user", &serde_json::to_string(&ghost).unwrap())
            .unwrap();

        // Trusted as-is without validation
        assert_eq!(accounts.restore_session(false).unwrap(), Some(ghost));

        assert!(accounts.restore_session(true).unwrap().is_none());
        assert!(accounts.session_pointer().is_none());
    }

    #[test]
    fn test_register_fails_on_unreadable_directory() {
        let (accounts, store) = service();
        accounts.register("Ada", "ada@example.com", "pw").unwrap();
        store.set("smartstudy_users", "corrupt").unwrap();

        let result = accounts.register("Bob", "bob@example.com", "pw");
        assert!(matches!(result, Err(Error::StorageFailure(_))));
        assert_eq!(store.get("smartstudy_users").unwrap().as_deref(), Some("corrupt"));
    }
}
