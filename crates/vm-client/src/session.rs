//! Session token storage.
//!
//! The bearer token is the only client state that survives a page load.
//! [`TokenStore`] is the persistence seam; [`Session`] caches the token in
//! memory after reading it once when the client is constructed.

use std::cell::RefCell;
use std::rc::Rc;

/// Storage key shared by every persistent token store.
pub const TOKEN_KEY: &str = "access_token";

pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// Process-local store. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        store.save(token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn save(&self, token: &str) {
        *self.slot.borrow_mut() = Some(token.to_owned());
    }

    fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}

pub struct Session {
    token: RefCell<Option<String>>,
    store: Rc<dyn TokenStore>,
}

impl Session {
    pub fn load(store: Rc<dyn TokenStore>) -> Self {
        let token = store.load().filter(|t| !t.is_empty());
        Self {
            token: RefCell::new(token),
            store,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Replace the token; `None` or an empty token removes it from persistence.
    pub fn set_token(&self, token: Option<&str>) {
        match token.filter(|t| !t.is_empty()) {
            Some(t) => {
                self.store.save(t);
                *self.token.borrow_mut() = Some(t.to_owned());
            }
            None => self.clear(),
        }
    }

    pub fn clear(&self) {
        self.store.clear();
        *self.token.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_reads_back_until_cleared() {
        let store = MemoryTokenStore::default();
        let session = Session::load(Rc::new(store.clone()));
        assert!(!session.is_authenticated());

        session.set_token(Some("tok-1"));
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert_eq!(store.load().as_deref(), Some("tok-1"));

        session.clear();
        assert_eq!(session.token(), None);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn token_is_read_from_store_at_construction() {
        let store = MemoryTokenStore::with_token("persisted");
        let session = Session::load(Rc::new(store.clone()));
        assert_eq!(session.token().as_deref(), Some("persisted"));

        // later writes that bypass the session are not observed
        store.save("other");
        assert_eq!(session.token().as_deref(), Some("persisted"));
    }

    #[test]
    fn empty_token_clears_session() {
        let store = MemoryTokenStore::with_token("persisted");
        let session = Session::load(Rc::new(store.clone()));

        session.set_token(Some(""));
        assert!(!session.is_authenticated());
        assert_eq!(store.load(), None);
    }
}
