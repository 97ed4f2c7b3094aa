//! Session gate: the single bearer credential and its persistence.

use std::cell::RefCell;
use std::rc::Rc;
use ragchat_types::{ChatError, Result};
use crate::ports::KeyValuePort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

/// Process-wide session. Clones share the same credential slot.
#[derive(Clone)]
pub struct Session {
    store: Rc<dyn KeyValuePort>,
    key: String,
    token: Rc<RefCell<Option<String>>>,
}

impl Session {
    /// Restore the credential persisted by a previous page load.
    pub fn restore(store: Rc<dyn KeyValuePort>, key: impl Into<String>) -> Self {
        let key = key.into();
        let token = match store.get(&key) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("Could not read stored credential from {}: {}", store.backend_name(), e);
                None
            }
        };
        if token.is_some() {
            log::info!("Session restored from {}", store.backend_name());
        }
        Self {
            store,
            key,
            token: Rc::new(RefCell::new(token)),
        }
    }

    pub fn state(&self) -> AuthState {
        if self.token.borrow().is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    /// Current bearer token, or `Unauthorized` when signed out.
    pub fn token(&self) -> Result<String> {
        self.token.borrow().clone().ok_or(ChatError::Unauthorized)
    }

    pub fn sign_in(&self, token: String) -> Result<()> {
        self.store.set(&self.key, &token)?;
        *self.token.borrow_mut() = Some(token);
        Ok(())
    }

    /// Drop the credential. A storage failure is logged, the in-memory state
    /// is cleared regardless.
    pub fn sign_out(&self) {
        *self.token.borrow_mut() = None;
        if let Err(e) = self.store.remove(&self.key) {
            log::warn!("Could not clear stored credential: {}", e);
        }
    }
}
