use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Process-wide set of live sessions, each with its own store.
#[derive(Debug, Default)]
pub struct Sessions {
    stores: HashMap<SessionId, SessionStore>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session with an empty store.
    pub fn open(&mut self) -> SessionId {
        let id = SessionId::new();
        self.stores.insert(id, SessionStore::new());
        info!(session = %id, "session opened");
        id
    }

    pub fn get(&self, id: SessionId) -> Option<&SessionStore> {
        self.stores.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut SessionStore> {
        self.stores.get_mut(&id)
    }

    /// Tears the session down, dropping every entry. Returns false if the
    /// session was not open.
    pub fn end(&mut self, id: SessionId) -> bool {
        let ended = self.stores.remove(&id).is_some();
        if ended {
            info!(session = %id, "session ended");
        }
        ended
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
