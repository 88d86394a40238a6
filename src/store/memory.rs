//! In-memory stores for tests and embedding.

use super::{ProfileStore, SessionStore};
use crate::types::{Event, UserProfile};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Map-backed profile store with the same semantics as the file store.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<BTreeMap<String, UserProfile>>,
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self, user_id: &str) -> Result<UserProfile> {
        let profiles = self
            .profiles
            .lock()
            .map_err(|_| anyhow!("profile store poisoned"))?;
        Ok(profiles.get(user_id).cloned().unwrap_or_default())
    }

    fn save(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        let mut profiles = self
            .profiles
            .lock()
            .map_err(|_| anyhow!("profile store poisoned"))?;
        profiles.insert(user_id.to_string(), profile.clone());
        Ok(())
    }
}

/// Map-backed session log with the same semantics as the file store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<BTreeMap<String, Vec<Event>>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self, session_id: &str) -> Result<Vec<Event>> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| anyhow!("session store poisoned"))?;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    fn append(&self, session_id: &str, event: Event) -> Result<()> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| anyhow!("session store poisoned"))?;
        sessions.entry(session_id.to_string()).or_default().push(event);
        Ok(())
    }
}
