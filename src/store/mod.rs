//! Injectable persistence for user profiles and session history.
//!
//! The orchestrator depends only on the [`ProfileStore`] and [`SessionStore`]
//! traits; production wires in the JSON-file implementations and tests the
//! in-memory ones. Neither implementation does any concurrency control:
//! updates are read-modify-write, so two concurrent writers for the same id
//! can interleave and the last writer wins. That is an accepted limitation
//! for the intended single-user usage, not an invariant.

mod json;
mod memory;

pub use json::{DataPaths, JsonProfileStore, JsonSessionStore};
pub use memory::{MemoryProfileStore, MemorySessionStore};

use crate::types::{Event, UserProfile};
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-user style preference storage.
pub trait ProfileStore {
    /// Load a profile, returning an empty one when no valid record exists.
    fn load(&self, user_id: &str) -> Result<UserProfile>;

    /// Overwrite the full record for a user.
    fn save(&self, user_id: &str, profile: &UserProfile) -> Result<()>;

    /// Shallow-merge style changes into the stored profile and persist it.
    fn update_style(&self, user_id: &str, changes: &BTreeMap<String, Value>) -> Result<()> {
        let mut profile = self.load(user_id)?;
        profile.merge_style(changes);
        self.save(user_id, &profile)
    }
}

/// Append-only per-session event storage.
pub trait SessionStore {
    /// Load the event sequence, returning an empty one when no valid record
    /// exists.
    fn load(&self, session_id: &str) -> Result<Vec<Event>>;

    /// Append one event, preserving order of earlier events.
    fn append(&self, session_id: &str, event: Event) -> Result<()>;
}

impl<T: ProfileStore + ?Sized> ProfileStore for &T {
    fn load(&self, user_id: &str) -> Result<UserProfile> {
        (**self).load(user_id)
    }

    fn save(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        (**self).save(user_id, profile)
    }

    fn update_style(&self, user_id: &str, changes: &BTreeMap<String, Value>) -> Result<()> {
        (**self).update_style(user_id, changes)
    }
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn load(&self, session_id: &str) -> Result<Vec<Event>> {
        (**self).load(session_id)
    }

    fn append(&self, session_id: &str, event: Event) -> Result<()> {
        (**self).append(session_id, event)
    }
}
