//! JSON-file-backed stores: one file per user, one file per session.
//!
//! Corrupt or unreadable records load as empty with a warning; data loss is
//! accepted silently beyond that. Identifiers become file names, so they are
//! validated before any path is built.

use super::{ProfileStore, SessionStore};
use crate::types::{Event, SessionRecord, UserProfile};
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Typed paths into the data-root layout.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `users/` directory path.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Return the `sessions/` directory path.
    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join("sessions")
    }

    /// Return the `users/<user_id>.json` path.
    pub fn user_path(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    /// Return the `sessions/<session_id>.json` path.
    pub fn session_path(&self, session_id: &str) -> PathBuf {
        self.sessions_dir().join(format!("{session_id}.json"))
    }
}

fn id_pattern() -> &'static Regex {
    static ID_PATTERN: OnceLock<Regex> = OnceLock::new();
    ID_PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid id pattern"))
}

/// Reject identifiers that would not map one-to-one onto a file name.
fn validate_id(id: &str) -> Result<()> {
    if id_pattern().is_match(id) {
        return Ok(());
    }
    Err(anyhow!(
        "invalid identifier {id:?}: expected only letters, digits, '.', '_', or '-'"
    ))
}

/// Load a record, treating a missing, unreadable, or corrupt file as empty.
fn load_or_default<T: DeserializeOwned + Default>(path: &Path, what: &'static str) -> T {
    if !path.exists() {
        return T::default();
    }
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(%err, what, path = %path.display(), "unreadable record, resetting to empty");
            return T::default();
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(%err, what, path = %path.display(), "corrupt record, resetting to empty");
            T::default()
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &'static str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory for {what} {}", path.display()))?;
    }
    let text = serde_json::to_string_pretty(value).with_context(|| format!("serialize {what}"))?;
    fs::write(path, text).with_context(|| format!("write {what} {}", path.display()))?;
    Ok(())
}

/// File-backed style preference store under `<root>/users/`.
#[derive(Debug, Clone)]
pub struct JsonProfileStore {
    paths: DataPaths,
}

impl JsonProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: DataPaths::new(root.into()),
        }
    }
}

impl ProfileStore for JsonProfileStore {
    fn load(&self, user_id: &str) -> Result<UserProfile> {
        validate_id(user_id)?;
        Ok(load_or_default(
            &self.paths.user_path(user_id),
            "user profile",
        ))
    }

    fn save(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        validate_id(user_id)?;
        write_json(&self.paths.user_path(user_id), profile, "user profile")?;
        tracing::info!(user_id, "saved user profile");
        Ok(())
    }
}

/// File-backed session log under `<root>/sessions/`.
///
/// Append is a full read-modify-write of the file, not an atomic incremental
/// append: two concurrent appends to the same session can lose one event.
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    paths: DataPaths,
}

impl JsonSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: DataPaths::new(root.into()),
        }
    }
}

impl SessionStore for JsonSessionStore {
    fn load(&self, session_id: &str) -> Result<Vec<Event>> {
        validate_id(session_id)?;
        let record: SessionRecord =
            load_or_default(&self.paths.session_path(session_id), "session record");
        Ok(record.events)
    }

    fn append(&self, session_id: &str, event: Event) -> Result<()> {
        validate_id(session_id)?;
        let path = self.paths.session_path(session_id);
        let mut record: SessionRecord = load_or_default(&path, "session record");
        record.events.push(event);
        write_json(&path, &record, "session record")?;
        tracing::info!(session_id, events = record.events.len(), "appended session event");
        Ok(())
    }
}
