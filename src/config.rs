//! Credential and default-location configuration.
//!
//! Credentials come from the environment. The model key is required by the
//! component that needs it at construction time, never at call time; the
//! search key is optional and its absence triggers the placeholder fallback.

use anyhow::{anyhow, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable holding the generative-model API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable holding the web-search API key.
pub const SERPAPI_API_KEY_ENV: &str = "SERPAPI_API_KEY";

/// Model name used when the CLI does not override it.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Read a required API key, failing with a configuration error when the
/// variable is unset or blank.
pub fn require_api_key(var: &str) -> Result<String> {
    optional_api_key(var).ok_or_else(|| anyhow!("missing API key in environment variable {var}"))
}

/// Read an optional API key, treating unset and blank values as absent.
pub fn optional_api_key(var: &str) -> Option<String> {
    let value = env::var(var).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Resolve the root directory for profile and session files.
///
/// An explicit `--data-dir` wins; otherwise the per-user local data dir is
/// used, with a relative `data/` fallback for platforms without one.
pub fn resolve_data_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    dirs::data_local_dir()
        .map(|dir| dir.join("content-studio"))
        .unwrap_or_else(|| PathBuf::from("data"))
}
