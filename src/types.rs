//! Shared data model for the article pipeline.
//!
//! Everything persisted or passed between pipeline stages lives here so the
//! wire shapes stay in one place: research entries, request parameters, the
//! per-run session event, and the per-user style profile.

use crate::evaluator::Evaluation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One research entry: either a generated fact summary or a web search hit.
///
/// `url` is empty when the entry was derived directly from generated text
/// rather than a web search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchItem {
    pub title: String,
    pub snippet: String,
    #[serde(default)]
    pub url: String,
}

/// Request parameters shared by the outline and draft steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleParams {
    pub topic: String,
    pub audience: String,
    pub tone: String,
    pub length: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub constraints: Option<String>,
}

impl ArticleParams {
    /// Build params for a topic with the stock defaults.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            audience: "general".to_string(),
            tone: "friendly".to_string(),
            length: "medium".to_string(),
            constraints: None,
        }
    }
}

/// Tag for session events. Only article runs are recorded today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ArticleRun,
}

/// One completed pipeline run, captured in full for session history.
///
/// Events are append-only: once written they are never edited or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub topic: String,
    pub audience: String,
    pub tone: String,
    pub length: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub constraints: Option<String>,
    pub outline: String,
    pub draft: String,
    pub evaluation: Evaluation,
    #[serde(default)]
    pub research_results: Vec<ResearchItem>,
}

/// Wire shape of a session file: `{"events": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Per-user style preferences, persisted as `{"style": {...}}`.
///
/// Values are arbitrary scalars (tone, paragraph length, and so on); the
/// pipeline renders them into prompt text without interpreting them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub style: BTreeMap<String, Value>,
}

impl UserProfile {
    /// Shallow-merge style changes: same-key values are replaced, other keys
    /// are retained.
    pub fn merge_style(&mut self, changes: &BTreeMap<String, Value>) {
        for (key, value) in changes {
            self.style.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_defaults() {
        let params = ArticleParams::new("kubernetes");
        assert_eq!(params.audience, "general");
        assert_eq!(params.tone, "friendly");
        assert_eq!(params.length, "medium");
        assert!(params.constraints.is_none());
    }

    #[test]
    fn event_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EventKind::ArticleRun).unwrap();
        assert_eq!(json, "\"article_run\"");
    }

    #[test]
    fn merge_style_replaces_and_retains() {
        let mut profile = UserProfile::default();
        let mut first = BTreeMap::new();
        first.insert("tone".to_string(), Value::String("friendly".to_string()));
        profile.merge_style(&first);

        let mut second = BTreeMap::new();
        second.insert("tone".to_string(), Value::String("formal".to_string()));
        second.insert("length".to_string(), Value::String("short".to_string()));
        profile.merge_style(&second);

        assert_eq!(profile.style["tone"], Value::String("formal".to_string()));
        assert_eq!(profile.style["length"], Value::String("short".to_string()));
    }

    #[test]
    fn session_record_tolerates_missing_events_key() {
        let record: SessionRecord = serde_json::from_str("{}").unwrap();
        assert!(record.events.is_empty());
    }
}
