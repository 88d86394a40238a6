//! Pipeline orchestration: research, outline, draft, evaluate, persist.
//!
//! The run is strictly linear; each stage blocks on one model round trip and
//! feeds the next, and the ordering is a real data dependency. No stage is
//! retried or skipped, and any stage error propagates to the caller, which
//! decides whether to substitute a fallback (the interactive entry point
//! does; the service surface does not).

use crate::evaluator::{Evaluation, Evaluator};
use crate::model::{GeminiClient, TextGenerator};
use crate::steps;
use crate::store::{JsonProfileStore, JsonSessionStore, ProfileStore, SessionStore};
use crate::types::{ArticleParams, Event, EventKind, ResearchItem};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

/// Composite result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleOutput {
    pub outline: String,
    pub draft: String,
    pub evaluation: Evaluation,
    pub research_results: Vec<ResearchItem>,
}

/// Service-boundary request: a topic plus optional overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_id: Option<String>,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    pub topic: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_length")]
    pub length: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub constraints: Option<String>,
}

impl ArticleRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            session_id: None,
            user_id: default_user_id(),
            topic: topic.into(),
            audience: default_audience(),
            tone: default_tone(),
            length: default_length(),
            constraints: None,
        }
    }
}

fn default_user_id() -> String {
    "api-user".to_string()
}

fn default_audience() -> String {
    "general".to_string()
}

fn default_tone() -> String {
    "friendly".to_string()
}

fn default_length() -> String {
    "medium".to_string()
}

/// Service-boundary response: the session the run was recorded under plus
/// the composite output.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleResponse {
    pub session_id: String,
    pub outline: String,
    pub draft: String,
    pub evaluation: Evaluation,
    pub research_results: Vec<ResearchItem>,
}

/// The orchestrator. Owns the generator, the judge, and the two stores, and
/// depends on the stores only through their traits.
#[derive(Debug)]
pub struct Studio<G, J, P, S> {
    model: G,
    evaluator: Evaluator<J>,
    profiles: P,
    sessions: S,
}

impl Studio<GeminiClient, GeminiClient, JsonProfileStore, JsonSessionStore> {
    /// Production wiring: Gemini backend, JSON-file stores under `data_root`.
    ///
    /// Fails here, not at call time, when the model credential is missing.
    pub fn from_env(model_name: &str, data_root: &Path) -> Result<Self> {
        let model = GeminiClient::from_env(model_name).context("construct studio")?;
        let evaluator = Evaluator::new(model.clone());
        Ok(Self::new(
            model,
            evaluator,
            JsonProfileStore::new(data_root),
            JsonSessionStore::new(data_root),
        ))
    }
}

impl<G, J, P, S> Studio<G, J, P, S>
where
    G: TextGenerator,
    J: TextGenerator,
    P: ProfileStore,
    S: SessionStore,
{
    pub fn new(model: G, evaluator: Evaluator<J>, profiles: P, sessions: S) -> Self {
        Self {
            model,
            evaluator,
            profiles,
            sessions,
        }
    }

    /// Execute one full run and record it under `session_id`.
    ///
    /// Appends exactly one `article_run` event and then stores the requested
    /// tone as the user's new tone preference.
    pub fn run(
        &self,
        session_id: &str,
        user_id: &str,
        params: &ArticleParams,
    ) -> Result<ArticleOutput> {
        tracing::info!(session_id, user_id, topic = %params.topic, "article run started");

        let profile = self.profiles.load(user_id)?;
        let style = profile.style;

        let research_results = steps::research(&self.model, &params.topic)?;
        let outline = steps::outline(&self.model, params, &research_results, &style)?;
        let draft = steps::draft(&self.model, params, &outline, &style)?;
        let evaluation =
            self.evaluator
                .evaluate_draft(&params.topic, &outline, &draft, &research_results)?;

        let event = Event {
            kind: EventKind::ArticleRun,
            topic: params.topic.clone(),
            audience: params.audience.clone(),
            tone: params.tone.clone(),
            length: params.length.clone(),
            constraints: params.constraints.clone(),
            outline: outline.clone(),
            draft: draft.clone(),
            evaluation: evaluation.clone(),
            research_results: research_results.clone(),
        };
        self.sessions.append(session_id, event)?;

        // Most-recent-intent preference learning: the tone requested this run
        // becomes the stored default.
        let mut changes = BTreeMap::new();
        changes.insert("tone".to_string(), Value::String(params.tone.clone()));
        self.profiles.update_style(user_id, &changes)?;

        Ok(ArticleOutput {
            outline,
            draft,
            evaluation,
            research_results,
        })
    }

    /// Service-boundary entry: generates a session id when none is supplied.
    pub fn create_article(&self, request: ArticleRequest) -> Result<ArticleResponse> {
        let ArticleRequest {
            session_id,
            user_id,
            topic,
            audience,
            tone,
            length,
            constraints,
        } = request;
        let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let params = ArticleParams {
            topic,
            audience,
            tone,
            length,
            constraints,
        };
        let output = self.run(&session_id, &user_id, &params)?;
        Ok(ArticleResponse {
            session_id,
            outline: output.outline,
            draft: output.draft,
            evaluation: output.evaluation,
            research_results: output.research_results,
        })
    }
}
