//! Research, outline, and draft steps.
//!
//! Each step assembles one natural-language prompt from a template in
//! `prompts/` and issues exactly one model call. Output is returned raw:
//! downstream consumers treat outline and draft as opaque text, and the
//! research summary is wrapped into a single entry with a synthesized title.

use crate::model::{ModelError, TextGenerator};
use crate::types::{ArticleParams, ResearchItem};
use serde_json::Value;
use std::collections::BTreeMap;

const RESEARCH_TEMPLATE: &str = include_str!("../prompts/research.md");
const OUTLINE_TEMPLATE: &str = include_str!("../prompts/outline.md");
const DRAFT_TEMPLATE: &str = include_str!("../prompts/draft.md");

/// Ask the model for 3-4 factual bullet points about a topic.
pub fn research<G: TextGenerator>(
    model: &G,
    topic: &str,
) -> Result<Vec<ResearchItem>, ModelError> {
    tracing::info!(topic, "research step");
    let prompt = RESEARCH_TEMPLATE.replace("{topic}", topic);
    let text = model.generate(&[&prompt])?;
    Ok(vec![ResearchItem {
        title: format!("Key information about {topic}"),
        snippet: text,
        url: String::new(),
    }])
}

/// Ask the model for a heading outline built from the research notes.
pub fn outline<G: TextGenerator>(
    model: &G,
    params: &ArticleParams,
    research: &[ResearchItem],
    style: &BTreeMap<String, Value>,
) -> Result<String, ModelError> {
    tracing::info!(topic = %params.topic, "outline step");
    let prompt = fill_params(OUTLINE_TEMPLATE, params)
        .replace(
            "{context_section}",
            &context_section(params.constraints.as_deref(), style),
        )
        .replace("{research_notes}", &render_research_notes(research));
    model.generate(&[&prompt])
}

/// Ask the model to expand an outline into a full article.
///
/// Constraints are an outline-stage concern and are not repeated here.
pub fn draft<G: TextGenerator>(
    model: &G,
    params: &ArticleParams,
    outline: &str,
    style: &BTreeMap<String, Value>,
) -> Result<String, ModelError> {
    tracing::info!(topic = %params.topic, "draft step");
    let prompt = fill_params(DRAFT_TEMPLATE, params)
        .replace("{context_section}", &context_section(None, style))
        .replace("{outline}", outline);
    model.generate(&[&prompt])
}

fn fill_params(template: &str, params: &ArticleParams) -> String {
    template
        .replace("{topic}", &params.topic)
        .replace("{audience}", &params.audience)
        .replace("{tone}", &params.tone)
        .replace("{length}", &params.length)
}

fn context_section(constraints: Option<&str>, style: &BTreeMap<String, Value>) -> String {
    let mut section = String::new();
    if let Some(constraints) = constraints {
        section.push_str(&format!("Constraints: {constraints}\n"));
    }
    if !style.is_empty() {
        section.push_str(&format!("User style preferences: {}\n", render_style(style)));
    }
    section
}

/// Render style preferences as `key=value` pairs for prompt embedding.
pub(crate) fn render_style(style: &BTreeMap<String, Value>) -> String {
    style
        .iter()
        .map(|(key, value)| format!("{key}={}", render_scalar(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Render research entries as a bulleted notes block.
pub(crate) fn render_research_notes(items: &[ResearchItem]) -> String {
    let mut notes = String::new();
    for item in items {
        notes.push_str(&format!("- {}: {}\n", item.title, item.snippet));
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Captures the prompt and echoes a fixed reply.
    struct EchoModel {
        reply: &'static str,
        prompts: Mutex<Vec<String>>,
    }

    impl EchoModel {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl TextGenerator for EchoModel {
        fn generate(&self, parts: &[&str]) -> Result<String, ModelError> {
            self.prompts.lock().unwrap().push(parts.join("\n"));
            Ok(self.reply.to_string())
        }
    }

    fn style(pairs: &[(&str, &str)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn research_wraps_text_in_single_entry() {
        let model = EchoModel::new("- fact one\n- fact two");
        let results = research(&model, "kubernetes").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Key information about kubernetes");
        assert_eq!(results[0].snippet, "- fact one\n- fact two");
        assert!(results[0].url.is_empty());
        assert!(model.last_prompt().contains("about kubernetes"));
    }

    #[test]
    fn outline_prompt_embeds_parameters_and_notes() {
        let model = EchoModel::new("## Outline");
        let mut params = ArticleParams::new("rust");
        params.audience = "developers".to_string();
        params.constraints = Some("no jargon".to_string());
        let research = vec![ResearchItem {
            title: "Key information about rust".to_string(),
            snippet: "fast and safe".to_string(),
            url: String::new(),
        }];

        let text = outline(&model, &params, &research, &style(&[("tone", "dry")])).unwrap();
        assert_eq!(text, "## Outline");

        let prompt = model.last_prompt();
        assert!(prompt.contains("Topic: rust"));
        assert!(prompt.contains("Target audience: developers"));
        assert!(prompt.contains("Constraints: no jargon"));
        assert!(prompt.contains("User style preferences: tone=dry"));
        assert!(prompt.contains("- Key information about rust: fast and safe"));
    }

    #[test]
    fn draft_prompt_embeds_outline_but_not_constraints() {
        let model = EchoModel::new("full article");
        let mut params = ArticleParams::new("rust");
        params.constraints = Some("no jargon".to_string());

        let text = draft(&model, &params, "## H2", &BTreeMap::new()).unwrap();
        assert_eq!(text, "full article");

        let prompt = model.last_prompt();
        assert!(prompt.contains("Outline:\n## H2"));
        assert!(!prompt.contains("Constraints"));
        assert!(!prompt.contains("User style preferences"));
    }

    #[test]
    fn style_rendering_keeps_scalars_readable() {
        let mut style = style(&[("tone", "friendly")]);
        style.insert("max_sections".to_string(), Value::from(4));
        assert_eq!(render_style(&style), "max_sections=4, tone=friendly");
    }
}
