//! LLM-as-judge evaluation of completed drafts.
//!
//! The judge is asked for strict JSON scoring three fixed criteria. Model
//! output being what it is, parsing is best-effort: a response that does not
//! decode into the typed record degrades to a raw-text fallback instead of
//! raising. That makes [`Evaluation`] the only place in the pipeline with a
//! defined failure-recovery policy, and callers must handle both variants.

use crate::model::{ModelError, TextGenerator};
use crate::steps::render_research_notes;
use crate::types::ResearchItem;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

const EVALUATE_TEMPLATE: &str = include_str!("../prompts/evaluate.md");

/// System-style instruction sent as the first prompt part.
const JSON_ONLY_INSTRUCTION: &str = "You must respond with valid JSON only, no additional text.";

/// Typed scores parsed from a well-formed judge response.
///
/// Scores are 1-5 by instruction but are not independently validated; keys
/// beyond the expected four pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub relevance_to_topic: i64,
    pub structure_and_clarity: i64,
    pub style_and_tone_alignment: i64,
    pub comments: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Outcome of judging a draft: real scores, or the raw response when the
/// model did not produce the typed record.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Scored(Scores),
    Unscored { raw: String },
}

impl Evaluation {
    /// Wrap an unparseable response.
    pub fn fallback(raw: impl Into<String>) -> Self {
        Self::Unscored { raw: raw.into() }
    }

    /// Typed scores, when the response parsed.
    pub fn scores(&self) -> Option<&Scores> {
        match self {
            Self::Scored(scores) => Some(scores),
            Self::Unscored { .. } => None,
        }
    }

    /// Free-text comments in either variant.
    pub fn comments(&self) -> &str {
        match self {
            Self::Scored(scores) => &scores.comments,
            Self::Unscored { raw } => raw,
        }
    }
}

// Wire shape stays a four-key mapping in both variants: the fallback carries
// null scores and the raw response text as comments.
impl Serialize for Evaluation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scored(scores) => scores.serialize(serializer),
            Self::Unscored { raw } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("relevance_to_topic", &Value::Null)?;
                map.serialize_entry("structure_and_clarity", &Value::Null)?;
                map.serialize_entry("style_and_tone_alignment", &Value::Null)?;
                map.serialize_entry("comments", raw)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Evaluation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match serde_json::from_value::<Scores>(value.clone()) {
            Ok(scores) => Ok(Self::Scored(scores)),
            Err(_) => {
                let raw = match value.get("comments").and_then(Value::as_str) {
                    Some(comments) => comments.to_string(),
                    None => value.to_string(),
                };
                Ok(Self::Unscored { raw })
            }
        }
    }
}

/// Judge wrapper around a text generator.
#[derive(Debug, Clone)]
pub struct Evaluator<G> {
    model: G,
}

impl<G: TextGenerator> Evaluator<G> {
    pub fn new(model: G) -> Self {
        Self { model }
    }

    /// Score a completed draft against its topic, outline, and research.
    ///
    /// Backend failures propagate; malformed responses do not.
    pub fn evaluate_draft(
        &self,
        topic: &str,
        outline: &str,
        draft: &str,
        research: &[ResearchItem],
    ) -> Result<Evaluation, ModelError> {
        tracing::info!(topic, "evaluating draft");
        let prompt = EVALUATE_TEMPLATE
            .replace("{topic}", topic)
            .replace("{outline}", outline)
            .replace("{draft}", draft)
            .replace("{research_notes}", &render_research_notes(research));
        let text = self.model.generate(&[JSON_ONLY_INSTRUCTION, &prompt])?;
        Ok(parse_evaluation(&text))
    }
}

/// Parse a judge response, degrading to the raw-text fallback on failure.
pub(crate) fn parse_evaluation(text: &str) -> Evaluation {
    match serde_json::from_str::<Scores>(extract_json(text)) {
        Ok(scores) => Evaluation::Scored(scores),
        Err(err) => {
            tracing::warn!(%err, raw = text, "judge returned non-JSON, using raw-text fallback");
            Evaluation::fallback(text)
        }
    }
}

/// Extract JSON from text that might be wrapped in markdown code fences.
fn extract_json(text: &str) -> &str {
    let text = text.trim();

    if let Some(start) = text.find("```json") {
        let start = start + 7;
        if let Some(end) = text[start..].find("```") {
            return text[start..start + end].trim();
        }
    }

    if let Some(start) = text.find("```") {
        let start = start + 3;
        let start = text[start..]
            .find('\n')
            .map(|i| start + i + 1)
            .unwrap_or(start);
        if let Some(end) = text[start..].find("```") {
            return text[start..start + end].trim();
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextGenerator;

    struct FixedModel(&'static str);

    impl TextGenerator for FixedModel {
        fn generate(&self, _parts: &[&str]) -> Result<String, ModelError> {
            Ok(self.0.to_string())
        }
    }

    const SCORED: &str = r#"{"relevance_to_topic": 5, "structure_and_clarity": 4, "style_and_tone_alignment": 3, "comments": "solid"}"#;

    #[test]
    fn parses_well_formed_scores() {
        let evaluation = parse_evaluation(SCORED);
        let scores = evaluation.scores().expect("scored");
        assert_eq!(scores.relevance_to_topic, 5);
        assert_eq!(scores.structure_and_clarity, 4);
        assert_eq!(scores.style_and_tone_alignment, 3);
        assert_eq!(scores.comments, "solid");
    }

    #[test]
    fn parses_fenced_json() {
        let text = format!("Here you go:\n```json\n{SCORED}\n```\n");
        assert!(parse_evaluation(&text).scores().is_some());
    }

    #[test]
    fn extra_keys_pass_through() {
        let text = r#"{"relevance_to_topic": 5, "structure_and_clarity": 4, "style_and_tone_alignment": 3, "comments": "ok", "confidence": 0.9}"#;
        let evaluation = parse_evaluation(text);
        let scores = evaluation.scores().expect("scored");
        assert_eq!(scores.extra["confidence"], Value::from(0.9));
        let json = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(json["confidence"], Value::from(0.9));
    }

    #[test]
    fn fallback_keeps_full_raw_text() {
        let evaluator = Evaluator::new(FixedModel("not json"));
        let evaluation = evaluator.evaluate_draft("topic", "outline", "draft", &[]).unwrap();
        assert_eq!(evaluation, Evaluation::fallback("not json"));

        let json = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(json["relevance_to_topic"], Value::Null);
        assert_eq!(json["structure_and_clarity"], Value::Null);
        assert_eq!(json["style_and_tone_alignment"], Value::Null);
        assert_eq!(json["comments"], Value::from("not json"));
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn null_scores_are_not_typed_scores() {
        let text = r#"{"relevance_to_topic": null, "structure_and_clarity": null, "style_and_tone_alignment": null, "comments": "shrug"}"#;
        let evaluation = parse_evaluation(text);
        assert!(evaluation.scores().is_none());
    }

    #[test]
    fn wire_roundtrip_preserves_variant() {
        let scored: Evaluation = serde_json::from_str(SCORED).unwrap();
        assert!(scored.scores().is_some());

        let fallback = Evaluation::fallback("free text");
        let json = serde_json::to_string(&fallback).unwrap();
        let back: Evaluation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Evaluation::fallback("free text"));
    }

    #[test]
    fn extract_json_handles_plain_fences() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(text), "{\"a\": 1}");
    }
}
