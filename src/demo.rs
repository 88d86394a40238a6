//! Interactive entry point with a static fallback payload.
//!
//! The demo never surfaces a raw error: when the studio cannot be
//! constructed (missing credential) or any pipeline stage fails, it warns
//! and substitutes fixed demo content so the walkthrough always completes.

use crate::cli::DemoArgs;
use crate::config::{self, GEMINI_API_KEY_ENV};
use crate::evaluator::{Evaluation, Scores};
use crate::studio::{ArticleOutput, Studio};
use crate::types::{ArticleParams, ResearchItem};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use uuid::Uuid;

const DEMO_USER_ID: &str = "demo-user";

/// Prompt for parameters on stdin, run the pipeline, print the results.
pub fn run_demo(args: &DemoArgs) -> Result<()> {
    if config::optional_api_key(GEMINI_API_KEY_ENV).is_none() {
        println!("Note: {GEMINI_API_KEY_ENV} not found. Running in demo mode.\n");
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let topic = prompt_line(&mut input, "Enter a topic for your article: ")?;
    if topic.is_empty() {
        eprintln!("Error: Topic cannot be empty.");
        return Ok(());
    }
    let audience = prompt_with_default(
        &mut input,
        "Target audience (e.g., beginners, developers, managers): ",
        "general",
    )?;
    let tone = prompt_with_default(&mut input, "Tone (e.g., friendly, professional): ", "friendly")?;
    let length = prompt_with_default(&mut input, "Length (short, medium, long): ", "medium")?;

    let params = ArticleParams {
        topic,
        audience,
        tone,
        length,
        constraints: None,
    };
    let session_id = Uuid::new_v4().to_string();

    let output = match run_pipeline(args, &session_id, &params) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("\nwarning: pipeline failed ({err:#})");
            eprintln!("Generating demo output instead...\n");
            demo_output(&params)
        }
    };

    print_article(&output.outline, &output.draft, &output.evaluation)
}

fn run_pipeline(
    args: &DemoArgs,
    session_id: &str,
    params: &ArticleParams,
) -> Result<ArticleOutput> {
    let data_root = config::resolve_data_root(args.data_dir.as_deref());
    let studio = Studio::from_env(&args.model, &data_root)?;
    studio.run(session_id, DEMO_USER_ID, params)
}

/// Print the outline, draft, and evaluation sections.
pub fn print_article(outline: &str, draft: &str, evaluation: &Evaluation) -> Result<()> {
    println!("\n=== OUTLINE ===\n");
    println!("{outline}");
    println!("\n=== DRAFT ===\n");
    println!("{draft}");
    println!("\n=== EVALUATION ===\n");
    let rendered =
        serde_json::to_string_pretty(evaluation).context("render evaluation as JSON")?;
    println!("{rendered}");
    Ok(())
}

fn prompt_line(input: &mut impl BufRead, prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("flush prompt")?;
    let mut line = String::new();
    input.read_line(&mut line).context("read stdin")?;
    Ok(line.trim().to_string())
}

fn prompt_with_default(input: &mut impl BufRead, prompt: &str, default: &str) -> Result<String> {
    let value = prompt_line(input, prompt)?;
    if value.is_empty() {
        return Ok(default.to_string());
    }
    Ok(value)
}

/// Fixed output used when the live pipeline is unavailable.
pub fn demo_output(params: &ArticleParams) -> ArticleOutput {
    let topic = &params.topic;
    let outline = format!(
        "## Introduction to {topic}\n\
         ### What is {topic}?\n\
         ### Why Learn {topic}?\n\n\
         ## Core Concepts\n\
         ### Concept 1\n\
         ### Concept 2\n\n\
         ## Getting Started\n\
         ### First Steps\n\
         ### Best Practices\n\n\
         ## Conclusion"
    );
    let draft = format!(
        "# {topic} for {audience}s\n\n\
         This article explores the fundamentals of {topic}.\n\n\
         ## Introduction to {topic}\n\n\
         {topic} is an important concept in modern technology. Whether you're just starting out \
         or looking to deepen your understanding, this guide will walk you through the \
         essentials.\n\n\
         ## Core Concepts\n\n\
         There are several fundamental concepts to understand:\n\n\
         1. **Concept 1**: First core principle\n\
         2. **Concept 2**: Second core principle\n\n\
         ## Getting Started\n\n\
         To begin with {topic}, follow these steps:\n\n\
         1. Understand the basics\n\
         2. Explore practical examples\n\
         3. Practice with real scenarios\n\n\
         ## Conclusion\n\n\
         {topic} is a growing field with many opportunities. By mastering these fundamentals, \
         you'll be well-equipped to explore this area further.",
        audience = capitalize(&params.audience),
    );
    let evaluation = Evaluation::Scored(Scores {
        relevance_to_topic: 4,
        structure_and_clarity: 4,
        style_and_tone_alignment: 4,
        comments: "Demo output generated. Outline and draft follow the intended structure with \
                   appropriate tone for the requested audience."
            .to_string(),
        extra: BTreeMap::new(),
    });
    let research_results = vec![ResearchItem {
        title: format!("Background on {topic}"),
        url: "https://example.com".to_string(),
        snippet: "Key information about the topic".to_string(),
    }];

    ArticleOutput {
        outline,
        draft,
        evaluation,
        research_results,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_output_mentions_topic_everywhere() {
        let output = demo_output(&ArticleParams::new("kubernetes"));
        assert!(output.outline.contains("Introduction to kubernetes"));
        assert!(output.draft.contains("# kubernetes for Generals"));
        assert!(output.evaluation.scores().is_some());
        assert_eq!(output.research_results.len(), 1);
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("beginner"), "Beginner");
        assert_eq!(capitalize("école"), "École");
    }
}
