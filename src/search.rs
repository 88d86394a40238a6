//! Web search via SerpAPI — an auxiliary tool, not part of the main
//! pipeline.
//!
//! Missing credentials and request failures degrade to a small fixed set of
//! placeholder results so demos keep working without live keys; this
//! function never fails.

use crate::config::{self, SERPAPI_API_KEY_ENV};
use crate::types::ResearchItem;
use anyhow::Result;
use serde_json::Value;
use std::time::Duration;

const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Return up to `max_results` `{title, url, snippet}` entries for a query.
pub fn search_web(query: &str, max_results: usize) -> Vec<ResearchItem> {
    let api_key = config::optional_api_key(SERPAPI_API_KEY_ENV);
    search_with_key(query, max_results, api_key.as_deref())
}

pub(crate) fn search_with_key(
    query: &str,
    max_results: usize,
    api_key: Option<&str>,
) -> Vec<ResearchItem> {
    tracing::info!(query, max_results, "search_web called");

    let Some(api_key) = api_key else {
        tracing::warn!("{SERPAPI_API_KEY_ENV} not set, returning placeholder search results");
        return placeholder_results(query, max_results);
    };

    match request_search(query, max_results, api_key) {
        Ok(results) if !results.is_empty() => results,
        Ok(_) => placeholder_results(query, max_results),
        Err(err) => {
            tracing::warn!(%err, "search request failed, using placeholder results");
            placeholder_results(query, max_results)
        }
    }
}

fn request_search(query: &str, max_results: usize, api_key: &str) -> Result<Vec<ResearchItem>> {
    let agent = ureq::Agent::new_with_config(
        ureq::config::Config::builder()
            .timeout_global(Some(SEARCH_TIMEOUT))
            .build(),
    );
    let mut response = agent
        .get(SERPAPI_ENDPOINT)
        .query("engine", "google")
        .query("q", query)
        .query("api_key", api_key)
        .query("num", &max_results.to_string())
        .call()?;
    let body: Value = response.body_mut().read_json()?;

    let organic = body
        .get("organic_results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    Ok(organic
        .iter()
        .take(max_results)
        .map(|item| ResearchItem {
            title: string_field(item, &["title"])
                .unwrap_or_else(|| "(no title)".to_string()),
            url: string_field(item, &["link", "url"]).unwrap_or_default(),
            snippet: string_field(item, &["snippet", "content"]).unwrap_or_default(),
        })
        .collect())
}

fn string_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| item.get(key).and_then(Value::as_str))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Fixed results used when real web search is unavailable.
fn placeholder_results(query: &str, max_results: usize) -> Vec<ResearchItem> {
    let base = vec![
        ResearchItem {
            title: format!("Background on {query}"),
            url: "https://example.com/background".to_string(),
            snippet: format!("High-level explanation and key points about {query}."),
        },
        ResearchItem {
            title: format!("Latest trends in {query}"),
            url: "https://example.com/trends".to_string(),
            snippet: format!("Recent developments, best practices, and common pitfalls in {query}."),
        },
    ];
    base.into_iter().take(max_results).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_returns_placeholders() {
        let results = search_with_key("rust", 5, None);
        assert!(results.len() <= 5);
        assert!(!results.is_empty());
        for item in &results {
            assert!(!item.title.is_empty());
            assert!(!item.snippet.is_empty());
        }
    }

    #[test]
    fn placeholders_respect_max_results() {
        assert_eq!(search_with_key("rust", 1, None).len(), 1);
        assert!(search_with_key("rust", 0, None).is_empty());
    }

    #[test]
    fn organic_results_map_to_items() {
        let body: Value = serde_json::json!({
            "organic_results": [
                {"title": "Rust book", "link": "https://doc.rust-lang.org/book/", "snippet": "The book."},
                {"title": "", "url": "https://example.org", "content": "alt fields"}
            ]
        });
        let organic = body["organic_results"].as_array().unwrap();
        assert_eq!(
            string_field(&organic[0], &["link", "url"]).unwrap(),
            "https://doc.rust-lang.org/book/"
        );
        assert_eq!(
            string_field(&organic[1], &["snippet", "content"]).unwrap(),
            "alt fields"
        );
        assert!(string_field(&organic[1], &["title"]).is_none());
    }
}
