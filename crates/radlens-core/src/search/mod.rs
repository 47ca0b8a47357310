//! Literature reference lookup via the DuckDuckGo instant-answer API.
//!
//! The lookup runs after the model call: a short query is derived from the
//! report's "Image Type & Region" section and issued once against the free,
//! keyless instant-answer endpoint. Results land in the report's research
//! context section. One request per analysis, no caching.

use serde::Deserialize;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::AnalysisError;
use crate::types::Reference;

const INSTANT_ANSWER_ENDPOINT: &str = "https://api.duckduckgo.com/";
const MAX_QUERY_LEN: usize = 120;

/// Client for the reference lookup.
pub struct ReferenceSearch {
    client: reqwest::Client,
    max_results: usize,
}

/// DuckDuckGo instant-answer response (the subset we read).
#[derive(Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "AbstractSource")]
    abstract_source: Option<String>,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// A related-topic entry. Topic groups lack these fields and are skipped.
#[derive(Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text")]
    text: Option<String>,
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
}

impl ReferenceSearch {
    /// Create a new lookup client.
    pub fn new(config: &SearchConfig, timeout_ms: u64) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(concat!("radlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnalysisError::Search {
                message: format!("Cannot build search client: {e}"),
            })?;

        Ok(Self {
            client,
            max_results: config.max_results,
        })
    }

    /// Run one instant-answer query and collect up to `max_results` references.
    pub async fn lookup(&self, query: &str) -> Result<Vec<Reference>, AnalysisError> {
        tracing::debug!("Reference lookup: {query}");

        let resp = self
            .client
            .get(INSTANT_ANSWER_ENDPOINT)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| AnalysisError::Search {
                message: format!("Search request failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AnalysisError::Search {
                message: format!("Search HTTP {status}"),
            });
        }

        let answer: InstantAnswer = resp.json().await.map_err(|e| AnalysisError::Search {
            message: format!("Failed to parse search response: {e}"),
        })?;

        Ok(collect_references(answer, self.max_results))
    }
}

/// Flatten an instant-answer payload into a capped reference list.
fn collect_references(answer: InstantAnswer, max_results: usize) -> Vec<Reference> {
    let mut references = Vec::new();

    if !answer.abstract_text.is_empty() && !answer.abstract_url.is_empty() {
        references.push(Reference {
            title: if answer.heading.is_empty() {
                answer.abstract_url.clone()
            } else {
                answer.heading.clone()
            },
            url: answer.abstract_url,
            snippet: answer.abstract_text,
            source: answer.abstract_source,
        });
    }

    for topic in answer.related_topics {
        if references.len() >= max_results {
            break;
        }
        // Topic groups carry neither Text nor FirstURL
        let (Some(text), Some(url)) = (topic.text, topic.first_url) else {
            continue;
        };
        if text.is_empty() || url.is_empty() {
            continue;
        }
        references.push(Reference {
            title: text.clone(),
            url,
            snippet: text,
            source: None,
        });
    }

    references.truncate(max_results);
    references
}

/// Derive a search query from the findings' "Image Type & Region" section.
///
/// Takes the first usable bullet under the section heading, strips the
/// markdown, and drops any `label:` prefix. Returns `None` when the section
/// is missing or only says "unknown", in which case the lookup is skipped.
pub fn derive_search_query(findings: &str) -> Option<String> {
    let mut in_section = false;

    for line in findings.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('#') {
            in_section = trimmed.to_lowercase().contains("image type & region");
            continue;
        }
        if !in_section {
            continue;
        }

        let Some(bullet) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        else {
            continue;
        };

        let mut cleaned: String = bullet
            .chars()
            .filter(|c| !matches!(c, '*' | '_' | '`' | '#'))
            .collect();

        // Drop "Modality:"-style label prefixes
        if let Some(idx) = cleaned.find(':') {
            cleaned = cleaned[idx + 1..].to_string();
        }

        let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.len() < 4 || cleaned.to_lowercase().contains("unknown") {
            continue;
        }

        let mut query = cleaned;
        if query.len() > MAX_QUERY_LEN {
            let mut end = MAX_QUERY_LEN;
            while !query.is_char_boundary(end) {
                end -= 1;
            }
            query.truncate(end);
        }
        return Some(query);
    }

    None
}
