//! Wikipedia tool: the opening sentences of a page summary.
//!
//! Calls the REST summary endpoint and returns one `{type, text}` item per
//! sentence, so the normalizer joins them into a single paragraph.

use async_trait::async_trait;
use std::time::Duration;
use syra_core::error::ToolError;
use syra_core::tool::{Tool, ToolArgs};
use tracing::debug;

const NAME: &str = "search_wikipedia";
const ENDPOINT: &str = "https://en.wikipedia.org/api/rest_v1/page/summary/";
const USER_AGENT: &str = concat!("syra-assistant/", env!("CARGO_PKG_VERSION"));

pub struct WikipediaTool {
    sentences: usize,
}

impl WikipediaTool {
    pub fn new(sentences: usize) -> Self {
        Self {
            sentences: sentences.max(1),
        }
    }

    fn page_url(&self, query: &str) -> Result<reqwest::Url, ToolError> {
        let mut url = reqwest::Url::parse(ENDPOINT)
            .map_err(|e| ToolError::failed(NAME, format!("Bad Wikipedia URL: {e}")))?;
        let title = query.split_whitespace().collect::<Vec<_>>().join("_");
        url.path_segments_mut()
            .map_err(|_| ToolError::failed(NAME, "Bad Wikipedia URL"))?
            .pop_if_empty()
            .push(&title);
        Ok(url)
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Look up a topic on Wikipedia and return a short summary. Use for definitions, \
         people, places and general knowledge."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Topic to look up, e.g. 'Machine learning'"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<serde_json::Value, ToolError> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let url = self.page_url(query)?;
        debug!(query, %url, "Fetching Wikipedia summary");

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ToolError::failed(NAME, e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::failed(NAME, format!("Wikipedia request failed: {e}")))?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(ToolError::failed(NAME, format!("No Wikipedia page found for '{query}'")));
        }
        if status != 200 {
            return Err(ToolError::failed(NAME, format!("Wikipedia returned status {status}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ToolError::failed(NAME, format!("Invalid Wikipedia response: {e}")))?;

        summary_items(query, &body, self.sentences)
    }
}

/// Turn a summary body into sentence items.
fn summary_items(
    query: &str,
    body: &serde_json::Value,
    sentences: usize,
) -> Result<serde_json::Value, ToolError> {
    if body["type"].as_str() == Some("disambiguation") {
        return Err(ToolError::failed(
            NAME,
            format!("Multiple pages match '{query}'. Try a more specific topic."),
        ));
    }

    let extract = body["extract"].as_str().unwrap_or_default();
    let items: Vec<serde_json::Value> = first_sentences(extract, sentences)
        .into_iter()
        .map(|s| serde_json::json!({ "type": "text", "text": s }))
        .collect();

    if items.is_empty() {
        return Err(ToolError::failed(NAME, format!("No Wikipedia page found for '{query}'")));
    }
    Ok(serde_json::Value::Array(items))
}

/// Split on `.`, `!` or `?` followed by whitespace or the end of text.
fn first_sentences(text: &str, limit: usize) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if sentences.len() == limit {
            return sentences;
        }
        let at_boundary = matches!(c, '.' | '!' | '?')
            && chars.peek().is_none_or(|(_, next)| next.is_whitespace());
        if at_boundary {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if sentences.len() < limit && !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}
