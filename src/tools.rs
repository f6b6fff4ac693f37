//! Tool trait and the web-search tool exposed to the model

use crate::chat::ToolDefinition;
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Output from a tool execution
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Whether the tool execution was successful
    pub success: bool,
    /// Output content fed back to the model
    pub content: String,
}

impl ToolOutput {
    /// Create a successful tool output
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
        }
    }

    /// Create a failed tool output; the message is still fed to the model
    /// so it can react to the failure
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: error.into(),
        }
    }
}

/// Tool trait defining a capability the model can call
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique identifier, used as the function name in tool definitions
    fn id(&self) -> &str;

    /// Description for LLM function calling
    fn description(&self) -> &str;

    /// JSON Schema for input parameters
    fn parameters(&self) -> Value;

    /// Execute the tool with given parameters
    async fn execute(&self, params: Value) -> Result<ToolOutput>;

    /// Wire-format definition sent with the completion request
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(self.id(), self.description(), self.parameters())
    }
}

/// Web-search tool backed by a local SearXNG instance.
///
/// SearXNG is a meta-search engine aggregating ArXiv, Google Scholar,
/// GitHub, StackOverflow, Brave, and DuckDuckGo among others.
pub struct SearxngTool {
    client: reqwest::Client,
    base_url: String,
}

impl SearxngTool {
    /// Default SearXNG endpoint
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8888";

    /// Maximum results formatted into the tool output
    const MAX_RESULTS: usize = 5;

    /// Content preview cap per result, in characters
    const PREVIEW_CHARS: usize = 200;

    /// Create a tool pointed at the default local instance
    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Create a tool pointed at a specific SearXNG instance
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn format_results(query: &str, results: &[SearchResult]) -> String {
        if results.is_empty() {
            return "No results found for this search.".to_string();
        }

        let mut formatted = format!("Search results for '{query}':\n\n");
        for (i, result) in results.iter().take(Self::MAX_RESULTS).enumerate() {
            formatted.push_str(&format!("{}. {}\n", i + 1, result.title));
            formatted.push_str(&format!("   URL: {}\n", result.url));
            if !result.content.is_empty() {
                let preview: String = if result.content.chars().count() > Self::PREVIEW_CHARS {
                    let truncated: String =
                        result.content.chars().take(Self::PREVIEW_CHARS).collect();
                    format!("{truncated}...")
                } else {
                    result.content.clone()
                };
                formatted.push_str(&format!("   Content: {preview}\n"));
            }
            formatted.push_str(&format!("   Engine: {}\n\n", result.engine));
        }
        formatted
    }
}

#[async_trait]
impl Tool for SearxngTool {
    fn id(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the internet via SearXNG (meta-search across ArXiv, Google Scholar, \
         GitHub, StackOverflow, Brave, DuckDuckGo)"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for (e.g. 'chutes.ai API documentation')"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value) -> Result<ToolOutput> {
        let query = params
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if query.is_empty() {
            return Ok(ToolOutput::failure("web_search: empty query"));
        }

        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => return Ok(ToolOutput::failure(format!("web_search failed: {e}"))),
        };

        if !response.status().is_success() {
            return Ok(ToolOutput::failure(format!(
                "web_search failed: HTTP {}",
                response.status()
            )));
        }

        let page: SearchPage = match response.json().await {
            Ok(page) => page,
            Err(e) => return Ok(ToolOutput::failure(format!("web_search failed: {e}"))),
        };

        Ok(ToolOutput::success(Self::format_results(
            query,
            &page.results,
        )))
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    engine: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, content: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            url: format!("https://example.com/{title}"),
            content: content.to_string(),
            engine: "duckduckgo".to_string(),
        }
    }

    #[test]
    fn definition_declares_required_query() {
        let tool = SearxngTool::new().unwrap();
        let definition = tool.definition();
        assert_eq!(definition.function.name, "web_search");
        assert_eq!(definition.function.parameters["required"][0], "query");
    }

    #[test]
    fn formatting_caps_results_and_previews() {
        let long = "x".repeat(300);
        let results: Vec<SearchResult> = (0..8)
            .map(|i| result(&format!("r{i}"), &long))
            .collect();
        let text = SearxngTool::format_results("rust", &results);

        assert!(text.contains("1. r0"));
        assert!(text.contains("5. r4"));
        assert!(!text.contains("6. r5"));
        assert!(text.contains(&format!("{}...", "x".repeat(200))));
    }

    #[test]
    fn formatting_handles_empty_results() {
        let text = SearxngTool::format_results("rust", &[]);
        assert!(text.contains("No results"));
    }

    #[tokio::test]
    async fn execute_formats_search_hits() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("q".into(), "kimi k2".into()),
                mockito::Matcher::UrlEncoded("format".into(), "json".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"results": [
                    {"title": "Kimi K2", "url": "https://example.com", "content": "paper", "engine": "arxiv"}
                ]}"#,
            )
            .create_async()
            .await;

        let tool = SearxngTool::with_base_url(server.url()).unwrap();
        let output = tool.execute(json!({"query": "kimi k2"})).await.unwrap();

        assert!(output.success);
        assert!(output.content.contains("Kimi K2"));
        assert!(output.content.contains("arxiv"));
    }

    #[tokio::test]
    async fn execute_degrades_on_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let tool = SearxngTool::with_base_url(server.url()).unwrap();
        let output = tool.execute(json!({"query": "anything"})).await.unwrap();

        assert!(!output.success);
        assert!(output.content.contains("HTTP 500"));
    }
}
