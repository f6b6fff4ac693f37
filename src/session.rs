//! Query session: modes, the bounded tool-calling loop, and per-query
//! token/cost accounting

use crate::chat::{CompletionRequest, Message, ToolCall};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::llm_client::ChatClient;
use crate::tools::Tool;
use crate::types::{Pricing, TokenUsage};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// System prompt used when no tools are offered
pub const SYSTEM_PROMPT: &str = "You are Kimi K2 Thinking, an advanced deep-reasoning model. \
     Reason step by step and be exhaustive in your answers. \
     If you need external information, state that clearly in your answer.";

/// System prompt used when the web-search tool is offered
pub const SYSTEM_PROMPT_TOOLS: &str = "You are Kimi K2 Thinking, an advanced deep-reasoning model. \
     Reason step by step and be exhaustive in your answers. \
     You have access to a web search tool for external information.";

/// How a query should be executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Quick answer without extended reasoning
    Simple,
    /// Full reasoning, no tools
    Normal,
    /// Full reasoning plus tools (single trajectory)
    Web,
    /// Full reasoning plus tools plus the 8-trajectory server-side fan-out
    Heavy,
}

impl QueryMode {
    /// Whether this mode offers tools to the model
    pub fn uses_tools(&self) -> bool {
        matches!(self, QueryMode::Web | QueryMode::Heavy)
    }

    /// Whether this mode requests the heavy-mode fan-out
    pub fn is_heavy(&self) -> bool {
        matches!(self, QueryMode::Heavy)
    }
}

/// Outcome of a single query
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Final answer text; empty when the model returned no content
    pub content: String,
    /// Token usage accumulated over every round of the query
    pub usage: TokenUsage,
    /// Estimated cost in USD
    pub cost: f64,
    /// Number of tool rounds executed before the final answer
    pub tool_rounds: u32,
}

/// A chat session against one model through one provider
pub struct ChatSession {
    client: Arc<dyn ChatClient>,
    model: ModelConfig,
    tools: Vec<Arc<dyn Tool>>,
    pricing: Pricing,
    max_tool_rounds: u32,
}

impl ChatSession {
    /// Create a session for a client and model configuration
    pub fn new(client: Arc<dyn ChatClient>, model: ModelConfig) -> Self {
        Self {
            client,
            model,
            tools: Vec::new(),
            pricing: Pricing::KIMI_K2,
            max_tool_rounds: 5,
        }
    }

    /// Add tools the model may call in web/heavy mode
    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.tools = tools;
        self
    }

    /// Override the pricing used for cost estimates
    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    /// Override the tool-round bound
    pub fn with_max_tool_rounds(mut self, max_tool_rounds: u32) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    /// The model configuration this session queries
    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// Run one query in the given mode.
    ///
    /// Tool calls are served for at most `max_tool_rounds` rounds; if the
    /// model still wants tools after that, the results are replaced with a
    /// limit note and one final tool-free completion is forced.
    pub async fn ask(&self, prompt: &str, mode: QueryMode) -> Result<QueryOutcome> {
        let offer_tools = mode.uses_tools() && !self.tools.is_empty();

        let model = match mode {
            QueryMode::Simple => self.model.clone().simple(),
            _ => self.model.clone(),
        };

        let system = if offer_tools {
            SYSTEM_PROMPT_TOOLS
        } else {
            SYSTEM_PROMPT
        };
        let mut messages = vec![Message::system(system), Message::user(prompt)];

        let mut usage = TokenUsage::default();
        let mut tool_rounds = 0u32;

        loop {
            let mut request = CompletionRequest::new(&model.model, messages.clone())
                .with_max_tokens(model.max_tokens)
                .with_temperature(model.temperature);
            if offer_tools {
                request =
                    request.with_tools(self.tools.iter().map(|tool| tool.definition()).collect());
            }
            if mode.is_heavy() {
                request = request.with_heavy_mode();
            }

            let response = self.client.complete(request).await?;
            usage.add(response.token_usage());

            let tool_calls = response.tool_calls().to_vec();
            if tool_calls.is_empty() {
                return Ok(QueryOutcome {
                    content: response.content().unwrap_or_default().to_string(),
                    cost: self.pricing.estimate(usage),
                    usage,
                    tool_rounds,
                });
            }

            tool_rounds += 1;
            debug!(round = tool_rounds, calls = tool_calls.len(), "tool round");

            if tool_rounds >= self.max_tool_rounds {
                // Bound reached: feed back a limit note instead of real
                // results and force a tool-free final answer.
                warn!(
                    rounds = self.max_tool_rounds,
                    "tool round limit reached, forcing final answer"
                );
                messages.push(Message::assistant_tool_calls(tool_calls.clone()));
                for call in &tool_calls {
                    messages.push(Message::tool(
                        format!(
                            "[Search limit reached] Please produce a final answer from the \
                             information already gathered in the previous {} rounds.",
                            self.max_tool_rounds
                        ),
                        &call.id,
                        &call.function.name,
                    ));
                }

                let final_request = CompletionRequest::new(&model.model, messages.clone())
                    .with_max_tokens(model.max_tokens)
                    .with_temperature(model.temperature)
                    .without_tools();
                let response = self.client.complete(final_request).await?;
                usage.add(response.token_usage());

                return Ok(QueryOutcome {
                    content: response.content().unwrap_or_default().to_string(),
                    cost: self.pricing.estimate(usage),
                    usage,
                    tool_rounds,
                });
            }

            messages.push(Message::assistant_tool_calls(tool_calls.clone()));
            for call in &tool_calls {
                let result = self.execute_tool(call).await;
                messages.push(Message::tool(result, &call.id, &call.function.name));
            }
        }
    }

    async fn execute_tool(&self, call: &ToolCall) -> String {
        let Some(tool) = self.tools.iter().find(|t| t.id() == call.function.name) else {
            warn!(tool = %call.function.name, "model requested unknown tool");
            return format!("Tool '{}' is not available", call.function.name);
        };

        let params: Value =
            serde_json::from_str(&call.function.arguments).unwrap_or(Value::Null);

        match tool.execute(params).await {
            Ok(output) => output.content,
            Err(e) => format!("Tool '{}' failed: {e}", call.function.name),
        }
    }
}
