//! Fluent construction of a conversation, its tools, and its output
//! configuration.

use crate::chat::Message;
#[cfg(feature = "schema")]
use crate::error::ChatCompletionError;
use crate::tool::{ToolHandler, ToolRegistry};
use crate::transport::{ChatRequest, JsonSchema, ResponseFormat, ToolDefinition};

/// Model used when the builder is not told otherwise.
const DEFAULT_MODEL: &str = "gpt-4o";

/// Accumulates messages, tools, and output configuration into the
/// [`ChatRequest`] and [`ToolRegistry`] pair the orchestrator runs on.
///
/// Pure accumulation: nothing here talks to a transport. Prompt methods
/// append in call order, and configuring a response schema appends the
/// instruction message telling the model to answer with a conforming JSON
/// object.
///
/// ```
/// use converse::ChatCompletionsBuilder;
///
/// let (request, registry) = ChatCompletionsBuilder::new()
///     .model("gpt-4o-mini")
///     .system_prompt("You are terse.")
///     .user_prompt("What is the capital of France?")
///     .build();
///
/// assert_eq!(request.model, "gpt-4o-mini");
/// assert_eq!(request.messages.len(), 2);
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ChatCompletionsBuilder {
    model: Option<String>,
    messages: Vec<Message>,
    registry: ToolRegistry,
    definitions: Vec<ToolDefinition>,
    response_schema: Option<JsonSchema>,
}

impl ChatCompletionsBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model identifier. Defaults to `"gpt-4o"`.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Appends a system message.
    pub fn system_prompt(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    /// Appends a user message.
    pub fn user_prompt(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Appends an assistant message, for seeding few-shot exchanges.
    pub fn assistant_prompt(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(content));
        self
    }

    /// Registers a tool and advertises its definition in the built request.
    /// Re-registering a name replaces the earlier tool in place.
    pub fn tool(mut self, handler: impl ToolHandler + 'static) -> Self {
        let definition = handler.definition();
        self.definitions.retain(|d| d.name != definition.name);
        self.definitions.push(definition);
        self.registry.register(handler);
        self
    }

    /// Requests schema-validated JSON output.
    ///
    /// Switches the response format to JSON, stores the schema for local
    /// validation, and appends a user message instructing the model to
    /// reply with a conforming object.
    pub fn response_schema(mut self, schema: JsonSchema) -> Self {
        self.messages.push(Message::user(schema_instruction(&schema)));
        self.response_schema = Some(schema);
        self
    }

    /// Derives the schema for `T` and configures it via
    /// [`response_schema`](Self::response_schema).
    #[cfg(feature = "schema")]
    pub fn response_schema_for<T: schemars::JsonSchema>(
        self,
    ) -> Result<Self, ChatCompletionError> {
        Ok(self.response_schema(JsonSchema::from_type::<T>()?))
    }

    /// Finalizes into the request snapshot and the registry backing it.
    /// Tool definitions keep registration order.
    pub fn build(self) -> (ChatRequest, ToolRegistry) {
        let response_format = if self.response_schema.is_some() {
            ResponseFormat::Json
        } else {
            ResponseFormat::Text
        };
        let request = ChatRequest {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            messages: self.messages,
            tools: self.definitions,
            response_format,
            response_schema: self.response_schema,
        };
        (request, self.registry)
    }
}

/// The instruction message injected when a response schema is configured.
fn schema_instruction(schema: &JsonSchema) -> String {
    let schema_json = serde_json::to_string_pretty(schema.as_value())
        .unwrap_or_else(|_| schema.as_value().to_string());
    format!(
        "You must respond with valid JSON that conforms to this JSON Schema:\n\
         ```json\n{schema_json}\n```\n\
         Respond ONLY with the JSON object. No markdown, no explanation."
    )
}
