//! The transport abstraction: how a conversation snapshot becomes exactly
//! one model turn.
//!
//! [`CompletionTransport`] is the trait adapters implement. It takes the
//! request by shared reference, so a transport can read the snapshot but
//! never touch the orchestrator's live transcript. [`DynCompletionTransport`]
//! is its object-safe mirror for callers that need `dyn` dispatch; every
//! `CompletionTransport` gets it for free through a blanket impl.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::{CompletionTurn, Message};
use crate::error::ChatCompletionError;

// ─── Request types ──────────────────────────────────────────────────────────

/// How the model's final turn should be shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free-form text.
    #[default]
    Text,
    /// A JSON object. Set together with [`ChatRequest::response_schema`]
    /// when the output must satisfy a schema.
    Json,
}

/// What a tool looks like to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name. Doubles as the registry key.
    pub name: String,
    /// What the tool does, phrased for the model.
    pub description: String,
    /// JSON Schema of the argument object.
    pub parameters: JsonSchema,
}

impl ToolDefinition {
    /// A definition with the given name, description, and parameter schema.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: JsonSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// The complete, self-contained input for one model turn.
///
/// The orchestrator hands this to the transport by shared reference, one
/// snapshot per call. A transport that needs to keep it must clone it; the
/// live transcript stays with the orchestrator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier, passed through to the provider verbatim.
    pub model: String,
    /// The transcript so far, oldest message first.
    pub messages: Vec<Message>,
    /// Definitions of every tool the model may call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    /// Requested response shape.
    #[serde(default)]
    pub response_format: ResponseFormat,
    /// Schema the final turn must satisfy, when structured output is
    /// configured. Transports may forward it to providers with native
    /// schema support; validation happens locally either way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<JsonSchema>,
}

// ─── JSON Schema ────────────────────────────────────────────────────────────

/// A JSON Schema document.
///
/// Thin wrapper over the raw [`Value`] form so schemas stay serializable
/// and comparable. With the `schema` feature enabled it can be derived from
/// a Rust type and used to validate candidate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonSchema(Value);

impl JsonSchema {
    /// Wraps an already-built schema document.
    pub fn new(schema: Value) -> Self {
        Self(schema)
    }

    /// The raw schema document.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Derives the schema for `T`.
    #[cfg(feature = "schema")]
    pub fn from_type<T: schemars::JsonSchema>() -> Result<Self, ChatCompletionError> {
        let schema = schemars::schema_for!(T);
        let value = serde_json::to_value(schema).map_err(|e| {
            ChatCompletionError::InvalidRequest(format!("schema for type does not serialize: {e}"))
        })?;
        Ok(Self(value))
    }

    /// Validates `value` against this schema.
    ///
    /// An unusable schema document fails as
    /// [`ChatCompletionError::InvalidRequest`]; violations fail as
    /// [`ChatCompletionError::SchemaValidation`] with every violation
    /// message joined by `"; "`.
    #[cfg(feature = "schema")]
    pub fn validate(&self, value: &Value) -> Result<(), ChatCompletionError> {
        let validator = jsonschema::validator_for(&self.0)
            .map_err(|e| ChatCompletionError::InvalidRequest(format!("invalid JSON schema: {e}")))?;
        let errors: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ChatCompletionError::SchemaValidation {
                message: errors.join("; "),
                schema: self.0.clone(),
                actual: value.clone(),
            })
        }
    }
}

// ─── Transport traits ───────────────────────────────────────────────────────

/// Executes exactly one model turn.
///
/// Implementations map the request onto a provider wire format, perform the
/// exchange, and map the reply back into a [`CompletionTurn`]. They never
/// loop, never invoke tools, and never validate structured output; all of
/// that lives above the transport.
pub trait CompletionTransport: Send + Sync {
    /// Sends one request and returns the model's turn.
    fn send(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<CompletionTurn, ChatCompletionError>> + Send;
}

/// Object-safe mirror of [`CompletionTransport`].
///
/// Blanket-implemented for every transport, so `&T` coerces to
/// `&dyn DynCompletionTransport` wherever dynamic dispatch is needed.
pub trait DynCompletionTransport: Send + Sync {
    /// Boxed form of [`CompletionTransport::send`].
    fn send_boxed<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionTurn, ChatCompletionError>> + Send + 'a>>;
}

impl<T: CompletionTransport> DynCompletionTransport for T {
    fn send_boxed<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionTurn, ChatCompletionError>> + Send + 'a>> {
        Box::pin(self.send(request))
    }
}
