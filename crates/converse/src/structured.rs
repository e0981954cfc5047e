//! Structured output: runs the conversation until the final turn is
//! schema-valid JSON, feeding validation failures back to the model a
//! bounded number of times.

#[cfg(feature = "schema")]
use serde::de::DeserializeOwned;
#[cfg(feature = "schema")]
use serde_json::Value;

#[cfg(feature = "schema")]
use crate::chat::Message;
#[cfg(feature = "schema")]
use crate::error::ChatCompletionError;
#[cfg(feature = "schema")]
use crate::orchestrator::{self, OrchestratorConfig};
#[cfg(feature = "schema")]
use crate::tool::ToolRegistry;
#[cfg(feature = "schema")]
use crate::transport::{ChatRequest, DynCompletionTransport, JsonSchema};

/// Retry allowance for structured-output validation failures.
///
/// `max_retries` counts corrective feedback rounds, not total attempts: a
/// budget of `n` allows `n + 1` model turns at producing valid output, and
/// the last one receives no feedback. Zero disables feedback entirely and
/// leaves exactly one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    /// Number of corrective feedback rounds.
    pub max_retries: u32,
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self { max_retries: 2 }
    }
}

/// Runs the conversation and parses the final turn as schema-valid `T`.
///
/// The request must carry a response schema (see
/// [`ChatCompletionsBuilder::response_schema`](crate::ChatCompletionsBuilder::response_schema));
/// otherwise [`ChatCompletionError::MissingResponseSchema`] comes back
/// before any model turn is spent.
///
/// A final turn that is not valid JSON or does not satisfy the schema
/// costs one retry: the classifying error is appended as a corrective user
/// message and the conversation reruns. Once the budget is spent, one last
/// attempt runs without feedback; if it is still invalid, the whole call
/// fails with [`ChatCompletionError::StructuredOutputValidationFailed`]
/// wrapping the final validation error. The parsed value is returned
/// without its raw turn being appended to the transcript.
///
/// Only the invalid-output class is retried here. Transport failures, tool
/// failures, a schema-valid null, and output that does not fit `T` all
/// propagate immediately.
#[cfg(feature = "schema")]
pub async fn structured_object<T: DeserializeOwned>(
    transport: &dyn DynCompletionTransport,
    registry: &ToolRegistry,
    mut request: ChatRequest,
    config: &OrchestratorConfig,
    budget: RetryBudget,
) -> Result<T, ChatCompletionError> {
    let schema = request
        .response_schema
        .clone()
        .ok_or(ChatCompletionError::MissingResponseSchema)?;

    let mut attempts = 0u32;
    let mut remaining = budget.max_retries;
    while remaining > 0 {
        attempts += 1;
        let turn = orchestrator::run(transport, registry, &mut request, config).await?;
        match validate_turn::<T>(&turn.content, &schema) {
            Ok(value) => return Ok(value),
            Err(e) if is_invalid_output(&e) => {
                request.messages.push(Message::user(corrective_feedback(&e)));
                remaining -= 1;
            }
            Err(e) => return Err(e),
        }
    }

    attempts += 1;
    let turn = orchestrator::run(transport, registry, &mut request, config).await?;
    match validate_turn::<T>(&turn.content, &schema) {
        Ok(value) => Ok(value),
        Err(e) if is_invalid_output(&e) => {
            Err(ChatCompletionError::StructuredOutputValidationFailed {
                attempts,
                last_error: Box::new(e),
            })
        }
        Err(e) => Err(e),
    }
}

/// The retryable invalid-output class: content that failed to parse or
/// failed the schema. Everything else is fatal to the run.
#[cfg(feature = "schema")]
fn is_invalid_output(error: &ChatCompletionError) -> bool {
    matches!(
        error,
        ChatCompletionError::MalformedJson { .. } | ChatCompletionError::SchemaValidation { .. }
    )
}

/// Parses one final turn, validates it against `schema`, and deserializes
/// it into `T`.
#[cfg(feature = "schema")]
fn validate_turn<T: DeserializeOwned>(
    content: &str,
    schema: &JsonSchema,
) -> Result<T, ChatCompletionError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| ChatCompletionError::MalformedJson {
            message: e.to_string(),
            raw: content.to_string(),
        })?;
    schema.validate(&value)?;
    if value.is_null() {
        return Err(ChatCompletionError::DeserializationProducedNull);
    }
    // the value already satisfies the schema, so a type mismatch here means
    // the target type disagrees with the advertised schema
    serde_json::from_value(value).map_err(|e| {
        ChatCompletionError::InvalidRequest(format!(
            "schema-valid output does not fit the target type: {e}"
        ))
    })
}

/// The corrective user message for one failed validation attempt. Parse
/// failures and schema violations produce different texts so the model can
/// tell which contract it broke.
#[cfg(feature = "schema")]
fn corrective_feedback(error: &ChatCompletionError) -> String {
    match error {
        ChatCompletionError::MalformedJson { message, .. } => format!(
            "Your previous reply was not valid JSON: {message}. \
             Respond again with ONLY the JSON object, no markdown and no commentary."
        ),
        ChatCompletionError::SchemaValidation { message, .. } => format!(
            "Your previous reply was valid JSON but violated the required schema: {message}. \
             Respond again with ONLY a JSON object that satisfies the schema."
        ),
        other => other.to_string(),
    }
}
