//! The error taxonomy shared by the orchestrator, the tool layer, and
//! transports.

use serde_json::Value;

/// Anything that can go wrong while driving a conversation.
///
/// Transports raise the HTTP-flavored variants, the tool layer raises the
/// tool variants, and the structured-output layer raises the validation
/// variants. All of them abort the surrounding run; retry policy lives with
/// the caller (see [`is_retryable`](Self::is_retryable)) or, for structured
/// output, inside the bounded feedback loop.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ChatCompletionError {
    /// HTTP-level failure talking to the provider. `status` is `0` when the
    /// request never produced a response.
    #[error("transport error {status}: {message}")]
    Transport {
        /// HTTP status code, or `0` for connection-level failures.
        status: u16,
        /// Provider-supplied or transport-supplied description.
        message: String,
        /// Whether retrying the same request may succeed.
        retryable: bool,
    },

    /// The provider rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The request itself is invalid: a bad parameter, an unusable schema,
    /// or configuration the provider refuses.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request exceeded its deadline.
    #[error("request timed out after {elapsed_ms}ms")]
    Timeout {
        /// How long the request ran before the deadline cut it off.
        elapsed_ms: u64,
    },

    /// The model requested a tool that is not registered.
    #[error("tool not found: {name}")]
    ToolNotFound {
        /// The unregistered tool name, exactly as the model sent it.
        name: String,
    },

    /// The model's argument payload could not be used: it was not valid
    /// JSON, did not satisfy the tool's parameter schema, or deserialized
    /// to null.
    #[error("invalid arguments for tool '{name}': {message}")]
    InvalidToolArguments {
        /// The target tool.
        name: String,
        /// What was wrong with the payload.
        message: String,
    },

    /// A registered tool accepted its arguments and then failed.
    #[error("tool '{name}' failed: {source}")]
    ToolExecution {
        /// The failing tool.
        name: String,
        /// The underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A response body that should have been JSON was not.
    #[error("malformed JSON response: {message}")]
    MalformedJson {
        /// The parse failure.
        message: String,
        /// The offending text, when available.
        raw: String,
    },

    /// A structured-output turn parsed as JSON but violated the configured
    /// schema.
    #[error("schema validation failed: {message}")]
    SchemaValidation {
        /// All violations, joined with `"; "`.
        message: String,
        /// The schema that was violated.
        schema: Value,
        /// The value that violated it.
        actual: Value,
    },

    /// A structured-output turn validated against the schema and then
    /// deserialized to null.
    #[error("structured output deserialized to null")]
    DeserializationProducedNull,

    /// The retry budget ran out before the model produced valid structured
    /// output.
    #[error("structured output failed validation after {attempts} attempts: {last_error}")]
    StructuredOutputValidationFailed {
        /// Total model attempts spent, feedback rounds included.
        attempts: u32,
        /// The validation failure of the final attempt.
        #[source]
        last_error: Box<ChatCompletionError>,
    },

    /// Structured output was requested on a request that carries no
    /// response schema.
    #[error(
        "no response schema configured: set one on the builder before requesting structured output"
    )]
    MissingResponseSchema,

    /// The model kept requesting tools past the configured turn limit.
    #[error("tool-call loop exceeded {limit} turns without a final response")]
    ToolCallLoopExceeded {
        /// The configured turn limit.
        limit: u32,
    },

    /// The run was cancelled through its cancellation token.
    #[error("run cancelled")]
    Cancelled,
}

impl ChatCompletionError {
    /// Returns `true` when retrying the same request may succeed.
    ///
    /// Only transient transport conditions qualify. Validation and tool
    /// failures are deterministic and never retryable at this level.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { retryable, .. } => *retryable,
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ChatCompletionError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedJson {
            message: e.to_string(),
            raw: String::new(),
        }
    }
}
