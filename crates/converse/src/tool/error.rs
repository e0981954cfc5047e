//! The failure type tool handlers return.

/// Error raised by a tool handler.
///
/// Handlers report what went wrong; classification into the run-level error
/// taxonomy happens at the invocation boundary, which wraps this into
/// [`ChatCompletionError::ToolExecution`](crate::ChatCompletionError::ToolExecution).
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl ToolError {
    /// A tool error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_message() {
        assert_eq!(ToolError::new("upstream 404").to_string(), "upstream 404");
    }
}
