//! The conversation orchestrator: drives the model/tool loop until the
//! model produces a final turn.

use tokio_util::sync::CancellationToken;

use crate::chat::{CompletionTurn, Message};
use crate::error::ChatCompletionError;
use crate::tool::ToolRegistry;
use crate::transport::{ChatRequest, DynCompletionTransport};

/// Controls for one orchestration run.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound on model turns per run. When the model is still
    /// requesting tools after this many turns, the run aborts with
    /// [`ChatCompletionError::ToolCallLoopExceeded`].
    pub max_turns: u32,
    /// Invoke the calls of a multi-call turn concurrently instead of one
    /// after another. Tool results keep call order either way.
    pub parallel_tool_invocation: bool,
    /// Cooperative cancellation. Checked before every model turn and again
    /// between the model's reply and tool invocation; a cancelled token
    /// aborts the run with [`ChatCompletionError::Cancelled`].
    pub cancellation: Option<CancellationToken>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            parallel_tool_invocation: false,
            cancellation: None,
        }
    }
}

impl OrchestratorConfig {
    fn check_cancelled(&self) -> Result<(), ChatCompletionError> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(ChatCompletionError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Runs the conversation until the model answers instead of requesting
/// tools, and returns that final turn.
///
/// Each round sends the current transcript through `transport`. A final
/// turn ends the run and is returned without being appended. A tool-call
/// turn has every requested call invoked through `registry`, after which
/// the assistant message (turn text plus its calls) and one tool message
/// per call, in call order, are appended and the loop continues.
///
/// The transcript grows monotonically and is never rewound. Appending
/// happens only once every invocation of the round has succeeded, so a
/// tool failure or a cancellation leaves `request.messages` exactly as it
/// was before the round: no assistant message ever dangles without its
/// tool results.
pub async fn run(
    transport: &dyn DynCompletionTransport,
    registry: &ToolRegistry,
    request: &mut ChatRequest,
    config: &OrchestratorConfig,
) -> Result<CompletionTurn, ChatCompletionError> {
    let mut turns = 0u32;
    loop {
        config.check_cancelled()?;

        turns += 1;
        if turns > config.max_turns {
            return Err(ChatCompletionError::ToolCallLoopExceeded {
                limit: config.max_turns,
            });
        }

        let turn = transport.send_boxed(request).await?;
        if !turn.is_tool_call || turn.tool_calls.is_empty() {
            return Ok(turn);
        }

        config.check_cancelled()?;
        let results = registry
            .invoke_all(&turn.tool_calls, config.parallel_tool_invocation)
            .await?;

        request
            .messages
            .push(Message::assistant_with_tool_calls(turn.content, turn.tool_calls));
        request.messages.extend(results);
    }
}

/// Runs the conversation to completion and returns only the final text,
/// verbatim. An empty final turn yields an empty string.
pub async fn plain_text(
    transport: &dyn DynCompletionTransport,
    registry: &ToolRegistry,
    mut request: ChatRequest,
    config: &OrchestratorConfig,
) -> Result<String, ChatCompletionError> {
    let turn = run(transport, registry, &mut request, config).await?;
    Ok(turn.content)
}
