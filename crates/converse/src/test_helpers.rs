//! Shared factories for tests: turns, calls, and message shorthands.

use crate::chat::{CompletionTurn, Message, ToolCall};
use crate::mock::MockTransport;

/// A final turn with the given text.
pub fn final_turn(content: impl Into<String>) -> CompletionTurn {
    CompletionTurn::answer(content)
}

/// A tool-call turn with empty content.
pub fn tool_turn(calls: Vec<ToolCall>) -> CompletionTurn {
    CompletionTurn::tool_request("", calls)
}

/// A tool call with the given id, tool name, and raw argument JSON.
pub fn call(
    id: impl Into<String>,
    name: impl Into<String>,
    arguments: impl Into<String>,
) -> ToolCall {
    ToolCall::new(id, name, arguments)
}

/// A mock transport pre-loaded with the given turns.
pub fn mock_with_turns(turns: impl IntoIterator<Item = CompletionTurn>) -> MockTransport {
    let mock = MockTransport::new();
    for turn in turns {
        mock.queue_turn(turn);
    }
    mock
}

/// A user message.
pub fn user_msg(content: impl Into<String>) -> Message {
    Message::user(content)
}

/// A system message.
pub fn system_msg(content: impl Into<String>) -> Message {
    Message::system(content)
}

/// An assistant message without tool calls.
pub fn assistant_msg(content: impl Into<String>) -> Message {
    Message::assistant(content)
}

/// A tool-result message.
pub fn tool_msg(content: impl Into<String>, tool_call_id: impl Into<String>) -> Message {
    Message::tool(content, tool_call_id)
}
