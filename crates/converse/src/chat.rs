//! The conversation data model: messages, tool calls, and completion turns.

use serde::{Deserialize, Serialize};

/// One entry in a conversation transcript.
///
/// The transcript is append-only: the orchestrator only ever pushes new
/// messages, never edits or removes existing ones. Code outside a transport
/// should use the constructors and leave exhaustive matching to the adapter
/// that maps messages onto a wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// Behavioral instructions for the model.
    System {
        /// The instruction text.
        content: String,
    },
    /// End-user input, including corrective feedback injected by the
    /// structured-output layer.
    User {
        /// The user text.
        content: String,
    },
    /// A model turn. Carries the requested tool calls when the model asked
    /// for tools instead of (or alongside) answering.
    Assistant {
        /// The model's text, possibly empty on a pure tool-call turn.
        content: String,
        /// Tool calls requested by this turn, in provider order.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    /// The serialized result of one tool invocation.
    Tool {
        /// The tool's result, serialized as JSON text.
        content: String,
        /// Id of the [`ToolCall`] this message answers.
        tool_call_id: String,
    },
}

impl Message {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// An assistant message with no tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// An assistant message carrying the tool calls of a tool-call turn.
    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    /// A tool-result message answering the call with id `tool_call_id`.
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }
}

/// A provider-issued request to invoke one registered tool.
///
/// Only transports construct these; everything downstream treats them as
/// opaque until invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned id, echoed back by the matching tool message.
    pub id: String,
    /// The registered tool name the model wants.
    pub name: String,
    /// The argument payload exactly as the provider returned it, unparsed.
    /// Parsing happens at invocation so a malformed payload classifies as
    /// invalid arguments rather than as a transport failure.
    pub arguments: String,
}

impl ToolCall {
    /// A tool call with the given id, tool name, and raw argument text.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Exactly one model turn as returned by a transport.
///
/// `is_tool_call` discriminates the two shapes a turn can take: a final
/// answer (`content` only) or a request to invoke tools (`tool_calls`
/// non-empty, `content` possibly empty). The constructors keep the flag and
/// the call list consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionTurn {
    /// The model's text for this turn.
    pub content: String,
    /// Tool invocations requested by this turn, in provider order.
    pub tool_calls: Vec<ToolCall>,
    /// Whether this turn requests tool invocations instead of answering.
    pub is_tool_call: bool,
}

impl CompletionTurn {
    /// A final turn carrying the model's answer.
    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
            is_tool_call: false,
        }
    }

    /// An intermediate turn requesting the given tool invocations.
    pub fn tool_request(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
            is_tool_call: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_with_role_tag() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_assistant_without_tool_calls_omits_field() {
        let json = serde_json::to_value(Message::assistant("hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "assistant", "content": "hello"})
        );
    }

    #[test]
    fn test_assistant_with_tool_calls_round_trips() {
        let msg = Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::new("call_1", "add", r#"{"a":1,"b":2}"#)],
        );
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_tool_message_links_call_id() {
        let msg = Message::tool("42", "call_9");
        match msg {
            Message::Tool {
                content,
                tool_call_id,
            } => {
                assert_eq!(content, "42");
                assert_eq!(tool_call_id, "call_9");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_tool_message_deserializes_from_role_tag() {
        let msg: Message =
            serde_json::from_str(r#"{"role": "tool", "content": "ok", "tool_call_id": "c1"}"#)
                .unwrap();
        assert_eq!(msg, Message::tool("ok", "c1"));
    }

    #[test]
    fn test_answer_turn_is_not_tool_call() {
        let turn = CompletionTurn::answer("done");
        assert!(!turn.is_tool_call);
        assert!(turn.tool_calls.is_empty());
        assert_eq!(turn.content, "done");
    }

    #[test]
    fn test_tool_request_turn_keeps_call_order() {
        let turn = CompletionTurn::tool_request(
            "thinking",
            vec![
                ToolCall::new("c1", "first", "{}"),
                ToolCall::new("c2", "second", "{}"),
            ],
        );
        assert!(turn.is_tool_call);
        assert_eq!(turn.tool_calls[0].id, "c1");
        assert_eq!(turn.tool_calls[1].id, "c2");
    }
}
