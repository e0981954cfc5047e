//! Conversions between the core conversation model and the wire format.
//! This module owns the only exhaustive match over [`Message`]; everything
//! above the transport treats messages as opaque history.

use converse::{
    ChatCompletionError, ChatRequest, CompletionTurn, Message, ResponseFormat, ToolCall,
    ToolDefinition,
};
use reqwest::StatusCode;

use crate::types;

pub(crate) fn build_request(request: &ChatRequest, model: &str) -> types::Request {
    types::Request {
        model: model.to_string(),
        messages: request.messages.iter().map(build_message).collect(),
        tools: request.tools.iter().map(build_tool).collect(),
        response_format: build_response_format(request),
    }
}

fn build_message(message: &Message) -> types::Message {
    match message {
        Message::System { content } => types::Message {
            role: "system",
            content: Some(content.clone()),
            tool_calls: None,
            tool_call_id: None,
        },
        Message::User { content } => types::Message {
            role: "user",
            content: Some(content.clone()),
            tool_calls: None,
            tool_call_id: None,
        },
        Message::Assistant {
            content,
            tool_calls,
        } => types::Message {
            role: "assistant",
            // a pure tool-call turn has no text to send back
            content: if content.is_empty() && !tool_calls.is_empty() {
                None
            } else {
                Some(content.clone())
            },
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls.iter().map(build_tool_call).collect())
            },
            tool_call_id: None,
        },
        Message::Tool {
            content,
            tool_call_id,
        } => types::Message {
            role: "tool",
            content: Some(content.clone()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.clone()),
        },
    }
}

fn build_tool_call(call: &ToolCall) -> types::ToolCallRequest {
    types::ToolCallRequest {
        id: call.id.clone(),
        r#type: "function",
        function: types::FunctionCallRequest {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        },
    }
}

fn build_tool(definition: &ToolDefinition) -> types::Tool {
    types::Tool {
        r#type: "function",
        function: types::FunctionDef {
            name: definition.name.clone(),
            description: definition.description.clone(),
            parameters: definition.parameters.as_value().clone(),
        },
    }
}

fn build_response_format(request: &ChatRequest) -> Option<types::ResponseFormat> {
    match (request.response_format, &request.response_schema) {
        (ResponseFormat::Text, _) => None,
        (ResponseFormat::Json, Some(schema)) => Some(types::ResponseFormat::JsonSchema {
            json_schema: types::JsonSchemaFormat {
                name: "output".to_string(),
                schema: schema.as_value().clone(),
                // strict mode rejects schemas that omit additionalProperties,
                // so enforcement stays with the local validator
                strict: false,
            },
        }),
        (ResponseFormat::Json, None) => Some(types::ResponseFormat::JsonObject),
    }
}

pub(crate) fn convert_turn(
    response: types::Response,
) -> Result<CompletionTurn, ChatCompletionError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ChatCompletionError::MalformedJson {
            message: "response contained no choices".to_string(),
            raw: String::new(),
        })?;

    let tool_calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|c| ToolCall::new(c.id, c.function.name, c.function.arguments))
        .collect();
    if tool_calls.is_empty() && choice.finish_reason.as_deref() == Some("tool_calls") {
        tracing::warn!("finish reason says tool_calls but the message carried none");
    }

    let content = choice.message.content.unwrap_or_default();
    Ok(if tool_calls.is_empty() {
        CompletionTurn::answer(content)
    } else {
        CompletionTurn::tool_request(content, tool_calls)
    })
}

pub(crate) fn convert_error(status: StatusCode, body: &str) -> ChatCompletionError {
    let message = serde_json::from_str::<types::ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());
    match status.as_u16() {
        401 | 403 => ChatCompletionError::Auth(message),
        400 => ChatCompletionError::InvalidRequest(message),
        code => ChatCompletionError::Transport {
            status: code,
            message,
            retryable: matches!(code, 429 | 500 | 502 | 503),
        },
    }
}
