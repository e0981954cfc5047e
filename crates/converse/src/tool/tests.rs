use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};

use crate::chat::{Message, ToolCall};
use crate::error::ChatCompletionError;
use crate::transport::{JsonSchema, ToolDefinition};

use super::{Tool, ToolError, ToolHandler, ToolRegistry, tool_fn};

fn number_schema() -> JsonSchema {
    JsonSchema::new(json!({
        "type": "object",
        "properties": {
            "a": {"type": "number"},
            "b": {"type": "number"}
        },
        "required": ["a", "b"]
    }))
}

fn object_schema() -> JsonSchema {
    JsonSchema::new(json!({"type": "object"}))
}

#[derive(serde::Deserialize)]
struct AddArgs {
    a: f64,
    b: f64,
}

struct AddTool;

impl Tool for AddTool {
    type Input = AddArgs;
    type Output = f64;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("add", "Adds two numbers", number_schema())
    }

    async fn call(&self, input: AddArgs) -> Result<f64, ToolError> {
        Ok(input.a + input.b)
    }
}

struct FailTool;

impl Tool for FailTool {
    type Input = Value;
    type Output = Value;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("fail", "Always fails", object_schema())
    }

    async fn call(&self, _input: Value) -> Result<Value, ToolError> {
        Err(ToolError::new("boom"))
    }
}

struct CountingTool {
    invocations: Arc<AtomicUsize>,
}

impl Tool for CountingTool {
    type Input = Value;
    type Output = usize;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("count", "Counts invocations", object_schema())
    }

    async fn call(&self, _input: Value) -> Result<usize, ToolError> {
        Ok(self.invocations.fetch_add(1, Ordering::SeqCst))
    }
}

/// Echoes its input after yielding a few times, so a concurrently running
/// sibling finishes first.
struct SlowEchoTool;

impl Tool for SlowEchoTool {
    type Input = Value;
    type Output = Value;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("slow_echo", "Echoes its arguments, slowly", object_schema())
    }

    async fn call(&self, input: Value) -> Result<Value, ToolError> {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        Ok(input)
    }
}

struct EchoTool;

impl Tool for EchoTool {
    type Input = Value;
    type Output = Value;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("echo", "Echoes its arguments", object_schema())
    }

    async fn call(&self, input: Value) -> Result<Value, ToolError> {
        Ok(input)
    }
}

// ─── Registry storage ───────────────────────────────────────────────────────

#[test]
fn test_empty_registry() {
    let registry = ToolRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
    assert!(!registry.contains("add"));
    assert!(registry.definitions().is_empty());
}

#[test]
fn test_register_and_lookup() {
    let mut registry = ToolRegistry::new();
    registry.register(AddTool).register(FailTool);
    assert_eq!(registry.len(), 2);
    assert!(registry.contains("add"));
    assert!(registry.get("add").is_some());
    assert!(registry.get("missing").is_none());
}

#[test]
fn test_register_replaces_same_name() {
    let mut registry = ToolRegistry::new();
    registry.register(tool_fn(
        ToolDefinition::new("echo", "first", object_schema()),
        |v: Value| async move { Ok::<_, ToolError>(v) },
    ));
    registry.register(tool_fn(
        ToolDefinition::new("echo", "second", object_schema()),
        |v: Value| async move { Ok::<_, ToolError>(v) },
    ));
    assert_eq!(registry.len(), 1);
    let handler = registry.get("echo").unwrap();
    assert_eq!(handler.definition().description, "second");
}

#[test]
fn test_register_shared_handler() {
    let handler: Arc<dyn ToolHandler> = Arc::new(AddTool);
    let mut registry = ToolRegistry::new();
    registry.register_shared(Arc::clone(&handler));
    assert!(registry.contains("add"));
}

#[test]
fn test_definitions_cover_all_tools() {
    let mut registry = ToolRegistry::new();
    registry.register(AddTool).register(EchoTool);
    let mut names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
    names.sort();
    assert_eq!(names, ["add", "echo"]);
}

#[test]
fn test_registry_debug_lists_sorted_names() {
    let mut registry = ToolRegistry::new();
    registry.register(FailTool).register(AddTool);
    assert_eq!(
        format!("{registry:?}"),
        r#"ToolRegistry { tools: ["add", "fail"] }"#
    );
}

#[test]
fn test_clone_shares_handlers() {
    let mut registry = ToolRegistry::new();
    registry.register(AddTool);
    let cloned = registry.clone();
    assert!(cloned.contains("add"));
    assert_eq!(cloned.len(), registry.len());
}

// ─── Invocation ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_invoke_returns_tool_message_with_call_id() {
    let mut registry = ToolRegistry::new();
    registry.register(AddTool);
    let call = ToolCall::new("call_1", "add", r#"{"a": 2, "b": 3}"#);
    let message = registry.invoke(&call).await.unwrap();
    assert_eq!(message, Message::tool("5.0", "call_1"));
}

#[tokio::test]
async fn test_invoke_serializes_string_output_as_json() {
    #[derive(serde::Deserialize)]
    struct UpperArgs {
        text: String,
    }

    let mut registry = ToolRegistry::new();
    registry.register(tool_fn(
        ToolDefinition::new(
            "upper",
            "Uppercases text",
            JsonSchema::new(json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            })),
        ),
        |args: UpperArgs| async move { Ok::<_, ToolError>(args.text.to_uppercase()) },
    ));
    let call = ToolCall::new("c1", "upper", r#"{"text": "hi"}"#);
    let message = registry.invoke(&call).await.unwrap();
    assert_eq!(message, Message::tool(r#""HI""#, "c1"));
}

#[tokio::test]
async fn test_invoke_unknown_tool() {
    let registry = ToolRegistry::new();
    let call = ToolCall::new("c1", "missing", "{}");
    let err = registry.invoke(&call).await.unwrap_err();
    match err {
        ChatCompletionError::ToolNotFound { name } => assert_eq!(name, "missing"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_invoke_rejects_unparseable_arguments() {
    let mut registry = ToolRegistry::new();
    registry.register(AddTool);
    let call = ToolCall::new("c1", "add", "{not json");
    let err = registry.invoke(&call).await.unwrap_err();
    match err {
        ChatCompletionError::InvalidToolArguments { name, message } => {
            assert_eq!(name, "add");
            assert!(message.contains("not valid JSON"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[cfg(feature = "schema")]
#[tokio::test]
async fn test_invoke_rejects_arguments_violating_schema() {
    let mut registry = ToolRegistry::new();
    registry.register(AddTool);
    let call = ToolCall::new("c1", "add", r#"{"a": 2}"#);
    let err = registry.invoke(&call).await.unwrap_err();
    match err {
        ChatCompletionError::InvalidToolArguments { name, message } => {
            assert_eq!(name, "add");
            assert!(message.contains('b'), "missing property not named: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_tool_failure_wraps_as_execution_error() {
    let mut registry = ToolRegistry::new();
    registry.register(FailTool);
    let call = ToolCall::new("c1", "fail", "{}");
    let err = registry.invoke(&call).await.unwrap_err();
    match err {
        ChatCompletionError::ToolExecution { name, source } => {
            assert_eq!(name, "fail");
            assert_eq!(source.to_string(), "boom");
            assert!(source.downcast_ref::<ToolError>().is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ─── Handler blanket impl ───────────────────────────────────────────────────

#[tokio::test]
async fn test_handler_rejects_null_arguments() {
    let err = AddTool.invoke(Value::Null).await.unwrap_err();
    match err {
        ChatCompletionError::InvalidToolArguments { name, message } => {
            assert_eq!(name, "add");
            assert!(message.contains("null"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_handler_rejects_mistyped_arguments() {
    // bypasses the registry's schema check to hit the typed deserialization
    let err = AddTool.invoke(json!({"a": "x", "b": 1})).await.unwrap_err();
    assert!(matches!(
        err,
        ChatCompletionError::InvalidToolArguments { .. }
    ));
}

// ─── Batched invocation ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_invoke_all_sequential_preserves_order() {
    let mut registry = ToolRegistry::new();
    registry.register(AddTool).register(EchoTool);
    let calls = vec![
        ToolCall::new("c1", "add", r#"{"a": 1, "b": 2}"#),
        ToolCall::new("c2", "echo", r#"{"x": 1}"#),
    ];
    let messages = registry.invoke_all(&calls, false).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], Message::tool("3.0", "c1"));
    assert_eq!(messages[1], Message::tool(r#"{"x":1}"#, "c2"));
}

#[tokio::test]
async fn test_invoke_all_parallel_preserves_order() {
    let mut registry = ToolRegistry::new();
    registry.register(SlowEchoTool).register(EchoTool);
    let calls = vec![
        ToolCall::new("c1", "slow_echo", r#"{"first": true}"#),
        ToolCall::new("c2", "echo", r#"{"second": true}"#),
    ];
    let messages = registry.invoke_all(&calls, true).await.unwrap();
    assert_eq!(messages[0], Message::tool(r#"{"first":true}"#, "c1"));
    assert_eq!(messages[1], Message::tool(r#"{"second":true}"#, "c2"));
}

#[tokio::test]
async fn test_invoke_all_sequential_stops_at_first_failure() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let mut registry = ToolRegistry::new();
    registry.register(FailTool).register(CountingTool {
        invocations: Arc::clone(&invocations),
    });
    let calls = vec![
        ToolCall::new("c1", "fail", "{}"),
        ToolCall::new("c2", "count", "{}"),
    ];
    let err = registry.invoke_all(&calls, false).await.unwrap_err();
    assert!(matches!(err, ChatCompletionError::ToolExecution { .. }));
    assert_eq!(invocations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invoke_all_empty_batch() {
    let registry = ToolRegistry::new();
    let messages = registry.invoke_all(&[], false).await.unwrap();
    assert!(messages.is_empty());
}
