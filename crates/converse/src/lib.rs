//! # converse
//!
//! Multi-turn chat-completion orchestration: tool calling, schema-validated
//! structured output, and bounded retries over any provider transport.
//!
//! A conversation is an append-only transcript of [`Message`] values plus a
//! [`ToolRegistry`]. The orchestrator sends the transcript through a
//! [`CompletionTransport`] one snapshot at a time; whenever the model
//! answers with tool calls it invokes the matching handlers, appends the
//! assistant turn and its results, and goes again until the model produces
//! a final turn. The structured layer wraps that loop and keeps rerunning
//! it with corrective feedback until the final turn satisfies a JSON
//! Schema or the retry budget runs out.
//!
//! ```text
//!  ChatCompletionsBuilder ──► ChatRequest + ToolRegistry
//!                                   │
//!                  orchestrator::run / orchestrator::plain_text
//!                                   │                  ▲
//!                      CompletionTransport::send       │ tool messages
//!                         (one turn per call)          │
//!                                   │                  │
//!                             CompletionTurn ──► ToolRegistry::invoke_all
//!                                   │
//!                     structured::structured_object
//!                     (validate, feed back, retry)
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use converse::orchestrator::{self, OrchestratorConfig};
//! use converse::{
//!     ChatCompletionError, ChatCompletionsBuilder, ChatRequest, CompletionTransport,
//!     CompletionTurn,
//! };
//!
//! // any CompletionTransport works; converse-openai ships a real one
//! struct Canned;
//!
//! impl CompletionTransport for Canned {
//!     async fn send(&self, _request: &ChatRequest) -> Result<CompletionTurn, ChatCompletionError> {
//!         Ok(CompletionTurn::answer("hi"))
//!     }
//! }
//!
//! # async fn demo() -> Result<(), ChatCompletionError> {
//! let (request, registry) = ChatCompletionsBuilder::new()
//!     .system_prompt("You are terse.")
//!     .user_prompt("Say hi.")
//!     .build();
//!
//! let reply =
//!     orchestrator::plain_text(&Canned, &registry, request, &OrchestratorConfig::default())
//!         .await?;
//! assert_eq!(reply, "hi");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`chat`] | messages, tool calls, completion turns |
//! | [`transport`] | the transport traits, requests, schemas |
//! | [`tool`] | tool traits, registry, invocation |
//! | [`orchestrator`] | the model/tool loop and plain-text entry point |
//! | [`structured`] | schema-validated output with bounded retry |
//! | [`builder`] | fluent request construction |
//! | [`error`] | the shared error taxonomy |
//!
//! The `test-utils` feature additionally exposes `mock` and
//! `test_helpers` for downstream test suites.

#![warn(missing_docs)]

pub mod builder;
pub mod chat;
pub mod error;
pub mod orchestrator;
pub mod structured;
pub mod tool;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;


pub use builder::ChatCompletionsBuilder;
pub use chat::{CompletionTurn, Message, ToolCall};
pub use error::ChatCompletionError;
pub use orchestrator::OrchestratorConfig;
pub use structured::RetryBudget;
pub use tool::{FnTool, Tool, ToolError, ToolHandler, ToolRegistry, tool_fn};
pub use transport::{
    ChatRequest, CompletionTransport, DynCompletionTransport, JsonSchema, ResponseFormat,
    ToolDefinition,
};
