//! Tool registration and invocation.
//!
//! Implement [`Tool`] (or wrap a closure with [`tool_fn`]) and register it
//! in a [`ToolRegistry`]; the orchestrator invokes tools through the
//! registry whenever a model turn requests them.
//!
//! ```
//! use converse::tool::{ToolError, ToolRegistry, tool_fn};
//! use converse::transport::{JsonSchema, ToolDefinition};
//!
//! #[derive(serde::Deserialize)]
//! struct EchoArgs {
//!     text: String,
//! }
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(tool_fn(
//!     ToolDefinition::new(
//!         "echo",
//!         "Returns its input unchanged",
//!         JsonSchema::new(serde_json::json!({
//!             "type": "object",
//!             "properties": {"text": {"type": "string"}},
//!             "required": ["text"]
//!         })),
//!     ),
//!     |args: EchoArgs| async move { Ok::<_, ToolError>(args.text) },
//! ));
//!
//! assert!(registry.contains("echo"));
//! ```

mod error;
mod handler;
mod registry;

pub use error::ToolError;
pub use handler::{FnTool, Tool, ToolHandler, tool_fn};
pub use registry::ToolRegistry;

#[cfg(test)]
mod tests;
