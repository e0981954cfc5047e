//! Tool storage, lookup, and invocation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::chat::{Message, ToolCall};
use crate::error::ChatCompletionError;
use crate::transport::ToolDefinition;

use super::handler::ToolHandler;

/// The named collection of tools a conversation may call.
///
/// Mutated only while being assembled; during orchestration it is read-only
/// and every lookup goes through `&self`. Cloning is cheap, the handlers
/// are shared.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its definition name, replacing any
    /// previous handler with the same name.
    pub fn register(&mut self, handler: impl ToolHandler + 'static) -> &mut Self {
        self.register_shared(Arc::new(handler))
    }

    /// Registers an already shared handler.
    pub fn register_shared(&mut self, handler: Arc<dyn ToolHandler>) -> &mut Self {
        self.handlers.insert(handler.definition().name, handler);
        self
    }

    /// Looks up a handler by tool name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Whether a tool with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Definitions of every registered tool. Order is unspecified.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.handlers.values().map(|h| h.definition()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invokes the tool named by `call` and wraps its result as the
    /// answering tool message.
    ///
    /// Fails with [`ChatCompletionError::ToolNotFound`] for an unregistered
    /// name, and with [`ChatCompletionError::InvalidToolArguments`] when the
    /// raw payload is not valid JSON or (with the `schema` feature) violates
    /// the tool's parameter schema. Failures here are fatal to the
    /// surrounding run; they are never turned into messages for the model.
    pub async fn invoke(&self, call: &ToolCall) -> Result<Message, ChatCompletionError> {
        let handler = self
            .get(&call.name)
            .ok_or_else(|| ChatCompletionError::ToolNotFound {
                name: call.name.clone(),
            })?;

        let arguments: Value = serde_json::from_str(&call.arguments).map_err(|e| {
            ChatCompletionError::InvalidToolArguments {
                name: call.name.clone(),
                message: format!("arguments are not valid JSON: {e}"),
            }
        })?;

        #[cfg(feature = "schema")]
        if let Err(e) = handler.definition().parameters.validate(&arguments) {
            return Err(ChatCompletionError::InvalidToolArguments {
                name: call.name.clone(),
                message: e.to_string(),
            });
        }

        let result = handler.invoke(arguments).await?;
        Ok(Message::tool(result.to_string(), call.id.clone()))
    }

    /// Invokes every call in `calls`, returning one tool message per call,
    /// in call order.
    ///
    /// Sequential by default. With `parallel` the invocations run
    /// concurrently and the results are reassembled in request order.
    /// Either way the first failure aborts the whole batch.
    pub async fn invoke_all(
        &self,
        calls: &[ToolCall],
        parallel: bool,
    ) -> Result<Vec<Message>, ChatCompletionError> {
        if parallel {
            futures::future::try_join_all(calls.iter().map(|call| self.invoke(call))).await
        } else {
            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                results.push(self.invoke(call).await?);
            }
            Ok(results)
        }
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}
