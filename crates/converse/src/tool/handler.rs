//! The two tool traits: strongly typed [`Tool`] for implementors and
//! object-safe [`ToolHandler`] for the registry, bridged by a blanket impl.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ChatCompletionError;
use crate::transport::ToolDefinition;

use super::error::ToolError;

/// A tool with typed input and output.
///
/// This is the trait to implement. The registry stores tools as
/// [`ToolHandler`] trait objects; the blanket impl below does the
/// deserialize-call-serialize dance so implementors only ever see their own
/// types.
pub trait Tool: Send + Sync {
    /// The deserialized argument type.
    type Input: DeserializeOwned + Send;
    /// The result type, serialized into the tool message.
    type Output: Serialize + Send;

    /// The definition advertised to the model.
    fn definition(&self) -> ToolDefinition;

    /// Executes the tool.
    fn call(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Self::Output, ToolError>> + Send;
}

/// Object-safe tool interface, as held by the registry.
///
/// `invoke` receives arguments that already parsed as JSON (and, with the
/// `schema` feature, already passed the parameter schema); its job is the
/// typed execution and the wrapping of failures into the run-level
/// taxonomy.
pub trait ToolHandler: Send + Sync {
    /// The definition advertised to the model.
    fn definition(&self) -> ToolDefinition;

    /// Executes the tool against parsed arguments, returning the result as
    /// a JSON value.
    fn invoke<'a>(
        &'a self,
        arguments: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ChatCompletionError>> + Send + 'a>>;
}

impl<T: Tool> ToolHandler for T {
    fn definition(&self) -> ToolDefinition {
        Tool::definition(self)
    }

    fn invoke<'a>(
        &'a self,
        arguments: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ChatCompletionError>> + Send + 'a>> {
        Box::pin(async move {
            let name = Tool::definition(self).name;
            if arguments.is_null() {
                return Err(ChatCompletionError::InvalidToolArguments {
                    name,
                    message: "arguments deserialized to null".to_string(),
                });
            }
            let input: T::Input = serde_json::from_value(arguments).map_err(|e| {
                ChatCompletionError::InvalidToolArguments {
                    name: name.clone(),
                    message: e.to_string(),
                }
            })?;
            let output = self.call(input).await.map_err(|e| {
                ChatCompletionError::ToolExecution {
                    name: name.clone(),
                    source: Box::new(e),
                }
            })?;
            serde_json::to_value(output).map_err(|e| ChatCompletionError::ToolExecution {
                name,
                source: Box::new(e),
            })
        })
    }
}

/// A [`Tool`] built from a definition and an async closure. See [`tool_fn`].
pub struct FnTool<I, O, F> {
    definition: ToolDefinition,
    f: F,
    _marker: PhantomData<fn(I) -> O>,
}

impl<I, O, F> std::fmt::Debug for FnTool<I, O, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}

/// Wraps an async closure as a [`Tool`].
///
/// ```
/// use converse::tool::{ToolError, tool_fn};
/// use converse::transport::{JsonSchema, ToolDefinition};
///
/// #[derive(serde::Deserialize)]
/// struct AddArgs {
///     a: i64,
///     b: i64,
/// }
///
/// let add = tool_fn(
///     ToolDefinition::new(
///         "add",
///         "Adds two integers",
///         JsonSchema::new(serde_json::json!({
///             "type": "object",
///             "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
///             "required": ["a", "b"]
///         })),
///     ),
///     |args: AddArgs| async move { Ok::<_, ToolError>(args.a + args.b) },
/// );
/// # let _ = add;
/// ```
pub fn tool_fn<I, O, F, Fut>(definition: ToolDefinition, f: F) -> FnTool<I, O, F>
where
    I: DeserializeOwned + Send,
    O: Serialize + Send,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, ToolError>> + Send,
{
    FnTool {
        definition,
        f,
        _marker: PhantomData,
    }
}

impl<I, O, F, Fut> Tool for FnTool<I, O, F>
where
    I: DeserializeOwned + Send,
    O: Serialize + Send,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, ToolError>> + Send,
{
    type Input = I;
    type Output = O;

    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    fn call(&self, input: I) -> impl Future<Output = Result<O, ToolError>> + Send {
        (self.f)(input)
    }
}
