//! # converse-openai
//!
//! OpenAI chat-completions transport for [`converse`].
//!
//! ```no_run
//! use converse::ChatCompletionsBuilder;
//! use converse::orchestrator::{self, OrchestratorConfig};
//! use converse_openai::{OpenAiConfig, OpenAiTransport};
//!
//! # async fn demo() -> Result<(), converse::ChatCompletionError> {
//! let transport = OpenAiTransport::new(OpenAiConfig {
//!     api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
//!     ..OpenAiConfig::default()
//! })?;
//!
//! let (request, registry) = ChatCompletionsBuilder::new()
//!     .model("gpt-4o-mini")
//!     .user_prompt("Say hi.")
//!     .build();
//!
//! let reply =
//!     orchestrator::plain_text(&transport, &registry, request, &OrchestratorConfig::default())
//!         .await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```
//!
//! Works against any server speaking the chat-completions wire format; set
//! [`OpenAiConfig::base_url`] to point elsewhere.

#![warn(missing_docs)]

mod config;
mod convert;
mod transport;
mod types;

pub use config::OpenAiConfig;
pub use transport::OpenAiTransport;
