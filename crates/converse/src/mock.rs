//! A scripted transport for tests.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

use crate::chat::CompletionTurn;
use crate::error::ChatCompletionError;
use crate::transport::{ChatRequest, CompletionTransport};

/// Cloneable stand-in for the transport failures a test wants to simulate.
///
/// [`ChatCompletionError`] itself is not `Clone` (some variants carry boxed
/// sources), so the mock queues this mirror and converts when the failure
/// is actually served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockTransportError {
    /// Becomes [`ChatCompletionError::Transport`].
    Transport {
        /// HTTP status code.
        status: u16,
        /// Failure description.
        message: String,
        /// Whether the simulated failure is retryable.
        retryable: bool,
    },
    /// Becomes [`ChatCompletionError::Auth`].
    Auth(String),
    /// Becomes [`ChatCompletionError::InvalidRequest`].
    InvalidRequest(String),
    /// Becomes [`ChatCompletionError::Timeout`].
    Timeout {
        /// Simulated elapsed time.
        elapsed_ms: u64,
    },
}

impl MockTransportError {
    fn into_error(self) -> ChatCompletionError {
        match self {
            Self::Transport {
                status,
                message,
                retryable,
            } => ChatCompletionError::Transport {
                status,
                message,
                retryable,
            },
            Self::Auth(message) => ChatCompletionError::Auth(message),
            Self::InvalidRequest(message) => ChatCompletionError::InvalidRequest(message),
            Self::Timeout { elapsed_ms } => ChatCompletionError::Timeout { elapsed_ms },
        }
    }
}

/// A [`CompletionTransport`] that replays queued turns in order and records
/// the request snapshot of every call.
///
/// The recorded snapshots are deep clones taken at send time, so a test can
/// assert exactly what the transport saw on each call even after the live
/// transcript has grown.
///
/// # Panics
///
/// `send` panics when the queue is empty, turning an unexpected extra model
/// turn into a test failure at the offending call.
#[derive(Default)]
pub struct MockTransport {
    queued: Mutex<VecDeque<Result<CompletionTurn, MockTransportError>>>,
    calls: Mutex<Vec<ChatRequest>>,
}

impl MockTransport {
    /// A mock with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful turn.
    pub fn queue_turn(&self, turn: CompletionTurn) -> &Self {
        self.queued
            .lock()
            .expect("mock transport lock poisoned")
            .push_back(Ok(turn));
        self
    }

    /// Queues a transport failure.
    pub fn queue_error(&self, error: MockTransportError) -> &Self {
        self.queued
            .lock()
            .expect("mock transport lock poisoned")
            .push_back(Err(error));
        self
    }

    /// The snapshot recorded for every `send` so far, in call order.
    pub fn recorded_calls(&self) -> Vec<ChatRequest> {
        self.calls
            .lock()
            .expect("mock transport lock poisoned")
            .clone()
    }

    /// How many times `send` has been called.
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .expect("mock transport lock poisoned")
            .len()
    }
}

impl CompletionTransport for MockTransport {
    async fn send(&self, request: &ChatRequest) -> Result<CompletionTurn, ChatCompletionError> {
        self.calls
            .lock()
            .expect("mock transport lock poisoned")
            .push(request.clone());
        let next = self
            .queued
            .lock()
            .expect("mock transport lock poisoned")
            .pop_front();
        match next {
            Some(Ok(turn)) => Ok(turn),
            Some(Err(error)) => Err(error.into_error()),
            None => panic!("MockTransport: no queued turns remaining"),
        }
    }
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued", &self.queued.lock().map(|q| q.len()).unwrap_or(0))
            .field("calls", &self.calls.lock().map(|c| c.len()).unwrap_or(0))
            .finish()
    }
}
