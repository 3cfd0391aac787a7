//! Mock Completion Gateway Implementation
//!
//! Used by `LlmServiceFactory` when provider is `"mock"` and by tests:
//! - `MockOutcome`: Reply, Empty, or Fail
//! - every prompt is recorded for assertions
//!
//! Thread-safe via `Arc<Mutex<>>`.

use std::sync::{Arc, Mutex};

use crate::{Completion, LlmError, LlmService, DEFAULT_SENDER_LABEL};

const MOCK_MODEL: &str = "mock-model";

/// What the mock answers with
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockOutcome {
    /// Echo the prompt back as `Mock response to: {prompt}`
    #[default]
    Reply,
    /// Provider answered with no text
    Empty,
    /// Provider call failed
    Fail,
}

/// Mock completion gateway with programmable outcome and prompt recording
#[derive(Debug, Clone)]
pub struct MockLlmService {
    outcome: Arc<Mutex<MockOutcome>>,
    prompts: Arc<Mutex<Vec<String>>>,
    sender_label: String,
}

impl MockLlmService {
    /// Create a new mock that replies to every prompt
    pub fn new() -> Self {
        Self::with_sender_label(DEFAULT_SENDER_LABEL)
    }

    /// Create a new mock reporting a custom sender label
    pub fn with_sender_label(sender_label: impl Into<String>) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(MockOutcome::Reply)),
            prompts: Arc::new(Mutex::new(Vec::new())),
            sender_label: sender_label.into(),
        }
    }

    /// Create a mock whose every call fails
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.set_outcome(MockOutcome::Fail);
        mock
    }

    /// Configure the outcome of subsequent calls
    pub fn set_outcome(&self, outcome: MockOutcome) {
        *self
            .outcome
            .lock()
            .expect("outcome lock poisoned: prior test panicked") = outcome;
    }

    /// Return every prompt received so far
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .expect("prompts lock poisoned: prior test panicked")
            .clone()
    }
}

impl Default for MockLlmService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError> {
        tracing::info!("Mock LLM service processing completion request");

        self.prompts
            .lock()
            .map_err(|e| LlmError::Request(format!("prompts lock poisoned: {e}")))?
            .push(prompt.to_string());

        let outcome = self
            .outcome
            .lock()
            .map_err(|e| LlmError::Request(format!("outcome lock poisoned: {e}")))?
            .clone();

        match outcome {
            MockOutcome::Reply => Ok(Completion::from_text(
                Some(format!("Mock response to: {}", prompt)),
                MOCK_MODEL,
            )),
            MockOutcome::Empty => Ok(Completion::from_text(None, MOCK_MODEL)),
            MockOutcome::Fail => Err(LlmError::Request(
                "Mock provider configured to fail".to_string(),
            )),
        }
    }

    fn sender_label(&self) -> &str {
        &self.sender_label
    }
}
