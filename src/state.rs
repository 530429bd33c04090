use std::sync::Arc;

use crate::llm::{LlmClient, LlmError};
use crate::store::EventStore;

/// Handles shared by every request. Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    llm: Option<Arc<dyn LlmClient>>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self { store, llm }
    }

    pub fn llm(&self) -> Result<Arc<dyn LlmClient>, LlmError> {
        self.llm.clone().ok_or(LlmError::Unavailable)
    }
}
