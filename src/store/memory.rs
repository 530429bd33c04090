use async_trait::async_trait;
use serde_json::Value;

use super::{events_from_documents, EventStore, StoreError};
use crate::models::Event;

/// Event store over a fixed list of documents held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryEventStore {
    documents: Vec<Value>,
}

impl MemoryEventStore {
    pub fn new(documents: Vec<Value>) -> Self {
        Self { documents }
    }

    pub fn from_events(events: &[Event]) -> Result<Self, StoreError> {
        let documents = events
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::MalformedRecord(e.to_string()))?;

        Ok(Self::new(documents))
    }
}

fn field_contains(document: &Value, field: &str, needle: &str) -> bool {
    document
        .get(field)
        .and_then(Value::as_str)
        .map(|text| text.to_lowercase().contains(needle))
        .unwrap_or(false)
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn fetch_all(&self) -> Result<Vec<Event>, StoreError> {
        events_from_documents(self.documents.iter().cloned())
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Event>, StoreError> {
        let needle = keyword.to_lowercase();

        let matching = self
            .documents
            .iter()
            .filter(|doc| {
                field_contains(doc, "name", &needle) || field_contains(doc, "description", &needle)
            })
            .cloned();

        events_from_documents(matching)
    }
}
