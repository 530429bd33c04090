use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::Event;

pub mod memory;
pub mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

/// Key the document store uses for its own record identifier.
const INTERNAL_ID_KEY: &str = "_id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("malformed event record: {0}")]
    MalformedRecord(String),
}

/// Read-only access to the stored events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Every stored event in insertion order.
    async fn fetch_all(&self) -> Result<Vec<Event>, StoreError>;

    /// Events whose name or description contains `keyword`, ignoring case.
    /// The keyword is matched literally; an empty keyword matches everything.
    async fn search(&self, keyword: &str) -> Result<Vec<Event>, StoreError>;

    /// Releases any held connections.
    async fn close(&self) {}
}

/// Builds an [`Event`] from a raw stored document, dropping the storage id.
pub fn event_from_document(mut document: Value) -> Result<Event, StoreError> {
    let fields = document
        .as_object_mut()
        .ok_or_else(|| StoreError::MalformedRecord("document is not an object".to_string()))?;
    fields.remove(INTERNAL_ID_KEY);

    let event: Event = serde_json::from_value(document)
        .map_err(|e| StoreError::MalformedRecord(e.to_string()))?;

    if event.name.trim().is_empty() {
        return Err(StoreError::MalformedRecord("event name is empty".to_string()));
    }

    Ok(event)
}

/// Decodes a whole result set. The first bad document fails the batch.
pub fn events_from_documents<I>(documents: I) -> Result<Vec<Event>, StoreError>
where
    I: IntoIterator<Item = Value>,
{
    documents.into_iter().map(event_from_document).collect()
}
