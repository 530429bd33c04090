use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::{events_from_documents, EventStore, StoreError};
use crate::config::Config;
use crate::models::Event;

const FETCH_ALL_SQL: &str = "SELECT document FROM events ORDER BY id";

// strpos keeps the keyword literal; no pattern is ever compiled from user input.
const SEARCH_SQL: &str = r#"
    SELECT document FROM events
    WHERE strpos(lower(document->>'name'), lower($1)) > 0
       OR strpos(lower(document->>'description'), lower($1)) > 0
    ORDER BY id
"#;

/// Event documents kept as JSONB rows in PostgreSQL.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        info!(
            database = %config.redacted_database_url(),
            "Successfully connected to database"
        );

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!().run(&self.pool).await?;
        info!("Migrations run successfully");
        Ok(())
    }

    /// Loads `documents` in one transaction, clearing the table first unless
    /// `append` is set. Returns the number of rows written.
    pub async fn load_documents(&self, documents: &[Value], append: bool) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        if !append {
            let removed = sqlx::query("DELETE FROM events")
                .execute(&mut *tx)
                .await?
                .rows_affected();
            info!(removed, "Cleared existing events");
        }

        let mut written = 0;
        for document in documents {
            written += sqlx::query("INSERT INTO events (document) VALUES ($1)")
                .bind(document)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Event>, StoreError> {
        let documents = sqlx::query_scalar::<_, Value>(FETCH_ALL_SQL)
            .fetch_all(&self.pool)
            .await?;

        events_from_documents(documents)
    }

    #[instrument(skip(self))]
    async fn search(&self, keyword: &str) -> Result<Vec<Event>, StoreError> {
        let documents = sqlx::query_scalar::<_, Value>(SEARCH_SQL)
            .bind(keyword)
            .fetch_all(&self.pool)
            .await?;

        events_from_documents(documents)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
