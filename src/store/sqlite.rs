use crate::sentiment::SentimentAnalyzer;
use crate::store::MessageStore;
use crate::store::error::{IntoStoreResult, StoreError};
use crate::store::models::{Message, MessageDraft, validate_author, validate_body};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqlitePool, migrate, query, query_as, query_scalar};
use std::str::FromStr;
use std::sync::Arc;

pub struct SqliteStore {
	pool: SqlitePool,
	analyzer: Arc<SentimentAnalyzer>,
}

impl SqliteStore {
	pub async fn new(database_url: &str, analyzer: Arc<SentimentAnalyzer>) -> Result<Self, StoreError> {
		let options = SqliteConnectOptions::from_str(database_url)
			.connection_error("Invalid database URL")?
			.create_if_missing(true);
		// SQLite has a single writer; one pooled connection keeps the
		// commit sequence strict.
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.connect_with(options)
			.await
			.connection_error("Failed to connect to database")?;
		let store = Self { pool, analyzer };
		store.migrate().await?;

		Ok(store)
	}

	async fn migrate(&self) -> Result<(), StoreError> {
		migrate!().run(&self.pool).await.map_err(Into::into)
	}
}

#[async_trait]
impl MessageStore for SqliteStore {
	async fn save(&self, draft: MessageDraft) -> Result<Message, StoreError> {
		validate_author(&draft.author)?;
		validate_body(&draft.body)?;

		let sentiment = self.analyzer.analyze(&draft.body).await;

		query_as(
			r"
			INSERT INTO message (
				author,
				body,
				sent_at,
				sentiment,
				sentiment_score,
				sentiment_color
			) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
			RETURNING
				id,
				author,
				body,
				sent_at,
				sentiment,
				sentiment_score,
				sentiment_color,
				edited,
				edited_at,
				moderated,
				version
			",
		)
		.bind(&draft.author)
		.bind(&draft.body)
		.bind(draft.sent_at)
		.bind(sentiment.label.to_string())
		.bind(sentiment.score)
		.bind(sentiment.color)
		.fetch_one(&self.pool)
		.await
		.map_err(Into::into)
	}

	async fn recent_messages(&self, limit: u32) -> Result<Vec<Message>, StoreError> {
		query_as(
			r"
			SELECT
				id,
				author,
				body,
				sent_at,
				sentiment,
				sentiment_score,
				sentiment_color,
				edited,
				edited_at,
				moderated,
				version
			FROM (
				SELECT * FROM message
				WHERE NOT moderated
				ORDER BY id DESC
				LIMIT ?1
			)
			ORDER BY id ASC
			",
		)
		.bind(i64::from(limit))
		.fetch_all(&self.pool)
		.await
		.map_err(Into::into)
	}

	async fn messages_by_author(&self, author: &str, limit: u32) -> Result<Vec<Message>, StoreError> {
		query_as(
			r"
			SELECT
				id,
				author,
				body,
				sent_at,
				sentiment,
				sentiment_score,
				sentiment_color,
				edited,
				edited_at,
				moderated,
				version
			FROM (
				SELECT * FROM message
				WHERE NOT moderated AND author = ?1
				ORDER BY id DESC
				LIMIT ?2
			)
			ORDER BY id ASC
			",
		)
		.bind(author)
		.bind(i64::from(limit))
		.fetch_all(&self.pool)
		.await
		.map_err(Into::into)
	}

	async fn edit(&self, id: i64, new_body: &str, expected_version: i64) -> Result<Message, StoreError> {
		validate_body(new_body)?;

		let sentiment = self.analyzer.analyze(new_body).await;
		let edited_at = Utc::now();

		let updated: Option<Message> = query_as(
			r"
			UPDATE message
			SET
				body = ?2,
				sentiment = ?3,
				sentiment_score = ?4,
				sentiment_color = ?5,
				edited = TRUE,
				edited_at = ?6,
				version = version + 1
			WHERE id = ?1 AND version = ?7
			RETURNING
				id,
				author,
				body,
				sent_at,
				sentiment,
				sentiment_score,
				sentiment_color,
				edited,
				edited_at,
				moderated,
				version
			",
		)
		.bind(id)
		.bind(new_body)
		.bind(sentiment.label.to_string())
		.bind(sentiment.score)
		.bind(sentiment.color)
		.bind(edited_at)
		.bind(expected_version)
		.fetch_optional(&self.pool)
		.await?;

		match updated {
			Some(message) => Ok(message),
			None => {
				let exists: Option<(i64,)> = query_as(r"SELECT id FROM message WHERE id = ?1")
					.bind(id)
					.fetch_optional(&self.pool)
					.await?;
				match exists {
					Some(_) => Err(StoreError::VersionConflict),
					None => Err(StoreError::NotFound),
				}
			}
		}
	}

	async fn set_moderated(&self, id: i64, moderated: bool) -> Result<Message, StoreError> {
		let updated: Option<Message> = query_as(
			r"
			UPDATE message
			SET moderated = ?2
			WHERE id = ?1
			RETURNING
				id,
				author,
				body,
				sent_at,
				sentiment,
				sentiment_score,
				sentiment_color,
				edited,
				edited_at,
				moderated,
				version
			",
		)
		.bind(id)
		.bind(moderated)
		.fetch_optional(&self.pool)
		.await?;

		updated.ok_or(StoreError::NotFound)
	}

	async fn delete(&self, id: i64) -> Result<bool, StoreError> {
		let result = query(r"DELETE FROM message WHERE id = ?1")
			.bind(id)
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	async fn count(&self) -> Result<i64, StoreError> {
		query_scalar(r"SELECT COUNT(*) FROM message WHERE NOT moderated")
			.fetch_one(&self.pool)
			.await
			.map_err(Into::into)
	}
}
