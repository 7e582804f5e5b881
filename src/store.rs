use crate::store::error::StoreError;
use crate::store::models::{Message, MessageDraft};
use async_trait::async_trait;
use static_assertions::assert_obj_safe;

pub mod error;
pub mod models;
pub mod sqlite;

/// Durable CRUD over message records. The store owns the sentiment fields:
/// `save` and `edit` enrich synchronously before the record is considered
/// written, so callers only ever see fully annotated messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
	async fn save(&self, draft: MessageDraft) -> Result<Message, StoreError>;

	/// The `limit` most recently committed non-moderated messages,
	/// re-sorted oldest to newest for display.
	async fn recent_messages(&self, limit: u32) -> Result<Vec<Message>, StoreError>;

	/// Same windowing as `recent_messages`, scoped to one author.
	async fn messages_by_author(&self, author: &str, limit: u32) -> Result<Vec<Message>, StoreError>;

	/// Replace the body of a message, re-running sentiment analysis and
	/// bumping the version. Fails with `VersionConflict` if the stored
	/// version no longer matches `expected_version`.
	async fn edit(&self, id: i64, new_body: &str, expected_version: i64) -> Result<Message, StoreError>;

	/// Toggle soft exclusion from all read paths.
	async fn set_moderated(&self, id: i64, moderated: bool) -> Result<Message, StoreError>;

	/// Hard removal. Returns `false` if no such message exists.
	async fn delete(&self, id: i64) -> Result<bool, StoreError>;

	/// Total non-moderated message count.
	async fn count(&self) -> Result<i64, StoreError>;
}

assert_obj_safe!(MessageStore);
