use crate::store::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MAX_AUTHOR_LENGTH: usize = 100;
pub const MAX_BODY_LENGTH: usize = 1000;

/// Durable record of one chat utterance, as returned by the store.
#[derive(FromRow, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
	pub id: i64,
	pub author: String,
	pub body: String,
	pub sent_at: DateTime<Utc>,
	pub sentiment: Option<String>,
	pub sentiment_score: Option<f64>,
	pub sentiment_color: Option<String>,
	pub edited: bool,
	pub edited_at: Option<DateTime<Utc>>,
	pub moderated: bool,
	pub version: i64,
}

/// What the coordinator hands to the store. Identity, sentiment and version
/// are assigned by the store on save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageDraft {
	pub author: String,
	pub body: String,
	pub sent_at: DateTime<Utc>,
}

pub fn validate_author(author: &str) -> Result<(), ValidationError> {
	if author.trim().is_empty() {
		return Err(ValidationError::EmptyAuthor);
	}
	if author.chars().count() > MAX_AUTHOR_LENGTH {
		return Err(ValidationError::AuthorTooLong);
	}
	if !author.chars().all(|character| character.is_ascii_alphanumeric() || character == '_' || character == '-') {
		return Err(ValidationError::AuthorInvalidCharacters);
	}
	Ok(())
}

pub fn validate_body(body: &str) -> Result<(), ValidationError> {
	if body.trim().is_empty() {
		return Err(ValidationError::EmptyBody);
	}
	if body.chars().count() > MAX_BODY_LENGTH {
		return Err(ValidationError::BodyTooLong);
	}
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn should_accept_valid_author_names() {
		validate_author("Ferris").expect("Rejected plain name");
		validate_author("crab_42").expect("Rejected name with underscore and digits");
		validate_author("-dash-").expect("Rejected name with hyphens");
	}

	#[test]
	fn should_reject_blank_author_names() {
		assert_eq!(Err(ValidationError::EmptyAuthor), validate_author(""));
		assert_eq!(Err(ValidationError::EmptyAuthor), validate_author(" \t "));
	}

	#[test]
	fn should_reject_author_names_with_invalid_characters() {
		assert_eq!(Err(ValidationError::AuthorInvalidCharacters), validate_author("Ferris the crab"));
		assert_eq!(Err(ValidationError::AuthorInvalidCharacters), validate_author("féris"));
		assert_eq!(Err(ValidationError::AuthorInvalidCharacters), validate_author("a.b"));
	}

	#[test]
	fn should_reject_author_names_longer_than_the_limit() {
		let name = "a".repeat(MAX_AUTHOR_LENGTH);
		validate_author(&name).expect("Rejected name at the limit");

		let name = "a".repeat(MAX_AUTHOR_LENGTH + 1);
		assert_eq!(Err(ValidationError::AuthorTooLong), validate_author(&name));
	}

	#[test]
	fn should_reject_blank_or_oversized_bodies() {
		assert_eq!(Err(ValidationError::EmptyBody), validate_body("  \n"));

		let body = "b".repeat(MAX_BODY_LENGTH);
		validate_body(&body).expect("Rejected body at the limit");

		let body = "b".repeat(MAX_BODY_LENGTH + 1);
		assert_eq!(Err(ValidationError::BodyTooLong), validate_body(&body));
	}
}
