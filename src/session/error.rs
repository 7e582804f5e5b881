use crate::store::error::{StoreError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
	#[error("Name was empty or whitespace-only.")]
	EmptyName,
	#[error(transparent)]
	InvalidName(ValidationError),
	#[error("Name is already in use.")]
	NameTaken,
	#[error("Chat messages must not be empty!")]
	EmptyMessage,
	#[error(transparent)]
	InvalidMessage(ValidationError),
	#[error("The '{operation}' operation is not valid in this connection's current state.")]
	InvalidState { operation: &'static str },
	#[error("Failed to access the message store: {0}")]
	Store(#[from] StoreError),
}
