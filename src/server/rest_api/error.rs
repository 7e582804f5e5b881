use crate::store::error::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

/// Type-erased error response
///
/// NOTE: This type is inspired by RFC7807 (Problem Details for HTTP APIs) but spares on a lot of
/// the details to avoid complexity.
///
/// See: <https://www.rfc-editor.org/rfc/rfc7807.html>
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ApiErrorResponse {
	r#type: &'static str,
	status: u16,
	message: String,
}

impl ApiErrorResponse {
	pub fn not_found() -> Self {
		Self {
			r#type: "not_found",
			status: StatusCode::NOT_FOUND.as_u16(),
			message: "Message not found".to_string(),
		}
	}
}

impl IntoResponse for ApiErrorResponse {
	fn into_response(self) -> Response {
		let status_code = StatusCode::from_u16(self.status).expect("StatusCode could not be mapped.");
		(status_code, Json(self)).into_response()
	}
}

impl From<StoreError> for ApiErrorResponse {
	fn from(store_error: StoreError) -> Self {
		use StoreError::*;
		match store_error {
			NotFound => Self::not_found(),
			VersionConflict => Self {
				r#type: "version_conflict",
				status: StatusCode::CONFLICT.as_u16(),
				message: store_error.to_string(),
			},
			Validation(validation_error) => Self {
				r#type: "invalid_request",
				status: StatusCode::BAD_REQUEST.as_u16(),
				message: validation_error.to_string(),
			},
			other => {
				error!("Request failed with store error: {}", other);
				Self {
					r#type: "internal_error",
					status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
					message: "An internal error occurred".to_string(),
				}
			}
		}
	}
}
