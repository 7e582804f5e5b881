use crate::context::ApplicationContext;
use crate::server::rest_api::error::ApiErrorResponse;
use crate::server::rest_api::models::{CountQuery, EditMessageRequest, ModerationRequest};
use crate::store::MessageStore;
use crate::store::models::Message;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use std::sync::Arc;

pub mod error;
pub mod models;

const DEFAULT_RECENT_COUNT: u32 = 50;
const DEFAULT_AUTHOR_COUNT: u32 = 20;

pub fn router() -> Router<ApplicationContext> {
	Router::new()
		.route("/messages", get(recent_messages))
		.route("/messages/count", get(message_count))
		.route("/messages/user/{name}", get(messages_by_author))
		.route("/messages/{id}", put(edit_message).delete(delete_message))
		.route("/messages/{id}/moderation", put(set_moderation))
}

async fn recent_messages(
	State(store): State<Arc<dyn MessageStore>>,
	Query(query): Query<CountQuery>,
) -> Result<Json<Vec<Message>>, ApiErrorResponse> {
	let messages = store.recent_messages(query.count.unwrap_or(DEFAULT_RECENT_COUNT)).await?;
	Ok(Json(messages))
}

async fn messages_by_author(
	State(store): State<Arc<dyn MessageStore>>,
	Path(name): Path<String>,
	Query(query): Query<CountQuery>,
) -> Result<Json<Vec<Message>>, ApiErrorResponse> {
	let messages = store
		.messages_by_author(&name, query.count.unwrap_or(DEFAULT_AUTHOR_COUNT))
		.await?;
	Ok(Json(messages))
}

async fn message_count(State(store): State<Arc<dyn MessageStore>>) -> Result<Json<i64>, ApiErrorResponse> {
	let count = store.count().await?;
	Ok(Json(count))
}

async fn edit_message(
	State(store): State<Arc<dyn MessageStore>>,
	Path(id): Path<i64>,
	Json(request): Json<EditMessageRequest>,
) -> Result<Json<Message>, ApiErrorResponse> {
	let message = store.edit(id, &request.body, request.expected_version).await?;
	Ok(Json(message))
}

async fn set_moderation(
	State(store): State<Arc<dyn MessageStore>>,
	Path(id): Path<i64>,
	Json(request): Json<ModerationRequest>,
) -> Result<Json<Message>, ApiErrorResponse> {
	let message = store.set_moderated(id, request.moderated).await?;
	Ok(Json(message))
}

async fn delete_message(
	State(store): State<Arc<dyn MessageStore>>,
	Path(id): Path<i64>,
) -> Result<StatusCode, ApiErrorResponse> {
	if store.delete(id).await? {
		Ok(StatusCode::NO_CONTENT)
	} else {
		Err(ApiErrorResponse::not_found())
	}
}
