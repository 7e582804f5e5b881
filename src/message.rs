use thiserror::Error;

pub mod client_request;
pub mod server_event;

pub type WebSocketMessage = axum::extract::ws::Message;

#[derive(Debug, Error)]
pub enum MessageError {
	#[error("Failed to deserialize message with error: '{error}'; Message was '{json}'")]
	DeserializationFailed { error: String, json: String },
	#[error("Wrong websocket message type. Expected text, got: {0:?}")]
	WrongMessageType(WebSocketMessage),
}
