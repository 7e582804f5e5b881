use crate::message::{MessageError, WebSocketMessage};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum ClientRequest {
	Join(JoinRequest),
	Send(SendRequest),
	Typing,
	StoppedTyping,
	Leave,
	GetOnlineUsers,
}

impl ClientRequest {
	pub fn kind(&self) -> &'static str {
		use ClientRequest::*;
		match self {
			Join(_) => "join",
			Send(_) => "send",
			Typing => "typing",
			StoppedTyping => "stopped_typing",
			Leave => "leave",
			GetOnlineUsers => "get_online_users",
		}
	}
}

macro_rules! client_request_from_struct {
	($enum_case: ident, $struct_type: ty) => {
		impl From<$struct_type> for ClientRequest {
			fn from(request: $struct_type) -> ClientRequest {
				ClientRequest::$enum_case(request)
			}
		}
	};
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct JoinRequest {
	pub name: String,
}

client_request_from_struct!(Join, JoinRequest);

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SendRequest {
	pub message: String,
}

client_request_from_struct!(Send, SendRequest);

impl From<&ClientRequest> for WebSocketMessage {
	fn from(request: &ClientRequest) -> Self {
		let json = serde_json::to_string(request).expect("Failed to serialize client request to JSON.");
		WebSocketMessage::Text(json.into())
	}
}

impl TryFrom<&str> for ClientRequest {
	type Error = MessageError;

	fn try_from(json: &str) -> Result<Self, Self::Error> {
		serde_json::from_str(json).map_err(|error| MessageError::DeserializationFailed {
			error: error.to_string(),
			json: json.to_string(),
		})
	}
}

impl TryFrom<&WebSocketMessage> for ClientRequest {
	type Error = MessageError;

	fn try_from(websocket_message: &WebSocketMessage) -> Result<Self, Self::Error> {
		match websocket_message {
			WebSocketMessage::Text(json) => json.as_str().try_into(),
			_ => Err(MessageError::WrongMessageType(websocket_message.clone())),
		}
	}
}
