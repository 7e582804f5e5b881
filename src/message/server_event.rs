use crate::message::{MessageError, WebSocketMessage};
use crate::store::models::Message;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Everything the server pushes to a client, broadcast or point-to-point.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum ServerEvent {
	ReceiveMessage(ReceiveMessageEvent),
	LoadRecentMessages(LoadRecentMessagesEvent),
	UserJoined(UserJoinedEvent),
	UserLeft(UserLeftEvent),
	UserTyping(UserTypingEvent),
	UserStoppedTyping(UserStoppedTypingEvent),
	OnlineUsers(OnlineUsersEvent),
	Error(ErrorEvent),
}

macro_rules! server_event_from_struct {
	($enum_case: ident, $struct_type: ty) => {
		impl From<$struct_type> for ServerEvent {
			fn from(event: $struct_type) -> ServerEvent {
				ServerEvent::$enum_case(event)
			}
		}
	};
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ReceiveMessageEvent {
	pub message: Message,
}

server_event_from_struct!(ReceiveMessage, ReceiveMessageEvent);

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LoadRecentMessagesEvent {
	pub messages: Vec<Message>,
}

server_event_from_struct!(LoadRecentMessages, LoadRecentMessagesEvent);

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct UserJoinedEvent {
	pub name: String,
}

server_event_from_struct!(UserJoined, UserJoinedEvent);

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct UserLeftEvent {
	pub name: String,
}

server_event_from_struct!(UserLeft, UserLeftEvent);

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct UserTypingEvent {
	pub name: String,
}

server_event_from_struct!(UserTyping, UserTypingEvent);

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct UserStoppedTypingEvent {
	pub name: String,
}

server_event_from_struct!(UserStoppedTyping, UserStoppedTypingEvent);

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct OnlineUsersEvent {
	pub users: Vec<String>,
}

server_event_from_struct!(OnlineUsers, OnlineUsersEvent);

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct ErrorEvent {
	pub error: ErrorEventKind,
	pub message: String,
}

server_event_from_struct!(Error, ErrorEvent);

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorEventKind {
	InvalidFormat,
	InvalidOperation,
	EmptyName,
	InvalidName,
	NameInUse,
	EmptyMessage,
	InternalServerError,
}

impl From<&ServerEvent> for WebSocketMessage {
	fn from(event: &ServerEvent) -> Self {
		let json = serde_json::to_string(event).expect("Failed to serialize server event to JSON.");
		WebSocketMessage::Text(json.into())
	}
}

impl TryFrom<&WebSocketMessage> for ServerEvent {
	type Error = MessageError;

	fn try_from(websocket_message: &WebSocketMessage) -> Result<Self, MessageError> {
		match websocket_message {
			WebSocketMessage::Text(json) => {
				serde_json::from_str(json.as_str()).map_err(|error| MessageError::DeserializationFailed {
					error: error.to_string(),
					json: json.to_string(),
				})
			}
			_ => Err(MessageError::WrongMessageType(websocket_message.clone())),
		}
	}
}
