use crate::connection::sender::EventSender;
use crate::context::ApplicationContext;
use crate::message::server_event::{
	LoadRecentMessagesEvent, OnlineUsersEvent, ReceiveMessageEvent, UserJoinedEvent, UserLeftEvent,
	UserStoppedTypingEvent, UserTypingEvent,
};
use crate::registry::RegistryError;
use crate::registry::connection_id::ConnectionId;
use crate::session::error::SessionError;
use crate::store::MessageStore;
use crate::store::error::ValidationError;
use crate::store::models::{MessageDraft, validate_author, validate_body};
use chrono::Utc;
use tracing::{debug, info};

pub mod error;

/// Protocol state machine for one logical connection. Constructed on
/// connect, discarded on disconnect; every lifecycle event is a named
/// transition method.
pub struct Session {
	connection_id: ConnectionId,
	state: SessionState,
	context: ApplicationContext,
	event_sender: EventSender,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum SessionState {
	Disconnected,
	Joining,
	Active { name: String },
	Leaving,
}

impl Session {
	pub fn new(connection_id: ConnectionId, context: ApplicationContext, event_sender: EventSender) -> Self {
		Self {
			connection_id,
			state: SessionState::Disconnected,
			context,
			event_sender,
		}
	}

	pub fn connection_id(&self) -> ConnectionId {
		self.connection_id
	}

	pub async fn join(&mut self, name: String) -> Result<(), SessionError> {
		if self.state != SessionState::Disconnected {
			return Err(SessionError::InvalidState { operation: "join" });
		}

		let name = name.trim().to_string();
		match validate_author(&name) {
			Err(ValidationError::EmptyAuthor) => return Err(SessionError::EmptyName),
			Err(error) => return Err(SessionError::InvalidName(error)),
			Ok(()) => {}
		}

		self.state = SessionState::Joining;
		if let Err(RegistryError::NameTaken) = self.context.registry.register(self.connection_id, &name) {
			self.state = SessionState::Disconnected;
			return Err(SessionError::NameTaken);
		}

		// Attaching and reading the snapshot under the commit-order lock
		// means a message is either part of the snapshot or delivered
		// live, never neither.
		let recent_messages = {
			let _commit_order = self.context.commit_order.lock().await;
			self.context.broadcaster.attach(self.connection_id, self.event_sender.clone());
			let limit = self.context.configuration.recent_message_limit;
			match self.context.store.recent_messages(limit).await {
				Ok(recent_messages) => recent_messages,
				Err(error) => {
					self.context.broadcaster.detach(self.connection_id);
					self.context.registry.unregister(self.connection_id);
					self.state = SessionState::Disconnected;
					return Err(error.into());
				}
			}
		};

		self.state = SessionState::Active { name: name.clone() };

		self.context
			.broadcaster
			.to_others(self.connection_id, UserJoinedEvent { name: name.clone() }.into())
			.await;
		self.context
			.broadcaster
			.to_one(
				self.connection_id,
				LoadRecentMessagesEvent {
					messages: recent_messages,
				}
				.into(),
			)
			.await;
		self.broadcast_online_users().await;

		info!("'{}' joined as {}.", name, self.connection_id);
		Ok(())
	}

	pub async fn send(&mut self, message: String) -> Result<(), SessionError> {
		let author = self.active_name("send")?;
		match validate_body(&message) {
			Err(ValidationError::EmptyBody) => return Err(SessionError::EmptyMessage),
			Err(error) => return Err(SessionError::InvalidMessage(error)),
			Ok(()) => {}
		}

		let draft = MessageDraft {
			author,
			body: message,
			sent_at: Utc::now(),
		};

		// Commit and fan-out form one critical section, so every
		// connection observes messages in persistence-commit order.
		let message = {
			let _commit_order = self.context.commit_order.lock().await;
			let message = self.context.store.save(draft).await?;
			self.context
				.broadcaster
				.to_all(ReceiveMessageEvent {
					message: message.clone(),
				}
				.into())
				.await;
			message
		};

		debug!(
			"Message {} from '{}' saved with sentiment {:?}.",
			message.id, message.author, message.sentiment
		);
		Ok(())
	}

	pub async fn typing(&self) -> Result<(), SessionError> {
		let name = self.active_name("typing")?;
		self.context
			.broadcaster
			.to_others(self.connection_id, UserTypingEvent { name }.into())
			.await;
		Ok(())
	}

	pub async fn stopped_typing(&self) -> Result<(), SessionError> {
		let name = self.active_name("stopped_typing")?;
		self.context
			.broadcaster
			.to_others(self.connection_id, UserStoppedTypingEvent { name }.into())
			.await;
		Ok(())
	}

	pub async fn online_users(&self) -> Result<(), SessionError> {
		let users = self.context.registry.list_names();
		let _ = self.event_sender.send_event(OnlineUsersEvent { users }.into()).await;
		Ok(())
	}

	pub async fn leave(&mut self) -> Result<(), SessionError> {
		match self.state {
			SessionState::Active { .. } => {}
			_ => return Err(SessionError::InvalidState { operation: "leave" }),
		}

		self.state = SessionState::Leaving;
		self.cleanup().await;
		self.state = SessionState::Disconnected;
		Ok(())
	}

	/// Converges with `leave` on the same cleanup. Safe to call in any
	/// state and any number of times; only the first call that finds a
	/// registered name broadcasts.
	pub async fn disconnect(&mut self) {
		self.cleanup().await;
		self.state = SessionState::Disconnected;
	}

	async fn cleanup(&mut self) {
		self.context.broadcaster.detach(self.connection_id);
		if let Some(name) = self.context.registry.unregister(self.connection_id) {
			self.context.broadcaster.to_all(UserLeftEvent { name: name.clone() }.into()).await;
			self.broadcast_online_users().await;
			info!("'{}' left as {}.", name, self.connection_id);
		}
	}

	async fn broadcast_online_users(&self) {
		let users = self.context.registry.list_names();
		self.context.broadcaster.to_all(OnlineUsersEvent { users }.into()).await;
	}

	fn active_name(&self, operation: &'static str) -> Result<String, SessionError> {
		match &self.state {
			SessionState::Active { name } => Ok(name.clone()),
			_ => Err(SessionError::InvalidState { operation }),
		}
	}
}
