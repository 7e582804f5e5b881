use crate::connection::sender::EventSender;
use crate::message::client_request::ClientRequest;
use crate::message::server_event::{ErrorEvent, ErrorEventKind, ServerEvent};
use crate::message::{MessageError, WebSocketMessage};
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use std::pin::Pin;
use tracing::error;

pub type RequestReceiver = Pin<Box<dyn RequestReceiverTrait + Unpin + Send>>;

#[async_trait]
pub trait RequestReceiverTrait {
	/// Receive a request from the client or None if the connection has been closed.
	async fn receive(&mut self) -> Option<ClientRequest>;
}

pub struct StreamRequestReceiver<RequestStream> {
	request_stream: RequestStream,
	event_sender: EventSender,
}

#[async_trait]
impl<RequestStream> RequestReceiverTrait for StreamRequestReceiver<RequestStream>
where
	RequestStream: Stream<Item = WebSocketMessage> + Unpin + Send,
{
	async fn receive(&mut self) -> Option<ClientRequest> {
		const MAXIMUM_RETRIES: usize = 10;

		let mut failed_attempts = 0;
		while failed_attempts < MAXIMUM_RETRIES {
			let websocket_message = self.request_stream.next().await?;

			match &websocket_message {
				WebSocketMessage::Close(_) => {
					self.event_sender.close().await;
					return None;
				}
				WebSocketMessage::Ping(_) | WebSocketMessage::Pong(_) | WebSocketMessage::Binary(_) => continue,
				WebSocketMessage::Text(_) => {}
			}

			match ClientRequest::try_from(&websocket_message) {
				Ok(client_request) => return Some(client_request),
				Err(message_error) => {
					failed_attempts += 1;
					let message = match message_error {
						MessageError::DeserializationFailed { error, json } => format!(
							"Failed to deserialize client message with error: {error}, message was: {json}"
						),
						MessageError::WrongMessageType(message) => {
							format!("Client request has incorrect message type. Message was: {message:?}")
						}
					};
					error!("{}", message);
					let _ = self
						.event_sender
						.send_event(ServerEvent::Error(
							ErrorEvent::builder()
								.error(ErrorEventKind::InvalidFormat)
								.message(message)
								.build(),
						))
						.await;
				}
			}
		}

		let _ = self
			.event_sender
			.send_event(ServerEvent::Error(
				ErrorEvent::builder()
					.error(ErrorEventKind::InvalidOperation)
					.message("Too many retries".to_string())
					.build(),
			))
			.await;
		self.event_sender.close().await;
		None
	}
}

impl<RequestStream> StreamRequestReceiver<RequestStream>
where
	RequestStream: Stream<Item = WebSocketMessage>,
{
	pub fn new(request_stream: RequestStream, event_sender: EventSender) -> Self {
		Self {
			request_stream,
			event_sender,
		}
	}
}

impl<RequestStream> From<StreamRequestReceiver<RequestStream>> for RequestReceiver
where
	RequestStream: Stream<Item = WebSocketMessage> + Unpin + Send + 'static,
{
	fn from(stream_request_receiver: StreamRequestReceiver<RequestStream>) -> Self {
		Box::pin(stream_request_receiver)
	}
}
