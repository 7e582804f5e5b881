use crate::message::WebSocketMessage;
use crate::message::server_event::ServerEvent;
use async_trait::async_trait;
use futures_util::{Sink, SinkExt};
use std::fmt::Debug;
use std::pin::Pin;
use std::sync::Arc;
use tracing::error;

pub type EventSender = Pin<Arc<dyn EventSenderTrait + Send + Sync>>;

#[async_trait]
pub trait EventSenderTrait {
	async fn send_event(&self, event: ServerEvent) -> Result<(), ()>;
	async fn close(&self);
}

pub struct SinkEventSender<ResponseSink> {
	inner: tokio::sync::Mutex<SinkEventSenderInner<ResponseSink>>,
}

struct SinkEventSenderInner<ResponseSink> {
	response_sink: ResponseSink,
}

#[async_trait]
impl<ResponseSink, SinkError> EventSenderTrait for SinkEventSender<ResponseSink>
where
	ResponseSink: Sink<WebSocketMessage, Error = SinkError> + Send + Unpin + 'static,
	SinkError: Debug + 'static,
{
	async fn send_event(&self, event: ServerEvent) -> Result<(), ()> {
		let mut inner = self.inner.lock().await;

		let websocket_message = WebSocketMessage::from(&event);

		inner
			.response_sink
			.send(websocket_message)
			.await
			.map_err(|error| error!("Error while sending event: {:?}", error))
	}

	async fn close(&self) {
		let mut inner = self.inner.lock().await;
		let _ = inner.response_sink.send(WebSocketMessage::Close(None)).await;
	}
}

impl<ResponseSink, SinkError> SinkEventSender<ResponseSink>
where
	ResponseSink: Sink<WebSocketMessage, Error = SinkError> + Unpin,
	SinkError: Debug + 'static,
{
	pub fn new(response_sink: ResponseSink) -> Self {
		let inner = SinkEventSenderInner { response_sink };
		Self { inner: inner.into() }
	}
}

impl<ResponseSink, SinkError> From<SinkEventSender<ResponseSink>> for EventSender
where
	ResponseSink: Sink<WebSocketMessage, Error = SinkError> + Send + Unpin + 'static,
	SinkError: Debug + 'static,
{
	fn from(sink_event_sender: SinkEventSender<ResponseSink>) -> Self {
		Arc::pin(sink_event_sender)
	}
}
