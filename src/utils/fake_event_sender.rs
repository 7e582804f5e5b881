use crate::connection::sender::{EventSender, EventSenderTrait};
use crate::message::server_event::ServerEvent;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every event it is asked to send.
#[derive(Clone, Debug, Default)]
pub struct FakeEventSender {
	events: Arc<Mutex<Vec<ServerEvent>>>,
}

impl FakeEventSender {
	pub fn events(&self) -> Vec<ServerEvent> {
		self.events.lock().clone()
	}
}

impl From<FakeEventSender> for EventSender {
	fn from(fake_event_sender: FakeEventSender) -> Self {
		Arc::pin(fake_event_sender)
	}
}

#[async_trait]
impl EventSenderTrait for FakeEventSender {
	async fn send_event(&self, event: ServerEvent) -> Result<(), ()> {
		self.events.lock().push(event);
		Ok(())
	}

	async fn close(&self) {}
}

/// Never finishes a send. Stands in for a stalled peer.
#[derive(Clone, Debug, Default)]
pub struct StallingEventSender;

impl From<StallingEventSender> for EventSender {
	fn from(stalling_event_sender: StallingEventSender) -> Self {
		Arc::pin(stalling_event_sender)
	}
}

#[async_trait]
impl EventSenderTrait for StallingEventSender {
	async fn send_event(&self, _event: ServerEvent) -> Result<(), ()> {
		std::future::pending().await
	}

	async fn close(&self) {}
}
