use crate::connection::sender::EventSender;
use crate::message::server_event::ServerEvent;
use crate::registry::connection_id::ConnectionId;
use dashmap::DashMap;
use futures_util::future::join_all;
use std::time::Duration;
use tracing::warn;

/// Best-effort fan-out of events to attached connections.
///
/// Every recipient is sent to concurrently and each individual send is
/// bounded by the configured timeout, so a stalled peer delays neither the
/// other recipients nor the caller beyond that bound. There is no retry and
/// no acknowledgement; a connection that cannot keep up just misses events
/// until its transport is torn down.
pub struct Broadcaster {
	connections: DashMap<ConnectionId, EventSender>,
	send_timeout: Duration,
}

impl Broadcaster {
	pub fn new(send_timeout: Duration) -> Self {
		Self {
			connections: Default::default(),
			send_timeout,
		}
	}

	pub fn attach(&self, connection_id: ConnectionId, sender: EventSender) {
		if self.connections.insert(connection_id, sender).is_some() {
			unreachable!("There must never be two attached senders for the same connection!");
		}
	}

	pub fn detach(&self, connection_id: ConnectionId) {
		self.connections.remove(&connection_id);
	}

	pub async fn to_all(&self, event: ServerEvent) {
		let recipients = self.recipients(None);
		self.send_to(recipients, event).await;
	}

	pub async fn to_others(&self, exclude: ConnectionId, event: ServerEvent) {
		let recipients = self.recipients(Some(exclude));
		self.send_to(recipients, event).await;
	}

	pub async fn to_one(&self, connection_id: ConnectionId, event: ServerEvent) {
		let Some(sender) = self.connections.get(&connection_id).map(|entry| entry.value().clone()) else {
			return;
		};
		self.send_single(connection_id, sender, event).await;
	}

	fn recipients(&self, exclude: Option<ConnectionId>) -> Vec<(ConnectionId, EventSender)> {
		// Collect before awaiting anything so no shard lock is held
		// across a suspension point.
		self.connections
			.iter()
			.filter(|entry| Some(*entry.key()) != exclude)
			.map(|entry| (*entry.key(), entry.value().clone()))
			.collect()
	}

	async fn send_to(&self, recipients: Vec<(ConnectionId, EventSender)>, event: ServerEvent) {
		let sends = recipients.into_iter().map(|(connection_id, sender)| {
			let event = event.clone();
			self.send_single(connection_id, sender, event)
		});
		join_all(sends).await;
	}

	async fn send_single(&self, connection_id: ConnectionId, sender: EventSender, event: ServerEvent) {
		match tokio::time::timeout(self.send_timeout, sender.send_event(event)).await {
			Ok(Ok(())) => {}
			Ok(Err(())) => warn!("Failed to deliver event to {}.", connection_id),
			Err(_) => warn!(
				"Delivery to {} timed out after {:?}, dropping event.",
				connection_id, self.send_timeout
			),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::message::server_event::UserJoinedEvent;
	use crate::utils::fake_event_sender::{FakeEventSender, StallingEventSender};
	use std::time::Instant;

	fn joined(name: &str) -> ServerEvent {
		UserJoinedEvent { name: name.to_string() }.into()
	}

	#[tokio::test]
	async fn to_all_should_reach_every_attached_connection() {
		let broadcaster = Broadcaster::new(Duration::from_millis(100));
		let alice = FakeEventSender::default();
		let bob = FakeEventSender::default();
		broadcaster.attach(ConnectionId::from(0), alice.clone().into());
		broadcaster.attach(ConnectionId::from(1), bob.clone().into());

		broadcaster.to_all(joined("Ferris")).await;

		assert_eq!(vec![joined("Ferris")], alice.events());
		assert_eq!(vec![joined("Ferris")], bob.events());
	}

	#[tokio::test]
	async fn to_others_should_skip_the_excluded_connection() {
		let broadcaster = Broadcaster::new(Duration::from_millis(100));
		let alice = FakeEventSender::default();
		let bob = FakeEventSender::default();
		broadcaster.attach(ConnectionId::from(0), alice.clone().into());
		broadcaster.attach(ConnectionId::from(1), bob.clone().into());

		broadcaster.to_others(ConnectionId::from(0), joined("Ferris")).await;

		assert!(alice.events().is_empty());
		assert_eq!(vec![joined("Ferris")], bob.events());
	}

	#[tokio::test]
	async fn to_one_should_only_reach_the_addressed_connection() {
		let broadcaster = Broadcaster::new(Duration::from_millis(100));
		let alice = FakeEventSender::default();
		let bob = FakeEventSender::default();
		broadcaster.attach(ConnectionId::from(0), alice.clone().into());
		broadcaster.attach(ConnectionId::from(1), bob.clone().into());

		broadcaster.to_one(ConnectionId::from(1), joined("Ferris")).await;

		assert!(alice.events().is_empty());
		assert_eq!(vec![joined("Ferris")], bob.events());
	}

	#[tokio::test]
	async fn to_one_should_ignore_unattached_connections() {
		let broadcaster = Broadcaster::new(Duration::from_millis(100));

		broadcaster.to_one(ConnectionId::from(42), joined("Ferris")).await;
	}

	#[tokio::test]
	async fn detached_connections_should_no_longer_receive_events() {
		let broadcaster = Broadcaster::new(Duration::from_millis(100));
		let alice = FakeEventSender::default();
		broadcaster.attach(ConnectionId::from(0), alice.clone().into());
		broadcaster.detach(ConnectionId::from(0));

		broadcaster.to_all(joined("Ferris")).await;

		assert!(alice.events().is_empty());
	}

	#[tokio::test]
	async fn a_stalled_peer_should_not_block_delivery_to_others() {
		let broadcaster = Broadcaster::new(Duration::from_millis(50));
		let stalled = StallingEventSender;
		let bob = FakeEventSender::default();
		broadcaster.attach(ConnectionId::from(0), stalled.into());
		broadcaster.attach(ConnectionId::from(1), bob.clone().into());

		let started = Instant::now();
		broadcaster.to_all(joined("Ferris")).await;

		assert_eq!(vec![joined("Ferris")], bob.events());
		assert!(started.elapsed() < Duration::from_secs(2));
	}
}
