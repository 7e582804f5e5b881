use crate::broadcast::Broadcaster;
use crate::configuration::Configuration;
use crate::registry::ConnectionRegistry;
use crate::registry::connection_id::ConnectionIdSequence;
use crate::sentiment::SentimentAnalyzer;
use crate::store::MessageStore;
use crate::store::sqlite::SqliteStore;
use axum::extract::FromRef;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything a connection needs, wired up once at startup and cloned per
/// connection. The registry and store are owned here and injected, never
/// reached through global state.
#[derive(Clone, FromRef)]
pub struct ApplicationContext {
	pub configuration: Configuration,
	pub registry: Arc<ConnectionRegistry>,
	pub broadcaster: Arc<Broadcaster>,
	pub store: Arc<dyn MessageStore>,
	pub connection_ids: Arc<ConnectionIdSequence>,
	/// Serializes store commit and broadcast enqueue so that fan-out order
	/// is exactly persistence-commit order.
	pub commit_order: Arc<Mutex<()>>,
}

impl ApplicationContext {
	pub async fn new(configuration: Configuration) -> anyhow::Result<ApplicationContext> {
		let analyzer = SentimentAnalyzer::from_configuration(&configuration.sentiment)?;
		let store = Arc::new(SqliteStore::new(&configuration.database_url, Arc::new(analyzer)).await?);

		Ok(Self::with_store(configuration, store))
	}

	pub fn with_store(configuration: Configuration, store: Arc<dyn MessageStore>) -> ApplicationContext {
		let broadcaster = Arc::new(Broadcaster::new(configuration.broadcast_send_timeout));
		Self {
			configuration,
			registry: Default::default(),
			broadcaster,
			store,
			connection_ids: Default::default(),
			commit_order: Default::default(),
		}
	}
}
