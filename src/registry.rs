use crate::registry::connection_id::ConnectionId;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

pub mod connection_id;

/// Presence map between live connections and participant names.
///
/// This is the only place that mutates presence state. All operations are
/// short synchronous critical sections, so a `register` is an atomic
/// check-and-set and `list_names` returns a single consistent snapshot.
#[derive(Default)]
pub struct ConnectionRegistry {
	inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
	names_by_connection: HashMap<ConnectionId, String>,
	connections_by_name: BTreeMap<String, ConnectionId>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
	#[error("Name is already in use.")]
	NameTaken,
}

impl ConnectionRegistry {
	pub fn register(&self, connection_id: ConnectionId, name: &str) -> Result<(), RegistryError> {
		let mut inner = self.inner.write();

		if inner.connections_by_name.contains_key(name) {
			return Err(RegistryError::NameTaken);
		}

		inner.connections_by_name.insert(name.to_string(), connection_id);
		if inner.names_by_connection.insert(connection_id, name.to_string()).is_some() {
			unreachable!("There must never be two names registered for the same connection!");
		}

		Ok(())
	}

	/// Remove the mapping for a connection, returning its name.
	/// Idempotent; a second call for the same connection returns `None`.
	pub fn unregister(&self, connection_id: ConnectionId) -> Option<String> {
		let mut inner = self.inner.write();

		let name = inner.names_by_connection.remove(&connection_id)?;
		inner.connections_by_name.remove(&name);
		Some(name)
	}

	pub fn list_names(&self) -> Vec<String> {
		self.inner.read().connections_by_name.keys().cloned().collect()
	}
}
