use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::Relaxed;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ConnectionId {
	id: u64,
}

impl From<u64> for ConnectionId {
	fn from(id: u64) -> Self {
		ConnectionId { id }
	}
}

impl From<ConnectionId> for u64 {
	fn from(connection_id: ConnectionId) -> Self {
		connection_id.id
	}
}

impl Display for ConnectionId {
	fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
		write!(formatter, "ConnectionId({})", self.id)
	}
}

#[derive(Default)]
pub struct ConnectionIdSequence {
	next_id: AtomicU64,
}

impl ConnectionIdSequence {
	pub fn next(&self) -> ConnectionId {
		// Using Relaxed memory ordering is ok because we only care about
		// the ordering of the value in the atomic and not any surrounding
		// loads or stores.
		ConnectionId::from(self.next_id.fetch_add(1, Relaxed))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn connection_id_sequence_should_count() {
		let sequence = ConnectionIdSequence::default();
		assert_eq!(ConnectionId::from(0), sequence.next());
		assert_eq!(ConnectionId::from(1), sequence.next());
		assert_eq!(ConnectionId::from(2), sequence.next());
		assert_eq!(ConnectionId::from(3), sequence.next());
		assert_eq!(ConnectionId::from(4), sequence.next());
	}
}
