use crate::sentiment::Sentiment;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cache of successful analysis results keyed by normalized input text.
///
/// An entry lives until its sliding inactivity window passes without a read,
/// or until its absolute age cap is reached, whichever comes first. Reads
/// extend the sliding window; the absolute cap cannot be extended.
pub struct AnalysisCache {
	entries: Mutex<HashMap<String, CacheEntry>>,
	sliding_expiry: Duration,
	absolute_expiry: Duration,
}

struct CacheEntry {
	sentiment: Sentiment,
	inserted_at: Instant,
	last_read: Instant,
}

impl CacheEntry {
	fn is_expired(&self, now: Instant, sliding_expiry: Duration, absolute_expiry: Duration) -> bool {
		(now.duration_since(self.last_read) >= sliding_expiry)
			|| (now.duration_since(self.inserted_at) >= absolute_expiry)
	}
}

impl AnalysisCache {
	pub fn new(sliding_expiry: Duration, absolute_expiry: Duration) -> Self {
		Self {
			entries: Default::default(),
			sliding_expiry,
			absolute_expiry,
		}
	}

	pub fn get(&self, key: &str) -> Option<Sentiment> {
		let mut entries = self.entries.lock();
		let now = Instant::now();

		if let Some(entry) = entries.get_mut(key) {
			if !entry.is_expired(now, self.sliding_expiry, self.absolute_expiry) {
				entry.last_read = now;
				return Some(entry.sentiment.clone());
			}
		}

		entries.remove(key);
		None
	}

	pub fn insert(&self, key: String, sentiment: Sentiment) {
		let mut entries = self.entries.lock();
		let now = Instant::now();

		entries.retain(|_, entry| !entry.is_expired(now, self.sliding_expiry, self.absolute_expiry));
		entries.insert(
			key,
			CacheEntry {
				sentiment,
				inserted_at: now,
				last_read: now,
			},
		);
	}
}
