use crate::configuration::SentimentConfiguration;
use crate::sentiment::cache::AnalysisCache;
use crate::sentiment::provider::{HttpSentimentScorer, ProviderScores, SentimentScorer};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub mod cache;
pub mod provider;

const SLIDING_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);
const ABSOLUTE_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const POSITIVE_COLOR: &str = "#28a745";
const NEGATIVE_COLOR: &str = "#dc3545";
const NEUTRAL_COLOR: &str = "#6c757d";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SentimentLabel {
	Positive,
	Negative,
	Neutral,
}

impl SentimentLabel {
	pub fn color(self) -> &'static str {
		match self {
			SentimentLabel::Positive => POSITIVE_COLOR,
			SentimentLabel::Negative => NEGATIVE_COLOR,
			SentimentLabel::Neutral => NEUTRAL_COLOR,
		}
	}

	/// Provider labels are matched case-insensitively; anything
	/// unrecognized counts as neutral.
	fn from_provider_label(label: &str) -> Self {
		match label.to_ascii_lowercase().as_str() {
			"positive" => SentimentLabel::Positive,
			"negative" => SentimentLabel::Negative,
			_ => SentimentLabel::Neutral,
		}
	}
}

impl Display for SentimentLabel {
	fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
		let label = match self {
			SentimentLabel::Positive => "Positive",
			SentimentLabel::Negative => "Negative",
			SentimentLabel::Neutral => "Neutral",
		};
		write!(formatter, "{label}")
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sentiment {
	pub label: SentimentLabel,
	pub score: f64,
	pub color: &'static str,
}

impl Sentiment {
	fn neutral() -> Self {
		Self {
			label: SentimentLabel::Neutral,
			score: 0.5,
			color: NEUTRAL_COLOR,
		}
	}
}

/// Sentiment analysis with a deterministic neutral fallback. `analyze` never
/// fails and never takes longer than the configured provider timeout, so the
/// save pipeline cannot stall or abort on this dependency.
pub struct SentimentAnalyzer {
	scorer: Option<Arc<dyn SentimentScorer>>,
	cache: AnalysisCache,
	timeout: Duration,
}

impl SentimentAnalyzer {
	pub fn new(scorer: Arc<dyn SentimentScorer>, timeout: Duration) -> Self {
		Self {
			scorer: Some(scorer),
			cache: AnalysisCache::new(SLIDING_EXPIRY, ABSOLUTE_EXPIRY),
			timeout,
		}
	}

	pub fn disabled() -> Self {
		Self {
			scorer: None,
			cache: AnalysisCache::new(SLIDING_EXPIRY, ABSOLUTE_EXPIRY),
			timeout: Duration::ZERO,
		}
	}

	pub fn from_configuration(configuration: &SentimentConfiguration) -> anyhow::Result<Self> {
		match &configuration.endpoint {
			Some(endpoint) => {
				let api_key = configuration.api_key.clone().unwrap_or_default();
				let scorer = HttpSentimentScorer::new(endpoint.clone(), api_key)?;
				Ok(Self::new(Arc::new(scorer), configuration.timeout))
			}
			None => {
				warn!("Sentiment provider is not configured. Analysis will return neutral results.");
				Ok(Self::disabled())
			}
		}
	}

	pub async fn analyze(&self, text: &str) -> Sentiment {
		if text.trim().is_empty() {
			return Sentiment::neutral();
		}

		let Some(scorer) = &self.scorer else {
			return Sentiment::neutral();
		};

		let key = normalized_text(text);
		if let Some(sentiment) = self.cache.get(&key) {
			return sentiment;
		}

		let scores = match tokio::time::timeout(self.timeout, scorer.score(text)).await {
			Ok(Ok(scores)) => scores,
			Ok(Err(error)) => {
				warn!("Sentiment analysis failed, falling back to neutral: {error}");
				return Sentiment::neutral();
			}
			Err(_) => {
				warn!("Sentiment analysis timed out after {:?}, falling back to neutral", self.timeout);
				return Sentiment::neutral();
			}
		};

		let sentiment = Sentiment::from(scores);
		self.cache.insert(key, sentiment.clone());
		sentiment
	}
}

impl From<ProviderScores> for Sentiment {
	fn from(scores: ProviderScores) -> Self {
		let label = SentimentLabel::from_provider_label(&scores.label);
		Self {
			label,
			score: scores.positive.max(scores.negative).max(scores.neutral),
			color: label.color(),
		}
	}
}

fn normalized_text(text: &str) -> String {
	text.trim().to_lowercase()
}
