use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contract of the external sentiment scoring provider: a label plus the
/// per-class probabilities it was derived from.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
	async fn score(&self, text: &str) -> Result<ProviderScores, ScorerError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProviderScores {
	pub label: String,
	pub positive: f64,
	pub negative: f64,
	pub neutral: f64,
}

#[derive(Debug, Error)]
pub enum ScorerError {
	#[error("Sentiment request failed: {0}")]
	Request(#[from] reqwest::Error),
}

/// Scores text against an HTTP provider with a bearer key.
pub struct HttpSentimentScorer {
	client: reqwest::Client,
	endpoint: String,
	api_key: String,
}

impl HttpSentimentScorer {
	pub fn new(endpoint: String, api_key: String) -> Result<Self, ScorerError> {
		let client = reqwest::Client::builder().build()?;
		Ok(Self {
			client,
			endpoint,
			api_key,
		})
	}
}

#[async_trait]
impl SentimentScorer for HttpSentimentScorer {
	async fn score(&self, text: &str) -> Result<ProviderScores, ScorerError> {
		let response = self
			.client
			.post(&self.endpoint)
			.bearer_auth(&self.api_key)
			.json(&ScoreRequest { text })
			.send()
			.await?
			.error_for_status()?;

		let ScoreResponse {
			sentiment,
			confidence_scores,
		} = response.json().await?;

		Ok(ProviderScores {
			label: sentiment,
			positive: confidence_scores.positive,
			negative: confidence_scores.negative,
			neutral: confidence_scores.neutral,
		})
	}
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
	text: &'a str,
}

#[derive(Deserialize)]
struct ScoreResponse {
	sentiment: String,
	confidence_scores: ConfidenceScores,
}

#[derive(Deserialize)]
struct ConfidenceScores {
	positive: f64,
	negative: f64,
	neutral: f64,
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn should_deserialize_provider_response() {
		let json = r#"{
			"sentiment": "Positive",
			"confidence_scores": {"positive": 0.91, "negative": 0.03, "neutral": 0.06}
		}"#;

		let response: ScoreResponse = serde_json::from_str(json).expect("Failed to deserialize provider response");

		assert_eq!("Positive", response.sentiment);
		assert_eq!(0.91, response.confidence_scores.positive);
		assert_eq!(0.03, response.confidence_scores.negative);
		assert_eq!(0.06, response.confidence_scores.neutral);
	}
}
