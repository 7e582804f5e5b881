use crate::sentiment::provider::{ProviderScores, ScorerError, SentimentScorer};
use async_trait::async_trait;

/// Deterministic provider stand-in: "love" is positive, "hate" is negative,
/// everything else is neutral.
pub struct KeywordScorer;

#[async_trait]
impl SentimentScorer for KeywordScorer {
	async fn score(&self, text: &str) -> Result<ProviderScores, ScorerError> {
		let text = text.to_lowercase();
		let scores = if text.contains("love") {
			ProviderScores {
				label: "Positive".to_string(),
				positive: 0.93,
				negative: 0.02,
				neutral: 0.05,
			}
		} else if text.contains("hate") {
			ProviderScores {
				label: "Negative".to_string(),
				positive: 0.02,
				negative: 0.88,
				neutral: 0.1,
			}
		} else {
			ProviderScores {
				label: "Neutral".to_string(),
				positive: 0.2,
				negative: 0.2,
				neutral: 0.6,
			}
		};
		Ok(scores)
	}
}
