//! HTTP client for the review service

use super::models::WeakCard;
use anyhow::{Context, Result};
use std::time::Duration;

/// Default weak-cards endpoint of the review service
pub const DEFAULT_REVIEW_URL: &str = "http://localhost:5000/weak_cards";

/// Reads weak cards from the review service.
#[derive(Clone)]
pub struct ReviewClient {
    client: reqwest::Client,
    url: String,
}

impl ReviewClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch the current weak cards.
    pub async fn weak_cards(&self) -> Result<Vec<WeakCard>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to connect to review service at {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Review service returned {}: {}", status.as_u16(), body);
        }

        let cards: Vec<WeakCard> = response
            .json()
            .await
            .context("Failed to parse review service response")?;

        tracing::debug!("Fetched {} weak cards", cards.len());
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ReviewClient {
        ReviewClient::new(format!("{}/weak_cards", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_weak_cards() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weak_cards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "card_id": 42,
                "lapses": 6,
                "ease": 1900,
                "interval": 2,
                "question": "Capital of Mongolia?",
                "answer": "Ulaanbaatar",
                "advice": "Use a mnemonic",
                "deck_name": "Geography"
            }])))
            .mount(&server)
            .await;

        let cards = client_for(&server).weak_cards().await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].card_id, 42);
        assert_eq!(cards[0].answer, "Ulaanbaatar");
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("collection locked"))
            .mount(&server)
            .await;

        let err = client_for(&server).weak_cards().await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{"card_id": "x"}])),
            )
            .mount(&server)
            .await;

        assert!(client_for(&server).weak_cards().await.is_err());
    }
}
