use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::debug;

use super::NluResult;

/// Classifies query text into an intent plus entities.
#[async_trait]
pub trait NluClient: Send + Sync + Debug {
    async fn classify(&self, text: &str) -> Result<NluResult>;
}

/// Client for the wit.ai `message` endpoint.
#[derive(Debug, Clone)]
pub struct WitClient {
    access_token: String,
    base_url: String,
    http: Client,
}

impl WitClient {
    pub fn new(access_token: String, base_url: impl Into<String>) -> Self {
        Self {
            access_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl NluClient for WitClient {
    async fn classify(&self, text: &str) -> Result<NluResult> {
        let url = format!("{}/message", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", text)])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to send request to NLU service")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read NLU response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "NLU request failed with status {}: {}",
                status,
                crate::provider::truncate_body(&body),
            ));
        }

        let parsed: NluResult =
            serde_json::from_str(&body).context("Failed to parse NLU response JSON")?;

        debug!(
            intent = parsed.top_intent().unwrap_or("<none>"),
            entity_types = parsed.entities.len(),
            "NLU classified query"
        );

        Ok(parsed)
    }
}
