use crate::{Config, WeatherQueryRequest, report::WeatherReport};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tokio::task::JoinSet;
use tracing::warn;

pub mod weatherapi;

pub use weatherapi::WeatherApiProvider;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, request: &WeatherQueryRequest) -> anyhow::Result<WeatherReport>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.weather_api_key()?;
    Ok(Arc::new(WeatherApiProvider::new(api_key, config.weather.base_url.clone())))
}

/// Outcome of fetching one request.
#[derive(Debug)]
pub struct Fetched {
    pub request: WeatherQueryRequest,
    pub report: anyhow::Result<WeatherReport>,
}

/// Fetches every request concurrently and returns the outcomes in request order.
///
/// A failed fetch does not affect the others.
pub async fn fetch_all(
    provider: Arc<dyn WeatherProvider>,
    requests: Vec<WeatherQueryRequest>,
) -> Vec<Fetched> {
    let mut set = JoinSet::new();
    for (index, request) in requests.iter().cloned().enumerate() {
        let provider = Arc::clone(&provider);
        set.spawn(async move {
            let report = provider.fetch(&request).await;
            (index, report)
        });
    }

    let mut reports: Vec<Option<anyhow::Result<WeatherReport>>> =
        requests.iter().map(|_| None).collect();

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, report)) => reports[index] = Some(report),
            Err(e) => warn!(error = %e, "provider fetch task failed"),
        }
    }

    requests
        .into_iter()
        .zip(reports)
        .map(|(request, report)| Fetched {
            request,
            report: report.unwrap_or_else(|| Err(anyhow::anyhow!("Fetch task did not complete"))),
        })
        .collect()
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}
