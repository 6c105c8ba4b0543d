//! HTTP source fetching with bounded concurrency and retries.

use std::time::Duration;

use chrono::Local;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::errors::FetchError;

/// Replace `{MMdd}` / `{MMdd-1}` placeholders in a source URL with today's
/// and yesterday's date. Some sources publish one playlist per day.
pub fn expand_date_placeholders(url: &str) -> String {
    let mut url = url.to_string();
    if url.contains("{MMdd}") {
        let today = Local::now().format("%m%d").to_string();
        url = url.replace("{MMdd}", &today);
    }
    if url.contains("{MMdd-1}") {
        let yesterday = (Local::now() - chrono::Duration::days(1))
            .format("%m%d")
            .to_string();
        url = url.replace("{MMdd-1}", &yesterday);
    }
    url
}

/// Shared client with retry policy for playlist sources.
pub struct SourceFetcher {
    client: Client,
    retries: u32,
    backoff: Duration,
    concurrency: usize,
}

impl SourceFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            retries: config.retries.max(1),
            backoff: Duration::from_millis(config.backoff_ms),
            concurrency: config.concurrency.max(1),
        })
    }

    /// Fetch one URL, retrying retryable failures with exponential backoff.
    /// An HTTP status error ends the attempts immediately.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error = FetchError::EmptyBody;
        for attempt in 0..self.retries {
            match self.try_fetch(url).await {
                Ok(body) => return Ok(body),
                Err(err) => {
                    if !err.is_retryable() {
                        return Err(err);
                    }
                    warn!(url, attempt = attempt + 1, error = %err, "fetch attempt failed");
                    last_error = err;
                }
            }
            if attempt + 1 < self.retries {
                let delay = self.backoff * 2u32.saturating_pow(attempt);
                tokio::time::sleep(delay).await;
            }
        }
        Err(last_error)
    }

    async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        debug!(url, bytes = body.len(), "source fetched");
        Ok(body)
    }

    /// Fetch all URLs with bounded concurrency, preserving input order in
    /// the result. Classification consumes the results single-threaded.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<(String, Result<String, FetchError>)> {
        stream::iter(urls.iter().cloned())
            .map(|url| async move {
                let result = self.fetch_text(&url).await;
                (url, result)
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_date_placeholders() {
        let today = Local::now().format("%m%d").to_string();
        let expanded = expand_date_placeholders("http://a/{MMdd}/list.txt");
        assert_eq!(expanded, format!("http://a/{}/list.txt", today));
        assert_eq!(
            expand_date_placeholders("http://a/list.txt"),
            "http://a/list.txt"
        );
    }

    #[test]
    fn test_expand_both_placeholders() {
        let expanded = expand_date_placeholders("http://a/{MMdd}/{MMdd-1}.txt");
        assert!(!expanded.contains("{MMdd}"));
        assert!(!expanded.contains("{MMdd-1}"));
    }

    #[tokio::test]
    async fn test_unreachable_host_errors() {
        let fetcher = SourceFetcher::new(&FetchConfig {
            timeout_secs: 1,
            retries: 1,
            backoff_ms: 1,
            concurrency: 2,
            user_agent: "test".to_string(),
        })
        .expect("client");
        // unroutable per RFC 5737; expect a transport error, not a panic
        let result = fetcher.fetch_text("http://192.0.2.1:9/x").await;
        assert!(result.is_err());
    }
}
