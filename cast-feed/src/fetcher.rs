use crate::types::{FeedError, FetchConfig, Result};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use url::Url;

/// Thin HTTP client for the cast backend.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Self::build_client(&config)?;
        Ok(Self { client, config })
    }

    fn build_client(config: &FetchConfig) -> Result<Client> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;
        Ok(client)
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Build `{api_url}/{path}?{query}`.
    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let base = format!(
            "{}/{}",
            self.config.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse_with_params(&base, query)?)
    }

    /// GET an endpoint and return the body. Statuses >= 400 are errors.
    pub async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = self.endpoint(path, query)?;
        let start_time = Instant::now();

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 32),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 60)),
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            debug!("GET {} (attempt {})", url, attempt + 1);

            match self.send(&url).await {
                Ok(response) if response.status().is_success() => {
                    let body = response.text().await?;
                    debug!(
                        "Fetched {} ({} bytes in {}ms)",
                        url,
                        body.len(),
                        start_time.elapsed().as_millis()
                    );
                    return Ok(body);
                }
                Ok(response) => {
                    last_error = Some(FeedError::Status {
                        status: response.status().as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    last_error = Some(e);
                }
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }
            break;
        }

        let err = last_error
            .unwrap_or_else(|| FeedError::General(format!("No response from {}", url)));
        error!(
            "Failed to fetch {} after {} attempt(s): {}",
            url,
            self.config.max_retries + 1,
            err
        );
        Err(err)
    }

    async fn send(&self, url: &Url) -> Result<Response> {
        let mut request = self
            .client
            .get(url.clone())
            .header("content-type", "application/json");

        if let Some(api_key) = &self.config.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await?;
        Ok(response)
    }

    pub fn update_config(&mut self, config: FetchConfig) -> Result<()> {
        self.client = Self::build_client(&config)?;
        self.config = config;
        Ok(())
    }
}
