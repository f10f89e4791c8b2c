use crate::errors::{SuggestError, fetch_context};
use crate::rate_limiter::RateLimiter;
use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// HTTP client with built-in rate limiting and retries of queued requests
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl RateLimitedClient {
    pub fn new(user_agent: &str, rate_limiter: RateLimiter) -> Result<Self> {
        let client = Self::build_client(user_agent)?;

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Fetch a body, re-sending the request while the server answers 202 Accepted
    pub async fn get_text(&mut self, url: &str, timeout: Duration) -> Result<String> {
        let mut attempt = 0;

        loop {
            self.rate_limiter.wait().await;
            let response = self.send_get_request(url, timeout).await?;
            debug!("Request url: {} -> {}", url, response.status());

            match response.status() {
                StatusCode::OK => {
                    return response
                        .text()
                        .await
                        .with_context(|| fetch_context(url));
                }
                StatusCode::ACCEPTED if self.rate_limiter.can_retry(attempt) => {
                    self.rate_limiter.backoff(attempt).await;
                    attempt += 1;
                    debug!("Got accepted code, retry #{} for {}", attempt, url);
                }
                StatusCode::ACCEPTED => {
                    return Err(SuggestError::unavailable(format!(
                        "{} (still queued after {} retries)",
                        url, attempt
                    ))
                    .into());
                }
                status => {
                    let body = response.text().await.unwrap_or_default();
                    debug!("{}", body);
                    return Err(SuggestError::unavailable(format!("{} (HTTP {})", url, status)).into());
                }
            }
        }
    }

    fn build_client(user_agent: &str) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")
    }

    async fn send_get_request(&self, url: &str, timeout: Duration) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .with_context(|| fetch_context(url))
    }
}
