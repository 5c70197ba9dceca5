//! GitHub HTTP client with rate limiting and retries.
//!
//! Wraps the one REST endpoint the activity collector needs. Requests pass
//! through a `governor` token bucket; transport failures, 429 and 5xx answers
//! are retried with exponential backoff.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use chrono::NaiveDate;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, StatusCode};

use super::models::{GitHubEvent, PushActivity};
use crate::domain::errors::{KpiError, KpiResult};
use crate::domain::models::{GitHubConfig, RetryConfig};

const SERVICE: &str = "github";

/// GitHub serves at most this many events per page.
const PAGE_SIZE: usize = 100;

/// The public events feed stops after 300 events.
const MAX_PAGES: u32 = 3;

/// Result of a single HTTP attempt.
enum Attempt<T> {
    Done(T),
    Retry(KpiError),
    Fail(KpiError),
}

/// HTTP client for the GitHub REST API v3.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    user_agent: String,
    limiter: Arc<DefaultDirectRateLimiter>,
    retry: RetryConfig,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

fn quota(requests_per_second: f64, burst_size: u32) -> Quota {
    let burst = NonZeroU32::new(burst_size).unwrap_or(NonZeroU32::MIN);
    let period = if requests_per_second > 0.0 {
        Duration::from_secs_f64(1.0 / requests_per_second)
    } else {
        Duration::from_secs(1)
    };
    Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
        .allow_burst(burst)
}

impl GitHubClient {
    /// Build a client from configuration.
    pub fn new(config: &GitHubConfig) -> KpiResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| KpiError::external(SERVICE, format!("failed to build client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            user_agent: config.user_agent.clone(),
            limiter: Arc::new(RateLimiter::direct(quota(
                config.rate_limit.requests_per_second,
                config.rate_limit.burst_size,
            ))),
            retry: config.retry.clone(),
        })
    }

    /// Public events of `username`, newest first.
    ///
    /// Returns `None` when GitHub answers 404 for the user.
    pub async fn public_events(&self, username: &str) -> KpiResult<Option<Vec<GitHubEvent>>> {
        let mut events = Vec::new();
        for page in 1..=MAX_PAGES {
            let url = format!(
                "{}/users/{}/events/public?per_page={PAGE_SIZE}&page={page}",
                self.base_url, username
            );
            let Some(batch) = self.get_with_retry(&url).await? else {
                return Ok(None);
            };
            let last_page = batch.len() < PAGE_SIZE;
            events.extend(batch);
            if last_page {
                break;
            }
        }
        Ok(Some(events))
    }

    /// Count `username`'s push events on days in `[start, end]`.
    pub async fn push_activity(
        &self,
        username: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> KpiResult<PushActivity> {
        match self.public_events(username).await? {
            Some(events) => Ok(PushActivity::count(&events, start, end)),
            None => {
                tracing::debug!(username, "GitHub user not found; counting as inactive");
                Ok(PushActivity::unknown_user())
            }
        }
    }

    async fn get_with_retry(&self, url: &str) -> KpiResult<Option<Vec<GitHubEvent>>> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(self.retry.initial_backoff_ms))
            .with_max_interval(Duration::from_millis(self.retry.max_backoff_ms))
            .with_max_elapsed_time(None)
            .build();
        let attempts = &AtomicU32::new(0);
        let max_retries = self.retry.max_retries;

        backoff::future::retry(policy, move || async move {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            match self.get_once(url).await {
                Attempt::Done(value) => Ok(value),
                Attempt::Retry(err) if attempt < max_retries => {
                    tracing::warn!(
                        url,
                        attempt = attempt + 1,
                        max_retries,
                        error = %err,
                        "GitHub request failed, retrying"
                    );
                    Err(backoff::Error::transient(err))
                }
                Attempt::Retry(err) | Attempt::Fail(err) => Err(backoff::Error::permanent(err)),
            }
        })
        .await
    }

    async fn get_once(&self, url: &str) -> Attempt<Option<Vec<GitHubEvent>>> {
        self.limiter.until_ready().await;

        let mut request = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", &self.user_agent);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return Attempt::Retry(KpiError::unavailable(
                    SERVICE,
                    format!("request failed: {e}"),
                ));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Attempt::Done(None);
        }
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Attempt::Retry(KpiError::external(SERVICE, format!("returned {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Attempt::Fail(KpiError::external(
                SERVICE,
                format!("returned {status}: {body}"),
            ));
        }

        match response.json::<Vec<GitHubEvent>>().await {
            Ok(events) => Attempt::Done(Some(events)),
            Err(e) => Attempt::Fail(KpiError::external(
                SERVICE,
                format!("invalid events payload: {e}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_tolerates_degenerate_config() {
        // Zero burst and zero rate must still produce a usable quota.
        let q = quota(0.0, 0);
        assert_eq!(q.burst_size().get(), 1);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = GitHubConfig {
            api_base_url: "http://localhost:1234/".to_string(),
            ..GitHubConfig::default()
        };
        let client = GitHubClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
    }

    #[test]
    fn empty_token_means_unauthenticated() {
        let config = GitHubConfig {
            token: Some(String::new()),
            ..GitHubConfig::default()
        };
        let client = GitHubClient::new(&config).unwrap();
        assert!(client.token.is_none());
    }
}
