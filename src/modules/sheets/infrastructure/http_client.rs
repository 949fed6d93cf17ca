//! Rate-limited HTTP client for the Google Sheets API
//!
//! Applies a client-side quota before each request and retries rate-limited,
//! server-error and connection failures with exponential backoff.

use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use crate::log_warn;
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::sleep;

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

/// Retry configuration for outbound calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    /// Sheets read quota is 60 requests/minute per user
    pub fn sheets() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    /// No retries; used by tests against unreachable hosts
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1.0,
        }
    }

    /// Calculate delay for next retry attempt
    pub fn calculate_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(server_delay) = retry_after {
            return server_delay.min(self.max_delay);
        }

        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis((self.base_delay.as_millis() as f64 * multiplier) as u64);

        delay.min(self.max_delay)
    }
}

pub struct SheetsHttpClient {
    client: Client,
    rate_limiter: DirectRateLimiter,
    retry_policy: RetryPolicy,
}

impl SheetsHttpClient {
    pub fn new(retry_policy: RetryPolicy) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("alumni-portal/0.1")
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rate_limiter: Self::create_rate_limiter(1.0, 5),
            retry_policy,
        })
    }

    fn create_rate_limiter(requests_per_second: f64, burst_size: u32) -> DirectRateLimiter {
        let period = Duration::from_secs_f64(1.0 / requests_per_second.max(0.01));
        let burst = NonZeroU32::new(burst_size.max(1)).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst);

        GovernorRateLimiter::direct(quota)
    }

    /// GET a URL and decode JSON, with rate limiting and retries.
    ///
    /// `decorate` attaches credentials to each attempt.
    pub async fn get_json<T, F>(&self, url: &str, operation: &str, decorate: F) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let start = std::time::Instant::now();
        let response = self.send_with_retries(url, operation, &decorate).await?;

        let body = response
            .json::<T>()
            .await
            .map_err(|e| AppError::SerializationError(format!("Failed to parse {} response: {}", operation, e)))?;

        LogContext::api_call(
            "GoogleSheets",
            operation,
            "ok",
            start.elapsed().as_millis() as u64,
        );
        Ok(body)
    }

    async fn send_with_retries<F>(
        &self,
        url: &str,
        operation: &str,
        decorate: &F,
    ) -> AppResult<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let attempts = self.retry_policy.max_retries + 1;

        for attempt in 0..attempts {
            self.rate_limiter.until_ready().await;

            let request = decorate(self.client.get(url).header("Accept", "application/json"));
            let is_last = attempt + 1 == attempts;

            match request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let retryable =
                        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

                    if retryable && !is_last {
                        let retry_after = response
                            .headers()
                            .get("retry-after")
                            .and_then(|h| h.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .map(Duration::from_secs);
                        let delay = self.retry_policy.calculate_delay(attempt, retry_after);
                        log_warn!(
                            "Sheets {} returned {} (attempt {}/{}). Retrying in {:?}",
                            operation,
                            status,
                            attempt + 1,
                            attempts,
                            delay
                        );
                        sleep(delay).await;
                        continue;
                    }

                    return Err(Self::status_error(status, operation));
                }
                Err(e) => {
                    let retryable = e.is_timeout() || e.is_connect();
                    if retryable && !is_last {
                        let delay = self.retry_policy.calculate_delay(attempt, None);
                        log_warn!(
                            "Sheets {} request failed (attempt {}/{}): {}. Retrying in {:?}",
                            operation,
                            attempt + 1,
                            attempts,
                            e,
                            delay
                        );
                        sleep(delay).await;
                        continue;
                    }

                    return Err(AppError::SourceUnavailable(format!(
                        "Sheets {} request failed: {}",
                        operation, e
                    )));
                }
            }
        }

        Err(AppError::SourceUnavailable(format!(
            "Sheets {} failed after {} attempts",
            operation, attempts
        )))
    }

    fn status_error(status: StatusCode, operation: &str) -> AppError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => AppError::RateLimitError(format!(
                "Sheets {} rate limited",
                operation
            )),
            _ => AppError::SourceUnavailable(format!(
                "Sheets {} returned HTTP {}",
                operation, status
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy::sheets();
        assert_eq!(policy.calculate_delay(0, None), Duration::from_millis(500));
        assert_eq!(policy.calculate_delay(1, None), Duration::from_millis(1000));
        assert_eq!(policy.calculate_delay(10, None), Duration::from_secs(30));
    }

    #[test]
    fn test_retry_after_header_wins() {
        let policy = RetryPolicy::sheets();
        assert_eq!(
            policy.calculate_delay(0, Some(Duration::from_secs(4))),
            Duration::from_secs(4)
        );
        assert_eq!(
            policy.calculate_delay(0, Some(Duration::from_secs(600))),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_rate_limited_status_maps_to_rate_limit_error() {
        let err = SheetsHttpClient::status_error(StatusCode::TOO_MANY_REQUESTS, "values.get");
        assert!(matches!(err, AppError::RateLimitError(_)));

        let err = SheetsHttpClient::status_error(StatusCode::FORBIDDEN, "values.get");
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }
}
