//! Bounded retry with exponential backoff for blocking HTTP requests.
//!
//! Retries transient failures only:
//! - timeouts and connection errors
//! - 5xx server errors, 408 and 429
//!
//! Other 4xx responses and request-construction errors are returned at once.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Response;
use reqwest::StatusCode;

use crate::config;

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: u32,
    /// Base delay, doubled on each subsequent retry.
    pub backoff_factor: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: config::DEFAULT_MAX_RETRIES,
            backoff_factor: Duration::from_millis(config::DEFAULT_BACKOFF_FACTOR_MS),
            max_delay: Duration::from_millis(config::DEFAULT_MAX_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_factor_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_factor: Duration::from_millis(backoff_factor_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    /// Delay before retry number `attempt + 1`: `backoff_factor * 2^attempt`, capped.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.backoff_factor.as_millis() as u64).saturating_mul(factor);
        let capped = delay_ms.min(self.max_delay.as_millis() as u64);
        Duration::from_millis(capped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() || error.is_connect() {
        return RetryDecision::Retry;
    }
    if let Some(status) = error.status() {
        return is_retryable_status(status);
    }
    RetryDecision::NoRetry
}

pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        RetryDecision::Retry
    } else {
        RetryDecision::NoRetry
    }
}

/// Run `operation` until it yields a non-retryable outcome or the policy is exhausted.
///
/// A response with a retryable status is returned as-is once retries run out,
/// so the caller still sees the final status code.
pub fn with_retry<F>(policy: &RetryPolicy, mut operation: F) -> Result<Response, reqwest::Error>
where
    F: FnMut() -> Result<Response, reqwest::Error>,
{
    let mut attempt: u32 = 0;
    loop {
        match operation() {
            Ok(response) => {
                let status = response.status();
                if is_retryable_status(status) == RetryDecision::NoRetry
                    || attempt >= policy.max_retries
                {
                    if attempt > 0 {
                        log::info!("Request finished with {} after {} retries", status, attempt);
                    }
                    return Ok(response);
                }
                log::warn!(
                    "Request returned retryable status {}, attempt {} of {}",
                    status,
                    attempt + 1,
                    policy.max_retries + 1
                );
            }
            Err(e) => {
                if is_retryable_error(&e) == RetryDecision::NoRetry {
                    log::debug!("Non-retryable error: {}", e);
                    return Err(e);
                }
                if attempt >= policy.max_retries {
                    log::error!("All {} attempts exhausted: {}", policy.max_retries + 1, e);
                    return Err(e);
                }
                log::warn!(
                    "Retryable error on attempt {} of {}: {}",
                    attempt + 1,
                    policy.max_retries + 1,
                    e
                );
            }
        }

        thread::sleep(policy.delay_for_attempt(attempt));
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_config() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.backoff_factor, Duration::from_millis(200));
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy::new(5, 200, 60_000);
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(800));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(1600));
    }

    #[test]
    fn delay_is_capped() {
        let policy = RetryPolicy::new(10, 100, 1000);
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(60), Duration::from_millis(1000));
    }

    #[test]
    fn status_classification() {
        assert_eq!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::BAD_GATEWAY), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::REQUEST_TIMEOUT), RetryDecision::Retry);

        assert_eq!(is_retryable_status(StatusCode::BAD_REQUEST), RetryDecision::NoRetry);
        assert_eq!(is_retryable_status(StatusCode::NOT_FOUND), RetryDecision::NoRetry);
        assert_eq!(is_retryable_status(StatusCode::OK), RetryDecision::NoRetry);
    }

    #[test]
    fn builder_errors_are_not_retried() {
        let client = reqwest::blocking::Client::new();
        let mut calls = 0;
        let result = with_retry(&RetryPolicy::new(3, 0, 0), || {
            calls += 1;
            client.get("not a url").send()
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
