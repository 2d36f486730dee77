//! Retry loop for result queries
//!
//! A single query attempt is classified into a [`PollOutcome`]. Busy answers
//! carrying a `Retry-After` header are slept on and reissued until the
//! retry budget of the active [`Wait`] policy runs out.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use url::Url;
use crate::config::{self, ConfigProvider, RESULTS_LONG_RETRIES, RESULTS_SHORT_RETRIES};
use crate::error::{Result, SdkError};
use super::wait::Wait;

/// Statuses for which a server-issued `Retry-After` is honored
pub const RETRYABLE_STATUSES: [StatusCode; 3] = [
    StatusCode::PAYLOAD_TOO_LARGE,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::SERVICE_UNAVAILABLE,
];

/// Outcome of one result query attempt
#[derive(Debug)]
pub enum PollOutcome {
    /// The dispatcher answered with a decoded payload
    Success(Value),
    /// The dispatcher is busy and asked to be retried after the given delay
    RetryableBusy(Duration),
    /// The connection failed or was dropped before any response
    TransportFault(reqwest::Error),
}

/// Number of retries allowed per wait policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub short_retries: usize,
    pub long_retries: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            short_retries: 5,
            long_retries: 1000,
        }
    }
}

impl RetryPolicy {
    /// Reads the retry budgets from configuration, keeping defaults for absent keys
    pub fn from_provider(provider: &dyn ConfigProvider) -> Result<Self> {
        let defaults = Self::default();
        let short_retries =
            config::parse_or(provider, RESULTS_SHORT_RETRIES, defaults.short_retries)?;
        let long_retries = config::parse_or(provider, RESULTS_LONG_RETRIES, defaults.long_retries)?;
        Ok(Self {
            short_retries,
            long_retries,
        })
    }

    /// Retries allowed after the first attempt
    pub fn retries(&self, wait: Wait) -> usize {
        match wait {
            Wait::Short => self.short_retries,
            Wait::Long => self.long_retries,
        }
    }
}

/// Parses a `Retry-After` header given in (possibly fractional) seconds
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    let seconds: f64 = raw.parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

/// Whether a send error means the dispatcher could not be talked to at all
///
/// Covers refused connections as well as connections dropped or reset
/// before any response arrived.
pub(crate) fn is_transport_fault(e: &reqwest::Error) -> bool {
    e.is_connect() || (e.is_request() && e.status().is_none())
}

/// Issues one GET against `url` and classifies the answer
pub(crate) async fn attempt(
    http_client: &HttpClient,
    url: &Url,
    dispatch_id: &str,
) -> Result<PollOutcome> {
    let response = match http_client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) if is_transport_fault(&e) => return Ok(PollOutcome::TransportFault(e)),
        Err(e) => return Err(e.into()),
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(SdkError::MissingDispatchRecord(dispatch_id.to_string()));
    }
    if RETRYABLE_STATUSES.contains(&status) {
        if let Some(delay) = retry_after(response.headers()) {
            return Ok(PollOutcome::RetryableBusy(delay));
        }
    }

    let response = response.error_for_status()?;
    Ok(PollOutcome::Success(response.json().await?))
}

/// Repeats [`attempt`] while the dispatcher is busy
///
/// Yields the decoded payload, or the transport error when the dispatcher
/// could not be reached. Running out of retries is reported as
/// [`SdkError::RetryBudgetExhausted`].
pub(crate) async fn poll_until_terminal(
    http_client: &HttpClient,
    url: &Url,
    dispatch_id: &str,
    retries: usize,
) -> Result<std::result::Result<Value, reqwest::Error>> {
    let attempts = retries.saturating_add(1);
    for n in 1..=attempts {
        log::debug!("Querying {} (attempt {}/{})", url, n, attempts);
        match attempt(http_client, url, dispatch_id).await? {
            PollOutcome::Success(result) => return Ok(Ok(result)),
            PollOutcome::TransportFault(e) => return Ok(Err(e)),
            PollOutcome::RetryableBusy(_) if n == attempts => break,
            PollOutcome::RetryableBusy(delay) => {
                log::warn!(
                    "Dispatcher busy for dispatch {}, retrying in {:?}",
                    dispatch_id,
                    delay
                );
                sleep(delay).await;
            }
        }
    }

    Err(SdkError::RetryBudgetExhausted {
        dispatch_id: dispatch_id.to_string(),
        attempts,
    })
}
