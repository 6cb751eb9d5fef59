//! The request handler: one logical call, bounded retries, recorded history.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use tokio::time::sleep;
use tokio_retry::strategy::ExponentialBackoff;
use tracing_error::SpanTrace;
use url::Url;

use crate::credentials::Authentication;
use crate::error::{Error, Result};
use crate::functions::Function;
use crate::request::{Mode, RequestConfig, RequestDocument, SECRET_ELEMENTS};
use crate::response::{AsynchronousResponse, SynchronousResponse};
use crate::transport::Transport;
use crate::xml;

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_NO_RETRY_SERVER_ERROR_CODES: &[u16] = &[524];
pub const DEFAULT_BACKOFF_FACTOR_MS: u64 = 250;
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Which failures are retried, and how many times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// 5xx statuses that are surfaced immediately instead of retried.
    pub no_retry_server_error_codes: Vec<u16>,
    /// Delay multiplier: retries wait 2x, 4x, 8x... this many milliseconds.
    pub backoff_factor_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            no_retry_server_error_codes: DEFAULT_NO_RETRY_SERVER_ERROR_CODES.to_vec(),
            backoff_factor_ms: DEFAULT_BACKOFF_FACTOR_MS,
        }
    }
}

impl RetryPolicy {
    /// Session exchanges retry every 5xx.
    #[must_use]
    pub fn session_provider() -> Self {
        Self {
            no_retry_server_error_codes: Vec::new(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_no_retry_server_error_codes(mut self, codes: Vec<u16>) -> Self {
        self.no_retry_server_error_codes = codes;
        self
    }

    #[must_use]
    pub fn with_backoff_factor_ms(mut self, backoff_factor_ms: u64) -> Self {
        self.backoff_factor_ms = backoff_factor_ms;
        self
    }

    fn is_excluded(&self, status: StatusCode) -> bool {
        self.no_retry_server_error_codes.contains(&status.as_u16())
    }

    /// Whether `error` may be retried under this policy.
    #[must_use]
    pub fn should_retry(&self, error: &Error) -> bool {
        if !error.is_transient() {
            return false;
        }
        error.status_code().is_none_or(|status| !self.is_excluded(status))
    }

    fn delays(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(2)
            .factor(self.backoff_factor_ms)
            .max_delay(MAX_BACKOFF)
    }
}

/// One HTTP attempt as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
    pub attempt: u32,
    /// The request document with passwords and session IDs redacted.
    pub request: String,
    pub status: Option<StatusCode>,
    pub response: Option<String>,
    /// Transport error text when no response was received.
    pub error: Option<String>,
    pub elapsed: Duration,
}

/// Every attempt made during one logical operation, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionHistory {
    records: Vec<ExecutionRecord>,
}

impl ExecutionHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ExecutionRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, other: ExecutionHistory) {
        self.records.extend(other.records);
    }

    #[must_use]
    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    #[must_use]
    pub fn last(&self) -> Option<&ExecutionRecord> {
        self.records.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExecutionRecord> {
        self.records.iter()
    }
}

impl IntoIterator for ExecutionHistory {
    type Item = ExecutionRecord;
    type IntoIter = std::vec::IntoIter<ExecutionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// The outcome of an operation together with the history of the calls it made.
///
/// The history is populated whether or not the operation succeeded.
#[derive(Debug)]
pub struct Execution<T> {
    pub result: Result<T>,
    pub history: ExecutionHistory,
}

impl<T> Execution<T> {
    #[must_use]
    pub fn new(result: Result<T>, history: ExecutionHistory) -> Self {
        Self { result, history }
    }

    /// A failure that happened before any call was attempted.
    #[must_use]
    pub fn failed(error: Error) -> Self {
        Self::new(Err(error), ExecutionHistory::new())
    }

    pub fn into_result(self) -> Result<T> {
        self.result
    }

    #[must_use]
    pub fn history(&self) -> &ExecutionHistory {
        &self.history
    }

    #[must_use]
    pub fn into_parts(self) -> (Result<T>, ExecutionHistory) {
        (self.result, self.history)
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Execution<U> {
        Execution::new(self.result.map(f), self.history)
    }

    #[must_use]
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U>) -> Execution<U> {
        Execution::new(self.result.and_then(f), self.history)
    }
}

/// Posts request documents to one endpoint through a [`Transport`].
#[derive(Debug)]
pub struct RequestHandler<'a, T: Transport> {
    transport: &'a T,
    endpoint: Url,
    policy: RetryPolicy,
}

impl<'a, T: Transport> RequestHandler<'a, T> {
    #[must_use]
    pub fn new(transport: &'a T, endpoint: Url, policy: RetryPolicy) -> Self {
        Self {
            transport,
            endpoint,
            policy,
        }
    }

    #[instrument(skip(self, authentication, content), fields(control_id = %config.control_id, functions = content.len()))]
    pub async fn execute_synchronous(
        &self,
        authentication: &Authentication,
        config: &RequestConfig,
        content: &[&dyn Function],
    ) -> Execution<SynchronousResponse> {
        let mut history = ExecutionHistory::new();
        let result = async {
            let document =
                RequestDocument::build(authentication, config, Mode::Synchronous, content)?;
            let body = self.send(&document, &mut history).await?;
            SynchronousResponse::parse(&body)
        }
        .await;
        Execution::new(result, history)
    }

    #[instrument(skip(self, authentication, content), fields(control_id = %config.control_id, functions = content.len()))]
    pub async fn execute_asynchronous(
        &self,
        authentication: &Authentication,
        config: &RequestConfig,
        content: &[&dyn Function],
    ) -> Execution<AsynchronousResponse> {
        let mut history = ExecutionHistory::new();
        let result = async {
            let document =
                RequestDocument::build(authentication, config, Mode::Asynchronous, content)?;
            let body = self.send(&document, &mut history).await?;
            AsynchronousResponse::parse(&body)
        }
        .await;
        Execution::new(result, history)
    }

    async fn send(&self, document: &RequestDocument, history: &mut ExecutionHistory) -> Result<String> {
        let body = document.to_xml()?;
        let recorded = document.to_redacted_xml()?;
        let mut delays = self.policy.delays();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let started = Instant::now();
            let outcome = self.transport.post_xml(&self.endpoint, body.clone()).await;
            let elapsed = started.elapsed();

            let outcome = match outcome {
                Ok(reply) => {
                    history.push(ExecutionRecord {
                        attempt,
                        request: recorded.clone(),
                        status: Some(reply.status),
                        response: Some(recorded_response(&reply.body)),
                        error: None,
                        elapsed,
                    });
                    if reply.status.is_success() {
                        Ok(reply.body)
                    } else {
                        Err(Error::Http {
                            status_code: reply.status,
                            url: self.endpoint.to_string(),
                            response_body: Some(reply.body),
                            span_trace: SpanTrace::capture(),
                        })
                    }
                }
                Err(e) => {
                    history.push(ExecutionRecord {
                        attempt,
                        request: recorded.clone(),
                        status: None,
                        response: None,
                        error: Some(e.to_string()),
                        elapsed,
                    });
                    Err(e)
                }
            };

            match outcome {
                Ok(body) => {
                    debug!(attempt, ?elapsed, "request succeeded");
                    return Ok(body);
                }
                Err(e) if attempt <= self.policy.max_retries && self.policy.should_retry(&e) => {
                    let wait = delays.next().unwrap_or(MAX_BACKOFF);
                    warn!(
                        "Transient gateway failure (attempt {}/{}), waiting {:?} before retrying: {}",
                        attempt,
                        self.policy.max_retries + 1,
                        wait,
                        e
                    );
                    sleep(wait).await;
                }
                Err(e) => {
                    debug!(attempt, error = %e, "request failed");
                    return Err(e);
                }
            }
        }
    }
}

/// The reply as stored in the history. Issued session ids are replaced;
/// bodies that are not XML are kept as received.
fn recorded_response(body: &str) -> String {
    xml::parse(body)
        .and_then(|root| xml::to_string(&root.redacted(SECRET_ELEMENTS)))
        .unwrap_or_else(|_| body.to_string())
}
