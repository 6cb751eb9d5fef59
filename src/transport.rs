//! HTTP transports that post request documents to the gateway.

use std::future::Future;
use std::time::Duration;

use reqwest::{StatusCode, header};
use url::Url;

use crate::error::Result;

#[cfg(any(test, feature = "test-util"))]
mod mock;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockTransport;

pub const CONTENT_TYPE: &str = "x-intacct-xml-request";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const USER_AGENT: &str = concat!("intacct-rs/", env!("CARGO_PKG_VERSION"));

/// The raw outcome of one POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_status(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Posts an XML request document and returns whatever came back.
///
/// Implementations must not interpret the status code; retry and error
/// mapping happen in the request handler.
pub trait Transport: Send + Sync {
    fn post_xml(&self, url: &Url, body: String) -> impl Future<Output = Result<HttpReply>> + Send;
}

/// The production transport, backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    #[instrument(skip(self, body), fields(url = %url, bytes = body.len()))]
    async fn post_xml(&self, url: &Url, body: String) -> Result<HttpReply> {
        trace!("posting request document");
        let response = self
            .http
            .post(url.clone())
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .header(header::ACCEPT, "text/xml")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "gateway replied");
        Ok(HttpReply { status, body })
    }
}
