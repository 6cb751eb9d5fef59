use miette::Diagnostic;
use reqwest::StatusCode;
use thiserror::Error;
use tracing_error::SpanTrace;

use crate::xml::Element;

/// One entry of an `<errormessage>` block returned by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorEntry {
    pub error_no: Option<String>,
    pub description: Option<String>,
    pub description2: Option<String>,
    pub correction: Option<String>,
}

impl ErrorEntry {
    /// Builds the entries of an `<errormessage>` element, keeping server order.
    #[must_use]
    pub fn list_from(errormessage: &Element) -> Vec<Self> {
        errormessage
            .children_named("error")
            .map(|error| Self {
                error_no: error.child_text("errorno").map(str::to_string),
                description: error.child_text("description").map(str::to_string),
                description2: error.child_text("description2").map(str::to_string),
                correction: error.child_text("correction").map(str::to_string),
            })
            .collect()
    }

    /// A single line combining the populated fields of this entry.
    #[must_use]
    pub fn summary(&self) -> String {
        [
            self.error_no.as_deref(),
            self.description.as_deref(),
            self.description2.as_deref(),
            self.correction.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

fn summarize(errors: &[ErrorEntry]) -> String {
    if errors.is_empty() {
        return "no error details returned".to_string();
    }
    errors
        .iter()
        .map(ErrorEntry::summary)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur when interacting with the Intacct XML gateway.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("error making request: {source}")]
    #[diagnostic(
        code(intacct_rs::request_error),
        help("Check your network connection and Intacct gateway availability")
    )]
    Request {
        #[source]
        source: reqwest::Error,
        span_trace: SpanTrace,
    },

    /// The gateway answered with a non-success HTTP status.
    #[error("gateway returned HTTP {status_code} (url: {url})")]
    #[diagnostic(
        code(intacct_rs::http_status),
        help("5xx responses are retried unless the status is listed in no_retry_server_error_codes")
    )]
    Http {
        status_code: StatusCode,
        url: String,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    /// The `<control>` block of the response reported a failure.
    #[error("request control failed: {}", summarize(.errors))]
    #[diagnostic(
        code(intacct_rs::control_failure),
        help("Check the sender ID, sender password and DTD version")
    )]
    ControlFailure {
        errors: Vec<ErrorEntry>,
        span_trace: SpanTrace,
    },

    /// The `<authentication>` block of the response reported a failure.
    #[error("authentication failed: {}", summarize(.errors))]
    #[diagnostic(
        code(intacct_rs::authentication_failure),
        help("The session may have expired, or the company/user credentials are wrong")
    )]
    AuthenticationFailure {
        errors: Vec<ErrorEntry>,
        span_trace: SpanTrace,
    },

    /// A function block came back with `status=failure`.
    #[error("{message}: {}", summarize(.errors))]
    #[diagnostic(
        code(intacct_rs::function_failure),
        help("Review the vendor error list returned for this function")
    )]
    FunctionFailure {
        message: String,
        function: String,
        control_id: String,
        errors: Vec<ErrorEntry>,
        span_trace: SpanTrace,
    },

    #[error(
        "Query result totalcount of {total_count} exceeds max_total_count parameter of {max_total_count}"
    )]
    #[diagnostic(
        code(intacct_rs::page_ceiling_exceeded),
        help("Narrow the query filter or raise max_total_count")
    )]
    PageCeilingExceeded {
        total_count: u64,
        max_total_count: u64,
    },

    /// The response did not have the shape the gateway documents.
    #[error("malformed response: {reason}")]
    #[diagnostic(
        code(intacct_rs::malformed_response),
        help("The gateway returned data in an unexpected format")
    )]
    MalformedResponse {
        reason: String,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    #[error("error processing XML: {0}")]
    #[diagnostic(code(intacct_rs::xml_error))]
    Xml(#[from] quick_xml::Error),

    #[error("{0}")]
    #[diagnostic(
        code(intacct_rs::invalid_argument),
        help("Fix the request parameters before sending")
    )]
    InvalidArgument(String),

    #[error("endpoint could not be parsed as a URL")]
    #[diagnostic(
        code(intacct_rs::invalid_endpoint),
        help("Check that the endpoint URL is correctly formatted")
    )]
    InvalidEndpoint,

    #[error("missing configuration: {0}")]
    #[diagnostic(
        code(intacct_rs::missing_config),
        help("Set the INTACCT_* environment variables or fill in ClientConfig")
    )]
    MissingConfig(String),
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Self::Request {
            source,
            span_trace: SpanTrace::capture(),
        }
    }
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
            response_body: None,
            span_trace: SpanTrace::capture(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Attach the raw response body to a malformed response error.
    #[must_use]
    pub(crate) fn with_response_body(self, body: &str) -> Self {
        match self {
            Self::MalformedResponse {
                reason, span_trace, ..
            } => Self::MalformedResponse {
                reason,
                response_body: Some(body.to_string()),
                span_trace,
            },
            other => other,
        }
    }

    /// Returns the span trace captured when this error was created, if any.
    #[must_use]
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::Request { span_trace, .. }
            | Self::Http { span_trace, .. }
            | Self::ControlFailure { span_trace, .. }
            | Self::AuthenticationFailure { span_trace, .. }
            | Self::FunctionFailure { span_trace, .. }
            | Self::MalformedResponse { span_trace, .. } => Some(span_trace),
            _ => None,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status_code, .. } => Some(*status_code),
            Self::Request { source, .. } => source.status(),
            _ => None,
        }
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Http { url, .. } => Some(url),
            Self::Request { source, .. } => source.url().map(url::Url::as_str),
            _ => None,
        }
    }

    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Http { response_body, .. } | Self::MalformedResponse { response_body, .. } => {
                response_body.as_deref()
            }
            _ => None,
        }
    }

    /// The vendor error entries carried by this error. Empty for non-vendor failures.
    #[must_use]
    pub fn errors(&self) -> &[ErrorEntry] {
        match self {
            Self::ControlFailure { errors, .. }
            | Self::AuthenticationFailure { errors, .. }
            | Self::FunctionFailure { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Whether this failure belongs to the retry-eligible class: 5xx statuses
    /// and connect/timeout errors. Vendor failures are never transient.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { status_code, .. } => status_code.is_server_error(),
            Self::Request { source, .. } => {
                source.is_connect()
                    || source.is_timeout()
                    || source.status().is_some_and(|s| s.is_server_error())
            }
            _ => false,
        }
    }

    /// Whether the gateway rejected the request's authentication block.
    #[must_use]
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailure { .. })
    }
}

/// Type alias for results from this crate.
///
/// This is already a Miette diagnostic result due to the implementation of
/// the Diagnostic trait for the Error type.
pub type Result<O> = std::result::Result<O, Error>;
