//! Sentry integration for intacct-rs errors.
//!
//! Only available with the `sentry` feature:
//!
//! ```toml
//! [dependencies]
//! intacct-rs = { version = "0.1", features = ["sentry"] }
//! ```
//!
//! Span traces are captured when errors are created inside instrumented
//! spans, so install `tracing_error::ErrorLayer` alongside the Sentry
//! tracing layer:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//! use tracing_error::ErrorLayer;
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ErrorLayer::default())
//!     .with(sentry::integrations::tracing::layer())
//!     .init();
//! ```

use std::collections::BTreeMap;

use sentry_core::{Breadcrumb, protocol::Value};

use crate::error::{Error, ErrorEntry};

const RESPONSE_BODY_PREVIEW: usize = 500;

fn error_list(errors: &[ErrorEntry]) -> Value {
    Value::from(
        errors
            .iter()
            .map(|entry| Value::from(entry.summary()))
            .collect::<Vec<_>>(),
    )
}

impl<'a> From<&'a Error> for Breadcrumb {
    fn from(error: &'a Error) -> Self {
        let mut data = BTreeMap::new();
        let category = match error {
            Error::Request { .. } => "http.request",
            Error::Http {
                status_code, url, ..
            } => {
                data.insert("status_code".to_string(), Value::from(status_code.as_u16()));
                data.insert("url".to_string(), Value::from(url.clone()));
                "http.response"
            }
            Error::ControlFailure { errors, .. } => {
                data.insert("errors".to_string(), error_list(errors));
                "intacct.control"
            }
            Error::AuthenticationFailure { errors, .. } => {
                data.insert("errors".to_string(), error_list(errors));
                "auth"
            }
            Error::FunctionFailure {
                function,
                control_id,
                errors,
                ..
            } => {
                data.insert("function".to_string(), Value::from(function.clone()));
                data.insert("control_id".to_string(), Value::from(control_id.clone()));
                data.insert("errors".to_string(), error_list(errors));
                "intacct.function"
            }
            Error::PageCeilingExceeded {
                total_count,
                max_total_count,
            } => {
                data.insert("total_count".to_string(), Value::from(*total_count));
                data.insert("max_total_count".to_string(), Value::from(*max_total_count));
                "intacct.query"
            }
            Error::MalformedResponse { .. } | Error::Xml(_) => "intacct.response",
            Error::InvalidArgument(_) => "intacct.validation",
            Error::InvalidEndpoint | Error::MissingConfig(_) => "intacct.config",
        };

        Breadcrumb {
            ty: "error".to_string(),
            category: Some(category.to_string()),
            message: Some(error.to_string()),
            data,
            level: sentry_core::Level::Error,
            ..Default::default()
        }
    }
}

/// Extra context for a Sentry event, keyed `intacct.*`.
///
/// ```ignore
/// use sentry::configure_scope;
/// use intacct_rs::sentry_integration::error_to_sentry_context;
///
/// if let Err(e) = client.read_all_by_query(&request).await.into_result() {
///     configure_scope(|scope| {
///         for (key, value) in error_to_sentry_context(&e) {
///             scope.set_extra(&key, value);
///         }
///     });
/// }
/// ```
pub fn error_to_sentry_context(error: &Error) -> BTreeMap<String, Value> {
    let mut context = BTreeMap::new();

    if let Some(span_trace) = error.span_trace() {
        context.insert(
            "intacct.span_trace".to_string(),
            Value::from(format!("{span_trace}")),
        );
    }
    if let Some(url) = error.url() {
        context.insert("intacct.url".to_string(), Value::from(url.to_string()));
    }
    if let Some(status) = error.status_code() {
        context.insert("intacct.status_code".to_string(), Value::from(status.as_u16()));
    }
    if let Some(body) = error.response_body() {
        let preview = match body.char_indices().nth(RESPONSE_BODY_PREVIEW) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        context.insert("intacct.response_body".to_string(), Value::from(preview));
    }
    if !error.errors().is_empty() {
        context.insert("intacct.errors".to_string(), error_list(error.errors()));
    }

    context
}

#[cfg(test)]
mod tests {
    use tracing_error::SpanTrace;

    use super::*;

    #[test]
    fn function_failure_breadcrumb() {
        let error = Error::FunctionFailure {
            message: "An error occurred trying to read more records".to_string(),
            function: "readMore".to_string(),
            control_id: "readMore".to_string(),
            errors: vec![ErrorEntry {
                error_no: Some("readMore failed".to_string()),
                ..ErrorEntry::default()
            }],
            span_trace: SpanTrace::capture(),
        };

        let crumb = Breadcrumb::from(&error);
        assert_eq!(crumb.category.as_deref(), Some("intacct.function"));
        assert_eq!(crumb.data.get("function"), Some(&Value::from("readMore")));

        let context = error_to_sentry_context(&error);
        assert!(context.contains_key("intacct.errors"));
        assert!(context.contains_key("intacct.span_trace"));
    }
}
