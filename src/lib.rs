//! # intacct-rs
//!
//! A Rust client library for the Sage Intacct XML gateway.
//!
//! Requests are built from [`functions`] (and the typed builders in
//! [`entities`]), posted through a [`transport::Transport`] by the
//! [`handler::RequestHandler`], and parsed into [`response`] types. A
//! [`Client`] ties these together with a session obtained from the
//! [`session::SessionProvider`].
//!
//! ```ignore
//! use intacct_rs::{Client, ClientConfig, QueryRequest};
//!
//! let config = ClientConfig::from_env()?;
//! let client = Client::connect(&config).await.into_result()?;
//!
//! let execution = client
//!     .read_all_by_query(&QueryRequest::new("GLACCOUNT").with_fields(["RECORDNO", "TITLE"]))
//!     .await;
//! for attempt in execution.history().iter() {
//!     println!("attempt {} -> {:?}", attempt.attempt, attempt.status);
//! }
//! let accounts = execution.into_result()?;
//! ```
//!
//! ## Sentry Integration
//!
//! Errors carry span traces captured where they were created. Install
//! `tracing_error::ErrorLayer` to populate them, and enable the `sentry`
//! feature for breadcrumb and context conversions:
//!
//! ```toml
//! [dependencies]
//! intacct-rs = { version = "0.1", features = ["sentry"] }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate tracing;

pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod entities;
pub mod error;
pub mod functions;
pub mod handler;
pub mod query;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;
pub mod utils;
pub mod xml;

#[cfg(feature = "sentry")]
pub mod sentry_integration;

pub use client::Client;
pub use config::ClientConfig;
pub use credentials::{Authentication, LoginCredentials, SenderCredentials, SessionCredentials};
pub use endpoints::IntacctEndpoint;
pub use entities::{Record, Value};
pub use error::{Error, ErrorEntry, Result};
pub use handler::{Execution, ExecutionHistory, ExecutionRecord, RetryPolicy};
pub use query::{Cursor, QueryRequest, QueryResult, ReportRequest};
pub use request::RequestConfig;
pub use response::{AsynchronousResponse, FunctionResult, Page, SynchronousResponse};
pub use session::SessionProvider;
pub use transport::{ReqwestTransport, Transport};
#[cfg(any(test, feature = "test-util"))]
pub use transport::MockTransport;

// Re-export SpanTrace for users who want to access it
pub use tracing_error::SpanTrace;
