//! Client configuration, from code, a config file or `INTACCT_*` environment variables.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::credentials::{Authentication, LoginCredentials, SenderCredentials, SessionCredentials};
use crate::endpoints::IntacctEndpoint;
use crate::error::{Error, Result};
use crate::handler::{
    DEFAULT_BACKOFF_FACTOR_MS, DEFAULT_MAX_RETRIES, DEFAULT_NO_RETRY_SERVER_ERROR_CODES,
    RetryPolicy,
};
use crate::transport::DEFAULT_TIMEOUT;
use crate::utils::serde_helpers::{empty_string_as_none, status_codes};

pub const ENV_SENDER_ID: &str = "INTACCT_SENDER_ID";
pub const ENV_SENDER_PASSWORD: &str = "INTACCT_SENDER_PASSWORD";
pub const ENV_COMPANY_ID: &str = "INTACCT_COMPANY_ID";
pub const ENV_USER_ID: &str = "INTACCT_USER_ID";
pub const ENV_USER_PASSWORD: &str = "INTACCT_USER_PASSWORD";
pub const ENV_SESSION_ID: &str = "INTACCT_SESSION_ID";
pub const ENV_ENDPOINT_URL: &str = "INTACCT_ENDPOINT_URL";

/// Everything needed to open a [`Client`](crate::Client).
///
/// A session ID, when present, is used instead of the login credentials.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(deserialize_with = "empty_string_as_none")]
    pub sender_id: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub sender_password: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub company_id: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub user_password: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub session_id: Option<String>,
    pub endpoint_url: Option<IntacctEndpoint>,
    pub max_retries: u32,
    #[serde(deserialize_with = "status_codes")]
    pub no_retry_server_error_codes: Vec<u16>,
    pub backoff_factor_ms: u64,
    /// Acquire a new session once and resend when a call fails authentication.
    pub reauthenticate: bool,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            sender_id: None,
            sender_password: None,
            company_id: None,
            user_id: None,
            user_password: None,
            session_id: None,
            endpoint_url: None,
            max_retries: DEFAULT_MAX_RETRIES,
            no_retry_server_error_codes: DEFAULT_NO_RETRY_SERVER_ERROR_CODES.to_vec(),
            backoff_factor_ms: DEFAULT_BACKOFF_FACTOR_MS,
            reauthenticate: false,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "[redacted]");
        f.debug_struct("ClientConfig")
            .field("sender_id", &self.sender_id)
            .field("sender_password", &redacted(&self.sender_password))
            .field("company_id", &self.company_id)
            .field("user_id", &self.user_id)
            .field("user_password", &redacted(&self.user_password))
            .field("session_id", &redacted(&self.session_id))
            .field("endpoint_url", &self.endpoint_url)
            .field("max_retries", &self.max_retries)
            .field("no_retry_server_error_codes", &self.no_retry_server_error_codes)
            .field("backoff_factor_ms", &self.backoff_factor_ms)
            .field("reauthenticate", &self.reauthenticate)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Reads the `INTACCT_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let config = Self {
            sender_id: value(ENV_SENDER_ID),
            sender_password: value(ENV_SENDER_PASSWORD),
            company_id: value(ENV_COMPANY_ID),
            user_id: value(ENV_USER_ID),
            user_password: value(ENV_USER_PASSWORD),
            session_id: value(ENV_SESSION_ID),
            endpoint_url: value(ENV_ENDPOINT_URL)
                .map(|url| IntacctEndpoint::parse(&url))
                .transpose()?,
            ..Self::default()
        };
        config.authentication()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_sender(mut self, sender_id: impl Into<String>, sender_password: impl Into<String>) -> Self {
        self.sender_id = Some(sender_id.into());
        self.sender_password = Some(sender_password.into());
        self
    }

    #[must_use]
    pub fn with_login(
        mut self,
        company_id: impl Into<String>,
        user_id: impl Into<String>,
        user_password: impl Into<String>,
    ) -> Self {
        self.company_id = Some(company_id.into());
        self.user_id = Some(user_id.into());
        self.user_password = Some(user_password.into());
        self
    }

    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: IntacctEndpoint) -> Self {
        self.endpoint_url = Some(endpoint);
        self
    }

    #[must_use]
    pub fn with_reauthenticate(mut self, reauthenticate: bool) -> Self {
        self.reauthenticate = reauthenticate;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.max_retries = policy.max_retries;
        self.no_retry_server_error_codes = policy.no_retry_server_error_codes;
        self.backoff_factor_ms = policy.backoff_factor_ms;
        self
    }

    pub fn sender(&self) -> Result<SenderCredentials> {
        let sender_id = required(self.sender_id.as_ref(), "sender_id", ENV_SENDER_ID)?;
        let sender_password =
            required(self.sender_password.as_ref(), "sender_password", ENV_SENDER_PASSWORD)?;
        let sender = SenderCredentials::new(sender_id, sender_password);
        Ok(match &self.endpoint_url {
            Some(endpoint) => sender.with_endpoint(endpoint.clone()),
            None => sender,
        })
    }

    /// Login credentials, when any of company, user or password is configured.
    pub fn login_credentials(&self) -> Result<Option<LoginCredentials>> {
        if self.company_id.is_none() && self.user_id.is_none() && self.user_password.is_none() {
            return Ok(None);
        }
        Ok(Some(LoginCredentials::new(
            required(self.company_id.as_ref(), "company_id", ENV_COMPANY_ID)?,
            required(self.user_id.as_ref(), "user_id", ENV_USER_ID)?,
            required(self.user_password.as_ref(), "user_password", ENV_USER_PASSWORD)?,
            self.sender()?,
        )))
    }

    /// The credentials used for the initial session exchange.
    pub fn authentication(&self) -> Result<Authentication> {
        let sender = self.sender()?;
        if let Some(session_id) = &self.session_id {
            return Ok(Authentication::Session(SessionCredentials::new(
                session_id.as_str(),
                sender,
            )));
        }
        match self.login_credentials()? {
            Some(login) => Ok(Authentication::Login(login)),
            None => Err(Error::MissingConfig(format!(
                "either session_id ({ENV_SESSION_ID}) or company_id, user_id and user_password are required"
            ))),
        }
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(self.max_retries)
            .with_no_retry_server_error_codes(self.no_retry_server_error_codes.clone())
            .with_backoff_factor_ms(self.backoff_factor_ms)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn required<'a>(value: Option<&'a String>, field: &str, env: &str) -> Result<&'a str> {
    value
        .map(String::as_str)
        .ok_or_else(|| Error::MissingConfig(format!("{field} ({env})")))
}
