//! Sender, login and session credentials.
//!
//! None of these types print their secrets through `Debug`.

use std::fmt;

use time::OffsetDateTime;

use crate::endpoints::IntacctEndpoint;

/// Web services sender ID and password, sent in the `<control>` block of every request.
#[derive(Clone)]
pub struct SenderCredentials {
    pub(crate) sender_id: String,
    pub(crate) sender_password: String,
    pub(crate) endpoint: IntacctEndpoint,
}

impl SenderCredentials {
    #[must_use]
    pub fn new(sender_id: impl Into<String>, sender_password: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            sender_password: sender_password.into(),
            endpoint: IntacctEndpoint::Default,
        }
    }

    /// Posts to a gateway other than the default one.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: IntacctEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    #[must_use]
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    #[must_use]
    pub fn endpoint(&self) -> &IntacctEndpoint {
        &self.endpoint
    }
}

impl fmt::Debug for SenderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderCredentials")
            .field("sender_id", &self.sender_id)
            .field("sender_password", &"[redacted]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Company user credentials, exchanged for a session.
#[derive(Clone)]
pub struct LoginCredentials {
    pub(crate) company_id: String,
    pub(crate) user_id: String,
    pub(crate) user_password: String,
    pub(crate) sender: SenderCredentials,
}

impl LoginCredentials {
    #[must_use]
    pub fn new(
        company_id: impl Into<String>,
        user_id: impl Into<String>,
        user_password: impl Into<String>,
        sender: SenderCredentials,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            user_id: user_id.into(),
            user_password: user_password.into(),
            sender,
        }
    }

    #[must_use]
    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn sender(&self) -> &SenderCredentials {
        &self.sender
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("company_id", &self.company_id)
            .field("user_id", &self.user_id)
            .field("user_password", &"[redacted]")
            .field("sender", &self.sender)
            .finish()
    }
}

/// An API session and the endpoint it is bound to.
#[derive(Clone)]
pub struct SessionCredentials {
    pub(crate) session_id: String,
    pub(crate) endpoint: IntacctEndpoint,
    pub(crate) sender: SenderCredentials,
    pub(crate) user_id: Option<String>,
    pub(crate) company_id: Option<String>,
    pub(crate) session_timestamp: Option<OffsetDateTime>,
}

impl SessionCredentials {
    /// Wraps an existing session ID. The sender's endpoint is used until a
    /// session exchange reports the session's own endpoint.
    #[must_use]
    pub fn new(session_id: impl Into<String>, sender: SenderCredentials) -> Self {
        Self {
            session_id: session_id.into(),
            endpoint: sender.endpoint.clone(),
            sender,
            user_id: None,
            company_id: None,
            session_timestamp: None,
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: IntacctEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn endpoint(&self) -> &IntacctEndpoint {
        &self.endpoint
    }

    #[must_use]
    pub fn sender(&self) -> &SenderCredentials {
        &self.sender
    }

    /// User the session belongs to, as reported by the gateway.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn company_id(&self) -> Option<&str> {
        self.company_id.as_deref()
    }

    #[must_use]
    pub fn session_timestamp(&self) -> Option<OffsetDateTime> {
        self.session_timestamp
    }
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("session_id", &"[redacted]")
            .field("endpoint", &self.endpoint)
            .field("sender", &self.sender)
            .field("user_id", &self.user_id)
            .field("company_id", &self.company_id)
            .field("session_timestamp", &self.session_timestamp)
            .finish()
    }
}

/// How the `<authentication>` block of a request is filled in.
#[derive(Debug, Clone)]
pub enum Authentication {
    Login(LoginCredentials),
    Session(SessionCredentials),
}

impl Authentication {
    #[must_use]
    pub fn sender(&self) -> &SenderCredentials {
        match self {
            Self::Login(login) => &login.sender,
            Self::Session(session) => &session.sender,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &IntacctEndpoint {
        match self {
            Self::Login(login) => &login.sender.endpoint,
            Self::Session(session) => &session.endpoint,
        }
    }
}
