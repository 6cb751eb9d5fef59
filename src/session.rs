//! Session acquisition through `getAPISession`.

use crate::credentials::{
    Authentication, LoginCredentials, SenderCredentials, SessionCredentials,
};
use crate::endpoints::IntacctEndpoint;
use crate::error::{Error, Result};
use crate::functions::ApiSessionCreate;
use crate::handler::{Execution, RequestHandler, RetryPolicy};
use crate::request::RequestConfig;
use crate::response::SynchronousResponse;
use crate::transport::Transport;
use crate::utils::date_format::parse_session_timestamp;

pub const SESSION_CONTROL_ID: &str = "sessionProvider";

/// Exchanges credentials for a fresh API session.
///
/// Each exchange is one logical call. The default policy retries every 5xx.
#[derive(Debug)]
pub struct SessionProvider<'a, T: Transport> {
    transport: &'a T,
    policy: RetryPolicy,
    location_id: Option<String>,
}

impl<'a, T: Transport> SessionProvider<'a, T> {
    #[must_use]
    pub fn new(transport: &'a T) -> Self {
        Self {
            transport,
            policy: RetryPolicy::session_provider(),
            location_id: None,
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Requests a session scoped to one entity.
    #[must_use]
    pub fn with_location_id(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    #[instrument(skip(self, credentials), fields(company_id = %credentials.company_id(), user_id = %credentials.user_id()))]
    pub async fn from_login_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Execution<SessionCredentials> {
        self.acquire(Authentication::Login(credentials.clone())).await
    }

    #[instrument(skip(self, credentials))]
    pub async fn from_session_credentials(
        &self,
        credentials: &SessionCredentials,
    ) -> Execution<SessionCredentials> {
        self.acquire(Authentication::Session(credentials.clone())).await
    }

    async fn acquire(&self, authentication: Authentication) -> Execution<SessionCredentials> {
        let url = match authentication.endpoint().to_url() {
            Ok(url) => url,
            Err(e) => return Execution::failed(e),
        };
        let config = RequestConfig::default().with_control_id(SESSION_CONTROL_ID);
        let mut function = ApiSessionCreate::new();
        if let Some(location_id) = &self.location_id {
            function = function.with_location_id(location_id.as_str());
        }

        debug!(%url, "requesting API session");
        let execution = RequestHandler::new(self.transport, url, self.policy.clone())
            .execute_synchronous(&authentication, &config, &[&function])
            .await;

        execution.and_then(|response| {
            let session = session_from_response(response, &authentication)?;
            info!(endpoint = %session.endpoint, "API session acquired");
            Ok(session)
        })
    }
}

fn session_from_response(
    response: SynchronousResponse,
    authentication: &Authentication,
) -> Result<SessionCredentials> {
    let authentication_block = response.authentication.clone();
    let result = response
        .into_first_result()?
        .ensure_success("An error occurred trying to get an API session")?;
    let api = result
        .data
        .as_ref()
        .and_then(|data| data.child("api"))
        .ok_or_else(|| Error::malformed("getAPISession result has no api element"))?;

    let session_id = api
        .child_text("sessionid")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::malformed("getAPISession result has no sessionid"))?;
    let endpoint = match api.child_text("endpoint").filter(|e| !e.is_empty()) {
        Some(endpoint) => IntacctEndpoint::parse(endpoint)?,
        None => authentication.endpoint().clone(),
    };
    let session_timestamp = authentication_block
        .session_timestamp
        .as_deref()
        .map(parse_session_timestamp)
        .transpose()
        .map_err(Error::malformed)?;

    let sender: SenderCredentials = authentication.sender().clone();
    Ok(SessionCredentials {
        session_id: session_id.to_string(),
        endpoint,
        sender,
        user_id: authentication_block.user_id,
        company_id: authentication_block.company_id,
        session_timestamp,
    })
}
