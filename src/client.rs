use std::future::Future;

use tokio::sync::RwLock;

use crate::config::ClientConfig;
use crate::credentials::{Authentication, LoginCredentials, SessionCredentials};
use crate::entities::Record;
use crate::error::Result;
use crate::functions::{
    Create, Delete, Function, Read, ReadByName, ReadByQuery, ReadMore, ReadReport, Update,
    UserPermissionsRead,
};
use crate::handler::{Execution, ExecutionHistory, RequestHandler, RetryPolicy};
use crate::query::{Paginator, QueryRequest, QueryResult, ReportRequest};
use crate::request::RequestConfig;
use crate::response::{AsynchronousResponse, FunctionResult, Page, SynchronousResponse};
use crate::session::SessionProvider;
use crate::transport::{ReqwestTransport, Transport};

const READ_MESSAGE: &str = "An error occurred trying to read records";
const READ_BY_NAME_MESSAGE: &str = "An error occurred trying to read records by name";
const READ_QUERY_MESSAGE: &str = "An error occurred trying to read query records";
const READ_MORE_MESSAGE: &str = "An error occurred trying to read more records";
const READ_REPORT_MESSAGE: &str = "An error occurred trying to read report records";
const CREATE_MESSAGE: &str = "An error occurred trying to create records";
const UPDATE_MESSAGE: &str = "An error occurred trying to update records";
const DELETE_MESSAGE: &str = "An error occurred trying to delete records";
const USER_PERMISSIONS_MESSAGE: &str = "An error occurred trying to get user permissions";

/// A connected client. It holds the current API session and sends every
/// call through a [`Transport`], one round trip at a time.
///
/// Every operation returns an [`Execution`]: the outcome plus the history
/// of the HTTP attempts it made.
#[derive(Debug)]
pub struct Client<T: Transport = ReqwestTransport> {
    transport: T,
    session: RwLock<SessionCredentials>,
    login: Option<LoginCredentials>,
    policy: RetryPolicy,
    reauthenticate: bool,
}

impl Client<ReqwestTransport> {
    /// Opens a session over HTTPS using `config`.
    #[instrument(skip(config))]
    pub async fn connect(config: &ClientConfig) -> Execution<Self> {
        match ReqwestTransport::with_timeout(config.timeout()) {
            Ok(transport) => Self::connect_with(config, transport).await,
            Err(e) => Execution::failed(e),
        }
    }
}

impl<T: Transport> Client<T> {
    /// Opens a session over a caller-supplied transport.
    #[instrument(skip(config, transport))]
    pub async fn connect_with(config: &ClientConfig, transport: T) -> Execution<Self> {
        let authentication = match config.authentication() {
            Ok(authentication) => authentication,
            Err(e) => return Execution::failed(e),
        };
        let login = match &authentication {
            Authentication::Login(login) => Some(login.clone()),
            Authentication::Session(_) => None,
        };
        let policy = config.retry_policy();
        let session_policy = RetryPolicy::session_provider()
            .with_max_retries(policy.max_retries)
            .with_backoff_factor_ms(policy.backoff_factor_ms);

        let (session, history) = {
            let provider = SessionProvider::new(&transport).with_retry_policy(session_policy);
            let execution = match &authentication {
                Authentication::Login(login) => provider.from_login_credentials(login).await,
                Authentication::Session(session) => {
                    provider.from_session_credentials(session).await
                }
            };
            execution.into_parts()
        };

        let client = session.map(|session| Self {
            transport,
            session: RwLock::new(session),
            login,
            policy,
            reauthenticate: config.reauthenticate,
        });
        Execution::new(client, history)
    }

    /// Wraps an already acquired session without another exchange.
    #[must_use]
    pub fn from_session(session: SessionCredentials, transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            session: RwLock::new(session),
            login: None,
            policy,
            reauthenticate: false,
        }
    }

    #[must_use]
    pub fn with_reauthenticate(mut self, reauthenticate: bool) -> Self {
        self.reauthenticate = reauthenticate;
        self
    }

    /// A copy of the session currently used for calls.
    pub async fn session(&self) -> SessionCredentials {
        self.session.read().await.clone()
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Sends `content` as one synchronous request.
    #[instrument(skip(self, content), fields(control_id = %config.control_id))]
    pub async fn execute(
        &self,
        content: &[&dyn Function],
        config: &RequestConfig,
    ) -> Execution<SynchronousResponse> {
        self.with_reauthentication(|session| async move {
            let url = match session.endpoint().to_url() {
                Ok(url) => url,
                Err(e) => return Execution::failed(e),
            };
            let authentication = Authentication::Session(session);
            RequestHandler::new(&self.transport, url, self.policy.clone())
                .execute_synchronous(&authentication, config, content)
                .await
        })
        .await
    }

    /// Queues `content` under an asynchronous policy. The gateway only acknowledges receipt.
    #[instrument(skip(self, content, config))]
    pub async fn execute_async(
        &self,
        content: &[&dyn Function],
        policy_id: &str,
        config: &RequestConfig,
    ) -> Execution<AsynchronousResponse> {
        let config = config.clone().with_policy_id(policy_id);
        let config = &config;
        self.with_reauthentication(|session| async move {
            let url = match session.endpoint().to_url() {
                Ok(url) => url,
                Err(e) => return Execution::failed(e),
            };
            let authentication = Authentication::Session(session);
            RequestHandler::new(&self.transport, url, self.policy.clone())
                .execute_asynchronous(&authentication, config, content)
                .await
        })
        .await
    }

    /// Runs `call` with the current session. When re-authentication is on and
    /// the gateway rejects the session, a new one is acquired once and `call`
    /// is repeated with it.
    async fn with_reauthentication<R, F, Fut>(&self, call: F) -> Execution<R>
    where
        F: Fn(SessionCredentials) -> Fut,
        Fut: Future<Output = Execution<R>>,
    {
        let session = self.session().await;
        let execution = call(session.clone()).await;
        let rejected = matches!(&execution.result, Err(e) if e.is_authentication_failure());
        if !self.reauthenticate || !rejected {
            return execution;
        }

        warn!("session was rejected, acquiring a new one");
        let (original, mut history) = execution.into_parts();
        let (renewed, renewal_history) = self.renew_session(&session).await.into_parts();
        history.extend(renewal_history);

        match renewed {
            Ok(renewed) => {
                *self.session.write().await = renewed.clone();
                let retried = call(renewed).await;
                history.extend(retried.history);
                Execution::new(retried.result, history)
            }
            Err(e) => {
                error!(error = %e, "could not acquire a new session");
                Execution::new(original, history)
            }
        }
    }

    async fn renew_session(&self, session: &SessionCredentials) -> Execution<SessionCredentials> {
        let provider = SessionProvider::new(&self.transport).with_retry_policy(
            RetryPolicy::session_provider()
                .with_max_retries(self.policy.max_retries)
                .with_backoff_factor_ms(self.policy.backoff_factor_ms),
        );
        match &self.login {
            Some(login) => provider.from_login_credentials(login).await,
            None => provider.from_session_credentials(session).await,
        }
    }

    /// Sends a single function and returns its result, failing with `message` if it failed.
    async fn execute_one(&self, function: &dyn Function, message: &str) -> Execution<FunctionResult> {
        self.execute(&[function], &RequestConfig::default())
            .await
            .and_then(|response| response.into_first_result()?.ensure_success(message))
    }

    async fn page(
        &self,
        function: &dyn Function,
        message: &str,
        history: &mut ExecutionHistory,
    ) -> Result<Page> {
        let (result, attempts) = self.execute_one(function, message).await.into_parts();
        history.extend(attempts);
        result?.page()
    }

    #[instrument(skip(self))]
    pub async fn read(&self, function: Read) -> Execution<Vec<Record>> {
        self.execute_one(&function, READ_MESSAGE)
            .await
            .map(|result| result.records())
    }

    #[instrument(skip(self))]
    pub async fn read_by_name(&self, function: ReadByName) -> Execution<Vec<Record>> {
        self.execute_one(&function, READ_BY_NAME_MESSAGE)
            .await
            .map(|result| result.records())
    }

    /// The first page of a query. See [`Client::read_all_by_query`] to read every page.
    #[instrument(skip(self))]
    pub async fn read_by_query(&self, function: ReadByQuery) -> Execution<Page> {
        self.execute_one(&function, READ_QUERY_MESSAGE)
            .await
            .and_then(|result| result.page())
    }

    #[instrument(skip(self))]
    pub async fn read_more(&self, function: ReadMore) -> Execution<Page> {
        self.execute_one(&function, READ_MORE_MESSAGE)
            .await
            .and_then(|result| result.page())
    }

    #[instrument(skip(self))]
    pub async fn read_report(&self, function: ReadReport) -> Execution<Page> {
        self.execute_one(&function, READ_REPORT_MESSAGE)
            .await
            .and_then(|result| result.page())
    }

    /// Creates records and returns the keys the gateway assigned.
    #[instrument(skip(self))]
    pub async fn create(&self, function: Create) -> Execution<Vec<Record>> {
        self.execute_one(&function, CREATE_MESSAGE)
            .await
            .map(|result| result.records())
    }

    #[instrument(skip(self))]
    pub async fn update(&self, function: Update) -> Execution<Vec<Record>> {
        self.execute_one(&function, UPDATE_MESSAGE)
            .await
            .map(|result| result.records())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, function: Delete) -> Execution<FunctionResult> {
        self.execute_one(&function, DELETE_MESSAGE).await
    }

    #[instrument(skip(self))]
    pub async fn get_user_permissions(
        &self,
        function: UserPermissionsRead,
    ) -> Execution<FunctionResult> {
        self.execute_one(&function, USER_PERMISSIONS_MESSAGE).await
    }

    /// Reads every record a query matches: `readByQuery`, then `readMore`
    /// until no rows remain.
    ///
    /// Fails with [`Error::PageCeilingExceeded`](crate::Error::PageCeilingExceeded)
    /// before any `readMore` when the first page reports more rows than
    /// `max_total_count`.
    #[instrument(skip(self, request), fields(object = %request.object, page_size = request.page_size))]
    pub async fn read_all_by_query(&self, request: &QueryRequest) -> Execution<QueryResult> {
        let mut history = ExecutionHistory::new();
        let result: Result<QueryResult> = async {
            let (mut paginator, mut next) = match &request.resume_from {
                Some(cursor) => (
                    Paginator::new(cursor.clone(), request.max_total_count),
                    Some(cursor.clone()),
                ),
                None => {
                    let mut paginator = Paginator::for_query(request.max_total_count);
                    let page = self
                        .page(&request.to_function(), READ_QUERY_MESSAGE, &mut history)
                        .await?;
                    let next = paginator.accept(page)?;
                    (paginator, next)
                }
            };

            while let Some(cursor) = next {
                let page = self
                    .page(&cursor.to_read_more(), READ_MORE_MESSAGE, &mut history)
                    .await?;
                next = paginator.accept(page)?;
            }
            Ok(paginator.finish())
        }
        .await;

        if let Ok(result) = &result {
            info!(
                records = result.len(),
                pages = result.pages,
                "query read to completion"
            );
        }
        Execution::new(result, history)
    }

    /// Runs a report and reads every page of it.
    #[instrument(skip(self, request), fields(report = %request.report))]
    pub async fn read_all_report_records(&self, request: &ReportRequest) -> Execution<QueryResult> {
        let mut history = ExecutionHistory::new();
        let result: Result<QueryResult> = async {
            let mut paginator = Paginator::for_report(request.max_total_count);
            let page = self
                .page(&request.to_function(), READ_REPORT_MESSAGE, &mut history)
                .await?;
            let mut next = paginator.accept(page)?;

            while let Some(cursor) = next {
                let page = self
                    .page(&cursor.to_read_more(), READ_MORE_MESSAGE, &mut history)
                    .await?;
                next = paginator.accept(page)?;
            }
            Ok(paginator.finish())
        }
        .await;

        if let Ok(result) = &result {
            info!(records = result.len(), pages = result.pages, "report read to completion");
        }
        Execution::new(result, history)
    }
}
