mod test_utils;

use miette::{IntoDiagnostic, Result};
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use intacct_rs::functions::ReadByQuery;
use intacct_rs::handler::RequestHandler;
use intacct_rs::transport::{CONTENT_TYPE, HttpReply};
use intacct_rs::{
    Authentication, Client, ClientConfig, IntacctEndpoint, QueryRequest, RequestConfig,
    ReqwestTransport, Transport,
};
use test_utils::{SESSION_ENDPOINT, do_setup, fast_policy, query_page, session, session_response};

const GATEWAY_PATH: &str = "/ia/xml/xmlgw.phtml";

fn gateway(server: &MockServer) -> Url {
    Url::parse(&format!("{}{GATEWAY_PATH}", server.uri())).expect("valid mock server url")
}

#[tokio::test]
async fn posts_xml_and_returns_status_untouched() -> Result<()> {
    do_setup();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GATEWAY_PATH))
        .and(header("content-type", CONTENT_TYPE))
        .and(body_string_contains("<readByQuery>"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new().into_diagnostic()?;
    let reply = transport
        .post_xml(
            &gateway(&server),
            "<request><readByQuery><object>GLACCOUNT</object></readByQuery></request>".to_string(),
        )
        .await
        .into_diagnostic()?;

    assert_eq!(
        reply,
        HttpReply::with_status(reqwest::StatusCode::BAD_GATEWAY, "Bad Gateway")
    );
    Ok(())
}

#[tokio::test]
async fn handler_retries_server_errors_over_http() -> Result<()> {
    do_setup();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(query_page("readByQuery", &[1], 1, 0, "")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new().into_diagnostic()?;
    let function = ReadByQuery::new("GLACCOUNT");
    let execution = RequestHandler::new(&transport, gateway(&server), fast_policy())
        .execute_synchronous(
            &Authentication::Session(session()),
            &RequestConfig::default(),
            &[&function],
        )
        .await;

    assert_eq!(execution.history().len(), 2);
    let response = execution.into_result().into_diagnostic()?;
    assert!(response.result(0).into_diagnostic()?.is_success());
    Ok(())
}

#[tokio::test]
async fn excluded_server_error_is_not_retried_over_http() {
    do_setup();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(524).set_body_string("A timeout occurred"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new().expect("client builds");
    let function = ReadByQuery::new("GLACCOUNT");
    let (result, history) = RequestHandler::new(&transport, gateway(&server), fast_policy())
        .execute_synchronous(
            &Authentication::Session(session()),
            &RequestConfig::default(),
            &[&function],
        )
        .await
        .into_parts();

    let err = result.unwrap_err();
    assert_eq!(err.status_code().map(|s| s.as_u16()), Some(524));
    assert_eq!(err.response_body(), Some("A timeout occurred"));
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn connects_and_reads_through_the_session_endpoint() -> Result<()> {
    do_setup();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("<getAPISession/>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            session_response("wiremock-session").replace(SESSION_ENDPOINT, gateway(&server).as_str()),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("<sessionid>wiremock-session</sessionid>"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(query_page("readByQuery", &[1, 2], 2, 0, "")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::default()
        .with_sender("testsenderid", "pass123!")
        .with_login("testcompany", "testuser", "testpass")
        .with_endpoint(IntacctEndpoint::parse(gateway(&server).as_str()).into_diagnostic()?)
        .with_retry_policy(fast_policy());
    let client = Client::connect(&config).await.into_result().into_diagnostic()?;

    let result = client
        .read_all_by_query(&QueryRequest::new("GLACCOUNT"))
        .await
        .into_result()
        .into_diagnostic()?;
    assert_eq!(result.len(), 2);
    Ok(())
}
