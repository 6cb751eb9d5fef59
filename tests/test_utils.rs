use std::sync::Once;

use tracing::info;

use intacct_rs::{
    Client, IntacctEndpoint, MockTransport, RetryPolicy, SenderCredentials, SessionCredentials,
};

pub const SESSION_ENDPOINT: &str = "https://p1.intacct.com/ia/xml/xmlgw.phtml";

/// A successful `getAPISession` response bound to [`SESSION_ENDPOINT`].
#[allow(dead_code)]
pub fn session_response(session_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
    <control>
        <status>success</status>
        <senderid>testsenderid</senderid>
        <controlid>sessionProvider</controlid>
        <uniqueid>false</uniqueid>
        <dtdversion>3.0</dtdversion>
    </control>
    <operation>
        <authentication>
            <status>success</status>
            <userid>testuser</userid>
            <companyid>testcompany</companyid>
            <sessiontimestamp>2015-12-06T15:57:08-08:00</sessiontimestamp>
        </authentication>
        <result>
            <status>success</status>
            <function>getAPISession</function>
            <controlid>sessionProvider</controlid>
            <data>
                <api>
                    <sessionid>{session_id}</sessionid>
                    <endpoint>{SESSION_ENDPOINT}</endpoint>
                </api>
            </data>
        </result>
    </operation>
</response>"#
    )
}

/// A page of `glaccount` records with the given `RECORDNO` values.
#[allow(dead_code)]
pub fn query_page(
    function: &str,
    ids: &[u32],
    total_count: u64,
    num_remaining: u64,
    result_id: &str,
) -> String {
    let records: String = ids
        .iter()
        .map(|id| format!("<glaccount><RECORDNO>{id}</RECORDNO></glaccount>"))
        .collect();
    let data = format!(
        r#"<data listtype="glaccount" count="{}" totalcount="{total_count}" numremaining="{num_remaining}" resultId="{result_id}">{records}</data>"#,
        ids.len()
    );
    result_response("success", function, &data)
}

/// A failed function result carrying one vendor error.
#[allow(dead_code)]
pub fn function_failure(function: &str, error_no: &str, description2: &str) -> String {
    let errors = format!(
        "<errormessage><error><errorno>{error_no}</errorno><description></description><description2>{description2}</description2><correction></correction></error></errormessage>"
    );
    result_response("failure", function, &errors)
}

/// A response whose authentication block failed.
#[allow(dead_code)]
pub fn authentication_failure() -> String {
    r"<response>
    <control><status>success</status></control>
    <operation>
        <authentication><status>failure</status></authentication>
        <errormessage><error><errorno>XL03000006</errorno><description>Invalid session</description></error></errormessage>
    </operation>
</response>"
        .to_string()
}

fn result_response(status: &str, function: &str, content: &str) -> String {
    format!(
        r"<response>
    <control><status>success</status></control>
    <operation>
        <authentication><status>success</status></authentication>
        <result>
            <status>{status}</status>
            <function>{function}</function>
            <controlid>{function}</controlid>
            {content}
        </result>
    </operation>
</response>"
    )
}

#[allow(dead_code)]
pub fn sender() -> SenderCredentials {
    SenderCredentials::new("testsenderid", "pass123!")
}

#[allow(dead_code)]
pub fn session() -> SessionCredentials {
    SessionCredentials::new("testSeSsionID..", sender())
        .with_endpoint(IntacctEndpoint::parse(SESSION_ENDPOINT).expect("valid endpoint"))
}

/// No backoff, so retry tests run instantly.
#[allow(dead_code)]
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::default().with_backoff_factor_ms(0)
}

/// A client over `transport` with an already acquired session.
#[allow(dead_code)]
pub fn mock_client(transport: &MockTransport) -> Client<MockTransport> {
    info!("Creating mock client");
    Client::from_session(session(), transport.clone(), fast_policy())
}

static LOGGING_CONFIGURED: Once = Once::new();

/// Setup before test runs
pub fn do_setup() {
    LOGGING_CONFIGURED.call_once(|| tracing_subscriber::fmt().with_test_writer().init());
    info!("Setting up test environment");
}
