//! Typed views over response documents.
//!
//! Parsing checks the `<control>` block first, then (for synchronous
//! responses) the `<authentication>` block. Failures in either become typed
//! errors here; per-function failures are left on the [`FunctionResult`] so
//! callers decide which message to report.

use tracing_error::SpanTrace;

use crate::entities::Record;
use crate::error::{Error, ErrorEntry, Result};
use crate::xml::{self, Element};

const SUCCESS: &str = "success";

fn required_text<'a>(element: &'a Element, name: &str, block: &str) -> Result<&'a str> {
    element
        .child_text(name)
        .ok_or_else(|| Error::malformed(format!("{block} block is missing {name} element")))
}

fn required_child<'a>(element: &'a Element, name: &str, block: &str) -> Result<&'a Element> {
    element
        .child(name)
        .ok_or_else(|| Error::malformed(format!("{block} block is missing {name} element")))
}

fn root(body: &str) -> Result<Element> {
    let root = xml::parse(body)?;
    if root.name != "response" {
        return Err(Error::malformed(format!(
            "expected a <response> document, found <{}>",
            root.name
        )));
    }
    Ok(root)
}

/// The echoed `<control>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub status: String,
    pub sender_id: Option<String>,
    pub control_id: Option<String>,
    pub unique_id: Option<String>,
    pub dtd_version: Option<String>,
}

impl Control {
    fn parse(response: &Element) -> Result<Self> {
        let control = required_child(response, "control", "Response")?;
        let status = required_text(control, "status", "Control")?.to_string();
        let text = |name: &str| control.child_text(name).map(str::to_string);
        let control_block = Self {
            status,
            sender_id: text("senderid"),
            control_id: text("controlid"),
            unique_id: text("uniqueid"),
            dtd_version: text("dtdversion"),
        };

        if !control_block.is_success() {
            let errors = response
                .child("errormessage")
                .map(ErrorEntry::list_from)
                .unwrap_or_default();
            error!(errors = ?errors, "request control block failed");
            return Err(Error::ControlFailure {
                errors,
                span_trace: SpanTrace::capture(),
            });
        }
        Ok(control_block)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }
}

/// The `<authentication>` block of a synchronous response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationBlock {
    pub status: String,
    pub user_id: Option<String>,
    pub company_id: Option<String>,
    pub location_id: Option<String>,
    pub session_timestamp: Option<String>,
}

impl AuthenticationBlock {
    fn parse(operation: &Element) -> Result<Self> {
        let authentication = required_child(operation, "authentication", "Operation")?;
        let status = required_text(authentication, "status", "Authentication")?.to_string();
        let text = |name: &str| authentication.child_text(name).map(str::to_string);
        let block = Self {
            status,
            user_id: text("userid"),
            company_id: text("companyid"),
            location_id: text("locationid"),
            session_timestamp: text("sessiontimestamp"),
        };

        if block.status != SUCCESS {
            let errors = operation
                .child("errormessage")
                .map(ErrorEntry::list_from)
                .unwrap_or_default();
            error!(errors = ?errors, "authentication failed");
            return Err(Error::AuthenticationFailure {
                errors,
                span_trace: SpanTrace::capture(),
            });
        }
        Ok(block)
    }
}

/// One `<result>` of a synchronous response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionResult {
    pub status: String,
    pub function: String,
    pub control_id: String,
    pub data: Option<Element>,
    pub errors: Vec<ErrorEntry>,
}

impl FunctionResult {
    fn parse(result: &Element) -> Result<Self> {
        Ok(Self {
            status: required_text(result, "status", "Result")?.to_string(),
            function: required_text(result, "function", "Result")?.to_string(),
            control_id: required_text(result, "controlid", "Result")?.to_string(),
            data: result.child("data").cloned(),
            errors: result
                .child("errormessage")
                .map(ErrorEntry::list_from)
                .unwrap_or_default(),
        })
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }

    /// Turns a failed result into [`Error::FunctionFailure`] with `message`
    /// as its headline, e.g. "An error occurred trying to read records".
    pub fn ensure_success(self, message: &str) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        error!(
            function = %self.function,
            control_id = %self.control_id,
            errors = ?self.errors,
            "{message}"
        );
        Err(Error::FunctionFailure {
            message: message.to_string(),
            function: self.function,
            control_id: self.control_id,
            errors: self.errors,
            span_trace: SpanTrace::capture(),
        })
    }

    fn data(&self) -> Result<&Element> {
        self.data.as_ref().ok_or_else(|| {
            Error::malformed(format!("result of {} has no data element", self.function))
        })
    }

    /// Every child of `<data>` as a record. Missing data reads as no records.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.data
            .iter()
            .flat_map(|data| data.children.iter().map(Record::from_element))
            .collect()
    }

    /// The paging view of `<data>` for `readByQuery`, `readReport` and `readMore`.
    pub fn page(&self) -> Result<Page> {
        Page::from_data(self.data()?)
    }
}

/// One page of a paged read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<Record>,
    pub count: u64,
    pub total_count: u64,
    pub num_remaining: u64,
    /// `resultId` for queries, `reportId` for reports.
    pub cursor: Option<String>,
    pub list_type: Option<String>,
}

impl Page {
    fn from_data(data: &Element) -> Result<Self> {
        let number = |name: &str| -> Result<u64> {
            let raw = data
                .attr(name)
                .ok_or_else(|| Error::malformed(format!("data element is missing {name} attribute")))?;
            raw.trim().parse::<u64>().map_err(|e| {
                Error::malformed(format!("data attribute {name} is not a count ({raw}): {e}"))
            })
        };

        Ok(Self {
            count: number("count")?,
            total_count: number("totalcount")?,
            num_remaining: number("numremaining")?,
            cursor: data
                .attr("resultId")
                .or_else(|| data.attr("reportId"))
                .filter(|cursor| !cursor.is_empty())
                .map(str::to_string),
            list_type: data.attr("listtype").map(str::to_string),
            records: data.children.iter().map(Record::from_element).collect(),
        })
    }
}

/// A parsed synchronous response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynchronousResponse {
    pub control: Control,
    pub authentication: AuthenticationBlock,
    pub results: Vec<FunctionResult>,
}

impl SynchronousResponse {
    pub fn parse(body: &str) -> Result<Self> {
        Self::parse_inner(body).map_err(|e| e.with_response_body(body))
    }

    fn parse_inner(body: &str) -> Result<Self> {
        let response = root(body)?;
        let control = Control::parse(&response)?;
        let operation = required_child(&response, "operation", "Response")?;
        let authentication = AuthenticationBlock::parse(operation)?;
        let results = operation
            .children_named("result")
            .map(FunctionResult::parse)
            .collect::<Result<Vec<_>>>()?;
        if results.is_empty() {
            return Err(Error::malformed("Operation block has no result elements"));
        }

        Ok(Self {
            control,
            authentication,
            results,
        })
    }

    /// The result at `index`, in request order.
    pub fn result(&self, index: usize) -> Result<&FunctionResult> {
        self.results
            .get(index)
            .ok_or_else(|| Error::malformed(format!("response has no result at index {index}")))
    }

    /// Takes ownership of the first result.
    pub fn into_first_result(self) -> Result<FunctionResult> {
        self.results
            .into_iter()
            .next()
            .ok_or_else(|| Error::malformed("response has no result at index 0"))
    }
}

/// A parsed asynchronous acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsynchronousResponse {
    pub acknowledgement_status: String,
    pub control: Control,
}

impl AsynchronousResponse {
    pub fn parse(body: &str) -> Result<Self> {
        Self::parse_inner(body).map_err(|e| e.with_response_body(body))
    }

    fn parse_inner(body: &str) -> Result<Self> {
        let response = root(body)?;
        let acknowledgement = required_child(&response, "acknowledgement", "Response")?;
        let acknowledgement_status =
            required_text(acknowledgement, "status", "Acknowledgement")?.to_string();
        let control = Control::parse(&response)?;
        Ok(Self {
            acknowledgement_status,
            control,
        })
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.acknowledgement_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROL_OK: &str = r"<control>
        <status>success</status>
        <senderid>testsenderid</senderid>
        <controlid>requestControlId</controlid>
        <uniqueid>false</uniqueid>
        <dtdversion>3.0</dtdversion>
    </control>";

    const AUTH_OK: &str = r"<authentication>
        <status>success</status>
        <userid>testuser</userid>
        <companyid>testcompany</companyid>
        <sessiontimestamp>2016-01-24T14:26:56-08:00</sessiontimestamp>
    </authentication>";

    fn document(operation: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><response>{CONTROL_OK}<operation>{AUTH_OK}{operation}</operation></response>"#
        )
    }

    #[test]
    fn query_page_attributes() {
        let body = document(
            r#"<result>
                <status>success</status>
                <function>readByQuery</function>
                <controlid>readByQuery</controlid>
                <data listtype="glaccount" count="1" totalcount="2" numremaining="1" resultId="7765623330Vqb8pMCoA4IAAEnuglgAAAAL5">
                    <glaccount>
                        <RECORDNO>47</RECORDNO>
                        <ACCOUNTNO>1010</ACCOUNTNO>
                    </glaccount>
                </data>
            </result>"#,
        );
        let response = SynchronousResponse::parse(&body).expect("parses");
        assert_eq!(response.authentication.company_id.as_deref(), Some("testcompany"));

        let page = response.result(0).expect("result").page().expect("page");
        assert_eq!(page.count, 1);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.num_remaining, 1);
        assert_eq!(page.cursor.as_deref(), Some("7765623330Vqb8pMCoA4IAAEnuglgAAAAL5"));
        assert_eq!(page.list_type.as_deref(), Some("glaccount"));
        assert_eq!(page.records[0].get("ACCOUNTNO"), Some("1010"));
    }

    #[test]
    fn report_pages_use_report_id() {
        let body = document(
            r#"<result>
                <status>success</status>
                <function>readReport</function>
                <controlid>report</controlid>
                <data listtype="report" count="0" totalcount="0" numremaining="0" reportId="abc123"/>
            </result>"#,
        );
        let page = SynchronousResponse::parse(&body)
            .and_then(|r| r.into_first_result())
            .and_then(|r| r.page())
            .expect("page");
        assert_eq!(page.cursor.as_deref(), Some("abc123"));
        assert!(page.records.is_empty());
    }

    #[test]
    fn function_failure_keeps_error_list() {
        let body = document(
            r"<result>
                <status>failure</status>
                <function>readByQuery</function>
                <controlid>readByQuery</controlid>
                <errormessage>
                    <error>
                        <errorno>DL02000001</errorno>
                        <description>Error</description>
                        <description2>There was an error processing the request.</description2>
                        <correction></correction>
                    </error>
                </errormessage>
            </result>",
        );
        let result = SynchronousResponse::parse(&body)
            .and_then(SynchronousResponse::into_first_result)
            .expect("parses");
        assert!(!result.is_success());

        let err = result
            .ensure_success("An error occurred trying to get query records")
            .unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].error_no.as_deref(), Some("DL02000001"));
        assert!(
            err.to_string()
                .starts_with("An error occurred trying to get query records")
        );
    }

    #[test]
    fn control_failure_uses_root_errors() {
        let body = r"<response>
            <control><status>failure</status></control>
            <errormessage>
                <error>
                    <errorno>XL03000006</errorno>
                    <description>Incorrect Intacct XML Partner ID or password.</description>
                </error>
            </errormessage>
        </response>";
        let err = SynchronousResponse::parse(body).unwrap_err();
        assert!(matches!(err, Error::ControlFailure { .. }));
        assert_eq!(
            err.errors()[0].description.as_deref(),
            Some("Incorrect Intacct XML Partner ID or password.")
        );
    }

    #[test]
    fn authentication_failure_uses_operation_errors() {
        let body = format!(
            r"<response>{CONTROL_OK}<operation>
                <authentication><status>failure</status><userid>testuser</userid></authentication>
                <errormessage>
                    <error><errorno>XL03000006</errorno><description>Sign-in information is incorrect</description></error>
                </errormessage>
            </operation></response>"
        );
        let err = SynchronousResponse::parse(&body).unwrap_err();
        assert!(err.is_authentication_failure());
        assert_eq!(err.errors()[0].error_no.as_deref(), Some("XL03000006"));
    }

    #[test]
    fn missing_blocks_are_malformed() {
        let err = SynchronousResponse::parse(&format!("<response>{CONTROL_OK}</response>")).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert!(err.response_body().is_some());

        let err = SynchronousResponse::parse("<notaresponse/>").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));

        let body = document(
            r#"<result><status>success</status><function>readMore</function><controlid>x</controlid>
                <data count="1" numremaining="0"/></result>"#,
        );
        let err = SynchronousResponse::parse(&body)
            .and_then(|r| r.result(0).and_then(FunctionResult::page))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed response: data element is missing totalcount attribute"
        );
    }

    #[test]
    fn asynchronous_acknowledgement() {
        let body = format!(
            r"<response><acknowledgement><status>success</status></acknowledgement>{CONTROL_OK}</response>"
        );
        let response = AsynchronousResponse::parse(&body).expect("parses");
        assert_eq!(response.status(), "success");
        assert_eq!(response.control.control_id.as_deref(), Some("requestControlId"));

        let err = AsynchronousResponse::parse(&format!("<response>{CONTROL_OK}</response>")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed response: Response block is missing acknowledgement element"
        );
    }
}
