use super::{
    DEFAULT_PAGE_SIZE, Function, ReturnFormat, random_control_id, validate_page_size,
};
use crate::error::{Error, Result};
use crate::xml::Element;

pub const MIN_WAIT_TIME: u32 = 0;
pub const MAX_WAIT_TIME: u32 = 30;

/// `readReport`: run a custom report. Large reports are paged with
/// [`ReadMore`](super::ReadMore) using the returned `reportId`.
#[derive(Debug, Clone)]
pub struct ReadReport {
    control_id: String,
    report: String,
    arguments: Vec<Element>,
    page_size: u32,
    wait_time: u32,
    return_format: ReturnFormat,
    list_separator: Option<String>,
    return_definition: bool,
}

impl ReadReport {
    #[must_use]
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            control_id: random_control_id(),
            report: report.into(),
            arguments: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            wait_time: MIN_WAIT_TIME,
            return_format: ReturnFormat::Xml,
            list_separator: None,
            return_definition: false,
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }

    /// Adds a run-time argument, e.g. a `<PERIOD>` or `<FILTERS>` tree.
    #[must_use]
    pub fn with_argument(mut self, argument: Element) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Seconds the gateway waits for the report before answering, 0 through 30.
    #[must_use]
    pub fn with_wait_time(mut self, wait_time: u32) -> Self {
        self.wait_time = wait_time;
        self
    }

    #[must_use]
    pub fn with_return_format(mut self, return_format: ReturnFormat) -> Self {
        self.return_format = return_format;
        self
    }

    #[must_use]
    pub fn with_list_separator(mut self, list_separator: impl Into<String>) -> Self {
        self.list_separator = Some(list_separator.into()).filter(|s| !s.is_empty());
        self
    }

    /// Ask for the report definition instead of running the report.
    #[must_use]
    pub fn with_return_definition(mut self, return_definition: bool) -> Self {
        self.return_definition = return_definition;
        self
    }
}

impl Function for ReadReport {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        if self.report.is_empty() {
            return Err(Error::invalid("Report name is required for readReport"));
        }

        if self.return_definition {
            return Ok(Element::new("readReport")
                .with_attr("returnDef", "true")
                .with_child(Element::text_element("report", &self.report)));
        }

        validate_page_size(self.page_size)?;
        if self.wait_time > MAX_WAIT_TIME {
            return Err(Error::invalid(format!(
                "Wait Time cannot be greater than {MAX_WAIT_TIME}"
            )));
        }

        let mut body = Element::new("readReport");
        body.push_text("report", &self.report);
        if !self.arguments.is_empty() {
            let mut arguments = Element::new("arguments");
            arguments.children.extend(self.arguments.iter().cloned());
            body.push(arguments);
        }
        body.push_text("waitTime", self.wait_time);
        body.push_text("pagesize", self.page_size);
        body.push_text("returnFormat", self.return_format);
        body.push_optional("listSeparator", self.list_separator.as_deref());
        Ok(body)
    }
}
