use super::{Function, random_control_id};
use crate::error::{Error, Result};
use crate::xml::Element;

/// Which server-side result set a `readMore` continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// `resultId` returned by `readByQuery`.
    Result(String),
    /// `reportId` returned by `readReport`.
    Report(String),
    /// A saved view, continued by view name.
    View(String),
}

/// `readMore`: the next page of a query, report or view.
#[derive(Debug, Clone)]
pub struct ReadMore {
    control_id: String,
    continuation: Continuation,
}

impl ReadMore {
    #[must_use]
    pub fn new(continuation: Continuation) -> Self {
        Self {
            control_id: random_control_id(),
            continuation,
        }
    }

    #[must_use]
    pub fn result_id(result_id: impl Into<String>) -> Self {
        Self::new(Continuation::Result(result_id.into()))
    }

    #[must_use]
    pub fn report_id(report_id: impl Into<String>) -> Self {
        Self::new(Continuation::Report(report_id.into()))
    }

    /// Continues a saved view, by view name.
    #[must_use]
    pub fn view(view: impl Into<String>) -> Self {
        Self::new(Continuation::View(view.into()))
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }

    #[must_use]
    pub fn continuation(&self) -> &Continuation {
        &self.continuation
    }
}

impl Function for ReadMore {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        let (name, value) = match &self.continuation {
            Continuation::Result(id) => ("resultId", id),
            Continuation::Report(id) => ("reportId", id),
            Continuation::View(view) => ("view", view),
        };
        if value.is_empty() {
            return Err(Error::invalid(format!("{name} is required for readMore")));
        }
        Ok(Element::new("readMore").with_child(Element::text_element(name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::test_support::assert_function_xml;

    #[test]
    fn continues_a_query() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <readMore>
        <resultId>6465763031V2wi28CoHYQAAF0HcP8AAAAc5</resultId>
    </readMore>
</function>"#,
            &ReadMore::result_id("6465763031V2wi28CoHYQAAF0HcP8AAAAc5").with_control_id("unittest"),
        );
    }

    #[test]
    fn continues_a_report() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <readMore>
        <reportId>R1</reportId>
    </readMore>
</function>"#,
            &ReadMore::report_id("R1").with_control_id("unittest"),
        );
    }

    #[test]
    fn continues_a_view() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <readMore>
        <view>Vendor List</view>
    </readMore>
</function>"#,
            &ReadMore::view("Vendor List").with_control_id("unittest"),
        );
        assert!(ReadMore::view("").to_element().is_err());
    }

    #[test]
    fn empty_cursor_is_rejected() {
        let err = ReadMore::result_id("").to_element().unwrap_err();
        assert_eq!(err.to_string(), "resultId is required for readMore");
    }
}
