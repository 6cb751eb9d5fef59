use super::{
    DEFAULT_PAGE_SIZE, Function, ReturnFormat, field_list, random_control_id, validate_page_size,
};
use crate::error::Result;
use crate::xml::Element;

/// `readByQuery`: the first page of a filtered object query.
///
/// Follow-up pages are fetched with [`ReadMore`](super::ReadMore) using the
/// `resultId` of the response.
#[derive(Debug, Clone)]
pub struct ReadByQuery {
    control_id: String,
    object: String,
    query: String,
    fields: Vec<String>,
    page_size: u32,
    return_format: ReturnFormat,
    doc_par_id: Option<String>,
}

impl ReadByQuery {
    #[must_use]
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            control_id: random_control_id(),
            object: object.into(),
            query: String::new(),
            fields: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            return_format: ReturnFormat::Xml,
            doc_par_id: None,
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }

    /// Filter expression, e.g. `RECORDNO < 2`. Empty means all records.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn with_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Rows per page, 1 through 1000. Checked when the request is built.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_return_format(mut self, return_format: ReturnFormat) -> Self {
        self.return_format = return_format;
        self
    }

    #[must_use]
    pub fn with_doc_par_id(mut self, doc_par_id: impl Into<String>) -> Self {
        self.doc_par_id = Some(doc_par_id.into());
        self
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

impl Function for ReadByQuery {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        validate_page_size(self.page_size)?;

        let mut body = Element::new("readByQuery");
        body.push_text("object", &self.object);
        body.push_text("query", &self.query);
        body.push_text("fields", field_list(&self.fields));
        body.push_text("pagesize", self.page_size);
        body.push_text("returnFormat", self.return_format);
        body.push_optional("docparid", self.doc_par_id.as_deref());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::test_support::assert_function_xml;

    #[test]
    fn default_params() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <readByQuery>
        <object>CLASS</object>
        <query>RECORDNO &lt; 2</query>
        <fields>*</fields>
        <pagesize>1000</pagesize>
        <returnFormat>xml</returnFormat>
    </readByQuery>
</function>"#,
            &ReadByQuery::new("CLASS")
                .with_control_id("unittest")
                .with_query("RECORDNO < 2"),
        );
    }

    #[test]
    fn param_overrides() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <readByQuery>
        <object>CLASS</object>
        <query/>
        <fields>RECORDNO</fields>
        <pagesize>100</pagesize>
        <returnFormat>xml</returnFormat>
        <docparid>255252235</docparid>
    </readByQuery>
</function>"#,
            &ReadByQuery::new("CLASS")
                .with_control_id("unittest")
                .with_page_size(100)
                .with_fields(["RECORDNO"])
                .with_doc_par_id("255252235"),
        );
    }

    #[test]
    fn page_size_out_of_range_fails_to_build() {
        for (size, message) in [
            (0, "Page Size cannot be less than 1"),
            (1001, "Page Size cannot be greater than 1000"),
        ] {
            let err = ReadByQuery::new("CLASS")
                .with_page_size(size)
                .to_element()
                .unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }
}
