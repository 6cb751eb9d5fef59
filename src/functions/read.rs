use super::{Function, MAX_KEYS, ReturnFormat, field_list, random_control_id};
use crate::error::{Error, Result};
use crate::xml::Element;

/// `read`: fetch records of one object by record number.
#[derive(Debug, Clone)]
pub struct Read {
    control_id: String,
    object: String,
    keys: Vec<String>,
    fields: Vec<String>,
    return_format: Option<ReturnFormat>,
    doc_par_id: Option<String>,
}

impl Read {
    #[must_use]
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            control_id: random_control_id(),
            object: object.into(),
            keys: Vec::new(),
            fields: Vec::new(),
            return_format: None,
            doc_par_id: None,
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }

    #[must_use]
    pub fn with_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: ToString,
    {
        self.keys = keys.into_iter().map(|k| k.to_string()).collect();
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

    #[must_use]
    pub fn with_return_format(mut self, return_format: ReturnFormat) -> Self {
        self.return_format = Some(return_format);
        self
    }

    /// Transaction definition, for document objects such as `SODOCUMENT`.
    #[must_use]
    pub fn with_doc_par_id(mut self, doc_par_id: impl Into<String>) -> Self {
        self.doc_par_id = Some(doc_par_id.into());
        self
    }
}

impl Function for Read {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        if self.keys.len() > MAX_KEYS {
            return Err(Error::invalid(format!("Keys count cannot exceed {MAX_KEYS}")));
        }

        let mut body = Element::new("read");
        body.push_text("object", &self.object);
        body.push_text("keys", self.keys.join(","));
        body.push_text("fields", field_list(&self.fields));
        body.push_optional("returnFormat", self.return_format);
        body.push_optional("docparid", self.doc_par_id.as_deref());
        Ok(body)
    }
}

/// `readByName`: fetch records of one object by their name/ID field.
#[derive(Debug, Clone)]
pub struct ReadByName {
    control_id: String,
    object: String,
    names: Vec<String>,
    fields: Vec<String>,
    return_format: Option<ReturnFormat>,
    doc_par_id: Option<String>,
}

impl ReadByName {
    #[must_use]
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            control_id: random_control_id(),
            object: object.into(),
            names: Vec::new(),
            fields: Vec::new(),
            return_format: None,
            doc_par_id: None,
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }

    #[must_use]
    pub fn with_names<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
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

    #[must_use]
    pub fn with_return_format(mut self, return_format: ReturnFormat) -> Self {
        self.return_format = Some(return_format);
        self
    }

    #[must_use]
    pub fn with_doc_par_id(mut self, doc_par_id: impl Into<String>) -> Self {
        self.doc_par_id = Some(doc_par_id.into());
        self
    }
}

impl Function for ReadByName {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        if self.names.len() > MAX_KEYS {
            return Err(Error::invalid(format!("Names count cannot exceed {MAX_KEYS}")));
        }

        let mut body = Element::new("readByName");
        body.push_text("object", &self.object);
        body.push_text("keys", self.names.join(","));
        body.push_text("fields", field_list(&self.fields));
        body.push_optional("returnFormat", self.return_format);
        body.push_optional("docparid", self.doc_par_id.as_deref());
        Ok(body)
    }
}

/// `readRelated`: follow a named relationship from the given records.
#[derive(Debug, Clone)]
pub struct ReadRelated {
    control_id: String,
    object: String,
    relation: String,
    keys: Vec<String>,
    fields: Vec<String>,
    return_format: Option<ReturnFormat>,
}

impl ReadRelated {
    #[must_use]
    pub fn new(object: impl Into<String>, relation: impl Into<String>) -> Self {
        Self {
            control_id: random_control_id(),
            object: object.into(),
            relation: relation.into(),
            keys: Vec::new(),
            fields: Vec::new(),
            return_format: None,
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }

    #[must_use]
    pub fn with_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: ToString,
    {
        self.keys = keys.into_iter().map(|k| k.to_string()).collect();
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

    #[must_use]
    pub fn with_return_format(mut self, return_format: ReturnFormat) -> Self {
        self.return_format = Some(return_format);
        self
    }
}

impl Function for ReadRelated {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        if self.keys.len() > MAX_KEYS {
            return Err(Error::invalid(format!("Keys count cannot exceed {MAX_KEYS}")));
        }
        if self.relation.is_empty() {
            return Err(Error::invalid("Relation is required for readRelated"));
        }

        let mut body = Element::new("readRelated");
        body.push_text("object", &self.object);
        body.push_text("keys", self.keys.join(","));
        body.push_text("relation", &self.relation);
        body.push_text("fields", field_list(&self.fields));
        body.push_optional("returnFormat", self.return_format);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::test_support::assert_function_xml;

    #[test]
    fn read_default_params() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <read>
        <object>CLASS</object>
        <keys></keys>
        <fields>*</fields>
    </read>
</function>"#,
            &Read::new("CLASS").with_control_id("unittest"),
        );
    }

    #[test]
    fn read_param_overrides() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <read>
        <object>CLASS</object>
        <keys>Key1,Key2</keys>
        <fields>Field1,Field2</fields>
        <returnFormat>xml</returnFormat>
        <docparid>Sales Invoice</docparid>
    </read>
</function>"#,
            &Read::new("CLASS")
                .with_control_id("unittest")
                .with_return_format(ReturnFormat::Xml)
                .with_fields(["Field1", "Field2"])
                .with_keys(["Key1", "Key2"])
                .with_doc_par_id("Sales Invoice"),
        );
    }

    #[test]
    fn read_numeric_keys() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <read>
        <object>CLASS</object>
        <keys>5,6</keys>
        <fields>*</fields>
    </read>
</function>"#,
            &Read::new("CLASS").with_control_id("unittest").with_keys([5, 6]),
        );
    }

    #[test]
    fn read_rejects_too_many_keys() {
        let read = Read::new("CLASS").with_keys(1..=101);
        let err = read.to_element().unwrap_err();
        assert_eq!(err.to_string(), "Keys count cannot exceed 100");
    }

    #[test]
    fn read_by_name_uses_keys_element() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <readByName>
        <object>VENDOR</object>
        <keys>V100,V200</keys>
        <fields>VENDORID,NAME</fields>
    </readByName>
</function>"#,
            &ReadByName::new("VENDOR")
                .with_control_id("unittest")
                .with_names(["V100", "V200"])
                .with_fields(["VENDORID", "NAME"]),
        );
    }

    #[test]
    fn read_related() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <readRelated>
        <object>CUSTOMER</object>
        <keys>C100</keys>
        <relation>Rcontact_customer</relation>
        <fields>*</fields>
    </readRelated>
</function>"#,
            &ReadRelated::new("CUSTOMER", "Rcontact_customer")
                .with_control_id("unittest")
                .with_keys(["C100"]),
        );
    }
}
