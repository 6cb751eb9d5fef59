use super::{Function, random_control_id};
use crate::error::Result;
use crate::xml::Element;

/// `getAPISession`: returns a session ID and the endpoint the session is bound to.
#[derive(Debug, Clone)]
pub struct ApiSessionCreate {
    control_id: String,
    location_id: Option<String>,
}

impl Default for ApiSessionCreate {
    fn default() -> Self {
        Self {
            control_id: random_control_id(),
            location_id: None,
        }
    }
}

impl ApiSessionCreate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }

    /// Scopes the new session to a single entity of a multi-entity company.
    #[must_use]
    pub fn with_location_id(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }
}

impl Function for ApiSessionCreate {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        let mut body = Element::new("getAPISession");
        body.push_optional("locationid", self.location_id.as_deref());
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
            r#"<function controlid="unittest"><getAPISession/></function>"#,
            &ApiSessionCreate::new().with_control_id("unittest"),
        );
    }

    #[test]
    fn entity_session() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <getAPISession>
        <locationid>100</locationid>
    </getAPISession>
</function>"#,
            &ApiSessionCreate::new()
                .with_control_id("unittest")
                .with_location_id("100"),
        );
    }
}
