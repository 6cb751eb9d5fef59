use super::{Function, random_control_id};
use crate::error::{Error, Result};
use crate::xml::Element;

/// `getUserPermissions` for one user.
#[derive(Debug, Clone)]
pub struct UserPermissionsRead {
    control_id: String,
    user_id: String,
}

impl UserPermissionsRead {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            control_id: random_control_id(),
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }
}

impl Function for UserPermissionsRead {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        if self.user_id.is_empty() {
            return Err(Error::invalid("User ID is required for getUserPermissions"));
        }
        Ok(Element::new("getUserPermissions")
            .with_child(Element::text_element("userId", &self.user_id)))
    }
}

/// `getObjectTrail`: the audit trail of one record.
#[derive(Debug, Clone)]
pub struct AuditTrailRead {
    control_id: String,
    object: String,
    object_key: String,
}

impl AuditTrailRead {
    #[must_use]
    pub fn new(object: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self {
            control_id: random_control_id(),
            object: object.into(),
            object_key: object_key.into(),
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }
}

impl Function for AuditTrailRead {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        Ok(Element::new("getObjectTrail")
            .with_child(Element::text_element("object", &self.object))
            .with_child(Element::text_element("objectKey", &self.object_key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::test_support::assert_function_xml;

    #[test]
    fn user_permissions() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <getUserPermissions>
        <userId>helloworld</userId>
    </getUserPermissions>
</function>"#,
            &UserPermissionsRead::new("helloworld").with_control_id("unittest"),
        );
    }

    #[test]
    fn object_trail() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <getObjectTrail>
        <object>GLENTRY</object>
        <objectKey>GLENTRY123</objectKey>
    </getObjectTrail>
</function>"#,
            &AuditTrailRead::new("GLENTRY", "GLENTRY123").with_control_id("unittest"),
        );
    }
}
