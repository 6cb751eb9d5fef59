use super::Record;
use crate::functions::{Create, Update};

pub const OBJECT: &str = "LOCATION";

/// A location (entity or sub-location) of the company.
#[derive(Debug, Clone, Default)]
pub struct Location {
    pub location_id: Option<String>,
    pub name: Option<String>,
    pub parent_id: Option<String>,
    pub manager_employee_id: Option<String>,
    pub currency: Option<String>,
}

impl Location {
    #[must_use]
    pub fn new(location_id: impl Into<String>) -> Self {
        Self {
            location_id: Some(location_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_parent_id(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub fn to_record(&self) -> Record {
        Record::new(OBJECT)
            .with_optional("LOCATIONID", self.location_id.as_deref())
            .with_optional("NAME", self.name.as_deref())
            .with_optional("PARENTID", self.parent_id.as_deref())
            .with_optional("SUPERVISORID", self.manager_employee_id.as_deref())
            .with_optional("CURRENCY", self.currency.as_deref())
    }

    #[must_use]
    pub fn create(&self) -> Create {
        Create::new(vec![self.to_record()])
    }

    #[must_use]
    pub fn update(&self) -> Update {
        Update::new(vec![self.to_record()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Function;
    use crate::functions::test_support::assert_function_xml;

    #[test]
    fn update_location() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <update>
        <LOCATION>
            <LOCATIONID>L1234</LOCATIONID>
            <NAME>hello world</NAME>
        </LOCATION>
    </update>
</function>"#,
            &Location::new("L1234")
                .with_name("hello world")
                .update()
                .with_control_id("unittest"),
        );
    }

    #[test]
    fn update_requires_location_id() {
        let location = Location::default().with_name("hello world");
        assert_eq!(
            location.update().to_element().unwrap_err().to_string(),
            "Location ID is required for update"
        );
    }
}
