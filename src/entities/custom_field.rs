use crate::xml::Element;

/// A custom field of a function-style (non-object) transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomField {
    pub name: String,
    pub value: String,
}

impl CustomField {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn to_element(&self) -> Element {
        Element::new("customfield")
            .with_child(Element::text_element("customfieldname", &self.name))
            .with_child(Element::text_element("customfieldvalue", &self.value))
    }
}

/// Appends `<customfields>` when there is at least one field.
pub(crate) fn push_custom_fields(parent: &mut Element, fields: &[CustomField]) {
    if fields.is_empty() {
        return;
    }
    let mut container = Element::new("customfields");
    container
        .children
        .extend(fields.iter().map(CustomField::to_element));
    parent.push(container);
}
