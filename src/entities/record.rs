use std::fmt::Display;

use rust_decimal::Decimal;
use time::Date;

use crate::error::{Error, Result};
use crate::utils::date_format::parse_us_date;
use crate::xml::Element;

/// A field value of a [`Record`] being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    /// A container element holding child records, e.g. `<ENTRIES>` of a `GLBATCH`.
    Nested(Vec<Record>),
}

/// A generic object record: the object name plus its fields in document order.
///
/// Records parsed from responses are flat. Nested response elements are
/// flattened to dotted names (`DISPLAYCONTACT.EMAIL1`) and every value is a
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    object: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    #[must_use]
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Sets a text field, replacing an existing value in place.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.set(name, Value::Text(value.to_string()));
        self
    }

    #[must_use]
    pub fn with_optional<V: Display>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    #[must_use]
    pub fn with_nested(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.set(name, Value::Nested(records));
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(field, _)| *field == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Text value of a field. Nested fields return `None`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|(field, value)| match value {
            Value::Text(text) if field == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether the field is present with a non-empty value.
    #[must_use]
    pub fn has_value(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, value)| {
            field == name
                && match value {
                    Value::Text(text) => !text.trim().is_empty(),
                    Value::Nested(records) => !records.is_empty(),
                }
        })
    }

    #[must_use]
    pub fn nested(&self, name: &str) -> &[Record] {
        self.fields
            .iter()
            .find_map(|(field, value)| match value {
                Value::Nested(records) if field == name => Some(records.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses a decimal field such as `TOTALDUE`. Empty values read as `None`.
    pub fn get_decimal(&self, name: &str) -> Result<Option<Decimal>> {
        match self.get(name).filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .parse::<Decimal>()
                .map(Some)
                .map_err(|e| Error::malformed(format!("field {name} is not a decimal ({raw}): {e}"))),
            None => Ok(None),
        }
    }

    /// Parses a date field (`mm/dd/yyyy`). Empty values read as `None`.
    pub fn get_date(&self, name: &str) -> Result<Option<Date>> {
        match self.get(name).filter(|v| !v.is_empty()) {
            Some(raw) => parse_us_date(raw)
                .map(Some)
                .map_err(|e| Error::malformed(format!("field {name}: {e}"))),
            None => Ok(None),
        }
    }

    /// Reads a record from a response element.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let mut record = Self::new(element.name.clone());
        for child in &element.children {
            flatten_into(&mut record.fields, &child.name, child);
        }
        record
    }

    /// The object element sent in `create` and `update` functions.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new(self.object.as_str());
        for (name, value) in &self.fields {
            match value {
                Value::Text(text) => element.push_text(name, text),
                Value::Nested(records) => {
                    let mut container = Element::new(name.as_str());
                    container
                        .children
                        .extend(records.iter().map(Record::to_element));
                    element.push(container);
                }
            }
        }
        element
    }
}

fn flatten_into(fields: &mut Vec<(String, Value)>, name: &str, element: &Element) {
    if element.children.is_empty() {
        fields.push((name.to_string(), Value::Text(element.text.clone())));
        return;
    }
    for child in &element.children {
        flatten_into(fields, &format!("{name}.{}", child.name), child);
    }
}
