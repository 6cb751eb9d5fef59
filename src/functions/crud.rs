use super::{Function, MAX_KEYS, random_control_id};
use crate::entities::Record;
use crate::entities::template::{self, Operation};
use crate::error::{Error, Result};
use crate::xml::Element;

fn records_body(name: &str, records: &[Record], operation: Operation) -> Result<Element> {
    if records.is_empty() {
        return Err(Error::invalid(format!(
            "At least 1 record is required for {operation}"
        )));
    }
    if records.len() > MAX_KEYS {
        return Err(Error::invalid(format!(
            "Records count cannot exceed {MAX_KEYS}"
        )));
    }

    let mut body = Element::new(name);
    for record in records {
        template::validate(record, operation)?;
        body.push(record.to_element());
    }
    Ok(body)
}

/// `create`: one or more object records, possibly of different objects.
#[derive(Debug, Clone)]
pub struct Create {
    control_id: String,
    records: Vec<Record>,
}

impl Create {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            control_id: random_control_id(),
            records,
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }
}

impl Function for Create {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        records_body("create", &self.records, Operation::Create)
    }
}

/// `update`: changes to existing records, identified by their key field.
#[derive(Debug, Clone)]
pub struct Update {
    control_id: String,
    records: Vec<Record>,
}

impl Update {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            control_id: random_control_id(),
            records,
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }
}

impl Function for Update {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        records_body("update", &self.records, Operation::Update)
    }
}

/// `delete`: removes records of one object by record number.
#[derive(Debug, Clone)]
pub struct Delete {
    control_id: String,
    object: String,
    keys: Vec<String>,
}

impl Delete {
    #[must_use]
    pub fn new<I, K>(object: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: ToString,
    {
        Self {
            control_id: random_control_id(),
            object: object.into(),
            keys: keys.into_iter().map(|k| k.to_string()).collect(),
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }
}

impl Function for Delete {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        if self.keys.is_empty() {
            return Err(Error::invalid("At least 1 key is required for delete"));
        }
        if self.keys.len() > MAX_KEYS {
            return Err(Error::invalid(format!("Keys count cannot exceed {MAX_KEYS}")));
        }

        let mut body = Element::new("delete");
        body.push_text("object", &self.object);
        body.push_text("keys", self.keys.join(","));
        Ok(body)
    }
}
