//! Per-object templates: which fields an object needs before it is sent.
//!
//! Objects without a template are sent as-is and left for the gateway to
//! validate.

use std::fmt;

use super::Record;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Update => f.write_str("update"),
        }
    }
}

/// A required field: element name and the label used in error messages.
pub type RequiredField = (&'static str, &'static str);

#[derive(Debug)]
pub struct ObjectTemplate {
    pub object: &'static str,
    pub create_required: &'static [RequiredField],
    pub update_required: &'static [RequiredField],
}

impl ObjectTemplate {
    #[must_use]
    pub fn required_for(&self, operation: Operation) -> &'static [RequiredField] {
        match operation {
            Operation::Create => self.create_required,
            Operation::Update => self.update_required,
        }
    }

    /// Fails with `"<label> is required for <operation>"` on the first missing field.
    pub fn validate(&self, record: &Record, operation: Operation) -> Result<()> {
        for (field, label) in self.required_for(operation) {
            if !record.has_value(field) {
                return Err(Error::invalid(format!("{label} is required for {operation}")));
            }
        }
        Ok(())
    }
}

static TEMPLATES: &[ObjectTemplate] = &[
    ObjectTemplate {
        object: "STATACCOUNT",
        create_required: &[("ACCOUNTNO", "Account No"), ("TITLE", "Title")],
        update_required: &[("ACCOUNTNO", "Account No")],
    },
    ObjectTemplate {
        object: "LOCATION",
        create_required: &[("LOCATIONID", "Location ID"), ("NAME", "Location Name")],
        update_required: &[("LOCATIONID", "Location ID")],
    },
    ObjectTemplate {
        object: "DEPARTMENT",
        create_required: &[("DEPARTMENTID", "Department ID"), ("TITLE", "Title")],
        update_required: &[("DEPARTMENTID", "Department ID")],
    },
    ObjectTemplate {
        object: "CLASS",
        create_required: &[("CLASSID", "Class ID"), ("NAME", "Class Name")],
        update_required: &[("CLASSID", "Class ID")],
    },
    ObjectTemplate {
        object: "CUSTOMER",
        create_required: &[("NAME", "Customer Name")],
        update_required: &[("CUSTOMERID", "Customer ID")],
    },
    ObjectTemplate {
        object: "VENDOR",
        create_required: &[("NAME", "Vendor Name")],
        update_required: &[("VENDORID", "Vendor ID")],
    },
    ObjectTemplate {
        object: "GLBATCH",
        create_required: &[("ENTRIES", "Entries")],
        update_required: &[("RECORDNO", "Record No")],
    },
];

/// Looks up the template for an object name, case-insensitively.
#[must_use]
pub fn lookup(object: &str) -> Option<&'static ObjectTemplate> {
    TEMPLATES
        .iter()
        .find(|template| template.object.eq_ignore_ascii_case(object))
}

/// Validates `record` against its template, if one is registered.
pub fn validate(record: &Record, operation: Operation) -> Result<()> {
    match lookup(record.object()) {
        Some(template) => template.validate(record, operation),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistical_account_requires_number_and_title_on_create() {
        let missing_number = Record::new("STATACCOUNT").with("TITLE", "hello world");
        assert_eq!(
            validate(&missing_number, Operation::Create).unwrap_err().to_string(),
            "Account No is required for create"
        );

        let missing_title = Record::new("STATACCOUNT").with("ACCOUNTNO", "9000");
        assert_eq!(
            validate(&missing_title, Operation::Create).unwrap_err().to_string(),
            "Title is required for create"
        );
        assert!(validate(&missing_title, Operation::Update).is_ok());
    }

    #[test]
    fn blank_values_count_as_missing() {
        let location = Record::new("LOCATION").with("LOCATIONID", "  ").with("NAME", "x");
        assert_eq!(
            validate(&location, Operation::Update).unwrap_err().to_string(),
            "Location ID is required for update"
        );
    }

    #[test]
    fn unknown_objects_pass_through() {
        assert!(lookup("GLACCOUNT").is_none());
        assert!(validate(&Record::new("GLACCOUNT"), Operation::Create).is_ok());
        assert!(lookup("statAccount").is_some());
    }
}
