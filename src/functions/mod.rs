//! Function blocks: the named operations carried inside a request's `<content>`.
//!
//! Every function is wrapped as `<function controlid="...">` around its own
//! body element. Control IDs default to a random UUID.

use std::fmt;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::xml::Element;

pub mod audit;
pub mod crud;
pub mod read;
pub mod read_by_query;
pub mod read_more;
pub mod read_report;
pub mod session;

pub use audit::{AuditTrailRead, UserPermissionsRead};
pub use crud::{Create, Delete, Update};
pub use read::{Read, ReadByName, ReadRelated};
pub use read_by_query::ReadByQuery;
pub use read_more::ReadMore;
pub use read_report::ReadReport;
pub use session::ApiSessionCreate;

pub const MAX_CONTROL_ID_LENGTH: usize = 256;
pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
/// Maximum keys (or names, or records) in a single read/create/update/delete.
pub const MAX_KEYS: usize = 100;

/// One operation inside a request's `<content>` block.
pub trait Function: fmt::Debug + Send + Sync {
    fn control_id(&self) -> &str;

    /// The element placed inside `<function>`, e.g. `<readByQuery>`.
    fn body(&self) -> Result<Element>;

    /// The complete `<function controlid="...">` element.
    fn to_element(&self) -> Result<Element> {
        let control_id = self.control_id();
        validate_control_id(control_id, "Function control ID")?;
        Ok(Element::new("function")
            .with_attr("controlid", control_id)
            .with_child(self.body()?))
    }
}

#[must_use]
pub fn random_control_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn validate_control_id(control_id: &str, label: &str) -> Result<()> {
    let length = control_id.chars().count();
    if length == 0 || length > MAX_CONTROL_ID_LENGTH {
        return Err(Error::invalid(format!(
            "{label} must be between 1 and {MAX_CONTROL_ID_LENGTH} characters in length"
        )));
    }
    Ok(())
}

pub(crate) fn validate_page_size(page_size: u32) -> Result<()> {
    if page_size < MIN_PAGE_SIZE {
        return Err(Error::invalid(format!(
            "Page Size cannot be less than {MIN_PAGE_SIZE}"
        )));
    }
    if page_size > MAX_PAGE_SIZE {
        return Err(Error::invalid(format!(
            "Page Size cannot be greater than {MAX_PAGE_SIZE}"
        )));
    }
    Ok(())
}

/// Response format requested from read functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnFormat {
    #[default]
    Xml,
}

impl ReturnFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "xml",
        }
    }
}

impl std::str::FromStr for ReturnFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xml" => Ok(Self::Xml),
            _ => Err(Error::invalid("Return Format is not a valid format")),
        }
    }
}

impl fmt::Display for ReturnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comma-joined field list, `*` when empty.
pub(crate) fn field_list(fields: &[String]) -> String {
    if fields.is_empty() {
        "*".to_string()
    } else {
        fields.join(",")
    }
}
