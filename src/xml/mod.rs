//! A small owned XML element tree shared by request building and response parsing.
//!
//! Requests are assembled as [`Element`] trees and serialized by [`writer`];
//! responses are parsed by [`reader`] into the same shape so the typed
//! response layer can walk them without touching quick-xml directly.

pub mod reader;
pub mod writer;

use std::fmt::Display;

pub use reader::parse;
pub use writer::{to_fragment, to_string};

/// Replacement text used for secrets in recorded request bodies.
pub const REDACTED: &str = "REDACTED";

/// An XML element with attributes, text content and child elements.
///
/// Mixed content is not modelled: the gateway never interleaves text with
/// child elements, so text is kept as a single string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates an element holding only text.
    #[must_use]
    pub fn text_element(name: impl Into<String>, text: impl Display) -> Self {
        Self::new(name).with_text(text)
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Display) -> Self {
        self.text = text.to_string();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Appends `<name>value</name>`.
    pub fn push_text(&mut self, name: &str, value: impl Display) {
        self.children.push(Self::text_element(name, value));
    }

    /// Appends `<name>value</name>` only when a value is present.
    pub fn push_optional<V: Display>(&mut self, name: &str, value: Option<V>) {
        if let Some(value) = value {
            self.push_text(name, value);
        }
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text of the first child with the given name.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.children.is_empty()
    }

    /// Copy of this tree with the text of every element named in `names`
    /// replaced by [`REDACTED`].
    #[must_use]
    pub fn redacted(&self, names: &[&str]) -> Element {
        let mut copy = self.clone();
        copy.redact_in_place(names);
        copy
    }

    fn redact_in_place(&mut self, names: &[&str]) {
        if names.contains(&self.name.as_str()) && !self.text.is_empty() {
            self.text = REDACTED.to_string();
        }
        for child in &mut self.children {
            child.redact_in_place(names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_reaches_nested_secrets() {
        let login = Element::new("authentication").with_child(
            Element::new("login")
                .with_child(Element::text_element("userid", "me"))
                .with_child(Element::text_element("password", "hunter2")),
        );
        let redacted = login.redacted(&["password"]);

        let login = redacted.child("login").expect("login element");
        assert_eq!(login.child_text("userid"), Some("me"));
        assert_eq!(login.child_text("password"), Some(REDACTED));
    }

    #[test]
    fn push_optional_skips_missing_values() {
        let mut read = Element::new("read");
        read.push_optional("docparid", None::<&str>);
        read.push_optional("returnFormat", Some("xml"));
        assert_eq!(read.children.len(), 1);
        assert_eq!(read.child_text("returnFormat"), Some("xml"));
    }
}
