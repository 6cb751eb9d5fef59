//! Request documents: the `<control>` block, authentication and function content.

use std::collections::HashSet;

use crate::credentials::{Authentication, SenderCredentials};
use crate::error::{Error, Result};
use crate::functions::{Function, random_control_id, validate_control_id};
use crate::xml::{self, Element};

pub const DEFAULT_DTD_VERSION: &str = "3.0";

/// Elements whose text is replaced before a request is stored in the execution history.
pub const SECRET_ELEMENTS: &[&str] = &["password", "sessionid"];

/// Per-request settings for the `<control>` and `<operation>` blocks.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub control_id: String,
    /// Asks the gateway to reject function control IDs it has already seen.
    pub unique_id: bool,
    pub dtd_version: String,
    /// Runs every function in the request as one transaction.
    pub transaction: bool,
    /// Asynchronous policy ID. Required for asynchronous requests only.
    pub policy_id: Option<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            control_id: random_control_id(),
            unique_id: false,
            dtd_version: DEFAULT_DTD_VERSION.to_string(),
            transaction: false,
            policy_id: None,
        }
    }
}

impl RequestConfig {
    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }

    #[must_use]
    pub fn with_unique_id(mut self, unique_id: bool) -> Self {
        self.unique_id = unique_id;
        self
    }

    #[must_use]
    pub fn with_transaction(mut self, transaction: bool) -> Self {
        self.transaction = transaction;
        self
    }

    #[must_use]
    pub fn with_policy_id(mut self, policy_id: impl Into<String>) -> Self {
        self.policy_id = Some(policy_id.into());
        self
    }
}

/// Whether the gateway should answer inline or acknowledge and process later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Synchronous,
    Asynchronous,
}

/// A complete request document ready to post.
#[derive(Debug, Clone)]
pub struct RequestDocument {
    element: Element,
}

impl RequestDocument {
    /// Assembles and validates a request document.
    pub fn build(
        authentication: &Authentication,
        config: &RequestConfig,
        mode: Mode,
        content: &[&dyn Function],
    ) -> Result<Self> {
        validate_control_id(&config.control_id, "Request control ID")?;
        if config.unique_id {
            let mut seen = HashSet::new();
            for function in content {
                if !seen.insert(function.control_id()) {
                    return Err(Error::invalid(format!(
                        "Duplicate function control ID \"{}\" in a request that requires unique IDs",
                        function.control_id()
                    )));
                }
            }
        }

        let policy_id = match mode {
            Mode::Asynchronous => Some(config.policy_id.as_deref().ok_or_else(|| {
                Error::invalid("Required policy_id not supplied in config for asynchronous request")
            })?),
            Mode::Synchronous => None,
        };

        let mut content_block = Element::new("content");
        for function in content {
            content_block.push(function.to_element()?);
        }

        let operation = Element::new("operation")
            .with_attr("transaction", bool_text(config.transaction))
            .with_child(authentication_block(authentication))
            .with_child(content_block);

        let element = Element::new("request")
            .with_child(control_block(authentication.sender(), config, policy_id))
            .with_child(operation);

        Ok(Self { element })
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn to_xml(&self) -> Result<String> {
        xml::to_string(&self.element)
    }

    /// The document as stored in the execution history, secrets replaced.
    pub fn to_redacted_xml(&self) -> Result<String> {
        xml::to_string(&self.element.redacted(SECRET_ELEMENTS))
    }
}

fn bool_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn control_block(
    sender: &SenderCredentials,
    config: &RequestConfig,
    policy_id: Option<&str>,
) -> Element {
    let mut control = Element::new("control");
    control.push_text("senderid", &sender.sender_id);
    control.push_text("password", &sender.sender_password);
    control.push_text("controlid", &config.control_id);
    control.push_text("uniqueid", bool_text(config.unique_id));
    control.push_text("dtdversion", &config.dtd_version);
    control.push_optional("policyid", policy_id);
    control
}

fn authentication_block(authentication: &Authentication) -> Element {
    let mut block = Element::new("authentication");
    match authentication {
        Authentication::Session(session) => block.push_text("sessionid", &session.session_id),
        Authentication::Login(login) => {
            let mut element = Element::new("login");
            element.push_text("userid", &login.user_id);
            element.push_text("companyid", &login.company_id);
            element.push_text("password", &login.user_password);
            block.push(element);
        }
    }
    block
}
