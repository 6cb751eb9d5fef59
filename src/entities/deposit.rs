use time::Date;

use super::custom_field::{CustomField, push_custom_fields};
use crate::error::{Error, Result};
use crate::functions::{Function, random_control_id};
use crate::utils::date_format::date_element;
use crate::xml::Element;

/// `record_deposit`: deposits undeposited receipts into a bank account.
#[derive(Debug, Clone)]
pub struct Deposit {
    control_id: String,
    pub bank_account_id: String,
    pub deposit_date: Date,
    pub deposit_slip_id: String,
    pub transaction_keys: Vec<String>,
    pub description: Option<String>,
    pub attachments_id: Option<String>,
    pub custom_fields: Vec<CustomField>,
}

impl Deposit {
    #[must_use]
    pub fn new(
        bank_account_id: impl Into<String>,
        deposit_date: Date,
        deposit_slip_id: impl Into<String>,
    ) -> Self {
        Self {
            control_id: random_control_id(),
            bank_account_id: bank_account_id.into(),
            deposit_date,
            deposit_slip_id: deposit_slip_id.into(),
            transaction_keys: Vec::new(),
            description: None,
            attachments_id: None,
            custom_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }

    #[must_use]
    pub fn with_transaction_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: ToString,
    {
        self.transaction_keys = keys.into_iter().map(|k| k.to_string()).collect();
        self
    }
}

impl Function for Deposit {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        if self.transaction_keys.is_empty() {
            return Err(Error::invalid(
                "CM Deposit must have at least 1 transaction key to deposit",
            ));
        }

        let mut body = Element::new("record_deposit");
        body.push_text("bankaccountid", &self.bank_account_id);
        body.push(date_element("depositdate", self.deposit_date));
        body.push_text("depositid", &self.deposit_slip_id);

        let mut keys = Element::new("receiptkeys");
        for key in &self.transaction_keys {
            keys.push_text("receiptkey", key);
        }
        body.push(keys);
        body.push_optional("description", self.description.as_deref());
        body.push_optional("supdocid", self.attachments_id.as_deref());
        push_custom_fields(&mut body, &self.custom_fields);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::functions::test_support::assert_function_xml;

    fn deposit() -> Deposit {
        Deposit::new("BA1145", date!(2015 - 06 - 30), "Deposit Slip 2015-06-30")
            .with_control_id("unittest")
    }

    #[test]
    fn default_params() {
        assert_function_xml(
            r#"<function controlid="unittest">
    <record_deposit>
        <bankaccountid>BA1145</bankaccountid>
        <depositdate>
            <year>2015</year>
            <month>06</month>
            <day>30</day>
        </depositdate>
        <depositid>Deposit Slip 2015-06-30</depositid>
        <receiptkeys>
            <receiptkey>1234</receiptkey>
        </receiptkeys>
    </record_deposit>
</function>"#,
            &deposit().with_transaction_keys([1234]),
        );
    }

    #[test]
    fn param_overrides() {
        let mut deposit = deposit().with_transaction_keys([1234]);
        deposit.description = Some("Desc".to_string());
        deposit.attachments_id = Some("AT111".to_string());
        deposit.custom_fields = vec![CustomField::new("customfield1", "customvalue1")];

        assert_function_xml(
            r#"<function controlid="unittest">
    <record_deposit>
        <bankaccountid>BA1145</bankaccountid>
        <depositdate>
            <year>2015</year>
            <month>06</month>
            <day>30</day>
        </depositdate>
        <depositid>Deposit Slip 2015-06-30</depositid>
        <receiptkeys>
            <receiptkey>1234</receiptkey>
        </receiptkeys>
        <description>Desc</description>
        <supdocid>AT111</supdocid>
        <customfields>
            <customfield>
                <customfieldname>customfield1</customfieldname>
                <customfieldvalue>customvalue1</customfieldvalue>
            </customfield>
        </customfields>
    </record_deposit>
</function>"#,
            &deposit,
        );
    }

    #[test]
    fn missing_keys() {
        assert_eq!(
            deposit().to_element().unwrap_err().to_string(),
            "CM Deposit must have at least 1 transaction key to deposit"
        );
    }
}
