//! AP and AR adjustments. Both ledgers share one function shape and differ
//! only in element names, so a single builder covers them.

use rust_decimal::Decimal;
use time::Date;

use super::custom_field::{CustomField, push_custom_fields};
use crate::error::{Error, Result};
use crate::functions::{Function, random_control_id};
use crate::utils::date_format::date_element;
use crate::xml::Element;

/// Which subledger an adjustment is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ledger {
    Payables,
    Receivables,
}

struct LedgerNames {
    function: &'static str,
    party: &'static str,
    document: &'static str,
    items: &'static str,
    label: &'static str,
}

impl Ledger {
    fn names(self) -> LedgerNames {
        match self {
            Self::Payables => LedgerNames {
                function: "create_apadjustment",
                party: "vendorid",
                document: "billno",
                items: "apadjustmentitems",
                label: "AP Adjustment",
            },
            Self::Receivables => LedgerNames {
                function: "create_aradjustment",
                party: "customerid",
                document: "invoiceno",
                items: "aradjustmentitems",
                label: "AR Adjustment",
            },
        }
    }
}

/// Exchange rate of a foreign currency transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeRate {
    /// Look the rate up for a date; an unset type writes an empty `<exchratetype/>`.
    Dated {
        date: Date,
        rate_type: Option<String>,
    },
    /// A fixed rate.
    Rate(Decimal),
}

#[derive(Debug, Clone, Default)]
pub struct AdjustmentLine {
    pub gl_account_no: Option<String>,
    pub amount: Option<Decimal>,
    pub memo: Option<String>,
    pub location_id: Option<String>,
    pub department_id: Option<String>,
}

impl AdjustmentLine {
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_gl_account_no(mut self, gl_account_no: impl Into<String>) -> Self {
        self.gl_account_no = Some(gl_account_no.into());
        self
    }

    fn to_element(&self) -> Element {
        let mut line = Element::new("lineitem");
        line.push_text("glaccountno", self.gl_account_no.as_deref().unwrap_or_default());
        line.push_text(
            "amount",
            self.amount.map(|amount| amount.to_string()).unwrap_or_default(),
        );
        line.push_optional("memo", self.memo.as_deref());
        line.push_optional("locationid", self.location_id.as_deref());
        line.push_optional("departmentid", self.department_id.as_deref());
        line
    }
}

/// `create_apadjustment` / `create_aradjustment`.
#[derive(Debug, Clone)]
pub struct Adjustment {
    control_id: String,
    ledger: Ledger,
    pub party_id: String,
    pub transaction_date: Date,
    pub gl_posting_date: Option<Date>,
    pub batch_key: Option<u64>,
    pub adjustment_number: Option<String>,
    pub action: Option<String>,
    /// Bill number (AP) or invoice number (AR) being adjusted.
    pub document_number: Option<String>,
    pub description: Option<String>,
    pub external_id: Option<String>,
    pub base_currency: Option<String>,
    pub transaction_currency: Option<String>,
    pub exchange_rate: Option<ExchangeRate>,
    pub do_not_post_to_gl: Option<bool>,
    pub custom_fields: Vec<CustomField>,
    pub lines: Vec<AdjustmentLine>,
}

impl Adjustment {
    fn new(ledger: Ledger, party_id: String, transaction_date: Date) -> Self {
        Self {
            control_id: random_control_id(),
            ledger,
            party_id,
            transaction_date,
            gl_posting_date: None,
            batch_key: None,
            adjustment_number: None,
            action: None,
            document_number: None,
            description: None,
            external_id: None,
            base_currency: None,
            transaction_currency: None,
            exchange_rate: None,
            do_not_post_to_gl: None,
            custom_fields: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// An AP adjustment against a vendor.
    #[must_use]
    pub fn payables(vendor_id: impl Into<String>, transaction_date: Date) -> Self {
        Self::new(Ledger::Payables, vendor_id.into(), transaction_date)
    }

    /// An AR adjustment against a customer.
    #[must_use]
    pub fn receivables(customer_id: impl Into<String>, transaction_date: Date) -> Self {
        Self::new(Ledger::Receivables, customer_id.into(), transaction_date)
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: AdjustmentLine) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn ledger(&self) -> Ledger {
        self.ledger
    }
}

impl Function for Adjustment {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        let names = self.ledger.names();
        if self.lines.is_empty() {
            return Err(Error::invalid(format!(
                "{} must have at least 1 line",
                names.label
            )));
        }

        let mut body = Element::new(names.function);
        body.push_text(names.party, &self.party_id);
        body.push(date_element("datecreated", self.transaction_date));
        if let Some(posted) = self.gl_posting_date {
            body.push(date_element("dateposted", posted));
        }
        body.push_optional("batchkey", self.batch_key);
        body.push_optional("adjustmentno", self.adjustment_number.as_deref());
        body.push_optional("action", self.action.as_deref());
        body.push_optional(names.document, self.document_number.as_deref());
        body.push_optional("description", self.description.as_deref());
        body.push_optional("externalid", self.external_id.as_deref());
        body.push_optional("basecurr", self.base_currency.as_deref());
        body.push_optional("currency", self.transaction_currency.as_deref());
        match &self.exchange_rate {
            Some(ExchangeRate::Dated { date, rate_type }) => {
                body.push(date_element("exchratedate", *date));
                body.push_text("exchratetype", rate_type.as_deref().unwrap_or_default());
            }
            Some(ExchangeRate::Rate(rate)) => body.push_text("exchrate", rate),
            None => {}
        }
        body.push_optional("nogl", self.do_not_post_to_gl);
        push_custom_fields(&mut body, &self.custom_fields);

        let mut items = Element::new(names.items);
        items
            .children
            .extend(self.lines.iter().map(AdjustmentLine::to_element));
        body.push(items);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use super::*;
    use crate::functions::test_support::assert_function_xml;

    #[test]
    fn ap_default_params() {
        let adjustment = Adjustment::payables("VENDOR1", date!(2015 - 06 - 30))
            .with_control_id("unittest")
            .with_line(AdjustmentLine::new(dec!(76343.43)));

        assert_function_xml(
            r#"<function controlid="unittest">
    <create_apadjustment>
        <vendorid>VENDOR1</vendorid>
        <datecreated>
            <year>2015</year>
            <month>06</month>
            <day>30</day>
        </datecreated>
        <apadjustmentitems>
            <lineitem>
                <glaccountno/>
                <amount>76343.43</amount>
            </lineitem>
        </apadjustmentitems>
    </create_apadjustment>
</function>"#,
            &adjustment,
        );
    }

    #[test]
    fn ap_param_overrides() {
        let mut adjustment = Adjustment::payables("VENDOR1", date!(2015 - 06 - 30))
            .with_control_id("unittest")
            .with_line(AdjustmentLine::new(dec!(76343.43)));
        adjustment.gl_posting_date = Some(date!(2015 - 06 - 30));
        adjustment.batch_key = Some(20323);
        adjustment.adjustment_number = Some("234".to_string());
        adjustment.action = Some("Submit".to_string());
        adjustment.document_number = Some("234235".to_string());
        adjustment.description = Some("Some description".to_string());
        adjustment.external_id = Some("20394".to_string());
        adjustment.base_currency = Some("USD".to_string());
        adjustment.transaction_currency = Some("USD".to_string());
        adjustment.exchange_rate = Some(ExchangeRate::Dated {
            date: date!(2015 - 06 - 30),
            rate_type: Some("Intacct Daily Rate".to_string()),
        });
        adjustment.do_not_post_to_gl = Some(false);
        adjustment.custom_fields = vec![CustomField::new("customfield1", "customvalue1")];

        assert_function_xml(
            r#"<function controlid="unittest">
    <create_apadjustment>
        <vendorid>VENDOR1</vendorid>
        <datecreated>
            <year>2015</year>
            <month>06</month>
            <day>30</day>
        </datecreated>
        <dateposted>
            <year>2015</year>
            <month>06</month>
            <day>30</day>
        </dateposted>
        <batchkey>20323</batchkey>
        <adjustmentno>234</adjustmentno>
        <action>Submit</action>
        <billno>234235</billno>
        <description>Some description</description>
        <externalid>20394</externalid>
        <basecurr>USD</basecurr>
        <currency>USD</currency>
        <exchratedate>
            <year>2015</year>
            <month>06</month>
            <day>30</day>
        </exchratedate>
        <exchratetype>Intacct Daily Rate</exchratetype>
        <nogl>false</nogl>
        <customfields>
            <customfield>
                <customfieldname>customfield1</customfieldname>
                <customfieldvalue>customvalue1</customfieldvalue>
            </customfield>
        </customfields>
        <apadjustmentitems>
            <lineitem>
                <glaccountno/>
                <amount>76343.43</amount>
            </lineitem>
        </apadjustmentitems>
    </create_apadjustment>
</function>"#,
            &adjustment,
        );
    }

    #[test]
    fn ar_exchange_rate_date_without_type() {
        let mut adjustment = Adjustment::receivables("CUSTOMER1", date!(2016 - 06 - 30))
            .with_control_id("unittest")
            .with_line(AdjustmentLine::new(dec!(76343.43)));
        adjustment.gl_posting_date = Some(date!(2016 - 06 - 30));
        adjustment.base_currency = Some("USD".to_string());
        adjustment.exchange_rate = Some(ExchangeRate::Dated {
            date: date!(2016 - 06 - 30),
            rate_type: None,
        });

        assert_function_xml(
            r#"<function controlid="unittest">
    <create_aradjustment>
        <customerid>CUSTOMER1</customerid>
        <datecreated>
            <year>2016</year>
            <month>06</month>
            <day>30</day>
        </datecreated>
        <dateposted>
            <year>2016</year>
            <month>06</month>
            <day>30</day>
        </dateposted>
        <basecurr>USD</basecurr>
        <exchratedate>
            <year>2016</year>
            <month>06</month>
            <day>30</day>
        </exchratedate>
        <exchratetype/>
        <aradjustmentitems>
            <lineitem>
                <glaccountno></glaccountno>
                <amount>76343.43</amount>
            </lineitem>
        </aradjustmentitems>
    </create_aradjustment>
</function>"#,
            &adjustment,
        );
    }

    #[test]
    fn ar_fixed_exchange_rate() {
        let mut adjustment = Adjustment::receivables("CUSTOMER1", date!(2016 - 06 - 30))
            .with_control_id("unittest")
            .with_line(AdjustmentLine::new(dec!(76343.43)));
        adjustment.gl_posting_date = Some(date!(2016 - 06 - 30));
        adjustment.exchange_rate = Some(ExchangeRate::Rate(dec!(1.522)));

        assert_function_xml(
            r#"<function controlid="unittest">
    <create_aradjustment>
        <customerid>CUSTOMER1</customerid>
        <datecreated>
            <year>2016</year>
            <month>06</month>
            <day>30</day>
        </datecreated>
        <dateposted>
            <year>2016</year>
            <month>06</month>
            <day>30</day>
        </dateposted>
        <exchrate>1.522</exchrate>
        <aradjustmentitems>
            <lineitem>
                <glaccountno></glaccountno>
                <amount>76343.43</amount>
            </lineitem>
        </aradjustmentitems>
    </create_aradjustment>
</function>"#,
            &adjustment,
        );
    }

    #[test]
    fn missing_lines() {
        let ap = Adjustment::payables("VENDOR1", date!(2015 - 06 - 30));
        assert_eq!(
            ap.to_element().unwrap_err().to_string(),
            "AP Adjustment must have at least 1 line"
        );
        let ar = Adjustment::receivables("CUSTOMER1", date!(2015 - 06 - 30));
        assert_eq!(
            ar.to_element().unwrap_err().to_string(),
            "AR Adjustment must have at least 1 line"
        );
    }
}
