use rust_decimal::Decimal;
use time::Date;

use super::Record;
use crate::error::{Error, Result};
use crate::functions::Create;
use crate::utils::date_format::format_us_date;

pub const OBJECT: &str = "GLBATCH";

/// Direction of a statistical journal line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionType {
    #[default]
    Increase,
    Decrease,
}

impl TransactionType {
    fn as_code(self) -> i8 {
        match self {
            Self::Increase => 1,
            Self::Decrease => -1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatisticalJournalEntryLine {
    pub account_no: Option<String>,
    pub transaction_type: TransactionType,
    pub amount: Option<Decimal>,
    pub memo: Option<String>,
    pub location_id: Option<String>,
    pub department_id: Option<String>,
}

impl StatisticalJournalEntryLine {
    fn to_record(&self) -> Record {
        Record::new("GLENTRY")
            .with("ACCOUNTNO", self.account_no.as_deref().unwrap_or_default())
            .with("TRTYPE", self.transaction_type.as_code())
            .with(
                "AMOUNT",
                self.amount.map(|amount| amount.to_string()).unwrap_or_default(),
            )
            .with_optional("DESCRIPTION", self.memo.as_deref())
            .with_optional("LOCATION", self.location_id.as_deref())
            .with_optional("DEPARTMENT", self.department_id.as_deref())
    }
}

/// A statistical journal entry, created as a `GLBATCH` object.
#[derive(Debug, Clone, Default)]
pub struct StatisticalJournalEntry {
    pub journal: Option<String>,
    pub posting_date: Option<Date>,
    pub reverse_date: Option<Date>,
    pub description: Option<String>,
    pub history_comment: Option<String>,
    pub reference_number: Option<String>,
    pub attachments_id: Option<String>,
    pub action: Option<String>,
    /// Object custom fields, written as plain elements (`<CUSTOMFIELD01>`).
    pub custom_fields: Vec<(String, String)>,
    pub lines: Vec<StatisticalJournalEntryLine>,
}

impl StatisticalJournalEntry {
    pub fn to_record(&self) -> Result<Record> {
        if self.lines.is_empty() {
            return Err(Error::invalid(
                "Statistical Journal Entry must have at least 1 line",
            ));
        }

        let mut record = Record::new(OBJECT)
            .with("JOURNAL", self.journal.as_deref().unwrap_or_default())
            .with("BATCH_DATE", optional_date(self.posting_date)?.unwrap_or_default())
            .with_optional("REVERSEDATE", optional_date(self.reverse_date)?)
            .with("BATCH_TITLE", self.description.as_deref().unwrap_or_default())
            .with_optional("HISTORY_COMMENT", self.history_comment.as_deref())
            .with_optional("REFERENCENO", self.reference_number.as_deref())
            .with_optional("SUPDOCID", self.attachments_id.as_deref())
            .with_optional("STATE", self.action.as_deref());
        for (name, value) in &self.custom_fields {
            record = record.with(name.as_str(), value);
        }
        Ok(record.with_nested(
            "ENTRIES",
            self.lines
                .iter()
                .map(StatisticalJournalEntryLine::to_record)
                .collect(),
        ))
    }

    pub fn create(&self) -> Result<Create> {
        Ok(Create::new(vec![self.to_record()?]))
    }
}

fn optional_date(date: Option<Date>) -> Result<Option<String>> {
    date.map(format_us_date)
        .transpose()
        .map_err(Error::invalid)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::functions::test_support::assert_function_xml;

    #[test]
    fn default_params() {
        let entry = StatisticalJournalEntry {
            lines: vec![StatisticalJournalEntryLine::default()],
            ..StatisticalJournalEntry::default()
        };

        assert_function_xml(
            r#"<function controlid="unittest">
    <create>
        <GLBATCH>
            <JOURNAL/>
            <BATCH_DATE/>
            <BATCH_TITLE/>
            <ENTRIES>
                <GLENTRY>
                    <ACCOUNTNO/>
                    <TRTYPE>1</TRTYPE>
                    <AMOUNT/>
                </GLENTRY>
            </ENTRIES>
        </GLBATCH>
    </create>
</function>"#,
            &entry.create().expect("builds").with_control_id("unittest"),
        );
    }

    #[test]
    fn param_overrides() {
        let entry = StatisticalJournalEntry {
            journal: Some("SJ".to_string()),
            posting_date: Some(date!(2016 - 06 - 30)),
            reverse_date: Some(date!(2016 - 07 - 01)),
            description: Some("My desc".to_string()),
            history_comment: Some("comment!".to_string()),
            reference_number: Some("123".to_string()),
            attachments_id: Some("AT001".to_string()),
            action: Some("Posted".to_string()),
            custom_fields: vec![("CUSTOMFIELD01".to_string(), "test01".to_string())],
            lines: vec![StatisticalJournalEntryLine::default()],
        };

        assert_function_xml(
            r#"<function controlid="unittest">
    <create>
        <GLBATCH>
            <JOURNAL>SJ</JOURNAL>
            <BATCH_DATE>06/30/2016</BATCH_DATE>
            <REVERSEDATE>07/01/2016</REVERSEDATE>
            <BATCH_TITLE>My desc</BATCH_TITLE>
            <HISTORY_COMMENT>comment!</HISTORY_COMMENT>
            <REFERENCENO>123</REFERENCENO>
            <SUPDOCID>AT001</SUPDOCID>
            <STATE>Posted</STATE>
            <CUSTOMFIELD01>test01</CUSTOMFIELD01>
            <ENTRIES>
                <GLENTRY>
                    <ACCOUNTNO></ACCOUNTNO>
                    <TRTYPE>1</TRTYPE>
                    <AMOUNT></AMOUNT>
                </GLENTRY>
            </ENTRIES>
        </GLBATCH>
    </create>
</function>"#,
            &entry.create().expect("builds").with_control_id("unittest"),
        );
    }

    #[test]
    fn missing_lines() {
        let err = StatisticalJournalEntry::default().create().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Statistical Journal Entry must have at least 1 line"
        );
    }
}
