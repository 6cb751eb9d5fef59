use super::Record;
use crate::functions::{Create, Update};

pub const OBJECT: &str = "STATACCOUNT";

/// How a statistical account accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    ForPeriod,
    Cumulative,
}

impl ReportType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForPeriod => "forperiod",
            Self::Cumulative => "cumulative",
        }
    }
}

/// A statistical general ledger account.
#[derive(Debug, Clone, Default)]
pub struct StatisticalAccount {
    pub account_no: Option<String>,
    pub title: Option<String>,
    pub report_type: Option<ReportType>,
    pub category: Option<String>,
    pub active: Option<bool>,
}

impl StatisticalAccount {
    #[must_use]
    pub fn new(account_no: impl Into<String>) -> Self {
        Self {
            account_no: Some(account_no.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_report_type(mut self, report_type: ReportType) -> Self {
        self.report_type = Some(report_type);
        self
    }

    #[must_use]
    pub fn to_record(&self) -> Record {
        Record::new(OBJECT)
            .with_optional("ACCOUNTNO", self.account_no.as_deref())
            .with_optional("TITLE", self.title.as_deref())
            .with_optional("ACCOUNTTYPE", self.report_type.map(ReportType::as_str))
            .with_optional("CATEGORY", self.category.as_deref())
            .with_optional(
                "STATUS",
                self.active.map(|active| if active { "active" } else { "inactive" }),
            )
    }

    #[must_use]
    pub fn create(&self) -> Create {
        Create::new(vec![self.to_record()])
    }

    #[must_use]
    pub fn update(&self) -> Update {
        Update::new(vec![self.to_record()])
    }
}
