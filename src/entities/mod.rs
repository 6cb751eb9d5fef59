//! Records and the object-specific builders that produce them.
//!
//! Generic objects are expressed as a [`Record`] checked against the
//! required-field table in [`template`]. Transaction types with a legacy
//! function shape (adjustments, deposits) implement [`Function`](crate::functions::Function)
//! directly.

pub mod adjustment;
pub mod custom_field;
pub mod deposit;
pub mod expense_adjustment;
pub mod location;
pub mod record;
pub mod statistical_account;
pub mod statistical_journal_entry;
pub mod template;

pub use adjustment::{Adjustment, AdjustmentLine, ExchangeRate, Ledger};
pub use custom_field::CustomField;
pub use deposit::Deposit;
pub use expense_adjustment::{ExpenseAdjustment, ExpenseAdjustmentLine};
pub use location::Location;
pub use record::{Record, Value};
pub use statistical_account::{ReportType, StatisticalAccount};
pub use statistical_journal_entry::{
    StatisticalJournalEntry, StatisticalJournalEntryLine, TransactionType,
};
pub use template::{ObjectTemplate, Operation};
