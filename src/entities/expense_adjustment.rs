use rust_decimal::Decimal;
use time::Date;

use crate::error::{Error, Result};
use crate::functions::{Function, random_control_id};
use crate::utils::date_format::date_element;
use crate::xml::Element;

#[derive(Debug, Clone, Default)]
pub struct ExpenseAdjustmentLine {
    pub gl_account_no: Option<String>,
    pub amount: Option<Decimal>,
    pub expense_type: Option<String>,
    pub memo: Option<String>,
    pub expense_date: Option<Date>,
}

impl ExpenseAdjustmentLine {
    fn to_element(&self) -> Element {
        let mut line = Element::new("expenseadjustment");
        match &self.expense_type {
            Some(expense_type) => line.push_text("expensetype", expense_type),
            None => line.push_text(
                "glaccountno",
                self.gl_account_no.as_deref().unwrap_or_default(),
            ),
        }
        line.push_text(
            "amount",
            self.amount.map(|amount| amount.to_string()).unwrap_or_default(),
        );
        line.push_optional("memo", self.memo.as_deref());
        if let Some(expense_date) = self.expense_date {
            line.push(date_element("expensedate", expense_date));
        }
        line
    }
}

/// `create_expenseadjustmentreport`: an adjustment to an employee expense report.
#[derive(Debug, Clone)]
pub struct ExpenseAdjustment {
    control_id: String,
    pub employee_id: String,
    pub transaction_date: Date,
    pub gl_posting_date: Option<Date>,
    pub summary_record_no: Option<String>,
    pub adjustment_number: Option<String>,
    pub expense_report_number: Option<String>,
    pub description: Option<String>,
    pub base_currency: Option<String>,
    pub reimbursement_currency: Option<String>,
    pub attachments_id: Option<String>,
    pub lines: Vec<ExpenseAdjustmentLine>,
}

impl ExpenseAdjustment {
    #[must_use]
    pub fn new(employee_id: impl Into<String>, transaction_date: Date) -> Self {
        Self {
            control_id: random_control_id(),
            employee_id: employee_id.into(),
            transaction_date,
            gl_posting_date: None,
            summary_record_no: None,
            adjustment_number: None,
            expense_report_number: None,
            description: None,
            base_currency: None,
            reimbursement_currency: None,
            attachments_id: None,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_control_id(mut self, control_id: impl Into<String>) -> Self {
        self.control_id = control_id.into();
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: ExpenseAdjustmentLine) -> Self {
        self.lines.push(line);
        self
    }
}

impl Function for ExpenseAdjustment {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn body(&self) -> Result<Element> {
        if self.lines.is_empty() {
            return Err(Error::invalid("EE Adjustment must have at least 1 line"));
        }

        let mut body = Element::new("create_expenseadjustmentreport");
        body.push_text("employeeid", &self.employee_id);
        body.push(date_element("datecreated", self.transaction_date));
        if let Some(posted) = self.gl_posting_date {
            body.push(date_element("dateposted", posted));
        }
        body.push_optional("batchkey", self.summary_record_no.as_deref());
        body.push_optional("adjustmentno", self.adjustment_number.as_deref());
        body.push_optional("docnumber", self.expense_report_number.as_deref());
        body.push_optional("description", self.description.as_deref());
        body.push_optional("basecurr", self.base_currency.as_deref());
        body.push_optional("currency", self.reimbursement_currency.as_deref());

        let mut lines = Element::new("expenseadjustments");
        lines
            .children
            .extend(self.lines.iter().map(ExpenseAdjustmentLine::to_element));
        body.push(lines);
        body.push_optional("supdocid", self.attachments_id.as_deref());
        Ok(body)
    }
}
