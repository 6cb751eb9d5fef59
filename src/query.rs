//! Paged reads: `readByQuery` or `readReport`, followed by `readMore` until
//! the server reports no remaining rows.
//!
//! [`Paginator`] holds the accumulation rules and knows nothing about HTTP;
//! the client drives it one page at a time.

use std::fmt;

use crate::entities::Record;
use crate::error::{Error, Result};
use crate::functions::read_more::Continuation;
use crate::functions::{DEFAULT_PAGE_SIZE, ReadByQuery, ReadMore, ReadReport, ReturnFormat};
use crate::response::Page;
use crate::xml::Element;

pub const DEFAULT_MAX_TOTAL_COUNT: u64 = 100_000;

/// The opaque server token that continues a paged read.
#[derive(Clone, PartialEq, Eq)]
pub struct Cursor(Continuation);

impl Cursor {
    /// A `resultId` from `readByQuery`.
    #[must_use]
    pub fn query(result_id: impl Into<String>) -> Self {
        Self(Continuation::Result(result_id.into()))
    }

    /// A `reportId` from `readReport`.
    #[must_use]
    pub fn report(report_id: impl Into<String>) -> Self {
        Self(Continuation::Report(report_id.into()))
    }

    #[must_use]
    pub fn token(&self) -> &str {
        match &self.0 {
            Continuation::Result(token) | Continuation::Report(token) | Continuation::View(token) => {
                token
            }
        }
    }

    fn with_token(&self, token: String) -> Self {
        match self.0 {
            Continuation::Result(_) => Self::query(token),
            Continuation::Report(_) => Self::report(token),
            Continuation::View(_) => Self(Continuation::View(token)),
        }
    }

    #[must_use]
    pub fn to_read_more(&self) -> ReadMore {
        ReadMore::new(self.0.clone())
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Continuation::Result(token) => f.debug_tuple("Cursor::Query").field(token).finish(),
            Continuation::Report(token) => f.debug_tuple("Cursor::Report").field(token).finish(),
            Continuation::View(view) => f.debug_tuple("Cursor::View").field(view).finish(),
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A query over one object, read to completion.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub object: String,
    pub fields: Vec<String>,
    pub query: String,
    pub page_size: u32,
    pub doc_par_id: Option<String>,
    /// Continues an earlier result set instead of issuing `readByQuery`.
    pub resume_from: Option<Cursor>,
    pub max_total_count: u64,
}

impl QueryRequest {
    #[must_use]
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            fields: Vec::new(),
            query: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            doc_par_id: None,
            resume_from: None,
            max_total_count: DEFAULT_MAX_TOTAL_COUNT,
        }
    }

    #[must_use]
    pub fn with_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_doc_par_id(mut self, doc_par_id: impl Into<String>) -> Self {
        self.doc_par_id = Some(doc_par_id.into());
        self
    }

    #[must_use]
    pub fn with_resume_from(mut self, cursor: Cursor) -> Self {
        self.resume_from = Some(cursor);
        self
    }

    #[must_use]
    pub fn with_max_total_count(mut self, max_total_count: u64) -> Self {
        self.max_total_count = max_total_count;
        self
    }

    /// The `readByQuery` function for the first page.
    #[must_use]
    pub fn to_function(&self) -> ReadByQuery {
        let function = ReadByQuery::new(self.object.as_str())
            .with_query(self.query.as_str())
            .with_fields(self.fields.iter().cloned())
            .with_page_size(self.page_size)
            .with_return_format(ReturnFormat::Xml);
        match &self.doc_par_id {
            Some(doc_par_id) => function.with_doc_par_id(doc_par_id.as_str()),
            None => function,
        }
    }
}

/// A custom report, read to completion.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub report: String,
    pub arguments: Vec<Element>,
    pub page_size: u32,
    pub wait_time: u32,
    pub list_separator: Option<String>,
    pub max_total_count: u64,
}

impl ReportRequest {
    #[must_use]
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
            arguments: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            wait_time: 0,
            list_separator: None,
            max_total_count: DEFAULT_MAX_TOTAL_COUNT,
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: Element) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_wait_time(mut self, wait_time: u32) -> Self {
        self.wait_time = wait_time;
        self
    }

    #[must_use]
    pub fn with_list_separator(mut self, list_separator: impl Into<String>) -> Self {
        self.list_separator = Some(list_separator.into());
        self
    }

    #[must_use]
    pub fn with_max_total_count(mut self, max_total_count: u64) -> Self {
        self.max_total_count = max_total_count;
        self
    }

    #[must_use]
    pub fn to_function(&self) -> ReadReport {
        let mut function = ReadReport::new(self.report.as_str())
            .with_page_size(self.page_size)
            .with_wait_time(self.wait_time);
        for argument in &self.arguments {
            function = function.with_argument(argument.clone());
        }
        match &self.list_separator {
            Some(separator) => function.with_list_separator(separator.as_str()),
            None => function,
        }
    }
}

/// All records of a paged read, in the order the server returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub records: Vec<Record>,
    pub total_count: u64,
    pub pages: usize,
    pub list_type: Option<String>,
}

impl QueryResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Accumulates pages and decides whether another `readMore` is needed.
#[derive(Debug)]
pub struct Paginator {
    max_total_count: u64,
    cursor: Option<Cursor>,
    result: QueryResult,
}

impl Paginator {
    /// Starts a read whose continuation tokens are of the same kind as `seed`.
    #[must_use]
    pub fn new(seed: Cursor, max_total_count: u64) -> Self {
        Self {
            max_total_count,
            cursor: Some(seed),
            result: QueryResult::default(),
        }
    }

    #[must_use]
    pub fn for_query(max_total_count: u64) -> Self {
        Self::new(Cursor::query(String::new()), max_total_count)
    }

    #[must_use]
    pub fn for_report(max_total_count: u64) -> Self {
        Self::new(Cursor::report(String::new()), max_total_count)
    }

    /// Number of pages accepted so far.
    #[must_use]
    pub fn pages(&self) -> usize {
        self.result.pages
    }

    /// Adds a page. Returns the cursor for the next `readMore`, or `None`
    /// when the read is complete.
    pub fn accept(&mut self, page: Page) -> Result<Option<Cursor>> {
        if self.result.pages == 0 {
            if page.total_count > self.max_total_count {
                warn!(
                    total_count = page.total_count,
                    max_total_count = self.max_total_count,
                    "query result exceeds the configured ceiling"
                );
                return Err(Error::PageCeilingExceeded {
                    total_count: page.total_count,
                    max_total_count: self.max_total_count,
                });
            }
            self.result.total_count = page.total_count;
            self.result.list_type = page.list_type.clone();
        } else if page.records.is_empty() && page.num_remaining > 0 {
            return Err(Error::malformed(format!(
                "readMore returned no records while {} remain",
                page.num_remaining
            )));
        }

        let accumulated = self.result.records.len() as u64 + page.records.len() as u64;
        if accumulated > self.max_total_count {
            return Err(Error::PageCeilingExceeded {
                total_count: accumulated,
                max_total_count: self.max_total_count,
            });
        }

        self.result.pages += 1;
        self.result.records.extend(page.records);
        trace!(
            page = self.result.pages,
            count = page.count,
            accumulated,
            num_remaining = page.num_remaining,
            "accepted page"
        );

        if let Some(token) = page.cursor {
            self.cursor = self.cursor.as_ref().map(|cursor| cursor.with_token(token));
        }
        if page.num_remaining == 0 {
            return Ok(None);
        }

        match &self.cursor {
            Some(cursor) if !cursor.token().is_empty() => Ok(Some(cursor.clone())),
            _ => Err(Error::malformed(format!(
                "page reports {} remaining rows but carries no continuation id",
                page.num_remaining
            ))),
        }
    }

    #[must_use]
    pub fn finish(self) -> QueryResult {
        self.result
    }
}
