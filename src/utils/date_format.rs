use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

use crate::xml::Element;

/// Builds the legacy `<year>/<month>/<day>` date element used by the
/// function-style (non-object) API calls. Month and day are zero padded.
#[must_use]
pub fn date_element(name: &str, date: Date) -> Element {
    Element::new(name)
        .with_child(Element::text_element("year", date.year()))
        .with_child(Element::text_element(
            "month",
            format!("{:02}", u8::from(date.month())),
        ))
        .with_child(Element::text_element("day", format!("{:02}", date.day())))
}

/// Formats a date the way object fields and query filters expect it (`mm/dd/yyyy`).
pub fn format_us_date(date: Date) -> Result<String, String> {
    date.format(&format_description!("[month]/[day]/[year]"))
        .map_err(|e| format!("Failed to format date {date}: {e}"))
}

// Object APIs return dates as mm/dd/yyyy, some reports use ISO dates
pub fn parse_us_date(date_str: &str) -> Result<Date, String> {
    let us = format_description!("[month]/[day]/[year]");
    if let Ok(date) = Date::parse(date_str, &us) {
        return Ok(date);
    }

    let iso = format_description!("[year]-[month]-[day]");
    Date::parse(date_str, &iso).map_err(|e| format!("Failed to parse date '{date_str}': {e}"))
}

/// Parses the `<sessiontimestamp>` of an authentication block.
pub fn parse_session_timestamp(timestamp: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(timestamp, &Rfc3339)
        .map_err(|e| format!("Failed to parse session timestamp '{timestamp}': {e}"))
}
