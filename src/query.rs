//! Query-string construction — translate grid state into an OData-style
//! fragment for the external data service.
//!
//! The service expects Title Case field names and a strict quoting
//! asymmetry: numbers and booleans go on the wire unquoted, text values are
//! single-quoted.  Both are reproduced exactly here; deviating breaks the
//! service's filter parser.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;

// ───────────────────────────────────────── state ─────────────

/// Sort direction for [`Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Active sort column; an empty `field` means unsorted.
#[derive(Debug, Clone, Default)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

/// Value kind of a filter entry; drives rendering and quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Date,
    DateTime,
    Number,
    Text,
    Select,
    Boolean,
}

/// One column filter.  Entries with a `None` or empty value are excluded
/// before rendering.
#[derive(Debug, Clone)]
pub struct FilterEntry {
    pub field: String,
    /// Service operator, e.g. `eq`, `ne`, `contains`, `startswith`.
    pub operator: String,
    pub value: Option<String>,
    pub kind: FilterKind,
}

/// Paging, sorting, and filtering state of a data grid.
#[derive(Debug, Clone, Default)]
pub struct GridState {
    pub page_size: u32,
    pub skip: u32,
    pub sort: Sort,
    pub filter: Vec<FilterEntry>,
}

// ───────────────────────────────────────── errors ────────────

/// Validation failure while rendering a filter entry.  Malformed values are
/// rejected here rather than silently producing a fragment the service
/// cannot parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid numeric filter value '{value}' for field '{field}'")]
    InvalidNumber { field: String, value: String },

    #[error("invalid date filter value '{value}' for field '{field}'")]
    InvalidDate { field: String, value: String },
}

// ───────────────────────────────────────── rendering ─────────

/// Render `state` as a query-string fragment:
/// `$top=..&$skip=..[&$orderby=..][&$filter=..]`.
pub fn build_query_string(state: &GridState) -> Result<String, QueryError> {
    let mut out = format!("$top={}&$skip={}", state.page_size, state.skip);

    if !state.sort.field.is_empty() {
        let _ = write!(out, "&$orderby={}", title_case(&state.sort.field));
        if state.sort.direction == SortDirection::Descending {
            out.push_str(" desc");
        }
    }

    let clauses = state
        .filter
        .iter()
        .filter(|entry| entry.value.as_deref().is_some_and(|v| !v.is_empty()))
        .map(render_entry)
        .collect::<Result<Vec<_>, _>>()?;
    if !clauses.is_empty() {
        let _ = write!(out, "&$filter={}", clauses.join(" and "));
    }

    Ok(out)
}

fn render_entry(entry: &FilterEntry) -> Result<String, QueryError> {
    // Empty values were filtered out by the caller.
    let value = entry.value.as_deref().unwrap_or_default();
    let field = title_case(&entry.field);

    let clause = match entry.kind {
        FilterKind::Date => {
            let date = parse_date(value).ok_or_else(|| QueryError::InvalidDate {
                field: entry.field.clone(),
                value: value.to_string(),
            })?;
            format!("{field} eq {}", date.format("%Y-%m-%d"))
        }
        FilterKind::DateTime => {
            let instant = parse_instant(value).ok_or_else(|| QueryError::InvalidDate {
                field: entry.field.clone(),
                value: value.to_string(),
            })?;
            format!(
                "{field} eq {}",
                instant.to_rfc3339_opts(SecondsFormat::Millis, true)
            )
        }
        FilterKind::Number => {
            // The grid offers `contains` on every column; it is meaningless
            // for numbers and the service treats it as equality.
            let operator = if entry.operator == "contains" {
                "eq"
            } else {
                entry.operator.as_str()
            };
            let number: f64 = value.replace(',', ".").parse().map_err(|_| {
                QueryError::InvalidNumber {
                    field: entry.field.clone(),
                    value: value.to_string(),
                }
            })?;
            format!("{field} {operator} {number}")
        }
        FilterKind::Text => match entry.operator.as_str() {
            "contains" => format!("contains({field},'{value}')"),
            "not contains" => format!("not(contains({field},'{value}'))"),
            "startswith" => format!("startswith({field},'{value}')"),
            "endswith" => format!("endswith({field},'{value}')"),
            operator => format!("{field} {operator} '{value}'"),
        },
        FilterKind::Select | FilterKind::Boolean => {
            format!("{field} {} {value}", entry.operator)
        }
    };

    Ok(clause)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// Capitalize the first letter of each space-delimited word
/// (`"first name"` → `"First Name"`), per the service's field naming.
fn title_case(field: &str) -> String {
    field
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
