//! Input validation that runs before any store access.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex_lite::Regex;
use serde::Deserialize;

use crate::{
    customer::{CustomerChanges, CustomerDraft, CustomerPatch, NewCustomer},
    error::{FieldError, PipelineError, PipelineResult},
    types::{
        DATE_FORMAT, DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_SKIP, DateRange, MAX_PAGE_LIMIT, Page,
        Selection,
    },
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+",
        r"@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*",
        r"\.[A-Za-z]{2,}$",
    ))
    .expect("email pattern compiles")
});

// Four-digit years only, so stored dates compare correctly as text.
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles"));

/// Listing parameters exactly as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Offset text, if supplied.
    pub skip: Option<String>,
    /// Page size text, if supplied.
    pub limit: Option<String>,
    /// Inclusive lower date bound, if supplied.
    pub start_date: Option<String>,
    /// Inclusive upper date bound, if supplied.
    pub end_date: Option<String>,
}

impl ListQuery {
    /// Page-mode query from numeric bounds.
    pub fn page(skip: i64, limit: i64) -> Self {
        Self {
            skip: Some(skip.to_string()),
            limit: Some(limit.to_string()),
            ..Self::default()
        }
    }

    /// Range-mode query from date text.
    pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start_date: Some(start.into()),
            end_date: Some(end.into()),
            ..Self::default()
        }
    }
}

/// Parses `YYYY-MM-DD` text. Signed, padded, and short-year forms are rejected.
pub fn parse_date(field: &'static str, text: &str) -> PipelineResult<NaiveDate> {
    let invalid = || PipelineError::InvalidDateFormat {
        field,
        value: text.to_string(),
    };
    if !DATE_SHAPE.is_match(text) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| invalid())
}

/// Returns true for `local@domain.tld` addresses.
pub fn is_valid_email(text: &str) -> bool {
    text.len() <= 254 && EMAIL.is_match(text)
}

/// Checks a create payload and returns the typed field set.
///
/// Every offending field is reported, not just the first.
pub fn validate_new(input: NewCustomer) -> PipelineResult<CustomerDraft> {
    let mut errors = Vec::new();

    let first_name = required_text("first_name", input.first_name, &mut errors);
    let last_name = required_text("last_name", input.last_name, &mut errors);
    let email = required_text("email", input.email, &mut errors)
        .filter(|email| check_email(email, &mut errors));
    let date_of_birth = required_text("date_of_birth", input.date_of_birth, &mut errors)
        .and_then(|text| check_date("date_of_birth", &text, &mut errors));

    match (first_name, last_name, email, date_of_birth) {
        (Some(first_name), Some(last_name), Some(email), Some(date_of_birth))
            if errors.is_empty() =>
        {
            Ok(CustomerDraft {
                first_name,
                last_name,
                email,
                date_of_birth,
            })
        }
        _ => Err(PipelineError::Validation(errors)),
    }
}

/// Checks an update payload and returns the sparse patch.
///
/// A payload with no supplied fields is [`PipelineError::EmptyUpdate`].
pub fn validate_changes(input: CustomerChanges) -> PipelineResult<CustomerPatch> {
    let mut errors = Vec::new();

    let patch = CustomerPatch {
        first_name: input
            .first_name
            .filter(|v| check_not_blank("first_name", v, &mut errors)),
        last_name: input
            .last_name
            .filter(|v| check_not_blank("last_name", v, &mut errors)),
        email: input
            .email
            .filter(|v| check_not_blank("email", v, &mut errors) && check_email(v, &mut errors)),
        date_of_birth: input.date_of_birth.and_then(|text| {
            if check_not_blank("date_of_birth", &text, &mut errors) {
                check_date("date_of_birth", &text, &mut errors)
            } else {
                None
            }
        }),
    };

    if !errors.is_empty() {
        return Err(PipelineError::Validation(errors));
    }
    if patch.is_empty() {
        return Err(PipelineError::EmptyUpdate);
    }
    Ok(patch)
}

/// Checks pagination bounds: `skip >= 0` and `1 <= limit <= MAX_PAGE_LIMIT`.
pub fn validate_page(skip: Option<&str>, limit: Option<&str>) -> PipelineResult<Page> {
    let invalid = || PipelineError::InvalidPagination {
        skip: skip.unwrap_or_default().to_string(),
        limit: limit.unwrap_or_default().to_string(),
    };

    let skip_n = match skip {
        Some(text) => text.trim().parse::<i64>().map_err(|_| invalid())?,
        None => DEFAULT_PAGE_SKIP,
    };
    let limit_n = match limit {
        Some(text) => text.trim().parse::<i64>().map_err(|_| invalid())?,
        None => DEFAULT_PAGE_LIMIT,
    };

    if skip_n < 0 || !(1..=MAX_PAGE_LIMIT).contains(&limit_n) {
        return Err(invalid());
    }
    Ok(Page {
        skip: skip_n as u64,
        limit: limit_n as u64,
    })
}

/// Parses both bounds and checks `start <= end`.
pub fn validate_range(start: &str, end: &str) -> PipelineResult<DateRange> {
    let start_date = parse_date("start_date", start)?;
    let end_date = parse_date("end_date", end)?;
    if start_date > end_date {
        return Err(PipelineError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(DateRange {
        start: start_date,
        end: end_date,
    })
}

/// Resolves a listing query into one selection mode.
///
/// Range parameters take precedence over skip/limit. A lone bound is
/// reported as an invalid date for the missing one.
pub fn select(query: &ListQuery) -> PipelineResult<Selection> {
    match (query.start_date.as_deref(), query.end_date.as_deref()) {
        (Some(start), Some(end)) => validate_range(start, end).map(Selection::Range),
        (Some(_), None) => Err(PipelineError::InvalidDateFormat {
            field: "end_date",
            value: String::new(),
        }),
        (None, Some(_)) => Err(PipelineError::InvalidDateFormat {
            field: "start_date",
            value: String::new(),
        }),
        (None, None) => {
            validate_page(query.skip.as_deref(), query.limit.as_deref()).map(Selection::Page)
        }
    }
}

fn required_text(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None => {
            errors.push(FieldError::new(field, "field required"));
            None
        }
        Some(v) => check_not_blank(field, &v, errors).then_some(v),
    }
}

fn check_not_blank(field: &'static str, value: &str, errors: &mut Vec<FieldError>) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be empty"));
        return false;
    }
    true
}

fn check_email(value: &str, errors: &mut Vec<FieldError>) -> bool {
    if !is_valid_email(value) {
        errors.push(FieldError::new("email", "not a valid email address"));
        return false;
    }
    true
}

fn check_date(field: &'static str, text: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    match parse_date(field, text) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(field, "expected a date formatted YYYY-MM-DD"));
            None
        }
    }
}
