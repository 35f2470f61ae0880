//! The field-validation engine.
//!
//! [`validate`] walks the descriptors in order and runs the checks for each
//! field's type, stopping at the first failure. A field therefore contributes
//! at most one [`ValidationError`]. Nothing here logs or performs I/O.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use thiserror::Error;

use super::descriptor::{FieldDescriptor, FieldRule, NumberCheck, StringFormat};
use super::result::{ValidationError, ValidationResult};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email regex is valid"));

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("uuid regex is valid")
});

/// `%#z` accepts `Z`, `+02`, `+0200` and `+02:00`.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%d %H:%M:%S%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A failed check. The `Display` text is the user-facing message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("String cannot be empty")]
    EmptyString,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Invalid URL format")]
    InvalidUrl,
    #[error("Invalid UUID format")]
    InvalidUuid,
    #[error("Value does not match pattern: {0}")]
    PatternMismatch(String),
    #[error("Value does not match pattern: {0} (invalid regular expression)")]
    InvalidPattern(String),
    #[error("Value must be a number")]
    MissingNumber,
    #[error("Value must be a valid number")]
    NotANumber,
    #[error("Value must be greater than or equal to {0}")]
    BelowMin(f64),
    #[error("Value must be less than or equal to {0}")]
    AboveMax(f64),
    #[error("Value must be between {min} and {max}")]
    OutOfRange { min: f64, max: f64 },
    #[error("Value must be a boolean")]
    MissingBoolean,
    #[error("Date cannot be empty")]
    EmptyDate,
    #[error("Invalid date format")]
    InvalidDate,
    #[error("Value cannot be empty")]
    EmptyEnum,
    #[error("Value must be one of: {}", .0.join(", "))]
    NotInEnum(Vec<String>),
}

/// Validate every field and collect the failures in input order.
pub fn validate(fields: &[FieldDescriptor]) -> ValidationResult {
    let errors = fields
        .iter()
        .filter_map(|field| {
            check_field(field).err().map(|violation| ValidationError {
                field: field.name.clone(),
                message: violation.to_string(),
            })
        })
        .collect();

    ValidationResult::from_errors(errors)
}

/// Run the checks for a single field.
pub fn check_field(field: &FieldDescriptor) -> Result<(), Violation> {
    let required = field.required;
    match &field.rule {
        FieldRule::String { value, format } => check_string(value, required, format),
        FieldRule::Number { value, check } => check_number(*value, required, check),
        FieldRule::Boolean { value } => match value {
            None if required => Err(Violation::MissingBoolean),
            _ => Ok(()),
        },
        FieldRule::Date { value } => {
            if value.is_empty() {
                if required {
                    return Err(Violation::EmptyDate);
                }
                Ok(())
            } else if is_date(value) {
                Ok(())
            } else {
                Err(Violation::InvalidDate)
            }
        }
        FieldRule::Enum { value, allowed } => {
            if value.is_empty() {
                if required {
                    return Err(Violation::EmptyEnum);
                }
                Ok(())
            } else if allowed.iter().any(|a| a == value) {
                Ok(())
            } else {
                Err(Violation::NotInEnum(allowed.clone()))
            }
        }
    }
}

fn check_string(value: &str, required: bool, format: &StringFormat) -> Result<(), Violation> {
    if required && value.is_empty() {
        return Err(Violation::EmptyString);
    }

    match format {
        StringFormat::None => Ok(()),
        // An empty optional email still has to look like an address.
        StringFormat::Email if !EMAIL_RE.is_match(value) => Err(Violation::InvalidEmail),
        StringFormat::Email => Ok(()),
        StringFormat::Url if !value.is_empty() && url::Url::parse(value).is_err() => {
            Err(Violation::InvalidUrl)
        }
        StringFormat::Url => Ok(()),
        StringFormat::Uuid if !value.is_empty() && !UUID_RE.is_match(value) => {
            Err(Violation::InvalidUuid)
        }
        StringFormat::Uuid => Ok(()),
        // User patterns may use lookaround and backreferences.
        StringFormat::Pattern(pattern) => {
            match fancy_regex::Regex::new(pattern).and_then(|re| re.is_match(value)) {
                Ok(true) => Ok(()),
                Ok(false) => Err(Violation::PatternMismatch(pattern.clone())),
                Err(_) => Err(Violation::InvalidPattern(pattern.clone())),
            }
        }
    }
}

fn check_number(value: Option<f64>, required: bool, check: &NumberCheck) -> Result<(), Violation> {
    let value = match value {
        None if required => return Err(Violation::MissingNumber),
        None => return Ok(()),
        Some(v) if v.is_nan() => return Err(Violation::NotANumber),
        Some(v) => v,
    };

    match *check {
        NumberCheck::None => Ok(()),
        NumberCheck::Min(min) if value < min => Err(Violation::BelowMin(min)),
        NumberCheck::Max(max) if value > max => Err(Violation::AboveMax(max)),
        NumberCheck::Range { min, max }
            if min.is_some_and(|min| value < min) || max.is_some_and(|max| value > max) =>
        {
            Err(Violation::OutOfRange {
                min: min.unwrap_or(f64::NEG_INFINITY),
                max: max.unwrap_or(f64::INFINITY),
            })
        }
        NumberCheck::Min(_) | NumberCheck::Max(_) | NumberCheck::Range { .. } => Ok(()),
    }
}

/// ISO-8601 dates and date-times (with or without offset) and RFC 2822.
fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
        || DateTime::parse_from_rfc2822(value).is_ok()
        || OFFSET_DATETIME_FORMATS
            .iter()
            .any(|fmt| DateTime::parse_from_str(value, fmt).is_ok())
        || NAIVE_DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
}
