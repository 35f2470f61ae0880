//! Field descriptors — one configured validation rule plus the value it checks.
//!
//! The host stores descriptors as flat camelCase records where every
//! type-specific payload is optional. [`FieldDescriptor`] deserializes from
//! that shape and keeps only the payload that matters for its
//! `validationType`, so a number rule can never carry string data.

use serde::Deserialize;
use serde_json::Value;

/// One field to validate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawFieldDescriptor")]
pub struct FieldDescriptor {
    /// Label copied into error records. `None` leaves them unlabelled.
    pub name: Option<String>,
    /// An empty or missing value is an error when set.
    pub required: bool,
    pub rule: FieldRule,
}

/// Per-type payload and sub-checks.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    String { value: String, format: StringFormat },
    /// `Some(NaN)` marks a value that was present but not numeric.
    Number { value: Option<f64>, check: NumberCheck },
    Boolean { value: Option<bool> },
    Date { value: String },
    Enum { value: String, allowed: Vec<String> },
}

/// Format check applied to `string` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringFormat {
    None,
    Email,
    Url,
    Uuid,
    /// Regular expression searched for anywhere in the value.
    Pattern(String),
}

/// Bound check applied to `number` fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberCheck {
    None,
    Min(f64),
    Max(f64),
    /// At least one bound is set; a missing bound is unbounded.
    Range { min: Option<f64>, max: Option<f64> },
}

impl FieldDescriptor {
    /// Build a descriptor without going through the wire format.
    pub fn new(name: Option<&str>, required: bool, rule: FieldRule) -> Self {
        Self {
            name: name.map(str::to_owned),
            required,
            rule,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ValidationType {
    String,
    Number,
    Boolean,
    Date,
    Enum,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StringFormatKind {
    #[default]
    None,
    Email,
    Url,
    Uuid,
    Pattern,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NumberCheckKind {
    #[default]
    None,
    Min,
    Max,
    Range,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFieldDescriptor {
    #[serde(default)]
    name: Option<String>,
    validation_type: ValidationType,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    string_data: Option<String>,
    #[serde(default)]
    number_data: Option<Value>,
    #[serde(default)]
    boolean_data: Option<bool>,
    #[serde(default)]
    date_data: Option<String>,
    #[serde(default)]
    enum_values: Option<String>,
    #[serde(default)]
    string_format: Option<StringFormatKind>,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    use_regex: Option<bool>,
    #[serde(default)]
    number_validation_type: Option<NumberCheckKind>,
    #[serde(default)]
    min_value: Option<f64>,
    #[serde(default)]
    max_value: Option<f64>,
}

impl From<RawFieldDescriptor> for FieldDescriptor {
    fn from(raw: RawFieldDescriptor) -> Self {
        let rule = match raw.validation_type {
            ValidationType::String => FieldRule::String {
                value: raw.string_data.unwrap_or_default(),
                format: string_format(
                    raw.string_format.unwrap_or_default(),
                    raw.pattern,
                    raw.use_regex,
                ),
            },
            ValidationType::Number => FieldRule::Number {
                value: raw.number_data.as_ref().and_then(number_value),
                check: number_check(
                    raw.number_validation_type.unwrap_or_default(),
                    raw.min_value,
                    raw.max_value,
                ),
            },
            ValidationType::Boolean => FieldRule::Boolean {
                value: raw.boolean_data,
            },
            ValidationType::Date => FieldRule::Date {
                value: raw.date_data.unwrap_or_default(),
            },
            ValidationType::Enum => FieldRule::Enum {
                value: raw.string_data.unwrap_or_default(),
                allowed: raw
                    .enum_values
                    .unwrap_or_default()
                    .split(',')
                    .map(|v| v.trim().to_owned())
                    .collect(),
            },
        };

        Self {
            name: raw.name.filter(|n| !n.trim().is_empty()),
            required: raw.required,
            rule,
        }
    }
}

fn string_format(
    kind: StringFormatKind,
    pattern: Option<String>,
    use_regex: Option<bool>,
) -> StringFormat {
    match kind {
        StringFormatKind::None => StringFormat::None,
        StringFormatKind::Email => StringFormat::Email,
        StringFormatKind::Url => StringFormat::Url,
        StringFormatKind::Uuid => StringFormat::Uuid,
        StringFormatKind::Pattern => match pattern {
            Some(p) if !p.is_empty() && use_regex != Some(false) => StringFormat::Pattern(p),
            _ => StringFormat::None,
        },
    }
}

/// A check whose bounds are all missing is no check.
fn number_check(kind: NumberCheckKind, min: Option<f64>, max: Option<f64>) -> NumberCheck {
    match (kind, min, max) {
        (NumberCheckKind::Min, Some(min), _) => NumberCheck::Min(min),
        (NumberCheckKind::Max, _, Some(max)) => NumberCheck::Max(max),
        (NumberCheckKind::Range, min, max) if min.is_some() || max.is_some() => {
            NumberCheck::Range { min, max }
        }
        _ => NumberCheck::None,
    }
}

/// `None` for null or blank input, `Some(NaN)` for anything non-numeric.
fn number_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::Null => None,
        Value::Number(n) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().parse().unwrap_or(f64::NAN)),
        _ => Some(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> FieldDescriptor {
        serde_json::from_value(value).expect("descriptor should deserialize")
    }

    #[test]
    fn string_descriptor_keeps_only_string_payload() {
        let field = parse(json!({
            "name": "email",
            "validationType": "string",
            "required": true,
            "stringData": "a@b.com",
            "numberData": 3,
            "stringFormat": "email"
        }));
        assert_eq!(field.name.as_deref(), Some("email"));
        assert!(field.required);
        assert_eq!(
            field.rule,
            FieldRule::String { value: "a@b.com".into(), format: StringFormat::Email }
        );
    }

    #[test]
    fn missing_optional_keys_take_defaults() {
        let field = parse(json!({ "validationType": "date" }));
        assert_eq!(field.name, None);
        assert!(!field.required);
        assert_eq!(field.rule, FieldRule::Date { value: String::new() });
    }

    #[test]
    fn pattern_requires_text_and_is_gated_by_use_regex() {
        let on = parse(json!({
            "validationType": "string", "stringFormat": "pattern", "pattern": "^a"
        }));
        assert!(matches!(on.rule, FieldRule::String { format: StringFormat::Pattern(ref p), .. } if p == "^a"));

        let off = parse(json!({
            "validationType": "string", "stringFormat": "pattern",
            "pattern": "^a", "useRegex": false
        }));
        assert!(matches!(off.rule, FieldRule::String { format: StringFormat::None, .. }));

        let empty = parse(json!({
            "validationType": "string", "stringFormat": "pattern", "pattern": ""
        }));
        assert!(matches!(empty.rule, FieldRule::String { format: StringFormat::None, .. }));
    }

    #[test]
    fn enum_values_are_split_and_trimmed() {
        let field = parse(json!({
            "validationType": "enum", "stringData": "red", "enumValues": " red, green ,blue"
        }));
        assert_eq!(
            field.rule,
            FieldRule::Enum {
                value: "red".into(),
                allowed: vec!["red".into(), "green".into(), "blue".into()],
            }
        );
    }

    #[test]
    fn number_data_accepts_numbers_and_numeric_strings() {
        let cases = [
            (json!(5), Some(5.0)),
            (json!("7.5"), Some(7.5)),
            (json!(" "), None),
            (Value::Null, None),
        ];
        for (raw, expected) in cases {
            let field = parse(json!({ "validationType": "number", "numberData": raw }));
            match field.rule {
                FieldRule::Number { value, .. } => assert_eq!(value, expected),
                other => panic!("unexpected rule {other:?}"),
            }
        }

        let field = parse(json!({ "validationType": "number", "numberData": "abc" }));
        assert!(matches!(field.rule, FieldRule::Number { value: Some(v), .. } if v.is_nan()));
    }

    #[test]
    fn half_open_range_keeps_range_check() {
        let field = parse(json!({
            "validationType": "number", "numberData": 1,
            "numberValidationType": "range", "minValue": 2
        }));
        assert_eq!(
            field.rule,
            FieldRule::Number {
                value: Some(1.0),
                check: NumberCheck::Range { min: Some(2.0), max: None },
            }
        );

        let field = parse(json!({
            "validationType": "number", "numberData": 1, "numberValidationType": "range"
        }));
        assert!(matches!(field.rule, FieldRule::Number { check: NumberCheck::None, .. }));

        let field = parse(json!({
            "validationType": "number", "numberData": 1, "numberValidationType": "min"
        }));
        assert!(matches!(field.rule, FieldRule::Number { check: NumberCheck::None, .. }));
    }

    #[test]
    fn blank_name_is_treated_as_unnamed() {
        for name in ["", "   "] {
            let field = parse(json!({ "name": name, "validationType": "boolean" }));
            assert_eq!(field.name, None, "{name:?}");
        }
        let field = parse(json!({ "name": " age ", "validationType": "boolean" }));
        assert_eq!(field.name.as_deref(), Some(" age "));
    }

    #[test]
    fn unknown_validation_type_is_rejected() {
        let err = serde_json::from_value::<FieldDescriptor>(json!({ "validationType": "color" }));
        assert!(err.is_err());
        let err = serde_json::from_value::<FieldDescriptor>(json!({ "name": "x" }));
        assert!(err.is_err());
    }
}
