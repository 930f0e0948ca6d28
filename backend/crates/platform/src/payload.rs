//! JSON Payload Guard
//!
//! Strict checks on incoming JSON bodies before any route logic runs:
//! byte budget, object shape, nesting depth, injection patterns and
//! per-field constraints. Rejections carry the status the route should use
//! (413, 400 or 422) and never echo suspicious content.

use std::sync::OnceLock;

use axum::http::StatusCode;
use regex::RegexSet;
use serde_json::{Map, Value};
use thiserror::Error;

/// NoSQL operators, script injection, SQL fragments, path traversal, NUL.
const INJECTION_PATTERNS: &[&str] = &[
    r"(?i)\$where\b",
    r"(?i)\$\s*gt\b|\$\s*lt\b|\$\s*ne\b|\$\s*in\b|\$\s*regex\b",
    r"(?i)<\s*script[\s>]",
    r"(?i)javascript\s*:",
    r"(?i)on\w+\s*=",
    r"(?i)union\s+select\b",
    r"(?i)insert\s+into\b",
    r"(?i)drop\s+table\b",
    r";\s*--",
    r"\.\./",
    r"\x00",
];

fn injection_patterns() -> Option<&'static RegexSet> {
    static PATTERNS: OnceLock<Option<RegexSet>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| match RegexSet::new(INJECTION_PATTERNS) {
            Ok(set) => Some(set),
            Err(e) => {
                tracing::error!(error = %e, "Injection patterns failed to compile");
                None
            }
        })
        .as_ref()
}

/// True when `value` matches a known injection pattern.
///
/// Fails closed if the pattern set is unavailable.
pub fn contains_injection(value: &str) -> bool {
    injection_patterns().is_none_or(|set| set.is_match(value))
}

/// Expected JSON type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }

    /// Type name of a JSON value, `null` included.
    pub fn name_of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        Self::name_of(value) == self.as_str()
    }
}

/// Constraints for one top-level field
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    /// Max string length in characters
    pub max_length: Option<usize>,
    pub max_items: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldSchema {
    /// Required field of the given type with no further limits.
    pub fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
            max_length: None,
            max_items: None,
            min: None,
            max: None,
        }
    }

    pub fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    pub fn max_length(self, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..self
        }
    }

    pub fn max_items(self, max_items: usize) -> Self {
        Self {
            max_items: Some(max_items),
            ..self
        }
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..self
        }
    }
}

/// Validator options
#[derive(Debug, Clone)]
pub struct PayloadRules {
    /// Raw body budget in bytes (default 64 KiB)
    pub max_bytes: usize,
    /// Maximum nesting depth (default 8)
    pub max_depth: usize,
    pub fields: Vec<FieldSchema>,
    /// Scan every string value for injection patterns (default on)
    pub scan_injections: bool,
}

impl Default for PayloadRules {
    fn default() -> Self {
        Self {
            max_bytes: 65_536,
            max_depth: 8,
            fields: Vec::new(),
            scan_injections: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadError {
    #[error("Payload too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("JSON nesting exceeds maximum depth of {0}")]
    TooDeep(usize),

    #[error("Suspicious pattern detected in request payload")]
    Suspicious,

    #[error("Missing required field: \"{0}\"")]
    MissingField(&'static str),

    #[error("Field \"{name}\" must be of type {expected}, got {actual}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Field \"{name}\" exceeds max length of {max}")]
    TooLong { name: &'static str, max: usize },

    #[error("Field \"{name}\" exceeds max items of {max}")]
    TooManyItems { name: &'static str, max: usize },

    #[error("Field \"{name}\" must be ≥ {min}")]
    BelowMinimum { name: &'static str, min: f64 },

    #[error("Field \"{name}\" must be ≤ {max}")]
    AboveMaximum { name: &'static str, max: f64 },
}

impl PayloadError {
    /// Status the route should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            PayloadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            PayloadError::InvalidJson | PayloadError::NotAnObject | PayloadError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Validate a raw body and return the parsed top-level object
pub fn validate_payload(body: &[u8], rules: &PayloadRules) -> Result<Map<String, Value>, PayloadError> {
    if body.len() > rules.max_bytes {
        return Err(PayloadError::TooLarge {
            size: body.len(),
            max: rules.max_bytes,
        });
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| {
        // The parser gives up past its own recursion limit; report that as depth.
        if raw_nesting(body) > rules.max_depth + 1 {
            PayloadError::TooDeep(rules.max_depth)
        } else {
            PayloadError::InvalidJson
        }
    })?;
    let Value::Object(object) = value else {
        return Err(PayloadError::NotAnObject);
    };

    validate_object(object, rules)
}

/// Checks after parsing: depth, injections, fields
pub fn validate_object(
    object: Map<String, Value>,
    rules: &PayloadRules,
) -> Result<Map<String, Value>, PayloadError> {
    if object.values().any(|v| exceeds_depth(v, 1, rules.max_depth)) {
        return Err(PayloadError::TooDeep(rules.max_depth));
    }

    if rules.scan_injections && object.values().any(has_injection) {
        tracing::warn!("Suspicious pattern detected in request payload");
        return Err(PayloadError::Suspicious);
    }

    for schema in &rules.fields {
        check_field(&object, schema)?;
    }

    Ok(object)
}

fn exceeds_depth(value: &Value, depth: usize, max: usize) -> bool {
    if depth > max {
        return true;
    }
    match value {
        Value::Array(items) => items.iter().any(|v| exceeds_depth(v, depth + 1, max)),
        Value::Object(map) => map.values().any(|v| exceeds_depth(v, depth + 1, max)),
        _ => false,
    }
}

/// Deepest container nesting in raw JSON text, ignoring brackets inside strings.
fn raw_nesting(body: &[u8]) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for &byte in body {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

fn has_injection(value: &Value) -> bool {
    match value {
        Value::String(s) => contains_injection(s),
        Value::Array(items) => items.iter().any(has_injection),
        Value::Object(map) => map.values().any(has_injection),
        _ => false,
    }
}

fn check_field(object: &Map<String, Value>, schema: &FieldSchema) -> Result<(), PayloadError> {
    let value = match object.get(schema.name) {
        None | Some(Value::Null) if schema.required => {
            return Err(PayloadError::MissingField(schema.name));
        }
        None | Some(Value::Null) => return Ok(()),
        Some(value) => value,
    };

    if !schema.field_type.matches(value) {
        return Err(PayloadError::WrongType {
            name: schema.name,
            expected: schema.field_type.as_str(),
            actual: FieldType::name_of(value),
        });
    }

    match value {
        Value::String(s) => {
            if let Some(max) = schema.max_length
                && s.chars().count() > max
            {
                return Err(PayloadError::TooLong {
                    name: schema.name,
                    max,
                });
            }
        }
        Value::Number(n) => {
            let n = n.as_f64().unwrap_or(f64::NAN);
            if let Some(min) = schema.min
                && n < min
            {
                return Err(PayloadError::BelowMinimum {
                    name: schema.name,
                    min,
                });
            }
            if let Some(max) = schema.max
                && n > max
            {
                return Err(PayloadError::AboveMaximum {
                    name: schema.name,
                    max,
                });
            }
        }
        Value::Array(items) => {
            if let Some(max) = schema.max_items
                && items.len() > max
            {
                return Err(PayloadError::TooManyItems {
                    name: schema.name,
                    max,
                });
            }
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_rules() -> PayloadRules {
        PayloadRules {
            max_bytes: 8192,
            fields: vec![FieldSchema::required("target", FieldType::String).max_length(253)],
            ..Default::default()
        }
    }

    #[test]
    fn test_accepts_valid_body() {
        let object = validate_payload(br#"{"target":"example.com"}"#, &target_rules()).unwrap();
        assert_eq!(object["target"], "example.com");
    }

    #[test]
    fn test_size_checked_before_parsing() {
        let body = vec![b'x'; 8193];
        let err = validate_payload(&body, &target_rules()).unwrap_err();
        assert_eq!(err, PayloadError::TooLarge { size: 8193, max: 8192 });
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.to_string(), "Payload too large: 8193 bytes (max 8192)");
    }

    #[test]
    fn test_shape_errors_are_bad_requests() {
        let rules = target_rules();
        assert_eq!(validate_payload(b"{oops", &rules), Err(PayloadError::InvalidJson));
        assert_eq!(validate_payload(b"[1,2]", &rules), Err(PayloadError::NotAnObject));
        assert_eq!(validate_payload(b"null", &rules), Err(PayloadError::NotAnObject));
        let err = validate_payload(b"{}", &rules).unwrap_err();
        assert_eq!(err, PayloadError::MissingField("target"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            validate_payload(br#"{"target":null}"#, &rules),
            Err(PayloadError::MissingField("target"))
        );
    }

    #[test]
    fn test_type_and_length() {
        let rules = target_rules();
        let err = validate_payload(br#"{"target":42}"#, &rules).unwrap_err();
        assert_eq!(err.to_string(), "Field \"target\" must be of type string, got number");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let long = format!(r#"{{"target":"{}"}}"#, "a".repeat(254));
        assert_eq!(
            validate_payload(long.as_bytes(), &rules),
            Err(PayloadError::TooLong { name: "target", max: 253 })
        );
        let exact = format!(r#"{{"target":"{}"}}"#, "a".repeat(253));
        assert!(validate_payload(exact.as_bytes(), &rules).is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let rules = PayloadRules::default();
        let nested = |levels: usize| format!("{}1{}", r#"{"a":"#.repeat(levels), "}".repeat(levels));
        // the innermost scalar sits at depth `levels`
        assert!(validate_payload(nested(8).as_bytes(), &rules).is_ok());
        assert_eq!(
            validate_payload(nested(9).as_bytes(), &rules),
            Err(PayloadError::TooDeep(8))
        );
    }

    #[test]
    fn test_nesting_beyond_parser_limit_is_too_deep() {
        let body = format!(
            r#"{{"target":"example.com","x":{}{}}}"#,
            "[".repeat(200),
            "]".repeat(200)
        );
        assert!(body.len() < 8192);
        let err = validate_payload(body.as_bytes(), &target_rules()).unwrap_err();
        assert_eq!(err, PayloadError::TooDeep(8));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_raw_nesting_skips_strings() {
        assert_eq!(raw_nesting(br#"{"a":"[[[{{","b":[1]}"#), 2);
        assert_eq!(raw_nesting(br#"{"a":"\"[[","b":{}}"#), 2);
        assert_eq!(raw_nesting(b"{oops"), 1);
    }

    #[test]
    fn test_injection_patterns() {
        for bad in [
            "<script>alert(1)</script>",
            "JavaScript:void(0)",
            "x\" onerror=alert(1)",
            "1 UNION SELECT password",
            "'; -- ",
            "../../etc/passwd",
            "{\"$where\": \"1\"}",
            "$ne",
            "a\u{0}b",
        ] {
            assert!(contains_injection(bad), "{bad}");
        }
        for good in ["example.com", "192.168.1.10", "my-host.internal", "select a table"] {
            assert!(!contains_injection(good), "{good}");
        }
    }

    #[test]
    fn test_injection_found_in_nested_values() {
        let body = br#"{"target":"example.com","meta":{"tags":["ok","<script >"]}}"#;
        assert_eq!(validate_payload(body, &target_rules()), Err(PayloadError::Suspicious));

        let rules = PayloadRules {
            scan_injections: false,
            ..target_rules()
        };
        assert!(validate_payload(body, &rules).is_ok());
    }

    #[test]
    fn test_optional_and_numeric_fields() {
        let rules = PayloadRules {
            fields: vec![
                FieldSchema::required("limit", FieldType::Number).range(1.0, 50.0).optional(),
                FieldSchema::required("ids", FieldType::Array).max_items(2).optional(),
            ],
            ..Default::default()
        };
        assert!(validate_payload(b"{}", &rules).is_ok());
        assert_eq!(
            validate_payload(br#"{"limit":0}"#, &rules),
            Err(PayloadError::BelowMinimum { name: "limit", min: 1.0 })
        );
        assert_eq!(
            validate_payload(br#"{"limit":51}"#, &rules),
            Err(PayloadError::AboveMaximum { name: "limit", max: 50.0 })
        );
        assert_eq!(
            validate_payload(br#"{"ids":[1,2,3]}"#, &rules),
            Err(PayloadError::TooManyItems { name: "ids", max: 2 })
        );
    }
}
