//! Caller-supplied structured fields and their sanitization.
//!
//! Records own a handful of names (`message`, `asctime`, the top-level keys
//! of the structured line, ...). A caller passing one of those as an extra
//! field gets it renamed with [`RESERVED_PREFIX`] instead of clobbering the
//! record.

use serde_json::Value;

/// Ordered mapping of field name to JSON value.
pub type Fields = serde_json::Map<String, Value>;

/// Prefix prepended to reserved names found in caller fields.
pub const RESERVED_PREFIX: &str = "log_";

/// Names owned by the log record itself.
pub const RESERVED_KEYS: &[&str] = &[
    "name",
    "msg",
    "args",
    "levelname",
    "levelno",
    "pathname",
    "filename",
    "module",
    "exc_info",
    "exc_text",
    "stack_info",
    "lineno",
    "funcName",
    "created",
    "msecs",
    "relativeCreated",
    "thread",
    "threadName",
    "processName",
    "process",
    "taskName",
    "message",
    "asctime",
    "timestamp",
    "severityText",
    "body",
    "attributes",
    "resource",
];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Extra fields were given as something other than a mapping.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtraError {
    #[error("extra fields must be a mapping, got {kind}")]
    NotAMapping { kind: &'static str },
}

/// Extra fields argument accepted by the [`Logger`](crate::logger::Logger)
/// methods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extra(Option<Value>);

impl Extra {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn as_value(&self) -> Option<&Value> {
        self.0.as_ref()
    }
}

impl From<Value> for Extra {
    fn from(value: Value) -> Self {
        Self(Some(value))
    }
}

impl From<Option<Value>> for Extra {
    fn from(value: Option<Value>) -> Self {
        Self(value)
    }
}

impl From<Fields> for Extra {
    fn from(fields: Fields) -> Self {
        Self(Some(Value::Object(fields)))
    }
}

/// Copy `extra` into a [`Fields`] map with every reserved key renamed.
///
/// `None`, JSON `null` and `{}` all give an empty map. Values are never
/// inspected, so `null`, `false`, `0` and `""` pass through as-is. Anything
/// that is not a JSON object is reported as [`ExtraError::NotAMapping`]
/// rather than panicking; what to do with it is the caller's decision.
pub fn sanitize_extra(extra: Option<&Value>) -> Result<Fields, ExtraError> {
    match extra {
        None | Some(Value::Null) => Ok(Fields::new()),
        Some(Value::Object(map)) => Ok(sanitize_fields(map.clone())),
        Some(other) => Err(ExtraError::NotAMapping {
            kind: value_kind(other),
        }),
    }
}

/// Rename reserved keys of an owned map.
///
/// Non-reserved keys keep their position. A renamed key goes to the end,
/// unless the caller already supplied the prefixed name, in which case the
/// caller's value is kept and the reserved entry is dropped.
pub fn sanitize_fields(fields: Fields) -> Fields {
    if !fields.keys().any(|key| is_reserved(key)) {
        return fields;
    }

    let mut clean = Fields::with_capacity(fields.len());
    let mut renamed = Vec::new();
    for (key, value) in fields {
        if is_reserved(&key) {
            renamed.push((format!("{RESERVED_PREFIX}{key}"), value));
        } else {
            clean.insert(key, value);
        }
    }
    for (key, value) in renamed {
        clean.entry(key).or_insert(value);
    }
    clean
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
