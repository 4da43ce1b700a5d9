use crate::fields::Fields;
use crate::record::{LogRecord, ServiceContext};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Renders a finished [`LogRecord`] into a single output line.
///
/// The returned string carries no trailing newline; sinks add it. A
/// formatter must always produce a line, degrading to best-effort text
/// instead of failing the emission.
pub trait RecordFormatter: Send + Sync {
    fn format(&self, record: &LogRecord, context: &ServiceContext) -> String;
}

/// Which formatter a logger uses. One per logger; all of its sinks share it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Structured,
}

impl LogFormat {
    pub fn formatter(self) -> Box<dyn RecordFormatter> {
        match self {
            LogFormat::Text => Box::new(TextFormatter),
            LogFormat::Structured => Box::new(StructuredFormatter),
        }
    }
}

/// Newline-delimited JSON documents with OpenTelemetry-style keys.
///
/// ```text
/// {"timestamp":"2024-05-01T12:00:00.000Z","severityText":"INFO","body":"msg","attributes":{..},"resource":{"service.name":..,"deployment.environment":..,"service.version":..}}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredFormatter;

impl RecordFormatter for StructuredFormatter {
    fn format(&self, record: &LogRecord, context: &ServiceContext) -> String {
        let mut line = Fields::with_capacity(5);
        line.insert(
            "timestamp".to_string(),
            Value::String(record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        line.insert(
            "severityText".to_string(),
            Value::String(record.severity.as_str().to_string()),
        );
        line.insert("body".to_string(), Value::String(record.body()));
        line.insert(
            "attributes".to_string(),
            Value::Object(record.attributes.clone()),
        );
        line.insert("resource".to_string(), resource(context));
        Value::Object(line).to_string()
    }
}

fn resource(context: &ServiceContext) -> Value {
    let mut resource = Fields::with_capacity(3);
    resource.insert(
        "service.name".to_string(),
        Value::String(context.service_name.clone()),
    );
    resource.insert(
        "deployment.environment".to_string(),
        Value::String(context.environment.clone()),
    );
    resource.insert(
        "service.version".to_string(),
        Value::String(context.service_version.clone()),
    );
    Value::Object(resource)
}

/// Plain text lines: `<timestamp> [<LEVEL>] <logger>: <message> key=value ...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl RecordFormatter for TextFormatter {
    fn format(&self, record: &LogRecord, _context: &ServiceContext) -> String {
        let mut line = format!(
            "{} [{}] {}: {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.severity,
            record.logger,
            record.body()
        );
        for (key, value) in &record.attributes {
            line.push(' ');
            push_text(&mut line, key);
            line.push('=');
            match value {
                Value::String(s) => push_text(&mut line, s),
                other => line.push_str(&other.to_string()),
            }
        }
        line
    }
}

// Keys and string values are written bare when that keeps `key=value`
// splitting unambiguous, otherwise as JSON strings.
fn push_text(line: &mut String, s: &str) {
    if is_bare(s) {
        line.push_str(s);
    } else {
        line.push_str(&Value::String(s.to_string()).to_string());
    }
}

fn is_bare(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '=' || c == '"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Severity;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn record(attributes: Value) -> LogRecord {
        let Value::Object(attributes) = attributes else {
            panic!("attributes must be an object");
        };
        LogRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap()
                + chrono::Duration::milliseconds(7),
            severity: Severity::Info,
            logger: "orders".into(),
            module_path: None,
            file: None,
            line: None,
            message: "order placed".into(),
            error: None,
            attributes,
        }
    }

    fn context() -> ServiceContext {
        ServiceContext::new("shop", "production", "1.2.3")
    }

    #[test]
    fn structured_line_has_fixed_shape() {
        let line = StructuredFormatter.format(&record(json!({"user_id": 5})), &context());

        assert_eq!(
            line,
            r#"{"timestamp":"2024-05-01T12:30:45.007Z","severityText":"INFO","body":"order placed","attributes":{"user_id":5},"resource":{"service.name":"shop","deployment.environment":"production","service.version":"1.2.3"}}"#
        );
    }

    #[test]
    fn structured_attributes_keep_insertion_order() {
        let line = StructuredFormatter.format(&record(json!({"zeta": 1, "alpha": 2})), &context());
        let zeta = line.find("zeta").unwrap();
        let alpha = line.find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn structured_body_includes_error_chain() {
        let mut rec = record(json!({}));
        rec.error = Some("disk full".into());
        let line = StructuredFormatter.format(&rec, &context());
        let doc: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(doc["body"], "order placed\ndisk full");
    }

    #[test]
    fn text_line_appends_extras_in_order() {
        let rec = record(json!({"user_id": 5, "action": "login", "note": "two words", "ok": true}));
        let line = TextFormatter.format(&rec, &context());
        assert_eq!(
            line,
            r#"2024-05-01 12:30:45.007 [INFO] orders: order placed user_id=5 action=login note="two words" ok=true"#
        );
    }

    #[test]
    fn text_line_without_extras_has_no_trailing_space() {
        let line = TextFormatter.format(&record(json!({})), &context());
        assert_eq!(line, "2024-05-01 12:30:45.007 [INFO] orders: order placed");
    }

    #[test]
    fn text_empty_string_is_quoted() {
        let line = TextFormatter.format(&record(json!({"empty": ""})), &context());
        assert!(line.ends_with(r#"empty="""#));
    }

    #[test]
    fn text_keys_cannot_forge_pairs() {
        let rec = record(json!({"user id=5 admin": "true", "plain": "x"}));
        let line = TextFormatter.format(&rec, &context());
        assert!(line.ends_with(r#"order placed "user id=5 admin"=true plain=x"#));
    }

    #[test]
    fn structured_line_escapes_control_characters() {
        let mut rec = record(json!({"note": "a\nb"}));
        rec.message = "line one\nline \"two\"".into();
        let line = StructuredFormatter.format(&rec, &context());

        assert!(!line.contains('\n'));
        let doc: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(doc["body"], "line one\nline \"two\"");
        assert_eq!(doc["attributes"]["note"], "a\nb");
    }

    #[test]
    fn log_format_deserializes_lowercase() {
        let format: LogFormat = serde_json::from_str(r#""structured""#).unwrap();
        assert_eq!(format, LogFormat::Structured);
    }
}
