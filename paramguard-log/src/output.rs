//! Record rendering to stderr.

use crate::{Format, Level, LogConfig, config, is_level_enabled};
use std::io::Write;

/// Structured key/value pairs attached to a record.
pub type Fields<'a> = &'a [(&'static str, String)];

/// Write a plain record.
#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    log_fields(level, target, message, &[]);
}

/// Write a record carrying structured fields.
#[doc(hidden)]
pub fn log_fields(level: Level, target: &str, message: &str, fields: Fields<'_>) {
    if !is_level_enabled(level) {
        return;
    }

    let config = config();
    let line = match config.format {
        Format::Pretty => pretty_line(level, target, message, fields, config),
        Format::Compact => compact_line(level, target, message, fields, config),
        Format::Json => json_line(level, target, message, fields),
    };

    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{}", line);
}

fn push_fields(line: &mut String, fields: Fields<'_>) {
    for (key, value) in fields {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(value);
    }
}

fn pretty_line(
    level: Level,
    target: &str,
    message: &str,
    fields: Fields<'_>,
    config: &LogConfig,
) -> String {
    let mut line = String::new();

    if config.timestamps {
        line.push_str(&chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f ").to_string());
    }

    #[cfg(feature = "color")]
    let level_text = if config.color {
        level.colored().to_string()
    } else {
        level.as_str().to_string()
    };
    #[cfg(not(feature = "color"))]
    let level_text = level.as_str().to_string();

    line.push_str(&format!("{:5} ", level_text));

    if !target.is_empty() {
        line.push_str(&format!("[{}] ", target));
    }

    line.push_str(message);
    push_fields(&mut line, fields);
    line
}

fn compact_line(
    level: Level,
    target: &str,
    message: &str,
    fields: Fields<'_>,
    config: &LogConfig,
) -> String {
    let mut line = String::new();

    if config.timestamps {
        line.push_str(&chrono::Local::now().format("%H:%M:%S ").to_string());
    }

    line.push(level.as_str().chars().next().unwrap_or('?'));
    line.push(' ');

    if !target.is_empty() {
        line.push_str(target);
        line.push_str(": ");
    }

    line.push_str(message);
    push_fields(&mut line, fields);
    line
}

#[cfg(feature = "json")]
fn json_line(level: Level, target: &str, message: &str, fields: Fields<'_>) -> String {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Record<'a> {
        timestamp: String,
        level: &'a str,
        target: &'a str,
        message: &'a str,
        #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
        fields: serde_json::Map<String, serde_json::Value>,
    }

    let record = Record {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: level.as_str(),
        target,
        message,
        fields: fields
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
            .collect(),
    };

    serde_json::to_string(&record).unwrap_or_else(|_| message.to_string())
}

#[cfg(not(feature = "json"))]
fn json_line(level: Level, target: &str, message: &str, fields: Fields<'_>) -> String {
    let mut line = format!(
        r#"{{"timestamp":"{}","level":"{}","target":"{}","message":"{}""#,
        chrono::Utc::now().to_rfc3339(),
        level.as_str(),
        escape_json(target),
        escape_json(message)
    );
    if !fields.is_empty() {
        let body = fields
            .iter()
            .map(|(k, v)| format!(r#""{}":"{}""#, escape_json(k), escape_json(v)))
            .collect::<Vec<_>>()
            .join(",");
        line.push_str(&format!(r#","fields":{{{}}}"#, body));
    }
    line.push('}');
    line
}

#[cfg(not(feature = "json"))]
fn escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => result.push_str(&format!("\\u{:04x}", c as u32)),
            c => result.push(c),
        }
    }
    result
}
