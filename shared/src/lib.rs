use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Deserialize;

/// Importance classification of a panel message; selects its render color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Control,
    Warning,
    Error,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Info
    }
}

impl Severity {
    /// Unknown tags fall back to `Info`, the original wire values are
    /// lowercase words.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "control" => Severity::Control,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            _ => Severity::Info,
        }
    }
}

/// A single entry of the panel's message history. Never mutated after
/// creation.
#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub source: String,
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
    pub topic: String,
}

/// Structured wire payload. Only `message` is mandatory; everything else
/// has a substitute.
#[derive(Debug, Deserialize)]
struct MessagePayload {
    message: Option<String>,
    source: Option<String>,
    importance: Option<String>,
    timestamp: Option<String>,
}

impl Message {
    /// Builds a message from a raw MQTT payload.
    ///
    /// A JSON object is treated as a structured record; one that omits the
    /// mandatory `message` field is dropped (`None`). Anything else is
    /// taken verbatim as message text with the source derived from the
    /// topic suffix.
    pub fn from_payload(topic: &str, payload: &[u8]) -> Option<Message> {
        let payload_str = String::from_utf8_lossy(payload);

        match serde_json::from_str::<serde_json::Value>(&payload_str) {
            Ok(value) if value.is_object() => {
                let record: MessagePayload = match serde_json::from_value(value) {
                    Ok(r) => r,
                    Err(e) => {
                        log::warn!("Dropping unreadable record from {}: {}", topic, e);
                        return None;
                    }
                };
                let text = match record.message {
                    Some(t) => t,
                    None => {
                        log::warn!(
                            "Dropping record from {} missing mandatory 'message' field",
                            topic
                        );
                        return None;
                    }
                };

                Some(Message {
                    text,
                    source: record.source.unwrap_or_else(|| "Unknown".to_owned()),
                    severity: record
                        .importance
                        .as_deref()
                        .map(Severity::from_tag)
                        .unwrap_or_default(),
                    timestamp: record
                        .timestamp
                        .as_deref()
                        .and_then(parse_timestamp)
                        .unwrap_or_else(Local::now),
                    topic: topic.to_owned(),
                })
            }
            _ => Some(Message {
                text: payload_str.into_owned(),
                source: topic_suffix(topic).to_owned(),
                severity: Severity::Info,
                timestamp: Local::now(),
                topic: topic.to_owned(),
            }),
        }
    }
}

/// Last segment of an MQTT topic path, used as the source label for
/// unstructured payloads.
pub fn topic_suffix(topic: &str) -> &str {
    topic.rsplit('/').next().unwrap_or(topic)
}

fn parse_timestamp(input: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local));
    }
    // Timestamps without an offset are taken as local time.
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Local.from_local_datetime(&naive).single();
    }
    None
}
