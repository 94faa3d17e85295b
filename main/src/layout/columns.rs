//! Three-column message log layout: source, wrapped message, timestamp.

use chrono::{DateTime, Local};
use lcars_shared::{Message, Severity};

use crate::layout::{Measure, PanelMetrics};
use crate::theme;

/// Character budget of the source column.
const SOURCE_CHARS: usize = 20;
/// Truncation point: 17 kept characters plus the ellipsis.
const SOURCE_KEEP: usize = 17;

/// Wrap width is derived from an average glyph width sampled over a
/// representative string, not from a single character.
const GLYPH_SAMPLE: &str = "abcdefghijklmnopqrstuvwxyz ABCDEFGHIJKLMNOPQRSTUVWXYZ 0123456789";

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub source_x: f64,
    pub source_w: f64,
    pub message_x: f64,
    pub message_w: f64,
    pub time_x: f64,
    pub time_w: f64,
    pub wrap_chars: usize,
}

pub fn compute_columns(measure: &mut dyn Measure, metrics: &PanelMetrics) -> ColumnLayout {
    let viewport = metrics.viewport();
    let m_width = measure.text_size(&metrics.body_font, "M").width;

    let source_w =
        (0.25 * metrics.width).min(SOURCE_CHARS as f64 * m_width + theme::PADDING);
    let time_w = measure.text_size(&metrics.body_font, "00:00:00").width + theme::PADDING;

    let source_x = viewport.x;
    let time_x = viewport.x + viewport.w - time_w;
    let message_x = source_x + source_w + theme::PADDING;
    let message_w = (time_x - theme::PADDING - message_x).max(0.0);

    let sample = measure.text_size(&metrics.body_font, GLYPH_SAMPLE);
    let avg_glyph = sample.width / GLYPH_SAMPLE.chars().count() as f64;
    let wrap_chars = if avg_glyph > 0.0 {
        ((message_w / avg_glyph).floor() as usize).max(1)
    } else {
        1
    };

    ColumnLayout {
        source_x,
        source_w,
        message_x,
        message_w,
        time_x,
        time_w,
        wrap_chars,
    }
}

/// One rendered log line. Continuation lines from wrapping carry only the
/// message fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLine {
    pub source: Option<String>,
    pub fragment: String,
    pub time: Option<String>,
    pub severity: Severity,
}

/// Wraps the whole history and keeps the last `floor(viewport_h /
/// line_height)` lines: scroll-to-bottom, older lines dropped silently.
pub fn visible_lines(
    messages: &[Message],
    columns: &ColumnLayout,
    viewport_h: f64,
    line_height: f64,
    relative: bool,
    now: DateTime<Local>,
) -> Vec<DisplayLine> {
    let mut lines = Vec::new();
    for msg in messages {
        let wrapped = wrap_text(&msg.text, columns.wrap_chars);
        for (i, fragment) in wrapped.into_iter().enumerate() {
            if i == 0 {
                lines.push(DisplayLine {
                    source: Some(truncate_source(&msg.source)),
                    fragment,
                    time: Some(format_time(&msg.timestamp, relative, &now)),
                    severity: msg.severity,
                });
            } else {
                lines.push(DisplayLine {
                    source: None,
                    fragment,
                    time: None,
                    severity: msg.severity,
                });
            }
        }
    }

    let capacity = if line_height > 0.0 {
        (viewport_h / line_height).floor() as usize
    } else {
        0
    };
    if lines.len() > capacity {
        lines.drain(..lines.len() - capacity);
    }
    lines
}

fn format_time(timestamp: &DateTime<Local>, relative: bool, now: &DateTime<Local>) -> String {
    if relative {
        let secs = (*now - *timestamp).num_seconds().max(0);
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    } else {
        timestamp.format("%H:%M:%S").to_string()
    }
}

fn truncate_source(source: &str) -> String {
    if source.chars().count() > SOURCE_CHARS {
        let head: String = source.chars().take(SOURCE_KEEP).collect();
        format!("{}...", head)
    } else {
        source.to_owned()
    }
}

/// Greedy word wrap to a character budget; words longer than a whole line
/// are hard-split. Always yields at least one line.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let wlen = word.chars().count();
        let sep = if current_len == 0 { 0 } else { 1 };
        if current_len + sep + wlen <= width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_len += sep + wlen;
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if wlen <= width {
            current = word.to_owned();
            current_len = wlen;
        } else {
            let chars: Vec<char> = word.chars().collect();
            let mut start = 0;
            while chars.len() - start > width {
                lines.push(chars[start..start + width].iter().collect());
                start += width;
            }
            current = chars[start..].iter().collect();
            current_len = chars.len() - start;
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
