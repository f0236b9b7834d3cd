//! Time, currency and markup helpers shared by the renderer and the audit.
//!
//! Timestamps in a date plan are wall-clock times at a fixed UTC+9 offset.
//! Nothing here consults the host timezone.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Accepted wall-clock layouts, `YYYY-MM-DD HH:MM` first.
const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// The fixed +09:00 offset every plan timestamp is read in.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Parse `YYYY-MM-DD HH:MM` as a naive wall-clock time.
pub fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Parse `YYYY-MM-DD HH:MM` as a JST instant.
pub fn parse_local(text: &str) -> Option<DateTime<FixedOffset>> {
    let naive = parse_naive(text)?;
    jst().from_local_datetime(&naive).single()
}

/// `M月D日 HH:MM` for the meta strip; the raw text when it does not parse.
pub fn format_meta_time(text: &str) -> String {
    match parse_local(text) {
        Some(time) => time.format("%-m月%-d日 %H:%M").to_string(),
        None => text.to_string(),
    }
}

/// `HH:MM` for itinerary rows; the part after the first space when it does
/// not parse.
pub fn format_item_time(text: &str) -> String {
    match parse_local(text) {
        Some(time) => time.format("%H:%M").to_string(),
        None => match text.split_once(' ') {
            Some((_, rest)) => rest.to_string(),
            None => text.to_string(),
        },
    }
}

/// `YYYY-MM-DD` rendered as `M月D日`; the raw text when it does not parse.
pub fn format_date(text: &str) -> String {
    match chrono::NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%-m月%-d日").to_string(),
        Err(_) => text.to_string(),
    }
}

/// Serialize back to the wire layout.
pub fn to_wire(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_yen(value: u64) -> String {
    format!("¥{}", group_thousands(value))
}

/// Escape HTML special characters
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
