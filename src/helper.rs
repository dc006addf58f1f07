use chrono::{Local, TimeZone, Utc};
use log::{trace, warn};
use serde_json::Value;

use crate::PrayerRecord;

/// Parses the persisted journal.
///
/// A document that is not a JSON array yields an empty journal. Inside an array,
/// each record is decoded on its own and entries that do not fit the record shape
/// are skipped. Failures are logged, never returned.
pub fn parse_history(raw: &str) -> Vec<PrayerRecord> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            warn!("History is not an array ({}), treating it as empty", kind(&other));
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to parse history, treating it as empty: {}", e);
            return Vec::new();
        }
    };

    let total = entries.len();
    let records: Vec<PrayerRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping unreadable history entry {}: {}", index, e);
                None
            }
        })
        .collect();
    trace!("Parsed {} of {} records", records.len(), total);
    records
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Sorts records newest first (by creation timestamp)
pub fn sort_newest_first(records: &mut [PrayerRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Formats an epoch-millisecond instant in local time
pub fn format_millis(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => millis.to_string(),
    }
}

/// Splits prayer text into sentences, keeping the closing punctuation.
///
/// Trailing text without closing punctuation is dropped unless the text has no
/// complete sentence at all, in which case the whole text is returned.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut in_terminator = false;

    for c in text.chars() {
        let is_terminator = matches!(c, '.' | '!' | '?');
        if in_terminator && !is_terminator {
            sentences.push(std::mem::take(&mut current));
        }
        current.push(c);
        in_terminator = is_terminator && current.chars().any(|c| !matches!(c, '.' | '!' | '?'));
    }
    if in_terminator {
        sentences.push(current);
    }

    if sentences.is_empty() {
        vec![text.to_string()]
    } else {
        sentences
    }
}

/// First line of `content`, cut to at most `max_chars` characters
pub fn preview(content: &str, max_chars: usize) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prayer::fixtures::record;

    #[test]
    fn parse_history_accepts_array() {
        let raw = serde_json::to_string(&vec![record("a", 1), record("b", 2)]).unwrap();
        let parsed = parse_history(&raw);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "a");
    }

    #[test]
    fn parse_history_swallows_garbage() {
        assert!(parse_history("").is_empty());
        assert!(parse_history("null").is_empty());
        assert!(parse_history("{\"id\": 1}").is_empty());
        assert!(parse_history("[{\"id\": \"only-id\"}]").is_empty());
    }

    #[test]
    fn parse_history_keeps_good_records_next_to_bad_ones() {
        let mut bad = serde_json::to_value(record("bad", 1)).unwrap();
        bad["language"] = serde_json::json!("de");
        let good = serde_json::to_value(record("good", 2)).unwrap();
        let raw = serde_json::to_string(&vec![bad, serde_json::json!(42), good]).unwrap();

        let parsed = parse_history(&raw);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "good");
    }

    #[test]
    fn sorts_newest_first() {
        let mut records = vec![record("old", 1), record("new", 3), record("mid", 2)];
        sort_newest_first(&mut records);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn splits_sentences_keeping_punctuation() {
        let parts = split_sentences("Lord, hear me. Give me rest! Will You stay?");
        assert_eq!(parts, vec!["Lord, hear me.", " Give me rest!", " Will You stay?"]);
    }

    #[test]
    fn keeps_runs_of_punctuation_together() {
        assert_eq!(split_sentences("Wait... Amen!"), vec!["Wait...", " Amen!"]);
    }

    #[test]
    fn unterminated_text_is_returned_whole() {
        assert_eq!(split_sentences("Amen"), vec!["Amen"]);
    }

    #[test]
    fn preview_cuts_long_lines() {
        assert_eq!(preview("short\nsecond", 10), "short");
        assert_eq!(preview("a very long first line", 6), "a very...");
    }
}
