//! Locate an embedded date plan payload in free-form assistant text.
//!
//! The matchers in [`STRATEGIES`] run in order and the first one that finds a
//! candidate substring wins. Only a failure to *find* a candidate advances the
//! cascade: once a candidate exists it is parsed exactly once, and a parse or
//! shape failure ends extraction with `None`.

mod strategies;

pub use strategies::{balanced_braces, fenced_block, tagged_json, Strategy, STRATEGIES};

use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    schemas::Validator,
    types::{DatePlanResponse, ExtractedPayload},
};

/// Options for turning a discriminated payload into its typed form
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub validator: Validator,
}

/// Extract a typed date plan from message text using lenient validation.
pub fn extract(text: &str) -> Option<DatePlanResponse> {
    extract_with(text, ExtractOptions::default())
}

pub fn extract_with(text: &str, options: ExtractOptions) -> Option<DatePlanResponse> {
    let payload = extract_value(text)?;
    match payload.deserialize::<DatePlanResponse>(options.validator) {
        Ok(response) => Some(response),
        Err(err) => {
            debug!(
                target: "dateplan::extract",
                strategy = payload.strategy().name(),
                error = %err,
                "payload passed the shape check but not typed conversion"
            );
            None
        }
    }
}

/// Extract the raw JSON object, unchanged, once it passes the shape discriminator.
pub fn extract_value(text: &str) -> Option<ExtractedPayload> {
    let (strategy, candidate) = find_candidate(text)?;
    let candidate = trim_candidate(candidate);

    let value: Value = match serde_json::from_str(candidate) {
        Ok(value) => value,
        Err(err) => {
            debug!(
                target: "dateplan::extract",
                strategy = strategy.name(),
                error = %err,
                "candidate is not valid JSON"
            );
            return None;
        }
    };

    if !is_date_plan_shape(&value) {
        debug!(
            target: "dateplan::extract",
            strategy = strategy.name(),
            "JSON object does not carry the date plan discriminator"
        );
        return None;
    }

    Some(ExtractedPayload::new(strategy, value))
}

/// Run the cascade and return the first candidate substring found.
pub fn find_candidate(text: &str) -> Option<(Strategy, &str)> {
    for (strategy, matcher) in STRATEGIES {
        if let Some(candidate) = matcher(text) {
            trace!(
                target: "dateplan::extract",
                strategy = strategy.name(),
                len = candidate.len(),
                "candidate found"
            );
            return Some((*strategy, candidate));
        }
    }
    None
}

/// Trim whitespace and cut anything after the last `}`.
pub fn trim_candidate(candidate: &str) -> &str {
    let trimmed = candidate.trim();
    if trimmed.ends_with('}') {
        return trimmed;
    }
    match trimmed.rfind('}') {
        Some(idx) => &trimmed[..=idx],
        None => trimmed,
    }
}

/// The shape discriminator: an object whose `status` is `ok` or
/// `needs_clarification` and which carries `plans` or `clarifying_questions`.
pub fn is_date_plan_shape(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };

    let status_ok = matches!(
        object.get("status").and_then(Value::as_str),
        Some("ok") | Some("needs_clarification")
    );
    let has_body = ["plans", "clarifying_questions"]
        .iter()
        .any(|key| object.get(*key).is_some_and(|v| !v.is_null()));

    status_ok && has_body
}

/// Strip a single markdown code fence wrapping the whole message, if any.
///
/// This is what the generic markdown renderer receives when no payload is found.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (e.g. `markdown`) on the opening line.
    match body.find('\n') {
        Some(newline) if !body[..newline].trim().contains(' ') => body[newline + 1..].trim_end(),
        _ => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_ok() -> Value {
        json!({
            "status": "ok",
            "plans": [{
                "plan_id": "rainy_day",
                "title": "雨の日プラン",
                "theme": "室内",
                "budget_estimate_jpy": { "min": 5000, "max": 12000 },
                "constraints_respected": [],
                "itinerary": [{
                    "start": "2024-05-01 10:00",
                    "end": "2024-05-01 10:30",
                    "type": "meetup",
                    "name": "渋谷駅",
                    "area": "渋谷",
                    "links": {}
                }],
                "checks": {
                    "meets_exact_time_window": true,
                    "no_gaps_or_overlaps": true,
                    "rounded_to_30min": true
                }
            }]
        })
    }

    #[test]
    fn test_fenced_block_returns_object_unchanged() {
        let value = sample_ok();
        let text = format!("プランです。\n```json\n{}\n```\n以上です。", value);

        let payload = extract_value(&text).unwrap();
        assert_eq!(payload.strategy(), Strategy::FencedBlock);
        assert_eq!(payload.value(), &value);
    }

    #[test]
    fn test_text_without_braces_is_absent() {
        assert!(extract_value("今日はいい天気ですね。").is_none());
        assert!(extract("").is_none());
        assert!(extract("```json\nnot json\n```").is_none());
    }

    #[test]
    fn test_other_status_is_rejected() {
        let text = r#"{"status": "error", "plans": []}"#;
        assert!(extract_value(text).is_none());

        let text = r#"{"status": "OK", "plans": []}"#;
        assert!(extract_value(text).is_none());
    }

    #[test]
    fn test_missing_body_is_rejected() {
        assert!(extract_value(r#"{"status": "ok"}"#).is_none());
        assert!(extract_value(r#"{"status": "ok", "plans": null}"#).is_none());
    }

    #[test]
    fn test_unrelated_tool_payload_is_rejected() {
        let text = r#"Calling tool: {"name": "search", "arguments": {"q": "渋谷 カフェ"}}"#;
        assert!(extract_value(text).is_none());
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert!(!is_date_plan_shape(&json!(["ok"])));
        assert!(!is_date_plan_shape(&json!(null)));
        assert!(!is_date_plan_shape(&json!("ok")));
    }

    #[test]
    fn test_parse_failure_does_not_fall_through() {
        // The fence matches first; its body is broken, so the valid object
        // later in the text is never considered.
        let text = "```json\n{\"status\": \"ok\", \"plans\": [}\n```\n{\"status\": \"ok\", \"plans\": []}";
        assert!(extract_value(text).is_none());
    }

    #[test]
    fn test_trailing_text_after_last_brace_is_cut() {
        assert_eq!(trim_candidate("  {\"a\": 1} trailing "), "{\"a\": 1}");
        assert_eq!(trim_candidate("{\"a\": {\"b\": 1}} ..."), "{\"a\": {\"b\": 1}}");
        assert_eq!(trim_candidate("{\"a\": "), "{\"a\":");
    }

    #[test]
    fn test_tagged_json_with_trailing_prose() {
        let text = "json {\"status\": \"needs_clarification\", \"clarifying_questions\": [\"予算は？\"]}\n\n---\nご確認ください";
        let payload = extract_value(text).unwrap();
        assert_eq!(payload.strategy(), Strategy::TaggedJson);
        assert_eq!(payload.value()["clarifying_questions"][0], "予算は？");
    }

    #[test]
    fn test_truncated_payload_is_absent() {
        let full = sample_ok().to_string();
        // Cut inside the first plan, right before its `checks` object.
        let cut = full.find("\"checks\"").unwrap();
        let truncated = format!("こちらです {}", &full[..cut]);

        assert_eq!(
            find_candidate(&truncated).map(|(strategy, _)| strategy),
            Some(Strategy::BalancedBraces)
        );
        assert!(extract_value(&truncated).is_none());
        assert!(extract(&truncated).is_none());
    }

    #[test]
    fn test_typed_extract() {
        let text = format!("```\n{}\n```", sample_ok());
        let response = extract(&text).unwrap();
        assert_eq!(response.plans.len(), 1);
        assert_eq!(response.plans[0].plan_id.as_deref(), Some("rainy_day"));
    }

    #[test]
    fn test_wrong_field_type_is_absent() {
        let text = r#"{"status": "ok", "plans": [{"itinerary": "10:00 集合"}]}"#;
        assert!(extract_value(text).is_some());
        assert!(extract(text).is_none());
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```markdown\n# 見出し\n本文\n```"), "# 見出し\n本文");
        assert_eq!(strip_code_fence("```\nplain\n```"), "plain");
        assert_eq!(strip_code_fence("no fence"), "no fence");
        assert_eq!(strip_code_fence("```unterminated"), "```unterminated");
    }
}
