//! Best-effort JSON extraction from LLM output
//!
//! Models wrap JSON in code fences, preambles and trailing commentary. The
//! extractor tries, in order: a fenced block, the widest brace-delimited
//! substring, the raw text - and settles for an empty object rather than
//! failing, so a malformed completion degrades instead of erroring.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static CODE_FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap()
});

/// Extract the JSON object an LLM was asked to produce.
///
/// Always returns an object; total parse failure yields `{}`.
pub fn extract_json(text: &str) -> Value {
    for candidate in candidates(text) {
        if let Ok(value) = serde_json::from_str::<Value>(&candidate) {
            if value.is_object() {
                return value;
            }
        }
    }
    Value::Object(serde_json::Map::new())
}

fn candidates(text: &str) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(caps) = CODE_FENCE_PATTERN.captures(text) {
        if let Some(inner) = caps.get(1) {
            out.push(inner.as_str().to_string());
        }
    }

    // widest {...} span
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            out.push(text[start..=end].to_string());
        }
    }

    out.push(text.trim().to_string());
    out
}

/// Convenience: a string field off an extracted object, trimmed, empty
/// and "null" dropped
pub fn string_field(value: &Value, key: &str) -> Option<String> {
    let raw = value.get(key)?.as_str()?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("none") {
        return None;
    }
    Some(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let value = extract_json(r#"{"commodity": "wheat"}"#);
        assert_eq!(value["commodity"], "wheat");
    }

    #[test]
    fn test_code_fenced_json() {
        let text = "Here you go:\n```json\n{\"commodity\": \"onion\", \"location\": \"Nashik\"}\n```\nHope that helps!";
        let value = extract_json(text);
        assert_eq!(value["commodity"], "onion");
        assert_eq!(value["location"], "Nashik");
    }

    #[test]
    fn test_brace_substring() {
        let text = r#"Sure! The extraction is {"intent": "get_price"} as requested."#;
        let value = extract_json(text);
        assert_eq!(value["intent"], "get_price");
    }

    #[test]
    fn test_garbage_yields_empty_object() {
        let value = extract_json("I am sorry, I cannot help with that.");
        assert!(value.as_object().unwrap().is_empty());

        let value = extract_json("{broken json");
        assert!(value.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_string_field_filters_null_markers() {
        let value = extract_json(r#"{"a": "wheat", "b": "null", "c": "", "d": 5}"#);
        assert_eq!(string_field(&value, "a").as_deref(), Some("wheat"));
        assert_eq!(string_field(&value, "b"), None);
        assert_eq!(string_field(&value, "c"), None);
        assert_eq!(string_field(&value, "d"), None); // not a string
        assert_eq!(string_field(&value, "missing"), None);
    }
}
