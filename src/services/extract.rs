// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON extraction from free-form model output.
//!
//! The model is asked for bare JSON but routinely wraps it in prose or
//! markdown fences. We scan for the first `{` whose balanced span parses
//! as a JSON object, tracking string literals so braces inside strings do
//! not count.

use serde_json::error::Category;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Upper bound on candidate `{` positions tried before giving up.
const MAX_CANDIDATES: usize = 32;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no JSON object found in response")]
    NoObject,

    #[error("malformed JSON in response: {0}")]
    Malformed(String),
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        AppError::UpstreamInvalidResponse(err.to_string())
    }
}

/// Return the balanced `{...}` span starting at byte offset `start`.
///
/// `text[start..]` must begin with `{`. Returns `None` if the braces never
/// balance (e.g. truncated output).
pub fn balanced_span(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract the first JSON object embedded in `text`.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, ExtractError> {
    let mut last_error = None;
    let mut resume_at = 0;
    let mut tried = 0;

    for (start, _) in text.match_indices('{') {
        // Braces inside an earlier candidate are nested in it, not top-level.
        if start < resume_at {
            continue;
        }
        if tried == MAX_CANDIDATES {
            break;
        }
        tried += 1;

        let Some(span) = balanced_span(text, start) else {
            // A JSON prefix cut off mid-object hides its nested objects;
            // anything else is a stray brace in the prose.
            match serde_json::from_str::<Value>(&text[start..]) {
                Err(e) if e.classify() == Category::Eof => break,
                _ => continue,
            }
        };
        match serde_json::from_str::<Value>(span) {
            Ok(Value::Object(map)) => return Ok(map),
            Ok(_) => {}
            Err(e) => last_error = Some(e.to_string()),
        }
        resume_at = start + span.len();
    }

    // Greedy fallback: first `{` through last `}`.
    if let (Some(first), Some(last)) = (text.find('{'), text.rfind('}')) {
        if first < last {
            match serde_json::from_str::<Value>(&text[first..=last]) {
                Ok(Value::Object(map)) => return Ok(map),
                Ok(_) => {}
                Err(e) => last_error = Some(e.to_string()),
            }
        }
    }

    Err(match last_error {
        Some(e) => ExtractError::Malformed(e),
        None => ExtractError::NoObject,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let map = extract_json_object(r#"{"title": "Rust"}"#).unwrap();
        assert_eq!(map["title"], "Rust");
    }

    #[test]
    fn test_json_wrapped_in_prose_and_fences() {
        let text = "Sure! Here is your course:\n```json\n{\"title\": \"Graphs\", \"modules\": []}\n```\nEnjoy {and good luck}.";
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["title"], "Graphs");
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let text = r#"prefix {"code": "fn main() { println!(\"}\"); }", "n": 1} suffix"#;
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["n"], 1);
    }

    #[test]
    fn test_non_json_brace_before_payload() {
        let text = r#"Format: {title}. Result: {"title": "Sets"}"#;
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["title"], "Sets");
    }

    #[test]
    fn test_unclosed_brace_in_prose_before_payload() {
        let text = r#"Use the shape { title, modules. Here it is: {"title": "Graphs", "modules": []}"#;
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["title"], "Graphs");
        assert_eq!(map["modules"], serde_json::json!([]));
    }

    #[test]
    fn test_nested_objects_take_outermost() {
        let text = r#"{"a": {"b": {"c": 1}}, "d": 2}"#;
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["d"], 2);
        assert_eq!(map["a"]["b"]["c"], 1);
    }

    #[test]
    fn test_no_object() {
        assert_eq!(
            extract_json_object("I cannot help with that."),
            Err(ExtractError::NoObject)
        );
        assert_eq!(extract_json_object("} backwards {"), Err(ExtractError::NoObject));
    }

    #[test]
    fn test_truncated_object_is_malformed() {
        let err = extract_json_object(r#"{"title": "Rust", "modules": [{"title": "x"}"#).unwrap_err();
        assert!(matches!(err, ExtractError::Malformed(_)));
    }

    #[test]
    fn test_balanced_span_requires_open_brace() {
        assert_eq!(balanced_span("abc", 0), None);
        assert_eq!(balanced_span("x{}", 1), Some("{}"));
    }
}
