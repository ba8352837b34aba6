//! Defensive extraction of JSON payloads from free-form model replies.

use serde_json::Value;

use nr_core::{Error, Result};

/// Pull the outermost JSON object out of a reply that may wrap it in prose
/// or markdown code fences.
pub(crate) fn extract_object(text: &str) -> Result<Value> {
    extract_between(text, '{', '}')
}

/// Same as [`extract_object`] for a top-level JSON array.
pub(crate) fn extract_array(text: &str) -> Result<Value> {
    extract_between(text, '[', ']')
}

fn extract_between(text: &str, open: char, close: char) -> Result<Value> {
    let stripped = strip_code_fences(text);
    let start = stripped
        .find(open)
        .ok_or_else(|| Error::MalformedResponse(format!("no '{open}' in response")))?;
    let end = stripped
        .rfind(close)
        .filter(|&end| end > start)
        .ok_or_else(|| Error::MalformedResponse(format!("no closing '{close}' in response")))?;

    serde_json::from_str(&stripped[start..=end])
        .map_err(|e| Error::MalformedResponse(format!("invalid JSON in response: {e}")))
}

fn strip_code_fences(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_plain_objects() {
        assert_eq!(extract_object(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn extracts_fenced_objects() {
        let reply = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_object(reply).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn extracts_objects_wrapped_in_prose() {
        let reply = "Here is what I found: {\"a\": 1} hope that helps!";
        assert_eq!(extract_object(reply).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn extracts_arrays() {
        let reply = "Scores: [{\"id\": 1, \"score\": 10}]";
        assert_eq!(extract_array(reply).unwrap(), json!([{"id": 1, "score": 10}]));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            extract_object("no json here"),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_array("{ mismatched"),
            Err(Error::MalformedResponse(_))
        ));
    }
}
