use crate::AdvisorError;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

fn greedy_object() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex"))
}

/// Pulls a JSON object out of a model reply that may carry prose around it.
///
/// The widest `{ ... }` span is tried first since models usually emit a single
/// object. If that span does not parse (prose with stray braces, two objects),
/// each `{` is tried in turn and the first one that opens a complete object wins.
pub fn extract_json_object(text: &str) -> Result<&str, AdvisorError> {
    let span = greedy_object().find(text).ok_or(AdvisorError::NoJson)?;
    if serde_json::from_str::<serde_json::Value>(span.as_str())
        .map(|v| v.is_object())
        .unwrap_or(false)
    {
        return Ok(span.as_str());
    }

    for (start, _) in text.match_indices('{') {
        let tail = &text[start..];
        let mut stream = serde_json::Deserializer::from_str(tail).into_iter::<serde_json::Value>();
        if let Some(Ok(value)) = stream.next() {
            if value.is_object() {
                let end = start + stream.byte_offset();
                return Ok(&text[start..end]);
            }
        }
    }

    // Report the parse error of the widest span; it is the most useful one.
    match serde_json::from_str::<serde_json::Value>(span.as_str()) {
        Err(e) => Err(AdvisorError::Malformed(e)),
        Ok(_) => Err(AdvisorError::NoJson),
    }
}

/// Extracts the JSON object from `text` and deserializes it into `T`.
pub fn parse_reply<T: DeserializeOwned>(text: &str) -> Result<T, AdvisorError> {
    let json = extract_json_object(text)?;
    let value = serde_json::from_str(json).map_err(|e| {
        log::warn!("Model reply did not match schema — error={}", e);
        e
    })?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Score {
        score: u32,
    }

    #[test]
    fn test_extract_with_prose() {
        let text = "Here is the plan:\n```json\n{\"score\": 85}\n```\nLet me know.";
        assert_eq!(extract_json_object(text).unwrap(), "{\"score\": 85}");
    }

    #[test]
    fn test_extract_nested() {
        let text = "{\"a\": {\"b\": 1}, \"c\": [1, 2]}";
        assert_eq!(extract_json_object(text).unwrap(), text);
    }

    #[test]
    fn test_extract_falls_back_to_first_complete_object() {
        // The greedy span covers both objects and the prose between them.
        let text = "first {\"score\": 1} and then {\"score\": 2} done";
        assert_eq!(extract_json_object(text).unwrap(), "{\"score\": 1}");
    }

    #[test]
    fn test_extract_skips_stray_brace() {
        let text = "use {braces} like this: {\"score\": 3}";
        assert_eq!(extract_json_object(text).unwrap(), "{\"score\": 3}");
    }

    #[test]
    fn test_no_json() {
        assert!(matches!(
            extract_json_object("I cannot help with that."),
            Err(AdvisorError::NoJson)
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            extract_json_object("{\"score\": 85,"),
            Err(AdvisorError::NoJson)
        ));
        assert!(matches!(
            extract_json_object("{\"score\": }"),
            Err(AdvisorError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_reply_typed() {
        let parsed: Score = parse_reply("ok: {\"score\": 85}").unwrap();
        assert_eq!(parsed, Score { score: 85 });
    }

    #[test]
    fn test_parse_reply_schema_mismatch() {
        let parsed = parse_reply::<Score>("{\"score\": \"high\"}");
        assert!(matches!(parsed, Err(AdvisorError::Malformed(_))));
    }
}
