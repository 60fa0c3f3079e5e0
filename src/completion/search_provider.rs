//! Search suggestion lookup.
//!
//! The network transport lives outside this crate behind
//! [`SuggestionSource`]; this module builds the request URL, parses
//! responses and makes sure a failing source never surfaces an error.

use crate::config;

/// Something that can return suggestions for a query
pub trait SuggestionSource {
    fn fetch(&self, query: &str) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Suggestion endpoint URL for `query`
pub fn suggestion_url(query: &str) -> String {
    let encoded = urlencoding::encode(query);
    config::SUGGESTIONS_URL.replace("{}", &encoded)
}

/// Ask `source` for at most `limit` suggestions.
/// A blank query or a failing source yields no suggestions.
pub fn fetch_suggestions<S: SuggestionSource + ?Sized>(
    source: &S,
    query: &str,
    limit: usize,
) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    match source.fetch(query) {
        Ok(mut items) => {
            items.truncate(limit);
            items
        }
        Err(e) => {
            log::warn!("Failed to fetch suggestions: {}", e);
            Vec::new()
        }
    }
}

/// Parse a suggestion response.
///
/// Accepts the OpenSearch list `["query", ["suggestion1", ...]]` and the
/// Baidu object `{"q": "query", "s": ["suggestion1", ...]}`, bare or wrapped
/// in a JSONP callback such as `cb({...});`.
pub fn parse_suggestions(body: &str) -> Vec<String> {
    let body = strip_jsonp(body.trim());
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return Vec::new();
    };

    let suggestions = match &value {
        serde_json::Value::Array(array) => array.get(1).and_then(|v| v.as_array()),
        serde_json::Value::Object(object) => object.get("s").and_then(|v| v.as_array()),
        _ => None,
    };
    let Some(suggestions) = suggestions else {
        return Vec::new();
    };

    suggestions
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.to_string())
        .collect()
}

/// `name(payload);` -> `payload`, anything else unchanged
fn strip_jsonp(body: &str) -> &str {
    if body.starts_with('[') || body.starts_with('{') {
        return body;
    }
    let Some(open) = body.find('(') else {
        return body;
    };
    let Some(close) = body.rfind(')') else {
        return body;
    };
    if close <= open {
        return body;
    }
    body[open + 1..close].trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Fixed(Vec<&'static str>);

    impl SuggestionSource for Fixed {
        fn fetch(
            &self,
            _query: &str,
        ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct Failing;

    impl SuggestionSource for Failing {
        fn fetch(
            &self,
            _query: &str,
        ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
            Err("network unreachable".into())
        }
    }

    struct Counting(Cell<usize>);

    impl SuggestionSource for Counting {
        fn fetch(
            &self,
            _query: &str,
        ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
            self.0.set(self.0.get() + 1);
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_parse_opensearch_response() {
        let body = r#"["rust", ["rust", "rust lang", "rustup", 7]]"#;
        assert_eq!(parse_suggestions(body), vec!["rust", "rust lang", "rustup"]);
    }

    #[test]
    fn test_parse_baidu_response() {
        let body = r#"{"q":"rust","p":false,"s":["rust","rust语言","rustdesk"]}"#;
        assert_eq!(parse_suggestions(body), vec!["rust", "rust语言", "rustdesk"]);

        let wrapped = r#"window.baidu.sug({"q":"rust","s":["rustup"]});"#;
        assert_eq!(parse_suggestions(wrapped), vec!["rustup"]);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_suggestions("window.baidu.sug({})").is_empty());
        assert!(parse_suggestions(r#"["only"]"#).is_empty());
        assert!(parse_suggestions(r#"{"s": []}"#).is_empty());
        assert!(parse_suggestions(r#"{"s": "rust"}"#).is_empty());
        assert!(parse_suggestions("not json").is_empty());
    }

    #[test]
    fn test_fetch_truncates() {
        let source = Fixed(vec!["a", "b", "c", "d", "e", "f", "g", "h"]);
        assert_eq!(fetch_suggestions(&source, "x", 6).len(), 6);
    }

    #[test]
    fn test_fetch_failure_is_empty() {
        assert!(fetch_suggestions(&Failing, "rust", 6).is_empty());
    }

    #[test]
    fn test_blank_query_skips_source() {
        let source = Counting(Cell::new(0));
        assert!(fetch_suggestions(&source, "   ", 6).is_empty());
        assert_eq!(source.0.get(), 0);
    }

    #[test]
    fn test_suggestion_url() {
        assert_eq!(
            suggestion_url("hello world"),
            "https://duckduckgo.com/ac/?q=hello%20world&type=list"
        );
    }
}
