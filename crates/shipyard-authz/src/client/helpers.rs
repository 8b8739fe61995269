//! Pure helpers: error bodies and response streams (no HTTP, no status logic).

use serde::de::DeserializeOwned;

use crate::error::{AuthzError, AuthzResult};
use crate::types::{RpcStatus, StreamLine};

/// Extract a readable message from an error body.
///
/// Expected format: `{"code": 16, "message": "..."}`. Falls back to the raw
/// body (truncated) or the status text.
pub(crate) fn error_message(body: &str, status_text: &str) -> String {
    match serde_json::from_str::<RpcStatus>(body) {
        Ok(status) if !status.message.is_empty() => status.message,
        _ if body.trim().is_empty() => status_text.to_string(),
        _ => body.chars().take(200).collect(),
    }
}

/// Decode a single JSON response body.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> AuthzResult<T> {
    serde_json::from_str(body).map_err(|e| AuthzError::InvalidResponse {
        message: format!("failed to parse response: {}", e),
    })
}

/// Decode a newline-delimited stream of `{"result": ...}` / `{"error": ...}` lines.
///
/// The first error line aborts the whole stream.
pub(crate) fn parse_stream<T: DeserializeOwned>(body: &str, status: u16) -> AuthzResult<Vec<T>> {
    let mut results = Vec::new();

    for (index, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parsed: StreamLine<T> =
            serde_json::from_str(line).map_err(|e| AuthzError::InvalidResponse {
                message: format!("failed to parse stream line {}: {}", index + 1, e),
            })?;

        match (parsed.result, parsed.error) {
            (_, Some(error)) => {
                return Err(AuthzError::Remote {
                    status,
                    message: format!("code {}: {}", error.code, error.message),
                })
            }
            (Some(result), None) => results.push(result),
            (None, None) => {
                return Err(AuthzError::InvalidResponse {
                    message: format!("stream line {} has neither result nor error", index + 1),
                })
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    #[test]
    fn test_error_message_from_status_body() {
        let body = r#"{"code":16,"message":"invalid preshared key","details":[]}"#;
        assert_eq!(error_message(body, "401"), "invalid preshared key");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message("", "503 Service Unavailable"), "503 Service Unavailable");
        assert_eq!(error_message("upstream reset", "502"), "upstream reset");
        assert_eq!(error_message(&"x".repeat(500), "500").len(), 200);
    }

    #[test]
    fn test_parse_stream() {
        let body = "{\"result\":{\"id\":\"a\"}}\n\n{\"result\":{\"id\":\"b\"}}\n";
        let items: Vec<Item> = parse_stream(body, 200).unwrap();
        assert_eq!(items, vec![Item { id: "a".into() }, Item { id: "b".into() }]);
    }

    #[test]
    fn test_parse_stream_empty() {
        let items: Vec<Item> = parse_stream("", 200).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_stream_error_line() {
        let body = "{\"result\":{\"id\":\"a\"}}\n{\"error\":{\"code\":5,\"message\":\"object definition `ship` not found\"}}";
        let err = parse_stream::<Item>(body, 200).unwrap_err();
        match err {
            AuthzError::Remote { status, message } => {
                assert_eq!(status, 200);
                assert!(message.contains("code 5"));
                assert!(message.contains("not found"));
            }
            other => panic!("expected Remote, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_stream_garbage() {
        let err = parse_stream::<Item>("not json", 200).unwrap_err();
        assert!(matches!(err, AuthzError::InvalidResponse { .. }));
    }
}
