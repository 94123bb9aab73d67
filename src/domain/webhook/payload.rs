//! Safe decoding of webhook payloads.

use serde::de::DeserializeOwned;

use super::errors::WebhookError;

/// Decodes a webhook body as JSON.
///
/// Malformed input becomes `WebhookError::ParseError` so callers can tell a
/// bad payload apart from a bad signature.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, WebhookError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Webhook payload is not valid JSON");
        WebhookError::ParseError(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Event {
        id: String,
        #[serde(rename = "type")]
        event_type: String,
    }

    #[test]
    fn parses_valid_json() {
        let event: Event =
            parse_json(br#"{"id":"evt_1","type":"checkout.session.completed"}"#).unwrap();

        assert_eq!(event.id, "evt_1");
        assert_eq!(event.event_type, "checkout.session.completed");
    }

    #[test]
    fn invalid_json_returns_parse_error() {
        let result: Result<serde_json::Value, _> = parse_json(b"{invalid");

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn wrong_shape_returns_parse_error() {
        let result: Result<Event, _> = parse_json(br#"{"id": 42}"#);

        match result {
            Err(WebhookError::ParseError(message)) => assert!(!message.is_empty()),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn empty_body_returns_parse_error() {
        let result: Result<serde_json::Value, _> = parse_json(b"");

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }
}
