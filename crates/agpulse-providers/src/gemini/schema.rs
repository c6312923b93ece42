use serde::Deserialize;

/// One entry in a `logs.json` document (a flat JSON array of messages from
/// every session in that project). Sessions are reconstructed by grouping
/// on `sessionId`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiLogMessage {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_user_message_entry() {
        let json = r#"{"sessionId":"3f2c","messageId":0,"type":"user","message":"hello","timestamp":"2026-01-10T09:00:00.000Z"}"#;
        let message: GeminiLogMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.session_id.as_deref(), Some("3f2c"));
        assert_eq!(message.message_type.as_deref(), Some("user"));
        assert_eq!(
            message.timestamp.as_deref(),
            Some("2026-01-10T09:00:00.000Z")
        );
    }

    #[test]
    fn test_tolerates_missing_fields() {
        let message: GeminiLogMessage = serde_json::from_str(r#"{"messageId":3}"#).unwrap();
        assert_eq!(message.session_id, None);
        assert_eq!(message.message_type, None);
        assert_eq!(message.timestamp, None);
    }
}
