use serde::{Deserialize, Serialize};

use crate::domain::ModeId;

/// Frames the UI sends to the gesture service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientRequest {
    ChangeMode { mode: ModeId },
}

/// Frames pushed by the gesture service.
///
/// Connection establishment and loss are transport-level and have no frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    GestureDetected { gesture: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn change_mode_uses_adjacent_tagging() {
        let value = serde_json::to_value(ClientRequest::ChangeMode {
            mode: ModeId::Mouse,
        })
        .expect("serialize");
        assert_eq!(
            value,
            json!({ "type": "change_mode", "payload": { "mode": "mouse" } })
        );
    }

    #[test]
    fn gesture_label_is_accepted_verbatim() {
        let event: ServerEvent = serde_json::from_str(
            r#"{"type":"gesture_detected","payload":{"gesture":"Custom: wave"}}"#,
        )
        .expect("decode");
        assert_eq!(
            event,
            ServerEvent::GestureDetected {
                gesture: "Custom: wave".to_string()
            }
        );
    }

    #[test]
    fn gesture_event_without_label_is_rejected() {
        let decoded =
            serde_json::from_str::<ServerEvent>(r#"{"type":"gesture_detected","payload":{}}"#);
        assert!(decoded.is_err());
    }

    #[test]
    fn unknown_change_mode_value_is_rejected() {
        let decoded = serde_json::from_str::<ClientRequest>(
            r#"{"type":"change_mode","payload":{"mode":"keyboard"}}"#,
        );
        assert!(decoded.is_err());
    }
}
