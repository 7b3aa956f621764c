use crate::session::RoundStage;
use crate::types::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Player action as it arrives from a transport
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientMessage {
    pub action: String,
    #[serde(default)]
    pub payload: Value,
}

impl ClientMessage {
    pub fn new(action: impl Into<String>, payload: Value) -> Self {
        Self {
            action: action.into(),
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    RoundStarted {
        round: u32,
        total_rounds: u32,
        /// ISO timestamp when voting closes
        deadline: Option<String>,
        game_data: GameData,
    },
    StageChanged {
        round: u32,
        stage: RoundStage,
        deadline: Option<String>,
    },
    RoundResults {
        round: u32,
        results: RoundResults,
    },
    GameOver {
        standings: Vec<Standing>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_message_payload_defaults_to_null() {
        let msg: ClientMessage = serde_json::from_str(r#"{"action":"end_debate"}"#).unwrap();
        assert_eq!(msg, ClientMessage::new("end_debate", Value::Null));
    }

    #[test]
    fn test_client_message_vote() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"action":"vote","payload":{"choice":"B"}}"#).unwrap();
        assert_eq!(msg.action, "vote");
        assert_eq!(msg.payload, json!({"choice": "B"}));
    }

    #[test]
    fn test_server_message_tagging() {
        let msg = ServerMessage::StageChanged {
            round: 2,
            stage: RoundStage::Extended,
            deadline: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["t"], "stage_changed");
        assert_eq!(json["stage"], "extended");
        assert_eq!(json["round"], 2);
    }
}
