use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::games::would_you_rather::{WyrData, WyrSummary};

/// Opaque ID types
pub type PlayerId = String;
pub type GameType = String;
pub type SessionId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_host: bool,
    #[serde(default = "default_connected")]
    pub is_connected: bool,
}

fn default_connected() -> bool {
    true
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
            is_host: false,
            is_connected: true,
        }
    }

    pub fn host(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            is_host: true,
            ..Self::new(id, name)
        }
    }
}

/// Engine-owned state for one game instance.
///
/// Handlers mutate it in place; `game_data` is the handler's private slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub players: Vec<Player>,
    pub round: u32,
    pub total_rounds: u32,
    /// Engine-visible mirror of the active timer, in seconds
    pub timer_duration: u32,
    pub game_data: GameData,
}

impl GameState {
    pub fn new(players: Vec<Player>, total_rounds: u32) -> Self {
        Self {
            players,
            round: 0,
            total_rounds,
            timer_duration: 0,
            game_data: GameData::Empty,
        }
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn connected_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_connected)
    }
}

/// Per-game payload, tagged by game type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameData {
    /// No handler has initialized the state yet
    Empty,
    WouldYouRather(WyrData),
}

/// Client-facing round summary, tagged by game type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RoundSummary {
    WouldYouRather(WyrSummary),
}

/// Outcome of closing a round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundResults {
    pub scores: HashMap<PlayerId, u32>,
    pub summary: RoundSummary,
}

/// Public identity of a player as shown in summaries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Cumulative score entry across rounds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub player_id: PlayerId,
    pub display_name: String,
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_defaults_on_deserialize() {
        let player: Player = serde_json::from_str(r#"{"id":"p1","name":"Alice"}"#).unwrap();
        assert!(player.is_connected);
        assert!(!player.is_host);
        assert!(player.avatar_url.is_none());
    }

    #[test]
    fn test_connected_players_skips_disconnected() {
        let mut state = GameState::new(
            vec![Player::new("p1", "Alice"), Player::new("p2", "Bob")],
            3,
        );
        state.player_mut("p2").unwrap().is_connected = false;

        let ids: Vec<_> = state.connected_players().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1"]);
    }

    #[test]
    fn test_empty_game_data_wire_shape() {
        let json = serde_json::to_value(GameData::Empty).unwrap();
        assert_eq!(json, serde_json::json!({"type": "empty"}));
    }
}
