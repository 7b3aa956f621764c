use serde::Deserialize;
use serde_json::Value;

use super::{Choice, Phase};
use crate::types::{GameData, GameState};

#[derive(Debug, Deserialize)]
struct VotePayload {
    choice: Choice,
}

/// Dispatch a player action. Mistimed, duplicate or malformed actions are dropped.
pub(super) fn handle_action(state: &mut GameState, player_id: &str, action: &str, payload: &Value) {
    let GameState {
        players,
        game_data,
        ..
    } = state;
    let GameData::WouldYouRather(data) = game_data else {
        tracing::debug!(action, "Action without would-you-rather data, ignoring");
        return;
    };
    let Some(player) = players.iter().find(|p| p.id == player_id) else {
        tracing::debug!(player_id, action, "Action from unknown player, ignoring");
        return;
    };

    match action {
        "vote" => {
            if data.phase != Phase::Voting {
                tracing::debug!(player_id, phase = ?data.phase, "Vote outside voting phase, ignoring");
                return;
            }
            if data.votes.contains_key(player_id) {
                tracing::debug!(player_id, "Player already voted this round, ignoring");
                return;
            }
            match VotePayload::deserialize(payload) {
                Ok(VotePayload { choice }) => {
                    data.votes.insert(player.id.clone(), choice);
                    tracing::debug!(player_id, ?choice, "Vote recorded");
                }
                Err(e) => {
                    tracing::debug!(player_id, "Malformed vote payload, ignoring: {}", e);
                }
            }
        }

        "end_debate" => {
            if !player.is_host {
                tracing::debug!(player_id, "Only the host can end the debate");
                return;
            }
            if data.phase == Phase::Debate && data.phase.close() {
                tracing::info!(player_id, "Host ended the debate");
            }
        }

        other => {
            tracing::debug!(player_id, action = other, "Unknown action, ignoring");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{wyr_data, wyr_data_mut, WouldYouRather};
    use super::*;
    use crate::config::GameSettings;
    use crate::handler::GameHandler;
    use serde_json::json;

    fn votes(state: &GameState) -> std::collections::HashMap<String, Choice> {
        wyr_data(state).unwrap().votes.clone()
    }

    #[test]
    fn test_vote_recorded() {
        let mut state = started_game(&["p1", "p2"], &GameSettings::new());
        vote(&mut state, "p2", "B");
        assert_eq!(votes(&state).get("p2"), Some(&Choice::B));
    }

    #[test]
    fn test_second_vote_does_not_overwrite() {
        let mut state = started_game(&["p1", "p2"], &GameSettings::new());
        vote(&mut state, "p1", "A");
        vote(&mut state, "p1", "B");
        vote(&mut state, "p1", "A");

        let votes = votes(&state);
        assert_eq!(votes.len(), 1);
        assert_eq!(votes.get("p1"), Some(&Choice::A));
    }

    #[test]
    fn test_invalid_payloads_are_dropped() {
        let mut state = started_game(&["p1", "p2"], &GameSettings::new());
        let payloads = [
            json!({ "choice": "C" }),
            json!({ "choice": "a" }),
            json!({ "choice": 1 }),
            json!({ "choice": null }),
            json!({}),
            json!("A"),
            Value::Null,
        ];

        for payload in &payloads {
            WouldYouRather.handle_action(&mut state, "p1", "vote", payload);
        }
        assert!(votes(&state).is_empty());

        // A valid vote still goes through afterwards
        vote(&mut state, "p1", "A");
        assert_eq!(votes(&state).get("p1"), Some(&Choice::A));
    }

    #[test]
    fn test_vote_outside_voting_phase_ignored() {
        let mut state = started_game(&["p1", "p2"], &GameSettings::new());
        wyr_data_mut(&mut state).unwrap().phase = Phase::Debate;
        vote(&mut state, "p1", "A");
        assert!(votes(&state).is_empty());

        wyr_data_mut(&mut state).unwrap().phase = Phase::Results;
        vote(&mut state, "p1", "A");
        assert!(votes(&state).is_empty());
    }

    #[test]
    fn test_vote_from_unknown_player_ignored() {
        let mut state = started_game(&["p1", "p2"], &GameSettings::new());
        vote(&mut state, "stranger", "A");
        assert!(votes(&state).is_empty());
    }

    #[test]
    fn test_end_debate_requires_host() {
        let mut state = started_game(&["p1", "p2"], &GameSettings::new());
        wyr_data_mut(&mut state).unwrap().phase = Phase::Debate;

        // p2 is not the host
        WouldYouRather.handle_action(&mut state, "p2", "end_debate", &Value::Null);
        assert_eq!(wyr_data(&state).unwrap().phase, Phase::Debate);

        // p1 hosts
        WouldYouRather.handle_action(&mut state, "p1", "end_debate", &Value::Null);
        assert_eq!(wyr_data(&state).unwrap().phase, Phase::Results);
    }

    #[test]
    fn test_end_debate_outside_debate_ignored() {
        let mut state = started_game(&["p1", "p2"], &GameSettings::new());
        WouldYouRather.handle_action(&mut state, "p1", "end_debate", &json!({}));
        assert_eq!(wyr_data(&state).unwrap().phase, Phase::Voting);
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let mut state = started_game(&["p1", "p2"], &GameSettings::new());
        let before = state.game_data.clone();
        WouldYouRather.handle_action(&mut state, "p1", "skip_round", &json!({ "choice": "A" }));
        assert_eq!(state.game_data, before);
    }
}
