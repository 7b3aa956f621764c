//! Game handler plug-in contract and the registry the engine dispatches through.

use rand::RngCore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::GameSettings;
use crate::error::{EngineError, EngineResult};
use crate::types::{GameData, GameState, RoundResults};

/// What the engine should do once voting has closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStep {
    /// Score the round now
    Finalize,
    /// Keep the round open for another timed stage before scoring
    Extend { seconds: u32 },
}

/// Trait that every round-based game must implement.
///
/// All operations are synchronous and only mutate the state passed in.
/// Invalid input is absorbed as a no-op, never surfaced as an error.
pub trait GameHandler: Send + Sync {
    /// Unique game-type identifier
    fn game_type(&self) -> &'static str;

    fn min_players(&self) -> usize;

    fn max_players(&self) -> usize;

    fn default_rounds(&self) -> u32;

    /// Build the per-game data, once per game instance
    fn create_initial_state(&self, settings: &GameSettings, rng: &mut dyn RngCore) -> GameData;

    /// Prepare the next round. Must be called exactly once per round.
    fn on_round_start(&self, state: &mut GameState);

    /// Apply a player action; unknown or malformed actions are ignored
    fn handle_action(&self, state: &mut GameState, player_id: &str, action: &str, payload: &Value);

    fn is_round_over(&self, state: &GameState) -> bool;

    /// Score the round and record the summary in the state
    fn get_round_results(&self, state: &mut GameState) -> RoundResults;

    fn is_game_over(&self, state: &GameState) -> bool {
        state.round >= state.total_rounds
    }

    /// Called by the engine when voting closes (everyone voted or the timer ran out)
    fn after_voting(&self, _state: &mut GameState) -> RoundStep {
        RoundStep::Finalize
    }

    /// Whether an extended stage has finished early
    fn is_ready_for_results(&self, _state: &GameState) -> bool {
        true
    }
}

/// Maps game-type identifiers to handler implementations
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Arc<dyn GameHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, handler: Arc<dyn GameHandler>) -> EngineResult<()> {
        let game_type = handler.game_type();
        if self.handlers.contains_key(game_type) {
            return Err(EngineError::DuplicateGameType(game_type.to_string()));
        }
        tracing::debug!("Registered game handler: {}", game_type);
        self.handlers.insert(game_type, handler);
        Ok(())
    }

    pub fn get(&self, game_type: &str) -> EngineResult<Arc<dyn GameHandler>> {
        self.handlers
            .get(game_type)
            .cloned()
            .ok_or_else(|| EngineError::UnknownGameType(game_type.to_string()))
    }

    /// Registered game types, sorted
    pub fn game_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.handlers.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

impl Default for HandlerRegistry {
    /// Registry preloaded with the built-in games
    fn default() -> Self {
        crate::games::builtin_registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::would_you_rather::{WouldYouRather, GAME_TYPE};

    #[test]
    fn test_default_registry_has_builtin_games() {
        let registry = HandlerRegistry::default();
        assert_eq!(registry.game_types(), vec![GAME_TYPE]);

        let handler = registry.get(GAME_TYPE).unwrap();
        assert_eq!(handler.game_type(), GAME_TYPE);
        assert_eq!(handler.min_players(), 2);
    }

    #[test]
    fn test_unknown_game_type() {
        let registry = HandlerRegistry::new();
        let result = registry.get("charades");
        assert!(matches!(result, Err(EngineError::UnknownGameType(t)) if t == "charades"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(WouldYouRather)).unwrap();

        let result = registry.register(Arc::new(WouldYouRather));
        assert_eq!(
            result,
            Err(EngineError::DuplicateGameType(GAME_TYPE.to_string()))
        );
    }

    #[test]
    fn test_default_is_game_over_boundaries() {
        let registry = HandlerRegistry::default();
        let handler = registry.get(GAME_TYPE).unwrap();
        let mut state = GameState::new(Vec::new(), 5);

        state.round = 4;
        assert!(!handler.is_game_over(&state));
        state.round = 5;
        assert!(handler.is_game_over(&state));
        state.round = 6;
        assert!(handler.is_game_over(&state));
    }
}
