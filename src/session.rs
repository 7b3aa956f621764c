//! Engine-side driver for a single game instance.
//!
//! Owns the shared [`GameState`], sequences rounds, routes player actions to the
//! handler and enforces the timed edges the handler leaves to its engine: closing
//! voting when everyone has voted or the deadline passes, running an extended stage
//! (the debate) when the handler asks for one, and scoring the round.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::GameSettings;
use crate::error::{EngineError, EngineResult};
use crate::handler::{GameHandler, HandlerRegistry, RoundStep};
use crate::protocol::ServerMessage;
use crate::types::*;

/// Schema version for session exports
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// Where the engine is within the current round
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundStage {
    /// No round started yet
    Idle,
    /// Voting is open
    Collecting,
    /// Voting closed, handler-requested extra stage running
    Extended,
    /// Current round has been scored
    Scored,
}

/// Serializable snapshot of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    pub schema_version: u32,
    pub exported_at: String,
    pub session_id: SessionId,
    pub game_type: GameType,
    pub stage: RoundStage,
    pub state: GameState,
    pub totals: HashMap<PlayerId, u32>,
}

pub struct GameSession {
    id: SessionId,
    handler: Arc<dyn GameHandler>,
    state: GameState,
    stage: RoundStage,
    deadline: Option<DateTime<Utc>>,
    totals: HashMap<PlayerId, u32>,
    last_results: Option<RoundResults>,
    events: broadcast::Sender<ServerMessage>,
}

impl GameSession {
    /// Create a game with a randomly shuffled prompt order
    pub fn new(
        registry: &HandlerRegistry,
        game_type: &str,
        players: Vec<Player>,
        settings: &GameSettings,
        rounds: Option<u32>,
    ) -> EngineResult<Self> {
        Self::with_rng(registry, game_type, players, settings, rounds, &mut rand::rng())
    }

    /// Create a game drawing its randomness from `rng` (seed it to replay a game)
    pub fn with_rng(
        registry: &HandlerRegistry,
        game_type: &str,
        players: Vec<Player>,
        settings: &GameSettings,
        rounds: Option<u32>,
        rng: &mut dyn RngCore,
    ) -> EngineResult<Self> {
        let handler = registry.get(game_type)?;

        if players.len() < handler.min_players() {
            return Err(EngineError::NotEnoughPlayers {
                min: handler.min_players(),
                actual: players.len(),
            });
        }
        if players.len() > handler.max_players() {
            return Err(EngineError::TooManyPlayers {
                max: handler.max_players(),
                actual: players.len(),
            });
        }

        let total_rounds = rounds
            .filter(|n| *n > 0)
            .unwrap_or_else(|| handler.default_rounds());
        let mut state = GameState::new(players, total_rounds);
        state.game_data = handler.create_initial_state(settings, rng);

        let id = ulid::Ulid::new().to_string();
        tracing::info!(
            session = %id,
            game_type,
            players = state.players.len(),
            total_rounds,
            "Game created"
        );

        Ok(Self::assemble(id, handler, state, RoundStage::Idle, HashMap::new()))
    }

    /// Rebuild a session from an export. Open stages restart their timer.
    pub fn restore(registry: &HandlerRegistry, export: SessionExport) -> EngineResult<Self> {
        if export.schema_version > EXPORT_SCHEMA_VERSION {
            tracing::warn!(
                "Export schema version {} is newer than supported version {}",
                export.schema_version,
                EXPORT_SCHEMA_VERSION
            );
        }

        let handler = registry.get(&export.game_type)?;
        let mut session = Self::assemble(
            export.session_id,
            handler,
            export.state,
            export.stage,
            export.totals,
        );
        if matches!(session.stage, RoundStage::Collecting | RoundStage::Extended) {
            session.arm_deadline(session.state.timer_duration);
        }

        tracing::info!(session = %session.id, stage = ?session.stage, "Game restored");
        Ok(session)
    }

    fn assemble(
        id: SessionId,
        handler: Arc<dyn GameHandler>,
        state: GameState,
        stage: RoundStage,
        totals: HashMap<PlayerId, u32>,
    ) -> Self {
        let (events, _rx) = broadcast::channel(100);
        Self {
            id,
            handler,
            state,
            stage,
            deadline: None,
            totals,
            last_results: None,
            events,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn game_type(&self) -> &'static str {
        self.handler.game_type()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn stage(&self) -> RoundStage {
        self.stage
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn last_results(&self) -> Option<&RoundResults> {
        self.last_results.as_ref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.events.subscribe()
    }

    /// True once the final round has been scored
    pub fn is_finished(&self) -> bool {
        matches!(self.stage, RoundStage::Idle | RoundStage::Scored)
            && self.handler.is_game_over(&self.state)
    }

    /// Start the next round and open voting. Returns the round number.
    pub fn start_round(&mut self) -> EngineResult<u32> {
        if matches!(self.stage, RoundStage::Collecting | RoundStage::Extended) {
            return Err(EngineError::RoundInProgress(self.state.round));
        }
        if self.handler.is_game_over(&self.state) {
            return Err(EngineError::GameOver);
        }

        self.state.round += 1;
        self.handler.on_round_start(&mut self.state);
        self.stage = RoundStage::Collecting;
        self.last_results = None;
        self.arm_deadline(self.state.timer_duration);

        tracing::info!(
            session = %self.id,
            round = self.state.round,
            total_rounds = self.state.total_rounds,
            "Round started"
        );
        self.emit(ServerMessage::RoundStarted {
            round: self.state.round,
            total_rounds: self.state.total_rounds,
            deadline: self.deadline_string(),
            game_data: self.state.game_data.clone(),
        });

        self.advance();
        Ok(self.state.round)
    }

    /// Route a player action to the handler, then re-evaluate the round
    pub fn submit_action(
        &mut self,
        player_id: &str,
        action: &str,
        payload: &Value,
    ) -> EngineResult<()> {
        if self.state.player(player_id).is_none() {
            return Err(EngineError::UnknownPlayer(player_id.to_string()));
        }
        if !matches!(self.stage, RoundStage::Collecting | RoundStage::Extended) {
            return Err(EngineError::NoActiveRound);
        }

        self.handler
            .handle_action(&mut self.state, player_id, action, payload);
        self.advance();
        Ok(())
    }

    /// Mark a player as connected or disconnected.
    /// Disconnected players never hold up the end of voting.
    pub fn set_connected(&mut self, player_id: &str, connected: bool) -> EngineResult<()> {
        let player = self
            .state
            .player_mut(player_id)
            .ok_or_else(|| EngineError::UnknownPlayer(player_id.to_string()))?;
        player.is_connected = connected;

        tracing::info!(session = %self.id, player_id, connected, "Player connectivity changed");
        self.advance();
        Ok(())
    }

    /// Close voting now (timer expiry or host override)
    pub fn close_voting(&mut self) -> EngineResult<()> {
        if self.stage != RoundStage::Collecting {
            return Err(EngineError::NoActiveRound);
        }
        self.close_voting_now();
        Ok(())
    }

    /// Score the current round now, skipping whatever stage is running
    pub fn finalize_round(&mut self) -> EngineResult<RoundResults> {
        if !matches!(self.stage, RoundStage::Collecting | RoundStage::Extended) {
            return Err(EngineError::NoActiveRound);
        }
        Ok(self.finalize_now())
    }

    /// Apply deadline expiry as of `now`. Returns true if the round moved on.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }

        match self.stage {
            RoundStage::Collecting => {
                tracing::info!(session = %self.id, round = self.state.round, "Voting deadline expired");
                self.close_voting_now();
                true
            }
            RoundStage::Extended => {
                tracing::info!(session = %self.id, round = self.state.round, "Extended stage expired");
                self.finalize_now();
                true
            }
            RoundStage::Idle | RoundStage::Scored => {
                self.deadline = None;
                false
            }
        }
    }

    /// Cumulative standings, highest total first (seat order breaks ties)
    pub fn leaderboard(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .state
            .players
            .iter()
            .map(|p| Standing {
                player_id: p.id.clone(),
                display_name: p.name.clone(),
                total: self.totals.get(&p.id).copied().unwrap_or(0),
            })
            .collect();
        standings.sort_by(|a, b| b.total.cmp(&a.total));
        standings
    }

    pub fn export(&self) -> SessionExport {
        SessionExport {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now().to_rfc3339(),
            session_id: self.id.clone(),
            game_type: self.handler.game_type().to_string(),
            stage: self.stage,
            state: self.state.clone(),
            totals: self.totals.clone(),
        }
    }

    fn advance(&mut self) {
        match self.stage {
            RoundStage::Collecting if self.handler.is_round_over(&self.state) => {
                self.close_voting_now();
            }
            RoundStage::Extended if self.handler.is_ready_for_results(&self.state) => {
                self.finalize_now();
            }
            _ => {}
        }
    }

    fn close_voting_now(&mut self) {
        match self.handler.after_voting(&mut self.state) {
            RoundStep::Finalize => {
                self.finalize_now();
            }
            RoundStep::Extend { seconds } => {
                self.stage = RoundStage::Extended;
                self.arm_deadline(seconds);
                tracing::info!(session = %self.id, round = self.state.round, seconds, "Voting closed, round extended");
                self.emit(ServerMessage::StageChanged {
                    round: self.state.round,
                    stage: self.stage,
                    deadline: self.deadline_string(),
                });
            }
        }
    }

    fn finalize_now(&mut self) -> RoundResults {
        let results = self.handler.get_round_results(&mut self.state);
        for (player_id, points) in &results.scores {
            *self.totals.entry(player_id.clone()).or_insert(0) += points;
        }
        self.stage = RoundStage::Scored;
        self.deadline = None;
        self.last_results = Some(results.clone());

        tracing::info!(session = %self.id, round = self.state.round, "Round finalized");
        self.emit(ServerMessage::RoundResults {
            round: self.state.round,
            results: results.clone(),
        });

        if self.handler.is_game_over(&self.state) {
            tracing::info!(session = %self.id, "Game over");
            self.emit(ServerMessage::GameOver {
                standings: self.leaderboard(),
            });
        }
        results
    }

    fn arm_deadline(&mut self, seconds: u32) {
        self.deadline = Some(Utc::now() + chrono::Duration::seconds(i64::from(seconds)));
    }

    fn deadline_string(&self) -> Option<String> {
        self.deadline.map(|d| d.to_rfc3339())
    }

    fn emit(&self, msg: ServerMessage) {
        // No subscribers is fine
        let _ = self.events.send(msg);
    }
}
