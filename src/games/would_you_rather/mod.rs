//! "Would You Rather" round handler
//!
//! Each round shows one two-option prompt. Connected players vote once for A or B,
//! an optional host-moderated debate follows, and the round is scored by majority:
//! 10 points for siding with the majority, 5 for the minority, 7 each on a tie.

mod catalog;
mod score;
mod vote;

pub use catalog::{Category, Prompt, PROMPTS};
pub use score::{Majority, PromptCard, WyrSummary};

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::config::GameSettings;
use crate::handler::{GameHandler, RoundStep};
use crate::types::{GameData, GameState, PlayerId, RoundResults};

pub const GAME_TYPE: &str = "would-you-rather";
pub const DEFAULT_TIMER_SECONDS: u32 = 15;
pub const DEFAULT_DEBATE_SECONDS: u32 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Choice {
    A,
    B,
}

/// Sub-state of a round: `waiting -> voting -> (debate ->)? results`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Waiting,
    Voting,
    Debate,
    Results,
}

impl Phase {
    /// Every round starts in voting, whatever the previous round ended in
    pub fn start_voting(&mut self) {
        *self = Phase::Voting;
    }

    /// `voting -> debate`; returns false and leaves the phase alone otherwise
    pub fn open_debate(&mut self) -> bool {
        if *self == Phase::Voting {
            *self = Phase::Debate;
            true
        } else {
            false
        }
    }

    /// `voting | debate -> results`
    pub fn close(&mut self) -> bool {
        match self {
            Phase::Voting | Phase::Debate => {
                *self = Phase::Results;
                true
            }
            Phase::Waiting | Phase::Results => false,
        }
    }
}

/// Handler-private slice of the game state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WyrData {
    /// Shuffled permutation of indices into [`PROMPTS`]
    pub prompts: Vec<usize>,
    /// Next prompt cursor; only ever grows, read modulo `prompts.len()`
    pub prompt_index: usize,
    /// Catalog index of the active prompt
    pub current_prompt: Option<usize>,
    pub votes: HashMap<PlayerId, Choice>,
    pub phase: Phase,
    pub timer_duration: u32,
    pub debate_duration: u32,
    pub enable_debate: bool,
    pub round_results: Option<WyrSummary>,
}

impl WyrData {
    pub fn current_prompt(&self) -> Option<&'static Prompt> {
        self.current_prompt.and_then(|i| PROMPTS.get(i))
    }

    /// The shuffled prompt sequence, resolved against the catalog
    pub fn prompt_sequence(&self) -> impl Iterator<Item = &'static Prompt> + '_ {
        self.prompts.iter().filter_map(|&i| PROMPTS.get(i))
    }
}

/// Access this game's data inside an engine-owned state
pub fn wyr_data(state: &GameState) -> Option<&WyrData> {
    match &state.game_data {
        GameData::WouldYouRather(data) => Some(data),
        _ => None,
    }
}

pub(crate) fn wyr_data_mut(state: &mut GameState) -> Option<&mut WyrData> {
    match &mut state.game_data {
        GameData::WouldYouRather(data) => Some(data),
        _ => None,
    }
}

pub struct WouldYouRather;

impl GameHandler for WouldYouRather {
    fn game_type(&self) -> &'static str {
        GAME_TYPE
    }

    fn min_players(&self) -> usize {
        2
    }

    fn max_players(&self) -> usize {
        20
    }

    fn default_rounds(&self) -> u32 {
        10
    }

    fn create_initial_state(&self, settings: &GameSettings, rng: &mut dyn RngCore) -> GameData {
        let mut prompts: Vec<usize> = (0..PROMPTS.len()).collect();
        prompts.shuffle(rng);

        GameData::WouldYouRather(WyrData {
            prompts,
            prompt_index: 0,
            current_prompt: None,
            votes: HashMap::new(),
            phase: Phase::Waiting,
            timer_duration: settings
                .positive_u32("timerSeconds")
                .unwrap_or(DEFAULT_TIMER_SECONDS),
            debate_duration: settings
                .positive_u32("debateSeconds")
                .unwrap_or(DEFAULT_DEBATE_SECONDS),
            enable_debate: settings.flag_unless_false("enableDebate"),
            round_results: None,
        })
    }

    fn on_round_start(&self, state: &mut GameState) {
        let Some(data) = wyr_data_mut(state) else {
            tracing::warn!("Round start without would-you-rather data, ignoring");
            return;
        };
        if data.prompts.is_empty() {
            return;
        }

        let slot = data.prompt_index % data.prompts.len();
        data.current_prompt = Some(data.prompts[slot]);
        data.votes.clear();
        data.phase.start_voting();
        data.prompt_index += 1;
        data.round_results = None;

        let timer = data.timer_duration;
        let prompt = data.current_prompt;
        state.timer_duration = timer;

        tracing::info!(round = state.round, ?prompt, timer, "Voting opened");
    }

    fn handle_action(&self, state: &mut GameState, player_id: &str, action: &str, payload: &Value) {
        vote::handle_action(state, player_id, action, payload);
    }

    fn is_round_over(&self, state: &GameState) -> bool {
        let Some(data) = wyr_data(state) else {
            return false;
        };
        state
            .connected_players()
            .all(|p| data.votes.contains_key(&p.id))
    }

    fn get_round_results(&self, state: &mut GameState) -> RoundResults {
        score::close_round(state)
    }

    fn after_voting(&self, state: &mut GameState) -> RoundStep {
        let Some(data) = wyr_data_mut(state) else {
            return RoundStep::Finalize;
        };
        if !data.enable_debate || !data.phase.open_debate() {
            return RoundStep::Finalize;
        }

        let seconds = data.debate_duration;
        state.timer_duration = seconds;
        tracing::info!(round = state.round, seconds, "Debate opened");
        RoundStep::Extend { seconds }
    }

    fn is_ready_for_results(&self, state: &GameState) -> bool {
        !matches!(wyr_data(state), Some(d) if d.phase == Phase::Debate)
    }
}
