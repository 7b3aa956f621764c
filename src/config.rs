//! Game settings and engine configuration

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Loosely-typed settings bag supplied when a game is created.
///
/// Each handler reads the keys it understands and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameSettings(Map<String, Value>);

impl GameSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and the simulator
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A strictly positive integer setting.
    /// Missing, non-numeric, zero and negative values all read as `None`.
    pub fn positive_u32(&self, key: &str) -> Option<u32> {
        let value = self.0.get(key)?;
        let n = value
            .as_u64()
            .or_else(|| value.as_f64().filter(|f| *f >= 1.0).map(|f| f as u64))?;
        u32::try_from(n).ok().filter(|n| *n > 0)
    }

    /// A flag that is on unless explicitly set to `false`
    pub fn flag_unless_false(&self, key: &str) -> bool {
        !matches!(self.0.get(key), Some(Value::Bool(false)))
    }
}

impl From<Map<String, Value>> for GameSettings {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Engine configuration for the simulator binary
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Game type to run
    pub game_type: String,
    /// Number of simulated players (the first one hosts)
    pub bot_count: usize,
    /// Round count override (None = handler default)
    pub rounds: Option<u32>,
    /// Seed for a replayable prompt order
    pub seed: Option<u64>,
    /// How often the deadline watcher checks timers
    pub tick_interval: Duration,
    /// Settings passed to the handler
    pub settings: GameSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            game_type: crate::games::would_you_rather::GAME_TYPE.to_string(),
            bot_count: 4,
            rounds: None,
            seed: None,
            tick_interval: Duration::from_millis(250),
            settings: GameSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let game_type = std::env::var("PARTY_GAME_TYPE")
            .ok()
            .and_then(|v| {
                let trimmed = v.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or(defaults.game_type);

        let bot_count = std::env::var("PARTY_BOTS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.bot_count);

        let rounds = std::env::var("PARTY_ROUNDS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .filter(|n: &u32| *n > 0);

        let seed = std::env::var("PARTY_SEED")
            .ok()
            .and_then(|v| v.trim().parse().ok());

        let tick_interval = std::env::var("PARTY_TICK_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .filter(|ms: &u64| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick_interval);

        let settings = match std::env::var("PARTY_SETTINGS") {
            Ok(raw) if !raw.trim().is_empty() => match serde_json::from_str(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Ignoring invalid PARTY_SETTINGS: {}", e);
                    GameSettings::default()
                }
            },
            _ => GameSettings::default(),
        };

        tracing::info!(
            game_type = %game_type,
            bot_count,
            ?rounds,
            ?seed,
            tick_ms = tick_interval.as_millis() as u64,
            "Engine config loaded"
        );

        Self {
            game_type,
            bot_count,
            rounds,
            seed,
            tick_interval,
            settings,
        }
    }
}
