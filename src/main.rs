use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use partydash::config::EngineConfig;
use partydash::handler::HandlerRegistry;
use partydash::protocol::{ClientMessage, ServerMessage};
use partydash::session::{GameSession, RoundStage};
use partydash::timer;
use partydash::types::{Player, PlayerId};

/// Chance that a bot sits a round out
const ABSTAIN_PROBABILITY: f64 = 0.1;

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "partydash=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PartyDash simulation...");

    let config = EngineConfig::from_env();
    let registry = HandlerRegistry::default();
    let players = make_bots(config.bot_count);

    let created = match config.seed {
        Some(seed) => GameSession::with_rng(
            &registry,
            &config.game_type,
            players.clone(),
            &config.settings,
            config.rounds,
            &mut StdRng::seed_from_u64(seed),
        ),
        None => GameSession::new(
            &registry,
            &config.game_type,
            players.clone(),
            &config.settings,
            config.rounds,
        ),
    };
    let session = match created {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Cannot create game: {}", e);
            std::process::exit(1);
        }
    };

    spawn_event_logger(session.subscribe());
    let session = Arc::new(RwLock::new(session));
    let watcher = timer::spawn_deadline_watcher(session.clone(), config.tick_interval);

    loop {
        {
            let mut s = session.write().await;
            if s.is_finished() {
                break;
            }
            if let Err(e) = s.start_round() {
                tracing::error!("Cannot start round: {}", e);
                break;
            }
        }
        play_round(&session, &players, config.tick_interval).await;
    }

    if let Err(e) = watcher.await {
        tracing::warn!("Deadline watcher ended abnormally: {}", e);
    }

    let standings = session.read().await.leaderboard();
    match serde_json::to_string_pretty(&standings) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to serialize leaderboard: {}", e),
    }
}

fn make_bots(count: usize) -> Vec<Player> {
    (0..count)
        .map(|i| {
            let id: PlayerId = ulid::Ulid::new().to_string();
            let name = petname::petname(2, " ").unwrap_or_else(|| format!("Bot {}", i + 1));
            if i == 0 {
                Player::host(id, name)
            } else {
                Player::new(id, name)
            }
        })
        .collect()
}

/// Every bot votes after a random delay; the host bot cuts any debate short
async fn play_round(session: &Arc<RwLock<GameSession>>, players: &[Player], poll: Duration) {
    let mut votes = Vec::new();
    for player in players {
        let (delay, message) = {
            let mut rng = rand::rng();
            if rng.random_bool(ABSTAIN_PROBABILITY) {
                tracing::debug!(player = %player.name, "Bot abstains this round");
                continue;
            }
            let choice = if rng.random_bool(0.5) { "A" } else { "B" };
            (
                Duration::from_millis(rng.random_range(100..1500)),
                ClientMessage::new("vote", serde_json::json!({ "choice": choice })),
            )
        };

        let session = session.clone();
        let player_id = player.id.clone();
        votes.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut s = session.write().await;
            if let Err(e) = s.submit_action(&player_id, &message.action, &message.payload) {
                tracing::debug!(player_id = %player_id, "Vote not accepted: {}", e);
            }
        }));
    }

    for vote in votes {
        let _ = vote.await;
    }

    let host = players.iter().find(|p| p.is_host);
    loop {
        let stage = session.read().await.stage();
        match stage {
            RoundStage::Scored | RoundStage::Idle => break,
            RoundStage::Extended => {
                tokio::time::sleep(Duration::from_secs(1)).await;
                if let Some(host) = host {
                    let message = ClientMessage::new("end_debate", serde_json::Value::Null);
                    let mut s = session.write().await;
                    if s.stage() == RoundStage::Extended {
                        let _ = s.submit_action(&host.id, &message.action, &message.payload);
                    }
                }
            }
            RoundStage::Collecting => tokio::time::sleep(poll).await,
        }
    }
}

fn spawn_event_logger(mut events: broadcast::Receiver<ServerMessage>) {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(msg) => match serde_json::to_string(&msg) {
                    Ok(json) => tracing::info!("event: {}", json),
                    Err(e) => tracing::warn!("Failed to serialize event: {}", e),
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event logger lagged, skipped {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
