use crate::session::GameSession;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Spawn a background task that applies phase deadlines to a session.
///
/// Handlers never own timers; this watcher is the engine's scheduler. It exits
/// once the final round has been scored.
pub fn spawn_deadline_watcher(
    session: Arc<RwLock<GameSession>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;

            let mut s = session.write().await;
            if s.tick(chrono::Utc::now()) {
                tracing::debug!(session = %s.id(), stage = ?s.stage(), "Deadline applied");
            }

            if s.is_finished() {
                tracing::info!(session = %s.id(), "Deadline watcher stopping, game finished");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::games::would_you_rather::GAME_TYPE;
    use crate::handler::HandlerRegistry;
    use crate::session::RoundStage;
    use crate::types::Player;

    fn one_round_session(settings: GameSettings) -> GameSession {
        GameSession::new(
            &HandlerRegistry::default(),
            GAME_TYPE,
            vec![Player::host("p1", "Alice"), Player::new("p2", "Bob")],
            &settings,
            Some(1),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_watcher_closes_expired_round() {
        let settings = GameSettings::new()
            .with("timerSeconds", 1)
            .with("enableDebate", false);
        let mut session = one_round_session(settings);
        session.start_round().unwrap();
        session
            .submit_action("p1", "vote", &serde_json::json!({"choice": "A"}))
            .unwrap();

        let session = Arc::new(RwLock::new(session));
        let watcher = spawn_deadline_watcher(session.clone(), Duration::from_millis(20));

        tokio::time::timeout(Duration::from_secs(5), watcher)
            .await
            .expect("watcher should stop once the game is finished")
            .unwrap();

        let session = session.read().await;
        assert_eq!(session.stage(), RoundStage::Scored);
        assert!(session.is_finished());
        let scores = &session.last_results().unwrap().scores;
        assert_eq!(scores.get("p1"), Some(&10));
        assert_eq!(scores.get("p2"), Some(&0));
    }

    #[tokio::test]
    async fn test_watcher_leaves_open_round_alone() {
        let mut session = one_round_session(GameSettings::new());
        session.start_round().unwrap();

        let session = Arc::new(RwLock::new(session));
        let watcher = spawn_deadline_watcher(session.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(session.read().await.stage(), RoundStage::Collecting);
        watcher.abort();
    }
}
