//! In-memory session registry (spec section 4.10). Tracks the seed handed
//! out at `/game/start` per player so a submission can be checked against
//! it, and sweeps expired sessions on a timer.

use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::config::SessionConfig;
use crate::model::GameSession;
use crate::Seed;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, GameSession>>,
    config: SessionConfig,
}

impl SessionRegistry {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub async fn start(&self, player_id: String, seed: Seed) {
        let session = GameSession {
            player_id: player_id.clone(),
            seed,
            start_time: Instant::now(),
        };
        self.sessions.write().await.insert(player_id, session);
    }

    pub async fn seed_for(&self, player_id: &str) -> Option<Seed> {
        self.sessions.read().await.get(player_id).map(|s| s.seed)
    }

    pub async fn consume(&self, player_id: &str) -> Option<GameSession> {
        self.sessions.write().await.remove(player_id)
    }

    /// Removes sessions older than the configured TTL. Intended to be
    /// driven by a periodic `tokio::time::interval` task started alongside
    /// the server.
    pub async fn sweep(&self) -> usize {
        let mut guard = self.sessions.write().await;
        let before = guard.len();
        guard.retain(|_, session| session.start_time.elapsed() < self.config.ttl);
        before - guard.len()
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        self.config.sweep_interval
    }
}
