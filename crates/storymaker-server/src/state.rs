//! Shared application state for the game server.
//!
//! [`AppState`] holds the entity registry, the game configuration, and the
//! session registry. Sessions are keyed by player name so a reconnecting
//! client that sends the same `start{name, seed}` resumes where it left off.
//! Sessions are kept for the life of the process so any later reconnect can
//! resume; starting with a new seed replaces the entry.

use std::collections::BTreeMap;
use std::sync::Arc;

use storymaker_entities::EntityRegistry;
use storymaker_types::{Profile, StartCommand};
use storymaker_world::{GameConfig, Session, WorldError};
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// A session shared between the connections bound to it.
pub type SharedSession = Arc<Mutex<Session>>;

/// A registered session and the seed it was started with, so lookups never
/// wait on a session that is busy with a command.
struct SessionEntry {
    seed: u64,
    session: SharedSession,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
pub struct AppState {
    /// Closed registry of entity types.
    pub registry: Arc<EntityRegistry>,
    /// Game configuration applied to new sessions.
    pub config: GameConfig,
    /// Live sessions keyed by player name.
    sessions: RwLock<BTreeMap<String, SessionEntry>>,
}

impl AppState {
    /// Create a state with no session.
    pub fn new(registry: Arc<EntityRegistry>, config: GameConfig) -> Self {
        Self {
            registry,
            config,
            sessions: RwLock::new(BTreeMap::new()),
        }
    }

    /// Resume the player's session if it was started with the same seed,
    /// otherwise start a fresh one in its place.
    ///
    /// # Errors
    ///
    /// Returns a [`WorldError`] if the new world cannot be generated.
    pub async fn open_session(&self, start: StartCommand) -> Result<SharedSession, WorldError> {
        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get(&start.name).filter(|entry| entry.seed == start.seed) {
            info!(name = %start.name, seed = start.seed, "session resumed");
            return Ok(Arc::clone(&existing.session));
        }

        let session = Session::new(
            Arc::clone(&self.registry),
            &self.config,
            Profile {
                name: start.name.clone(),
                seed: start.seed,
            },
        )?;
        let shared = Arc::new(Mutex::new(session));
        sessions.insert(
            start.name,
            SessionEntry {
                seed: start.seed,
                session: Arc::clone(&shared),
            },
        );
        Ok(shared)
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl core::fmt::Debug for AppState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use core::time::Duration;

    use storymaker_entities::objects;
    use tokio::time::timeout;

    use super::*;

    fn state() -> AppState {
        AppState::new(Arc::new(objects::registry().unwrap()), GameConfig::default())
    }

    fn start(name: &str, seed: u64) -> StartCommand {
        StartCommand {
            name: name.to_owned(),
            seed,
        }
    }

    #[tokio::test]
    async fn same_name_and_seed_resumes() {
        let state = state();
        let first = state.open_session(start("Ada", 3)).await.unwrap();
        let second = state.open_session(start("Ada", 3)).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(state.session_count().await, 1);
    }

    #[tokio::test]
    async fn new_seed_replaces_the_session() {
        let state = state();
        let first = state.open_session(start("Ada", 3)).await.unwrap();
        let second = state.open_session(start("Ada", 4)).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.lock().await.profile().seed, 4);
        assert_eq!(state.session_count().await, 1);

        state.open_session(start("Grace", 4)).await.unwrap();
        assert_eq!(state.session_count().await, 2);
    }

    #[tokio::test]
    async fn reopening_does_not_wait_for_a_busy_session() {
        let state = state();
        let first = state.open_session(start("Ada", 3)).await.unwrap();
        let _busy = first.lock().await;

        let second = timeout(Duration::from_secs(1), state.open_session(start("Ada", 3)))
            .await
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        let count = timeout(Duration::from_secs(1), state.session_count()).await.unwrap();
        assert_eq!(count, 1);
    }
}
