//! In-memory session registry
//!
//! Sessions are keyed by random version-4 UUID strings. The map lock is held
//! only for lookups and inserts; each session carries its own async mutex so
//! requests against the same id are serialized while different ids never wait
//! on each other.

use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::SessionError;
use crate::game::GameSession;
use crate::metrics;

pub type SharedSession = Arc<Mutex<GameSession>>;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SharedSession>>,
    rng: StdMutex<ChaCha20Rng>,
    /// 0 means unlimited
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        Self::with_rng(max_sessions, ChaCha20Rng::from_entropy())
    }

    #[cfg(test)]
    pub fn with_seed(max_sessions: usize, seed: u64) -> Self {
        Self::with_rng(max_sessions, ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(max_sessions: usize, rng: ChaCha20Rng) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            rng: StdMutex::new(rng),
            max_sessions,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, SharedSession>> {
        self.sessions.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, SharedSession>> {
        self.sessions.write().unwrap_or_else(|p| p.into_inner())
    }

    fn at_capacity(&self, live: usize) -> bool {
        self.max_sessions > 0 && live >= self.max_sessions
    }

    /// Fail fast when no further session could be created.
    pub fn check_capacity(&self) -> Result<(), SessionError> {
        if self.at_capacity(self.len()) {
            return Err(SessionError::CapacityExceeded(self.max_sessions));
        }
        Ok(())
    }

    /// Fresh unpredictable id, distinct from every live session.
    pub fn new_id(&self) -> String {
        let sessions = self.read();
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        loop {
            let id = uuid_v4(&mut *rng);
            if !sessions.contains_key(&id) {
                return id;
            }
        }
    }

    /// Register a session under its own id.
    pub fn create(&self, session: GameSession) -> Result<SharedSession, SessionError> {
        let id = session.id().to_string();
        let game_type = session.game_type();
        let mut sessions = self.write();

        if self.at_capacity(sessions.len()) {
            return Err(SessionError::CapacityExceeded(self.max_sessions));
        }
        if sessions.contains_key(&id) {
            return Err(SessionError::InvalidState(format!(
                "session id {} already in use",
                id
            )));
        }

        let shared = Arc::new(Mutex::new(session));
        sessions.insert(id.clone(), Arc::clone(&shared));
        let live = sessions.len();
        drop(sessions);

        metrics::GAMES_CREATED.inc();
        metrics::GAMES_ACTIVE.inc();
        info!(session_id = %id, game = %game_type, live, "Session created");
        Ok(shared)
    }

    pub fn get(&self, id: &str) -> Result<SharedSession, SessionError> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    pub fn remove(&self, id: &str) -> Result<(), SessionError> {
        match self.write().remove(id) {
            Some(_) => {
                metrics::GAMES_ACTIVE.dec();
                info!(session_id = %id, "Session deleted");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Remove sessions idle for at least `ttl`. Sessions a request has
    /// fetched or locked are skipped. Returns the number removed.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|id, session| {
            // Handles are only cloned under the map lock, so a count of one
            // means no request can be holding this session.
            if Arc::strong_count(session) > 1 {
                return true;
            }
            match session.try_lock() {
                Ok(guard) if guard.idle_for() >= ttl => {
                    debug!(session_id = %id, idle_secs = guard.idle_for().as_secs(), "Evicting idle session");
                    false
                }
                _ => true,
            }
        });
        let evicted = before - sessions.len();
        drop(sessions);

        if evicted > 0 {
            metrics::GAMES_ACTIVE.sub(evicted as i64);
            metrics::SESSIONS_EVICTED.inc_by(evicted as u64);
        }
        evicted
    }
}

/// Periodically evict sessions idle longer than `ttl`.
pub fn spawn_eviction(registry: Arc<SessionRegistry>, ttl: Duration) -> JoinHandle<()> {
    let period = (ttl / 2).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = registry.evict_idle(ttl);
            if evicted > 0 {
                info!(evicted, live = registry.len(), "Evicted idle sessions");
            }
        }
    })
}

/// 128 random bits formatted as a version-4 UUID.
fn uuid_v4<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::GameType;
    use std::collections::HashSet;

    fn registry(max_sessions: usize) -> SessionRegistry {
        engine_games::register_all_games();
        SessionRegistry::with_seed(max_sessions, 7)
    }

    fn create(registry: &SessionRegistry, game_type: GameType) -> String {
        let id = registry.new_id();
        let session = GameSession::new(id.clone(), game_type, true).unwrap();
        registry.create(session).unwrap();
        id
    }

    #[test]
    fn test_uuid_format() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let id = uuid_v4(&mut rng);

        assert_eq!(id.len(), 36);
        let groups: Vec<&str> = id.split('-').collect();
        assert_eq!(
            groups.iter().map(|g| g.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(groups[2].starts_with('4'));
        assert!(matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b')));
        assert!(id.chars().all(|c| c == '-' || c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = registry(0);
        let ids: HashSet<String> = (0..200).map(|_| registry.new_id()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_create_get_remove() {
        let registry = registry(0);
        assert!(registry.is_empty());

        let id = create(&registry, GameType::TicTacToe);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.ids(), vec![id.clone()]);

        let shared = registry.get(&id).unwrap();
        assert_eq!(shared.try_lock().unwrap().id(), id);

        registry.remove(&id).unwrap();
        assert!(registry.is_empty());
        assert!(matches!(registry.get(&id), Err(SessionError::NotFound(_))));
        assert!(matches!(registry.remove(&id), Err(SessionError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let registry = registry(0);
        let id = create(&registry, GameType::ConnectFour);
        let duplicate = GameSession::new(id, GameType::Chess, true).unwrap();
        assert!(matches!(
            registry.create(duplicate),
            Err(SessionError::InvalidState(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_capacity_limit() {
        let registry = registry(2);
        create(&registry, GameType::TicTacToe);
        let second = create(&registry, GameType::TicTacToe);

        assert!(matches!(
            registry.check_capacity(),
            Err(SessionError::CapacityExceeded(2))
        ));
        let extra = GameSession::new(registry.new_id(), GameType::TicTacToe, true).unwrap();
        assert!(matches!(
            registry.create(extra),
            Err(SessionError::CapacityExceeded(2))
        ));

        registry.remove(&second).unwrap();
        assert!(registry.check_capacity().is_ok());
    }

    #[test]
    fn test_sessions_are_independent() {
        let registry = registry(0);
        let a = create(&registry, GameType::TicTacToe);
        let b = create(&registry, GameType::TicTacToe);

        registry
            .get(&a)
            .unwrap()
            .try_lock()
            .unwrap()
            .apply_human_move(4)
            .unwrap();

        assert_eq!(registry.get(&a).unwrap().try_lock().unwrap().moves_played(), 1);
        assert_eq!(registry.get(&b).unwrap().try_lock().unwrap().moves_played(), 0);
    }

    #[test]
    fn test_evict_idle_skips_fresh_and_locked_sessions() {
        let registry = registry(0);
        let idle = create(&registry, GameType::TicTacToe);
        let busy = create(&registry, GameType::TicTacToe);
        std::thread::sleep(Duration::from_millis(30));
        let fresh = create(&registry, GameType::TicTacToe);

        let busy_session = registry.get(&busy).unwrap();
        let _held = busy_session.try_lock().unwrap();

        let evicted = registry.evict_idle(Duration::from_millis(25));
        assert_eq!(evicted, 1);
        assert!(registry.get(&idle).is_err());
        assert!(registry.get(&busy).is_ok());
        assert!(registry.get(&fresh).is_ok());
    }

    #[test]
    fn test_evict_idle_skips_fetched_sessions() {
        let registry = registry(0);
        let id = create(&registry, GameType::TicTacToe);
        let fetched = registry.get(&id).unwrap();
        std::thread::sleep(Duration::from_millis(30));

        assert_eq!(registry.evict_idle(Duration::from_millis(25)), 0);
        fetched.try_lock().unwrap().apply_human_move(4).unwrap();
        drop(fetched);
        assert_eq!(
            registry.get(&id).unwrap().try_lock().unwrap().moves_played(),
            1
        );

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(registry.evict_idle(Duration::from_millis(25)), 1);
        assert!(registry.get(&id).is_err());
    }

    #[test]
    fn test_evict_idle_with_long_ttl_keeps_everything() {
        let registry = registry(0);
        create(&registry, GameType::Chess);
        assert_eq!(registry.evict_idle(Duration::from_secs(3600)), 0);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_spawned_eviction_task_runs() {
        let registry = Arc::new(registry(0));
        create(&registry, GameType::ConnectFour);

        let handle = spawn_eviction(Arc::clone(&registry), Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert!(registry.is_empty());
    }
}
