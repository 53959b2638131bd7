use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::info;
use uuid::Uuid;

use crate::game::GameSession;

/// Owns every live session, keyed by id. Each session has its own mutex so
/// unrelated sessions never contend.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<Mutex<GameSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a fresh waiting session under a random id
    pub fn create(&self) -> (String, Arc<Mutex<GameSession>>) {
        let game_id = Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(GameSession::new(game_id.clone())));
        self.sessions
            .lock()
            .unwrap()
            .insert(game_id.clone(), session.clone());
        info!("Created game {}", game_id);
        (game_id, session)
    }

    pub fn get(&self, game_id: &str) -> Option<Arc<Mutex<GameSession>>> {
        self.sessions.lock().unwrap().get(game_id).cloned()
    }

    pub fn remove(&self, game_id: &str) {
        if self.sessions.lock().unwrap().remove(game_id).is_some() {
            info!("Removed game state for {}", game_id);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().unwrap().is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
