use std::collections::VecDeque;
use std::time::Instant;

use crate::game::GameError;

/// A player waiting to be paired.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub player_id: String,
    pub name: String,
    pub enqueued_at: Instant,
}

/// FIFO queue of players waiting for an opponent. The caller holds this
/// behind one lock so check-and-pop stays atomic.
#[derive(Debug, Default)]
pub struct MatchQueue {
    entries: VecDeque<QueueEntry>,
}

impl MatchQueue {
    pub fn new() -> Self {
        MatchQueue {
            entries: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.entries.iter().any(|e| e.player_id == player_id)
    }

    pub fn enqueue(&mut self, player_id: &str, name: &str) -> Result<(), GameError> {
        if self.contains(player_id) {
            return Err(GameError::AlreadyQueued);
        }
        self.entries.push_back(QueueEntry {
            player_id: player_id.to_string(),
            name: name.to_string(),
            enqueued_at: Instant::now(),
        });
        Ok(())
    }

    pub fn remove(&mut self, player_id: &str) -> Result<(), GameError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.player_id != player_id);
        if self.entries.len() == before {
            return Err(GameError::NotQueued);
        }
        Ok(())
    }

    /// Pop the two longest-waiting entries, if at least two are present
    pub fn pop_pair(&mut self) -> Option<(QueueEntry, QueueEntry)> {
        if self.entries.len() < 2 {
            return None;
        }
        let first = self.entries.pop_front()?;
        let second = self.entries.pop_front()?;
        Some((first, second))
    }

    pub fn waiting_ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.player_id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueueing_twice_is_rejected() {
        let mut queue = MatchQueue::new();
        queue.enqueue("alice", "Alice").unwrap();
        assert_eq!(
            queue.enqueue("alice", "Alice"),
            Err(GameError::AlreadyQueued)
        );
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn removing_an_absent_player_is_an_error() {
        let mut queue = MatchQueue::new();
        assert_eq!(queue.remove("alice"), Err(GameError::NotQueued));
        queue.enqueue("alice", "Alice").unwrap();
        queue.remove("alice").unwrap();
        assert_eq!(queue.remove("alice"), Err(GameError::NotQueued));
    }

    #[test]
    fn pairing_needs_two_waiters() {
        let mut queue = MatchQueue::new();
        assert!(queue.pop_pair().is_none());
        queue.enqueue("alice", "Alice").unwrap();
        assert!(queue.pop_pair().is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn pairing_takes_the_two_oldest_entries() {
        let mut queue = MatchQueue::new();
        queue.enqueue("alice", "Alice").unwrap();
        queue.enqueue("bob", "Bob").unwrap();
        queue.enqueue("carol", "Carol").unwrap();

        let (first, second) = queue.pop_pair().unwrap();
        assert_eq!(first.player_id, "alice");
        assert_eq!(second.player_id, "bob");
        assert!(first.enqueued_at <= second.enqueued_at);
        assert_eq!(queue.waiting_ids(), vec!["carol".to_string()]);
    }
}
