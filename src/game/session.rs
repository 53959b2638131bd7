use serde::{Deserialize, Serialize};

use crate::game::board::{evaluate, Board, Symbol, Verdict};
use crate::game::error::GameError;

/// A player bound to a session; the symbol never changes once assigned
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub symbol: Symbol,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Waiting,
    Playing,
    Finished,
}

/// Full session state, sent to both participants after every accepted change
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: String,
    pub board: Board,
    pub players: Vec<Player>,
    pub current_turn: Option<String>,
    pub status: SessionStatus,
    pub winner: Option<String>,
}

/// One tic-tac-toe match between exactly two players.
/// Waiting -> Playing -> Finished; Finished is terminal.
pub struct GameSession {
    id: String,
    board: Board,
    players: Vec<Player>,
    current_turn: Option<String>,
    status: SessionStatus,
    winner: Option<String>,
}

impl GameSession {
    pub fn new(id: String) -> Self {
        GameSession {
            id,
            board: [None; 9],
            players: Vec::with_capacity(2),
            current_turn: None,
            status: SessionStatus::Waiting,
            winner: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    /// Bind a player to the next free slot; first joiner plays X and the
    /// match starts once both slots are filled.
    pub fn join(&mut self, player_id: &str, name: &str) -> Result<(), GameError> {
        if self.status != SessionStatus::Waiting || self.players.len() >= 2 {
            return Err(GameError::SessionFull);
        }
        if self.has_player(player_id) {
            return Err(GameError::AlreadyInGame);
        }
        let symbol = if self.players.is_empty() {
            Symbol::X
        } else {
            Symbol::O
        };
        self.players.push(Player {
            id: player_id.to_string(),
            name: name.to_string(),
            symbol,
        });
        if self.players.len() == 2 {
            self.status = SessionStatus::Playing;
            self.current_turn = Some(self.players[0].id.clone());
        }
        Ok(())
    }

    /// Apply one move at `position` (0-8). A rejected move leaves the
    /// session untouched.
    pub fn apply_move(&mut self, player_id: &str, position: i64) -> Result<(), GameError> {
        if self.status != SessionStatus::Playing {
            return Err(GameError::GameNotActive);
        }
        if self.current_turn.as_deref() != Some(player_id) {
            return Err(GameError::NotYourTurn);
        }
        let cell = match usize::try_from(position) {
            Ok(p) if p < 9 => p,
            _ => return Err(GameError::InvalidPosition),
        };
        if self.board[cell].is_some() {
            return Err(GameError::CellOccupied);
        }
        let mover = self
            .players
            .iter()
            .find(|p| p.id == player_id)
            .ok_or(GameError::NotYourTurn)?;
        let symbol = mover.symbol;
        self.board[cell] = Some(symbol);

        match evaluate(&self.board) {
            Verdict::Won { .. } => {
                self.status = SessionStatus::Finished;
                self.winner = Some(player_id.to_string());
                self.current_turn = None;
            }
            Verdict::Draw => {
                self.status = SessionStatus::Finished;
                self.winner = None;
                self.current_turn = None;
            }
            Verdict::Ongoing => {
                self.current_turn = self
                    .players
                    .iter()
                    .find(|p| p.id != player_id)
                    .map(|p| p.id.clone());
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            board: self.board,
            players: self.players.clone(),
            current_turn: self.current_turn.clone(),
            status: self.status,
            winner: self.winner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_pair() -> GameSession {
        let mut session = GameSession::new("g1".to_string());
        session.join("alice", "Alice").unwrap();
        session.join("bob", "Bob").unwrap();
        session
    }

    #[test]
    fn first_joiner_plays_x_second_plays_o() {
        let mut session = GameSession::new("g1".to_string());
        assert_eq!(session.status(), SessionStatus::Waiting);
        session.join("alice", "Alice").unwrap();
        assert_eq!(session.status(), SessionStatus::Waiting);
        session.join("bob", "Bob").unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.status, SessionStatus::Playing);
        assert_eq!(snap.players[0].symbol, Symbol::X);
        assert_eq!(snap.players[1].symbol, Symbol::O);
        assert_eq!(snap.current_turn.as_deref(), Some("alice"));
        assert_eq!(snap.winner, None);
    }

    #[test]
    fn third_join_is_rejected() {
        let mut session = fresh_pair();
        assert_eq!(
            session.join("carol", "Carol"),
            Err(GameError::SessionFull)
        );
        assert_eq!(session.snapshot().players.len(), 2);
    }

    #[test]
    fn joining_twice_is_rejected() {
        let mut session = GameSession::new("g1".to_string());
        session.join("alice", "Alice").unwrap();
        assert_eq!(
            session.join("alice", "Alice"),
            Err(GameError::AlreadyInGame)
        );
    }

    #[test]
    fn moving_before_both_joined_is_rejected() {
        let mut session = GameSession::new("g1".to_string());
        session.join("alice", "Alice").unwrap();
        assert_eq!(
            session.apply_move("alice", 0),
            Err(GameError::GameNotActive)
        );
    }

    #[test]
    fn turn_alternates_after_every_non_terminal_move() {
        let mut session = fresh_pair();
        session.apply_move("alice", 0).unwrap();
        assert_eq!(session.snapshot().current_turn.as_deref(), Some("bob"));
        session.apply_move("bob", 4).unwrap();
        assert_eq!(session.snapshot().current_turn.as_deref(), Some("alice"));
    }

    #[test]
    fn moving_out_of_turn_is_rejected() {
        let mut session = fresh_pair();
        assert_eq!(session.apply_move("bob", 0), Err(GameError::NotYourTurn));
        assert_eq!(session.snapshot().board, [None; 9]);
    }

    #[test]
    fn occupied_cell_is_rejected() {
        let mut session = fresh_pair();
        session.apply_move("alice", 4).unwrap();
        assert_eq!(session.apply_move("bob", 4), Err(GameError::CellOccupied));
        let snap = session.snapshot();
        assert_eq!(snap.board[4], Some(Symbol::X));
        assert_eq!(snap.current_turn.as_deref(), Some("bob"));
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let mut session = fresh_pair();
        assert_eq!(
            session.apply_move("alice", 9),
            Err(GameError::InvalidPosition)
        );
        assert_eq!(
            session.apply_move("alice", -1),
            Err(GameError::InvalidPosition)
        );
        assert_eq!(session.snapshot().board, [None; 9]);
        assert_eq!(session.snapshot().current_turn.as_deref(), Some("alice"));
    }

    #[test]
    fn top_row_win_finishes_the_session() {
        let mut session = fresh_pair();
        session.apply_move("alice", 0).unwrap();
        session.apply_move("bob", 4).unwrap();
        session.apply_move("alice", 1).unwrap();
        session.apply_move("bob", 3).unwrap();
        session.apply_move("alice", 2).unwrap();

        let snap = session.snapshot();
        use Symbol::{O, X};
        assert_eq!(
            snap.board,
            [
                Some(X),
                Some(X),
                Some(X),
                Some(O),
                Some(O),
                None,
                None,
                None,
                None
            ]
        );
        assert_eq!(snap.status, SessionStatus::Finished);
        assert_eq!(snap.winner.as_deref(), Some("alice"));
        assert_eq!(snap.current_turn, None);
    }

    #[test]
    fn full_board_without_a_line_is_a_draw() {
        let mut session = fresh_pair();
        // X takes 0,1,5,6,8 and O takes 2,3,4,7: no line for either side.
        for (player, position) in [
            ("alice", 0),
            ("bob", 2),
            ("alice", 1),
            ("bob", 3),
            ("alice", 5),
            ("bob", 4),
            ("alice", 6),
            ("bob", 7),
            ("alice", 8),
        ] {
            session.apply_move(player, position).unwrap();
        }
        let snap = session.snapshot();
        assert_eq!(snap.status, SessionStatus::Finished);
        assert_eq!(snap.winner, None);
        assert_eq!(snap.current_turn, None);
        assert!(snap.board.iter().all(|cell| cell.is_some()));
    }

    #[test]
    fn moves_after_the_end_are_rejected() {
        let mut session = fresh_pair();
        for (player, position) in
            [("alice", 0), ("bob", 4), ("alice", 1), ("bob", 3), ("alice", 2)]
        {
            session.apply_move(player, position).unwrap();
        }
        let before = session.snapshot();
        assert_eq!(session.apply_move("bob", 5), Err(GameError::GameNotActive));
        let after = session.snapshot();
        assert_eq!(after.board, before.board);
        assert_eq!(after.status, SessionStatus::Finished);
    }

    #[test]
    fn snapshot_uses_the_wire_shape() {
        let session = fresh_pair();
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["status"], "playing");
        assert_eq!(json["currentTurn"], "alice");
        assert_eq!(json["winner"], serde_json::Value::Null);
        assert_eq!(json["board"].as_array().unwrap().len(), 9);
        assert_eq!(json["players"][0]["symbol"], "X");
    }
}
