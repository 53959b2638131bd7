use thiserror::Error;

/// Reasons a client request gets rejected; each maps to one error event
/// sent back to the offending connection only.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("Name must not be empty")]
    EmptyName,
    #[error("No game ID provided")]
    MissingGameId,
    #[error("Game not found")]
    GameNotFound,
    #[error("Game is full")]
    SessionFull,
    #[error("Game is not active")]
    GameNotActive,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Cell is already occupied")]
    CellOccupied,
    #[error("Position must be between 0 and 8")]
    InvalidPosition,
    #[error("Already waiting in the queue")]
    AlreadyQueued,
    #[error("Already in a game")]
    AlreadyInGame,
    #[error("Not in the queue")]
    NotQueued,
}
