pub mod board;
pub mod error;
pub mod session;

// Re-export important types
pub use board::{evaluate, Board, Symbol, Verdict};
pub use error::GameError;
pub use session::{GameSession, Player, SessionSnapshot, SessionStatus};
