use serde::{Deserialize, Serialize};

/// Mark placed by a player. Serializes as `"X"` / `"O"` on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub fn other(self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

/// A 3x3 board in row-major order. `None` is an empty cell.
pub type Board = [Option<Symbol>; 9];

/// The 8 winning triples: 3 rows, 3 columns, 2 diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of scanning a board for a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ongoing,
    Won { symbol: Symbol, line: [usize; 3] },
    Draw,
}

/// Scan the 8 fixed lines for a winner; a full board with no line is a draw
pub fn evaluate(board: &Board) -> Verdict {
    for line in LINES {
        if let Some(symbol) = board[line[0]] {
            if board[line[1]] == Some(symbol) && board[line[2]] == Some(symbol) {
                return Verdict::Won { symbol, line };
            }
        }
    }
    if board.iter().all(|cell| cell.is_some()) {
        Verdict::Draw
    } else {
        Verdict::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_is_ongoing() {
        let board: Board = [None; 9];
        assert_eq!(evaluate(&board), Verdict::Ongoing);
    }

    #[test]
    fn detects_every_winning_line() {
        for line in LINES {
            let mut board: Board = [None; 9];
            for cell in line {
                board[cell] = Some(Symbol::O);
            }
            assert_eq!(
                evaluate(&board),
                Verdict::Won { symbol: Symbol::O, line },
                "line {:?} not detected",
                line
            );
        }
    }

    #[test]
    fn mixed_line_is_not_a_win() {
        let mut board: Board = [None; 9];
        board[0] = Some(Symbol::X);
        board[1] = Some(Symbol::X);
        board[2] = Some(Symbol::O);
        assert_eq!(evaluate(&board), Verdict::Ongoing);
    }

    #[test]
    fn full_board_without_a_line_is_a_draw() {
        use Symbol::{O, X};
        let board: Board = [
            Some(X),
            Some(X),
            Some(O),
            Some(O),
            Some(O),
            Some(X),
            Some(X),
            Some(O),
            Some(X),
        ];
        assert_eq!(evaluate(&board), Verdict::Draw);
    }

    #[test]
    fn win_beats_draw_on_a_full_board() {
        use Symbol::{O, X};
        let board: Board = [
            Some(X),
            Some(X),
            Some(X),
            Some(O),
            Some(O),
            Some(X),
            Some(X),
            Some(O),
            Some(O),
        ];
        assert_eq!(
            evaluate(&board),
            Verdict::Won {
                symbol: X,
                line: [0, 1, 2]
            }
        );
    }

    #[test]
    fn symbol_serializes_as_bare_letter() {
        assert_eq!(serde_json::to_string(&Symbol::X).unwrap(), "\"X\"");
        assert_eq!(serde_json::to_string(&Symbol::O).unwrap(), "\"O\"");
    }
}
