//! Terminal-oriented Unicode board renderer for diagnostics and the CLI.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::game_state::GameState;

/// Render the board of an accepted state, status line last.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = match game_state.board() {
        Ok(board) => render_board(&board),
        Err(err) => format!("<unrenderable board: {err}>"),
    };
    out.push('\n');
    out.push_str(game_state.status.name());
    out
}

/// Assumes square indexing where `0 == A1`, `7 == H1`, and `63 == H8`.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();

    out.push_str("  A B C D E F G H\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            match board.occupant(rank * 8 + file) {
                Some((piece, kind)) => out.push(piece_to_unicode(piece.color(), kind)),
                None => out.push('·'),
            }

            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  A B C D E F G H");

    out
}

fn piece_to_unicode(color: Color, piece: PieceKind) -> char {
    match (color, piece) {
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::King) => '♔',
        (Color::Black, PieceKind::Pawn) => '♟',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::King) => '♚',
    }
}

#[cfg(test)]
mod tests {
    use super::render_game_state;
    use crate::game_state::game_state::GameState;

    #[test]
    fn new_game_renders_both_back_ranks() {
        let rendered = render_game_state(&GameState::new_game());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ 8");
        assert_eq!(lines[8], "1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ 1");
        assert_eq!(lines[5], "4 · · · · · · · · 4");
        assert_eq!(lines.last().copied(), Some("Waiting"));
    }
}
