//! Full legal action pipeline.
//!
//! Piece-wise generation yields candidate actions from the board alone; each
//! candidate is then replayed on a scratch board and dropped when it leaves
//! the mover's own king attacked.

use crate::errors::DecodeError;
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::apply_to_board;
use crate::move_generation::legal_move_checks::is_king_safe;
use crate::move_generation::legal_moves_king::generate_king_actions;
use crate::move_generation::legal_moves_knight::generate_knight_actions;
use crate::move_generation::legal_moves_pawn::generate_pawn_actions;
use crate::move_generation::legal_moves_sliding::generate_sliding_actions;
use crate::move_generation::move_generator::{MoveContext, TurnInfo};
use crate::moves::move_descriptions::Action;

/// Legal actions of the piece standing on `from`; empty for an empty square.
pub fn legal_actions_for(board: &Board, from: Square, context: &MoveContext) -> Vec<Action> {
    let Some((piece, kind)) = board.occupant(from) else {
        return Vec::new();
    };
    let color = piece.color();

    let mut pseudo = Vec::with_capacity(32);
    match kind {
        PieceKind::Pawn => generate_pawn_actions(board, from, color, context, &mut pseudo),
        PieceKind::Knight => generate_knight_actions(board, from, color, &mut pseudo),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            generate_sliding_actions(board, from, color, kind, &mut pseudo)
        }
        PieceKind::King => generate_king_actions(board, from, color, context, &mut pseudo),
    }

    // Illegal if own king is attacked after the action.
    pseudo.retain(|action| is_king_safe(&apply_to_board(board, from, *action), color));
    pseudo
}

/// Legal actions of every piece of `color` still on the board.
pub fn get_turn_info(board: &Board, color: Color, context: &MoveContext) -> TurnInfo {
    let mut info = TurnInfo {
        king_in_check: !is_king_safe(board, color),
        ..TurnInfo::default()
    };
    for (square, piece, _) in board.pieces_of(color) {
        info.actions.insert(piece, legal_actions_for(board, square, context));
    }
    info
}

/// `get_turn_info` against an accepted state's board and context.
pub fn legal_actions_for_color(state: &GameState, color: Color) -> Result<TurnInfo, DecodeError> {
    let board = state.board()?;
    Ok(get_turn_info(&board, color, &state.move_context()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::{CastleRights, CastleSide, GameStatus, PieceId};
    use crate::game_state::game_state::TurnSnapshot;
    use crate::move_generation::legal_move_apply::apply_action;
    use crate::moves::move_descriptions::ActionKind;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("test square should parse")
    }

    fn id(color: Color, kind: PieceKind, ordinal: u8) -> PieceId {
        PieceId::from_parts(color, kind, ordinal).expect("test piece should exist")
    }

    fn state_of(mover: Color, rights: CastleRights, placements: &[(PieceId, Square)]) -> GameState {
        GameState {
            snapshot: TurnSnapshot::from_placements(mover, rights, placements),
            en_passant: None,
            status: GameStatus::turn_of(mover.opposite()),
        }
    }

    #[test]
    fn starting_position_has_twenty_actions_per_side() {
        let mut game = GameState::new_game();
        game.start();
        let white = legal_actions_for_color(&game, Color::White).expect("board should build");
        assert_eq!(white.action_count(), 20);
        assert!(!white.king_in_check);
        let black = legal_actions_for_color(&game, Color::Black).expect("board should build");
        assert_eq!(black.action_count(), 20);

        let knight = id(Color::White, PieceKind::Knight, 1);
        assert!(white
            .actions_for(knight)
            .contains(&Action::new(sq("C3"), ActionKind::Move)));
    }

    #[test]
    fn pinned_piece_has_no_actions() {
        let bishop = id(Color::White, PieceKind::Bishop, 1);
        let game = state_of(
            Color::Black,
            CastleRights::none(),
            &[
                (PieceId::king(Color::White), sq("E1")),
                (bishop, sq("E2")),
                (id(Color::Black, PieceKind::Rook, 1), sq("E8")),
                (PieceId::king(Color::Black), sq("A8")),
            ],
        );
        let info = legal_actions_for_color(&game, Color::White).expect("board should build");
        assert!(info.actions_for(bishop).is_empty());
        assert!(info.has_actions());
    }

    #[test]
    fn castling_depends_on_rook_path_and_attacks() {
        let king = PieceId::king(Color::White);
        let rook = PieceId::rook(Color::White, CastleSide::Kingside);
        let kingside = Action::new(sq("G1"), ActionKind::Castle);
        let base = [
            (king, sq("E1")),
            (rook, sq("H1")),
            (PieceId::king(Color::Black), sq("A8")),
        ];

        let game = state_of(Color::Black, CastleRights::all(), &base);
        let info = legal_actions_for_color(&game, Color::White).expect("board should build");
        assert!(info.actions_for(king).contains(&kingside));

        for (blocker, square) in [
            (id(Color::White, PieceKind::Bishop, 2), "F1"),
            (id(Color::White, PieceKind::Knight, 2), "G1"),
        ] {
            let mut placements = base.to_vec();
            placements.push((blocker, sq(square)));
            let game = state_of(Color::Black, CastleRights::all(), &placements);
            let info = legal_actions_for_color(&game, Color::White).expect("board should build");
            assert!(!info.actions_for(king).contains(&kingside), "{square} blocks");
        }

        let mut placements = base.to_vec();
        placements.push((id(Color::Black, PieceKind::Rook, 2), sq("G8")));
        let game = state_of(Color::Black, CastleRights::all(), &placements);
        let info = legal_actions_for_color(&game, Color::White).expect("board should build");
        assert!(!info.actions_for(king).contains(&kingside));
    }

    #[test]
    fn cornered_king_under_two_rooks_is_checkmated() {
        let game = state_of(
            Color::Black,
            CastleRights::none(),
            &[
                (PieceId::king(Color::White), sq("A1")),
                (id(Color::Black, PieceKind::Rook, 1), sq("H1")),
                (id(Color::Black, PieceKind::Rook, 2), sq("H2")),
                (PieceId::king(Color::Black), sq("H8")),
            ],
        );
        let info = legal_actions_for_color(&game, Color::White).expect("board should build");
        assert!(info.king_in_check);
        assert_eq!(info.outcome(), Some(GameStatus::Checkmate));
    }

    #[test]
    fn boxed_in_king_without_check_is_stalemated() {
        let game = state_of(
            Color::Black,
            CastleRights::none(),
            &[
                (PieceId::king(Color::White), sq("A1")),
                (PieceId::from_parts(Color::Black, PieceKind::Queen, 1).expect("queen"), sq("B3")),
                (PieceId::king(Color::Black), sq("H8")),
            ],
        );
        let info = legal_actions_for_color(&game, Color::White).expect("board should build");
        assert!(!info.king_in_check);
        assert_eq!(info.outcome(), Some(GameStatus::Stalemate));
    }

    #[test]
    fn no_generated_action_leaves_the_mover_in_check() {
        let mut game = GameState::new_game();
        game.start();
        let mut snapshot = game.snapshot.clone();
        for (from, to) in [("E2", "E4"), ("F7", "F6"), ("D1", "H5")] {
            snapshot = apply_action(&snapshot, sq(from), Action::new(sq(to), ActionKind::Move), None)
                .expect("opening move should apply");
        }

        let board = snapshot.board().expect("board should build");
        let info = get_turn_info(&board, Color::Black, &MoveContext::default());
        assert!(info.king_in_check);
        for (piece, actions) in &info.actions {
            let from = board.square_of(*piece).expect("listed piece is on the board");
            for action in actions {
                let after = apply_to_board(&board, from, *action);
                assert!(is_king_safe(&after, Color::Black), "{piece} {action}");
            }
        }
        // Only the G7 pawn can block; F7 is covered through G6.
        let pawn = id(Color::Black, PieceKind::Pawn, 7);
        assert_eq!(info.action_count(), 1);
        assert_eq!(info.actions_for(pawn), &[Action::new(sq("G6"), ActionKind::Move)]);
    }
}
