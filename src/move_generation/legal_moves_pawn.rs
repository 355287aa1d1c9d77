//! Pawn generation: pushes, double steps, captures, en passant and promotion.
//!
//! Any pawn action landing on the last rank is reported as `Transform`; the
//! promoted kind is chosen by the mover and travels in the registry.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::{en_passant_rank, pawn_home_rank, promotion_rank};
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::MoveContext;
use crate::moves::move_descriptions::{Action, ActionKind};

pub fn generate_pawn_actions(
    board: &Board,
    from: Square,
    color: Color,
    context: &MoveContext,
    out: &mut Vec<Action>,
) {
    let forward = color.forward();
    let last_rank = promotion_rank(color);
    let or_transform = |to: Square, kind: ActionKind| {
        if square_rank(to) == last_rank {
            ActionKind::Transform
        } else {
            kind
        }
    };

    if let Some(one) = offset_square(from, 0, forward) {
        if board.is_empty(one) {
            out.push(Action::new(one, or_transform(one, ActionKind::Move)));

            if square_rank(from) == pawn_home_rank(color) {
                if let Some(two) = offset_square(from, 0, 2 * forward) {
                    if board.is_empty(two) {
                        out.push(Action::new(two, ActionKind::Move));
                    }
                }
            }
        }
    }

    for file_delta in [-1i8, 1] {
        let Some(to) = offset_square(from, file_delta, forward) else {
            continue;
        };
        if board.color_at(to) == Some(color.opposite()) {
            out.push(Action::new(to, or_transform(to, ActionKind::Capture)));
        }
    }

    if let Some(target) = context.en_passant {
        if let Some(to) = en_passant_destination(board, from, color, target) {
            out.push(Action::new(to, ActionKind::EnPassant));
        }
    }
}

/// Square behind `target` when the pawn on `from` may take it en passant.
fn en_passant_destination(board: &Board, from: Square, color: Color, target: Square) -> Option<Square> {
    let rank = square_rank(from);
    if rank != en_passant_rank(color)
        || square_rank(target) != rank
        || (square_file(target) - square_file(from)).abs() != 1
    {
        return None;
    }

    let (victim, kind) = board.occupant(target)?;
    if victim.color() == color || kind != PieceKind::Pawn {
        return None;
    }

    let to = offset_square(target, 0, color.forward())?;
    board.is_empty(to).then_some(to)
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_actions;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::*;
    use crate::game_state::game_state::TurnSnapshot;
    use crate::move_generation::move_generator::MoveContext;
    use crate::moves::move_descriptions::{Action, ActionKind};
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("test square should parse")
    }

    fn id(color: Color, kind: PieceKind, ordinal: u8) -> PieceId {
        PieceId::from_parts(color, kind, ordinal).expect("test piece should exist")
    }

    fn board_of(placements: &[(PieceId, Square)]) -> Board {
        TurnSnapshot::from_placements(Color::Black, CastleRights::none(), placements)
            .board()
            .expect("test board should build")
    }

    fn actions(board: &Board, from: Square, color: Color, en_passant: Option<Square>) -> Vec<Action> {
        let context = MoveContext {
            castle_rights: CastleRights::none(),
            en_passant,
        };
        let mut out = Vec::new();
        generate_pawn_actions(board, from, color, &context, &mut out);
        out
    }

    #[test]
    fn home_rank_pawn_may_double_step() {
        let board = Board::from_parts(
            &crate::game_state::game_state::Positions::starting(),
            &Default::default(),
        )
        .expect("starting board");
        let out = actions(&board, sq("E2"), Color::White, None);
        assert_eq!(
            out,
            vec![
                Action::new(sq("E3"), ActionKind::Move),
                Action::new(sq("E4"), ActionKind::Move)
            ]
        );
        let out = actions(&board, sq("D7"), Color::Black, None);
        assert_eq!(out.len(), 2);
        assert!(out.contains(&Action::new(sq("D5"), ActionKind::Move)));
    }

    #[test]
    fn blocked_pawn_cannot_jump() {
        let board = board_of(&[
            (PieceId::king(Color::White), sq("A1")),
            (PieceId::king(Color::Black), sq("H8")),
            (id(Color::White, PieceKind::Pawn, 5), sq("E2")),
            (id(Color::Black, PieceKind::Knight, 1), sq("E3")),
        ]);
        assert!(actions(&board, sq("E2"), Color::White, None).is_empty());
    }

    #[test]
    fn last_rank_actions_become_transforms() {
        let board = board_of(&[
            (PieceId::king(Color::White), sq("A1")),
            (PieceId::king(Color::Black), sq("H1")),
            (id(Color::White, PieceKind::Pawn, 2), sq("B7")),
            (id(Color::Black, PieceKind::Rook, 1), sq("A8")),
        ]);
        let out = actions(&board, sq("B7"), Color::White, None);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|a| a.kind == ActionKind::Transform));
        assert!(out.iter().any(|a| a.to == sq("A8")));
    }

    #[test]
    fn en_passant_only_against_the_target_pawn() {
        let board = board_of(&[
            (PieceId::king(Color::White), sq("A1")),
            (PieceId::king(Color::Black), sq("H8")),
            (id(Color::White, PieceKind::Pawn, 5), sq("E5")),
            (id(Color::Black, PieceKind::Pawn, 4), sq("D5")),
            (id(Color::Black, PieceKind::Pawn, 6), sq("F5")),
        ]);

        let out = actions(&board, sq("E5"), Color::White, Some(sq("D5")));
        assert!(out.contains(&Action::new(sq("D6"), ActionKind::EnPassant)));
        assert!(!out.iter().any(|a| a.to == sq("F6") && a.kind == ActionKind::EnPassant));

        let out = actions(&board, sq("E5"), Color::White, None);
        assert!(!out.iter().any(|a| a.kind == ActionKind::EnPassant));
    }
}
