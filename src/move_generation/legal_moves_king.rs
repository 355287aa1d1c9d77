use crate::game_state::board::Board;
use crate::game_state::chess_rules::castle_layout;
use crate::game_state::chess_types::{CastleSide, Color, PieceKind, Square};
use crate::move_generation::legal_move_checks::is_safe;
use crate::move_generation::move_generator::MoveContext;
use crate::moves::attacks::{offset_targets, KING_OFFSETS};
use crate::moves::move_descriptions::{Action, ActionKind};

/// Single steps plus castles. Step destinations are left to the caller's
/// self-check filter, which replays the step and tests the king's new square.
pub fn generate_king_actions(
    board: &Board,
    from: Square,
    color: Color,
    context: &MoveContext,
    out: &mut Vec<Action>,
) {
    for to in offset_targets(from, &KING_OFFSETS) {
        match board.color_at(to) {
            None => out.push(Action::new(to, ActionKind::Move)),
            Some(owner) if owner != color => out.push(Action::new(to, ActionKind::Capture)),
            Some(_) => {}
        }
    }

    generate_castle_actions(board, from, color, context, out);
}

fn generate_castle_actions(
    board: &Board,
    king_from: Square,
    color: Color,
    context: &MoveContext,
    out: &mut Vec<Action>,
) {
    // No castling out of check.
    if !is_safe(board, king_from, color) {
        return;
    }

    // Path squares are tested with the king lifted so it cannot shadow a ray.
    let mut without_king = board.clone();
    without_king.remove(king_from);

    for side in CastleSide::BOTH {
        if !context.castle_rights.get(color, side) {
            continue;
        }
        let layout = castle_layout(color, side);
        if king_from != layout.king_from {
            continue;
        }
        let rook_in_place = board.occupant(layout.rook_from) == Some((layout.rook, PieceKind::Rook));
        if !rook_in_place {
            continue;
        }
        if !layout.between.iter().all(|sq| board.is_empty(*sq)) {
            continue;
        }
        if !layout.king_path.iter().all(|sq| is_safe(&without_king, *sq, color)) {
            continue;
        }
        out.push(Action::new(layout.king_to, ActionKind::Castle));
    }
}
