//! Replaying actions, on a scratch board or on a full snapshot.

use crate::errors::TurnError;
use crate::game_state::board::Board;
use crate::game_state::chess_rules::{castle_layout_for, castle_side_of_rook};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::TurnSnapshot;
use crate::moves::move_descriptions::{Action, ActionKind};
use crate::utils::algebraic::square_name;

/// Board after `action`, for safety checks only. Promoted kinds are not
/// resolved here since they never change whether the mover's king is safe.
pub fn apply_to_board(board: &Board, from: Square, action: Action) -> Board {
    let mut next = board.clone();
    let Some((piece, kind)) = next.remove(from) else {
        return next;
    };

    match action.kind {
        ActionKind::EnPassant => {
            if let Some(victim) = en_passant_victim_square(from, action.to) {
                next.remove(victim);
            }
        }
        ActionKind::Castle => {
            if let Some(layout) = castle_layout_for(piece.color(), action.to) {
                if let Some((rook, rook_kind)) = next.remove(layout.rook_from) {
                    next.place(layout.rook_to, rook, rook_kind);
                }
            }
        }
        _ => {}
    }

    next.remove(action.to);
    next.place(action.to, piece, kind);
    next
}

/// Snapshot after the piece on `from` plays `action`.
///
/// Moves the castling rook, removes captured pieces (and their registry
/// entries), records the promotion kind and revokes castle rights touched by
/// the move. `promotion` is required for `Transform` and ignored otherwise.
pub fn apply_action(
    snapshot: &TurnSnapshot,
    from: Square,
    action: Action,
    promotion: Option<PieceKind>,
) -> Result<TurnSnapshot, TurnError> {
    let board = snapshot.board()?;
    let piece = board
        .piece_at(from)
        .ok_or_else(|| TurnError::NoPieceOnSquare(square_name(from)))?;
    let mover = piece.color();

    let mut next = snapshot.clone();
    next.mover = mover;

    let captured = match action.kind {
        ActionKind::Move => None,
        ActionKind::Capture | ActionKind::Transform => board.piece_at(action.to),
        ActionKind::EnPassant => {
            en_passant_victim_square(from, action.to).and_then(|sq| board.piece_at(sq))
        }
        ActionKind::Castle => {
            let layout = castle_layout_for(mover, action.to)
                .ok_or(TurnError::CastleCrossCheck("no castle lands on that square"))?;
            next.positions.set(layout.rook, Some(layout.rook_to));
            None
        }
    };

    if let Some(victim) = captured {
        next.positions.set(victim, None);
        next.promotions.remove(&victim);
        revoke_rights_of(&mut next.castle_rights, victim);
    }

    next.positions.set(piece, Some(action.to));

    if action.kind == ActionKind::Transform {
        let kind = promotion.ok_or(TurnError::MissingPromotionKind)?;
        if !kind.is_promotion_target() {
            return Err(TurnError::InvalidPromotionKind(kind));
        }
        next.promotions.insert(piece, kind);
    }

    revoke_rights_of(&mut next.castle_rights, piece);
    Ok(next)
}

/// Landing square when `action` is an unpromoted pawn's double step.
pub fn double_step_target(
    snapshot: &TurnSnapshot,
    piece: PieceId,
    from: Square,
    action: Action,
) -> Option<Square> {
    let is_pawn = snapshot.effective_kind(piece) == PieceKind::Pawn;
    let double = (square_rank(action.to) - square_rank(from)).abs() == 2
        && square_file(action.to) == square_file(from);
    (is_pawn && double && action.kind == ActionKind::Move).then_some(action.to)
}

/// The pawn taken en passant stands beside the capturer, on the capturer's rank.
#[inline]
pub fn en_passant_victim_square(from: Square, to: Square) -> Option<Square> {
    square_at(square_file(to), square_rank(from))
}

/// Moving or losing the king or an original rook forfeits the matching rights.
fn revoke_rights_of(rights: &mut CastleRights, piece: PieceId) {
    match piece.base_kind() {
        PieceKind::King => rights.revoke_all(piece.color()),
        PieceKind::Rook => {
            if let Some(side) = castle_side_of_rook(piece) {
                rights.revoke(piece.color(), side);
            }
        }
        _ => {}
    }
}
