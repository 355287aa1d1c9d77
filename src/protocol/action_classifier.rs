//! Turning a snapshot diff back into the action that produced it.
//!
//! Classification only reads the shape of the diff. It is necessary but not
//! sufficient: `classify_and_validate_action` then asks the legal generator
//! whether that exact piece may play that exact action from the prior
//! position, and replays it to confirm the received snapshot is its result.

use tracing::debug;

use crate::errors::TurnError;
use crate::game_state::chess_rules::en_passant_rank;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::{GameState, TurnSnapshot};
use crate::move_generation::legal_move_apply::{apply_action, double_step_target};
use crate::move_generation::legal_move_generator::legal_actions_for;
use crate::moves::move_descriptions::{Action, ActionKind};
use crate::moves::piece_rules::{are_allied, are_enemies, is_kind, owns_piece};
use crate::utils::turn_diff::{PieceChange, TurnDiff};

/// The action implied by a diff, with the acting piece's pre-move square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedAction {
    pub piece: PieceId,
    pub from: Square,
    pub action: Action,
    /// Kind chosen for a `Transform`.
    pub promotion: Option<PieceKind>,
    /// Set when the action is a pawn's double step.
    pub en_passant_target: Option<Square>,
}

impl ClassifiedAction {
    fn new(piece: PieceId, from: Square, action: Action) -> Self {
        Self {
            piece,
            from,
            action,
            promotion: None,
            en_passant_target: None,
        }
    }
}

/// Classify `diff` as played by `mover` from the `prior` snapshot.
pub fn classify_action(
    prior: &TurnSnapshot,
    diff: &TurnDiff,
    mover: Color,
) -> Result<ClassifiedAction, TurnError> {
    match diff.changes.len() {
        0 => return Err(TurnError::NoPieceMoved),
        1 | 2 => {}
        n => return Err(TurnError::TooManyPiecesMoved(n)),
    }
    // Captured pieces never come back.
    if diff.changes.iter().any(|change| change.from.is_none()) {
        return Err(TurnError::UnrecognizedChange);
    }

    if let Some((pawn, kind)) = diff.promoted {
        return classify_transform(prior, diff, mover, pawn, kind);
    }

    match diff.changes[..] {
        [single] => classify_single(prior, single, mover),
        [a, b] => match (a.to, b.to) {
            (None, None) => Err(TurnError::UnrecognizedChange),
            (Some(_), None) => classify_capture(prior, a, b, mover),
            (None, Some(_)) => classify_capture(prior, b, a, mover),
            (Some(_), Some(_)) => classify_castle(a, b, mover),
        },
        _ => Err(TurnError::UnrecognizedChange),
    }
}

fn classify_single(
    prior: &TurnSnapshot,
    change: PieceChange,
    mover: Color,
) -> Result<ClassifiedAction, TurnError> {
    let (Some(from), Some(to)) = (change.from, change.to) else {
        // A piece vanished without anything taking it.
        return Err(TurnError::UnrecognizedChange);
    };
    require_owner(change.piece, mover)?;

    let action = Action::new(to, ActionKind::Move);
    let mut classified = ClassifiedAction::new(change.piece, from, action);
    classified.en_passant_target = double_step_target(prior, change.piece, from, action);
    Ok(classified)
}

fn classify_capture(
    prior: &TurnSnapshot,
    capturer: PieceChange,
    captured: PieceChange,
    mover: Color,
) -> Result<ClassifiedAction, TurnError> {
    let (Some(from), Some(to), Some(victim_square)) = (capturer.from, capturer.to, captured.from)
    else {
        return Err(TurnError::UnrecognizedChange);
    };
    require_owner(capturer.piece, mover)?;
    if !are_enemies(capturer.piece, captured.piece) {
        return Err(TurnError::CaptureCrossCheck("captured piece belongs to the mover"));
    }

    if to == victim_square {
        let action = Action::new(to, ActionKind::Capture);
        return Ok(ClassifiedAction::new(capturer.piece, from, action));
    }

    // The capturer did not land on its victim's square: only en passant does that.
    let both_pawns = is_kind(capturer.piece, PieceKind::Pawn, &prior.promotions)
        && is_kind(captured.piece, PieceKind::Pawn, &prior.promotions);
    if !both_pawns {
        return Err(TurnError::EnPassantCrossCheck("both pieces must be pawns"));
    }
    let rank = en_passant_rank(mover);
    if square_rank(from) != rank || square_rank(victim_square) != rank {
        return Err(TurnError::EnPassantCrossCheck("pawns are not on the en passant rank"));
    }
    let lands_behind = square_file(to) == square_file(victim_square)
        && (square_file(to) - square_file(from)).abs() == 1
        && square_rank(to) == rank + mover.forward();
    if !lands_behind {
        return Err(TurnError::EnPassantCrossCheck(
            "capturer must land one file over, behind the captured pawn",
        ));
    }

    let action = Action::new(to, ActionKind::EnPassant);
    Ok(ClassifiedAction::new(capturer.piece, from, action))
}

fn classify_castle(
    a: PieceChange,
    b: PieceChange,
    mover: Color,
) -> Result<ClassifiedAction, TurnError> {
    if !are_allied(a.piece, b.piece) {
        return Err(TurnError::UnrecognizedChange);
    }
    require_owner(a.piece, mover)?;

    let king_piece = PieceId::king(mover);
    let (king, rook) = if a.piece == king_piece {
        (a, b)
    } else if b.piece == king_piece {
        (b, a)
    } else {
        return Err(TurnError::CastleCrossCheck("castling moves the king and a rook"));
    };
    if rook.piece.base_kind() != PieceKind::Rook {
        return Err(TurnError::CastleCrossCheck("castling moves the king and a rook"));
    }

    let (Some(from), Some(to)) = (king.from, king.to) else {
        return Err(TurnError::CastleCrossCheck("castling piece is captured"));
    };
    let action = Action::new(to, ActionKind::Castle);
    Ok(ClassifiedAction::new(king.piece, from, action))
}

fn classify_transform(
    prior: &TurnSnapshot,
    diff: &TurnDiff,
    mover: Color,
    pawn: PieceId,
    kind: PieceKind,
) -> Result<ClassifiedAction, TurnError> {
    require_owner(pawn, mover)?;
    if !is_kind(pawn, PieceKind::Pawn, &prior.promotions) {
        return Err(TurnError::PromotionCrossCheck("only an unpromoted pawn may promote"));
    }

    let moved = diff
        .change_of(pawn)
        .copied()
        .ok_or(TurnError::PromotionCrossCheck("promoted pawn did not move"))?;
    let (Some(from), Some(to)) = (moved.from, moved.to) else {
        return Err(TurnError::PromotionCrossCheck("promoted pawn is captured"));
    };

    if let Some(other) = diff.changes.iter().find(|change| change.piece != pawn) {
        let takes_on_landing = other.to.is_none()
            && other.from == Some(to)
            && are_enemies(pawn, other.piece);
        if !takes_on_landing {
            return Err(TurnError::PromotionCrossCheck(
                "second change must be an enemy taken on the promotion square",
            ));
        }
    }

    let mut classified = ClassifiedAction::new(pawn, from, Action::new(to, ActionKind::Transform));
    classified.promotion = Some(kind);
    Ok(classified)
}

fn require_owner(piece: PieceId, mover: Color) -> Result<(), TurnError> {
    if owns_piece(mover, piece) {
        Ok(())
    } else {
        Err(TurnError::NotMoversPiece { piece, mover })
    }
}

/// Classify the diff, then confirm it against the prior accepted state.
///
/// The action must be among the piece's legal actions under the prior
/// castle rights, registry and en-passant target, and replaying it must
/// reproduce `next` exactly (positions, registry and castle rights).
pub fn classify_and_validate_action(
    prior: &GameState,
    next: &TurnSnapshot,
    diff: &TurnDiff,
) -> Result<ClassifiedAction, TurnError> {
    let classified = classify_action(&prior.snapshot, diff, next.mover)?;
    debug!(
        piece = %classified.piece,
        action = %classified.action,
        "classified turn"
    );

    let board = prior.board()?;
    if board.piece_at(classified.from) != Some(classified.piece) {
        return Err(TurnError::PositionMismatch);
    }
    let legal = legal_actions_for(&board, classified.from, &prior.move_context());
    if !legal.contains(&classified.action) {
        return Err(TurnError::IllegalAction {
            piece: classified.piece,
            action: classified.action,
        });
    }

    let expected = apply_action(
        &prior.snapshot,
        classified.from,
        classified.action,
        classified.promotion,
    )?;
    if expected.positions != next.positions || expected.promotions != next.promotions {
        return Err(TurnError::PositionMismatch);
    }
    if expected.castle_rights != next.castle_rights {
        return Err(TurnError::CastleRightsMismatch);
    }

    Ok(classified)
}
