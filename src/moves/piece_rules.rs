//! Stateless piece predicates: ownership, alliance, kind and ray capability.

use crate::game_state::chess_types::{Color, PieceId, PieceKind};
use crate::game_state::game_state::PromotionRegistry;

/// Line a sliding attack travels along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ray {
    Orthogonal,
    Diagonal,
}

#[inline]
pub fn owns_piece(color: Color, piece: PieceId) -> bool {
    piece.color() == color
}

#[inline]
pub fn are_allied(a: PieceId, b: PieceId) -> bool {
    a.color() == b.color()
}

#[inline]
pub fn are_enemies(a: PieceId, b: PieceId) -> bool {
    !are_allied(a, b)
}

/// Kind test that sees through promotions: a promoted pawn is no longer a pawn.
pub fn is_kind(piece: PieceId, kind: PieceKind, promotions: &PromotionRegistry) -> bool {
    match promotions.get(&piece) {
        Some(promoted) if piece.base_kind() == PieceKind::Pawn => *promoted == kind,
        _ => piece.base_kind() == kind,
    }
}

/// Diagonals belong to bishops and queens, files and ranks to rooks and queens.
#[inline]
pub const fn can_attack_along(kind: PieceKind, ray: Ray) -> bool {
    matches!(
        (kind, ray),
        (PieceKind::Queen, _)
            | (PieceKind::Bishop, Ray::Diagonal)
            | (PieceKind::Rook, Ray::Orthogonal)
    )
}
