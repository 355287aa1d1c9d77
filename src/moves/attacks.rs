//! Offset tables and ray walking shared by generation and safety checks.

use std::iter::successors;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{offset_square, Color, PieceId, PieceKind, Square};
use crate::moves::piece_rules::Ray;

/// `(file, rank)` steps.
pub type Offset = (i8, i8);

pub const KNIGHT_OFFSETS: [Offset; 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING_OFFSETS: [Offset; 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub const ORTHOGONAL_DIRECTIONS: [Offset; 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

pub const DIAGONAL_DIRECTIONS: [Offset; 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

#[inline]
pub const fn ray_directions(ray: Ray) -> &'static [Offset; 4] {
    match ray {
        Ray::Orthogonal => &ORTHOGONAL_DIRECTIONS,
        Ray::Diagonal => &DIAGONAL_DIRECTIONS,
    }
}

/// Rays a sliding kind moves along; empty for non-sliders.
pub fn sliding_rays(kind: PieceKind) -> &'static [Ray] {
    match kind {
        PieceKind::Bishop => &[Ray::Diagonal],
        PieceKind::Rook => &[Ray::Orthogonal],
        PieceKind::Queen => &[Ray::Orthogonal, Ray::Diagonal],
        _ => &[],
    }
}

/// On-board squares one offset away from `from`.
pub fn offset_targets(from: Square, offsets: &'static [Offset]) -> impl Iterator<Item = Square> {
    offsets
        .iter()
        .filter_map(move |(df, dr)| offset_square(from, *df, *dr))
}

/// Squares from `from` (exclusive) to the board edge along `direction`.
pub fn ray_squares(from: Square, direction: Offset) -> impl Iterator<Item = Square> {
    let (df, dr) = direction;
    successors(offset_square(from, df, dr), move |sq| offset_square(*sq, df, dr))
}

/// First occupied square along `direction`, with its occupant.
pub fn first_occupied(
    board: &Board,
    from: Square,
    direction: Offset,
) -> Option<(Square, PieceId, PieceKind)> {
    ray_squares(from, direction).find_map(|sq| board.occupant(sq).map(|(id, kind)| (sq, id, kind)))
}

/// Squares an `attacker` pawn would have to stand on to hit `target`.
pub fn pawn_attack_origins(target: Square, attacker: Color) -> impl Iterator<Item = Square> {
    let back = -attacker.forward();
    [-1i8, 1]
        .into_iter()
        .filter_map(move |df| offset_square(target, df, back))
}
