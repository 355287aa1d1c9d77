//! Square safety tests.
//!
//! A square is unsafe for a piece of `color` when an enemy slider sees it down
//! an open ray, an enemy knight is a knight's jump away, an enemy pawn hits it
//! diagonally from its own side, or the enemy king stands next to it.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceId, PieceKind, Square};
use crate::moves::attacks::{
    first_occupied, offset_targets, pawn_attack_origins, ray_directions, KING_OFFSETS,
    KNIGHT_OFFSETS,
};
use crate::moves::piece_rules::{can_attack_along, Ray};

pub fn is_safe(board: &Board, square: Square, color: Color) -> bool {
    attackers_of(board, square, color).next().is_none()
}

/// False when the king is attacked, or missing from the board altogether.
pub fn is_king_safe(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(square) => is_safe(board, square, color),
        None => false,
    }
}

/// Enemy pieces (for a piece of `color` standing on `square`) attacking it.
pub fn attackers_of(
    board: &Board,
    square: Square,
    color: Color,
) -> impl Iterator<Item = (Square, PieceId)> + '_ {
    let enemy = color.opposite();
    let is_enemy = move |sq: Square, kind: PieceKind| {
        matches!(board.occupant(sq), Some((id, k)) if id.color() == enemy && k == kind)
    };

    let sliders = [Ray::Orthogonal, Ray::Diagonal].into_iter().flat_map(move |ray| {
        ray_directions(ray).iter().filter_map(move |dir| {
            let (sq, id, kind) = first_occupied(board, square, *dir)?;
            (id.color() == enemy && can_attack_along(kind, ray)).then_some((sq, id))
        })
    });
    let knights = offset_targets(square, &KNIGHT_OFFSETS)
        .filter(move |sq| is_enemy(*sq, PieceKind::Knight));
    let pawns = pawn_attack_origins(square, enemy).filter(move |sq| is_enemy(*sq, PieceKind::Pawn));
    let kings = offset_targets(square, &KING_OFFSETS).filter(move |sq| is_enemy(*sq, PieceKind::King));

    let leapers = knights
        .chain(pawns)
        .chain(kings)
        .filter_map(move |sq| board.piece_at(sq).map(|id| (sq, id)));
    sliders.chain(leapers)
}
