//! Canonical protocol and rule constants.
//!
//! Wire delimiters, the captured sentinel, rank tables and the two canonical
//! opening turns every game is seeded from.

use crate::game_state::chess_types::{CastleSide, Color, PieceId, PieceKind, Square};

/// Two-character board entry for a captured piece.
pub const CAPTURED_SENTINEL: &str = "XX";

/// Separator between the board, mover and castle fields of a turn.
pub const TURN_FIELD_DELIMITER: char = ',';

/// Separator between a session hash and its payload.
pub const SESSION_DELIMITER: char = ':';

/// Separator between a payload tag and its argument (`I,W`).
pub const PAYLOAD_ARGUMENT_DELIMITER: char = ',';

pub const SESSION_HASH_LEN: usize = 5;

/// Board field length with no promoted pawns on the board.
pub const MIN_BOARD_FIELD_LEN: usize = PieceId::COUNT * 2;

/// Board field length with all sixteen pawns promoted.
pub const MAX_BOARD_FIELD_LEN: usize = MIN_BOARD_FIELD_LEN + 16;

/// Snapshot seeded before either side has moved (mover recorded as White).
pub const PRE_GAME_TURN: &str = "A2B2C2D2E2F2G2H2A1H1B1G1C1F1D1E1A7B7C7D7E7F7G7H7A8H8B8G8C8F8D8E8,W,TTTT";

/// Move-zero snapshot; White's first move is validated against this one.
pub const OPENING_TURN: &str = "A2B2C2D2E2F2G2H2A1H1B1G1C1F1D1E1A7B7C7D7E7F7G7H7A8H8B8G8C8F8D8E8,B,TTTT";

#[inline]
pub const fn pawn_home_rank(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}

#[inline]
pub const fn promotion_rank(color: Color) -> i8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

/// Rank a pawn must stand on to capture en passant.
#[inline]
pub const fn en_passant_rank(color: Color) -> i8 {
    match color {
        Color::White => 4,
        Color::Black => 3,
    }
}

/// Squares and pieces involved in one castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleLayout {
    pub side: CastleSide,
    pub king_from: Square,
    pub king_to: Square,
    pub rook: PieceId,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Every square strictly between king and rook.
    pub between: &'static [Square],
    /// Squares the king crosses or lands on.
    pub king_path: &'static [Square],
}

const WHITE_QUEENSIDE: CastleLayout = CastleLayout {
    side: CastleSide::Queenside,
    king_from: 4,
    king_to: 2,
    rook: PieceId::rook(Color::White, CastleSide::Queenside),
    rook_from: 0,
    rook_to: 3,
    between: &[1, 2, 3],
    king_path: &[3, 2],
};

const WHITE_KINGSIDE: CastleLayout = CastleLayout {
    side: CastleSide::Kingside,
    king_from: 4,
    king_to: 6,
    rook: PieceId::rook(Color::White, CastleSide::Kingside),
    rook_from: 7,
    rook_to: 5,
    between: &[5, 6],
    king_path: &[5, 6],
};

const BLACK_QUEENSIDE: CastleLayout = CastleLayout {
    side: CastleSide::Queenside,
    king_from: 60,
    king_to: 58,
    rook: PieceId::rook(Color::Black, CastleSide::Queenside),
    rook_from: 56,
    rook_to: 59,
    between: &[57, 58, 59],
    king_path: &[59, 58],
};

const BLACK_KINGSIDE: CastleLayout = CastleLayout {
    side: CastleSide::Kingside,
    king_from: 60,
    king_to: 62,
    rook: PieceId::rook(Color::Black, CastleSide::Kingside),
    rook_from: 63,
    rook_to: 61,
    between: &[61, 62],
    king_path: &[61, 62],
};

pub fn castle_layout(color: Color, side: CastleSide) -> &'static CastleLayout {
    match (color, side) {
        (Color::White, CastleSide::Queenside) => &WHITE_QUEENSIDE,
        (Color::White, CastleSide::Kingside) => &WHITE_KINGSIDE,
        (Color::Black, CastleSide::Queenside) => &BLACK_QUEENSIDE,
        (Color::Black, CastleSide::Kingside) => &BLACK_KINGSIDE,
    }
}

/// Layout of the castle whose king lands on `king_to`, if any.
pub fn castle_layout_for(color: Color, king_to: Square) -> Option<&'static CastleLayout> {
    CastleSide::BOTH
        .into_iter()
        .map(|side| castle_layout(color, side))
        .find(|layout| layout.king_to == king_to)
}

/// Castle right a rook id guards, if it is one of the two original rooks.
pub fn castle_side_of_rook(rook: PieceId) -> Option<CastleSide> {
    if rook.base_kind() != PieceKind::Rook {
        return None;
    }
    match rook.ordinal() {
        1 => Some(CastleSide::Queenside),
        _ => Some(CastleSide::Kingside),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castle_layouts_name_the_original_rooks() {
        for color in [Color::White, Color::Black] {
            for side in CastleSide::BOTH {
                let layout = castle_layout(color, side);
                assert_eq!(layout.rook.color(), color);
                assert_eq!(layout.rook.base_kind(), PieceKind::Rook);
                assert_eq!(layout.rook.home_square(), layout.rook_from);
                assert_eq!(PieceId::king(color).home_square(), layout.king_from);
                assert_eq!(castle_side_of_rook(layout.rook), Some(side));
                assert_eq!(castle_layout_for(color, layout.king_to), Some(layout));
            }
        }
    }

    #[test]
    fn opening_turns_differ_only_in_mover() {
        let (pre_board, pre_rest) = PRE_GAME_TURN.split_at(MIN_BOARD_FIELD_LEN);
        let (open_board, open_rest) = OPENING_TURN.split_at(MIN_BOARD_FIELD_LEN);
        assert_eq!(pre_board, open_board);
        assert_eq!(pre_rest, ",W,TTTT");
        assert_eq!(open_rest, ",B,TTTT");
    }
}
