//! Square-indexed view of a snapshot.
//!
//! The board is never transmitted or trusted on its own: it is derived from
//! `Positions` plus the promotion registry, and building it is where the
//! "one piece per square" invariant is enforced.

use crate::errors::DecodeError;
use crate::game_state::chess_types::{Color, PieceId, PieceKind, Square};
use crate::game_state::game_state::{Positions, PromotionRegistry};
use crate::utils::algebraic::square_name;

/// Occupant of every square, with the occupant's effective kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<(PieceId, PieceKind)>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub const fn empty() -> Self {
        Self { squares: [None; 64] }
    }

    /// Invert `positions`, resolving promoted pawns through `promotions`.
    pub fn from_parts(
        positions: &Positions,
        promotions: &PromotionRegistry,
    ) -> Result<Self, DecodeError> {
        let mut board = Self::empty();
        for (id, square) in positions.iter() {
            let Some(square) = square else {
                continue;
            };
            if let Some((other, _)) = board.squares[square as usize] {
                return Err(DecodeError::SquareCollision {
                    square: square_name(square),
                    first: other,
                    second: id,
                });
            }
            let kind = promotions.get(&id).copied().unwrap_or(id.base_kind());
            board.squares[square as usize] = Some((id, kind));
        }
        Ok(board)
    }

    #[inline]
    pub fn occupant(&self, square: Square) -> Option<(PieceId, PieceKind)> {
        self.squares.get(square as usize).copied().flatten()
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<PieceId> {
        self.occupant(square).map(|(id, _)| id)
    }

    #[inline]
    pub fn kind_at(&self, square: Square) -> Option<PieceKind> {
        self.occupant(square).map(|(_, kind)| kind)
    }

    #[inline]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.occupant(square).map(|(id, _)| id.color())
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.occupant(square).is_none()
    }

    pub fn square_of(&self, piece: PieceId) -> Option<Square> {
        self.squares
            .iter()
            .position(|slot| matches!(slot, Some((id, _)) if *id == piece))
            .map(|idx| idx as Square)
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.square_of(PieceId::king(color))
    }

    /// Every piece of `color` with its square and effective kind.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, PieceId, PieceKind)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(move |(idx, slot)| match slot {
                Some((id, kind)) if id.color() == color => Some((idx as Square, *id, *kind)),
                _ => None,
            })
    }

    pub fn remove(&mut self, square: Square) -> Option<(PieceId, PieceKind)> {
        self.squares.get_mut(square as usize).and_then(Option::take)
    }

    pub fn place(&mut self, square: Square, piece: PieceId, kind: PieceKind) {
        if let Some(slot) = self.squares.get_mut(square as usize) {
            *slot = Some((piece, kind));
        }
    }
}
