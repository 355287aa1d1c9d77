//! Snapshot and accepted-state model.
//!
//! `TurnSnapshot` is exactly what one turn message carries: where each of the
//! 32 pieces stands, which pawns have promoted, who moved, and the castle
//! rights. `GameState` is the only thing a caller keeps between turns: the
//! last snapshot that passed validation, plus the en-passant target and status
//! derived while validating it.

use std::collections::BTreeMap;

use crate::errors::DecodeError;
use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::MoveContext;
use crate::utils::turn_generator::encode_turn;
use crate::utils::turn_parser::decode_turn;

/// Effective kind of every pawn that has promoted and is still on the board.
pub type PromotionRegistry = BTreeMap<PieceId, PieceKind>;

/// Square of each piece, `None` once captured. Always holds all 32 entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Positions([Option<Square>; PieceId::COUNT]);

impl Default for Positions {
    fn default() -> Self {
        Self::starting()
    }
}

impl Positions {
    pub fn starting() -> Self {
        let mut squares = [None; PieceId::COUNT];
        for id in PieceId::all() {
            squares[id.index()] = Some(id.home_square());
        }
        Self(squares)
    }

    /// Every piece captured; a base for hand-built positions.
    pub const fn all_captured() -> Self {
        Self([None; PieceId::COUNT])
    }

    #[inline]
    pub fn get(&self, piece: PieceId) -> Option<Square> {
        self.0[piece.index()]
    }

    #[inline]
    pub fn set(&mut self, piece: PieceId, square: Option<Square>) {
        self.0[piece.index()] = square;
    }

    #[inline]
    pub fn is_captured(&self, piece: PieceId) -> bool {
        self.get(piece).is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceId, Option<Square>)> + '_ {
        PieceId::all().map(move |id| (id, self.get(id)))
    }
}

/// Full content of one turn message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSnapshot {
    pub positions: Positions,
    pub promotions: PromotionRegistry,
    pub mover: Color,
    pub castle_rights: CastleRights,
}

impl TurnSnapshot {
    /// Starting layout with all castle rights, recorded as moved by `mover`.
    pub fn starting(mover: Color) -> Self {
        Self {
            positions: Positions::starting(),
            promotions: PromotionRegistry::new(),
            mover,
            castle_rights: CastleRights::all(),
        }
    }

    /// Only the listed pieces on the board; every other piece captured.
    pub fn from_placements(
        mover: Color,
        castle_rights: CastleRights,
        placements: &[(PieceId, Square)],
    ) -> Self {
        let mut positions = Positions::all_captured();
        for (id, square) in placements {
            positions.set(*id, Some(*square));
        }
        Self {
            positions,
            promotions: PromotionRegistry::new(),
            mover,
            castle_rights,
        }
    }

    /// Kind the piece currently moves as, consulting the registry.
    #[inline]
    pub fn effective_kind(&self, piece: PieceId) -> PieceKind {
        self.promotions
            .get(&piece)
            .copied()
            .unwrap_or(piece.base_kind())
    }

    #[inline]
    pub fn board(&self) -> Result<Board, DecodeError> {
        Board::from_parts(&self.positions, &self.promotions)
    }

    #[inline]
    pub fn encode(&self) -> String {
        encode_turn(self)
    }

    #[inline]
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        decode_turn(text)
    }
}

/// Last accepted turn of one session, plus what validation derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub snapshot: TurnSnapshot,
    /// Square of a pawn that double-stepped on the last turn.
    pub en_passant: Option<Square>,
    pub status: GameStatus,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}

impl GameState {
    /// Move-zero snapshot, waiting for the invite to be accepted.
    pub fn new_game() -> Self {
        Self {
            snapshot: TurnSnapshot::starting(Color::Black),
            en_passant: None,
            status: GameStatus::Waiting,
        }
    }

    /// Leave `Waiting` once both players are in; no-op otherwise.
    pub fn start(&mut self) {
        if self.status == GameStatus::Waiting {
            self.status = GameStatus::turn_of(self.side_to_move());
        }
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.snapshot.mover.opposite()
    }

    #[inline]
    pub fn move_context(&self) -> MoveContext {
        MoveContext {
            castle_rights: self.snapshot.castle_rights,
            en_passant: self.en_passant,
        }
    }

    #[inline]
    pub fn board(&self) -> Result<Board, DecodeError> {
        self.snapshot.board()
    }
}
