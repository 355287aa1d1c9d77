//! Core value types shared by every layer of the engine.
//!
//! Squares stay plain `u8` indices (`0 == A1`, `7 == H1`, `63 == H8`) so the
//! move generators can do offset arithmetic directly; pieces are identified by
//! a stable [`PieceId`] that never changes for the lifetime of a game.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Board square index (`0..=63`), rank-major from A1.
pub type Square = u8;

/// Side owning a piece, or side that produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Wire character used by the turn and negotiation grammars.
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }

    #[inline]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            'W' => Some(Color::White),
            'B' => Some(Color::Black),
            _ => None,
        }
    }

    /// Rank direction pawns of this color advance in.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Kinds a pawn may promote to, in wire order.
    pub const PROMOTION_KINDS: [PieceKind; 4] = [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Registry prefix character; only promotion targets have one.
    #[inline]
    pub const fn promotion_char(self) -> Option<char> {
        match self {
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    #[inline]
    pub const fn from_promotion_char(ch: u8) -> Option<Self> {
        match ch {
            b'N' => Some(PieceKind::Knight),
            b'B' => Some(PieceKind::Bishop),
            b'R' => Some(PieceKind::Rook),
            b'Q' => Some(PieceKind::Queen),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        self.promotion_char().is_some()
    }

    pub const fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

/// Stable identity of one of the 32 pieces of a game.
///
/// Ids `0..16` are white and `16..32` black. Within a color the slots follow
/// the canonical wire order: pawns A..H, rook #1 (A-file), rook #2 (H-file),
/// knight #1, knight #2, bishop #1, bishop #2, queen, king. The base kind of
/// an id never changes; promotions are tracked separately in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u8);

impl PieceId {
    pub const COUNT: usize = 32;
    const PER_COLOR: u8 = 16;

    #[inline]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Look up an id by color, base kind and 1-based ordinal within that kind.
    pub fn from_parts(color: Color, kind: PieceKind, ordinal: u8) -> Option<Self> {
        let slot = match (kind, ordinal) {
            (PieceKind::Pawn, 1..=8) => ordinal - 1,
            (PieceKind::Rook, 1 | 2) => 7 + ordinal,
            (PieceKind::Knight, 1 | 2) => 9 + ordinal,
            (PieceKind::Bishop, 1 | 2) => 11 + ordinal,
            (PieceKind::Queen, 1) => 14,
            (PieceKind::King, 1) => 15,
            _ => return None,
        };
        Some(Self(color.index() as u8 * Self::PER_COLOR + slot))
    }

    #[inline]
    pub const fn king(color: Color) -> Self {
        Self(color.index() as u8 * Self::PER_COLOR + 15)
    }

    /// Rook #1 guards the queenside, rook #2 the kingside.
    #[inline]
    pub const fn rook(color: Color, side: CastleSide) -> Self {
        let slot = match side {
            CastleSide::Queenside => 8,
            CastleSide::Kingside => 9,
        };
        Self(color.index() as u8 * Self::PER_COLOR + slot)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0 < Self::PER_COLOR {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Kind assigned at game start, ignoring any promotion.
    #[inline]
    pub const fn base_kind(self) -> PieceKind {
        match self.0 % Self::PER_COLOR {
            0..=7 => PieceKind::Pawn,
            8 | 9 => PieceKind::Rook,
            10 | 11 => PieceKind::Knight,
            12 | 13 => PieceKind::Bishop,
            14 => PieceKind::Queen,
            _ => PieceKind::King,
        }
    }

    #[inline]
    pub const fn ordinal(self) -> u8 {
        match self.0 % Self::PER_COLOR {
            slot @ 0..=7 => slot + 1,
            8 | 10 | 12 => 1,
            9 | 11 | 13 => 2,
            _ => 1,
        }
    }

    /// Square the piece starts the game on.
    pub const fn home_square(self) -> Square {
        let slot = self.0 % Self::PER_COLOR;
        let (pawn_rank, back_rank) = match self.color() {
            Color::White => (1, 0),
            Color::Black => (6, 7),
        };
        let (file, rank) = match slot {
            0..=7 => (slot, pawn_rank),
            8 => (0, back_rank),
            9 => (7, back_rank),
            10 => (1, back_rank),
            11 => (6, back_rank),
            12 => (2, back_rank),
            13 => (5, back_rank),
            14 => (3, back_rank),
            _ => (4, back_rank),
        };
        rank * 8 + file
    }

    /// All 32 ids in canonical wire order.
    pub fn all() -> impl Iterator<Item = PieceId> {
        (0..Self::COUNT as u8).map(PieceId)
    }

    pub fn of_color(color: Color) -> impl Iterator<Item = PieceId> {
        let start = color.index() as u8 * Self::PER_COLOR;
        (start..start + Self::PER_COLOR).map(PieceId)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.color().name(),
            self.base_kind().name(),
            self.ordinal()
        )
    }
}

/// Which rook a castle right refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    Queenside,
    Kingside,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::Queenside, CastleSide::Kingside];
}

/// Per-color castle rights. Rights only ever go from `true` to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastleRights {
    pub queenside: [bool; 2],
    pub kingside: [bool; 2],
}

impl Default for CastleRights {
    fn default() -> Self {
        Self::all()
    }
}

impl CastleRights {
    pub const fn all() -> Self {
        Self {
            queenside: [true; 2],
            kingside: [true; 2],
        }
    }

    pub const fn none() -> Self {
        Self {
            queenside: [false; 2],
            kingside: [false; 2],
        }
    }

    #[inline]
    pub const fn get(&self, color: Color, side: CastleSide) -> bool {
        match side {
            CastleSide::Queenside => self.queenside[color.index()],
            CastleSide::Kingside => self.kingside[color.index()],
        }
    }

    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        match side {
            CastleSide::Queenside => self.queenside[color.index()] = false,
            CastleSide::Kingside => self.kingside[color.index()] = false,
        }
    }

    pub fn revoke_all(&mut self, color: Color) {
        self.queenside[color.index()] = false;
        self.kingside[color.index()] = false;
    }

    /// Flags in wire order: white queenside, white kingside, black queenside,
    /// black kingside.
    pub const fn flags(&self) -> [bool; 4] {
        [
            self.queenside[0],
            self.kingside[0],
            self.queenside[1],
            self.kingside[1],
        ]
    }

    pub const fn from_flags(flags: [bool; 4]) -> Self {
        Self {
            queenside: [flags[0], flags[2]],
            kingside: [flags[1], flags[3]],
        }
    }

    /// True when some right that is revoked here is granted again in `next`.
    pub fn restored_in(&self, next: &CastleRights) -> bool {
        self.flags()
            .iter()
            .zip(next.flags().iter())
            .any(|(before, after)| !before && *after)
    }
}

/// Where a game stands after the last accepted turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    WhiteTurn,
    BlackTurn,
    Waiting,
    Cheat,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    #[inline]
    pub const fn turn_of(color: Color) -> Self {
        match color {
            Color::White => GameStatus::WhiteTurn,
            Color::Black => GameStatus::BlackTurn,
        }
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::Cheat | GameStatus::Checkmate | GameStatus::Stalemate
        )
    }

    /// Color whose move is expected, if any.
    pub const fn side_to_move(self) -> Option<Color> {
        match self {
            GameStatus::WhiteTurn => Some(Color::White),
            GameStatus::BlackTurn => Some(Color::Black),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            GameStatus::WhiteTurn => "WhiteTurn",
            GameStatus::BlackTurn => "BlackTurn",
            GameStatus::Waiting => "Waiting",
            GameStatus::Cheat => "Cheat",
            GameStatus::Checkmate => "Checkmate",
            GameStatus::Stalemate => "Stalemate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            GameStatus::WhiteTurn,
            GameStatus::BlackTurn,
            GameStatus::Waiting,
            GameStatus::Cheat,
            GameStatus::Checkmate,
            GameStatus::Stalemate,
        ]
        .into_iter()
        .find(|status| status.name() == name)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
pub const fn square_file(square: Square) -> i8 {
    (square % 8) as i8
}

#[inline]
pub const fn square_rank(square: Square) -> i8 {
    (square / 8) as i8
}

/// Square at `(file, rank)`, or `None` when off the board.
#[inline]
pub const fn square_at(file: i8, rank: i8) -> Option<Square> {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        None
    } else {
        Some((rank * 8 + file) as Square)
    }
}

#[inline]
pub const fn offset_square(square: Square, file_delta: i8, rank_delta: i8) -> Option<Square> {
    square_at(square_file(square) + file_delta, square_rank(square) + rank_delta)
}
