//! Errors used throughout the rules engine.
//!
//! Every failure here is recoverable: a peer's message that fails to decode or
//! validate is rejected, never allowed to crash the session. The enums are
//! split by layer:
//!
//! - `DecodeError`: a turn message that is not well formed (length, charset,
//!   castle flags, impossible board). Names the offending field.
//! - `TurnError`: a well-formed turn that cannot follow the prior one
//!   (continuity), does not match a legal action, or leaves the mover's own
//!   king unsafe. Wraps `DecodeError` so the state machine has one error type.
//! - `MessageError`: a negotiation message that does not match the session
//!   grammar.

use thiserror::Error;

use crate::game_state::chess_types::{Color, GameStatus, PieceId, PieceKind};
use crate::moves::move_descriptions::Action;

/// Malformed turn message, rejected at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("turn message must have 3 fields, found {found}")]
    FieldCount { found: usize },

    #[error("board field length {0} is outside 64..=80")]
    BoardLength(usize),

    #[error("board field contains non-ASCII data")]
    NonAsciiBoard,

    #[error("board entry for {piece} is not a square or the captured sentinel: {text:?}")]
    InvalidSquare { piece: PieceId, text: String },

    #[error("board entry for {piece} has a promotion prefix but the piece is not a pawn")]
    PromotionOnNonPawn { piece: PieceId },

    #[error("board field ended before the entry for {0}")]
    TruncatedBoard(PieceId),

    #[error("board field has {0} trailing characters after the last piece")]
    TrailingBoardData(usize),

    #[error("mover field {0:?} is not W or B")]
    Mover(String),

    #[error("castle field {0:?} is not exactly four T/F flags")]
    CastleFlags(String),

    #[error("{0} is marked captured")]
    KingCaptured(PieceId),

    #[error("{first} and {second} both occupy {square}")]
    SquareCollision {
        square: String,
        first: PieceId,
        second: PieceId,
    },
}

/// Broad class of a turn violation, used when reporting blame upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    MalformedProtocol,
    ContinuityViolation,
    IllegalAction,
    SelfCheck,
}

/// A received (or locally proposed) turn that cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("{0} moved twice in a row")]
    SameMoverTwice(Color),

    #[error("a revoked castle right was granted again")]
    CastleRightRestored,

    #[error("castle rights do not match the action played")]
    CastleRightsMismatch,

    #[error("promotion registry changed by {0} entries in one turn")]
    PromotionRegistryJump(usize),

    #[error("{0} changed its promoted kind")]
    PromotionKindChanged(PieceId),

    #[error("{0} lost its promotion while still on the board")]
    PromotionEntryDropped(PieceId),

    #[error("no piece changed square")]
    NoPieceMoved,

    #[error("{0} pieces changed square in one turn")]
    TooManyPiecesMoved(usize),

    #[error("position change does not match any action kind")]
    UnrecognizedChange,

    #[error("{piece} does not belong to {mover}")]
    NotMoversPiece { piece: PieceId, mover: Color },

    #[error("capture cross-check failed: {0}")]
    CaptureCrossCheck(&'static str),

    #[error("en passant cross-check failed: {0}")]
    EnPassantCrossCheck(&'static str),

    #[error("castle cross-check failed: {0}")]
    CastleCrossCheck(&'static str),

    #[error("promotion cross-check failed: {0}")]
    PromotionCrossCheck(&'static str),

    #[error("{piece} cannot play {action}")]
    IllegalAction { piece: PieceId, action: Action },

    #[error("resulting positions do not match the action played")]
    PositionMismatch,

    #[error("{0} king left unsafe")]
    SelfCheck(Color),

    #[error("no piece stands on {0}")]
    NoPieceOnSquare(String),

    #[error("promotion requires a knight, bishop, rook or queen")]
    MissingPromotionKind,

    #[error("{0:?} is not a promotion kind")]
    InvalidPromotionKind(PieceKind),

    #[error("it is not {0}'s turn")]
    NotYourTurn(Color),

    #[error("game already finished with {0}")]
    GameFinished(GameStatus),
}

impl TurnError {
    pub fn kind(&self) -> ViolationKind {
        match self {
            TurnError::Decode(_) => ViolationKind::MalformedProtocol,
            TurnError::SameMoverTwice(_)
            | TurnError::CastleRightRestored
            | TurnError::PromotionRegistryJump(_)
            | TurnError::NoPieceMoved
            | TurnError::TooManyPiecesMoved(_)
            | TurnError::GameFinished(_) => ViolationKind::ContinuityViolation,
            TurnError::SelfCheck(_) => ViolationKind::SelfCheck,
            _ => ViolationKind::IllegalAction,
        }
    }
}

/// Negotiation message that does not follow `<hash>:<payload>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("message has no session delimiter")]
    MissingDelimiter,

    #[error("session hash {0:?} is not 5 alphanumeric characters")]
    InvalidHash(String),

    #[error("unrecognized payload {0:?}")]
    UnknownPayload(String),

    #[error("color argument {0:?} is not W or B")]
    InvalidColor(String),

    #[error("game-over argument {0:?} is not a game status")]
    InvalidStatus(String),
}
