//! Turn message parser.
//!
//! Accepts exactly `<board>,<W|B>,<4 flags>` and builds a snapshot whose
//! structural invariants already hold: every piece accounted for once, both
//! kings on the board, no two pieces sharing a square. Anything else is a
//! `DecodeError` naming the first offending field.

use crate::errors::DecodeError;
use crate::game_state::board::Board;
use crate::game_state::chess_rules::{
    CAPTURED_SENTINEL, MAX_BOARD_FIELD_LEN, MIN_BOARD_FIELD_LEN, TURN_FIELD_DELIMITER,
};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::{Positions, PromotionRegistry, TurnSnapshot};
use crate::utils::algebraic::square_from_bytes;

pub fn decode_turn(text: &str) -> Result<TurnSnapshot, DecodeError> {
    let fields: Vec<&str> = text.split(TURN_FIELD_DELIMITER).collect();
    let [board_part, mover_part, castle_part] = fields[..] else {
        return Err(DecodeError::FieldCount {
            found: fields.len(),
        });
    };

    let (positions, promotions) = parse_board(board_part)?;
    let mover = parse_mover(mover_part)?;
    let castle_rights = parse_castle_flags(castle_part)?;

    for color in [Color::White, Color::Black] {
        let king = PieceId::king(color);
        if positions.is_captured(king) {
            return Err(DecodeError::KingCaptured(king));
        }
    }
    Board::from_parts(&positions, &promotions)?;

    Ok(TurnSnapshot {
        positions,
        promotions,
        mover,
        castle_rights,
    })
}

fn parse_board(board_part: &str) -> Result<(Positions, PromotionRegistry), DecodeError> {
    if !board_part.is_ascii() {
        return Err(DecodeError::NonAsciiBoard);
    }
    let bytes = board_part.as_bytes();
    if !(MIN_BOARD_FIELD_LEN..=MAX_BOARD_FIELD_LEN).contains(&bytes.len()) {
        return Err(DecodeError::BoardLength(bytes.len()));
    }

    let mut positions = Positions::all_captured();
    let mut promotions = PromotionRegistry::new();
    let mut cursor = 0usize;

    for id in PieceId::all() {
        let rest = &bytes[cursor..];
        let [first, second, ..] = *rest else {
            return Err(DecodeError::TruncatedBoard(id));
        };

        if rest.starts_with(CAPTURED_SENTINEL.as_bytes()) {
            cursor += 2;
            continue;
        }
        if let Some(square) = square_from_bytes(first, second) {
            positions.set(id, Some(square));
            cursor += 2;
            continue;
        }

        let Some(kind) = PieceKind::from_promotion_char(first) else {
            return Err(invalid_square(id, &rest[..2]));
        };
        if id.base_kind() != PieceKind::Pawn {
            return Err(DecodeError::PromotionOnNonPawn { piece: id });
        }
        let Some(&third) = rest.get(2) else {
            return Err(DecodeError::TruncatedBoard(id));
        };
        let square =
            square_from_bytes(second, third).ok_or_else(|| invalid_square(id, &rest[..3]))?;
        positions.set(id, Some(square));
        promotions.insert(id, kind);
        cursor += 3;
    }

    if cursor != bytes.len() {
        return Err(DecodeError::TrailingBoardData(bytes.len() - cursor));
    }
    Ok((positions, promotions))
}

fn invalid_square(piece: PieceId, text: &[u8]) -> DecodeError {
    DecodeError::InvalidSquare {
        piece,
        text: String::from_utf8_lossy(text).into_owned(),
    }
}

fn parse_mover(mover_part: &str) -> Result<Color, DecodeError> {
    let mut chars = mover_part.chars();
    match (chars.next().and_then(Color::from_char), chars.next()) {
        (Some(color), None) => Ok(color),
        _ => Err(DecodeError::Mover(mover_part.to_owned())),
    }
}

fn parse_castle_flags(castle_part: &str) -> Result<CastleRights, DecodeError> {
    let bytes = castle_part.as_bytes();
    if bytes.len() != 4 {
        return Err(DecodeError::CastleFlags(castle_part.to_owned()));
    }

    let mut flags = [false; 4];
    for (flag, byte) in flags.iter_mut().zip(bytes) {
        *flag = match byte {
            b'T' => true,
            b'F' => false,
            _ => return Err(DecodeError::CastleFlags(castle_part.to_owned())),
        };
    }
    Ok(CastleRights::from_flags(flags))
}
