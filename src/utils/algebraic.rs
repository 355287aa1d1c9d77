//! Square conversions for the wire's column/row notation.
//!
//! Converts between the protocol's uppercase coordinates (e.g. `E4`) and
//! internal square indices. The grammar is case-sensitive, so `e4` is rejected.

use crate::game_state::chess_types::Square;

/// Convert column/row notation (for example: "E4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, String> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("Invalid square: {square}"));
    }

    square_from_bytes(bytes[0], bytes[1])
        .ok_or_else(|| format!("Invalid square: {square}"))
}

/// Parse a column byte and a row byte; `None` when either is out of range.
#[inline]
pub fn square_from_bytes(column: u8, row: u8) -> Option<Square> {
    if !(b'A'..=b'H').contains(&column) || !(b'1'..=b'8').contains(&row) {
        return None;
    }
    Some((row - b'1') * 8 + (column - b'A'))
}

/// Convert a square index (`0..=63`) to column/row notation (for example: "E4").
#[inline]
pub fn square_to_algebraic(square: Square) -> Result<String, String> {
    if square > 63 {
        return Err(format!("Square index out of bounds: {square}"));
    }

    let column = char::from(b'A' + square % 8);
    let row = char::from(b'1' + square / 8);
    Ok(format!("{column}{row}"))
}

/// Infallible name for diagnostics; out-of-range indices print as `??`.
pub fn square_name(square: Square) -> String {
    square_to_algebraic(square).unwrap_or_else(|_| "??".to_owned())
}
