use crate::game_state::chess_rules::{CAPTURED_SENTINEL, TURN_FIELD_DELIMITER};
use crate::game_state::chess_types::PieceId;
use crate::game_state::game_state::TurnSnapshot;
use crate::utils::algebraic::square_name;

/// Serialize a snapshot as `<board>,<mover>,<castle flags>`.
///
/// Pieces are written in canonical id order. Promoted pawns still on the board
/// carry their kind's prefix letter; captured pieces are written as `XX`.
pub fn encode_turn(snapshot: &TurnSnapshot) -> String {
    let mut out = String::with_capacity(96);
    out.push_str(&generate_board_field(snapshot));
    out.push(TURN_FIELD_DELIMITER);
    out.push(snapshot.mover.to_char());
    out.push(TURN_FIELD_DELIMITER);
    for flag in snapshot.castle_rights.flags() {
        out.push(if flag { 'T' } else { 'F' });
    }
    out
}

fn generate_board_field(snapshot: &TurnSnapshot) -> String {
    let mut out = String::with_capacity(80);
    for id in PieceId::all() {
        match snapshot.positions.get(id) {
            Some(square) => {
                if let Some(prefix) = snapshot
                    .promotions
                    .get(&id)
                    .and_then(|kind| kind.promotion_char())
                {
                    out.push(prefix);
                }
                out.push_str(&square_name(square));
            }
            None => out.push_str(CAPTURED_SENTINEL),
        }
    }
    out
}
