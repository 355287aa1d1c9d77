use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Square};
use crate::moves::attacks::{offset_targets, KNIGHT_OFFSETS};
use crate::moves::move_descriptions::{Action, ActionKind};

pub fn generate_knight_actions(board: &Board, from: Square, color: Color, out: &mut Vec<Action>) {
    for to in offset_targets(from, &KNIGHT_OFFSETS) {
        match board.color_at(to) {
            None => out.push(Action::new(to, ActionKind::Move)),
            Some(owner) if owner != color => out.push(Action::new(to, ActionKind::Capture)),
            Some(_) => {}
        }
    }
}
