//! Bishop, rook and queen generation (and promoted pawns moving as them).
//!
//! Each ray is walked until it leaves the board or meets a piece: a friendly
//! blocker ends the ray, an enemy blocker yields one capture and ends it.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::moves::attacks::{ray_directions, ray_squares, sliding_rays};
use crate::moves::move_descriptions::{Action, ActionKind};

pub fn generate_sliding_actions(
    board: &Board,
    from: Square,
    color: Color,
    kind: PieceKind,
    out: &mut Vec<Action>,
) {
    for ray in sliding_rays(kind) {
        for direction in ray_directions(*ray) {
            for to in ray_squares(from, *direction) {
                match board.color_at(to) {
                    None => out.push(Action::new(to, ActionKind::Move)),
                    Some(owner) => {
                        if owner != color {
                            out.push(Action::new(to, ActionKind::Capture));
                        }
                        break;
                    }
                }
            }
        }
    }
}
