//! Action descriptions produced by the generators and the classifier.
//!
//! An action names only where the piece ends up and how it got there; the
//! origin square is carried alongside by whoever holds the action.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::Square;
use crate::utils::algebraic::square_to_algebraic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Move,
    Capture,
    Castle,
    EnPassant,
    /// Pawn reaching its last rank, with or without a capture.
    Transform,
}

impl ActionKind {
    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::Move => "move",
            ActionKind::Capture => "capture",
            ActionKind::Castle => "castle",
            ActionKind::EnPassant => "en passant",
            ActionKind::Transform => "transform",
        }
    }
}

/// Destination plus kind. For castles the destination is the king's square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub to: Square,
    pub kind: ActionKind,
}

impl Action {
    #[inline]
    pub const fn new(to: Square, kind: ActionKind) -> Self {
        Self { to, kind }
    }

    #[inline]
    pub const fn is_capture_like(&self) -> bool {
        matches!(self.kind, ActionKind::Capture | ActionKind::EnPassant)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match square_to_algebraic(self.to) {
            Ok(name) => write!(f, "{} to {}", self.kind.name(), name),
            Err(_) => write!(f, "{} to square {}", self.kind.name(), self.to),
        }
    }
}
