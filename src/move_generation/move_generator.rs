use std::collections::BTreeMap;

use crate::game_state::chess_types::{CastleRights, GameStatus, PieceId, Square};
use crate::moves::move_descriptions::Action;

/// Per-turn rule context that is not visible on the board itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveContext {
    pub castle_rights: CastleRights,
    /// Square of the pawn that double-stepped on the previous turn.
    pub en_passant: Option<Square>,
}

/// Every legal action of one side, keyed by piece.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnInfo {
    pub actions: BTreeMap<PieceId, Vec<Action>>,
    /// Whether the side's king was already attacked before moving.
    pub king_in_check: bool,
}

impl TurnInfo {
    pub fn has_actions(&self) -> bool {
        self.actions.values().any(|actions| !actions.is_empty())
    }

    pub fn action_count(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    pub fn actions_for(&self, piece: PieceId) -> &[Action] {
        self.actions.get(&piece).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Checkmate or stalemate when the side has nothing to play.
    pub fn outcome(&self) -> Option<GameStatus> {
        if self.has_actions() {
            None
        } else if self.king_in_check {
            Some(GameStatus::Checkmate)
        } else {
            Some(GameStatus::Stalemate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TurnInfo;
    use crate::game_state::chess_types::{Color, GameStatus, PieceId};
    use crate::moves::move_descriptions::{Action, ActionKind};

    #[test]
    fn outcome_depends_on_check_only_when_no_actions_remain() {
        let king = PieceId::king(Color::White);
        let mut info = TurnInfo::default();
        info.actions.insert(king, Vec::new());
        assert_eq!(info.outcome(), Some(GameStatus::Stalemate));

        info.king_in_check = true;
        assert_eq!(info.outcome(), Some(GameStatus::Checkmate));

        info.actions.insert(king, vec![Action::new(12, ActionKind::Move)]);
        assert_eq!(info.outcome(), None);
        assert_eq!(info.action_count(), 1);
        assert_eq!(info.actions_for(king).len(), 1);
    }
}
