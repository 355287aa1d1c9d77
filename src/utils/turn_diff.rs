//! Per-piece difference between two consecutive turn snapshots.

use std::fmt;

use crate::errors::TurnError;
use crate::game_state::chess_types::{PieceId, PieceKind, Square};
use crate::game_state::game_state::TurnSnapshot;
use crate::utils::algebraic::square_name;

/// One piece whose square changed. `to == None` means it was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceChange {
    pub piece: PieceId,
    pub from: Option<Square>,
    pub to: Option<Square>,
}

impl fmt::Display for PieceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |square: Option<Square>| square.map(square_name).unwrap_or_else(|| "XX".to_owned());
        write!(f, "{}: {} -> {}", self.piece, name(self.from), name(self.to))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnDiff {
    /// Changed pieces in canonical id order.
    pub changes: Vec<PieceChange>,
    /// Pawn that gained a registry entry this turn, with its new kind.
    pub promoted: Option<(PieceId, PieceKind)>,
}

impl TurnDiff {
    pub fn change_of(&self, piece: PieceId) -> Option<&PieceChange> {
        self.changes.iter().find(|change| change.piece == piece)
    }
}

/// Compare two snapshots piece by piece.
///
/// Registry continuity is checked here: at most one entry may appear per
/// turn, an existing entry may not change kind, and an entry may only vanish
/// together with its piece.
pub fn diff_turns(last: &TurnSnapshot, curr: &TurnSnapshot) -> Result<TurnDiff, TurnError> {
    let changes: Vec<PieceChange> = PieceId::all()
        .filter_map(|piece| {
            let from = last.positions.get(piece);
            let to = curr.positions.get(piece);
            (from != to).then_some(PieceChange { piece, from, to })
        })
        .collect();

    let size_delta = last.promotions.len().abs_diff(curr.promotions.len());
    let added: Vec<(PieceId, PieceKind)> = curr
        .promotions
        .iter()
        .filter(|(piece, _)| !last.promotions.contains_key(piece))
        .map(|(piece, kind)| (*piece, *kind))
        .collect();
    if added.len() > 1 || size_delta > 1 {
        return Err(TurnError::PromotionRegistryJump(added.len().max(size_delta)));
    }

    for (piece, kind) in &last.promotions {
        match curr.promotions.get(piece) {
            Some(next_kind) if next_kind != kind => {
                return Err(TurnError::PromotionKindChanged(*piece));
            }
            None if !curr.positions.is_captured(*piece) => {
                return Err(TurnError::PromotionEntryDropped(*piece));
            }
            _ => {}
        }
    }

    Ok(TurnDiff {
        changes,
        promoted: added.first().copied(),
    })
}

/// Decode both turn texts, then diff them.
pub fn decode_and_diff(last_text: &str, curr_text: &str) -> Result<TurnDiff, TurnError> {
    let last = TurnSnapshot::decode(last_text)?;
    let curr = TurnSnapshot::decode(curr_text)?;
    diff_turns(&last, &curr)
}
