//! Move-path enumeration used to cross-check the generator against known
//! node counts. Promotions expand into one node per promotion kind.

use std::thread;

use crate::errors::TurnError;
use crate::game_state::chess_types::{GameStatus, PieceId, PieceKind, Square};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{apply_action, double_step_target};
use crate::move_generation::legal_move_generator::legal_actions_for;
use crate::moves::move_descriptions::{Action, ActionKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
    }
}

/// One playable action with its promotion choice resolved.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    piece: PieceId,
    from: Square,
    action: Action,
    promotion: Option<PieceKind>,
    takes: bool,
}

pub fn perft(state: &GameState, depth: u8) -> Result<PerftCounts, TurnError> {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return Ok(total);
    }
    perft_recurse(state, depth, &mut total)?;
    Ok(total)
}

/// Same counts as `perft`, one scoped worker per root action.
pub fn perft_multi_threaded(state: &GameState, depth: u8) -> Result<PerftCounts, TurnError> {
    if depth <= 1 {
        return perft(state, depth);
    }

    let roots = candidates(state)?;
    let results = thread::scope(|scope| {
        let handles: Vec<_> = roots
            .iter()
            .map(|candidate| {
                scope.spawn(move || {
                    let mut local = PerftCounts::default();
                    perft_recurse(&play(state, candidate)?, depth - 1, &mut local)?;
                    Ok::<_, TurnError>(local)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect::<Vec<_>>()
    });

    let mut total = PerftCounts::default();
    for result in results {
        total.merge(result?);
    }
    Ok(total)
}

fn perft_recurse(state: &GameState, depth: u8, counts: &mut PerftCounts) -> Result<(), TurnError> {
    for candidate in candidates(state)? {
        if depth == 1 {
            count_leaf(counts, &candidate);
        } else {
            perft_recurse(&play(state, &candidate)?, depth - 1, counts)?;
        }
    }
    Ok(())
}

fn candidates(state: &GameState) -> Result<Vec<Candidate>, TurnError> {
    let board = state.board()?;
    let context = state.move_context();
    let mut out = Vec::with_capacity(64);

    for (from, piece, _) in board.pieces_of(state.side_to_move()) {
        for action in legal_actions_for(&board, from, &context) {
            let takes = action.is_capture_like()
                || (action.kind == ActionKind::Transform && !board.is_empty(action.to));
            let base = Candidate {
                piece,
                from,
                action,
                promotion: None,
                takes,
            };
            if action.kind == ActionKind::Transform {
                out.extend(PieceKind::PROMOTION_KINDS.iter().map(|kind| Candidate {
                    promotion: Some(*kind),
                    ..base
                }));
            } else {
                out.push(base);
            }
        }
    }
    Ok(out)
}

fn count_leaf(counts: &mut PerftCounts, candidate: &Candidate) {
    counts.nodes += 1;
    if candidate.takes {
        counts.captures += 1;
    }
    match candidate.action.kind {
        ActionKind::EnPassant => counts.en_passant += 1,
        ActionKind::Castle => counts.castles += 1,
        ActionKind::Transform => counts.promotions += 1,
        ActionKind::Move | ActionKind::Capture => {}
    }
}

fn play(state: &GameState, candidate: &Candidate) -> Result<GameState, TurnError> {
    let snapshot = apply_action(
        &state.snapshot,
        candidate.from,
        candidate.action,
        candidate.promotion,
    )?;
    let en_passant = double_step_target(&state.snapshot, candidate.piece, candidate.from, candidate.action);
    let status = GameStatus::turn_of(snapshot.mover.opposite());
    Ok(GameState {
        snapshot,
        en_passant,
        status,
    })
}
