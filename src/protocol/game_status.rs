//! Turn-by-turn status transitions.
//!
//! `advance_status` is the single entry point for a new turn message, whether
//! it came from the peer or from the local player's own proposal. The caller
//! keeps only the last accepted `GameState`; everything else is recomputed
//! from the two snapshots on every call.
//!
//! Authority rule: a terminal status reached while judging the remote peer's
//! move is final and must be announced to the peer (`broadcast_game_over`).
//! The same status reached while judging a local move is only reported, since
//! the peer's next message is what settles the game on their side.

use tracing::{debug, warn};

use crate::errors::TurnError;
use crate::game_state::chess_types::{Color, GameStatus, PieceKind, Square};
use crate::game_state::game_state::{GameState, TurnSnapshot};
use crate::move_generation::legal_move_apply::apply_action;
use crate::move_generation::legal_move_checks::is_king_safe;
use crate::move_generation::legal_move_generator::get_turn_info;
use crate::move_generation::move_generator::MoveContext;
use crate::moves::move_descriptions::Action;
use crate::protocol::action_classifier::{classify_action, classify_and_validate_action};
use crate::utils::algebraic::square_name;
use crate::utils::turn_diff::diff_turns;

/// A rejected turn and the color held responsible for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnViolation {
    pub blame: Color,
    pub error: TurnError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: GameStatus,
    /// New state to keep when the turn was accepted.
    pub accepted: Option<GameState>,
    pub violation: Option<TurnViolation>,
    /// The peer must be told the game is over.
    pub broadcast_game_over: bool,
}

/// A locally built turn ready to send, with the state it leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedTurn {
    pub message: String,
    pub update: StatusUpdate,
}

/// Judge the turn message `next` against the last accepted state.
pub fn advance_status(prior: &GameState, next: &str, local_color: Color) -> StatusUpdate {
    if prior.status.is_terminal() {
        return StatusUpdate {
            status: prior.status,
            accepted: None,
            violation: Some(TurnViolation {
                blame: prior.side_to_move(),
                error: TurnError::GameFinished(prior.status),
            }),
            broadcast_game_over: false,
        };
    }

    match evaluate_turn(prior, next, local_color) {
        Ok(accepted) => {
            let remote = accepted.snapshot.mover != local_color;
            let status = accepted.status;
            debug!(%status, remote, "turn accepted");
            StatusUpdate {
                status,
                accepted: Some(accepted),
                violation: None,
                broadcast_game_over: remote && status.is_terminal(),
            }
        }
        Err(violation) => {
            let remote = violation.blame != local_color;
            if remote {
                warn!(
                    blame = %violation.blame,
                    kind = ?violation.error.kind(),
                    error = %violation.error,
                    "remote turn rejected"
                );
            } else {
                debug!(error = %violation.error, "local turn rejected");
            }
            StatusUpdate {
                status: GameStatus::Cheat,
                accepted: None,
                violation: Some(violation),
                broadcast_game_over: remote,
            }
        }
    }
}

fn evaluate_turn(prior: &GameState, next: &str, local_color: Color) -> Result<GameState, TurnViolation> {
    // Only the side to move may send the next turn, whatever the message claims.
    let sender = prior.side_to_move();
    let blame = |error: TurnError| TurnViolation { blame: sender, error };

    let snapshot = TurnSnapshot::decode(next).map_err(|err| blame(err.into()))?;
    let mover = snapshot.mover;

    if mover == prior.snapshot.mover {
        return Err(blame(TurnError::SameMoverTwice(mover)));
    }
    if prior.snapshot.castle_rights.restored_in(&snapshot.castle_rights) {
        return Err(blame(TurnError::CastleRightRestored));
    }

    let diff = diff_turns(&prior.snapshot, &snapshot).map_err(blame)?;
    let classified = classify_and_validate_action(prior, &snapshot, &diff).map_err(blame)?;

    let board = snapshot.board().map_err(|err| blame(err.into()))?;
    if mover != local_color && !is_king_safe(&board, mover) {
        return Err(blame(TurnError::SelfCheck(mover)));
    }

    let context = MoveContext {
        castle_rights: snapshot.castle_rights,
        en_passant: classified.en_passant_target,
    };
    let status = get_turn_info(&board, mover.opposite(), &context)
        .outcome()
        .unwrap_or(GameStatus::turn_of(mover.opposite()));

    Ok(GameState {
        snapshot,
        en_passant: classified.en_passant_target,
        status,
    })
}

/// Build, encode and self-validate the local player's action.
///
/// Nothing is returned for sending unless the turn passes the same checks the
/// peer will run on it.
pub fn propose_action(
    state: &GameState,
    from: Square,
    action: Action,
    promotion: Option<PieceKind>,
    local_color: Color,
) -> Result<ProposedTurn, TurnError> {
    if state.status.is_terminal() {
        return Err(TurnError::GameFinished(state.status));
    }
    if state.side_to_move() != local_color {
        return Err(TurnError::NotYourTurn(local_color));
    }

    let board = state.board()?;
    let piece = board
        .piece_at(from)
        .ok_or_else(|| TurnError::NoPieceOnSquare(square_name(from)))?;
    if piece.color() != local_color {
        return Err(TurnError::NotMoversPiece {
            piece,
            mover: local_color,
        });
    }

    let message = apply_action(&state.snapshot, from, action, promotion)?.encode();
    let update = advance_status(state, &message, local_color);
    if let Some(violation) = update.violation {
        return Err(violation.error);
    }
    Ok(ProposedTurn { message, update })
}

/// Rebuild the accepted state from the last two turns of a recovered game.
///
/// Both turns are trusted to have been validated when they were played; only
/// their alternation is re-checked. The en-passant target is recovered from
/// the structure of the last diff.
pub fn resume_game(last_text: &str, curr_text: &str) -> Result<GameState, TurnError> {
    let last = TurnSnapshot::decode(last_text)?;
    let curr = TurnSnapshot::decode(curr_text)?;
    if curr.mover == last.mover {
        return Err(TurnError::SameMoverTwice(curr.mover));
    }

    let diff = diff_turns(&last, &curr)?;
    let en_passant = if diff.changes.is_empty() {
        None
    } else {
        classify_action(&last, &diff, curr.mover)?.en_passant_target
    };

    let board = curr.board()?;
    let context = MoveContext {
        castle_rights: curr.castle_rights,
        en_passant,
    };
    let status = get_turn_info(&board, curr.mover.opposite(), &context)
        .outcome()
        .unwrap_or(GameStatus::turn_of(curr.mover.opposite()));

    Ok(GameState {
        snapshot: curr,
        en_passant,
        status,
    })
}
