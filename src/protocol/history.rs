//! Session-start scan of the message backlog.
//!
//! The backlog is walked newest-first with three independent searches: the
//! local player's outstanding invite, a remote invite the local player could
//! accept, and the most recent game in progress. Each search keeps the first
//! (newest) thing it resolves. A session hash that was declined, ended, or
//! whose turns contradict each other is blacklisted and ignored by all three
//! searches for the rest of the (older) scan.
//!
//! Nothing here fails: unreadable messages are skipped, and a recovered game
//! whose turns do not check out is replaced by the canonical opening.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::game_state::chess_rules::{OPENING_TURN, PRE_GAME_TURN};
use crate::game_state::chess_types::Color;
use crate::protocol::game_status::resume_game;
use crate::protocol::session_message::{SessionHash, SessionMessage, SessionPayload, TurnPayload};

/// One delivered message, as the transport recorded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogEntry {
    pub sender: String,
    pub sent_at: DateTime<Utc>,
    pub body: String,
}

/// The local player's invite, still waiting for an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRecord {
    pub hash: SessionHash,
    /// Color the local player will play.
    pub color: Color,
}

/// A remote invite the local player may accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptRecord {
    pub hash: SessionHash,
    /// Color the local player would play, the inviter's inverted.
    pub color: Color,
}

/// The two most recent turns of a game in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedGame {
    pub hash: SessionHash,
    /// Color of the local player.
    pub color: Color,
    pub last_move: String,
    pub curr_move: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub invite: Option<InviteRecord>,
    pub accept: Option<AcceptRecord>,
    pub game: Option<LoadedGame>,
}

/// A game seeded by its newest turn, waiting for the turn before it.
struct GameCandidate {
    hash: SessionHash,
    color: Color,
    curr: TurnPayload,
    curr_from_local: bool,
}

#[derive(Default)]
struct Scan {
    blacklist: BTreeSet<SessionHash>,
    /// Accepted sessions and the local player's color in each.
    accepted: BTreeMap<SessionHash, Color>,
    moved: BTreeSet<SessionHash>,
    candidate: Option<GameCandidate>,
    /// Newest accepted session without turns, seen while a candidate was open.
    unplayed: Option<LoadedGame>,
    history: History,
}

impl Scan {
    fn game_resolved(&self) -> bool {
        self.history.game.is_some()
    }

    fn close(&mut self, hash: &SessionHash) {
        debug!(%hash, "session closed");
        self.blacklist.insert(hash.clone());
        if self.candidate.as_ref().is_some_and(|c| &c.hash == hash) {
            self.abandon_candidate();
        }
    }

    /// Drop the open candidate; a newer unplayed game then takes its place.
    fn abandon_candidate(&mut self) {
        self.candidate = None;
        if !self.game_resolved() {
            self.history.game = self.unplayed.take();
        }
    }

    fn on_invite(&mut self, hash: SessionHash, color: Color, from_local: bool) {
        if self.moved.contains(&hash) {
            return;
        }

        if let Some(local_color) = self.accepted.get(&hash).copied() {
            if self.game_resolved() || self.unplayed.is_some() {
                return;
            }
            debug!(%hash, "accepted session without turns, loading opening");
            let game = LoadedGame {
                hash,
                color: local_color,
                last_move: PRE_GAME_TURN.to_owned(),
                curr_move: OPENING_TURN.to_owned(),
            };
            if self.candidate.is_none() {
                self.history.game = Some(game);
            } else {
                self.unplayed = Some(game);
            }
            return;
        }

        if from_local {
            if self.history.invite.is_none() {
                self.history.invite = Some(InviteRecord { hash, color });
            }
        } else if self.history.accept.is_none() {
            self.history.accept = Some(AcceptRecord {
                hash,
                color: color.opposite(),
            });
        }
    }

    fn on_turn(&mut self, hash: SessionHash, turn: TurnPayload, from_local: bool) {
        self.moved.insert(hash.clone());
        if self.game_resolved() {
            return;
        }

        let Some(candidate) = self.candidate.take() else {
            let color = if from_local {
                turn.mover
            } else {
                turn.mover.opposite()
            };
            self.candidate = Some(GameCandidate {
                hash,
                color,
                curr: turn,
                curr_from_local: from_local,
            });
            return;
        };

        // Only the other party's turn for the same session can precede it.
        if candidate.hash != hash || candidate.curr_from_local == from_local {
            self.candidate = Some(candidate);
            return;
        }

        if turn.mover == candidate.curr.mover.opposite() {
            self.history.game = Some(recover_game(candidate, turn.text));
        } else {
            warn!(%hash, "consecutive turns claim the same mover, dropping session");
            self.blacklist.insert(hash);
            self.abandon_candidate();
        }
    }

    /// A lone newest turn is only resumable when it is White's first move.
    fn finish(mut self) -> History {
        if let Some(candidate) = self.candidate.take() {
            if !self.game_resolved() && candidate.curr.mover == Color::White {
                self.history.game = Some(recover_game(candidate, OPENING_TURN.to_owned()));
            }
        }
        if !self.game_resolved() {
            self.history.game = self.unplayed.take();
        }
        self.history
    }
}

/// Keep the pair if it resumes cleanly, else the canonical opening.
fn recover_game(candidate: GameCandidate, last_move: String) -> LoadedGame {
    let GameCandidate {
        hash, color, curr, ..
    } = candidate;
    match resume_game(&last_move, &curr.text) {
        Ok(_) => LoadedGame {
            hash,
            color,
            last_move,
            curr_move: curr.text,
        },
        Err(err) => {
            warn!(%hash, error = %err, "recovered turns do not validate, falling back to opening");
            LoadedGame {
                hash,
                color,
                last_move: PRE_GAME_TURN.to_owned(),
                curr_move: OPENING_TURN.to_owned(),
            }
        }
    }
}

/// Recover outstanding invites and the game in progress from `backlog`.
///
/// Entries are ordered by `sent_at` (stable, so equal timestamps keep their
/// delivery order) and scanned from the newest.
pub fn reconstruct_history(backlog: &[BacklogEntry], local_address: &str) -> History {
    let mut ordered: Vec<&BacklogEntry> = backlog.iter().collect();
    ordered.sort_by_key(|entry| entry.sent_at);

    let mut scan = Scan::default();
    for entry in ordered.into_iter().rev() {
        let message = match SessionMessage::parse(&entry.body) {
            Ok(message) => message,
            Err(err) => {
                debug!(sender = %entry.sender, error = %err, "skipping unreadable message");
                continue;
            }
        };
        if scan.blacklist.contains(&message.hash) {
            continue;
        }

        let from_local = entry.sender == local_address;
        let hash = message.hash;
        match message.payload {
            SessionPayload::Decline | SessionPayload::End | SessionPayload::GameOver(_) => {
                scan.close(&hash)
            }
            SessionPayload::Accept(color) => {
                let local_color = if from_local { color } else { color.opposite() };
                scan.accepted.entry(hash).or_insert(local_color);
            }
            SessionPayload::Invite(color) => scan.on_invite(hash, color, from_local),
            SessionPayload::Turn(turn) => scan.on_turn(hash, turn, from_local),
        }
    }
    scan.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::game_state::GameState;
    use crate::game_state::chess_types::Square;
    use crate::moves::move_descriptions::{Action, ActionKind};
    use crate::protocol::game_status::propose_action;
    use crate::utils::algebraic::algebraic_to_square;

    const ME: &str = "me.addr";
    const PEER: &str = "peer.addr";

    fn entry(sender: &str, second: i64, body: &str) -> BacklogEntry {
        BacklogEntry {
            sender: sender.to_owned(),
            sent_at: DateTime::from_timestamp(1_700_000_000 + second, 0).expect("valid timestamp"),
            body: body.to_owned(),
        }
    }

    fn hash(text: &str) -> SessionHash {
        SessionHash::parse(text).expect("test hash should parse")
    }

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("test square should parse")
    }

    /// Turn texts for the given line, starting from the opening.
    fn turns(moves: &[(&str, &str)]) -> Vec<String> {
        let mut state = GameState::new_game();
        state.start();
        moves
            .iter()
            .map(|(from, to)| {
                let mover = state.side_to_move();
                let proposed = propose_action(
                    &state,
                    sq(from),
                    Action::new(sq(to), ActionKind::Move),
                    None,
                    mover,
                )
                .expect("line move should be legal");
                state = proposed.update.accepted.expect("accepted");
                proposed.message
            })
            .collect()
    }

    #[test]
    fn independent_invites_are_both_reported() {
        let backlog = vec![
            entry(ME, 1, "aaaaa:I,W"),
            entry(PEER, 2, "bbbbb:I,W"),
        ];
        let history = reconstruct_history(&backlog, ME);
        assert_eq!(
            history.invite,
            Some(InviteRecord {
                hash: hash("aaaaa"),
                color: Color::White,
            })
        );
        assert_eq!(
            history.accept,
            Some(AcceptRecord {
                hash: hash("bbbbb"),
                color: Color::Black,
            })
        );
        assert_eq!(history.game, None);
    }

    #[test]
    fn declined_invite_is_not_outstanding() {
        let backlog = vec![
            entry(ME, 1, "aaaaa:I,B"),
            entry(PEER, 2, "aaaaa:D"),
            entry(ME, 3, "ccccc:E"),
        ];
        let history = reconstruct_history(&backlog, ME);
        assert_eq!(history, History::default());
    }

    #[test]
    fn newest_pair_of_turns_is_loaded() {
        let line = turns(&[("E2", "E4"), ("E7", "E5"), ("G1", "F3")]);
        let backlog = vec![
            entry(PEER, 1, "ggggg:I,B"),
            entry(ME, 2, "ggggg:A,W"),
            entry(ME, 3, &format!("ggggg:{}", line[0])),
            entry(PEER, 4, &format!("ggggg:{}", line[1])),
            entry(ME, 5, &format!("ggggg:{}", line[2])),
        ];
        let history = reconstruct_history(&backlog, ME);
        let game = history.game.expect("game should be recovered");
        assert_eq!(game.hash, hash("ggggg"));
        assert_eq!(game.color, Color::White);
        assert_eq!(game.last_move, line[1]);
        assert_eq!(game.curr_move, line[2]);
        assert_eq!(history.invite, None);
        assert_eq!(history.accept, None);

        let resumed = resume_game(&game.last_move, &game.curr_move).expect("pair resumes");
        assert_eq!(resumed.side_to_move(), Color::Black);
    }

    #[test]
    fn backlog_order_is_taken_from_timestamps() {
        let line = turns(&[("D2", "D4"), ("D7", "D5")]);
        let backlog = vec![
            entry(ME, 4, &format!("hhhhh:{}", line[1])),
            entry(PEER, 3, &format!("hhhhh:{}", line[0])),
        ];
        let game = reconstruct_history(&backlog, ME)
            .game
            .expect("game should be recovered");
        assert_eq!(game.color, Color::Black);
        assert_eq!(game.last_move, line[0]);
        assert_eq!(game.curr_move, line[1]);
    }

    #[test]
    fn accepted_game_without_turns_loads_the_opening() {
        let backlog = vec![entry(ME, 1, "kkkkk:I,B"), entry(PEER, 2, "kkkkk:A,W")];
        let history = reconstruct_history(&backlog, ME);
        assert_eq!(
            history.game,
            Some(LoadedGame {
                hash: hash("kkkkk"),
                color: Color::Black,
                last_move: PRE_GAME_TURN.to_owned(),
                curr_move: OPENING_TURN.to_owned(),
            })
        );
        assert_eq!(history.invite, None);
    }

    #[test]
    fn unpairable_turn_does_not_hide_an_older_accepted_game() {
        let line = turns(&[("E2", "E4"), ("E7", "E5")]);
        let backlog = vec![
            entry(ME, 1, "kkkkk:I,B"),
            entry(PEER, 2, "kkkkk:A,W"),
            entry(PEER, 3, &format!("zzzzz:{}", line[1])),
        ];
        let history = reconstruct_history(&backlog, ME);
        assert_eq!(
            history.game,
            Some(LoadedGame {
                hash: hash("kkkkk"),
                color: Color::Black,
                last_move: PRE_GAME_TURN.to_owned(),
                curr_move: OPENING_TURN.to_owned(),
            })
        );
        assert_eq!(history.invite, None);
        assert_eq!(history.accept, None);
    }

    #[test]
    fn paired_newer_game_wins_over_an_unplayed_one() {
        let line = turns(&[("E2", "E4"), ("E7", "E5")]);
        let backlog = vec![
            entry(ME, 1, "kkkkk:I,B"),
            entry(PEER, 2, "kkkkk:A,W"),
            entry(ME, 3, &format!("zzzzz:{}", line[0])),
            entry(PEER, 4, &format!("zzzzz:{}", line[1])),
        ];
        let game = reconstruct_history(&backlog, ME)
            .game
            .expect("game should be recovered");
        assert_eq!(game.hash, hash("zzzzz"));
        assert_eq!(game.last_move, line[0]);
        assert_eq!(game.curr_move, line[1]);
    }

    #[test]
    fn lone_first_move_pairs_with_the_opening() {
        let line = turns(&[("C2", "C4")]);
        let backlog = vec![entry(PEER, 1, &format!("mmmmm:{}", line[0]))];
        let game = reconstruct_history(&backlog, ME)
            .game
            .expect("game should be recovered");
        assert_eq!(game.color, Color::Black);
        assert_eq!(game.last_move, OPENING_TURN);
        assert_eq!(game.curr_move, line[0]);
    }

    #[test]
    fn contradicting_turns_blacklist_the_session() {
        let line = turns(&[("E2", "E4"), ("E7", "E5"), ("G1", "F3")]);
        let backlog = vec![
            entry(ME, 1, "nnnnn:I,W"),
            entry(PEER, 2, &format!("nnnnn:{}", line[0])),
            entry(ME, 3, &format!("nnnnn:{}", line[2])),
        ];
        let history = reconstruct_history(&backlog, ME);
        assert_eq!(history, History::default());
    }

    #[test]
    fn unverifiable_pair_falls_back_to_the_opening() {
        let line = turns(&[("E2", "E4"), ("E7", "E5"), ("G1", "F3")]);
        // Two moves apart: alternation holds but the diff is not one action.
        let backlog = vec![
            entry(PEER, 1, &format!("ppppp:{}", line[0].replacen(",W,", ",B,", 1))),
            entry(ME, 2, &format!("ppppp:{}", line[2])),
        ];
        let game = reconstruct_history(&backlog, ME)
            .game
            .expect("game should still be reported");
        assert_eq!(game.color, Color::White);
        assert_eq!(game.last_move, PRE_GAME_TURN);
        assert_eq!(game.curr_move, OPENING_TURN);
    }

    #[test]
    fn history_serializes_for_the_ui() {
        let backlog = vec![entry(ME, 1, "aaaaa:I,W")];
        let json = serde_json::to_value(reconstruct_history(&backlog, ME))
            .expect("history should serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "invite": { "hash": "aaaaa", "color": "White" },
                "accept": null,
                "game": null,
            })
        );
    }
}
