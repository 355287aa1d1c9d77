//! Backlog replay tool.
//!
//! Usage: `relay_chess <local-address> < backlog.tsv`
//!
//! Each stdin line is `sender<TAB>rfc3339-timestamp<TAB>message`. The tool
//! reconstructs the session history, resumes the recovered game and prints
//! the records, the game status and the board.

use std::env;
use std::io::{self, BufRead};
use std::process;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use relay_chess::protocol::game_status::resume_game;
use relay_chess::protocol::history::{reconstruct_history, BacklogEntry};
use relay_chess::utils::render_game_state::render_game_state;

fn parse_line(line: &str) -> Option<BacklogEntry> {
    let mut fields = line.splitn(3, '\t');
    let sender = fields.next()?.trim();
    let sent_at = DateTime::parse_from_rfc3339(fields.next()?.trim()).ok()?;
    let body = fields.next()?.trim();
    Some(BacklogEntry {
        sender: sender.to_owned(),
        sent_at: sent_at.with_timezone(&Utc),
        body: body.to_owned(),
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let Some(local_address) = env::args().nth(1) else {
        eprintln!("usage: relay_chess <local-address> < backlog.tsv");
        process::exit(2);
    };

    let mut backlog = Vec::new();
    for (number, line) in io::stdin().lock().lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "stopped reading backlog");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Some(entry) => backlog.push(entry),
            None => warn!(line = number + 1, "skipping malformed backlog line"),
        }
    }
    info!(entries = backlog.len(), "backlog loaded");

    let history = reconstruct_history(&backlog, &local_address);

    match &history.invite {
        Some(invite) => println!("invite:  {} as {}", invite.hash, invite.color),
        None => println!("invite:  none"),
    }
    match &history.accept {
        Some(accept) => println!("accept:  {} as {}", accept.hash, accept.color),
        None => println!("accept:  none"),
    }
    let Some(game) = &history.game else {
        println!("game:    none");
        return;
    };
    println!("game:    {} as {}", game.hash, game.color);

    match resume_game(&game.last_move, &game.curr_move) {
        Ok(state) => println!("{}", render_game_state(&state)),
        Err(err) => warn!(error = %err, "recovered game could not be resumed"),
    }
}
