use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};

use relay_chess::game_state::chess_types::{Color, GameStatus, Square};
use relay_chess::game_state::game_state::{GameState, TurnSnapshot};
use relay_chess::moves::move_descriptions::{Action, ActionKind};
use relay_chess::protocol::game_status::{advance_status, propose_action};
use relay_chess::utils::algebraic::algebraic_to_square;
use relay_chess::utils::turn_diff::decode_and_diff;

const LINE: &[(&str, &str)] = &[
    ("E2", "E4"),
    ("E7", "E5"),
    ("G1", "F3"),
    ("B8", "C6"),
    ("F1", "C4"),
    ("G8", "F6"),
];

fn sq(name: &str) -> Square {
    algebraic_to_square(name).expect("benchmark square should parse")
}

/// The state before the last move of `LINE`, and that move's message.
fn prepared_turn() -> (GameState, String) {
    let mut state = GameState::new_game();
    state.start();
    let mut message = String::new();
    let mut prior = state.clone();
    for (from, to) in LINE {
        let mover = state.side_to_move();
        let proposed = propose_action(
            &state,
            sq(from),
            Action::new(sq(to), ActionKind::Move),
            None,
            mover,
        )
        .expect("benchmark line should be legal");
        prior = state;
        state = proposed.update.accepted.expect("benchmark line should be accepted");
        message = proposed.message;
    }
    (prior, message)
}

fn bench_turn_codec(c: &mut Criterion) {
    let (prior, message) = prepared_turn();
    let prior_text = prior.snapshot.encode();

    // Correctness guard before benchmarking.
    let update = advance_status(&prior, &message, Color::White);
    assert_eq!(update.status, GameStatus::WhiteTurn);

    let mut group = c.benchmark_group("turn_codec");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    group.bench_function("decode", |b| {
        b.iter(|| TurnSnapshot::decode(black_box(&message)).expect("turn should decode"))
    });

    let snapshot = TurnSnapshot::decode(&message).expect("turn should decode");
    group.bench_function("encode", |b| b.iter(|| black_box(&snapshot).encode()));

    group.bench_function("decode_and_diff", |b| {
        b.iter(|| {
            decode_and_diff(black_box(&prior_text), black_box(&message)).expect("diff should succeed")
        })
    });

    group.bench_function("advance_status", |b| {
        b.iter(|| advance_status(black_box(&prior), black_box(&message), Color::White))
    });

    group.finish();
}

criterion_group!(turn_codec_benches, bench_turn_codec);
criterion_main!(turn_codec_benches);
