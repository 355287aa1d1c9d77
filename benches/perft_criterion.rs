use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use relay_chess::game_state::chess_rules::OPENING_TURN;
use relay_chess::game_state::chess_types::GameStatus;
use relay_chess::game_state::game_state::{GameState, TurnSnapshot};
use relay_chess::move_generation::perft::perft;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    turn: &'static str,
    expected_nodes: &'static [u64],
}

const KIWIPETE_TURN: &str =
    "A2B2C2D5E4F2G2H2A1H1C3E5D2E2F3E1A7B4C7D7E6F7G6H3A8H8B6F6A6G7E7E8,B,TTTT";
const ROOK_ENDGAME_TURN: &str =
    "XXB5XXXXE2XXG2XXB4XXXXXXXXXXXXA5XXXXC7D6XXF4XXXXXXH5XXXXXXXXXXH4,B,FFFF";

const CASES_QUICK: &[BenchCase] = &[
    BenchCase {
        name: "position_1",
        turn: OPENING_TURN,
        expected_nodes: &[20, 400, 8902],
    },
    BenchCase {
        name: "position_2",
        turn: KIWIPETE_TURN,
        expected_nodes: &[48, 2039],
    },
    BenchCase {
        name: "position_3",
        turn: ROOK_ENDGAME_TURN,
        expected_nodes: &[14, 191, 2812],
    },
];

const CASES_STANDARD: &[BenchCase] = &[
    BenchCase {
        name: "position_1",
        turn: OPENING_TURN,
        expected_nodes: &[20, 400, 8902, 197_281],
    },
    BenchCase {
        name: "position_2",
        turn: KIWIPETE_TURN,
        expected_nodes: &[48, 2039, 97_862],
    },
    BenchCase {
        name: "position_3",
        turn: ROOK_ENDGAME_TURN,
        expected_nodes: &[14, 191, 2812, 43_238],
    },
];

fn standard_suite() -> bool {
    matches!(std::env::var("RELAY_BENCH_SUITE"), Ok(value) if value.eq_ignore_ascii_case("standard"))
}

fn state_from_turn(turn: &str) -> GameState {
    let snapshot = TurnSnapshot::decode(turn).expect("benchmark turn should decode");
    let status = GameStatus::turn_of(snapshot.mover.opposite());
    GameState {
        snapshot,
        en_passant: None,
        status,
    }
}

fn bench_perft(c: &mut Criterion) {
    let (suite_name, cases) = if standard_suite() {
        ("standard", CASES_STANDARD)
    } else {
        ("quick", CASES_QUICK)
    };

    let mut group = c.benchmark_group(format!("perft_{suite_name}"));
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    for case in cases {
        let game = state_from_turn(case.turn);

        for (depth_idx, expected_nodes) in case.expected_nodes.iter().enumerate() {
            let depth = (depth_idx + 1) as u8;

            // Correctness guard before benchmarking.
            let warmup = perft(&game, depth).expect("perft should run");
            assert_eq!(
                warmup.nodes as u64, *expected_nodes,
                "node mismatch in warmup for {} depth {}",
                case.name, depth
            );

            group.throughput(Throughput::Elements(*expected_nodes));
            let bench_name = format!("{}_d{}", case.name, depth);

            group.bench_with_input(
                BenchmarkId::from_parameter(bench_name),
                expected_nodes,
                |b, expected| {
                    b.iter(|| {
                        let count = perft(black_box(&game), black_box(depth))
                            .expect("perft benchmark run should succeed");
                        assert_eq!(count.nodes as u64, *expected);
                        black_box(count.nodes)
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(perft_benches, bench_perft);
criterion_main!(perft_benches);
