use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use engine_core::{ErasedGame, Game, GameAdapter, MoveIntent, Seat};
use games_chess::{Chess, State};

const MIDDLEGAME: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn bench_legal_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("chess_legal_mask");
    let start = State::new();
    let middlegame = State::from_fen(MIDDLEGAME).expect("valid fen");

    group.bench_function("start", |b| b.iter(|| Chess::legal_mask(&start)));
    group.bench_function("middlegame", |b| b.iter(|| Chess::legal_mask(&middlegame)));
    group.finish();
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("chess_step");
    group.bench_function("e2e4", |b| {
        b.iter_batched(
            || GameAdapter::new(Chess::new()),
            |mut engine| engine.step(2410),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("chess_codec");
    let state = State::from_fen(MIDDLEGAME).expect("valid fen");
    let mask = Chess::legal_mask(&state);

    group.bench_function("observe_decode", |b| {
        b.iter(|| {
            let obs = Chess::observe(&state);
            Chess::decode_board(&obs, Seat::First)
        });
    });

    group.bench_function("encode_intent", |b| {
        let intent = MoveIntent::Squares {
            from: "e1".into(),
            to: "g1".into(),
            promotion: None,
        };
        b.iter(|| Chess::encode_intent(&intent, Seat::First, &mask));
    });

    group.finish();
}

criterion_group!(benches, bench_legal_mask, bench_step, bench_codec);
criterion_main!(benches);
