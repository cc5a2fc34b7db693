use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use engine_core::{ErasedGame, Game, GameAdapter, MoveIntent, Seat};
use games_tictactoe::{State, TicTacToe};

fn bench_reset(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_reset");
    group.bench_function("reset", |b| {
        let mut engine = GameAdapter::new(TicTacToe::new());
        b.iter(|| engine.reset());
    });
    group.finish();
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_step");
    group.bench_function("step_center", |b| {
        b.iter_batched(
            || GameAdapter::new(TicTacToe::new()),
            |mut engine| engine.step(4),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_codec");
    let state = [0, 4, 8, 2].iter().fold(State::new(), |s, &a| s.make_move(a));

    group.bench_function("observe_decode", |b| {
        b.iter(|| {
            let obs = TicTacToe::observe(&state);
            TicTacToe::decode_board(&obs, state.current_player())
        });
    });

    group.bench_function("encode_intent", |b| {
        let mask = TicTacToe::legal_mask(&state);
        let intent = MoveIntent::Cell { col: 2, row: 1 };
        b.iter(|| TicTacToe::encode_intent(&intent, Seat::First, &mask));
    });

    group.finish();
}

criterion_group!(benches, bench_reset, bench_step, bench_codec);
criterion_main!(benches);
