use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zk2048::core::{resolve_turn, GameManager, Grid, SimpleRng};
use zk2048::types::Direction;

fn busy_grid() -> Grid {
    Grid::from_rows(&[
        &[2, 2, 4, 8],
        &[0, 4, 4, 0],
        &[16, 0, 16, 2],
        &[2, 8, 0, 8],
    ])
}

fn bench_resolve_turn(c: &mut Criterion) {
    let grid = busy_grid();

    c.bench_function("resolve_turn_left", |b| {
        b.iter(|| resolve_turn(black_box(&grid), black_box(Direction::Left)))
    });
}

fn bench_apply_move(c: &mut Criterion) {
    let mut game = GameManager::new(4, 12345);
    let mut rng = SimpleRng::new(777);

    c.bench_function("apply_move", |b| {
        b.iter(|| {
            if game.is_game_terminated() {
                game.restart();
            }
            let dir = Direction::ALL[rng.next_range(4) as usize];
            black_box(game.apply_move(dir));
        })
    });
}

fn bench_available_cells(c: &mut Criterion) {
    let grid = busy_grid();

    c.bench_function("available_cells", |b| {
        b.iter(|| black_box(&grid).available_cells())
    });
}

fn bench_moves_available(c: &mut Criterion) {
    let game = GameManager::from_grid(busy_grid(), 1);

    c.bench_function("moves_available", |b| {
        b.iter(|| black_box(&game).moves_available())
    });
}

fn bench_serialize(c: &mut Criterion) {
    let game = GameManager::from_grid(busy_grid(), 1);

    c.bench_function("serialize_state", |b| b.iter(|| black_box(&game).serialize()));
}

criterion_group!(
    benches,
    bench_resolve_turn,
    bench_apply_move,
    bench_available_cells,
    bench_moves_available,
    bench_serialize
);
criterion_main!(benches);
