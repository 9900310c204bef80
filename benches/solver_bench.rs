//! Benchmarks for the equilibrium solver.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hide_seek_solver::game::{
    BaseScores, Dimensions, GameConfig, PayoffMatrixBuilder, PenaltyShape, ProximityAdjuster, Simulation,
    TypeDistribution, World,
};
use hide_seek_solver::lp::{EquilibriumSolver, SolverConfig};

fn line_solve_benchmark(c: &mut Criterion) {
    let solver = EquilibriumSolver::new(SolverConfig::default());
    let mut group = c.benchmark_group("line_solve");

    for len in [5usize, 20, 50] {
        let world = World::create(Dimensions::Line { len }, &TypeDistribution::uniform(), 42).unwrap();
        let matrix = PayoffMatrixBuilder::build(&world, &BaseScores::default()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(len), &matrix, |b, m| {
            b.iter(|| solver.solve(black_box(m)).unwrap())
        });
    }
    group.finish();
}

fn grid_proximity_benchmark(c: &mut Criterion) {
    let solver = EquilibriumSolver::new(SolverConfig::default());
    let world = World::create(Dimensions::Grid { rows: 6, cols: 6 }, &TypeDistribution::uniform(), 42).unwrap();
    let base = PayoffMatrixBuilder::build(&world, &BaseScores::default()).unwrap();
    let shape = PenaltyShape::Saturating { scale: 2.0 };

    c.bench_function("grid_6x6_proximity_solve", |b| {
        b.iter(|| {
            let adjusted = ProximityAdjuster::apply(black_box(&base), &world, &shape).unwrap();
            solver.solve(&adjusted).unwrap()
        })
    });
}

fn simulation_benchmark(c: &mut Criterion) {
    let sim = Simulation::new(GameConfig::grid(4, 4).with_seed(42)).unwrap();

    c.bench_function("simulate_10000_rounds", |b| b.iter(|| sim.run(black_box(10_000)).unwrap()));
}

criterion_group!(benches, line_solve_benchmark, grid_proximity_benchmark, simulation_benchmark);
criterion_main!(benches);
