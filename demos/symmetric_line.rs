//! Walk through a small line world by hand and check the equilibrium
//! against values worked out on paper.

use hide_seek_solver::game::{BaseScores, PayoffMatrixBuilder, PenaltyShape, PlaceType, ProximityAdjuster, World};
use hide_seek_solver::lp::{EquilibriumSolver, SolverConfig};

fn main() {
    let world = World::line(vec![PlaceType::Hard, PlaceType::Neutral, PlaceType::Easy]).unwrap();
    let matrix = PayoffMatrixBuilder::build(&world, &BaseScores::default()).unwrap();
    let solver = EquilibriumSolver::new(SolverConfig::default());

    println!("World: {}", world);
    println!("Seeker payoffs:");
    for row in matrix.seeker_rows() {
        println!("  {:?}", row);
    }

    let (result, stats) = solver.solve_with_stats(&matrix).unwrap();
    println!();
    println!("Value: {:.6} (pivots: {} + {})", result.value, stats.seeker_pivots, stats.hider_pivots);
    println!("  Seeker: {:?}", result.seeker_strategy.weights());
    println!("  Hider:  {:?}", result.hider_strategy.weights());

    // Catch payoffs 3, 2, 1 on the diagonal: both sides weight each spot by
    // the inverse of its catch value.
    println!("\nExpected Equilibrium:");
    println!("  Value: {:.6}", 6.0 / 11.0);
    println!("  Both:  [{:.6}, {:.6}, {:.6}]", 2.0 / 11.0, 3.0 / 11.0, 6.0 / 11.0);

    // With a proximity penalty the neighbouring misses start paying the seeker.
    for scale in [0.5, 1.0, 4.0] {
        let adjusted = ProximityAdjuster::apply(&matrix, &world, &PenaltyShape::Saturating { scale }).unwrap();
        let result = solver.solve(&adjusted).unwrap();
        println!(
            "\nSaturating penalty (scale {}): value {:.4}, hider {:?}",
            scale,
            result.value,
            result
                .hider_strategy
                .weights()
                .iter()
                .map(|w| format!("{:.3}", w))
                .collect::<Vec<_>>()
        );
    }
}
