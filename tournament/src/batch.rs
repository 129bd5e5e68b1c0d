// ═══════════════════════════════════════════════════════════════════════
// Batch runner — many seeds of the same matchup, in parallel
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::{run_game, GameResult};
use conquest_engine::engine::EngineError;
use conquest_engine::types::StratKind;
use rayon::prelude::*;
use std::path::Path;

/// Play one game per seed on worker threads. Results come back in seed
/// order regardless of which thread finished first.
pub fn run_batch(
    map_path: impl AsRef<Path> + Sync,
    strategies: &[StratKind],
    seeds: &[u64],
    max_turns: u32,
) -> Vec<Result<GameResult, EngineError>> {
    seeds
        .par_iter()
        .map(|&seed| run_game(map_path.as_ref(), strategies, seed, max_turns))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_results_stay_in_seed_order() {
        let results = run_batch(
            "../maps/duel.map",
            &[StratKind::Cheater, StratKind::Neutral],
            &[1, 2, 3],
            30,
        );
        assert_eq!(results.len(), 3);
        for (i, r) in results.iter().enumerate() {
            let r = r.as_ref().unwrap();
            assert_eq!(r.seed, [1, 2, 3][i]);
            assert_eq!(r.winner, "Cheater 1");
        }
    }
}
