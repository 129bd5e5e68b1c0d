// ═══════════════════════════════════════════════════════════════════════
// Game Runner — runs one complete headless game and reports standings
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::engine::EngineError;
use conquest_engine::strategy::NoInput;
use conquest_engine::types::StratKind;
use conquest_engine::GameEngine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of a completed game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub seed: u64,
    /// Winner's name, or `Draw` if the turn cap was hit.
    pub winner: String,
    pub turns_played: u32,
    pub standings: Vec<PlayerStanding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub name: String,
    pub strategy: StratKind,
    pub territories: u32,
    pub units: u32,
    pub survived: bool,
}

/// Play one game of the given strategies on a map file. The engine is
/// seeded, so the same arguments always produce the same result.
pub fn run_game(
    map_path: impl AsRef<Path>,
    strategies: &[StratKind],
    seed: u64,
    max_turns: u32,
) -> Result<GameResult, EngineError> {
    let mut engine = GameEngine::new(seed);
    engine.load_map_file(map_path)?;
    engine.validate_map()?;
    engine.add_strategy_players(strategies)?;
    engine.game_start()?;
    let winner = engine.main_game_loop(&mut NoInput, Some(max_turns))?;
    let world = engine.world().ok_or(EngineError::NoGame)?;
    let standings = strategies
        .iter()
        .enumerate()
        .map(|(i, &strategy)| {
            let player = &world.players()[i];
            PlayerStanding {
                name: player.name.clone(),
                strategy,
                territories: player.territory_count() as u32,
                units: player.total_units(),
                survived: world.is_active(player.id),
            }
        })
        .collect();
    Ok(GameResult {
        seed,
        winner,
        turns_played: engine.turns_played(),
        standings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_a_full_game_to_a_decision() {
        let result = run_game(
            "../maps/duel.map",
            &[StratKind::Cheater, StratKind::Neutral],
            11,
            30,
        )
        .unwrap();
        assert_eq!(result.winner, "Cheater 1");
        assert_eq!(result.standings.len(), 2);
        let cheater = &result.standings[0];
        assert!(cheater.survived);
        assert_eq!(cheater.territories, 4);
        assert!(!result.standings[1].survived);
    }

    #[test]
    fn same_seed_reproduces_the_result() {
        let strategies = [StratKind::Aggressive, StratKind::Aggressive];
        let a = run_game("../maps/duel.map", &strategies, 3, 20).unwrap();
        let b = run_game("../maps/duel.map", &strategies, 3, 20).unwrap();
        assert_eq!(a.winner, b.winner);
        assert_eq!(a.turns_played, b.turns_played);
    }
}
