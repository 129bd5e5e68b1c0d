// ═══════════════════════════════════════════════════════════════════════
// Tournament mode — M maps x G games between scripted strategies
// ═══════════════════════════════════════════════════════════════════════

use crate::engine::{EngineError, GameEngine};
use crate::events::Event;
use crate::strategy::NoInput;
use crate::types::{Phase, StratKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const MAP_RANGE: std::ops::RangeInclusive<usize> = 1..=5;
pub const STRATEGY_RANGE: std::ops::RangeInclusive<usize> = 2..=4;
pub const GAME_RANGE: std::ops::RangeInclusive<u32> = 1..=5;
pub const TURN_RANGE: std::ops::RangeInclusive<u32> = 10..=50;

#[derive(Debug, Clone, thiserror::Error)]
pub enum TournamentError {
    #[error("need 1..=5 maps, got {0}")]
    MapCount(usize),
    #[error("need 2..=4 computer strategies, got {0}")]
    StrategyCount(usize),
    #[error("human players cannot enter a tournament")]
    HumanEntrant,
    #[error("games per map must be 1..=5, got {0}")]
    GameCount(u32),
    #[error("turns per game must be 10..=50, got {0}")]
    TurnCount(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub maps: Vec<PathBuf>,
    pub strategies: Vec<StratKind>,
    pub games_per_map: u32,
    pub turns_per_game: u32,
}

impl TournamentConfig {
    pub fn validate(&self) -> Result<(), TournamentError> {
        if !MAP_RANGE.contains(&self.maps.len()) {
            return Err(TournamentError::MapCount(self.maps.len()));
        }
        if !STRATEGY_RANGE.contains(&self.strategies.len()) {
            return Err(TournamentError::StrategyCount(self.strategies.len()));
        }
        if self.strategies.contains(&StratKind::Human) {
            return Err(TournamentError::HumanEntrant);
        }
        if !GAME_RANGE.contains(&self.games_per_map) {
            return Err(TournamentError::GameCount(self.games_per_map));
        }
        if !TURN_RANGE.contains(&self.turns_per_game) {
            return Err(TournamentError::TurnCount(self.turns_per_game));
        }
        Ok(())
    }
}

/// Winner (or `Draw`) per map per game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReport {
    pub maps: Vec<PathBuf>,
    pub strategies: Vec<StratKind>,
    pub games_per_map: u32,
    pub turns_per_game: u32,
    /// `results[m][g]` is the outcome of game `g` on map `m`.
    pub results: Vec<Vec<String>>,
}

impl std::fmt::Display for TournamentReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tournament mode:")?;
        writeln!(
            f,
            "M: {}",
            self.maps
                .iter()
                .map(|m| m.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )?;
        writeln!(
            f,
            "P: {}",
            self.strategies
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )?;
        writeln!(f, "G: {}", self.games_per_map)?;
        writeln!(f, "D: {}", self.turns_per_game)?;
        writeln!(f)?;
        write!(f, "{:<12}", "")?;
        for g in 1..=self.games_per_map {
            write!(f, "{:<14}", format!("Game {g}"))?;
        }
        writeln!(f)?;
        for (m, row) in self.results.iter().enumerate() {
            write!(f, "{:<12}", format!("Map {}", m + 1))?;
            for outcome in row {
                write!(f, "{outcome:<14}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TournamentRunError {
    #[error(transparent)]
    Config(#[from] TournamentError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl GameEngine {
    /// Run every game of the tournament on this engine, one after the
    /// other, reusing the phase machine's `play` transition between
    /// games. Winners land in the report and in the event log.
    pub fn play_tournament(
        &mut self,
        config: &TournamentConfig,
    ) -> Result<TournamentReport, TournamentRunError> {
        config.validate()?;
        if self.phase() == Phase::Start {
            self.execute_command("tournament")?;
        }
        let mut results = Vec::with_capacity(config.maps.len());
        for map in &config.maps {
            let mut row = Vec::with_capacity(config.games_per_map as usize);
            for game in 1..=config.games_per_map {
                if self.phase() == Phase::Win {
                    self.execute_command("play")?;
                }
                self.reset_session();
                self.load_map_file(map)?;
                self.validate_map()?;
                self.add_strategy_players(&config.strategies)?;
                self.game_start()?;
                let outcome =
                    self.main_game_loop(&mut NoInput, Some(config.turns_per_game))?;
                self.log_tournament_result(map, game, &outcome);
                row.push(outcome);
            }
            results.push(row);
        }
        Ok(TournamentReport {
            maps: config.maps.clone(),
            strategies: config.strategies.clone(),
            games_per_map: config.games_per_map,
            turns_per_game: config.turns_per_game,
            results,
        })
    }

    fn log_tournament_result(&mut self, map: &std::path::Path, game: u32, outcome: &str) {
        self.record(Event::TournamentResult {
            line: format!("{}: game {game}: {outcome}", map.display()),
        });
    }
}
