// ═══════════════════════════════════════════════════════════════════════
// Game engine — drives the phase machine through whole games
//
// The engine owns the command table cursor (the current phase), the
// loaded map, the player roster, the live world once a game starts, the
// event log, and one seeded RNG that feeds every random decision. Two
// engines given the same seed and the same inputs play identical games.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::Deck;
use crate::commands::{resolve, transitions, CommandError, Transition};
use crate::events::{Event, GameLog};
use crate::loader;
use crate::map::{Map, MapError};
use crate::player::Player;
use crate::strategy::{self, DirectiveSource};
use crate::types::{CardType, Phase, PlayerId, StratKind};
use crate::world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// Reinforcement cards every player starts the game with.
pub const STARTING_REINFORCEMENTS: u32 = 50;
/// Cards stocked into the deck at game start.
pub const DECK_SIZE: usize = 100;
/// Cards dealt to each player at game start.
pub const OPENING_HAND: u32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("no map loaded")]
    NoMap,
    #[error("map failed validation")]
    MapNotValid,
    #[error("player count {0} outside {MIN_PLAYERS}..={MAX_PLAYERS}")]
    BadPlayerCount(usize),
    #[error("no such player index {0}")]
    NoSuchPlayer(usize),
    #[error("expected phase `{expected}`, found `{found}`")]
    WrongPhase { expected: Phase, found: Phase },
    #[error("no game in progress")]
    NoGame,
}

pub struct GameEngine {
    phase: Phase,
    map: Option<Map>,
    roster: Vec<Player>,
    world: Option<World>,
    log: GameLog,
    rng: ChaCha8Rng,
    turns_played: u32,
}

impl GameEngine {
    pub fn new(seed: u64) -> Self {
        GameEngine {
            phase: Phase::Start,
            map: None,
            roster: Vec::new(),
            world: None,
            log: GameLog::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            turns_played: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn log(&self) -> &GameLog {
        &self.log
    }

    pub(crate) fn record(&mut self, event: Event) {
        self.log.record(event);
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    /// The command menu for the current phase, numbered the way `resolve`
    /// accepts indices.
    pub fn available_commands(&self) -> Vec<String> {
        transitions(self.phase)
            .iter()
            .enumerate()
            .map(|(i, tr)| format!("{}. {}", i + 1, tr.action))
            .collect()
    }

    /// Run one command through the phase machine. Rejected input is
    /// logged and leaves the phase untouched.
    pub fn execute_command(&mut self, input: &str) -> Result<&'static Transition, EngineError> {
        match resolve(self.phase, input) {
            Ok(tr) => {
                if tr.next != self.phase {
                    self.log.record(Event::PhaseChanged {
                        from: self.phase.to_string(),
                        to: tr.next.to_string(),
                    });
                }
                self.log.record(Event::CommandEffect {
                    action: tr.action.to_string(),
                    effect: tr.effect.to_string(),
                });
                self.phase = tr.next;
                Ok(tr)
            }
            Err(e) => {
                self.log.record(Event::CommandRejected {
                    input: input.to_string(),
                    phase: self.phase.to_string(),
                });
                Err(e.into())
            }
        }
    }

    // ── Startup ────────────────────────────────────────────────────────

    pub fn load_map(&mut self, map: Map) -> Result<(), EngineError> {
        self.execute_command("loadmap")?;
        self.map = Some(map);
        Ok(())
    }

    pub fn load_map_file(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let map = loader::load_map(path)?;
        self.load_map(map)
    }

    /// Check the loaded map and advance only if it is valid.
    pub fn validate_map(&mut self) -> Result<(), EngineError> {
        use crate::types::MapValidity;
        let map = self.map.as_mut().ok_or(EngineError::NoMap)?;
        if map.validate() != MapValidity::Valid {
            return Err(EngineError::MapNotValid);
        }
        self.execute_command("validate")?;
        Ok(())
    }

    /// Add `count` players named `player1`, `player2`, ... with the
    /// default neutral policy.
    pub fn add_players(&mut self, count: usize) -> Result<(), EngineError> {
        let total = self.roster.len() + count;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&total) {
            return Err(EngineError::BadPlayerCount(total));
        }
        for _ in 0..count {
            self.execute_command("addplayers")?;
            let id = PlayerId(self.roster.len() as u8);
            let name = format!("player{}", self.roster.len() + 1);
            self.roster.push(Player::new(id, name));
        }
        Ok(())
    }

    pub fn set_strategy(&mut self, index: usize, kind: StratKind) -> Result<(), EngineError> {
        let player = self
            .roster
            .get_mut(index)
            .ok_or(EngineError::NoSuchPlayer(index))?;
        player.strategy = kind;
        player.neutral = kind == StratKind::Neutral;
        Ok(())
    }

    /// Add one player per strategy, named after it (`Aggressive 1`,
    /// `Cheater 2`, ...).
    pub fn add_strategy_players(&mut self, kinds: &[StratKind]) -> Result<(), EngineError> {
        let start = self.roster.len();
        self.add_players(kinds.len())?;
        for (i, &kind) in kinds.iter().enumerate() {
            self.set_strategy(start + i, kind)?;
            self.roster[start + i].name = format!("{} {}", kind, start + i + 1);
        }
        Ok(())
    }

    /// Distribute territories, shuffle the turn order, hand out starting
    /// reinforcements and opening cards, and enter the play loop phases.
    pub fn game_start(&mut self) -> Result<(), EngineError> {
        let map = self.map.clone().ok_or(EngineError::NoMap)?;
        if self.roster.len() < MIN_PLAYERS {
            return Err(EngineError::BadPlayerCount(self.roster.len()));
        }
        self.execute_command("assigncountries")?;

        let mut world = World::new(map, self.roster.clone());
        let ids: Vec<PlayerId> = world.turn_order().to_vec();
        let territories: Vec<_> = world.map.territory_ids().collect();
        for (i, t) in territories.into_iter().enumerate() {
            world.add_territory(ids[i % ids.len()], t);
        }
        world.shuffle_turn_order(&mut self.rng);
        for &pid in &ids {
            world
                .player_mut(pid)
                .hand
                .insert_many(CardType::Reinforcement, STARTING_REINFORCEMENTS);
        }
        world.deck = Deck::stocked(DECK_SIZE, &mut self.rng);
        for &pid in &ids {
            world.deal(pid, OPENING_HAND, &mut self.rng);
        }
        self.world = Some(world);
        self.turns_played = 0;
        Ok(())
    }

    // ── Turn phases ────────────────────────────────────────────────────

    /// Grant every active player max(3, territories/3 + full-continent
    /// bonuses) reinforcement cards, and one random card from the deck.
    pub fn reinforcement_phase(&mut self) -> Result<(), EngineError> {
        let world = self.world.as_mut().ok_or(EngineError::NoGame)?;
        for pid in world.turn_order().to_vec() {
            let owned = world.player(pid).territory_count() as u32;
            let mut grant = owned / 3;
            for (cid, continent) in world.map.continents() {
                let members = world.map.territories_in(cid);
                if members.iter().all(|&t| world.player(pid).owns(t)) {
                    grant += continent.bonus;
                }
            }
            let grant = grant.max(3);
            world
                .player_mut(pid)
                .hand
                .insert_many(CardType::Reinforcement, grant);
            self.log.record(Event::ReinforcementsGranted {
                player: world.player(pid).name.clone(),
                count: grant,
            });
            world.deal(pid, 1, &mut self.rng);
        }
        Ok(())
    }

    /// Let each active player fill its order list, in turn order.
    pub fn issue_orders_phase(
        &mut self,
        human: &mut dyn DirectiveSource,
    ) -> Result<(), EngineError> {
        let world = self.world.as_mut().ok_or(EngineError::NoGame)?;
        for pid in world.turn_order().to_vec() {
            strategy::issue_orders(world, pid, &mut self.rng, human, &mut self.log);
        }
        Ok(())
    }

    /// Execute everyone's orders: all deployments first, in turn order,
    /// then the remaining orders drained round-robin one at a time.
    pub fn execute_orders_phase(&mut self) -> Result<(), EngineError> {
        let world = self.world.as_mut().ok_or(EngineError::NoGame)?;
        let ids = world.turn_order().to_vec();
        for &pid in &ids {
            while let Some(i) = world.player(pid).orders.position(|o| o.is_deploy()) {
                let Ok(order) = world.player_mut(pid).orders.remove(i) else {
                    break;
                };
                order.execute(world, &mut self.rng, &mut self.log);
            }
        }
        loop {
            let mut any = false;
            for &pid in &ids {
                if let Some(order) = world.player_mut(pid).orders.pop_front() {
                    order.execute(world, &mut self.rng, &mut self.log);
                    any = true;
                }
            }
            if !any {
                break;
            }
        }
        Ok(())
    }

    /// Drop players with no territories left from the turn order.
    pub fn eliminate_defeated(&mut self) -> Result<(), EngineError> {
        let world = self.world.as_mut().ok_or(EngineError::NoGame)?;
        for pid in world.turn_order().to_vec() {
            if world.player(pid).territory_count() == 0 {
                world.eliminate(pid);
                self.log.record(Event::PlayerEliminated {
                    player: world.player(pid).name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Conquest bonus cards, then truces expire.
    pub fn end_of_turn(&mut self) -> Result<(), EngineError> {
        let world = self.world.as_mut().ok_or(EngineError::NoGame)?;
        for pid in world.turn_order().to_vec() {
            if world.player(pid).conquered_this_turn {
                world.deal(pid, 1, &mut self.rng);
            }
            world.player_mut(pid).reset_turn();
        }
        Ok(())
    }

    // ── The main loop ──────────────────────────────────────────────────

    /// Play turns until one player holds the whole map or the turn cap
    /// is hit. Returns the winner's name, or `"Draw"` at the cap.
    pub fn main_game_loop(
        &mut self,
        human: &mut dyn DirectiveSource,
        turn_cap: Option<u32>,
    ) -> Result<String, EngineError> {
        if self.phase != Phase::AssignReinforcements {
            return Err(EngineError::WrongPhase {
                expected: Phase::AssignReinforcements,
                found: self.phase,
            });
        }
        loop {
            self.eliminate_defeated()?;
            self.reinforcement_phase()?;
            self.execute_command("issueorder")?;
            self.issue_orders_phase(human)?;
            self.execute_command("endissueorders")?;
            self.execute_orders_phase()?;
            self.eliminate_defeated()?;
            self.turns_played += 1;

            let survivors = self
                .world
                .as_ref()
                .ok_or(EngineError::NoGame)?
                .turn_order()
                .to_vec();
            if survivors.len() == 1 {
                self.execute_command("win")?;
                let name = self
                    .world
                    .as_ref()
                    .ok_or(EngineError::NoGame)?
                    .player(survivors[0])
                    .name
                    .clone();
                self.log.record(Event::GameWon {
                    player: name.clone(),
                });
                return Ok(name);
            }
            if let Some(cap) = turn_cap {
                if self.turns_played >= cap {
                    self.execute_command("win")?;
                    return Ok("Draw".to_string());
                }
            }
            self.end_of_turn()?;
            self.execute_command("endexecorders")?;
        }
    }

    /// Forget the current map, roster and world, keeping the log and RNG.
    /// Used after `play` sends the machine back to the start phase.
    pub(crate) fn reset_session(&mut self) {
        self.map = None;
        self.roster.clear();
        self.world = None;
        self.turns_played = 0;
    }
}
