//! Headless engine for a turn-based territorial conquest game.
//!
//! The crate is organized around one seeded [`GameEngine`] driving a
//! phase state machine: load and validate a map, seat 2..=6 players,
//! then loop reinforcement, order issuance and order execution until a
//! single player holds every territory. Scripted strategies play
//! without input; a human player is driven through the
//! [`DirectiveSource`] boundary.

pub mod cards;
pub mod commands;
pub mod engine;
pub mod events;
pub mod loader;
pub mod map;
pub mod orders;
pub mod player;
pub mod strategy;
pub mod tournament;
pub mod types;
pub mod world;

pub use engine::{EngineError, GameEngine};
pub use events::{Event, GameLog};
pub use map::{Map, MapBuilder, MapError};
pub use orders::{Order, OrderKind, OrdersList};
pub use player::Player;
pub use strategy::{DirectiveSource, HumanDirective, NoInput, Prompt};
pub use tournament::{TournamentConfig, TournamentError, TournamentReport};
pub use types::{
    CardType, ContinentId, MapValidity, Phase, PlayerId, Rules, StratKind, TerritoryId,
};
pub use world::World;
