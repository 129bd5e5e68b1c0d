//! Headless game running, batch execution, and result storage for the
//! conquest engine.

pub mod batch;
pub mod database;
pub mod runner;

pub use batch::run_batch;
pub use database::Database;
pub use runner::{run_game, GameResult, PlayerStanding};
