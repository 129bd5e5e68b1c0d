// ═══════════════════════════════════════════════════════════════════════
// Database — SQLite storage for game results and ELO ratings
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::GameResult;
use rusqlite::{params, Connection};

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path.
    pub fn new(path: &str) -> Self {
        let conn = Connection::open(path).expect("Failed to open database");
        let db = Database { conn };
        db.create_schema();
        db
    }

    /// In-memory database (useful for tests).
    pub fn in_memory() -> Self {
        let conn = Connection::open_in_memory().expect("Failed to open in-memory database");
        let db = Database { conn };
        db.create_schema();
        db
    }

    fn create_schema(&self) {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS strategies (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL UNIQUE,
                elo         REAL NOT NULL DEFAULT 1500.0,
                games       INTEGER NOT NULL DEFAULT 0,
                wins        INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS games (
                id          INTEGER PRIMARY KEY,
                seed        INTEGER NOT NULL,
                map         TEXT NOT NULL,
                turns       INTEGER NOT NULL,
                winner      TEXT NOT NULL,
                played_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS game_players (
                id          INTEGER PRIMARY KEY,
                game_id     INTEGER NOT NULL REFERENCES games(id),
                strategy_id INTEGER NOT NULL REFERENCES strategies(id),
                name        TEXT NOT NULL,
                territories INTEGER NOT NULL,
                units       INTEGER NOT NULL,
                survived    INTEGER NOT NULL
            );
        ",
            )
            .expect("Failed to create schema");
    }

    /// Register a strategy (or return its existing ID).
    pub fn register_strategy(&self, name: &str) -> i64 {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO strategies (name) VALUES (?1)",
                params![name],
            )
            .expect("Failed to register strategy");
        self.conn
            .query_row(
                "SELECT id FROM strategies WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .expect("Failed to get strategy id")
    }

    /// Store a completed game result and update per-strategy tallies.
    pub fn store_game(&self, map: &str, result: &GameResult) -> i64 {
        self.conn
            .execute(
                "INSERT INTO games (seed, map, turns, winner) VALUES (?1, ?2, ?3, ?4)",
                params![
                    result.seed as i64,
                    map,
                    result.turns_played as i64,
                    result.winner
                ],
            )
            .expect("Failed to store game");
        let game_id = self.conn.last_insert_rowid();

        for standing in &result.standings {
            let strategy_id = self.register_strategy(&standing.strategy.to_string());
            self.conn
                .execute(
                    "INSERT INTO game_players (game_id, strategy_id, name, territories, units, survived)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        game_id,
                        strategy_id,
                        standing.name,
                        standing.territories as i64,
                        standing.units as i64,
                        standing.survived as i64,
                    ],
                )
                .expect("Failed to store game player");

            let won = standing.name == result.winner;
            self.conn
                .execute(
                    "UPDATE strategies SET games = games + 1, wins = wins + ?1 WHERE id = ?2",
                    params![if won { 1 } else { 0 }, strategy_id],
                )
                .expect("Failed to update strategy stats");
        }

        game_id
    }

    /// Update ELO ratings after a game.
    /// Simple multiplayer ELO: winner gains K points from each loser.
    pub fn update_elo(&self, winner_id: i64, loser_ids: &[i64], k: f64) {
        let winner_elo: f64 = self
            .conn
            .query_row(
                "SELECT elo FROM strategies WHERE id = ?1",
                params![winner_id],
                |row| row.get(0),
            )
            .unwrap_or(1500.0);

        for &loser_id in loser_ids {
            let loser_elo: f64 = self
                .conn
                .query_row(
                    "SELECT elo FROM strategies WHERE id = ?1",
                    params![loser_id],
                    |row| row.get(0),
                )
                .unwrap_or(1500.0);

            let expected_winner = 1.0 / (1.0 + 10f64.powf((loser_elo - winner_elo) / 400.0));
            let expected_loser = 1.0 - expected_winner;

            let delta_w = k * (1.0 - expected_winner);
            let delta_l = k * (0.0 - expected_loser);

            self.conn
                .execute(
                    "UPDATE strategies SET elo = elo + ?1 WHERE id = ?2",
                    params![delta_w, winner_id],
                )
                .expect("Failed to update winner ELO");
            self.conn
                .execute(
                    "UPDATE strategies SET elo = elo + ?1 WHERE id = ?2",
                    params![delta_l, loser_id],
                )
                .expect("Failed to update loser ELO");
        }
    }

    /// Get the ELO leaderboard: (name, elo, games, wins), best first.
    pub fn leaderboard(&self) -> Vec<(String, f64, u32, u32)> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, elo, games, wins FROM strategies ORDER BY elo DESC")
            .expect("Failed to prepare leaderboard query");

        stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
            ))
        })
        .expect("Failed to query leaderboard")
        .filter_map(|r| r.ok())
        .collect()
    }

    /// Get total number of games stored.
    pub fn game_count(&self) -> u32 {
        self.conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
            .unwrap_or(0)
    }
}
