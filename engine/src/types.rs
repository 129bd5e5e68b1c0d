// ═══════════════════════════════════════════════════════════════════════
// Core types — identifiers, phases, strategies, rules
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

// ── Arena identifiers ──────────────────────────────────────────────────
// Compact, copyable handles. All cross-references between territories,
// continents and players go through these instead of shared pointers.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TerritoryId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContinentId(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── Game phase ─────────────────────────────────────────────────────────

/// The named stages of the top-level game protocol. The Display form is
/// the canonical phase string surfaced to the console and the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Start,
    MapLoaded,
    MapValidated,
    PlayersAdded,
    AssignReinforcements,
    IssueOrders,
    ExecuteOrders,
    Win,
    End,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Start => "start",
            Phase::MapLoaded => "map loaded",
            Phase::MapValidated => "map validated",
            Phase::PlayersAdded => "players added",
            Phase::AssignReinforcements => "assign reinforcements",
            Phase::IssueOrders => "issue orders",
            Phase::ExecuteOrders => "execute orders",
            Phase::Win => "win",
            Phase::End => "end",
        };
        write!(f, "{s}")
    }
}

// ── Map validity ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MapValidity {
    #[default]
    Unknown,
    Invalid,
    Valid,
}

impl std::fmt::Display for MapValidity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapValidity::Unknown => write!(f, "unknown"),
            MapValidity::Invalid => write!(f, "invalid"),
            MapValidity::Valid => write!(f, "valid"),
        }
    }
}

// ── Strategy kind ──────────────────────────────────────────────────────

/// Decision-making policy assigned to a player. Dispatch is a plain match
/// in `strategy`, so copies are trivial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StratKind {
    Human,
    Aggressive,
    Benevolent,
    Neutral,
    Cheater,
}

impl StratKind {
    /// The scripted (non-interactive) strategies, in a stable order.
    pub const SCRIPTED: [StratKind; 4] = [
        StratKind::Aggressive,
        StratKind::Benevolent,
        StratKind::Neutral,
        StratKind::Cheater,
    ];
}

impl std::fmt::Display for StratKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StratKind::Human => "Human",
            StratKind::Aggressive => "Aggressive",
            StratKind::Benevolent => "Benevolent",
            StratKind::Neutral => "Neutral",
            StratKind::Cheater => "Cheater",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown strategy `{0}`")]
pub struct UnknownStrategy(pub String);

impl std::str::FromStr for StratKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(StratKind::Human),
            "aggressive" => Ok(StratKind::Aggressive),
            "benevolent" => Ok(StratKind::Benevolent),
            "neutral" => Ok(StratKind::Neutral),
            "cheater" => Ok(StratKind::Cheater),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

// ── Card type ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardType {
    Bomb,
    Reinforcement,
    Blockade,
    Airlift,
    Diplomacy,
}

impl CardType {
    pub const ALL: [CardType; 5] = [
        CardType::Bomb,
        CardType::Reinforcement,
        CardType::Blockade,
        CardType::Airlift,
        CardType::Diplomacy,
    ];
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CardType::Bomb => "bomb",
            CardType::Reinforcement => "reinforcement",
            CardType::Blockade => "blockade",
            CardType::Airlift => "airlift",
            CardType::Diplomacy => "diplomacy",
        };
        write!(f, "{s}")
    }
}

// ── Table rules ────────────────────────────────────────────────────────

/// Optional rule switches. `truce_blocks_advance` decides whether a
/// negotiated truce forbids advancing into an ally's territory for the
/// rest of the turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rules {
    pub truce_blocks_advance: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            truce_blocks_advance: true,
        }
    }
}
