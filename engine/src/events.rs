// ═══════════════════════════════════════════════════════════════════════
// Game log — explicit event list
//
// Every observable effect is appended here as a typed event. Consumers
// (console, tournament reports, tests) read the list after the fact;
// nothing subscribes to anything.
// ═══════════════════════════════════════════════════════════════════════

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub enum Event {
    PhaseChanged {
        from: String,
        to: String,
    },
    CommandEffect {
        action: String,
        effect: String,
    },
    CommandRejected {
        input: String,
        phase: String,
    },
    OrderAdded {
        player: String,
        order: String,
    },
    OrderExecuted {
        player: String,
        order: String,
        detail: String,
    },
    OrderRejected {
        player: String,
        order: String,
        reason: String,
    },
    CombatResolved {
        attacker: String,
        defender: String,
        territory: String,
        attackers_left: u32,
        defenders_left: u32,
        conquered: bool,
    },
    ReinforcementsGranted {
        player: String,
        count: u32,
    },
    PlayerEliminated {
        player: String,
    },
    GameWon {
        player: String,
    },
    TournamentResult {
        line: String,
    },
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::PhaseChanged { from, to } => write!(f, "phase: {from} -> {to}"),
            Event::CommandEffect { action, effect } => write!(f, "command `{action}`: {effect}"),
            Event::CommandRejected { input, phase } => {
                write!(f, "rejected `{input}` in phase `{phase}`")
            }
            Event::OrderAdded { player, order } => write!(f, "{player} issues {order}"),
            Event::OrderExecuted {
                player,
                order,
                detail,
            } => write!(f, "{player} executes {order}: {detail}"),
            Event::OrderRejected {
                player,
                order,
                reason,
            } => write!(f, "{player}'s {order} invalid: {reason}"),
            Event::CombatResolved {
                attacker,
                defender,
                territory,
                attackers_left,
                defenders_left,
                conquered,
            } => write!(
                f,
                "battle at {territory}: {attacker} ({attackers_left} left) vs {defender} \
                 ({defenders_left} left){}",
                if *conquered { ", conquered" } else { "" }
            ),
            Event::ReinforcementsGranted { player, count } => {
                write!(f, "{player} receives {count} reinforcements")
            }
            Event::PlayerEliminated { player } => write!(f, "{player} is eliminated"),
            Event::GameWon { player } => write!(f, "{player} wins the game"),
            Event::TournamentResult { line } => write!(f, "{line}"),
        }
    }
}

/// Append-only record of everything that happened in a game.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GameLog {
    events: Vec<Event>,
}

impl GameLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// The whole log as pretty JSON, for dumps and tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}

impl std::fmt::Display for GameLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for e in &self.events {
            writeln!(f, "{e}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut log = GameLog::new();
        log.record(Event::PhaseChanged {
            from: "start".into(),
            to: "map loaded".into(),
        });
        log.record(Event::GameWon {
            player: "p1".into(),
        });
        assert_eq!(log.events().len(), 2);
        assert!(matches!(log.events()[1], Event::GameWon { .. }));
    }

    #[test]
    fn serializes_to_json() {
        let mut log = GameLog::new();
        log.record(Event::GameWon {
            player: "p1".into(),
        });
        let json = log.to_json().unwrap();
        assert!(json.contains("GameWon"));
        assert!(json.contains("p1"));
    }

    #[test]
    fn display_is_one_line_per_event() {
        let mut log = GameLog::new();
        log.record(Event::ReinforcementsGranted {
            player: "p1".into(),
            count: 5,
        });
        assert_eq!(log.to_string(), "p1 receives 5 reinforcements\n");
    }
}
