// ═══════════════════════════════════════════════════════════════════════
// Command table — the phase state machine as static data
//
// Each phase maps to a fixed slice of transitions. A command is matched
// by action name (with a few accepted aliases) or by its 1-based
// position in the phase's list. Rejected input never changes phase.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: &'static str,
    pub next: Phase,
    pub effect: &'static str,
}

const fn t(action: &'static str, next: Phase, effect: &'static str) -> Transition {
    Transition {
        action,
        next,
        effect,
    }
}

/// Transitions available from `phase`, in menu order.
pub fn transitions(phase: Phase) -> &'static [Transition] {
    const START: &[Transition] = &[
        t("loadmap", Phase::MapLoaded, "map file loaded"),
        t("tournament", Phase::Start, "tournament mode"),
    ];
    const MAP_LOADED: &[Transition] = &[
        t("loadmap", Phase::MapLoaded, "map file loaded"),
        t("validate", Phase::MapValidated, "map validated"),
    ];
    const MAP_VALIDATED: &[Transition] =
        &[t("addplayers", Phase::PlayersAdded, "player added")];
    const PLAYERS_ADDED: &[Transition] = &[
        t("addplayers", Phase::PlayersAdded, "player added"),
        t(
            "assigncountries",
            Phase::AssignReinforcements,
            "territories distributed",
        ),
    ];
    const ASSIGN_REINFORCEMENTS: &[Transition] = &[t(
        "issueorder",
        Phase::IssueOrders,
        "reinforcements assigned",
    )];
    const ISSUE_ORDERS: &[Transition] = &[
        t("issueorder", Phase::IssueOrders, "order issued"),
        t(
            "endissueorders",
            Phase::ExecuteOrders,
            "order issuing closed",
        ),
    ];
    const EXECUTE_ORDERS: &[Transition] = &[
        t("execorder", Phase::ExecuteOrders, "order executed"),
        t(
            "endexecorders",
            Phase::AssignReinforcements,
            "turn complete",
        ),
        t("win", Phase::Win, "game decided"),
    ];
    const WIN: &[Transition] = &[
        t("end", Phase::End, "session over"),
        t("play", Phase::Start, "new game"),
    ];
    const END: &[Transition] = &[];

    match phase {
        Phase::Start => START,
        Phase::MapLoaded => MAP_LOADED,
        Phase::MapValidated => MAP_VALIDATED,
        Phase::PlayersAdded => PLAYERS_ADDED,
        Phase::AssignReinforcements => ASSIGN_REINFORCEMENTS,
        Phase::IssueOrders => ISSUE_ORDERS,
        Phase::ExecuteOrders => EXECUTE_ORDERS,
        Phase::Win => WIN,
        Phase::End => END,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CommandError {
    #[error("`{input}` is not valid in phase `{phase}`")]
    Rejected { input: String, phase: Phase },
}

/// Resolve raw input against the current phase, by action name or by
/// 1-based menu index.
pub fn resolve(phase: Phase, input: &str) -> Result<&'static Transition, CommandError> {
    let table = transitions(phase);
    let action = match input.trim().to_ascii_lowercase().as_str() {
        "validatemap" => "validate".to_string(),
        "addplayer" => "addplayers".to_string(),
        "replay" => "play".to_string(),
        other => other.to_string(),
    };
    if let Some(tr) = table.iter().find(|tr| tr.action == action) {
        return Ok(tr);
    }
    if let Ok(n) = action.parse::<usize>() {
        if n >= 1 && n <= table.len() {
            return Ok(&table[n - 1]);
        }
    }
    Err(CommandError::Rejected {
        input: input.to_string(),
        phase,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_by_name_and_index() {
        let by_name = resolve(Phase::MapLoaded, "validate").unwrap();
        let by_index = resolve(Phase::MapLoaded, "2").unwrap();
        assert_eq!(by_name, by_index);
        assert_eq!(by_name.next, Phase::MapValidated);
    }

    #[test]
    fn accepts_aliases_case_insensitively() {
        assert_eq!(
            resolve(Phase::MapLoaded, "ValidateMap").unwrap().next,
            Phase::MapValidated
        );
        assert_eq!(
            resolve(Phase::Win, "replay").unwrap().next,
            Phase::Start
        );
    }

    #[test]
    fn rejects_wrong_phase_and_bad_index() {
        assert!(resolve(Phase::Start, "validate").is_err());
        assert!(resolve(Phase::Start, "0").is_err());
        assert!(resolve(Phase::Start, "3").is_err());
        assert!(resolve(Phase::End, "end").is_err());
    }

    #[test]
    fn tournament_mode_is_offered_from_start() {
        let tr = resolve(Phase::Start, "tournament").unwrap();
        assert_eq!(tr.next, Phase::Start);
        assert!(resolve(Phase::MapLoaded, "tournament").is_err());
    }

    #[test]
    fn every_phase_reaches_end() {
        // Walk the table: End must be reachable from every phase.
        fn reaches_end(phase: Phase, depth: usize) -> bool {
            if phase == Phase::End {
                return true;
            }
            if depth == 0 {
                return false;
            }
            transitions(phase)
                .iter()
                .any(|tr| tr.next != phase && reaches_end(tr.next, depth - 1))
        }
        for phase in [
            Phase::Start,
            Phase::MapLoaded,
            Phase::MapValidated,
            Phase::PlayersAdded,
            Phase::AssignReinforcements,
            Phase::IssueOrders,
            Phase::ExecuteOrders,
            Phase::Win,
        ] {
            assert!(reaches_end(phase, 10), "no path to end from {phase}");
        }
    }
}
