// ═══════════════════════════════════════════════════════════════════════
// Player — holdings, hand, order list, diplomacy state
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::Hand;
use crate::orders::OrdersList;
use crate::types::{CardType, PlayerId, StratKind, TerritoryId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Hand,
    pub orders: OrdersList,
    /// Owned territories in acquisition order. The per-territory unit
    /// counts always have exactly one entry per owned territory.
    territories: Vec<TerritoryId>,
    units: HashMap<TerritoryId, u32>,
    allies: HashSet<PlayerId>,
    pub strategy: StratKind,
    pub neutral: bool,
    pub conquered_this_turn: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            hand: Hand::new(),
            orders: OrdersList::new(),
            territories: Vec::new(),
            units: HashMap::new(),
            allies: HashSet::new(),
            strategy: StratKind::Neutral,
            neutral: true,
            conquered_this_turn: false,
        }
    }

    pub fn owns(&self, t: TerritoryId) -> bool {
        self.units.contains_key(&t)
    }

    pub fn units_on(&self, t: TerritoryId) -> u32 {
        self.units.get(&t).copied().unwrap_or(0)
    }

    pub fn territories(&self) -> &[TerritoryId] {
        &self.territories
    }

    pub fn territory_count(&self) -> usize {
        self.territories.len()
    }

    pub fn total_units(&self) -> u32 {
        self.units.values().sum()
    }

    pub(crate) fn grab(&mut self, t: TerritoryId) {
        if !self.owns(t) {
            self.territories.push(t);
            self.units.insert(t, 0);
        }
    }

    pub(crate) fn release(&mut self, t: TerritoryId) {
        self.territories.retain(|&x| x != t);
        self.units.remove(&t);
    }

    pub(crate) fn set_units(&mut self, t: TerritoryId, n: u32) {
        if let Some(u) = self.units.get_mut(&t) {
            *u = n;
        }
    }

    pub fn add_ally(&mut self, other: PlayerId) {
        self.allies.insert(other);
    }

    pub fn is_allied(&self, other: PlayerId) -> bool {
        self.allies.contains(&other)
    }

    /// Number of reinforcement cards in hand, the budget for Deploy.
    pub fn reinforcement_cards(&self) -> u32 {
        self.hand.count(CardType::Reinforcement)
    }

    /// End-of-turn cleanup: truces expire and the conquest flag resets.
    pub fn reset_turn(&mut self) {
        self.allies.clear();
        self.conquered_this_turn = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grab_and_release_keep_units_entry_in_step() {
        let mut p = Player::new(PlayerId(0), "p1");
        let t = TerritoryId(3);
        p.grab(t);
        assert!(p.owns(t));
        assert_eq!(p.units_on(t), 0);
        p.set_units(t, 5);
        assert_eq!(p.units_on(t), 5);
        p.release(t);
        assert!(!p.owns(t));
        assert_eq!(p.units_on(t), 0);
        assert!(p.territories().is_empty());
    }

    #[test]
    fn grab_is_idempotent() {
        let mut p = Player::new(PlayerId(0), "p1");
        p.grab(TerritoryId(1));
        p.set_units(TerritoryId(1), 4);
        p.grab(TerritoryId(1));
        assert_eq!(p.territory_count(), 1);
        assert_eq!(p.units_on(TerritoryId(1)), 4);
    }

    #[test]
    fn truce_expires_at_turn_end() {
        let mut p = Player::new(PlayerId(0), "p1");
        p.add_ally(PlayerId(1));
        p.conquered_this_turn = true;
        assert!(p.is_allied(PlayerId(1)));
        p.reset_turn();
        assert!(!p.is_allied(PlayerId(1)));
        assert!(!p.conquered_this_turn);
    }
}
