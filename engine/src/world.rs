// ═══════════════════════════════════════════════════════════════════════
// World — the live game state: map, players, turn order, deck, rules
//
// Players stay in the arena for the whole game so their ids remain
// stable; elimination only removes a player from the turn order.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::Deck;
use crate::map::Map;
use crate::player::Player;
use crate::types::{PlayerId, Rules, StratKind, TerritoryId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub map: Map,
    players: Vec<Player>,
    turn_order: Vec<PlayerId>,
    pub deck: Deck,
    pub rules: Rules,
}

impl World {
    pub fn new(map: Map, players: Vec<Player>) -> Self {
        let turn_order = players.iter().map(|p| p.id).collect();
        World {
            map,
            players,
            turn_order,
            deck: Deck::new(),
            rules: Rules::default(),
        }
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Active players in seating order. Eliminated players are absent.
    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    pub fn is_active(&self, id: PlayerId) -> bool {
        self.turn_order.contains(&id)
    }

    pub fn shuffle_turn_order<R: Rng>(&mut self, rng: &mut R) {
        self.turn_order.shuffle(rng);
    }

    pub fn owner_of(&self, t: TerritoryId) -> Option<PlayerId> {
        self.players.iter().find(|p| p.owns(t)).map(|p| p.id)
    }

    pub fn units_on(&self, t: TerritoryId) -> u32 {
        self.owner_of(t)
            .map(|p| self.player(p).units_on(t))
            .unwrap_or(0)
    }

    /// Hand `t` to `id`, taking it from its previous owner first.
    pub fn add_territory(&mut self, id: PlayerId, t: TerritoryId) {
        if let Some(prev) = self.owner_of(t) {
            if prev == id {
                return;
            }
            self.players[prev.index()].release(t);
        }
        self.players[id.index()].grab(t);
    }

    pub fn set_units(&mut self, id: PlayerId, t: TerritoryId, n: u32) {
        self.players[id.index()].set_units(t, n);
    }

    pub fn eliminate(&mut self, id: PlayerId) {
        self.turn_order.retain(|&p| p != id);
    }

    /// The player blockaded territories transfer to. Created on first
    /// use, outside the turn order.
    pub fn ensure_neutral(&mut self) -> PlayerId {
        if let Some(p) = self.players.iter().find(|p| p.neutral) {
            return p.id;
        }
        let id = PlayerId(self.players.len() as u8);
        let mut p = Player::new(id, "Neutral");
        p.strategy = StratKind::Neutral;
        self.players.push(p);
        id
    }

    pub fn find_neutral(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.neutral).map(|p| p.id)
    }

    pub fn are_allied(&self, a: PlayerId, b: PlayerId) -> bool {
        self.player(a).is_allied(b) || self.player(b).is_allied(a)
    }

    /// Adjacent territories of `t` not owned by `id`.
    pub fn enemy_neighbors(&self, id: PlayerId, t: TerritoryId) -> Vec<TerritoryId> {
        self.map
            .adjacent(t)
            .iter()
            .copied()
            .filter(|&n| !self.player(id).owns(n))
            .collect()
    }

    /// Draw `n` cards from the deck into `id`'s hand.
    pub fn deal<R: Rng>(&mut self, id: PlayerId, n: u32, rng: &mut R) {
        let hand = &mut self.players[id.index()].hand;
        for _ in 0..n {
            if self.deck.draw(rng, hand).is_none() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapBuilder;

    fn two_player_world() -> World {
        let map = MapBuilder::new()
            .continent("C", 1)
            .territory("A", "C", 0, 0)
            .territory("B", "C", 1, 0)
            .border("A", "B")
            .build()
            .unwrap();
        let players = vec![Player::new(PlayerId(0), "p1"), Player::new(PlayerId(1), "p2")];
        World::new(map, players)
    }

    #[test]
    fn add_territory_moves_ownership() {
        let mut w = two_player_world();
        let a = w.map.territory_by_name("A").unwrap();
        w.add_territory(PlayerId(0), a);
        w.set_units(PlayerId(0), a, 3);
        assert_eq!(w.owner_of(a), Some(PlayerId(0)));
        w.add_territory(PlayerId(1), a);
        assert_eq!(w.owner_of(a), Some(PlayerId(1)));
        assert!(!w.player(PlayerId(0)).owns(a));
        // Units do not travel with ownership.
        assert_eq!(w.units_on(a), 0);
    }

    #[test]
    fn eliminate_leaves_player_in_arena() {
        let mut w = two_player_world();
        w.eliminate(PlayerId(0));
        assert_eq!(w.turn_order(), &[PlayerId(1)]);
        assert!(!w.is_active(PlayerId(0)));
        assert_eq!(w.player(PlayerId(0)).name, "p1");
    }

    #[test]
    fn ensure_neutral_reuses_existing() {
        let mut w = two_player_world();
        // Fresh players default to the neutral policy.
        let first = w.ensure_neutral();
        assert_eq!(first, PlayerId(0));
        assert_eq!(w.players().len(), 2);
    }

    #[test]
    fn ensure_neutral_creates_when_absent() {
        let mut w = two_player_world();
        for p in [PlayerId(0), PlayerId(1)] {
            w.player_mut(p).strategy = StratKind::Aggressive;
            w.player_mut(p).neutral = false;
        }
        let n = w.ensure_neutral();
        assert_eq!(n, PlayerId(2));
        assert!(w.player(n).neutral);
        assert!(!w.is_active(n));
    }

    #[test]
    fn truce_is_mutual() {
        let mut w = two_player_world();
        w.player_mut(PlayerId(0)).add_ally(PlayerId(1));
        assert!(w.are_allied(PlayerId(0), PlayerId(1)));
        assert!(w.are_allied(PlayerId(1), PlayerId(0)));
    }
}
