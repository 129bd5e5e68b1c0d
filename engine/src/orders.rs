// ═══════════════════════════════════════════════════════════════════════
// Orders — the six order kinds, validation, execution, and the per-player
// order list
//
// Orders are validated twice: once when checked at issue time by the
// strategies, and again at execution, because the world may have changed
// in between. Cards are only consumed at execution.
// ═══════════════════════════════════════════════════════════════════════

use crate::events::{Event, GameLog};
use crate::types::{CardType, PlayerId, StratKind, TerritoryId};
use crate::world::World;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Deploy {
        dest: TerritoryId,
        units: u32,
    },
    Advance {
        source: TerritoryId,
        dest: TerritoryId,
        units: u32,
    },
    Bomb {
        dest: TerritoryId,
    },
    Blockade {
        neutral: Option<PlayerId>,
        dest: TerritoryId,
    },
    Airlift {
        source: TerritoryId,
        dest: TerritoryId,
        units: u32,
    },
    Negotiate {
        target: PlayerId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub issuer: PlayerId,
    pub kind: OrderKind,
}

impl Order {
    pub fn new(issuer: PlayerId, kind: OrderKind) -> Self {
        Order { issuer, kind }
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            OrderKind::Deploy { .. } => "Deploy",
            OrderKind::Advance { .. } => "Advance",
            OrderKind::Bomb { .. } => "Bomb",
            OrderKind::Blockade { .. } => "Blockade",
            OrderKind::Airlift { .. } => "Airlift",
            OrderKind::Negotiate { .. } => "Negotiate",
        }
    }

    pub fn is_deploy(&self) -> bool {
        matches!(self.kind, OrderKind::Deploy { .. })
    }

    pub fn describe(&self, world: &World) -> String {
        let t = |id: TerritoryId| world.map.territory(id).name.clone();
        match &self.kind {
            OrderKind::Deploy { dest, units } => format!("Deploy {units} to {}", t(*dest)),
            OrderKind::Advance {
                source,
                dest,
                units,
            } => format!("Advance {units} from {} to {}", t(*source), t(*dest)),
            OrderKind::Bomb { dest } => format!("Bomb {}", t(*dest)),
            OrderKind::Blockade { dest, .. } => format!("Blockade {}", t(*dest)),
            OrderKind::Airlift {
                source,
                dest,
                units,
            } => format!("Airlift {units} from {} to {}", t(*source), t(*dest)),
            OrderKind::Negotiate { target } => {
                format!("Negotiate with {}", world.player(*target).name)
            }
        }
    }

    /// Whether the order could execute against the current world. Gives
    /// the reason on failure.
    pub fn validate(&self, world: &World) -> Result<(), String> {
        let me = world.player(self.issuer);
        match &self.kind {
            OrderKind::Deploy { dest, units } => {
                if *units == 0 {
                    return Err("nothing to deploy".into());
                }
                if !me.owns(*dest) {
                    return Err("target not owned".into());
                }
                Ok(())
            }
            OrderKind::Advance {
                source,
                dest,
                units,
            } => {
                if !me.owns(*source) {
                    return Err("source not owned".into());
                }
                if *units == 0 {
                    return Err("no units committed".into());
                }
                if me.strategy != StratKind::Cheater && *units > me.units_on(*source) {
                    return Err("not enough units at source".into());
                }
                if !world.map.are_adjacent(*source, *dest) {
                    return Err("territories not adjacent".into());
                }
                if world.rules.truce_blocks_advance {
                    if let Some(owner) = world.owner_of(*dest) {
                        if owner != self.issuer && world.are_allied(self.issuer, owner) {
                            return Err("truce in effect".into());
                        }
                    }
                }
                Ok(())
            }
            OrderKind::Bomb { dest } => {
                if me.hand.count(CardType::Bomb) == 0 {
                    return Err("no bomb card".into());
                }
                match world.owner_of(*dest) {
                    None => Err("nothing to bomb".into()),
                    Some(owner) if owner == self.issuer => Err("cannot bomb own territory".into()),
                    Some(owner) if world.are_allied(self.issuer, owner) => {
                        Err("truce in effect".into())
                    }
                    Some(_) => Ok(()),
                }
            }
            OrderKind::Blockade { neutral, dest } => {
                if me.hand.count(CardType::Blockade) == 0 {
                    return Err("no blockade card".into());
                }
                if !me.owns(*dest) {
                    return Err("target not owned".into());
                }
                match neutral {
                    Some(n) if world.player(*n).neutral => Ok(()),
                    _ => Err("no neutral player to hold the blockade".into()),
                }
            }
            OrderKind::Airlift {
                source,
                dest,
                units,
            } => {
                if me.hand.count(CardType::Airlift) == 0 {
                    return Err("no airlift card".into());
                }
                if !me.owns(*source) || !me.owns(*dest) {
                    return Err("both endpoints must be owned".into());
                }
                if *units == 0 || *units > me.units_on(*source) {
                    return Err("not enough units at source".into());
                }
                Ok(())
            }
            OrderKind::Negotiate { target } => {
                if me.hand.count(CardType::Diplomacy) == 0 {
                    return Err("no diplomacy card".into());
                }
                if *target == self.issuer {
                    return Err("cannot negotiate with oneself".into());
                }
                if !world.is_active(*target) {
                    return Err("no such opponent".into());
                }
                Ok(())
            }
        }
    }

    /// Execute against the world, recording the outcome. Returns false
    /// if the order no longer validates.
    pub fn execute<R: Rng>(&self, world: &mut World, rng: &mut R, log: &mut GameLog) -> bool {
        if let Err(reason) = self.validate(world) {
            log.record(Event::OrderRejected {
                player: world.player(self.issuer).name.clone(),
                order: self.describe(world),
                reason,
            });
            return false;
        }
        let description = self.describe(world);
        let detail = match self.kind {
            OrderKind::Deploy { dest, units } => {
                let placed = world
                    .player_mut(self.issuer)
                    .hand
                    .play_many(CardType::Reinforcement, units);
                if placed == 0 {
                    log.record(Event::OrderRejected {
                        player: world.player(self.issuer).name.clone(),
                        order: description,
                        reason: "no reinforcement cards".into(),
                    });
                    return false;
                }
                let now = world.player(self.issuer).units_on(dest) + placed;
                world.set_units(self.issuer, dest, now);
                format!("{placed} units placed, {now} now stationed")
            }
            OrderKind::Advance {
                source,
                dest,
                units,
            } => self.advance(world, source, dest, units, rng, log),
            OrderKind::Bomb { dest } => {
                world.player_mut(self.issuer).hand.play(CardType::Bomb);
                let owner = world.owner_of(dest).unwrap_or(self.issuer);
                let halved = world.player(owner).units_on(dest) / 2;
                world.set_units(owner, dest, halved);
                format!("{halved} units remain")
            }
            OrderKind::Blockade { neutral, dest } => {
                world.player_mut(self.issuer).hand.play(CardType::Blockade);
                let doubled = world.player(self.issuer).units_on(dest) * 2;
                let n = neutral.unwrap_or(self.issuer);
                world.add_territory(n, dest);
                world.set_units(n, dest, doubled);
                format!("{doubled} neutral units hold the blockade")
            }
            OrderKind::Airlift {
                source,
                dest,
                units,
            } => {
                world.player_mut(self.issuer).hand.play(CardType::Airlift);
                let left = world.player(self.issuer).units_on(source) - units;
                let there = world.player(self.issuer).units_on(dest) + units;
                world.set_units(self.issuer, source, left);
                world.set_units(self.issuer, dest, there);
                format!("{units} units flown")
            }
            OrderKind::Negotiate { target } => {
                world
                    .player_mut(self.issuer)
                    .hand
                    .play(CardType::Diplomacy);
                world.player_mut(self.issuer).add_ally(target);
                world.player_mut(target).add_ally(self.issuer);
                "truce until end of turn".into()
            }
        };
        log.record(Event::OrderExecuted {
            player: world.player(self.issuer).name.clone(),
            order: description,
            detail,
        });
        true
    }

    fn advance<R: Rng>(
        &self,
        world: &mut World,
        source: TerritoryId,
        dest: TerritoryId,
        units: u32,
        rng: &mut R,
        log: &mut GameLog,
    ) -> String {
        let committed = units.min(world.player(self.issuer).units_on(source));
        let left = world.player(self.issuer).units_on(source) - committed;
        match world.owner_of(dest) {
            Some(owner) if owner == self.issuer => {
                world.set_units(self.issuer, source, left);
                let there = world.player(self.issuer).units_on(dest) + committed;
                world.set_units(self.issuer, dest, there);
                format!("{committed} units moved")
            }
            owner => {
                world.set_units(self.issuer, source, left);
                // An unowned territory still puts up a token garrison.
                let defending = owner.map(|o| world.player(o).units_on(dest)).unwrap_or(2);
                let (att, def) = if world.player(self.issuer).strategy == StratKind::Cheater {
                    (committed.max(1), 0)
                } else {
                    combat_roll(committed, defending, rng)
                };
                let conquered = def == 0 && att > 0;
                log.record(Event::CombatResolved {
                    attacker: world.player(self.issuer).name.clone(),
                    defender: owner
                        .map(|o| world.player(o).name.clone())
                        .unwrap_or_else(|| "nobody".into()),
                    territory: world.map.territory(dest).name.clone(),
                    attackers_left: att,
                    defenders_left: def,
                    conquered,
                });
                if conquered {
                    world.add_territory(self.issuer, dest);
                    world.set_units(self.issuer, dest, att);
                    world.player_mut(self.issuer).conquered_this_turn = true;
                    format!("conquered with {att} units")
                } else {
                    if let Some(o) = owner {
                        world.set_units(o, dest, def);
                    }
                    format!("repelled, {def} defenders remain")
                }
            }
        }
    }
}

/// One battle. Each round rolls a single die in 0..10: above 3 a
/// defender falls, below 7 an attacker falls, so mid rolls cost both
/// sides. Runs until one side is gone.
pub(crate) fn combat_roll<R: Rng>(attackers: u32, defenders: u32, rng: &mut R) -> (u32, u32) {
    let mut att = attackers;
    let mut def = defenders;
    while att > 0 && def > 0 {
        let roll: u32 = rng.gen_range(0..10);
        if roll > 3 {
            def -= 1;
        }
        if roll < 7 {
            att -= 1;
        }
    }
    (att, def)
}

// ── Order list ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, thiserror::Error)]
pub enum OrdersError {
    #[error("order index {index} out of range (have {len})")]
    OutOfRange { index: usize, len: usize },
}

/// A player's pending orders, executed front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdersList {
    orders: Vec<Order>,
}

impl OrdersList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn move_order(&mut self, from: usize, to: usize) -> Result<(), OrdersError> {
        let len = self.orders.len();
        for index in [from, to] {
            if index >= len {
                return Err(OrdersError::OutOfRange { index, len });
            }
        }
        let order = self.orders.remove(from);
        self.orders.insert(to, order);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Order, OrdersError> {
        if index >= self.orders.len() {
            return Err(OrdersError::OutOfRange {
                index,
                len: self.orders.len(),
            });
        }
        Ok(self.orders.remove(index))
    }

    pub fn pop_front(&mut self) -> Option<Order> {
        if self.orders.is_empty() {
            None
        } else {
            Some(self.orders.remove(0))
        }
    }

    pub fn front(&self) -> Option<&Order> {
        self.orders.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Index of the first order matching `pred`, if any.
    pub fn position(&self, pred: impl Fn(&Order) -> bool) -> Option<usize> {
        self.orders.iter().position(pred)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TerritoryId;

    fn deploy(units: u32) -> Order {
        Order::new(
            PlayerId(0),
            OrderKind::Deploy {
                dest: TerritoryId(0),
                units,
            },
        )
    }

    #[test]
    fn list_preserves_issue_order() {
        let mut list = OrdersList::new();
        list.add(deploy(1));
        list.add(deploy(2));
        list.add(deploy(3));
        assert_eq!(list.len(), 3);
        assert!(matches!(
            list.pop_front().unwrap().kind,
            OrderKind::Deploy { units: 1, .. }
        ));
    }

    #[test]
    fn move_reorders_and_checks_bounds() {
        let mut list = OrdersList::new();
        list.add(deploy(1));
        list.add(deploy(2));
        list.move_order(1, 0).unwrap();
        assert!(matches!(
            list.front().unwrap().kind,
            OrderKind::Deploy { units: 2, .. }
        ));
        assert!(matches!(
            list.move_order(0, 5),
            Err(OrdersError::OutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn remove_out_of_range_is_an_error() {
        let mut list = OrdersList::new();
        list.add(deploy(1));
        assert!(list.remove(0).is_ok());
        assert!(list.remove(0).is_err());
    }
}
