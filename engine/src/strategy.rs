// ═══════════════════════════════════════════════════════════════════════
// Strategies — order issuance policies
//
// Scripted strategies compute their whole batch of orders from a read
// view of the world. The human strategy is driven through the
// DirectiveSource boundary: the engine asks, the source answers, and bad
// answers are rejected with a logged reason instead of crashing the
// turn.
// ═══════════════════════════════════════════════════════════════════════

use crate::events::{Event, GameLog};
use crate::orders::{Order, OrderKind};
use crate::types::{CardType, PlayerId, StratKind, TerritoryId};
use crate::world::World;
use rand::Rng;
use std::collections::{HashMap, HashSet};

// ── Human input boundary ───────────────────────────────────────────────

/// What a human is shown before each directive.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub player: String,
    pub reinforcements_left: u32,
    pub to_defend: Vec<String>,
    pub to_attack: Vec<String>,
}

/// One human instruction, expressed in territory and player names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanDirective {
    Deploy { territory: String, units: u32 },
    Advance { from: String, to: String, units: u32 },
    Bomb { territory: String },
    Blockade { territory: String },
    Airlift { from: String, to: String, units: u32 },
    Negotiate { player: String },
    EndTurn,
}

/// Supplies human directives on demand. `None` ends the turn.
pub trait DirectiveSource {
    fn next_directive(&mut self, prompt: &Prompt) -> Option<HumanDirective>;
}

/// Source for headless games: every human turn ends immediately.
#[derive(Debug, Default)]
pub struct NoInput;

impl DirectiveSource for NoInput {
    fn next_directive(&mut self, _prompt: &Prompt) -> Option<HumanDirective> {
        None
    }
}

// ── Target selection ───────────────────────────────────────────────────

/// Owned territories, in the priority order the strategy defends them.
pub fn to_defend(world: &World, pid: PlayerId) -> Vec<TerritoryId> {
    let p = world.player(pid);
    let mut list = p.territories().to_vec();
    match p.strategy {
        StratKind::Benevolent => list.sort_by_key(|&t| p.units_on(t)),
        StratKind::Aggressive => list.sort_by_key(|&t| std::cmp::Reverse(p.units_on(t))),
        _ => {}
    }
    list
}

/// Enemy territories within reach. Empty for policies that never attack.
pub fn to_attack(world: &World, pid: PlayerId) -> Vec<TerritoryId> {
    match world.player(pid).strategy {
        StratKind::Neutral | StratKind::Benevolent => Vec::new(),
        _ => {
            let mut seen = HashSet::new();
            let mut list = Vec::new();
            for &t in world.player(pid).territories() {
                for n in world.enemy_neighbors(pid, t) {
                    if seen.insert(n) {
                        list.push(n);
                    }
                }
            }
            list
        }
    }
}

// ── Issuance ───────────────────────────────────────────────────────────

/// Fill `pid`'s order list for this turn according to its strategy.
pub fn issue_orders<R: Rng>(
    world: &mut World,
    pid: PlayerId,
    rng: &mut R,
    human: &mut dyn DirectiveSource,
    log: &mut GameLog,
) {
    match world.player(pid).strategy {
        StratKind::Neutral => {}
        StratKind::Aggressive => {
            let neutral = neutral_for_blockade(world, pid);
            let orders = aggressive_orders(world, pid, rng, neutral);
            push_all(world, orders, log);
        }
        StratKind::Benevolent => {
            let neutral = neutral_for_blockade(world, pid);
            let orders = benevolent_orders(world, pid, neutral);
            push_all(world, orders, log);
        }
        StratKind::Cheater => {
            let orders = cheater_orders(world, pid);
            push_all(world, orders, log);
        }
        StratKind::Human => human_orders(world, pid, human, log),
    }
}

fn push_all(world: &mut World, orders: Vec<Order>, log: &mut GameLog) {
    for order in orders {
        push_order(world, order, log);
    }
}

fn neutral_for_blockade(world: &mut World, pid: PlayerId) -> Option<PlayerId> {
    if world.player(pid).hand.count(CardType::Blockade) > 0 {
        Some(world.ensure_neutral())
    } else {
        None
    }
}

fn push_order(world: &mut World, order: Order, log: &mut GameLog) {
    log.record(Event::OrderAdded {
        player: world.player(order.issuer).name.clone(),
        order: order.describe(world),
    });
    world.player_mut(order.issuer).orders.add(order);
}

/// Mass on the strongest frontline territory, then push outward from it
/// on every front at once. Spends cards aggressively: bombs random
/// reachable enemies, airlifts the rear guard forward, blockades its
/// weakest remaining border.
fn aggressive_orders<R: Rng>(
    world: &World,
    pid: PlayerId,
    rng: &mut R,
    neutral: Option<PlayerId>,
) -> Vec<Order> {
    let p = world.player(pid);
    let mut orders = Vec::new();
    let stronghold = p
        .territories()
        .iter()
        .copied()
        .filter(|&t| !world.enemy_neighbors(pid, t).is_empty())
        .max_by_key(|&t| p.units_on(t))
        .or_else(|| p.territories().first().copied());
    let Some(stronghold) = stronghold else {
        return orders;
    };
    let pool = p.reinforcement_cards();
    if pool > 0 {
        orders.push(Order::new(
            pid,
            OrderKind::Deploy {
                dest: stronghold,
                units: pool,
            },
        ));
    }
    let targets = world.enemy_neighbors(pid, stronghold);
    if !targets.is_empty() {
        let share = ((p.units_on(stronghold) + pool) / targets.len() as u32).max(1);
        for &dest in &targets {
            orders.push(Order::new(
                pid,
                OrderKind::Advance {
                    source: stronghold,
                    dest,
                    units: share,
                },
            ));
        }
    }
    let reachable = to_attack(world, pid);
    for _ in 0..p.hand.count(CardType::Bomb) {
        if reachable.is_empty() {
            break;
        }
        let dest = reachable[rng.gen_range(0..reachable.len())];
        orders.push(Order::new(pid, OrderKind::Bomb { dest }));
    }
    if p.hand.count(CardType::Airlift) > 0 {
        // Fly the rear guard up to the stronghold.
        let rear = p
            .territories()
            .iter()
            .copied()
            .filter(|&t| t != stronghold && p.units_on(t) > 0)
            .max_by_key(|&t| p.units_on(t));
        if let Some(source) = rear {
            orders.push(Order::new(
                pid,
                OrderKind::Airlift {
                    source,
                    dest: stronghold,
                    units: p.units_on(source),
                },
            ));
        }
    }
    if let Some(neutral) = neutral {
        let weakest = p
            .territories()
            .iter()
            .copied()
            .filter(|&t| t != stronghold)
            .min_by_key(|&t| p.units_on(t));
        if let Some(dest) = weakest {
            orders.push(Order::new(
                pid,
                OrderKind::Blockade {
                    neutral: Some(neutral),
                    dest,
                },
            ));
        }
    }
    orders
}

/// Spread reinforcements one unit at a time onto whichever territory is
/// weakest, and only play defensive cards. Never attacks.
fn benevolent_orders(world: &World, pid: PlayerId, neutral: Option<PlayerId>) -> Vec<Order> {
    let p = world.player(pid);
    let mut orders = Vec::new();
    if p.territories().is_empty() {
        return orders;
    }
    let mut simulated: HashMap<TerritoryId, u32> = p
        .territories()
        .iter()
        .map(|&t| (t, p.units_on(t)))
        .collect();
    let mut placed: Vec<(TerritoryId, u32)> = Vec::new();
    for _ in 0..p.reinforcement_cards() {
        let weakest = *p
            .territories()
            .iter()
            .min_by_key(|&&t| simulated[&t])
            .unwrap();
        *simulated.get_mut(&weakest).unwrap() += 1;
        match placed.iter_mut().find(|(t, _)| *t == weakest) {
            Some((_, n)) => *n += 1,
            None => placed.push((weakest, 1)),
        }
    }
    for (dest, units) in placed {
        orders.push(Order::new(pid, OrderKind::Deploy { dest, units }));
    }
    if p.hand.count(CardType::Airlift) > 0 && p.territory_count() > 1 {
        let strongest = *p
            .territories()
            .iter()
            .max_by_key(|&&t| simulated[&t])
            .unwrap();
        let weakest = *p
            .territories()
            .iter()
            .min_by_key(|&&t| simulated[&t])
            .unwrap();
        let units = simulated[&strongest] / 2;
        if strongest != weakest && units > 0 {
            orders.push(Order::new(
                pid,
                OrderKind::Airlift {
                    source: strongest,
                    dest: weakest,
                    units,
                },
            ));
        }
    }
    if let Some(neutral) = neutral {
        // Hand the most exposed border territory to the neutral player.
        let exposed = p
            .territories()
            .iter()
            .copied()
            .filter(|&t| !world.enemy_neighbors(pid, t).is_empty())
            .min_by_key(|&t| simulated[&t]);
        if let Some(dest) = exposed {
            orders.push(Order::new(
                pid,
                OrderKind::Blockade {
                    neutral: Some(neutral),
                    dest,
                },
            ));
        }
    }
    if p.hand.count(CardType::Diplomacy) > 0 {
        let threat = world
            .turn_order()
            .iter()
            .copied()
            .filter(|&o| o != pid)
            .max_by_key(|&o| world.player(o).total_units());
        if let Some(target) = threat {
            orders.push(Order::new(pid, OrderKind::Negotiate { target }));
        }
    }
    orders
}

/// One overwhelming advance into every adjacent enemy territory.
fn cheater_orders(world: &World, pid: PlayerId) -> Vec<Order> {
    let p = world.player(pid);
    let mut orders = Vec::new();
    let mut claimed = HashSet::new();
    for &source in p.territories() {
        for dest in world.enemy_neighbors(pid, source) {
            if claimed.insert(dest) {
                orders.push(Order::new(
                    pid,
                    OrderKind::Advance {
                        source,
                        dest,
                        units: 99,
                    },
                ));
            }
        }
    }
    orders
}

fn make_prompt(world: &World, pid: PlayerId, reinforcements_left: u32) -> Prompt {
    let name = |t: TerritoryId| world.map.territory(t).name.clone();
    Prompt {
        player: world.player(pid).name.clone(),
        reinforcements_left,
        to_defend: to_defend(world, pid).into_iter().map(name).collect(),
        to_attack: to_attack(world, pid).into_iter().map(name).collect(),
    }
}

fn human_orders(
    world: &mut World,
    pid: PlayerId,
    source: &mut dyn DirectiveSource,
    log: &mut GameLog,
) {
    let mut pool = world.player(pid).reinforcement_cards();
    loop {
        let prompt = make_prompt(world, pid, pool);
        let Some(directive) = source.next_directive(&prompt) else {
            return;
        };
        if pool > 0 {
            match directive {
                HumanDirective::Deploy { territory, units } => {
                    match lookup_territory(world, &territory) {
                        Ok(dest) if units >= 1 && units <= pool => {
                            let order = Order::new(pid, OrderKind::Deploy { dest, units });
                            match order.validate(world) {
                                Ok(()) => {
                                    pool -= units;
                                    push_order(world, order, log);
                                }
                                Err(reason) => reject(world, pid, &order, reason, log),
                            }
                        }
                        Ok(_) => reject_raw(
                            world,
                            pid,
                            format!("Deploy {units} to {territory}"),
                            format!("{pool} reinforcements left"),
                            log,
                        ),
                        Err(reason) => reject_raw(
                            world,
                            pid,
                            format!("Deploy {units} to {territory}"),
                            reason,
                            log,
                        ),
                    }
                }
                other => reject_raw(
                    world,
                    pid,
                    format!("{other:?}"),
                    "deploy all reinforcements first".into(),
                    log,
                ),
            }
            continue;
        }
        if let HumanDirective::EndTurn = directive {
            return;
        }
        match build_directive_order(world, pid, directive) {
            Ok(order) => match order.validate(world) {
                Ok(()) => push_order(world, order, log),
                Err(reason) => reject(world, pid, &order, reason, log),
            },
            Err((raw, reason)) => reject_raw(world, pid, raw, reason, log),
        }
    }
}

fn reject(world: &World, pid: PlayerId, order: &Order, reason: String, log: &mut GameLog) {
    log.record(Event::OrderRejected {
        player: world.player(pid).name.clone(),
        order: order.describe(world),
        reason,
    });
}

fn reject_raw(world: &World, pid: PlayerId, raw: String, reason: String, log: &mut GameLog) {
    log.record(Event::OrderRejected {
        player: world.player(pid).name.clone(),
        order: raw,
        reason,
    });
}

fn lookup_territory(world: &World, name: &str) -> Result<TerritoryId, String> {
    world
        .map
        .territory_by_name(name)
        .ok_or_else(|| format!("no territory named `{name}`"))
}

fn lookup_player(world: &World, name: &str) -> Result<PlayerId, String> {
    world
        .players()
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(|p| p.id)
        .ok_or_else(|| format!("no player named `{name}`"))
}

fn build_directive_order(
    world: &mut World,
    pid: PlayerId,
    directive: HumanDirective,
) -> Result<Order, (String, String)> {
    let raw = format!("{directive:?}");
    let fail = |reason: String| (raw.clone(), reason);
    let kind = match directive {
        HumanDirective::Deploy { .. } => {
            return Err(fail("no reinforcements left".into()));
        }
        HumanDirective::Advance { from, to, units } => OrderKind::Advance {
            source: lookup_territory(world, &from).map_err(fail)?,
            dest: lookup_territory(world, &to).map_err(fail)?,
            units,
        },
        HumanDirective::Bomb { territory } => OrderKind::Bomb {
            dest: lookup_territory(world, &territory).map_err(fail)?,
        },
        HumanDirective::Blockade { territory } => {
            let dest = lookup_territory(world, &territory).map_err(fail)?;
            OrderKind::Blockade {
                neutral: Some(world.ensure_neutral()),
                dest,
            }
        }
        HumanDirective::Airlift { from, to, units } => OrderKind::Airlift {
            source: lookup_territory(world, &from).map_err(fail)?,
            dest: lookup_territory(world, &to).map_err(fail)?,
            units,
        },
        HumanDirective::Negotiate { player } => OrderKind::Negotiate {
            target: lookup_player(world, &player).map_err(fail)?,
        },
        HumanDirective::EndTurn => unreachable!("handled by the caller"),
    };
    Ok(Order::new(pid, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapBuilder;
    use crate::player::Player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// A-B-C-D in a line; p0 holds A and B, p1 holds C and D.
    fn fixture() -> World {
        let map = MapBuilder::new()
            .continent("Line", 2)
            .territory("A", "Line", 0, 0)
            .territory("B", "Line", 1, 0)
            .territory("C", "Line", 2, 0)
            .territory("D", "Line", 3, 0)
            .border("A", "B")
            .border("B", "C")
            .border("C", "D")
            .build()
            .unwrap();
        let players = vec![Player::new(PlayerId(0), "p1"), Player::new(PlayerId(1), "p2")];
        let mut w = World::new(map, players);
        for (pid, names, strat) in [
            (PlayerId(0), ["A", "B"], StratKind::Aggressive),
            (PlayerId(1), ["C", "D"], StratKind::Aggressive),
        ] {
            for n in names {
                let t = w.map.territory_by_name(n).unwrap();
                w.add_territory(pid, t);
                w.set_units(pid, t, 4);
            }
            w.player_mut(pid).strategy = strat;
            w.player_mut(pid).neutral = false;
        }
        w
    }

    #[test]
    fn aggressive_masses_on_the_frontline() {
        let mut w = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        w.player_mut(PlayerId(0))
            .hand
            .insert_many(CardType::Reinforcement, 5);
        let mut log = GameLog::new();
        issue_orders(&mut w, PlayerId(0), &mut rng, &mut NoInput, &mut log);
        let b = w.map.territory_by_name("B").unwrap();
        let c = w.map.territory_by_name("C").unwrap();
        let p = w.player(PlayerId(0));
        let first = p.orders.front().unwrap();
        // Only B borders the enemy, so everything lands there.
        assert_eq!(
            first.kind,
            OrderKind::Deploy { dest: b, units: 5 }
        );
        assert!(p
            .orders
            .iter()
            .any(|o| matches!(o.kind, OrderKind::Advance { source, dest, .. }
                if source == b && dest == c)));
    }

    #[test]
    fn benevolent_reinforces_weakest_and_never_attacks() {
        let mut w = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let a = w.map.territory_by_name("A").unwrap();
        w.player_mut(PlayerId(0)).strategy = StratKind::Benevolent;
        w.set_units(PlayerId(0), a, 1);
        w.player_mut(PlayerId(0))
            .hand
            .insert_many(CardType::Reinforcement, 2);
        let mut log = GameLog::new();
        issue_orders(&mut w, PlayerId(0), &mut rng, &mut NoInput, &mut log);
        let p = w.player(PlayerId(0));
        assert_eq!(
            p.orders.front().unwrap().kind,
            OrderKind::Deploy { dest: a, units: 2 }
        );
        assert!(p.orders.iter().all(|o| !matches!(o.kind, OrderKind::Advance { .. })));
    }

    #[test]
    fn neutral_issues_nothing() {
        let mut w = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        w.player_mut(PlayerId(0)).strategy = StratKind::Neutral;
        w.player_mut(PlayerId(0))
            .hand
            .insert_many(CardType::Reinforcement, 5);
        let mut log = GameLog::new();
        issue_orders(&mut w, PlayerId(0), &mut rng, &mut NoInput, &mut log);
        assert!(w.player(PlayerId(0)).orders.is_empty());
    }

    #[test]
    fn cheater_claims_each_border_once() {
        let mut w = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        w.player_mut(PlayerId(0)).strategy = StratKind::Cheater;
        let mut log = GameLog::new();
        issue_orders(&mut w, PlayerId(0), &mut rng, &mut NoInput, &mut log);
        let c = w.map.territory_by_name("C").unwrap();
        let orders: Vec<_> = w.player(PlayerId(0)).orders.iter().cloned().collect();
        assert_eq!(orders.len(), 1);
        assert_eq!(
            orders[0].kind,
            OrderKind::Advance {
                source: w.map.territory_by_name("B").unwrap(),
                dest: c,
                units: 99
            }
        );
    }

    #[test]
    fn target_lists_follow_the_policy() {
        let mut w = fixture();
        let a = w.map.territory_by_name("A").unwrap();
        let b = w.map.territory_by_name("B").unwrap();
        let c = w.map.territory_by_name("C").unwrap();
        w.set_units(PlayerId(0), b, 9);
        assert_eq!(to_defend(&w, PlayerId(0)), vec![b, a]);
        assert_eq!(to_attack(&w, PlayerId(0)), vec![c]);
        w.player_mut(PlayerId(0)).strategy = StratKind::Benevolent;
        assert_eq!(to_defend(&w, PlayerId(0)), vec![a, b]);
        assert!(to_attack(&w, PlayerId(0)).is_empty());
    }

    struct Script(Vec<HumanDirective>);

    impl DirectiveSource for Script {
        fn next_directive(&mut self, _prompt: &Prompt) -> Option<HumanDirective> {
            if self.0.is_empty() {
                None
            } else {
                Some(self.0.remove(0))
            }
        }
    }

    #[test]
    fn human_deploys_then_advances_then_ends() {
        let mut w = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        w.player_mut(PlayerId(0)).strategy = StratKind::Human;
        w.player_mut(PlayerId(0))
            .hand
            .insert_many(CardType::Reinforcement, 3);
        let mut script = Script(vec![
            // Rejected: reinforcements must land first.
            HumanDirective::Bomb {
                territory: "C".into(),
            },
            HumanDirective::Deploy {
                territory: "B".into(),
                units: 3,
            },
            HumanDirective::Advance {
                from: "B".into(),
                to: "C".into(),
                units: 2,
            },
            HumanDirective::EndTurn,
        ]);
        let mut log = GameLog::new();
        issue_orders(&mut w, PlayerId(0), &mut rng, &mut script, &mut log);
        let p = w.player(PlayerId(0));
        assert_eq!(p.orders.len(), 2);
        assert!(p.orders.front().unwrap().is_deploy());
        assert!(log
            .events()
            .iter()
            .any(|e| matches!(e, Event::OrderRejected { .. })));
    }

    #[test]
    fn human_cannot_end_turn_with_reinforcements_in_hand() {
        let mut w = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        w.player_mut(PlayerId(0)).strategy = StratKind::Human;
        w.player_mut(PlayerId(0))
            .hand
            .insert_many(CardType::Reinforcement, 2);
        let mut script = Script(vec![
            HumanDirective::EndTurn,
            HumanDirective::Deploy {
                territory: "A".into(),
                units: 2,
            },
            HumanDirective::EndTurn,
        ]);
        let mut log = GameLog::new();
        issue_orders(&mut w, PlayerId(0), &mut rng, &mut script, &mut log);
        let p = w.player(PlayerId(0));
        assert_eq!(p.orders.len(), 1);
        assert!(p.orders.front().unwrap().is_deploy());
        // The early end was turned away, not honored.
        assert!(log
            .events()
            .iter()
            .any(|e| matches!(e, Event::OrderRejected { .. })));
    }

    #[test]
    fn human_bad_names_are_rejected_not_fatal() {
        let mut w = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        w.player_mut(PlayerId(0)).strategy = StratKind::Human;
        let mut script = Script(vec![
            HumanDirective::Advance {
                from: "Atlantis".into(),
                to: "C".into(),
                units: 1,
            },
            HumanDirective::EndTurn,
        ]);
        let mut log = GameLog::new();
        issue_orders(&mut w, PlayerId(0), &mut rng, &mut script, &mut log);
        assert!(w.player(PlayerId(0)).orders.is_empty());
        assert!(log
            .events()
            .iter()
            .any(|e| matches!(e, Event::OrderRejected { .. })));
    }
}
