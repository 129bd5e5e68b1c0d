// ═══════════════════════════════════════════════════════════════════════
// Map graph — territories, continents, adjacency, validation
//
// The map is static topology: nothing here changes during a game.
// Ownership and unit counts live on the players (see world.rs).
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{ContinentId, MapValidity, TerritoryId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, thiserror::Error)]
pub enum MapError {
    #[error("map file read failed: {0}")]
    Read(String),
    #[error("line {line}: {msg}")]
    Syntax { line: usize, msg: String },
    #[error("territory `{0}` references unknown continent `{1}`")]
    UnknownContinent(String, String),
    #[error("territory `{0}` lists unknown neighbor `{1}`")]
    UnknownNeighbor(String, String),
    #[error("duplicate territory `{0}`")]
    DuplicateTerritory(String),
    #[error("map has no territories")]
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Continent {
    pub name: String,
    pub bonus: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Territory {
    pub name: String,
    pub x: u16,
    pub y: u16,
    pub continent: ContinentId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    continents: Vec<Continent>,
    territories: Vec<Territory>,
    adjacency: Vec<Vec<TerritoryId>>,
    validity: MapValidity,
}

impl Map {
    pub fn territory(&self, id: TerritoryId) -> &Territory {
        &self.territories[id.0 as usize]
    }

    pub fn continent(&self, id: ContinentId) -> &Continent {
        &self.continents[id.0 as usize]
    }

    pub fn territory_count(&self) -> usize {
        self.territories.len()
    }

    pub fn territory_ids(&self) -> impl Iterator<Item = TerritoryId> {
        (0..self.territories.len()).map(|i| TerritoryId(i as u16))
    }

    pub fn continents(&self) -> impl Iterator<Item = (ContinentId, &Continent)> {
        self.continents
            .iter()
            .enumerate()
            .map(|(i, c)| (ContinentId(i as u8), c))
    }

    pub fn territory_by_name(&self, name: &str) -> Option<TerritoryId> {
        self.territories
            .iter()
            .position(|t| t.name == name)
            .map(|i| TerritoryId(i as u16))
    }

    pub fn adjacent(&self, id: TerritoryId) -> &[TerritoryId] {
        &self.adjacency[id.0 as usize]
    }

    pub fn are_adjacent(&self, a: TerritoryId, b: TerritoryId) -> bool {
        self.adjacency[a.0 as usize].contains(&b)
    }

    pub fn continent_size(&self, id: ContinentId) -> usize {
        self.territories
            .iter()
            .filter(|t| t.continent == id)
            .count()
    }

    pub fn territories_in(&self, id: ContinentId) -> Vec<TerritoryId> {
        self.territories
            .iter()
            .enumerate()
            .filter(|(_, t)| t.continent == id)
            .map(|(i, _)| TerritoryId(i as u16))
            .collect()
    }

    pub fn validity(&self) -> MapValidity {
        self.validity
    }

    /// Validate the whole map: non-empty, fully connected, and every
    /// continent a connected subgraph with at least one territory.
    /// Sets and returns the tri-state validity.
    pub fn validate(&mut self) -> MapValidity {
        self.validity = if self.check() {
            MapValidity::Valid
        } else {
            MapValidity::Invalid
        };
        self.validity
    }

    fn check(&self) -> bool {
        if self.territories.is_empty() {
            return false;
        }
        if self.reachable(TerritoryId(0), None) != self.territories.len() {
            return false;
        }
        for (cid, _) in self.continents() {
            let members = self.territories_in(cid);
            match members.first() {
                None => return false,
                Some(&start) => {
                    if self.reachable(start, Some(cid)) != members.len() {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// BFS counting territories reachable from `start`, optionally
    /// restricted to a single continent.
    fn reachable(&self, start: TerritoryId, within: Option<ContinentId>) -> usize {
        let mut seen = vec![false; self.territories.len()];
        let mut queue = VecDeque::new();
        seen[start.0 as usize] = true;
        queue.push_back(start);
        let mut count = 0;
        while let Some(t) = queue.pop_front() {
            count += 1;
            for &n in self.adjacent(t) {
                if seen[n.0 as usize] {
                    continue;
                }
                if let Some(cid) = within {
                    if self.territory(n).continent != cid {
                        continue;
                    }
                }
                seen[n.0 as usize] = true;
                queue.push_back(n);
            }
        }
        count
    }
}

// ── Builder ────────────────────────────────────────────────────────────
// Used by the loader and by tests to assemble maps by name before the
// arena indices exist.

#[derive(Debug, Default)]
pub struct MapBuilder {
    continents: Vec<Continent>,
    territories: Vec<(String, u16, u16, String)>,
    neighbors: Vec<(String, String)>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn continent(mut self, name: &str, bonus: u32) -> Self {
        self.continents.push(Continent {
            name: name.to_string(),
            bonus,
        });
        self
    }

    pub fn territory(mut self, name: &str, continent: &str, x: u16, y: u16) -> Self {
        self.territories
            .push((name.to_string(), x, y, continent.to_string()));
        self
    }

    /// Record a two-way border between `a` and `b`.
    pub fn border(mut self, a: &str, b: &str) -> Self {
        self.neighbors.push((a.to_string(), b.to_string()));
        self.neighbors.push((b.to_string(), a.to_string()));
        self
    }

    /// Record a one-way edge, as written in the territory line of a map
    /// file. Most files list both directions explicitly.
    pub fn edge(mut self, from: &str, to: &str) -> Self {
        self.neighbors.push((from.to_string(), to.to_string()));
        self
    }

    pub fn build(self) -> Result<Map, MapError> {
        if self.territories.is_empty() {
            return Err(MapError::Empty);
        }
        let continent_ids: HashMap<&str, ContinentId> = self
            .continents
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), ContinentId(i as u8)))
            .collect();

        let mut territory_ids: HashMap<String, TerritoryId> = HashMap::new();
        let mut territories = Vec::with_capacity(self.territories.len());
        for (i, (name, x, y, continent)) in self.territories.iter().enumerate() {
            let cid = *continent_ids
                .get(continent.as_str())
                .ok_or_else(|| MapError::UnknownContinent(name.clone(), continent.clone()))?;
            if territory_ids
                .insert(name.clone(), TerritoryId(i as u16))
                .is_some()
            {
                return Err(MapError::DuplicateTerritory(name.clone()));
            }
            territories.push(Territory {
                name: name.clone(),
                x: *x,
                y: *y,
                continent: cid,
            });
        }

        let mut adjacency = vec![Vec::new(); territories.len()];
        for (from, to) in &self.neighbors {
            let f = *territory_ids
                .get(from)
                .ok_or_else(|| MapError::UnknownNeighbor(to.clone(), from.clone()))?;
            let t = *territory_ids
                .get(to)
                .ok_or_else(|| MapError::UnknownNeighbor(from.clone(), to.clone()))?;
            let list: &mut Vec<TerritoryId> = &mut adjacency[f.0 as usize];
            if !list.contains(&t) {
                list.push(t);
            }
        }

        Ok(Map {
            continents: self.continents,
            territories,
            adjacency,
            validity: MapValidity::Unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_map() -> Map {
        MapBuilder::new()
            .continent("West", 3)
            .continent("East", 2)
            .territory("A", "West", 0, 0)
            .territory("B", "West", 1, 0)
            .territory("C", "East", 2, 0)
            .territory("D", "East", 3, 0)
            .border("A", "B")
            .border("B", "C")
            .border("C", "D")
            .build()
            .unwrap()
    }

    #[test]
    fn builds_and_validates_connected_map() {
        let mut map = linear_map();
        assert_eq!(map.validity(), MapValidity::Unknown);
        assert_eq!(map.validate(), MapValidity::Valid);
        assert!(map.are_adjacent(
            map.territory_by_name("A").unwrap(),
            map.territory_by_name("B").unwrap()
        ));
        assert_eq!(map.continent_size(ContinentId(0)), 2);
    }

    #[test]
    fn disconnected_map_is_invalid() {
        let mut map = MapBuilder::new()
            .continent("West", 1)
            .territory("A", "West", 0, 0)
            .territory("B", "West", 1, 0)
            .build()
            .unwrap();
        assert_eq!(map.validate(), MapValidity::Invalid);
    }

    #[test]
    fn continent_split_across_map_is_invalid() {
        // A-B-C-D connected overall, but West = {A, D} is not a
        // connected subgraph on its own.
        let mut map = MapBuilder::new()
            .continent("West", 1)
            .continent("East", 1)
            .territory("A", "West", 0, 0)
            .territory("B", "East", 1, 0)
            .territory("C", "East", 2, 0)
            .territory("D", "West", 3, 0)
            .border("A", "B")
            .border("B", "C")
            .border("C", "D")
            .build()
            .unwrap();
        assert_eq!(map.validate(), MapValidity::Invalid);
    }

    #[test]
    fn unknown_continent_is_rejected() {
        let err = MapBuilder::new()
            .continent("West", 1)
            .territory("A", "Nowhere", 0, 0)
            .build()
            .unwrap_err();
        assert!(matches!(err, MapError::UnknownContinent(..)));
    }
}
