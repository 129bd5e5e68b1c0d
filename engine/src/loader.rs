// ═══════════════════════════════════════════════════════════════════════
// Map loader — Conquest-style text format
//
//   [Map]
//   author=...
//   image=...
//
//   [Continents]
//   Name=Bonus
//
//   [Territories]
//   Name,x,y,Continent,Neighbor,Neighbor,...
// ═══════════════════════════════════════════════════════════════════════

use crate::map::{Map, MapBuilder, MapError};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Map,
    Continents,
    Territories,
}

pub fn load_map(path: impl AsRef<Path>) -> Result<Map, MapError> {
    let text = std::fs::read_to_string(path.as_ref())
        .map_err(|e| MapError::Read(format!("{}: {e}", path.as_ref().display())))?;
    parse_map(&text)
}

pub fn parse_map(text: &str) -> Result<Map, MapError> {
    let mut builder = MapBuilder::new();
    let mut section = Section::Preamble;
    // Neighbor names may appear before their own territory line, so
    // edges are recorded by name and resolved in MapBuilder::build.
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            section = match header.to_ascii_lowercase().as_str() {
                "map" => Section::Map,
                "continents" => Section::Continents,
                "territories" => Section::Territories,
                other => {
                    return Err(MapError::Syntax {
                        line: line_no,
                        msg: format!("unknown section `[{other}]`"),
                    })
                }
            };
            continue;
        }
        match section {
            Section::Preamble => {
                return Err(MapError::Syntax {
                    line: line_no,
                    msg: "content before the first section header".to_string(),
                })
            }
            Section::Map => {
                // Metadata fields (author, image, wrap, scroll, warn)
                // are accepted and ignored; only shape matters here.
                if !line.contains('=') {
                    return Err(MapError::Syntax {
                        line: line_no,
                        msg: "expected `key=value`".to_string(),
                    });
                }
            }
            Section::Continents => {
                let (name, bonus) = line.split_once('=').ok_or_else(|| MapError::Syntax {
                    line: line_no,
                    msg: "expected `Continent=Bonus`".to_string(),
                })?;
                let bonus: u32 = bonus.trim().parse().map_err(|_| MapError::Syntax {
                    line: line_no,
                    msg: format!("continent bonus `{}` is not a number", bonus.trim()),
                })?;
                builder = builder.continent(name.trim(), bonus);
            }
            Section::Territories => {
                let fields: Vec<&str> = line.split(',').map(str::trim).collect();
                if fields.len() < 4 {
                    return Err(MapError::Syntax {
                        line: line_no,
                        msg: "expected `Name,x,y,Continent,Neighbor,...`".to_string(),
                    });
                }
                let name = fields[0];
                let x: u16 = fields[1].parse().map_err(|_| MapError::Syntax {
                    line: line_no,
                    msg: format!("coordinate `{}` is not a number", fields[1]),
                })?;
                let y: u16 = fields[2].parse().map_err(|_| MapError::Syntax {
                    line: line_no,
                    msg: format!("coordinate `{}` is not a number", fields[2]),
                })?;
                builder = builder.territory(name, fields[3], x, y);
                for neighbor in &fields[4..] {
                    if !neighbor.is_empty() {
                        builder = builder.edge(name, neighbor);
                    }
                }
            }
        }
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MapValidity;

    const SMALL: &str = "\
[Map]
author=test
image=none

[Continents]
Northlands=5
Southlands=3

[Territories]
Frostheim,10,10,Northlands,Ironhold,Midgate
Ironhold,20,10,Northlands,Frostheim
Midgate,10,30,Southlands,Frostheim,Sunspire
Sunspire,20,30,Southlands,Midgate
";

    #[test]
    fn parses_small_map() {
        let mut map = parse_map(SMALL).unwrap();
        assert_eq!(map.territory_count(), 4);
        assert_eq!(map.validate(), MapValidity::Valid);
        let frost = map.territory_by_name("Frostheim").unwrap();
        let iron = map.territory_by_name("Ironhold").unwrap();
        assert!(map.are_adjacent(frost, iron));
        let (_, north) = map.continents().next().unwrap();
        assert_eq!(north.bonus, 5);
    }

    #[test]
    fn rejects_unknown_neighbor() {
        let text = "[Continents]\nA=1\n[Territories]\nT,0,0,A,Ghost\n";
        assert!(matches!(
            parse_map(text),
            Err(MapError::UnknownNeighbor(..))
        ));
    }

    #[test]
    fn rejects_malformed_continent_line() {
        let text = "[Continents]\nA;1\n";
        assert!(matches!(parse_map(text), Err(MapError::Syntax { .. })));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(parse_map(""), Err(MapError::Empty)));
    }
}
