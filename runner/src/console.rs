// ═══════════════════════════════════════════════════════════════════════
// Console — interactive startup commands and human directive input
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::strategy::{DirectiveSource, HumanDirective, Prompt};
use conquest_engine::types::StratKind;
use conquest_engine::GameEngine;
use std::io::{BufRead, Write};

/// Drive the startup phases from console commands, one per line:
///
///   loadmap <path>
///   validate
///   addplayers <n>
///   strategy <index> <kind>
///   start
///
/// `start` hands back a machine ready for the main game loop. Any
/// mistake ends the session immediately.
pub fn startup(
    engine: &mut GameEngine,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> std::io::Result<bool> {
    let mut line = String::new();
    loop {
        writeln!(out, "phase: {}", engine.phase())?;
        for cmd in engine.available_commands() {
            writeln!(out, "  {cmd}")?;
        }
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let outcome = match words.as_slice() {
            [] => continue,
            ["loadmap", path] => engine.load_map_file(path).err().map(|e| e.to_string()),
            ["validate"] => engine.validate_map().err().map(|e| e.to_string()),
            ["addplayers", n] => match n.parse::<usize>() {
                Ok(n) => engine.add_players(n).err().map(|e| e.to_string()),
                Err(_) => Some(format!("`{n}` is not a number")),
            },
            ["strategy", i, kind] => match (i.parse::<usize>(), kind.parse::<StratKind>()) {
                (Ok(i), Ok(kind)) => engine.set_strategy(i, kind).err().map(|e| e.to_string()),
                (Err(_), _) => Some(format!("`{i}` is not a player index")),
                (_, Err(e)) => Some(e.to_string()),
            },
            ["start"] => match engine.game_start() {
                Ok(()) => return Ok(true),
                Err(e) => Some(e.to_string()),
            },
            other => Some(format!("unknown command `{}`", other.join(" "))),
        };
        if let Some(error) = outcome {
            writeln!(out, "error: {error}")?;
            return Ok(false);
        }
    }
}

/// Human directives read line by line:
///
///   deploy <territory> <units>
///   advance <from> <to> <units>
///   bomb <territory>
///   blockade <territory>
///   airlift <from> <to> <units>
///   negotiate <player>
///   end
///
/// Unparseable lines are re-prompted; end of input ends the turn.
pub struct LineDirectives<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> LineDirectives<R, W> {
    pub fn new(input: R, out: W) -> Self {
        LineDirectives { input, out }
    }
}

pub fn parse_directive(line: &str) -> Result<HumanDirective, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let units = |w: &str| {
        w.parse::<u32>()
            .map_err(|_| format!("`{w}` is not a unit count"))
    };
    match words.as_slice() {
        ["deploy", t, n] => Ok(HumanDirective::Deploy {
            territory: t.to_string(),
            units: units(n)?,
        }),
        ["advance", from, to, n] => Ok(HumanDirective::Advance {
            from: from.to_string(),
            to: to.to_string(),
            units: units(n)?,
        }),
        ["bomb", t] => Ok(HumanDirective::Bomb {
            territory: t.to_string(),
        }),
        ["blockade", t] => Ok(HumanDirective::Blockade {
            territory: t.to_string(),
        }),
        ["airlift", from, to, n] => Ok(HumanDirective::Airlift {
            from: from.to_string(),
            to: to.to_string(),
            units: units(n)?,
        }),
        ["negotiate", p] => Ok(HumanDirective::Negotiate {
            player: p.to_string(),
        }),
        ["end"] | ["end", "turn"] => Ok(HumanDirective::EndTurn),
        other => Err(format!("cannot read `{}`", other.join(" "))),
    }
}

impl<R: BufRead, W: Write> DirectiveSource for LineDirectives<R, W> {
    fn next_directive(&mut self, prompt: &Prompt) -> Option<HumanDirective> {
        let _ = writeln!(
            self.out,
            "{}: {} reinforcements, defend [{}], attack [{}]",
            prompt.player,
            prompt.reinforcements_left,
            prompt.to_defend.join(", "),
            prompt.to_attack.join(", ")
        );
        let mut line = String::new();
        loop {
            let _ = write!(self.out, "{}> ", prompt.player);
            let _ = self.out.flush();
            line.clear();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => match parse_directive(&line) {
                    Ok(directive) => return Some(directive),
                    Err(e) => {
                        let _ = writeln!(self.out, "{e}");
                    }
                },
            }
        }
    }
}

/// Ask until the answer parses and passes `check`.
pub fn ask<T: std::str::FromStr>(
    question: &str,
    check: impl Fn(&T) -> bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> std::io::Result<Option<T>> {
    let mut line = String::new();
    loop {
        write!(out, "{question}: ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim().parse::<T>() {
            Ok(value) if check(&value) => return Ok(Some(value)),
            _ => writeln!(out, "try again")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conquest_engine::types::Phase;
    use std::io::Cursor;

    #[test]
    fn parses_each_directive_form() {
        assert_eq!(
            parse_directive("deploy Harrow 3").unwrap(),
            HumanDirective::Deploy {
                territory: "Harrow".into(),
                units: 3
            }
        );
        assert_eq!(
            parse_directive("advance Harrow Stonegate 2").unwrap(),
            HumanDirective::Advance {
                from: "Harrow".into(),
                to: "Stonegate".into(),
                units: 2
            }
        );
        assert_eq!(parse_directive("end turn").unwrap(), HumanDirective::EndTurn);
        assert!(parse_directive("deploy Harrow lots").is_err());
        assert!(parse_directive("conjure dragons").is_err());
    }

    #[test]
    fn startup_runs_to_game_start() {
        let script = "loadmap ../maps/duel.map\nvalidate\naddplayers 2\n\
                      strategy 0 aggressive\nstrategy 1 cheater\nstart\n";
        let mut engine = GameEngine::new(4);
        let mut out = Vec::new();
        let started = startup(&mut engine, &mut Cursor::new(script), &mut out).unwrap();
        assert!(started);
        assert_eq!(engine.phase(), Phase::AssignReinforcements);
    }

    #[test]
    fn startup_aborts_on_the_first_mistake() {
        let script = "loadmap ../maps/duel.map\naddplayers 2\nvalidate\n";
        let mut engine = GameEngine::new(4);
        let mut out = Vec::new();
        let started = startup(&mut engine, &mut Cursor::new(script), &mut out).unwrap();
        assert!(!started);
        // The bad command was rejected without moving the machine.
        assert_eq!(engine.phase(), Phase::MapLoaded);
    }

    #[test]
    fn line_directives_reprompt_until_valid() {
        let prompt = Prompt {
            player: "player1".into(),
            reinforcements_left: 0,
            to_defend: vec![],
            to_attack: vec![],
        };
        let mut source = LineDirectives::new(Cursor::new("gibberish\nbomb Harrow\n"), Vec::new());
        assert_eq!(
            source.next_directive(&prompt),
            Some(HumanDirective::Bomb {
                territory: "Harrow".into()
            })
        );
        assert_eq!(source.next_directive(&prompt), None);
    }
}
