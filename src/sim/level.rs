/// Level records, neighbor linkage, and definition loading.
///
/// ## Sources (priority order):
///   1. `levels/` directory (individual `.lvl` files, alphabetical)
///   2. Built-in embedded campaign
///
/// ## Level file format (`.lvl`):
///   Line-oriented directives, `#` starts a comment, blank lines ignored.
///
///   ```
///   name Pump Room
///   spawn 1,1
///   entrance left 0,0
///   exit right 15,8
///   room 1,1 14,14
///   pipe green right 2,12
///   coin 3,3
///   item 8,8
///   boss 12,8            # final level only
///   ```
///
///   Coordinates are `x,y` with y growing upward. Malformed directives
///   are skipped with a warning; a level missing spawn/entrance/exit or
///   any room is rejected entirely.
///
/// Boards built here are pristine: gameplay clones the current level's
/// board and plays on the clone (`sim::session`), so `coin_total` stays
/// the construction-time count forever.

use std::fmt;
use std::path::Path;

use crate::domain::board::{make_pipe_tile, Board, Coord, Room};
use crate::domain::tile::{Orientation, PipeColor, Tile, TileKind};

// ── Errors ──

/// Traversal/lookup outside the defined level range. Carries the id that
/// was asked for — tests and callers inspect it, so it is never clamped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelError {
    UnknownLevel(i32),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::UnknownLevel(id) => write!(f, "unknown level id {}", id),
        }
    }
}

impl std::error::Error for LevelError {}

// ── Raw definitions ──

/// Runtime level definition, parsed from a file or embedded.
#[derive(Clone, Debug)]
pub struct LevelDef {
    pub name: String,
    pub spawn: Coord,
    pub entrance: (Coord, Orientation),
    pub exit: (Coord, Orientation),
    pub rooms: Vec<Room>,
    pub pipes: Vec<(Coord, PipeColor, Orientation)>,
    pub coins: Vec<Coord>,
    pub items: Vec<Coord>,
    pub boss: Option<Coord>,
}

// ── Built levels ──

pub struct Level {
    pub id: i32,
    pub name: String,
    pub board: Board,
    pub spawn: Coord,
    pub entrance: Coord,
    pub exit: Coord,
    pub coin_total: u32,
    pub boss_spawn: Option<Coord>,
    pub is_final: bool,
}

/// The ordered level collection; ids run 0..len contiguously.
pub struct Levels {
    levels: Vec<Level>,
}

impl Levels {
    /// Build every level's board: carve rooms, place doors, stamp pipes,
    /// coins and items. The coin total is frozen here. The last id is
    /// flagged final. Panics on an empty definition list (a campaign with
    /// no levels is a startup bug, not a runtime condition).
    pub fn from_defs(defs: &[LevelDef]) -> Levels {
        assert!(!defs.is_empty(), "a campaign needs at least one level");

        let last = defs.len() - 1;
        let levels = defs
            .iter()
            .enumerate()
            .map(|(i, def)| {
                let mut board = Board::new(def.entrance, def.exit, &def.rooms);
                for &(at, color, orientation) in &def.pipes {
                    board.set(make_pipe_tile(at, color, orientation));
                }
                for &at in &def.coins {
                    board.set(Tile::new(at, TileKind::Coin));
                }
                for &at in &def.items {
                    board.set(Tile::new(at, TileKind::Item));
                }
                let coin_total = board
                    .iter()
                    .filter(|t| t.kind == TileKind::Coin)
                    .count() as u32;

                Level {
                    id: i as i32,
                    name: def.name.clone(),
                    board,
                    spawn: def.spawn,
                    entrance: def.entrance.0,
                    exit: def.exit.0,
                    coin_total,
                    boss_spawn: def.boss,
                    is_final: i == last,
                }
            })
            .collect();

        Levels { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Checked lookup: any id outside 0..len reports `UnknownLevel(id)`.
    pub fn level(&self, id: i32) -> Result<&Level, LevelError> {
        if id < 0 || id as usize >= self.levels.len() {
            return Err(LevelError::UnknownLevel(id));
        }
        Ok(&self.levels[id as usize])
    }

    /// First level — the campaign start. Total by the non-empty invariant.
    pub fn first(&self) -> &Level {
        &self.levels[0]
    }

    /// The final level (always the last id).
    pub fn final_level(&self) -> &Level {
        &self.levels[self.levels.len() - 1]
    }

    /// Id one step forward. The failing value carries the would-be target.
    pub fn next_level(&self, id: i32) -> Result<i32, LevelError> {
        let target = id + 1;
        self.level(target).map(|lv| lv.id)
    }

    /// Id one step back; `prev_level(0)` fails with `UnknownLevel(-1)`.
    pub fn prev_level(&self, id: i32) -> Result<i32, LevelError> {
        let target = id - 1;
        self.level(target).map(|lv| lv.id)
    }

    /// The door tile marking level `id`'s entry point.
    pub fn entrance_tile(&self, id: i32) -> Result<Tile, LevelError> {
        let lv = self.level(id)?;
        Ok(lv.board.get(lv.entrance))
    }

    /// The door tile marking level `id`'s exit point.
    pub fn exit_tile(&self, id: i32) -> Result<Tile, LevelError> {
        let lv = self.level(id)?;
        Ok(lv.board.get(lv.exit))
    }

    /// Construction-time coin count; never decremented by play.
    pub fn coin_total(&self, id: i32) -> Result<u32, LevelError> {
        Ok(self.level(id)?.coin_total)
    }

    pub fn is_final(&self, id: i32) -> Result<bool, LevelError> {
        Ok(self.level(id)?.is_final)
    }

    #[allow(dead_code)]
    pub fn board(&self, id: i32) -> Result<&Board, LevelError> {
        Ok(&self.level(id)?.board)
    }
}

// ══════════════════════════════════════════════════════════════
// Loading
// ══════════════════════════════════════════════════════════════

/// Load the campaign: `.lvl` files from `dir` if any parse, otherwise
/// the embedded campaign.
pub fn load_defs(dir: &Path) -> Vec<LevelDef> {
    if dir.is_dir() {
        let defs = load_from_directory(dir);
        if !defs.is_empty() {
            return defs;
        }
    }
    embedded_campaign()
}

fn load_from_directory(dir: &Path) -> Vec<LevelDef> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return vec![],
    };

    let mut named: Vec<(String, LevelDef)> = vec![];
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map_or(false, |e| e == "lvl") {
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    let file = path.file_name().unwrap_or_default().to_string_lossy().to_string();
                    match parse_level_file(&text) {
                        Some(def) => named.push((file, def)),
                        None => eprintln!("Warning: skipping malformed level file {}", file),
                    }
                }
                Err(e) => eprintln!("Warning: could not read {}: {e}", path.display()),
            }
        }
    }

    named.sort_by(|a, b| a.0.cmp(&b.0));
    named.into_iter().map(|(_, def)| def).collect()
}

// ── Parsing ──

/// Parse one level from text. Returns None when the level is unusable
/// (no spawn, doors or rooms); individually bad directives only warn.
pub fn parse_level_file(content: &str) -> Option<LevelDef> {
    let mut name = String::new();
    let mut spawn = None;
    let mut entrance = None;
    let mut exit = None;
    let mut rooms = vec![];
    let mut pipes = vec![];
    let mut coins = vec![];
    let mut items = vec![];
    let mut boss = None;

    for raw in content.lines() {
        let line = match raw.find('#') {
            Some(i) => &raw[..i],
            None => raw,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut words = line.split_whitespace();
        let directive = words.next().unwrap_or_default();
        let rest: Vec<&str> = words.collect();

        let ok = match directive {
            "name" => {
                name = rest.join(" ");
                true
            }
            "spawn" => parse_coord_arg(&rest, 0).map(|c| spawn = Some(c)).is_some(),
            "entrance" => parse_door(&rest).map(|d| entrance = Some(d)).is_some(),
            "exit" => parse_door(&rest).map(|d| exit = Some(d)).is_some(),
            "room" => match (parse_coord_arg(&rest, 0), parse_coord_arg(&rest, 1)) {
                (Some(lo), Some(hi)) => {
                    rooms.push(Room::new(lo, hi));
                    true
                }
                _ => false,
            },
            "pipe" => match (
                rest.first().and_then(|s| PipeColor::parse(s)),
                rest.get(1).and_then(|s| Orientation::parse(s)),
                parse_coord_arg(&rest, 2),
            ) {
                (Some(color), Some(orientation), Some(at)) => {
                    pipes.push((at, color, orientation));
                    true
                }
                _ => false,
            },
            "coin" => parse_coord_arg(&rest, 0).map(|c| coins.push(c)).is_some(),
            "item" => parse_coord_arg(&rest, 0).map(|c| items.push(c)).is_some(),
            "boss" => parse_coord_arg(&rest, 0).map(|c| boss = Some(c)).is_some(),
            _ => false,
        };

        if !ok {
            eprintln!("Warning: skipping level directive: {}", line);
        }
    }

    let def = LevelDef {
        name: if name.is_empty() { "Unnamed Sector".to_string() } else { name },
        spawn: spawn?,
        entrance: entrance?,
        exit: exit?,
        rooms,
        pipes,
        coins,
        items,
        boss,
    };
    if def.rooms.is_empty() {
        return None;
    }
    if !def.rooms.iter().any(|r| r.contains(def.spawn)) {
        eprintln!("Warning: spawn {:?} is outside every room", def.spawn);
        return None;
    }
    Some(def)
}

/// `x,y` at argument position `idx`.
fn parse_coord_arg(args: &[&str], idx: usize) -> Option<Coord> {
    let parts: Vec<&str> = args.get(idx)?.split(',').collect();
    if parts.len() != 2 {
        return None;
    }
    let x = parts[0].parse::<i32>().ok()?;
    let y = parts[1].parse::<i32>().ok()?;
    let c = Coord::new(x, y);
    c.in_bounds().then_some(c)
}

/// `<orientation> x,y`.
fn parse_door(args: &[&str]) -> Option<(Coord, Orientation)> {
    let orientation = Orientation::parse(args.first()?)?;
    let at = parse_coord_arg(args, 1)?;
    Some((at, orientation))
}

// ══════════════════════════════════════════════════════════════
// Embedded campaign
// ══════════════════════════════════════════════════════════════

/// The built-in three-sector campaign. Level 0's entrance and the final
/// exit are sealed behind wall cells: the campaign boundary is not meant
/// to be traversable, and walking into it would be a level-design bug.
pub fn embedded_campaign() -> Vec<LevelDef> {
    vec![
        parse_embedded("Pump Room", &[
            "spawn 1,1",
            "entrance right 0,0",
            "exit right 15,8",
            "room 1,1 14,14",
            "pipe green right 2,12",
            "pipe black up 5,5",
            "coin 3,3",
            "coin 6,2",
            "coin 10,10",
            "coin 12,4",
            "item 8,8",
        ]),
        parse_embedded("Filter Gallery", &[
            "spawn 1,8",
            "entrance left 0,8",
            "exit right 15,7",
            "room 1,1 6,14",
            "room 9,1 14,14",
            "pipe gold right 2,4",
            "pipe gold left 12,5",
            "coin 2,2",
            "coin 4,12",
            "coin 10,3",
            "coin 13,13",
            "coin 11,8",
            "item 13,2",
        ]),
        parse_embedded("Boss Vault", &[
            "spawn 2,8",
            "entrance left 0,8",
            "exit up 15,15",
            "room 1,1 14,14",
            "pipe blue up 3,2",
            "pipe black left 13,5",
            "coin 2,2",
            "coin 13,13",
            "boss 12,8",
        ]),
    ]
}

fn parse_embedded(name: &str, lines: &[&str]) -> LevelDef {
    let mut text = format!("name {}\n", name);
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    match parse_level_file(&text) {
        Some(def) => def,
        None => panic!("embedded level {:?} failed to parse", name),
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
