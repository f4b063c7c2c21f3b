/// Player snapshot and the one-step transition.
///
/// ## Destination truth table
///
/// ┌───────────────┬─────────────────────────────────────────────┐
/// │ Dest tile      │ Effect                                      │
/// ├───────────────┼─────────────────────────────────────────────┤
/// │ Wall           │ rejected, position unchanged                │
/// │ Empty          │ step in                                     │
/// │ Coin           │ step in, coins += 1, tile consumed          │
/// │ Item           │ step in, tile consumed                      │
/// │ Pipe           │ step in, then ride to the precomputed end   │
/// │ Exit           │ next level, placed on its entrance door     │
/// │ Entrance       │ previous level, placed on its exit door     │
/// └───────────────┴─────────────────────────────────────────────┘
///
/// `steps` increments on EVERY call — rejected and unrecognized moves
/// included. That is reproduced behavior the fixtures encode; leave it.
///
/// The `&mut Board` is the session's working copy of the current level;
/// the pristine boards inside `Levels` are never written after build.
/// Door traversal consults `Levels` and propagates `UnknownLevel` — a
/// door that leads past the campaign boundary is a level-design bug the
/// caller must see, not a condition to paper over.

use crate::domain::board::{Board, Coord};
use crate::domain::boss::{decrease_health, move_boss, BossState};
use crate::domain::tile::TileKind;
use super::level::{LevelError, Levels};

/// One turn's worth of movement input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    /// Unit step (y grows upward).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Move::Up => (0, 1),
            Move::Left => (-1, 0),
            Move::Down => (0, -1),
            Move::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlayerState {
    pub level: i32,
    pub pos: Coord,
    /// Kind of the tile under the player, cached at transition time.
    pub tile: TileKind,
    pub coins: u32,
    pub steps: u32,
}

impl PlayerState {
    /// Campaign start: level 0's spawn, nothing collected.
    pub fn initial(levels: &Levels) -> Self {
        let lv = levels.first();
        PlayerState {
            level: lv.id,
            pos: lv.spawn,
            tile: lv.board.get(lv.spawn).kind,
            coins: 0,
            steps: 0,
        }
    }

    /// Drop-in at the final level's spawn with a given step count.
    pub fn at_final(levels: &Levels, steps: u32) -> Self {
        let lv = levels.final_level();
        PlayerState {
            level: lv.id,
            pos: lv.spawn,
            tile: lv.board.get(lv.spawn).kind,
            coins: 0,
            steps,
        }
    }
}

/// Advance one turn. `None` is unrecognized input: the position stays,
/// the step still counts.
pub fn update(
    input: Option<Move>,
    state: &PlayerState,
    levels: &Levels,
    board: &mut Board,
) -> Result<PlayerState, LevelError> {
    let mut next = *state;
    next.steps += 1;

    let (dx, dy) = match input {
        Some(mv) => mv.delta(),
        None => return Ok(next),
    };

    let dest = state.pos.offset(dx, dy);
    if !dest.in_bounds() {
        // Stepping off the rim from a door cell: same as walking into wall.
        return Ok(next);
    }

    match board.get(dest).kind {
        TileKind::Wall => {}
        TileKind::Empty => {
            next.pos = dest;
            next.tile = TileKind::Empty;
        }
        TileKind::Coin => {
            next.pos = dest;
            next.coins += 1;
            board.clear(dest);
            next.tile = TileKind::Empty;
        }
        TileKind::Item => {
            next.pos = dest;
            board.clear(dest);
            next.tile = TileKind::Empty;
        }
        TileKind::Pipe { end, .. } => {
            // Two hops in one call: into the pipe, out at its end.
            // The warp is positional only — whatever sits at the end
            // is not triggered until the player moves again.
            next.pos = end;
            next.tile = board.get(end).kind;
        }
        TileKind::Exit { .. } => {
            let target = levels.next_level(state.level)?;
            let door = levels.entrance_tile(target)?;
            next.level = target;
            next.pos = door.coord;
            next.tile = door.kind;
        }
        TileKind::Entrance { .. } => {
            let target = levels.prev_level(state.level)?;
            let door = levels.exit_tile(target)?;
            next.level = target;
            next.pos = door.coord;
            next.tile = door.kind;
        }
    }

    Ok(next)
}

/// Final-level turn: the player's step, then one boss chase step toward
/// the player's new cell, then the adjacency strike — the boss loses
/// `damage` health when the two end within one cell of each other.
/// At any greater distance the boss state passes through untouched.
pub fn final_level_update(
    input: Option<Move>,
    state: &PlayerState,
    levels: &Levels,
    board: &mut Board,
    boss: &BossState,
    damage: u32,
) -> Result<(PlayerState, BossState), LevelError> {
    let next = update(input, state, levels, board)?;

    // Player warped out through the entrance: no chase target this turn.
    if next.level != state.level {
        return Ok((next, *boss));
    }

    let mut chased = move_boss(next.pos, boss, board);
    if next.pos.manhattan(chased.pos) <= 1 {
        chased = decrease_health(&chased, damage);
    }

    Ok((next, chased))
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
