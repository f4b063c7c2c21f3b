/// Boss pursuit: an immutable snapshot plus one greedy chase step.
///
/// The boss has no modes or memory — each step is a pure function of
/// (own position, player position, board). It closes the axis with the
/// larger absolute gap first; an exact tie goes to the x axis. A Wall at
/// the chosen destination cancels the whole move (no fallback to the
/// other axis), which is what lets walls pin the boss in corridors.
///
/// Health is interpreted by the caller; this module only clamps it at 0.

use super::board::{Board, Coord};
use super::tile::TileKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BossState {
    pub pos: Coord,
    pub tile: TileKind,
    pub health: u32,
}

impl BossState {
    pub fn new(x: i32, y: i32, tile: TileKind, health: u32) -> Self {
        BossState { pos: Coord::new(x, y), tile, health }
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }
}

/// `health' = max(0, health - amount)`.
pub fn decrease_health(boss: &BossState, amount: u32) -> BossState {
    BossState { health: boss.health.saturating_sub(amount), ..*boss }
}

/// One chase step toward `player`. Displaces by exactly 0 or 1 cells.
pub fn move_boss(player: Coord, boss: &BossState, board: &Board) -> BossState {
    let dx = player.x - boss.pos.x;
    let dy = player.y - boss.pos.y;
    if dx == 0 && dy == 0 {
        return *boss;
    }

    // Larger-gap axis first; x wins exact ties.
    let (sx, sy) = if dx.abs() >= dy.abs() {
        (dx.signum(), 0)
    } else {
        (0, dy.signum())
    };

    let dest = boss.pos.offset(sx, sy);
    if !dest.in_bounds() || !board.get(dest).kind.is_walkable() {
        return *boss; // blocked: stay put, no second choice
    }

    BossState { pos: dest, tile: board.get(dest).kind, ..*boss }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::Room;
    use crate::domain::tile::Orientation;

    fn open_board() -> Board {
        Board::new(
            (Coord::new(0, 0), Orientation::Right),
            (Coord::new(15, 15), Orientation::Right),
            &[Room::new(Coord::new(1, 1), Coord::new(14, 14))],
        )
    }

    fn boss_at(x: i32, y: i32) -> BossState {
        BossState::new(x, y, TileKind::Empty, 100)
    }

    // ── decrease_health ──

    #[test]
    fn health_floors_at_zero() {
        let b = boss_at(5, 5);
        assert_eq!(decrease_health(&b, 30).health, 70);
        assert_eq!(decrease_health(&b, 100).health, 0);
        assert_eq!(decrease_health(&b, 250).health, 0);
        assert_eq!(decrease_health(&b, 0).health, 100);
    }

    #[test]
    fn zero_health_is_defeat() {
        assert!(decrease_health(&boss_at(5, 5), 100).is_defeated());
        assert!(!boss_at(5, 5).is_defeated());
    }

    // ── move_boss ──

    #[test]
    fn chases_the_larger_axis_gap() {
        let board = open_board();
        // dx = 4, dy = 1: close x first
        let b = move_boss(Coord::new(10, 6), &boss_at(6, 5), &board);
        assert_eq!(b.pos, Coord::new(7, 5));
        // dx = 1, dy = -4: close y first
        let b = move_boss(Coord::new(7, 2), &boss_at(6, 6), &board);
        assert_eq!(b.pos, Coord::new(6, 5));
    }

    #[test]
    fn exact_tie_goes_to_x() {
        let board = open_board();
        // |dx| = |dy| = 3: x must win
        let b = move_boss(Coord::new(9, 9), &boss_at(6, 6), &board);
        assert_eq!(b.pos, Coord::new(7, 6));
        // Tie with negative dx still picks x
        let b = move_boss(Coord::new(3, 9), &boss_at(6, 6), &board);
        assert_eq!(b.pos, Coord::new(5, 6));
    }

    #[test]
    fn caught_up_boss_stays_put() {
        let board = open_board();
        let b = move_boss(Coord::new(6, 6), &boss_at(6, 6), &board);
        assert_eq!(b.pos, Coord::new(6, 6));
    }

    #[test]
    fn wall_rejects_without_fallback() {
        let board = open_board();
        // Boss against the room's left wall; player on the rim, one up.
        // The tie picks x, the destination is Wall, and the boss must NOT
        // sidestep onto the open y axis.
        let b = move_boss(Coord::new(0, 2), &boss_at(1, 1), &board);
        assert_eq!(b.pos, Coord::new(1, 1));
    }

    #[test]
    fn displacement_is_at_most_one_cell() {
        let board = open_board();
        let from = boss_at(2, 2);
        let b = move_boss(Coord::new(13, 13), &from, &board);
        assert_eq!(from.pos.manhattan(b.pos), 1);
    }

    #[test]
    fn health_untouched_by_movement() {
        let board = open_board();
        let b = move_boss(Coord::new(9, 9), &boss_at(6, 6), &board);
        assert_eq!(b.health, 100);
    }
}
