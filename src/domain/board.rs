/// Board: the dense 16×16 tile grid plus the pipe-exit geometry.
///
/// ## Layout
///
/// Tiles live in a flat row-major array: `index = y * GRID + x`.
/// The index↔coordinate mapping is a bijection over the whole grid.
/// y grows upward, so (0,0) is the bottom-left cell and the renderer
/// is the one that flips rows for display.
///
/// ## Construction
///
/// A board starts as solid Wall. Rooms (inclusive rectangles) are carved
/// to Empty, then the entrance/exit doors are placed. Pipes, coins and
/// items are stamped on top by level construction (`sim::level`). After
/// construction a board is only mutated through `set` — and during play
/// only on the session's working copy, never on the pristine level boards.
///
/// ## Pipe transforms
///
/// Each color is a closed-form map from the pipe's own cell to its exit
/// cell. With `M = 15` and `s` the facing sign (+1 Right/Up, -1 Left/Down):
///
///   color   horizontal facing      vertical facing
///   ─────   ──────────────────     ──────────────────
///   Green   (M - x - s, y)         (x, M - y - s)
///   Red     (x + s,     M - y)     (M - x, y + s)
///   Gold    (M - x - s, M - y)     (M - x, M - y - s)
///   Blue    (M - y,     x + s)     (y + s, M - x)
///   Black   (x + s,     y)         (x,     y + s)
///
/// Green mirrors the facing axis; Red mirrors the perpendicular axis and
/// steps once along the facing; Gold mirrors both; Blue transposes the
/// axes (rotation feel) then mirrors and steps; Black is a one-cell nudge.
/// The arithmetic is fixture-locked — do not "simplify" it.

use super::tile::{Orientation, PipeColor, Tile, TileKind};

/// Side length of every level grid.
pub const GRID: i32 = 16;

const MAX: i32 = GRID - 1;

// ── Coordinates ──

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    pub fn in_bounds(self) -> bool {
        (0..GRID).contains(&self.x) && (0..GRID).contains(&self.y)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Coord {
        Coord::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Row-major index of an in-bounds coordinate.
/// Out-of-range input is a construction bug and panics.
pub fn index_of_coord(c: Coord) -> usize {
    assert!(c.in_bounds(), "coordinate {:?} is off the {}x{} grid", c, GRID, GRID);
    (c.y * GRID + c.x) as usize
}

/// Inverse of `index_of_coord`. Panics on indices past the grid.
pub fn coord_of_index(index: usize) -> Coord {
    assert!(index < (GRID * GRID) as usize, "tile index {} out of range", index);
    Coord::new(index as i32 % GRID, index as i32 / GRID)
}

// ── Rooms ──

/// Axis-aligned rectangle carved to Empty inside an all-Wall board.
/// `lo` is the bottom-left corner, `hi` the top-right; both inclusive.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Room {
    pub lo: Coord,
    pub hi: Coord,
}

impl Room {
    pub fn new(lo: Coord, hi: Coord) -> Self {
        Room { lo, hi }
    }

    pub fn contains(&self, c: Coord) -> bool {
        (self.lo.x..=self.hi.x).contains(&c.x) && (self.lo.y..=self.hi.y).contains(&c.y)
    }
}

// ── Board ──

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Build a board: solid Wall, rooms carved to Empty, doors placed.
    /// Deterministic — same inputs, same board.
    pub fn new(
        entrance: (Coord, Orientation),
        exit: (Coord, Orientation),
        rooms: &[Room],
    ) -> Board {
        let mut tiles: Vec<Tile> = (0..(GRID * GRID) as usize)
            .map(|i| Tile::new(coord_of_index(i), TileKind::Wall))
            .collect();

        for room in rooms {
            for y in room.lo.y..=room.hi.y {
                for x in room.lo.x..=room.hi.x {
                    let c = Coord::new(x, y);
                    tiles[index_of_coord(c)] = Tile::new(c, TileKind::Empty);
                }
            }
        }

        let mut board = Board { tiles };
        board.set(Tile::new(entrance.0, TileKind::Entrance { orientation: entrance.1 }));
        board.set(Tile::new(exit.0, TileKind::Exit { orientation: exit.1 }));
        board
    }

    /// O(1) lookup by coordinate. Out-of-range panics (construction bug).
    pub fn get(&self, c: Coord) -> Tile {
        self.tiles[index_of_coord(c)]
    }

    /// O(1) lookup by raw index. Out-of-range panics.
    pub fn tile_at(&self, index: usize) -> Tile {
        assert!(index < self.tiles.len(), "tile index {} out of range", index);
        self.tiles[index]
    }

    /// Overwrite the cell at the tile's own coordinate.
    pub fn set(&mut self, tile: Tile) {
        let i = index_of_coord(tile.coord);
        self.tiles[i] = tile;
    }

    /// Replace a cell with Empty (coin/item consumption).
    pub fn clear(&mut self, c: Coord) {
        self.set(Tile::new(c, TileKind::Empty));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}

// ── Pipe geometry ──

/// Compute a pipe tile at `start`: the exit cell is a pure function of
/// (start, color, orientation). An exit landing off the grid means the
/// level definition is broken, so construction fails fast.
pub fn make_pipe_tile(start: Coord, color: PipeColor, orientation: Orientation) -> Tile {
    let end = pipe_exit(start, color, orientation);
    assert!(
        end.in_bounds(),
        "{:?} {:?} pipe at {:?} exits the grid at {:?}",
        color, orientation, start, end
    );
    Tile::new(start, TileKind::Pipe { color, orientation, end })
}

/// The closed-form transform table. See the module header.
fn pipe_exit(start: Coord, color: PipeColor, orientation: Orientation) -> Coord {
    let Coord { x, y } = start;
    let s = orientation.sign();
    match (color, orientation.is_horizontal()) {
        (PipeColor::Green, true) => Coord::new(MAX - x - s, y),
        (PipeColor::Green, false) => Coord::new(x, MAX - y - s),
        (PipeColor::Red, true) => Coord::new(x + s, MAX - y),
        (PipeColor::Red, false) => Coord::new(MAX - x, y + s),
        (PipeColor::Gold, true) => Coord::new(MAX - x - s, MAX - y),
        (PipeColor::Gold, false) => Coord::new(MAX - x, MAX - y - s),
        (PipeColor::Blue, true) => Coord::new(MAX - y, x + s),
        (PipeColor::Blue, false) => Coord::new(y + s, MAX - x),
        (PipeColor::Black, _) => {
            let (dx, dy) = orientation.delta();
            start.offset(dx, dy)
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn end_of(x: i32, y: i32, color: PipeColor, orientation: Orientation) -> Coord {
        make_pipe_tile(Coord::new(x, y), color, orientation)
            .kind
            .pipe_end()
    }

    // ── Index bijection ──

    #[test]
    fn index_coord_bijection_over_whole_grid() {
        for y in 0..GRID {
            for x in 0..GRID {
                let c = Coord::new(x, y);
                assert_eq!(coord_of_index(index_of_coord(c)), c);
            }
        }
    }

    #[test]
    fn indices_are_row_major() {
        assert_eq!(index_of_coord(Coord::new(0, 0)), 0);
        assert_eq!(index_of_coord(Coord::new(15, 0)), 15);
        assert_eq!(index_of_coord(Coord::new(0, 1)), 16);
        assert_eq!(index_of_coord(Coord::new(15, 15)), 255);
    }

    #[test]
    #[should_panic(expected = "off the 16x16 grid")]
    fn negative_coordinate_panics() {
        let _ = index_of_coord(Coord::new(-1, 3));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_past_grid_panics() {
        let _ = coord_of_index(256);
    }

    // ── Construction ──

    fn plain_board() -> Board {
        Board::new(
            (Coord::new(0, 0), Orientation::Right),
            (Coord::new(15, 8), Orientation::Right),
            &[Room::new(Coord::new(1, 1), Coord::new(14, 14))],
        )
    }

    #[test]
    fn rooms_carve_walls_to_empty() {
        let b = plain_board();
        assert_eq!(b.get(Coord::new(1, 1)).kind, TileKind::Empty);
        assert_eq!(b.get(Coord::new(14, 14)).kind, TileKind::Empty);
        // Border stays solid
        assert_eq!(b.get(Coord::new(0, 7)).kind, TileKind::Wall);
        assert_eq!(b.get(Coord::new(15, 0)).kind, TileKind::Wall);
    }

    #[test]
    fn doors_are_placed_on_top_of_walls() {
        let b = plain_board();
        assert_eq!(
            b.get(Coord::new(0, 0)).kind,
            TileKind::Entrance { orientation: Orientation::Right }
        );
        assert_eq!(
            b.get(Coord::new(15, 8)).kind,
            TileKind::Exit { orientation: Orientation::Right }
        );
    }

    #[test]
    fn set_overwrites_at_own_coordinate() {
        let mut b = plain_board();
        let c = Coord::new(5, 5);
        b.set(Tile::new(c, TileKind::Coin));
        assert_eq!(b.get(c).kind, TileKind::Coin);
        b.clear(c);
        assert_eq!(b.get(c).kind, TileKind::Empty);
    }

    // ── Transform fixtures (locked) ──

    #[test]
    fn green_right_mirrors_facing_axis() {
        assert_eq!(end_of(0, 2, PipeColor::Green, Orientation::Right), Coord::new(14, 2));
    }

    #[test]
    fn gold_right_mirrors_both_axes() {
        assert_eq!(end_of(0, 4, PipeColor::Gold, Orientation::Right), Coord::new(14, 11));
    }

    #[test]
    fn blue_up_transposes_then_mirrors() {
        assert_eq!(end_of(2, 1, PipeColor::Blue, Orientation::Up), Coord::new(2, 13));
    }

    // ── Closed forms, one case per color/orientation family ──

    #[test]
    fn green_all_orientations() {
        assert_eq!(end_of(3, 7, PipeColor::Green, Orientation::Right), Coord::new(11, 7));
        assert_eq!(end_of(12, 7, PipeColor::Green, Orientation::Left), Coord::new(4, 7));
        assert_eq!(end_of(5, 2, PipeColor::Green, Orientation::Up), Coord::new(5, 12));
        assert_eq!(end_of(5, 13, PipeColor::Green, Orientation::Down), Coord::new(5, 3));
    }

    #[test]
    fn red_steps_along_facing_and_flips_across() {
        assert_eq!(end_of(3, 4, PipeColor::Red, Orientation::Right), Coord::new(4, 11));
        assert_eq!(end_of(3, 4, PipeColor::Red, Orientation::Left), Coord::new(2, 11));
        assert_eq!(end_of(3, 4, PipeColor::Red, Orientation::Up), Coord::new(12, 5));
        assert_eq!(end_of(3, 4, PipeColor::Red, Orientation::Down), Coord::new(12, 3));
    }

    #[test]
    fn gold_all_orientations() {
        assert_eq!(end_of(2, 3, PipeColor::Gold, Orientation::Left), Coord::new(14, 12));
        assert_eq!(end_of(2, 3, PipeColor::Gold, Orientation::Up), Coord::new(13, 11));
        assert_eq!(end_of(2, 3, PipeColor::Gold, Orientation::Down), Coord::new(13, 13));
    }

    #[test]
    fn blue_all_orientations() {
        assert_eq!(end_of(2, 5, PipeColor::Blue, Orientation::Right), Coord::new(10, 3));
        assert_eq!(end_of(2, 5, PipeColor::Blue, Orientation::Left), Coord::new(10, 1));
        assert_eq!(end_of(2, 5, PipeColor::Blue, Orientation::Down), Coord::new(4, 13));
    }

    #[test]
    fn black_is_a_one_cell_nudge() {
        assert_eq!(end_of(4, 4, PipeColor::Black, Orientation::Right), Coord::new(5, 4));
        assert_eq!(end_of(4, 4, PipeColor::Black, Orientation::Left), Coord::new(3, 4));
        assert_eq!(end_of(4, 4, PipeColor::Black, Orientation::Up), Coord::new(4, 5));
        assert_eq!(end_of(4, 4, PipeColor::Black, Orientation::Down), Coord::new(4, 3));
    }

    #[test]
    #[should_panic(expected = "exits the grid")]
    fn pipe_exiting_the_grid_is_a_construction_bug() {
        // Black pipe on the left rim would exit at x = -1.
        let _ = make_pipe_tile(Coord::new(0, 4), PipeColor::Black, Orientation::Left);
    }
}
