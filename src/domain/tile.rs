/// Tile vocabulary: what a grid cell can be.
/// Semantics are exposed as query methods rather than stored flags,
/// so every rule about what a tile "is" lives in this one place.

use super::board::Coord;

/// Facing of pipes and doors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Orientation {
    Left,
    Right,
    Up,
    Down,
}

impl Orientation {
    /// Unit step in the facing direction (y grows upward).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Orientation::Left => (-1, 0),
            Orientation::Right => (1, 0),
            Orientation::Up => (0, 1),
            Orientation::Down => (0, -1),
        }
    }

    /// Does the facing run along the x axis?
    pub fn is_horizontal(self) -> bool {
        matches!(self, Orientation::Left | Orientation::Right)
    }

    /// Sign along the travel axis: +1 for Right/Up, -1 for Left/Down.
    pub fn sign(self) -> i32 {
        match self {
            Orientation::Right | Orientation::Up => 1,
            Orientation::Left | Orientation::Down => -1,
        }
    }

    /// Parse a level-file token ("left", "up", ...).
    pub fn parse(s: &str) -> Option<Orientation> {
        match s {
            "left" => Some(Orientation::Left),
            "right" => Some(Orientation::Right),
            "up" => Some(Orientation::Up),
            "down" => Some(Orientation::Down),
            _ => None,
        }
    }
}

/// Pipe color. The color selects which exit transform the pipe applies;
/// the arithmetic itself lives in `board::make_pipe_tile`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PipeColor {
    Green,
    Red,
    Gold,
    Blue,
    Black,
}

impl PipeColor {
    /// Parse a level-file token ("green", "gold", ...).
    pub fn parse(s: &str) -> Option<PipeColor> {
        match s {
            "green" => Some(PipeColor::Green),
            "red" => Some(PipeColor::Red),
            "gold" => Some(PipeColor::Gold),
            "blue" => Some(PipeColor::Blue),
            "black" => Some(PipeColor::Black),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileKind {
    Wall,
    Pipe {
        color: PipeColor,
        orientation: Orientation,
        end: Coord,
    },
    Entrance { orientation: Orientation },
    Exit { orientation: Orientation },
    Empty,
    Coin,
    Item,
}

impl TileKind {
    /// Does this tile block movement?
    pub fn is_wall(self) -> bool {
        matches!(self, TileKind::Wall)
    }

    /// Can an entity occupy this cell?
    pub fn is_walkable(self) -> bool {
        !self.is_wall()
    }

    /// Is this picked up (and consumed) by landing on it?
    #[allow(dead_code)]
    pub fn is_collectible(self) -> bool {
        matches!(self, TileKind::Coin | TileKind::Item)
    }

    #[allow(dead_code)]
    pub fn is_pipe(self) -> bool {
        matches!(self, TileKind::Pipe { .. })
    }

    /// Entrance or exit door?
    #[allow(dead_code)]
    pub fn is_door(self) -> bool {
        matches!(self, TileKind::Entrance { .. } | TileKind::Exit { .. })
    }

    /// Facing of a pipe or door.
    /// Panics on tiles without one: that is a construction bug,
    /// never a recoverable gameplay condition.
    pub fn orientation(self) -> Orientation {
        match self {
            TileKind::Pipe { orientation, .. }
            | TileKind::Entrance { orientation }
            | TileKind::Exit { orientation } => orientation,
            other => panic!("tile {:?} has no orientation", other),
        }
    }

    /// Exit coordinate of a pipe. Panics on non-pipe tiles.
    pub fn pipe_end(self) -> Coord {
        match self {
            TileKind::Pipe { end, .. } => end,
            other => panic!("tile {:?} is not a pipe", other),
        }
    }
}

impl Default for TileKind {
    fn default() -> Self {
        TileKind::Wall
    }
}

/// One grid cell: a kind positioned at a coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tile {
    pub coord: Coord,
    pub kind: TileKind,
}

impl Tile {
    pub fn new(coord: Coord, kind: TileKind) -> Self {
        Tile { coord, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_block_everything_else_walks() {
        assert!(!TileKind::Wall.is_walkable());
        assert!(TileKind::Empty.is_walkable());
        assert!(TileKind::Coin.is_walkable());
        assert!(TileKind::Entrance { orientation: Orientation::Left }.is_walkable());
    }

    #[test]
    fn collectibles_are_coin_and_item_only() {
        assert!(TileKind::Coin.is_collectible());
        assert!(TileKind::Item.is_collectible());
        assert!(!TileKind::Empty.is_collectible());
        assert!(!TileKind::Wall.is_collectible());
    }

    #[test]
    fn orientation_of_directional_tiles() {
        let door = TileKind::Exit { orientation: Orientation::Right };
        assert_eq!(door.orientation(), Orientation::Right);

        let pipe = TileKind::Pipe {
            color: PipeColor::Green,
            orientation: Orientation::Up,
            end: Coord::new(3, 13),
        };
        assert_eq!(pipe.orientation(), Orientation::Up);
        assert_eq!(pipe.pipe_end(), Coord::new(3, 13));
    }

    #[test]
    #[should_panic(expected = "has no orientation")]
    fn orientation_of_empty_is_a_construction_bug() {
        let _ = TileKind::Empty.orientation();
    }

    #[test]
    #[should_panic(expected = "is not a pipe")]
    fn pipe_end_of_door_is_a_construction_bug() {
        let _ = TileKind::Entrance { orientation: Orientation::Down }.pipe_end();
    }

    #[test]
    fn facing_signs() {
        assert_eq!(Orientation::Right.sign(), 1);
        assert_eq!(Orientation::Up.sign(), 1);
        assert_eq!(Orientation::Left.sign(), -1);
        assert_eq!(Orientation::Down.sign(), -1);
    }

    #[test]
    fn token_parsing() {
        assert_eq!(Orientation::parse("up"), Some(Orientation::Up));
        assert_eq!(Orientation::parse("sideways"), None);
        assert_eq!(PipeColor::parse("gold"), Some(PipeColor::Gold));
        assert_eq!(PipeColor::parse("mauve"), None);
    }
}
