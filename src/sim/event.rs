/// Events emitted during a turn.
/// The presentation layer consumes these for sound and messages.

use crate::domain::board::Coord;
use crate::domain::tile::PipeColor;

#[derive(Clone, Copy, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    CoinPicked { at: Coord },
    ItemPicked { at: Coord },
    Warped { color: PipeColor, from: Coord, to: Coord },
    LevelEntered { id: i32 },
    AllCoinsCollected { id: i32 },
    BossStruck { remaining: u32 },
    BossDefeated,
}
